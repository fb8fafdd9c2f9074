#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};

use crate::config::{
    self, Configuration, apply_endpoint_override, apply_env, load_configuration,
    lookup_config_path,
};
use crate::models::{PendingFile, is_pdf};

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"A Terminal UI to chat with your PDF documents

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/pdfchat/config.toml
    * $HOME/.config/pdfchat/config.toml
    * $HOME/.pdfchat.toml

The API endpoint is taken from, in increasing priority: the configuration
file, the PDFCHAT_API_URL environment variable, the --endpoint flag.
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Base URL of the document service, an empty value leaves it unset
    #[arg(short, long, value_name = "URL")]
    endpoint: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,

    /// PDF files to select for upload on startup
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| lookup_config_path().unwrap_or_default());

        let config = if config_path.is_empty() {
            // No config path is specified just use the default config
            Configuration::default()
        } else {
            load_configuration(config_path.as_str()).wrap_err("loading configuration")?
        };

        Ok(apply_endpoint_override(
            apply_env(config),
            self.endpoint.clone(),
        ))
    }

    /// Splits the positional files into the PDFs to preselect and the
    /// paths that were skipped.
    pub fn pending_files(&self) -> (Vec<PendingFile>, Vec<PathBuf>) {
        let (pdfs, skipped): (Vec<_>, Vec<_>) =
            self.files.iter().cloned().partition(|path| is_pdf(path));
        (pdfs.into_iter().map(PendingFile::new).collect(), skipped)
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }
}
