use std::path::PathBuf;
use std::sync::Arc;

use eyre::{Context, Result};
use pdfchat::app::services::{ActionService, EventService};
use pdfchat::backend::{ArcService, HttpService};
use pdfchat::config::{Configuration, init_logger, resolve_path, verbose};
use pdfchat::controller::SessionController;
use pdfchat::models::Action;
use pdfchat::{
    app::{App, destruct_terminal_for_panic},
    cli::Command,
};
use tokio::{sync::mpsc, task};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).wrap_err("loading .env file");
        }
    }

    let config = cmd.get_config()?;
    init_logger(&config.log)?;
    Configuration::init(config.clone())?;
    verbose!("[+] Logger initialized");

    let (pending_files, skipped) = cmd.pending_files();
    for path in &skipped {
        eprintln!("[!] Skipping {}: not a PDF file", path.display());
        log::warn!("Skipping {}: not a PDF file", path.display());
    }

    let service = HttpService::from(&config.api);
    match service.endpoint() {
        Some(endpoint) => verbose!("[+] Using document service at {}", endpoint),
        None => verbose!("[!] No API endpoint configured"),
    }
    let service: ArcService = Arc::new(service);

    let picker_dir = match &config.picker.directory {
        Some(dir) => PathBuf::from(resolve_path(dir)?),
        None => std::env::current_dir().wrap_err("getting current directory")?,
    };

    let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
    let mut events = EventService::default();

    let mut task_set = task::JoinSet::new();
    let token = CancellationToken::new();

    let controller = SessionController::new(service).with_event_tx(Arc::new(events.event_tx()));
    let mut action_service =
        ActionService::new(controller, action_rx, Arc::new(events.event_tx()), token.clone());
    task_set.spawn(async move { action_service.start().await });

    if !pending_files.is_empty() {
        verbose!("[+] Preselected {} file(s)", pending_files.len());
        action_tx
            .send(Action::SelectFiles(pending_files))
            .wrap_err("preselecting files")?;
    }

    let mut app = App::new(action_tx, &mut events, picker_dir, token.clone());
    if let Err(err) = app.run().await {
        eprintln!("Error: {}", err);
    }

    token.cancel();
    task_set.abort_all();
    while let Some(res) = task_set.join_next().await {
        match res {
            Ok(Err(err)) => log::error!("Action service error: {}", err),
            Err(err) if !err.is_cancelled() => log::error!("Task error: {}", err),
            _ => {}
        }
    }

    Ok(())
}
