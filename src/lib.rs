pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod controller;
pub mod models;
