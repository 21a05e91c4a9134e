mod app;
mod commands;
mod config;
mod input;
mod render;

pub use app::run_app;
