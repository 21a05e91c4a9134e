use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dashboard_engine::Session;
use engine_logging::{engine_info, engine_warn};

use super::commands::{Command, HELP};
use super::config::{resolve_settings, Cli};
use super::input::stdin_lines;
use super::render::TerminalRenderer;

pub async fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    engine_logging::initialize(cli.log_destination(), cli.log_level());

    let settings = resolve_settings(&cli).context("loading settings")?;
    engine_info!("backend {}", settings.base_url);
    let session = Session::connect(settings).context("starting dashboard session")?;

    // The renderer is just one observer of the store.
    session
        .store()
        .subscribe(Arc::new(TerminalRenderer::stdout()));
    println!("{HELP}");

    let result = input_loop(&session).await;
    session.stop();
    result
}

async fn input_loop(session: &Session) -> anyhow::Result<()> {
    let mut lines = stdin_lines();
    loop {
        let line = tokio::select! {
            line = lines.recv() => line.transpose().context("reading stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            return Ok(());
        };

        match Command::parse(&line) {
            Ok(Command::Query(query)) => session.set_query(query),
            Ok(Command::Location(location)) => session.set_location(location),
            Ok(Command::Search) => {
                // Spawned so input and polling stay live while the search runs.
                let orchestrator = session.orchestrator();
                tokio::spawn(async move { orchestrator.submit().await });
            }
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => return Ok(()),
            Ok(Command::Empty) => {}
            Err(message) => {
                engine_warn!("{}", message);
                eprintln!("{message}");
            }
        }
    }
}
