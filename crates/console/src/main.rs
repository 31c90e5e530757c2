//! `marches-console` -- command-line client of the procurement dashboard.
//!
//! Configuration is read from the environment (see [`marches_console::config`]).
//! Logs go to stderr so that command output can be piped.

use marches_console::args::Command;
use marches_console::commands;
use marches_console::config::ConsoleConfig;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marches_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = Command::parse(std::env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(2);
    });

    let config = ConsoleConfig::from_env();
    tracing::debug!(api_url = %config.api_url, ?command, "Starting marches-console");

    let result = match command {
        Command::Watch => commands::watch(&config).await,
        other => commands::run(other, &config).await.map(|out| print!("{out}")),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Erreur : {e:#}");
        std::process::exit(1);
    }
}
