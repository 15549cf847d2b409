//! Delphi - Application Entry Point
//!
//! Reads a message context as JSON from stdin and prints the selected
//! message, one line per output line. Calendar fields missing from the
//! input come from the local clock. Logs go to stderr.

use std::io::{self, Read, Write};

use anyhow::Context as _;
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delphi::{
    config::{Config, LogFormat, LoggingConfig},
    parse_context, MessageEngineProvider,
};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.logging);

    tracing::debug!(rules_path = %config.rules.path.display(), "Starting delphi");

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read context from stdin")?;

    let context = parse_context(&input, &Local::now())?;

    let provider = MessageEngineProvider::from_config(&config.rules);
    let lines = provider.shared().get_message(&context);

    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}")?;
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.rust_log.clone().into());

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
    }
}
