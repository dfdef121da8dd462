use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use growth_map::{
    cli::{execute_command, Cli},
    config::{Config, LogFormat},
    error::{AppError, StorageError},
    gemini::{GeminiAnalyzer, GeminiClient},
    journal::JournalService,
    storage::{FileBackend, JournalStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(path) = &cli.data {
        config.storage.path = path.clone();
    }

    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        data = %config.storage.path.display(),
        "Growth map starting"
    );

    let store = Arc::new(JournalStore::new(FileBackend::from_config(&config.storage)));

    let client = match GeminiClient::new(&config.gemini, config.request.clone()) {
        Ok(c) => {
            info!(base_url = %c.base_url(), model = %c.model(), "Gemini client initialized");
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Gemini client");
            return Err(e.into());
        }
    };

    let service = JournalService::new(store, Arc::new(GeminiAnalyzer::new(client)));

    match execute_command(cli.command, &service).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(AppError::Storage(e @ StorageError::Corrupt { .. })) => {
            error!(error = %e, "Stored document is unreadable");
            eprintln!("{}", e);
            eprintln!(
                "The file at {} was left untouched. Run `growth-map reset --yes` to start over.",
                config.storage.path.display()
            );
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
