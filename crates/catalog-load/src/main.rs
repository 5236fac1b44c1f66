//! Catalog Load - dummy record loader

use catalog_common::logging::{init_logging, LogConfig, LogLevel};
use catalog_load::cli::{execute, exit_code, Cli, EXIT_FAILURE};
use catalog_load::config::LoadConfig;
use clap::Parser;
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("catalog-load")
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    let guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        },
    };

    let format = match cli.package_format() {
        Ok(format) => format,
        Err(e) => {
            error!(error = %e, "Refusing to start");
            drop(guard);
            process::exit(EXIT_FAILURE);
        },
    };

    let config = match LoadConfig::from_env().and_then(|config| cli.apply(config)) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Error starting loader");
            drop(guard);
            process::exit(EXIT_FAILURE);
        },
    };

    let result = execute(&cli, format, &config, tokio::io::stdin()).await;

    // Give buffered output a moment to drain before exiting
    tokio::time::sleep(config.exit_grace).await;

    drop(guard);
    process::exit(exit_code(&result));
}
