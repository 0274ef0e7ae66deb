// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewerk — restore tile-scrambled comic pages.
//
// Entry point. Initialises logging, resolves the settings file, and runs the
// requested command.

mod cli;
mod services;

use std::process::ExitCode;

use clap::Parser;

use pagewerk_bridge::observer::report_error;

use cli::{Cli, Commands};
use services::{commands, data_dir};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir::config_path(&data_dir::data_dir()));

    tracing::info!(config = %config_path.display(), "Pagewerk starting");

    let result = match cli.command {
        Commands::Restore(args) => commands::restore(args, &config_path).await,
        Commands::Inspect(args) => commands::inspect(args, &config_path).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}
