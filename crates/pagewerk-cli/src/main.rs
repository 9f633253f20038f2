// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewerk — command-line PDF page editor
//
// Entry point. Initialises logging, loads configuration, and dispatches the
// subcommand. Errors are reported in plain language on stderr.

mod args;
mod commands;
mod script;
mod services;

use std::process::ExitCode;

use clap::Parser;
use pagewerk_core::error::Result;
use pagewerk_core::human_errors::humanize_error;
use pagewerk_core::types::PageRange;

use args::{Cli, Command};
use services::config_dir::load_config;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "Pagewerk starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, kind = ?err.kind(), "command failed");
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("       {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Info { input } => {
            println!("{}", commands::info(&input, &config)?);
        }
        Command::Edit {
            input,
            script,
            output,
        } => {
            let pages = commands::edit(&input, &script, &output, &config).await?;
            println!("wrote {} ({pages} pages)", output.display());
        }
        Command::Merge { inputs, output } => {
            commands::merge(&inputs, &output, &config)?;
            println!("wrote {}", output.display());
        }
        Command::Split {
            input,
            from,
            to,
            output,
        } => {
            commands::split(&input, PageRange::new(from, to), &output, &config)?;
            println!("wrote {}", output.display());
        }
        Command::SplitAt {
            input,
            after,
            first,
            second,
        } => {
            commands::split_at(&input, after, &first, &second, &config)?;
            println!("wrote {} and {}", first.display(), second.display());
        }
    }
    Ok(())
}
