// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pagewerk - deterministic PDF page editor
#[derive(Parser, Debug)]
#[command(name = "pagewerk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to $XDG_CONFIG_HOME/pagewerk/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show page count, rotations, and fingerprint of a document
    Info {
        input: PathBuf,
    },

    /// Replay a JSON edit script against a document
    Edit {
        input: PathBuf,
        /// Edit script (see the `script` module for the format)
        #[arg(long)]
        script: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Concatenate two or more documents
    Merge {
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Extract an inclusive 1-indexed page range
    Split {
        input: PathBuf,
        #[arg(long)]
        from: u32,
        #[arg(long)]
        to: u32,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split a document in two after the given page
    SplitAt {
        input: PathBuf,
        #[arg(long)]
        after: u32,
        /// Output for pages 1..=after
        #[arg(long)]
        first: PathBuf,
        /// Output for the remaining pages
        #[arg(long)]
        second: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn merge_needs_two_inputs() {
        assert!(Cli::try_parse_from(["pagewerk", "merge", "a.pdf", "-o", "out.pdf"]).is_err());
        let cli = Cli::try_parse_from(["pagewerk", "merge", "a.pdf", "b.pdf", "-o", "out.pdf"]).unwrap();
        assert!(matches!(cli.command, Command::Merge { ref inputs, .. } if inputs.len() == 2));
    }

    #[test]
    fn config_is_global() {
        let cli = Cli::try_parse_from(["pagewerk", "info", "a.pdf", "--config", "c.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
    }
}
