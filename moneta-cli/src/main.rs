//! Moneta CLI - currency conversion in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{convert, logs, rates, shell};

/// Moneta - currency conversion in your terminal
#[derive(Parser)]
#[command(name = "moneta", version, about, long_about = None)]
struct Cli {
    /// Subcommand; omit to launch the interactive shell
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the exchange rate table
    Rates {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert an amount between two currencies (requires login)
    Convert {
        /// Source currency code (e.g. USD)
        from: String,
        /// Target currency code (e.g. EUR)
        to: String,
        /// Amount in the source currency
        amount: f64,
        /// Username (password from MONETA_PASSWORD or prompt)
        #[arg(short, long)]
        username: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent log entries
    Logs {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => shell::run(),
        Some(Commands::Rates { json }) => rates::run(json),
        Some(Commands::Convert {
            from,
            to,
            amount,
            username,
            json,
        }) => convert::run(&from, &to, amount, username, json),
        Some(Commands::Logs { limit, errors, json }) => logs::run(limit, errors, json),
    }
}
