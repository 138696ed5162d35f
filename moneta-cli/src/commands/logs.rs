//! Logs command - view recent application events

use anyhow::Result;
use chrono::{TimeZone, Utc};
use colored::Colorize;

use super::get_data_dir;
use crate::output;
use moneta_core::{EntryPoint, LoggingService};

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub fn run(limit: usize, errors_only: bool, json: bool) -> Result<()> {
    let data_dir = get_data_dir();
    let service = LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    let entries = if errors_only {
        service.errors(limit)?
    } else {
        service.tail(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No log entries found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Command", "Error"]);
    for entry in entries {
        let error_indicator = if entry.error_message.is_some() {
            "!".red().to_string()
        } else {
            String::new()
        };
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.event,
            entry.command.unwrap_or_default(),
            error_indicator,
        ]);
    }

    println!("{}", table);
    Ok(())
}
