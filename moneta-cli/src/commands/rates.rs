//! Rates command - show the currency table

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    if json {
        let rates: serde_json::Map<String, serde_json::Value> = ctx
            .table
            .entries()
            .map(|(code, rate)| (code.to_string(), serde_json::json!(rate)))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "base": ctx.table.base(),
                "rates": rates,
            }))?
        );
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec![
        "Code".to_string(),
        format!("Rate per {}", ctx.table.base()),
    ]);
    for (code, rate) in ctx.table.entries() {
        table.add_row(vec![code.to_string(), format!("{}", rate)]);
    }

    println!("{}", table);
    println!("Base currency: {}", ctx.table.base());
    Ok(())
}
