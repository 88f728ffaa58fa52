use fleet_core::storage::DriverDraft;

use crate::app::AppContext;
use crate::errors::CliError;
use crate::helpers::read_source;
use crate::output::{drivers_table, print_json};

pub fn handle_list(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let ledger = ctx.open_ledger()?;
    let drivers = ledger.drivers()?;
    if json {
        return print_json(&drivers);
    }
    if drivers.is_empty() {
        if !ctx.quiet() {
            println!("No drivers.");
        }
        return Ok(());
    }
    println!("{}", drivers_table(&drivers));
    Ok(())
}

pub fn handle_apply(ctx: &AppContext, file: &str, json: bool) -> anyhow::Result<()> {
    let contents = read_source(file)?;
    let drafts: Vec<DriverDraft> = serde_json::from_str(&contents)
        .map_err(|e| CliError::invalid_input(format!("Invalid driver list in {}: {}", file, e)))?;

    let ledger = ctx.open_ledger()?;
    let drivers = ledger.reconcile_drivers(&drafts)?;
    if json {
        return print_json(&drivers);
    }
    if !ctx.quiet() {
        println!("Driver set saved ({} drivers)", drivers.len());
        if !drivers.is_empty() {
            println!("{}", drivers_table(&drivers));
        }
    }
    Ok(())
}
