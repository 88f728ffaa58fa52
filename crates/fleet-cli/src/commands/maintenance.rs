//! Backup, restore, and integrity commands.

use std::io::IsTerminal;
use std::path::Path;

use fleet_core::LedgerStore;

use crate::app::AppContext;
use crate::cli::RestoreArgs;
use crate::errors::CliError;
use crate::output::{backups_table, print_json};

pub fn handle_backup_create(ctx: &AppContext) -> anyhow::Result<()> {
    let ledger = ctx.open_ledger()?;
    let path = ledger.manual_backup()?;
    if ctx.quiet() {
        println!("{}", path.display());
    } else {
        println!("Backed up store to {}", path.display());
    }
    Ok(())
}

pub fn handle_backup_list(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let ledger = ctx.open_ledger()?;
    let backups = ledger.list_backups()?;
    if json {
        return print_json(&backups);
    }
    if backups.is_empty() {
        if !ctx.quiet() {
            println!("No backups in {}", ledger.backups().backup_dir().display());
        }
        return Ok(());
    }
    println!("{}", backups_table(&backups));
    Ok(())
}

pub fn handle_restore(ctx: &AppContext, args: &RestoreArgs) -> anyhow::Result<()> {
    let source = Path::new(&args.file);
    let ledger = ctx.open_ledger()?;

    if !args.yes && std::io::stdin().is_terminal() && !ctx.quiet() {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Replace {} with {}?",
                ledger.backups().store_path().display(),
                source.display()
            ))
            .default(false)
            .interact()?;
        if !proceed {
            return Err(CliError::invalid_input("Restore cancelled").into());
        }
    }

    let rescue = ledger.restore(source)?;
    if !ctx.quiet() {
        println!("Restored store from {}", source.display());
        println!("Previous store saved to {}", rescue.display());
    }
    Ok(())
}

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let ledger = ctx.open_ledger()?;
    match ledger.store().check_integrity() {
        Ok(()) => {
            if !ctx.quiet() {
                println!("Integrity check: OK");
                println!("- pages: OK");
                println!("- foreign keys: OK");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("Integrity check: FAILED");
            eprintln!("- error: {}", err);
            eprintln!("Hint: Restore from a backup with `fleet restore <file>`.");
            Err(CliError::IntegrityFailed("Integrity check failed".to_string()).into())
        }
    }
}
