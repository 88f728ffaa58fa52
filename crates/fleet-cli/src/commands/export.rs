//! CSV export commands.

use std::path::{Path, PathBuf};

use fleet_core::storage::DateRange;
use fleet_core::{CsvDirectoryWriter, ExportSheet};

use crate::app::{AppContext, Ledger};
use crate::cli::{ExportCommands, RangeArgs};
use crate::helpers::parse_range;

pub fn handle_export(ctx: &AppContext, command: &ExportCommands) -> anyhow::Result<()> {
    let stamp = chrono::Local::now().format("%Y%m%d").to_string();
    let written = match command {
        ExportCommands::Driver {
            driver_id,
            range,
            output,
        } => {
            let (ledger, range) = open(ctx, range)?;
            export_driver(&ledger, *driver_id, range.as_ref(), Path::new(output), &stamp)?
        }
        ExportCommands::All { range, output } => {
            let (ledger, range) = open(ctx, range)?;
            export_all(&ledger, range.as_ref(), Path::new(output), &stamp)?
        }
    };

    for path in &written {
        if ctx.quiet() {
            println!("{}", path.display());
        } else {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn open(ctx: &AppContext, range: &RangeArgs) -> anyhow::Result<(Ledger, Option<DateRange>)> {
    let range = parse_range(range)?;
    Ok((ctx.open_ledger()?, range))
}

/// Write one driver's sheet as `export_{plate}_{stamp}.csv`.
fn export_driver(
    ledger: &Ledger,
    driver_id: i64,
    range: Option<&DateRange>,
    output: &Path,
    stamp: &str,
) -> anyhow::Result<Vec<PathBuf>> {
    let driver = ledger.driver(driver_id)?;
    let sheet = ledger.export_driver(driver.id, range)?;
    let sheet = ExportSheet {
        label: driver_file_label(&driver.plate, stamp),
        ..sheet
    };
    let mut writer = CsvDirectoryWriter::new(output)?;
    sheet.write_to(&mut writer)?;
    Ok(writer.into_written())
}

/// Write every driver's sheet into `export_all_drivers_{stamp}/`.
fn export_all(
    ledger: &Ledger,
    range: Option<&DateRange>,
    output: &Path,
    stamp: &str,
) -> anyhow::Result<Vec<PathBuf>> {
    let sheets = ledger.export_all(range)?;
    if sheets.is_empty() {
        tracing::info!("no driver has records in the selected range");
        return Ok(Vec::new());
    }
    let mut writer = CsvDirectoryWriter::new(output.join(format!("export_all_drivers_{}", stamp)))?;
    for sheet in &sheets {
        sheet.write_to(&mut writer)?;
    }
    Ok(writer.into_written())
}

fn driver_file_label(plate: &str, stamp: &str) -> String {
    let plate: String = plate
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(*c, '/' | '\\'))
        .collect();
    format!("export_{}_{}", plate, stamp)
}
