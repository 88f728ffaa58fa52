use fleet_core::storage::{FuelRecordPatch, NewFuelRecord};

use crate::app::AppContext;
use crate::cli::{RecordAddArgs, RecordEditArgs, RecordListArgs};
use crate::helpers::{parse_date, parse_range};
use crate::output::{print_json, records_table};

pub fn handle_list(ctx: &AppContext, args: &RecordListArgs) -> anyhow::Result<()> {
    let range = parse_range(&args.range)?;
    let ledger = ctx.open_ledger()?;
    ledger.driver(args.driver_id)?;
    let records = ledger.records(args.driver_id, range.as_ref())?;
    if args.json {
        return print_json(&records);
    }
    if records.is_empty() {
        if !ctx.quiet() {
            println!("No records.");
        }
        return Ok(());
    }
    println!("{}", records_table(&records));
    Ok(())
}

pub fn handle_add(ctx: &AppContext, args: &RecordAddArgs) -> anyhow::Result<()> {
    let date = match args.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let ledger = ctx.open_ledger()?;
    let driver = ledger.driver(args.driver)?;
    let plate = args.plate.clone().unwrap_or(driver.plate);
    let fuel_type = args.fuel_type.clone().unwrap_or(driver.fuel_type);

    let new_record = NewFuelRecord::new(driver.id, date, plate, fuel_type)
        .fuel_cost(args.fuel_cost)
        .kilometer(args.kilometer)
        .loads(args.granit, args.keramik)
        .service(args.service_type.clone(), args.service_cost);
    let record = ledger.add_record(&new_record)?;

    if args.json {
        return print_json(&record);
    }
    if !ctx.quiet() {
        println!("Added record {} for {} on {}", record.id, record.plate, record.date);
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &RecordEditArgs) -> anyhow::Result<()> {
    let patch = FuelRecordPatch {
        date: args.date.as_deref().map(parse_date).transpose()?,
        fuel_cost: args.fuel_cost,
        kilometer: args.kilometer,
        fuel_type: args.fuel_type.clone(),
        granit: args.granit,
        keramik: args.keramik,
        service_type: args.service_type.clone(),
        service_cost: args.service_cost,
    };

    let ledger = ctx.open_ledger()?;
    let record = ledger.update_record(args.id, &patch)?;

    if args.json {
        return print_json(&record);
    }
    if !ctx.quiet() {
        println!("Updated record {}", record.id);
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, id: i64) -> anyhow::Result<()> {
    let ledger = ctx.open_ledger()?;
    ledger.delete_record(id)?;
    if !ctx.quiet() {
        println!("Deleted record {}", id);
    }
    Ok(())
}
