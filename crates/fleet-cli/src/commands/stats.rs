use crate::app::AppContext;
use crate::cli::StatsArgs;
use crate::helpers::parse_range;
use crate::output::{print_json, stats_table};

pub fn handle_stats(ctx: &AppContext, args: &StatsArgs) -> anyhow::Result<()> {
    let range = parse_range(&args.range)?;
    let ledger = ctx.open_ledger()?;
    let driver = ledger.driver(args.driver_id)?;
    let stats = ledger.stats(driver.id, range.as_ref())?;

    if args.json {
        return print_json(&stats);
    }
    if !ctx.quiet() {
        match &range {
            Some(range) => println!(
                "{} ({}) {} to {}",
                driver.name, driver.plate, range.start, range.end
            ),
            None => println!("{} ({})", driver.name, driver.plate),
        }
    }
    println!("{}", stats_table(&stats));
    Ok(())
}
