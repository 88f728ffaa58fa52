//! Parsing helpers for dates, ranges, and input files.

use std::io::Read;

use chrono::NaiveDate;
use fleet_core::storage::DateRange;

use crate::cli::RangeArgs;
use crate::errors::CliError;

/// Parse a `YYYY-MM-DD` date and return it in canonical form.
pub fn parse_date(value: &str) -> anyhow::Result<String> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CliError::invalid_input(format!("Invalid date (expected YYYY-MM-DD): {}", value))
    })?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Build the optional date range from `--from`/`--to`.
pub fn parse_range(args: &RangeArgs) -> anyhow::Result<Option<DateRange>> {
    match (&args.from, &args.to) {
        (Some(from), Some(to)) => {
            let (start, end) = (parse_date(from)?, parse_date(to)?);
            if start > end {
                return Err(CliError::invalid_input(format!(
                    "Range start {} is after end {}",
                    start, end
                ))
                .into());
            }
            Ok(Some(DateRange::new(start, end)))
        }
        (None, None) => Ok(None),
        _ => Err(CliError::invalid_input("--from and --to must be given together").into()),
    }
}

/// Read a file, or stdin when the path is `-`.
pub fn read_source(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::not_found(
                format!("File not found: {}", path),
                "Hint: Check the path or pass - to read from stdin.",
            )
            .into()
        } else {
            anyhow::anyhow!("Failed to read {}: {}", path, e)
        }
    })
}
