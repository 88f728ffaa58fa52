//! Text and table output for drivers, records, stats, and backups.

use std::io::IsTerminal;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table as ComfyTable};
use fleet_core::storage::{Driver, FuelRecord};
use fleet_core::{BackupFile, FuelStats};

fn render(headers: &[&str], rows: Vec<Vec<String>>, pretty: bool) -> String {
    if !pretty {
        return rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n");
    }
    let mut table = ComfyTable::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

fn pretty() -> bool {
    std::io::stdout().is_terminal()
}

pub fn drivers_table(drivers: &[Driver]) -> String {
    drivers_table_with(drivers, pretty())
}

fn drivers_table_with(drivers: &[Driver], pretty: bool) -> String {
    let rows = drivers
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.name.clone(),
                d.plate.clone(),
                d.vehicle_class.clone(),
                d.fuel_type.clone(),
            ]
        })
        .collect();
    render(&["ID", "Name", "Plate", "Class", "Fuel"], rows, pretty)
}

pub fn records_table(records: &[FuelRecord]) -> String {
    records_table_with(records, pretty())
}

fn records_table_with(records: &[FuelRecord], pretty: bool) -> String {
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.clone(),
                r.plate.clone(),
                r.kilometer.to_string(),
                r.fuel_cost.to_string(),
                r.fuel_type.clone(),
                r.granit.to_string(),
                r.keramik.to_string(),
                r.service_type.clone(),
                r.service_cost.to_string(),
            ]
        })
        .collect();
    render(
        &[
            "ID", "Date", "Plate", "Km", "Fuel Cost", "Fuel", "Granit", "Keramik", "Service",
            "Service Cost",
        ],
        rows,
        pretty,
    )
}

pub fn stats_table(stats: &FuelStats) -> String {
    stats_table_with(stats, pretty())
}

fn stats_table_with(stats: &FuelStats, pretty: bool) -> String {
    let rows = vec![
        vec!["Total distance".to_string(), format!("{:.2}", stats.total_distance)],
        vec!["Total cost".to_string(), format!("{:.2}", stats.total_cost)],
        vec!["Total liters".to_string(), format!("{:.2}", stats.total_liters)],
        vec!["Cost per km".to_string(), format!("{:.4}", stats.avg_consumption)],
        vec!["Total service cost".to_string(), format!("{:.2}", stats.total_service_cost)],
    ];
    render(&["Metric", "Value"], rows, pretty)
}

pub fn backups_table(backups: &[BackupFile]) -> String {
    backups_table_with(backups, pretty())
}

fn backups_table_with(backups: &[BackupFile], pretty: bool) -> String {
    let rows = backups
        .iter()
        .map(|b| {
            vec![
                b.file_name.clone(),
                b.category
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                b.size_bytes.to_string(),
            ]
        })
        .collect();
    render(&["File", "Category", "Bytes"], rows, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> Driver {
        Driver {
            id: 1,
            name: "PRAPTO".to_string(),
            plate: "AE 9481 BD".to_string(),
            vehicle_class: "L-300".to_string(),
            fuel_type: "Solar".to_string(),
        }
    }

    #[test]
    fn test_plain_drivers_are_tab_separated() {
        let text = drivers_table_with(&[driver()], false);
        assert_eq!(text, "1\tPRAPTO\tAE 9481 BD\tL-300\tSolar");
    }

    #[test]
    fn test_pretty_drivers_have_header() {
        let text = drivers_table_with(&[driver()], true);
        assert!(text.contains("Plate"));
        assert!(text.contains("AE 9481 BD"));
    }

    #[test]
    fn test_plain_stats_rounds_values() {
        let stats = FuelStats {
            total_cost: 300.0,
            total_distance: 100.0,
            avg_consumption: 1.0 / 3.0,
            total_service_cost: 0.0,
            total_liters: 30.0,
        };
        let text = stats_table_with(&stats, false);
        assert!(text.contains("Total distance\t100.00"));
        assert!(text.contains("Total cost\t300.00"));
        assert!(text.contains("Cost per km\t0.3333"));
        assert!(!text.contains("fuel cost"));
    }

    #[test]
    fn test_empty_plain_table_is_empty() {
        assert_eq!(records_table_with(&[], false), "");
        assert_eq!(backups_table_with(&[], false), "");
    }
}
