//! Per-driver aggregate statistics.

use serde::{Deserialize, Serialize};

use crate::prices::PriceTable;
use crate::storage::types::FuelRecord;

/// Aggregates over a set of fuel records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelStats {
    /// Fuel cost plus service cost
    pub total_cost: f64,

    /// Odometer span over records with a positive reading
    pub total_distance: f64,

    /// Fuel cost per kilometer travelled
    pub avg_consumption: f64,

    pub total_service_cost: f64,

    /// Liters bought, derived from cost and the unit price
    pub total_liters: f64,
}

/// Compute statistics for a set of records.
///
/// Never fails: records without a usable price contribute zero liters, and a
/// zero distance yields zero consumption.
pub fn compute_stats(records: &[FuelRecord], prices: &PriceTable) -> FuelStats {
    if records.is_empty() {
        return FuelStats::default();
    }

    let total_fuel_cost: f64 = records.iter().map(|r| r.fuel_cost).sum();
    let total_service_cost: f64 = records.iter().map(|r| r.service_cost).sum();

    // Zero readings are entries made without an odometer value; they would
    // drag the minimum down to zero.
    let mut readings: Vec<f64> = records
        .iter()
        .map(|r| r.kilometer)
        .filter(|km| *km > 0.0)
        .collect();
    readings.sort_by(f64::total_cmp);
    let total_distance = match (readings.first(), readings.last()) {
        (Some(min), Some(max)) => max - min,
        _ => 0.0,
    };

    let avg_consumption = if total_distance > 0.0 {
        total_fuel_cost / total_distance
    } else {
        0.0
    };

    let total_liters = records.iter().map(|r| liters_for(r, prices)).sum();

    FuelStats {
        total_cost: total_fuel_cost + total_service_cost,
        total_distance,
        avg_consumption,
        total_service_cost,
        total_liters,
    }
}

fn liters_for(record: &FuelRecord, prices: &PriceTable) -> f64 {
    match prices.get(&record.fuel_type) {
        Some(price) if price > 0.0 && record.fuel_cost > 0.0 => record.fuel_cost / price,
        _ => 0.0,
    }
}
