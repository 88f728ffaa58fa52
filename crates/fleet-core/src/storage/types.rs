//! Core data types for the storage layer.

use serde::{Deserialize, Serialize};

/// A driver and the vehicle assigned to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Row id, stable for the driver's lifetime
    pub id: i64,

    /// Display name
    pub name: String,

    /// License plate, unique across drivers (case-sensitive)
    pub plate: String,

    /// Vehicle class label (e.g., "L-300")
    pub vehicle_class: String,

    /// Default fuel type label (e.g., "Solar")
    pub fuel_type: String,
}

/// A driver as submitted for reconciliation.
///
/// `id: None`, or an id that does not exist in the store, means "insert".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverDraft {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub plate: String,
    pub vehicle_class: String,
    pub fuel_type: String,
}

impl DriverDraft {
    pub fn new(
        name: impl Into<String>,
        plate: impl Into<String>,
        vehicle_class: impl Into<String>,
        fuel_type: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            plate: plate.into(),
            vehicle_class: vehicle_class.into(),
            fuel_type: fuel_type.into(),
        }
    }

    /// Target an existing driver row.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl From<Driver> for DriverDraft {
    fn from(driver: Driver) -> Self {
        Self {
            id: Some(driver.id),
            name: driver.name,
            plate: driver.plate,
            vehicle_class: driver.vehicle_class,
            fuel_type: driver.fuel_type,
        }
    }
}

/// A stored fuel-expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelRecord {
    pub id: i64,

    /// Owning driver
    pub driver_id: i64,

    /// Calendar date, `YYYY-MM-DD`
    pub date: String,

    /// Plate at time of entry (not re-validated against the driver)
    pub plate: String,

    pub fuel_cost: f64,

    /// Odometer reading
    pub kilometer: f64,

    pub fuel_type: String,

    /// Granite load quantity (boxes)
    pub granit: f64,

    /// Ceramic load quantity (boxes)
    pub keramik: f64,

    pub service_type: String,

    pub service_cost: f64,
}

/// Builder for inserting a fuel record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFuelRecord {
    pub driver_id: i64,
    pub date: String,
    pub plate: String,
    #[serde(default)]
    pub fuel_cost: f64,
    #[serde(default)]
    pub kilometer: f64,
    pub fuel_type: String,
    #[serde(default)]
    pub granit: f64,
    #[serde(default)]
    pub keramik: f64,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub service_cost: f64,
}

impl NewFuelRecord {
    /// Create a record with zeroed amounts and no service entry.
    pub fn new(
        driver_id: i64,
        date: impl Into<String>,
        plate: impl Into<String>,
        fuel_type: impl Into<String>,
    ) -> Self {
        Self {
            driver_id,
            date: date.into(),
            plate: plate.into(),
            fuel_cost: 0.0,
            kilometer: 0.0,
            fuel_type: fuel_type.into(),
            granit: 0.0,
            keramik: 0.0,
            service_type: String::new(),
            service_cost: 0.0,
        }
    }

    pub fn fuel_cost(mut self, fuel_cost: f64) -> Self {
        self.fuel_cost = fuel_cost;
        self
    }

    pub fn kilometer(mut self, kilometer: f64) -> Self {
        self.kilometer = kilometer;
        self
    }

    pub fn loads(mut self, granit: f64, keramik: f64) -> Self {
        self.granit = granit;
        self.keramik = keramik;
        self
    }

    pub fn service(mut self, service_type: impl Into<String>, service_cost: f64) -> Self {
        self.service_type = service_type.into();
        self.service_cost = service_cost;
        self
    }
}

/// Partial update for a fuel record. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelRecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kilometer: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keramik: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_cost: Option<f64>,
}

impl FuelRecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.fuel_cost.is_none()
            && self.kilometer.is_none()
            && self.fuel_type.is_none()
            && self.granit.is_none()
            && self.keramik.is_none()
            && self.service_type.is_none()
            && self.service_cost.is_none()
    }

    /// Apply the supplied fields to an in-memory record.
    pub fn apply_to(&self, record: &mut FuelRecord) {
        if let Some(ref date) = self.date {
            record.date = date.clone();
        }
        if let Some(fuel_cost) = self.fuel_cost {
            record.fuel_cost = fuel_cost;
        }
        if let Some(kilometer) = self.kilometer {
            record.kilometer = kilometer;
        }
        if let Some(ref fuel_type) = self.fuel_type {
            record.fuel_type = fuel_type.clone();
        }
        if let Some(granit) = self.granit {
            record.granit = granit;
        }
        if let Some(keramik) = self.keramik {
            record.keramik = keramik;
        }
        if let Some(ref service_type) = self.service_type {
            record.service_type = service_type.clone();
        }
        if let Some(service_cost) = self.service_cost {
            record.service_cost = service_cost;
        }
    }
}

/// Inclusive date window, both bounds `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn contains(&self, date: &str) -> bool {
        self.start.as_str() <= date && date <= self.end.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FuelRecord {
        FuelRecord {
            id: 1,
            driver_id: 1,
            date: "2024-01-01".to_string(),
            plate: "X-1".to_string(),
            fuel_cost: 100.0,
            kilometer: 50.0,
            fuel_type: "Diesel".to_string(),
            granit: 0.0,
            keramik: 0.0,
            service_type: String::new(),
            service_cost: 0.0,
        }
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut rec = record();
        let patch = FuelRecordPatch {
            kilometer: Some(75.0),
            service_type: Some("oil".to_string()),
            ..FuelRecordPatch::default()
        };

        patch.apply_to(&mut rec);

        assert_eq!(rec.kilometer, 75.0);
        assert_eq!(rec.service_type, "oil");
        assert_eq!(rec.fuel_cost, 100.0);
        assert_eq!(rec.date, "2024-01-01");
    }

    #[test]
    fn test_empty_patch() {
        assert!(FuelRecordPatch::new().is_empty());
        let patch = FuelRecordPatch {
            granit: Some(0.0),
            ..FuelRecordPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_deserializes_from_sparse_json() {
        let patch: FuelRecordPatch =
            serde_json::from_str(r#"{"fuel_cost": 12.5}"#).expect("valid patch");
        assert_eq!(patch.fuel_cost, Some(12.5));
        assert!(patch.date.is_none());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new("2024-01-01", "2024-01-31");
        assert!(range.contains("2024-01-01"));
        assert!(range.contains("2024-01-31"));
        assert!(!range.contains("2024-02-01"));
    }

    #[test]
    fn test_driver_draft_without_id_deserializes() {
        let draft: DriverDraft = serde_json::from_str(
            r#"{"name":"A","plate":"X-1","vehicle_class":"Truck","fuel_type":"Diesel"}"#,
        )
        .expect("valid draft");
        assert_eq!(draft.id, None);
    }
}
