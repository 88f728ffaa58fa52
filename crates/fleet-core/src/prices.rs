//! Fuel price lookup.
//!
//! Prices live in the `[FuelPrices]` section of a TOML file and are read
//! again on every `load`, so edits apply to the next statistics or export
//! request without a restart. A missing file or section is an empty table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FleetError, Result};

/// Name of the TOML table holding fuel prices.
pub const PRICE_SECTION: &str = "FuelPrices";

/// Fuel type name -> unit price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    prices: BTreeMap<String, f64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a price; the key is normalized like configuration keys.
    pub fn with_price(mut self, fuel_type: &str, price: f64) -> Self {
        self.prices.insert(normalize_fuel_type(fuel_type), price);
        self
    }

    /// Look up the unit price for a fuel type.
    pub fn get(&self, fuel_type: &str) -> Option<f64> {
        self.prices.get(fuel_type).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Parse the `[FuelPrices]` section out of a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let document: toml::Table = contents
            .parse()
            .map_err(|e| FleetError::InvalidInput(format!("Invalid price config: {}", e)))?;

        let section = match document.get(PRICE_SECTION) {
            Some(toml::Value::Table(section)) => section,
            Some(_) => {
                return Err(FleetError::InvalidInput(format!(
                    "[{}] must be a table",
                    PRICE_SECTION
                )))
            }
            None => return Ok(Self::new()),
        };

        let mut table = Self::new();
        for (key, value) in section {
            let price = match value {
                toml::Value::Float(price) => *price,
                toml::Value::Integer(price) => *price as f64,
                other => {
                    return Err(FleetError::InvalidInput(format!(
                        "Price for {} must be a number (got {})",
                        key, other
                    )))
                }
            };
            table.prices.insert(normalize_fuel_type(key), price);
        }
        Ok(table)
    }
}

impl FromIterator<(String, f64)> for PriceTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            prices: iter
                .into_iter()
                .map(|(name, price)| (normalize_fuel_type(&name), price))
                .collect(),
        }
    }
}

/// Normalize a configured fuel type: first character upper-case, the rest lower-case.
pub fn normalize_fuel_type(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Source of the current price table.
pub trait PriceSource: Send + Sync {
    fn load(&self) -> Result<PriceTable>;
}

/// A fixed table is its own source.
impl PriceSource for PriceTable {
    fn load(&self) -> Result<PriceTable> {
        Ok(self.clone())
    }
}

/// Prices read from a TOML file on every load.
#[derive(Debug, Clone)]
pub struct TomlPriceFile {
    path: PathBuf,
}

impl TomlPriceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceSource for TomlPriceFile {
    fn load(&self) -> Result<PriceTable> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no price file, using empty price table");
                return Ok(PriceTable::new());
            }
            Err(err) => return Err(err.into()),
        };
        PriceTable::from_toml_str(&contents)
    }
}
