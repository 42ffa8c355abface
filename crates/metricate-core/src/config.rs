//! Unit and unit-type definition documents
//!
//! Definitions are plain serde documents so they can live in JSON files.
//! A default set ships inside the crate (see [`BUNDLED_UNITS`]).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Definitions compiled into the crate
pub const BUNDLED_UNITS: &str = include_str!("data/units.json");

fn default_threshold() -> f64 {
    0.5
}

/// One display multiple of a unit type (e.g., `1000` -> `"km"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleDef {
    pub factor: f64,
    pub label: String,
    /// Fraction of `factor` a value must exceed before this multiple is used
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// A dimension and the SI labels it renders with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTypeDef {
    pub name: String,
    pub multiples: Vec<MultipleDef>,
}

/// A non-SI unit recognized in text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDef {
    #[serde(alias = "Name")]
    pub name: String,
    /// Regular expression matching the unit token
    #[serde(alias = "Regex")]
    pub pattern: String,
    #[serde(rename = "type", alias = "Type")]
    pub unit_type: String,
    /// SI value = (value + si_add) * si_mul
    #[serde(alias = "SI mul")]
    pub si_mul: f64,
    #[serde(default, alias = "SI add")]
    pub si_add: f64,
    #[serde(default)]
    pub case_sensitive: bool,
}

/// A complete definition document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definitions {
    pub unit_types: Vec<UnitTypeDef>,
    pub units: Vec<UnitDef>,
}

impl Definitions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_UNITS)
    }
}
