//! Unit registry
//!
//! Holds every unit type, unit and locale number format, plus the derived
//! superunit graph. A registry is built once and only read afterwards.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::config::{Definitions, BUNDLED_UNITS};
use crate::error::{Error, Result};
use crate::format::{NumberFormat, LOCALES};
use crate::types::{Unit, UnitType};

/// Largest distance from an integer a factor ratio may have to count as one
const RATIO_TOLERANCE: f64 = 1e-6;

static BUNDLED: OnceLock<Arc<Registry>> = OnceLock::new();

/// A larger unit of the same dimension, `ratio` times the size of the subunit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperunitEdge {
    /// Index of the superunit in [`Registry::units`]
    pub unit: usize,
    pub ratio: u32,
}

#[derive(Debug)]
pub struct Registry {
    unit_types: Vec<Arc<UnitType>>,
    /// In declaration order, which is also match priority
    units: Vec<Unit>,
    /// Indexed by subunit
    superunits: Vec<Vec<SuperunitEdge>>,
    formats: Vec<NumberFormat>,
}

impl Registry {
    pub fn from_definitions(defs: &Definitions) -> Result<Self> {
        let mut unit_types: Vec<Arc<UnitType>> = Vec::with_capacity(defs.unit_types.len());
        for def in &defs.unit_types {
            if unit_types.iter().any(|t| t.name() == def.name) {
                return Err(Error::InvalidDefinition(format!(
                    "duplicate unit type '{}'",
                    def.name
                )));
            }
            unit_types.push(Arc::new(UnitType::from_def(def)?));
        }

        let mut names = HashSet::new();
        let mut units = Vec::with_capacity(defs.units.len());
        for def in &defs.units {
            if !names.insert(def.name.as_str()) {
                return Err(Error::InvalidDefinition(format!(
                    "duplicate unit '{}'",
                    def.name
                )));
            }
            let unit_type = unit_types
                .iter()
                .find(|t| t.name() == def.unit_type)
                .ok_or_else(|| {
                    Error::InvalidDefinition(format!(
                        "unit '{}' has unknown type '{}'",
                        def.name, def.unit_type
                    ))
                })?;
            units.push(Unit::from_def(def, Arc::clone(unit_type))?);
        }

        let superunits = superunit_graph(&units);
        let formats = LOCALES
            .iter()
            .map(NumberFormat::new)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "registry: {} unit types, {} units, {} superunit edges",
            unit_types.len(),
            units.len(),
            superunits.iter().map(Vec::len).sum::<usize>()
        );

        Ok(Self {
            unit_types,
            units,
            superunits,
            formats,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_definitions(&Definitions::from_json_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_definitions(&Definitions::from_path(path)?)
    }

    /// Shared registry built from the definitions compiled into the crate
    pub fn bundled() -> Arc<Registry> {
        let registry = BUNDLED.get_or_init(|| {
            Arc::new(
                Self::from_json_str(BUNDLED_UNITS).expect("Bundled unit definitions must be valid"),
            )
        });
        Arc::clone(registry)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit_types(&self) -> &[Arc<UnitType>] {
        &self.unit_types
    }

    /// Look up a unit and its index by friendly name
    pub fn unit_by_name(&self, name: &str) -> Option<(usize, &Unit)> {
        self.units
            .iter()
            .enumerate()
            .find(|(_, u)| u.name() == name)
    }

    /// Superunits of the unit at `index`, in declaration order
    pub fn superunits(&self, index: usize) -> &[SuperunitEdge] {
        self.superunits
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Ratio between a subunit and one of its superunits
    pub fn ratio(&self, subunit: usize, superunit: usize) -> Option<u32> {
        self.superunits(subunit)
            .iter()
            .find(|e| e.unit == superunit)
            .map(|e| e.ratio)
    }

    pub fn number_format(&self, locale: &str) -> Result<&NumberFormat> {
        self.formats
            .iter()
            .find(|f| f.name() == locale)
            .ok_or_else(|| Error::UnknownLocale(locale.to_string()))
    }

    pub fn number_formats(&self) -> &[NumberFormat] {
        &self.formats
    }

    /// Unit names grouped by unit type, both in declaration order
    pub fn units_by_type(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for unit in &self.units {
            let type_name = unit.unit_type().name();
            match groups.iter_mut().find(|(name, _)| *name == type_name) {
                Some((_, names)) => names.push(unit.name()),
                None => groups.push((type_name, vec![unit.name()])),
            }
        }
        groups
    }
}

fn superunit_graph(units: &[Unit]) -> Vec<Vec<SuperunitEdge>> {
    units
        .iter()
        .enumerate()
        .map(|(sub_index, sub)| {
            units
                .iter()
                .enumerate()
                .filter_map(|(sup_index, sup)| {
                    if sup_index == sub_index
                        || sub.is_affine()
                        || sup.is_affine()
                        || !Arc::ptr_eq(sub.unit_type(), sup.unit_type())
                    {
                        return None;
                    }
                    let ratio = sup.factor() / sub.factor();
                    let rounded = ratio.round();
                    if (rounded - ratio).abs() >= RATIO_TOLERANCE
                        || rounded <= 1.0
                        || rounded > f64::from(u32::MAX)
                    {
                        return None;
                    }
                    tracing::trace!("{} is {} {}", sup.name(), rounded, sub.name());
                    Some(SuperunitEdge {
                        unit: sup_index,
                        ratio: rounded as u32,
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SMALL: &str = r#"{
        "unit_types": [
            {"name": "distance", "multiples": [{"factor": 1, "label": "m"}]},
            {"name": "temperature", "multiples": [{"factor": 1, "label": "°C"}]}
        ],
        "units": [
            {"name": "inch", "pattern": "inch(?:es)?", "type": "distance", "si_mul": 0.0254},
            {"name": "foot", "pattern": "f(?:oo|ee)?t", "type": "distance", "si_mul": 0.3048},
            {"name": "yard", "pattern": "yards?", "type": "distance", "si_mul": 0.9144},
            {"name": "metre-ish", "pattern": "mtr", "type": "distance", "si_mul": 1.0},
            {"name": "fahrenheit", "pattern": "°F", "type": "temperature",
             "si_mul": 0.5555555555555556, "si_add": -32},
            {"name": "rankine", "pattern": "°R", "type": "temperature", "si_mul": 0.5555555555555556}
        ]
    }"#;

    fn names(registry: &Registry, edges: &[SuperunitEdge]) -> Vec<(String, u32)> {
        edges
            .iter()
            .map(|e| (registry.units()[e.unit].name().to_string(), e.ratio))
            .collect()
    }

    #[test]
    fn test_superunit_graph() {
        let registry = Registry::from_json_str(SMALL).unwrap();
        let (inch, _) = registry.unit_by_name("inch").unwrap();
        let (foot, _) = registry.unit_by_name("foot").unwrap();
        assert_eq!(
            names(&registry, registry.superunits(inch)),
            vec![("foot".to_string(), 12), ("yard".to_string(), 36)]
        );
        assert_eq!(
            names(&registry, registry.superunits(foot)),
            vec![("yard".to_string(), 3)]
        );
        assert_eq!(registry.ratio(inch, foot), Some(12));
    }

    #[test]
    fn test_non_integer_ratio_has_no_edge() {
        let registry = Registry::from_json_str(SMALL).unwrap();
        let (yard, _) = registry.unit_by_name("yard").unwrap();
        assert!(registry.superunits(yard).is_empty());
    }

    #[test]
    fn test_offset_units_excluded() {
        let registry = Registry::from_json_str(SMALL).unwrap();
        for (index, unit) in registry.units().iter().enumerate() {
            for edge in registry.superunits(index) {
                assert!(!unit.is_affine());
                assert!(!registry.units()[edge.unit].is_affine());
            }
        }
        let (fahrenheit, _) = registry.unit_by_name("fahrenheit").unwrap();
        let (rankine, _) = registry.unit_by_name("rankine").unwrap();
        assert!(registry.superunits(fahrenheit).is_empty());
        assert!(registry.superunits(rankine).is_empty());
    }

    #[test]
    fn test_invalid_definitions() {
        let unknown_type = r#"{"unit_types": [], "units": [
            {"name": "inch", "pattern": "in", "type": "distance", "si_mul": 0.0254}]}"#;
        assert!(matches!(
            Registry::from_json_str(unknown_type),
            Err(Error::InvalidDefinition(_))
        ));

        let duplicate = r#"{"unit_types": [{"name": "d", "multiples": [{"factor": 1, "label": "m"}]}],
            "units": [
                {"name": "inch", "pattern": "in", "type": "d", "si_mul": 0.0254},
                {"name": "inch", "pattern": "inches", "type": "d", "si_mul": 0.0254}]}"#;
        assert!(matches!(
            Registry::from_json_str(duplicate),
            Err(Error::InvalidDefinition(_))
        ));

        assert!(matches!(
            Registry::from_json_str("{not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_number_formats() {
        let registry = Registry::bundled();
        assert_eq!(registry.number_format("de-DE").unwrap().name(), "de-DE");
        assert!(matches!(
            registry.number_format("xx-XX"),
            Err(Error::UnknownLocale(_))
        ));
    }

    #[test]
    fn test_bundled_definitions_valid() {
        let registry = Registry::from_json_str(BUNDLED_UNITS);
        assert!(registry.is_ok(), "{:?}", registry.err());
        for unit_type in registry.unwrap().unit_types() {
            assert!(
                unit_type.multiples().iter().any(|m| m.factor == 1.0),
                "{} has no base multiple",
                unit_type.name()
            );
        }
    }

    #[test]
    fn test_bundled_velocity_labels() {
        let registry = Registry::from_json_str(BUNDLED_UNITS).unwrap();
        let velocity = registry
            .unit_types()
            .iter()
            .find(|t| t.name() == "velocity")
            .unwrap();
        assert_eq!(velocity.multiple_for(26.8).label, "km/h");
        assert_eq!(velocity.multiple_for(3000.0).label, "m/s");
        assert_eq!(velocity.multiple_for(11_000.0).label, "km/s");
    }

    #[test]
    fn test_bundled_registry() {
        let registry = Registry::bundled();
        let (ounce, _) = registry.unit_by_name("ounce").unwrap();
        let (pound, _) = registry.unit_by_name("pound").unwrap();
        assert_eq!(registry.ratio(ounce, pound), Some(16));

        let (gallon, _) = registry.unit_by_name("gallon").unwrap();
        let (fluid_ounce, _) = registry.unit_by_name("fluid ounce").unwrap();
        assert_eq!(registry.ratio(fluid_ounce, gallon), Some(128));

        let (cal, calorie) = registry.unit_by_name("calorie").unwrap();
        let (kcal, _) = registry.unit_by_name("kilocalorie").unwrap();
        assert!(calorie.is_case_sensitive());
        assert_eq!(registry.ratio(cal, kcal), Some(1000));
    }

    #[test]
    fn test_units_by_type() {
        let registry = Registry::from_json_str(SMALL).unwrap();
        assert_eq!(
            registry.units_by_type(),
            vec![
                ("distance", vec!["inch", "foot", "yard", "metre-ish"]),
                ("temperature", vec!["fahrenheit", "rankine"]),
            ]
        );
    }
}
