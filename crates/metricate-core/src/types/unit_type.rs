//! SI dimensions and the labels their values render with

use crate::config::UnitTypeDef;
use crate::error::{Error, Result};
use crate::types::PrecisionNumber;

/// A display multiple (e.g., 1000 -> "km")
#[derive(Debug, Clone, PartialEq)]
pub struct Multiple {
    pub factor: f64,
    pub label: String,
    pub threshold: f64,
}

/// A dimension such as distance or mass
#[derive(Debug, Clone)]
pub struct UnitType {
    name: String,
    /// Sorted largest factor first
    multiples: Vec<Multiple>,
}

impl UnitType {
    /// Build a unit type. The multiples must include the base factor 1.
    pub fn new(name: impl Into<String>, mut multiples: Vec<Multiple>) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: &str| Error::InvalidDefinition(format!("unit type '{name}': {reason}"));

        if multiples.is_empty() {
            return Err(invalid("no multiples"));
        }
        for m in &multiples {
            if !m.factor.is_finite() || m.factor <= 0.0 {
                return Err(invalid(&format!("factor {} of '{}' is not positive", m.factor, m.label)));
            }
            if !m.threshold.is_finite() || m.threshold < 0.0 {
                return Err(invalid(&format!("threshold of '{}' is negative", m.label)));
            }
        }
        multiples.sort_by(|a, b| b.factor.total_cmp(&a.factor));
        if multiples.windows(2).any(|w| w[0].factor == w[1].factor) {
            return Err(invalid("duplicate factors"));
        }
        if !multiples.iter().any(|m| m.factor == 1.0) {
            return Err(invalid("missing base multiple 1"));
        }

        Ok(Self { name, multiples })
    }

    pub fn from_def(def: &UnitTypeDef) -> Result<Self> {
        let multiples = def
            .multiples
            .iter()
            .map(|m| Multiple {
                factor: m.factor,
                label: m.label.clone(),
                threshold: m.threshold,
            })
            .collect();
        Self::new(def.name.clone(), multiples)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiples(&self) -> &[Multiple] {
        &self.multiples
    }

    /// Largest multiple whose threshold `|value|` exceeds, else the smallest
    pub fn multiple_for(&self, value: f64) -> &Multiple {
        let magnitude = value.abs();
        // never empty, checked in new()
        let smallest = &self.multiples[self.multiples.len() - 1];
        self.multiples
            .iter()
            .find(|m| magnitude > m.factor * m.threshold)
            .unwrap_or(smallest)
    }

    /// Render an SI value as `<number><separator><label>`
    pub fn render(&self, value: PrecisionNumber<'_>, separator: &str) -> Result<String> {
        let multiple = self.multiple_for(value.value());
        let scaled = value.checked_div_exact(multiple.factor)?;
        Ok(format!("{scaled}{separator}{}", multiple.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::NumberFormat;
    use pretty_assertions::assert_eq;

    fn multiple(factor: f64, label: &str) -> Multiple {
        Multiple {
            factor,
            label: label.to_string(),
            threshold: 0.5,
        }
    }

    fn distance() -> UnitType {
        UnitType::new(
            "distance",
            vec![
                multiple(1.0, "m"),
                multiple(1000.0, "km"),
                multiple(0.01, "cm"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_multiples_sorted_descending() {
        let labels: Vec<_> = distance().multiples().iter().map(|m| m.label.clone()).collect();
        assert_eq!(labels, vec!["km", "m", "cm"]);
    }

    #[test]
    fn test_multiple_selection() {
        let t = distance();
        assert_eq!(t.multiple_for(3.05).label, "m");
        assert_eq!(t.multiple_for(501.0).label, "km");
        assert_eq!(t.multiple_for(500.0).label, "m");
        assert_eq!(t.multiple_for(0.2).label, "cm");
        assert_eq!(t.multiple_for(-2000.0).label, "km");
        // below every threshold falls back to the smallest multiple
        assert_eq!(t.multiple_for(0.0001).label, "cm");
    }

    #[test]
    fn test_render() {
        let fmt = NumberFormat::for_locale("en-US").unwrap();
        let t = distance();
        let value = PrecisionNumber::parse("3.048", &fmt).unwrap();
        assert_eq!(t.render(value, " ").unwrap(), "3.048 m");
        let value = PrecisionNumber::parse("1609.3", &fmt).unwrap();
        assert_eq!(t.render(value, "").unwrap(), "1.6093km");
    }

    #[test]
    fn test_invalid_unit_types() {
        assert!(UnitType::new("empty", vec![]).is_err());
        assert!(UnitType::new("no base", vec![multiple(1000.0, "km")]).is_err());
        assert!(UnitType::new("dup", vec![multiple(1.0, "m"), multiple(1.0, "metre")]).is_err());
        assert!(UnitType::new("neg", vec![multiple(1.0, "m"), multiple(-1.0, "x")]).is_err());
    }
}
