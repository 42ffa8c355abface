//! Non-SI units and how they are found in text
//!
//! A unit owns a pattern, the SI conversion `(value + offset) * factor`
//! and the [`UnitType`] its SI value renders with.

use std::sync::Arc;

use regex::{Match, Regex, RegexBuilder};

use crate::config::UnitDef;
use crate::error::{Error, Result};
use crate::types::{PrecisionNumber, UnitType};

/// A recognized unit
#[derive(Debug, Clone)]
pub struct Unit {
    name: String,
    pattern: String,
    matcher: Regex,
    at_end: Regex,
    at_start: Regex,
    unit_type: Arc<UnitType>,
    factor: f64,
    offset: f64,
    case_sensitive: bool,
}

fn is_identifier(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A match may not end in the middle of a word
fn ends_on_boundary(text: &str, end: usize) -> bool {
    let last = text[..end].chars().next_back();
    let next = text[end..].chars().next();
    !(last.is_some_and(is_identifier) && next.is_some_and(is_identifier))
}

fn next_char(text: &str, at: usize) -> usize {
    at + text[at..].chars().next().map_or(1, char::len_utf8)
}

impl Unit {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        unit_type: Arc<UnitType>,
        factor: f64,
        offset: f64,
        case_sensitive: bool,
    ) -> Result<Self> {
        let name = name.into();
        let pattern = pattern.into();

        if !factor.is_finite() || factor == 0.0 {
            return Err(Error::InvalidDefinition(format!(
                "unit '{name}': SI multiplier must be finite and nonzero"
            )));
        }
        if !offset.is_finite() {
            return Err(Error::InvalidDefinition(format!(
                "unit '{name}': SI offset must be finite"
            )));
        }

        let build = |body: String| {
            RegexBuilder::new(&body)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|source| Error::InvalidPattern {
                    name: name.clone(),
                    source,
                })
        };
        let matcher = build(format!("(?:{pattern})"))?;
        let at_end = build(format!("(?:{pattern})$"))?;
        let at_start = build(format!("^(?:{pattern})"))?;

        Ok(Self {
            name,
            pattern,
            matcher,
            at_end,
            at_start,
            unit_type,
            factor,
            offset,
            case_sensitive,
        })
    }

    pub fn from_def(def: &UnitDef, unit_type: Arc<UnitType>) -> Result<Self> {
        Self::new(
            def.name.clone(),
            def.pattern.clone(),
            unit_type,
            def.si_mul,
            def.si_add,
            def.case_sensitive,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn unit_type(&self) -> &Arc<UnitType> {
        &self.unit_type
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Units with an additive offset cannot be chained with other units
    pub fn is_affine(&self) -> bool {
        self.offset != 0.0
    }

    /// All non-overlapping occurrences that do not end inside a word
    pub fn find_matches<'t>(&self, text: &'t str) -> Vec<Match<'t>> {
        let mut found = Vec::new();
        let mut from = 0;
        while from < text.len() {
            let Some(m) = self.matcher.find_at(text, from) else {
                break;
            };
            if !m.is_empty() && ends_on_boundary(text, m.end()) {
                found.push(m);
                from = m.end();
            } else {
                from = next_char(text, m.start());
            }
        }
        found
    }

    /// Start of an occurrence ending exactly at the end of `text`
    pub fn match_at_end(&self, text: &str) -> Option<usize> {
        self.at_end
            .find(text)
            .filter(|m| !m.is_empty())
            .map(|m| m.start())
    }

    /// End of an occurrence starting exactly at the start of `text`
    pub fn match_at_start(&self, text: &str) -> Option<usize> {
        self.at_start
            .find(text)
            .filter(|m| !m.is_empty() && ends_on_boundary(text, m.end()))
            .map(|m| m.end())
    }

    /// Convert a value in this unit to its SI value
    pub fn to_si<'f>(&self, value: PrecisionNumber<'f>) -> PrecisionNumber<'f> {
        (value + self.offset) * self.factor
    }
}
