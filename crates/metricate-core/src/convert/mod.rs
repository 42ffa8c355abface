//! Conversion engine
//!
//! Scans text for unit tokens, reads the number written before each one,
//! chains larger units in front of it ("5 feet 2 inches"), converts the
//! result to SI and rewrites the text once all replacements are known.

mod patterns;

use std::sync::Arc;

use crate::compromise::compromise;
use crate::document::{Document, Replacement};
use crate::error::Result;
use crate::format::{NumberFormat, DEFAULT_LOCALE};
use crate::registry::Registry;
use crate::types::{combine_with_superunit, PrecisionNumber};

use patterns::{patterns, split_end, split_start};

/// Unit whose token may be followed by a bare inch count ("5 foot 2")
const FOOT: &str = "foot";
const INCH: &str = "inch";

/// A quantity read backwards from a unit token
struct Resolved<'f> {
    /// Value in the unit the resolution started from
    value: PrecisionNumber<'f>,
    /// Start of the earliest consumed literal
    start: usize,
    /// Text between each consumed number and its unit, in reading order
    spacings: Vec<String>,
}

/// A bare subunit count folded in after a unit token
struct Trailing<'f> {
    value: PrecisionNumber<'f>,
    end: usize,
    unit: usize,
}

/// Converts the quantities found in text to SI
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<Registry>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine over the bundled unit definitions
    pub fn new() -> Self {
        Self {
            registry: Registry::bundled(),
        }
    }

    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Rewrite every recognized quantity in `text`.
    ///
    /// Returns `Ok(None)` when nothing was converted. An empty `locales`
    /// slice means the default locale. Unknown locales are rejected before
    /// any scanning happens.
    pub fn process<S: AsRef<str>>(&self, text: &str, locales: &[S]) -> Result<Option<String>> {
        let replacements = self.replacements(text, locales)?;
        let mut document = Document::new(text);
        document.apply(&replacements);
        Ok(document.into_modified())
    }

    /// Non-overlapping replacements for `text`, ordered by start offset
    pub fn replacements<S: AsRef<str>>(&self, text: &str, locales: &[S]) -> Result<Vec<Replacement>> {
        let formats = self.formats(locales)?;

        let mut candidates = Vec::new();
        for unit_index in 0..self.registry.units().len() {
            for format in &formats {
                match self.convert_unit(text, unit_index, format) {
                    Ok(found) => candidates.extend(found),
                    Err(err) => tracing::warn!(
                        "skipping {} in {}: {}",
                        self.registry.units()[unit_index].name(),
                        format.name(),
                        err
                    ),
                }
            }
        }
        Ok(select(candidates))
    }

    fn formats<S: AsRef<str>>(&self, locales: &[S]) -> Result<Vec<&NumberFormat>> {
        if locales.is_empty() {
            return Ok(vec![self.registry.number_format(DEFAULT_LOCALE)?]);
        }
        locales
            .iter()
            .map(|locale| self.registry.number_format(locale.as_ref()))
            .collect()
    }

    /// All replacements one unit produces in one locale
    fn convert_unit<'f>(
        &'f self,
        text: &str,
        unit_index: usize,
        format: &'f NumberFormat,
    ) -> Result<Vec<Replacement>> {
        let unit = &self.registry.units()[unit_index];
        let mut out = Vec::new();

        for m in unit.find_matches(text) {
            let Some(resolved) = self.resolve_preceding(&text[..m.start()], unit_index, format)?
            else {
                tracing::trace!("{} at {} has no number", unit.name(), m.start());
                continue;
            };

            let (value, end, si_unit) =
                match self.trailing_subunit(text, m.end(), unit_index, resolved.value, format)? {
                    Some(trailing) => (trailing.value, trailing.end, trailing.unit),
                    None => (resolved.value, m.end(), unit_index),
                };

            let si_unit = &self.registry.units()[si_unit];
            if value.is_zero() && !si_unit.is_affine() {
                tracing::trace!("zero {} at {} left alone", unit.name(), resolved.start);
                continue;
            }

            let si_value = si_unit.to_si(value);
            if si_value.is_nan() {
                tracing::trace!("{} at {} overflows in SI", unit.name(), resolved.start);
                continue;
            }
            let separator = compromise(resolved.spacings.as_slice());
            let rendered = si_unit.unit_type().render(si_value, &separator)?;
            tracing::debug!(
                "{:?} -> {:?} ({})",
                &text[resolved.start..end],
                rendered,
                format.name()
            );
            out.push(Replacement {
                start: resolved.start,
                end,
                text: rendered,
            });
        }
        Ok(out)
    }

    /// Read the quantity that ends right before a token of `unit_index`.
    ///
    /// `head` is all text before the token. Larger units chained in front
    /// are folded in, so the returned value is in the token's unit.
    fn resolve_preceding<'f>(
        &'f self,
        head: &str,
        unit_index: usize,
        format: &'f NumberFormat,
    ) -> Result<Option<Resolved<'f>>> {
        let p = patterns();
        let (before, spacing) = split_end(&p.spacer_end, head);
        let Some((literal, remainder)) = format.match_literal_at_end(before) else {
            return Ok(None);
        };
        let value = match PrecisionNumber::parse(literal, format) {
            Ok(value) => value,
            Err(err) => {
                tracing::trace!("{literal:?} is not a number: {err}");
                return Ok(None);
            }
        };
        if value.is_nan() {
            tracing::trace!("{literal:?} is out of range");
            return Ok(None);
        }
        let has_radix = format.radix_regex().is_match(literal);

        let (segment, _) = split_end(&p.joiner_end, remainder);
        for edge in self.registry.superunits(unit_index) {
            let superunit = &self.registry.units()[edge.unit];
            let Some(token_start) = superunit.match_at_end(segment) else {
                continue;
            };
            if let Some(outer) = self.resolve_preceding(&segment[..token_start], edge.unit, format)? {
                let mut spacings = outer.spacings;
                spacings.push(spacing.to_string());
                return Ok(Some(Resolved {
                    value: combine_with_superunit(outer.value, value, edge.ratio, has_radix)?,
                    start: outer.start,
                    spacings,
                }));
            }
            break;
        }

        Ok(Some(Resolved {
            value,
            start: remainder.len(),
            spacings: vec![spacing.to_string()],
        }))
    }

    /// Fold a bare number after a foot token in as inches ("4'2", "5 foot 2").
    ///
    /// Only applies when the number is below one foot and no unit token
    /// follows it.
    fn trailing_subunit<'f>(
        &'f self,
        text: &str,
        token_end: usize,
        unit_index: usize,
        feet: PrecisionNumber<'f>,
        format: &'f NumberFormat,
    ) -> Result<Option<Trailing<'f>>> {
        let units = self.registry.units();
        if units[unit_index].name() != FOOT {
            return Ok(None);
        }
        let Some((inch, _)) = self.registry.unit_by_name(INCH) else {
            return Ok(None);
        };
        let Some(ratio) = self.registry.ratio(inch, unit_index) else {
            return Ok(None);
        };

        let p = patterns();
        let after = &text[token_end..];
        let (joiner, rest) = split_start(&p.joiner_start, after);
        let Some((literal, remainder)) = format.match_literal_at_start(rest) else {
            return Ok(None);
        };
        let Ok(inches) = PrecisionNumber::parse(literal, format) else {
            return Ok(None);
        };
        if inches.is_nan() || inches < 0.0 || inches >= f64::from(ratio) {
            return Ok(None);
        }
        let (_, tail) = split_start(&p.spacer_start, remainder);
        if units.iter().any(|u| u.match_at_start(tail).is_some()) {
            return Ok(None);
        }

        let has_radix = format.radix_regex().is_match(literal);
        Ok(Some(Trailing {
            value: combine_with_superunit(feet, inches, ratio, has_radix)?,
            end: token_end + joiner.len() + literal.len(),
            unit: inch,
        }))
    }
}

/// Keep the longest candidates that do not overlap.
///
/// Equal lengths keep candidate order, so earlier-declared units win.
fn select(mut candidates: Vec<Replacement>) -> Vec<Replacement> {
    candidates.sort_by(|a, b| b.len().cmp(&a.len()));
    let mut chosen: Vec<Replacement> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if chosen.iter().all(|c| !c.overlaps(&candidate)) {
            chosen.push(candidate);
        }
    }
    chosen.sort_by_key(|r| r.start);
    chosen
}

/// Convert with the bundled definitions
pub fn process<S: AsRef<str>>(text: &str, locales: &[S]) -> Result<Option<String>> {
    Engine::new().process(text, locales)
}
