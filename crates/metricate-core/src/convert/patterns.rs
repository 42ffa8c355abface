//! Separators around numbers and units

use std::sync::OnceLock;

use regex::Regex;

use crate::format::DASHES;

/// Shared separator patterns
pub(crate) struct Patterns {
    /// Whitespace or dashes between a number and its unit, at the end of a span
    pub spacer_end: Regex,
    /// Same, at the start of a span
    pub spacer_start: Regex,
    /// Glue between chained quantities ("6 pounds, 2 ounces"), at the end of a span
    pub joiner_end: Regex,
    /// Same, at the start of a span
    pub joiner_start: Regex,
}

impl Patterns {
    fn new() -> Self {
        let spacer = format!(r"(?:\s|{DASHES})*");
        let joiner = format!(r"(?:\s|,|and|\+|{DASHES})*");
        Self {
            spacer_end: Regex::new(&format!("{spacer}$")).expect("spacer pattern is valid"),
            spacer_start: Regex::new(&format!("^{spacer}")).expect("spacer pattern is valid"),
            joiner_end: Regex::new(&format!("{joiner}$")).expect("joiner pattern is valid"),
            joiner_start: Regex::new(&format!("^{joiner}")).expect("joiner pattern is valid"),
        }
    }
}

pub(crate) fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(Patterns::new)
}

/// Split `text` into (rest, trailing match of `re`)
pub(crate) fn split_end<'a>(re: &Regex, text: &'a str) -> (&'a str, &'a str) {
    let at = re.find(text).map_or(text.len(), |m| m.start());
    text.split_at(at)
}

/// Split `text` into (leading match of `re`, rest)
pub(crate) fn split_start<'a>(re: &Regex, text: &'a str) -> (&'a str, &'a str) {
    let at = re.find(text).map_or(0, |m| m.end());
    text.split_at(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spacers() {
        let p = patterns();
        assert_eq!(split_end(&p.spacer_end, "10 - "), ("10", " - "));
        assert_eq!(split_end(&p.spacer_end, "10"), ("10", ""));
        assert_eq!(split_start(&p.spacer_start, "\u{2013} inch"), ("\u{2013} ", "inch"));
    }

    #[test]
    fn test_joiners() {
        let p = patterns();
        assert_eq!(split_end(&p.joiner_end, "6 pounds, "), ("6 pounds", ", "));
        assert_eq!(split_end(&p.joiner_end, "10 feet and "), ("10 feet", " and "));
        assert_eq!(split_start(&p.joiner_start, " + 4 in"), (" + ", "4 in"));
    }
}
