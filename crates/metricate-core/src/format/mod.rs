//! Locale-aware numeric literals
//!
//! A [`NumberFormat`] knows how numbers look in one locale: which characters
//! group digits, which one is the radix, how signs and exponents are written.
//! It finds literals at the edges of a text span, turns them into values and
//! renders values back.
//!
//! Internally every literal is first normalized to a *canonical* form:
//! ASCII digits, `.` as radix, `e` as exponent marker and `-` as sign
//! (e.g., `"-1234.50e3"`). Precision inference works on that form.

mod locales;

pub use locales::{locale, ExponentStyle, LocaleDef, DEFAULT_LOCALE, LOCALES};

use regex::Regex;

use crate::error::{Error, Result};

/// Every dash that may act as a minus sign
pub const DASHES: &str = "[-\u{2010}\u{2011}\u{2012}\u{2013}\u{2212}]";

const DIGIT: &str = "[0-9]";

/// Characters probed when checking a locale for radix/separator overlap
const AMBIGUITY_PROBES: &[&str] = &[
    ".", ",", " ", "'", "_", "\u{A0}", "\u{202F}", "\u{B7}", "\u{2019}",
];

/// Whether a value is rendered as an integer or with its fractional part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    Integer,
    Float,
}

/// Literal decompositions, in tie-break priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    GroupedInteger,
    GroupedRadix,
    SimpleRadix,
    Integer,
}

impl Shape {
    const ALL: [Shape; 4] = [
        Shape::GroupedInteger,
        Shape::GroupedRadix,
        Shape::SimpleRadix,
        Shape::Integer,
    ];

    fn pattern(self, def: &LocaleDef) -> String {
        let sign = format!("(?:{DASHES})?");
        let group = format!("(?:{})", def.separator);
        let radix = format!("(?:{})", def.radix);
        let exponent = format!("(?:(?:{}){DASHES}?\\+?{DIGIT}+)?", def.exponent);
        match self {
            Shape::GroupedInteger => {
                format!("{sign}{DIGIT}{{1,3}}(?:{group}{DIGIT}{{3}})+{exponent}")
            }
            Shape::GroupedRadix => {
                format!("{sign}{DIGIT}{{1,3}}(?:{group}{DIGIT}{{3}})+{radix}{DIGIT}*{exponent}")
            }
            Shape::SimpleRadix => {
                format!("{sign}(?:{DIGIT}+{radix}{DIGIT}*|{radix}{DIGIT}+){exponent}")
            }
            Shape::Integer => format!("{sign}{DIGIT}+{exponent}"),
        }
    }
}

#[derive(Debug, Clone)]
struct ShapeMatcher {
    at_end: Regex,
    at_start: Regex,
}

/// Numeric literal grammar for one locale
#[derive(Debug, Clone)]
pub struct NumberFormat {
    name: &'static str,
    shapes: Vec<ShapeMatcher>,
    separator: Regex,
    radix: Regex,
    exponent: Regex,
    digit: Regex,
    sign: Regex,
    separator_glyph: &'static str,
    radix_glyph: &'static str,
    exponent_glyph: &'static str,
    minus_glyph: &'static str,
    group_output: bool,
    exponent_style: ExponentStyle,
    not_a_number: &'static str,
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        name: name.to_string(),
        source,
    })
}

fn is_full_match(re: &Regex, s: &str) -> bool {
    re.find(s).is_some_and(|m| m.start() == 0 && m.end() == s.len())
}

impl NumberFormat {
    /// Build a number format from a locale definition.
    ///
    /// Fails when the radix and the place-value separator can both match
    /// the same text, since literals would then be ambiguous.
    pub fn new(def: &LocaleDef) -> Result<Self> {
        let separator = compile(def.name, def.separator)?;
        let radix = compile(def.name, def.radix)?;

        let probes = AMBIGUITY_PROBES
            .iter()
            .copied()
            .chain([def.separator_glyph, def.radix_glyph]);
        for probe in probes {
            if is_full_match(&separator, probe) && is_full_match(&radix, probe) {
                return Err(Error::AmbiguousNumberFormat {
                    locale: def.name.to_string(),
                });
            }
        }
        if !is_full_match(&separator, def.separator_glyph) || !is_full_match(&radix, def.radix_glyph) {
            return Err(Error::InvalidDefinition(format!(
                "locale '{}' writes glyphs its own patterns do not accept",
                def.name
            )));
        }

        let shapes = Shape::ALL
            .iter()
            .map(|shape| {
                let body = shape.pattern(def);
                Ok(ShapeMatcher {
                    at_end: compile(def.name, &format!("(?:{body})$"))?,
                    at_start: compile(def.name, &format!("^(?:{body})"))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: def.name,
            shapes,
            separator,
            radix,
            exponent: compile(def.name, def.exponent)?,
            digit: compile(def.name, DIGIT)?,
            sign: compile(def.name, &format!("^(?:{DASHES}|\\+)"))?,
            separator_glyph: def.separator_glyph,
            radix_glyph: def.radix_glyph,
            exponent_glyph: def.exponent_glyph,
            minus_glyph: def.minus_glyph,
            group_output: def.group_output,
            exponent_style: def.exponent_style,
            not_a_number: def.not_a_number,
        })
    }

    /// Build the format for a locale key from the built-in table
    pub fn for_locale(name: &str) -> Result<Self> {
        let def = locale(name).ok_or_else(|| Error::UnknownLocale(name.to_string()))?;
        Self::new(def)
    }

    /// Locale key
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Find the longest literal ending exactly at the end of `text`.
    ///
    /// Returns `(literal, remainder)` where `remainder` is everything before
    /// the literal.
    pub fn match_literal_at_end<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let mut best: Option<usize> = None;
        for shape in &self.shapes {
            if let Some(start) = leftmost_unglued_start(&shape.at_end, text) {
                if best.map_or(true, |b| start < b) {
                    best = Some(start);
                }
            }
        }
        let start = self.detach_hyphen(text, best?);
        Some((&text[start..], &text[..start]))
    }

    /// Find the longest literal starting exactly at the start of `text`.
    ///
    /// Returns `(literal, remainder)` where `remainder` follows the literal.
    pub fn match_literal_at_start<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let mut best: Option<usize> = None;
        for shape in &self.shapes {
            let Some(m) = shape.at_start.find(text) else {
                continue;
            };
            if text[m.end()..].starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            if best.map_or(true, |b| m.end() > b) {
                best = Some(m.end());
            }
        }
        let end = best?;
        Some((&text[..end], &text[end..]))
    }

    /// A dash glued to a preceding letter or digit is a hyphen, not a sign
    fn detach_hyphen(&self, text: &str, start: usize) -> usize {
        let glued = text[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        match self.sign.find(&text[start..]) {
            Some(m) if glued => start + m.end(),
            _ => start,
        }
    }

    /// Normalize a literal to canonical form (`-1234.5e3`)
    pub fn canonicalize(&self, literal: &str) -> Result<String> {
        let malformed = || Error::MalformedLiteral {
            literal: literal.to_string(),
        };

        let (positive, unsigned) = self.get_sign(literal);
        if unsigned.is_empty() {
            return Err(malformed());
        }

        let (mantissa, exponent) = match self.exponent.find(unsigned) {
            Some(m) => (&unsigned[..m.start()], Some(&unsigned[m.end()..])),
            None => (unsigned, None),
        };

        let ungrouped = self.separator.replace_all(mantissa, "");
        let mantissa = self.radix.replace(&ungrouped, ".");
        let digits = mantissa.chars().filter(char::is_ascii_digit).count();
        let radixes = mantissa.chars().filter(|&c| c == '.').count();
        if digits == 0 || radixes > 1 || digits + radixes != mantissa.chars().count() {
            return Err(malformed());
        }

        let mut canonical = String::with_capacity(literal.len());
        if !positive {
            canonical.push('-');
        }
        canonical.push_str(&mantissa);

        if let Some(exponent) = exponent {
            let (exp_positive, exp_digits) = self.get_sign(exponent);
            if exp_digits.is_empty() || !exp_digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(malformed());
            }
            canonical.push('e');
            if !exp_positive {
                canonical.push('-');
            }
            canonical.push_str(exp_digits);
        }
        Ok(canonical)
    }

    /// Parse a literal in this locale to a number
    pub fn to_number(&self, literal: &str) -> Result<f64> {
        let canonical = self.canonicalize(literal)?;
        canonical.parse::<f64>().map_err(|_| Error::MalformedLiteral {
            literal: literal.to_string(),
        })
    }

    /// Render a raw value as a literal in this locale
    pub fn format(&self, value: f64, style: NumberStyle) -> String {
        if !value.is_finite() {
            return self.not_a_number.to_string();
        }
        let canonical = match style {
            NumberStyle::Integer => format!("{value:.0}"),
            NumberStyle::Float => format!("{value}"),
        };
        self.localize(&canonical)
    }

    /// Literal for values that are not a number
    pub fn not_a_number(&self) -> &'static str {
        self.not_a_number
    }

    /// Convert a canonical literal into this locale's glyphs.
    ///
    /// A trailing radix (`"3720."`) is kept.
    pub fn localize(&self, canonical: &str) -> String {
        let (positive, unsigned) = match canonical.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, canonical),
        };
        let (mantissa, exponent) = match unsigned.split_once('e') {
            Some((m, e)) => (m, e.parse::<i32>().ok()),
            None => (unsigned, None),
        };
        let (integer, fraction) = match mantissa.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (mantissa, None),
        };

        let mut out = if self.group_output {
            self.group(integer)
        } else {
            integer.to_string()
        };
        if let Some(fraction) = fraction {
            out.push_str(self.radix_glyph);
            out.push_str(fraction);
        }
        if let Some(exponent) = exponent {
            out = self.format_scientific(&out, exponent);
        }
        self.set_sign(&out, positive)
    }

    fn group(&self, integer: &str) -> String {
        let len = integer.len();
        let mut out = String::with_capacity(len + len / 3 * self.separator_glyph.len());
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(self.separator_glyph);
            }
            out.push(c);
        }
        out
    }

    /// Compose `<base><marker><exponent>`; a zero exponent leaves the base alone
    pub fn format_scientific(&self, base: &str, exponent: i32) -> String {
        if exponent == 0 {
            return base.to_string();
        }
        match self.exponent_style {
            ExponentStyle::Marker => {
                let sign = if exponent < 0 { self.minus_glyph } else { "+" };
                format!("{base}{}{sign}{}", self.exponent_glyph, exponent.unsigned_abs())
            }
            ExponentStyle::Superscript => {
                let mut out = format!("{base}\u{D7}10");
                if exponent < 0 {
                    out.push('\u{207B}');
                }
                out.extend(exponent.unsigned_abs().to_string().chars().map(superscript));
                out
            }
        }
    }

    /// Split a literal into `(is_positive, unsigned_literal)`
    pub fn get_sign<'a>(&self, literal: &'a str) -> (bool, &'a str) {
        match self.sign.find(literal) {
            Some(m) => (m.as_str() == "+", &literal[m.end()..]),
            None => (true, literal),
        }
    }

    /// Replace the sign of a literal
    pub fn set_sign(&self, literal: &str, positive: bool) -> String {
        let (_, unsigned) = self.get_sign(literal);
        if positive {
            unsigned.to_string()
        } else {
            format!("{}{unsigned}", self.minus_glyph)
        }
    }

    /// Pattern matching the radix
    pub fn radix_regex(&self) -> &Regex {
        &self.radix
    }

    /// Pattern matching a single digit
    pub fn digit_regex(&self) -> &Regex {
        &self.digit
    }

    /// Pattern matching the scientific-notation marker
    pub fn exponent_regex(&self) -> &Regex {
        &self.exponent
    }

    /// Radix written in output
    pub fn radix_glyph(&self) -> &'static str {
        self.radix_glyph
    }

    /// Placeholder digit
    pub fn zero_glyph(&self) -> char {
        '0'
    }
}

/// Marks that join digit groups in some locale
fn is_group_mark(c: char) -> bool {
    matches!(c, '.' | ',' | '_' | '\u{B7}')
}

/// A literal may not continue digits, directly or across a group mark
/// (`2.1` read in a locale whose radix is not `.`)
fn glued_to_digits(before: &str) -> bool {
    let mut tail = before.chars().rev();
    match tail.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some(c) if is_group_mark(c) => tail.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Leftmost match of an end-anchored pattern that is not glued to digits
fn leftmost_unglued_start(re: &Regex, text: &str) -> Option<usize> {
    let mut from = 0;
    while from < text.len() {
        let m = re.find_at(text, from)?;
        if !glued_to_digits(&text[..m.start()]) {
            return Some(m.start());
        }
        from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

fn superscript(digit: char) -> char {
    match digit {
        '0' => '\u{2070}',
        '1' => '\u{B9}',
        '2' => '\u{B2}',
        '3' => '\u{B3}',
        '4' => '\u{2074}',
        '5' => '\u{2075}',
        '6' => '\u{2076}',
        '7' => '\u{2077}',
        '8' => '\u{2078}',
        '9' => '\u{2079}',
        other => other,
    }
}
