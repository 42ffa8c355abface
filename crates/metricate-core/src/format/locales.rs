//! Supported locales
//!
//! To add a new locale, simply add an entry to the LOCALES array.
//! Every engine call resolves its locale keys against this table.

/// Locale used when the caller does not ask for one
pub const DEFAULT_LOCALE: &str = "en-US";

/// How exponents are written by the scientific-notation builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExponentStyle {
    /// `1.0e+2`
    Marker,
    /// `1.0×10²`
    Superscript,
}

/// Locale metadata - single source of truth for each number format
pub struct LocaleDef {
    /// Locale key (e.g., "en-US")
    pub name: &'static str,
    /// Pattern matching one place-value separator
    pub separator: &'static str,
    /// Separator written when grouping output digits
    pub separator_glyph: &'static str,
    /// Pattern matching the radix
    pub radix: &'static str,
    /// Radix written in output
    pub radix_glyph: &'static str,
    /// Pattern matching the scientific-notation marker
    pub exponent: &'static str,
    /// Marker written in output
    pub exponent_glyph: &'static str,
    /// Minus sign written in output
    pub minus_glyph: &'static str,
    /// Whether output integers are grouped with `separator_glyph`
    pub group_output: bool,
    pub exponent_style: ExponentStyle,
    /// Literal written for values that are not a number
    pub not_a_number: &'static str,
}

/// Complete table of supported locales.
pub static LOCALES: &[LocaleDef] = &[
    LocaleDef {
        name: "en-US",
        separator: ",",
        separator_glyph: ",",
        radix: r"\.",
        radix_glyph: ".",
        exponent: "[eE]",
        exponent_glyph: "e",
        minus_glyph: "-",
        group_output: false,
        exponent_style: ExponentStyle::Marker,
        not_a_number: "NaN",
    },
    LocaleDef {
        name: "en-US-sup",
        separator: ",",
        separator_glyph: ",",
        radix: r"\.",
        radix_glyph: ".",
        exponent: "[eE]",
        exponent_glyph: "e",
        minus_glyph: "-",
        group_output: false,
        exponent_style: ExponentStyle::Superscript,
        not_a_number: "NaN",
    },
    LocaleDef {
        name: "en-ZA",
        separator: r"[ \x{A0}\x{202F}]",
        separator_glyph: " ",
        radix: r"\.",
        radix_glyph: ".",
        exponent: "[eE]",
        exponent_glyph: "e",
        minus_glyph: "-",
        group_output: true,
        exponent_style: ExponentStyle::Marker,
        not_a_number: "NaN",
    },
    LocaleDef {
        name: "de-DE",
        separator: r"\.",
        separator_glyph: ".",
        radix: ",",
        radix_glyph: ",",
        exponent: "[eE]",
        exponent_glyph: "e",
        minus_glyph: "-",
        group_output: false,
        exponent_style: ExponentStyle::Marker,
        not_a_number: "NaN",
    },
    LocaleDef {
        name: "fr-FR",
        separator: r"[ \x{A0}\x{202F}]",
        separator_glyph: "\u{202F}",
        radix: ",",
        radix_glyph: ",",
        exponent: "[eE]",
        exponent_glyph: "e",
        minus_glyph: "\u{2212}",
        group_output: true,
        exponent_style: ExponentStyle::Marker,
        not_a_number: "NaN",
    },
    LocaleDef {
        name: "pythonic",
        separator: "_",
        separator_glyph: "_",
        radix: r"\.",
        radix_glyph: ".",
        exponent: "e",
        exponent_glyph: "e",
        minus_glyph: "-",
        group_output: false,
        exponent_style: ExponentStyle::Marker,
        not_a_number: "nan",
    },
];

/// Look up a locale definition by key
pub fn locale(name: &str) -> Option<&'static LocaleDef> {
    LOCALES.iter().find(|d| d.name == name)
}
