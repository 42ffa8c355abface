//! Numbers that carry their measured precision
//!
//! A [`PrecisionNumber`] pairs a value with how many of its digits are
//! meaningful. Precision is inferred from the literal the value was written
//! as, propagates through arithmetic with the usual significant-figure rules
//! and decides how the value is rendered back.
//!
//! The least significant digit is stored as a power-of-ten exponent:
//! `-2` means "known to the hundredths place".

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::format::{NumberFormat, NumberStyle};

/// Significant figures assigned to exact constants
pub const EXACT_SIG_FIGS: i32 = 1024;

/// Precision envelope of a [`PrecisionNumber`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Finite, nonzero value
    Finite { sig_figs: i32, lsd: i32 },
    /// Zero known down to the `lsd` place
    Zero { lsd: i32 },
    NotANumber,
}

/// A value with significant-figure tracking, bound to a number format
#[derive(Debug, Clone, Copy)]
pub struct PrecisionNumber<'f> {
    value: f64,
    precision: Precision,
    format: &'f NumberFormat,
}

/// Power of ten of the leading digit
fn magnitude(value: f64) -> i32 {
    value.abs().log10().floor() as i32
}

impl<'f> PrecisionNumber<'f> {
    /// Parse a literal, inferring precision from how it is written
    pub fn parse(literal: &str, format: &'f NumberFormat) -> Result<Self> {
        let canonical = format.canonicalize(literal)?;
        let value = canonical
            .parse::<f64>()
            .map_err(|_| Error::MalformedLiteral {
                literal: literal.to_string(),
            })?;

        let precision = if value == 0.0 {
            Precision::Zero {
                lsd: canonical_lsd(&canonical),
            }
        } else if !value.is_finite() {
            Precision::NotANumber
        } else {
            let sig_figs = canonical_sig_figs(&canonical);
            Precision::Finite {
                sig_figs,
                lsd: magnitude(value) - sig_figs + 1,
            }
        };
        Ok(Self {
            value,
            precision,
            format,
        })
    }

    /// A mathematically exact value (unit ratios, offsets)
    pub fn exact(value: f64, format: &'f NumberFormat) -> Self {
        let precision = if value == 0.0 {
            Precision::Zero {
                lsd: -EXACT_SIG_FIGS,
            }
        } else if !value.is_finite() {
            Precision::NotANumber
        } else {
            Precision::Finite {
                sig_figs: EXACT_SIG_FIGS,
                lsd: magnitude(value) - EXACT_SIG_FIGS + 1,
            }
        };
        Self {
            value,
            precision,
            format,
        }
    }

    /// Build from explicit precision.
    ///
    /// Either or both of `sig_figs` and `lsd` may be given; when both are
    /// given they must agree. Zero only accepts `lsd`.
    pub fn with_precision(
        value: f64,
        format: &'f NumberFormat,
        sig_figs: Option<i32>,
        lsd: Option<i32>,
    ) -> Result<Self> {
        if value == 0.0 {
            return match (sig_figs, lsd) {
                (Some(_), _) => Err(Error::InconsistentPrecision(
                    "significant figures cannot be given for zero".to_string(),
                )),
                (None, Some(lsd)) => Ok(Self::from_lsd(value, lsd, format)),
                (None, None) => Err(Error::InconsistentPrecision(
                    "zero needs an explicit least significant digit".to_string(),
                )),
            };
        }
        if !value.is_finite() {
            return Ok(Self::not_a_number(value, format));
        }
        match (sig_figs, lsd) {
            (Some(sig_figs), Some(lsd)) => {
                let derived = Self::from_sig_figs(value, sig_figs, format);
                if derived.least_significant_digit() != Some(lsd) {
                    return Err(Error::InconsistentPrecision(format!(
                        "{sig_figs} significant figures of {value} do not end at 10^{lsd}"
                    )));
                }
                Ok(derived)
            }
            (Some(sig_figs), None) => Ok(Self::from_sig_figs(value, sig_figs, format)),
            (None, Some(lsd)) => Ok(Self::from_lsd(value, lsd, format)),
            (None, None) => Err(Error::InconsistentPrecision(
                "no precision given".to_string(),
            )),
        }
    }

    fn not_a_number(value: f64, format: &'f NumberFormat) -> Self {
        Self {
            value,
            precision: Precision::NotANumber,
            format,
        }
    }

    fn from_lsd(value: f64, lsd: i32, format: &'f NumberFormat) -> Self {
        let precision = if value == 0.0 {
            Precision::Zero { lsd }
        } else if !value.is_finite() {
            Precision::NotANumber
        } else {
            Precision::Finite {
                sig_figs: magnitude(value) - lsd + 1,
                lsd,
            }
        };
        Self {
            value,
            precision,
            format,
        }
    }

    fn from_sig_figs(value: f64, sig_figs: i32, format: &'f NumberFormat) -> Self {
        let precision = if value == 0.0 {
            Precision::Zero { lsd: 0 }
        } else if !value.is_finite() {
            Precision::NotANumber
        } else {
            Precision::Finite {
                sig_figs,
                lsd: magnitude(value) - sig_figs + 1,
            }
        };
        Self {
            value,
            precision,
            format,
        }
    }

    /// An exact value bound to the same format as `self`
    pub fn promote(&self, value: f64) -> Self {
        Self::exact(value, self.format)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn format(&self) -> &'f NumberFormat {
        self.format
    }

    /// Significant figures, for finite nonzero values
    pub fn sig_figs(&self) -> Option<i32> {
        match self.precision {
            Precision::Finite { sig_figs, .. } => Some(sig_figs),
            _ => None,
        }
    }

    /// Exponent of the least significant digit
    pub fn least_significant_digit(&self) -> Option<i32> {
        match self.precision {
            Precision::Finite { lsd, .. } | Precision::Zero { lsd } => Some(lsd),
            Precision::NotANumber => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.precision, Precision::Zero { .. })
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.precision, Precision::NotANumber)
    }

    /// Same value, known to `extra` more digits
    pub fn widen(self, extra: i32) -> Self {
        let precision = match self.precision {
            Precision::Finite { sig_figs, lsd } => Precision::Finite {
                sig_figs: sig_figs + extra,
                lsd: lsd - extra,
            },
            Precision::Zero { lsd } => Precision::Zero { lsd: lsd - extra },
            Precision::NotANumber => Precision::NotANumber,
        };
        Self { precision, ..self }
    }

    pub fn abs(self) -> Self {
        if self.value < 0.0 {
            Self {
                value: -self.value,
                ..self
            }
        } else {
            self
        }
    }

    /// Divide, failing on a zero divisor
    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        if rhs.value == 0.0 {
            return Err(Error::DivisionByZero);
        }
        let value = self.value / rhs.value;
        match (self.precision, rhs.precision) {
            (_, Precision::Zero { .. }) => Err(Error::DivisionByZero),
            (Precision::NotANumber, _) | (_, Precision::NotANumber) => {
                Ok(Self::not_a_number(value, self.format))
            }
            (Precision::Zero { lsd }, _) => Ok(Self::from_lsd(
                0.0,
                lsd - rhs.value.abs().log10().round() as i32,
                self.format,
            )),
            (Precision::Finite { sig_figs: a, .. }, Precision::Finite { sig_figs: b, .. }) => {
                Ok(Self::from_sig_figs(value, a.min(b), self.format))
            }
        }
    }

    /// Divide by an exact constant
    pub fn checked_div_exact(self, rhs: f64) -> Result<Self> {
        self.checked_div(self.promote(rhs))
    }

    fn sum(self, rhs: Self, value: f64) -> Self {
        match (self.least_significant_digit(), rhs.least_significant_digit()) {
            (Some(a), Some(b)) => Self::from_lsd(value, a.max(b), self.format),
            _ => Self::not_a_number(value, self.format),
        }
    }
}

impl<'f> Add for PrecisionNumber<'f> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.sum(rhs, self.value + rhs.value)
    }
}

impl<'f> Sub for PrecisionNumber<'f> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.sum(rhs, self.value - rhs.value)
    }
}

impl<'f> Mul for PrecisionNumber<'f> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let value = self.value * rhs.value;
        match (self.precision, rhs.precision) {
            (Precision::NotANumber, _) | (_, Precision::NotANumber) => {
                Self::not_a_number(value, self.format)
            }
            (Precision::Zero { lsd: a }, Precision::Zero { lsd: b }) => {
                Self::from_lsd(0.0, a.max(b), self.format)
            }
            (Precision::Zero { lsd }, _) => {
                Self::from_lsd(0.0, lsd + rhs.value.abs().log10().round() as i32, self.format)
            }
            (_, Precision::Zero { lsd }) => {
                Self::from_lsd(0.0, lsd + self.value.abs().log10().round() as i32, self.format)
            }
            (Precision::Finite { sig_figs: a, .. }, Precision::Finite { sig_figs: b, .. }) => {
                Self::from_sig_figs(value, a.min(b), self.format)
            }
        }
    }
}

impl<'f> Add<f64> for PrecisionNumber<'f> {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        self + self.promote(rhs)
    }
}

impl<'f> Sub<f64> for PrecisionNumber<'f> {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        self - self.promote(rhs)
    }
}

impl<'f> Mul<f64> for PrecisionNumber<'f> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self * self.promote(rhs)
    }
}

impl<'f> Neg for PrecisionNumber<'f> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            value: -self.value,
            ..self
        }
    }
}

impl PartialEq for PrecisionNumber<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<f64> for PrecisionNumber<'_> {
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl PartialOrd for PrecisionNumber<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl PartialOrd<f64> for PrecisionNumber<'_> {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.value.partial_cmp(other)
    }
}

impl fmt::Display for PrecisionNumber<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            Precision::Zero { lsd } => {
                let zero = self.format.zero_glyph().to_string();
                f.write_str(&self.format.format_scientific(&zero, lsd))
            }
            Precision::NotANumber => f.write_str(self.format.not_a_number()),
            Precision::Finite { sig_figs, .. } => {
                f.write_str(&round_significant(self.value, sig_figs, self.format))
            }
        }
    }
}

/// Fold a measurement on a larger scale into one on a smaller scale.
///
/// `superunit` is the count of the larger unit, `subunit` the count of the
/// smaller one and `ratio` how many subunits make one superunit. The result
/// is expressed in subunits.
pub fn combine_with_superunit<'f>(
    superunit: PrecisionNumber<'f>,
    subunit: PrecisionNumber<'f>,
    ratio: u32,
    subunit_has_radix: bool,
) -> Result<PrecisionNumber<'f>> {
    let ratio_value = f64::from(ratio);
    let scaled = superunit * ratio_value;

    let standalone = subunit >= ratio_value
        || subunit.least_significant_digit().is_some_and(|lsd| lsd < 0)
        || subunit < 0.0
        || subunit.is_nan()
        || subunit_has_radix;

    if standalone {
        let total = subunit + scaled.value();
        let over = match (total.least_significant_digit(), scaled.least_significant_digit()) {
            (Some(total_lsd), Some(scaled_lsd)) => total_lsd - scaled_lsd,
            _ => 0,
        };
        return Ok(if over > 0 { total.widen(over) } else { total });
    }

    // The subunit is a remainder below one superunit: keep the precision the
    // ratio's smallest fraction implies.
    let (_, denominator) = lowest_terms(subunit.value() as u64, u64::from(ratio));
    let min_lsd = -((5 * denominator) as f64).log10().floor() as i32;
    let mut total = superunit + subunit.checked_div_exact(ratio_value)?;
    if let Some(lsd) = total.least_significant_digit() {
        let under = lsd - min_lsd;
        if under > 0 {
            total = total.widen(under);
        }
    }
    Ok(total * ratio_value)
}

fn lowest_terms(numerator: u64, denominator: u64) -> (u64, u64) {
    if numerator == 0 {
        return (0, 1);
    }
    let divisor = gcd(numerator, denominator);
    (numerator / divisor, denominator / divisor)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Significant figures of a canonical literal
pub(crate) fn canonical_sig_figs(canonical: &str) -> i32 {
    let unsigned = canonical.trim_start_matches('-');
    let mantissa = unsigned.split('e').next().unwrap_or_default();
    let digits: Vec<char> = mantissa.chars().filter(char::is_ascii_digit).collect();
    let Some(first) = digits.iter().position(|&c| c != '0') else {
        return 0;
    };
    if mantissa.contains('.') {
        return (digits.len() - first) as i32;
    }
    let last = digits.iter().rposition(|&c| c != '0').unwrap_or(first);
    (last - first + 1) as i32
}

/// Least significant digit exponent of a canonical literal
pub(crate) fn canonical_lsd(canonical: &str) -> i32 {
    let (mantissa, exponent) = match canonical.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (canonical, 0),
    };
    let decimals = mantissa
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len() as i32);
    exponent - decimals
}

/// Render `number` with exactly `sig_figs` significant figures
fn round_significant(number: f64, sig_figs: i32, format: &NumberFormat) -> String {
    if sig_figs <= 0 {
        return format.format(0.0, NumberStyle::Integer);
    }

    let places = sig_figs - 1 - magnitude(number);
    // Rounding may carry into the next power of ten (9.96 -> 10.)
    let first_pass = round_to_places(number, places);
    let places = match first_pass.parse::<f64>() {
        Ok(rounded) if rounded != 0.0 => sig_figs - 1 - magnitude(rounded),
        _ => places,
    };
    let mut out = round_to_places(number, places);

    if places > 0 {
        let limit = sig_figs as usize + out.len();
        while canonical_sig_figs(&out) < sig_figs && out.len() <= limit {
            if !out.contains('.') {
                out.push('.');
            }
            out.push('0');
        }
        return format.localize(&out);
    }

    let mismatch = canonical_sig_figs(&out) != sig_figs;
    if number.abs() >= 1e16 || (mismatch && places != 0) {
        return format.localize(&scientific(&out, sig_figs));
    }
    if mismatch {
        out.push('.');
    }
    format.localize(&out)
}

/// Canonical scientific form of a canonical integer
fn scientific(integer: &str, sig_figs: i32) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };
    let mut mantissa: String = digits.chars().take(1).collect();
    if sig_figs > 1 {
        mantissa.push('.');
        let tail = digits.chars().skip(1).chain(std::iter::repeat('0'));
        mantissa.extend(tail.take(sig_figs as usize - 1));
    }
    format!("{sign}{mantissa}e{}", digits.len().saturating_sub(1))
}

/// Round to `places` decimal places (negative rounds left of the radix),
/// returning a canonical literal without superfluous zeros
fn round_to_places(number: f64, places: i32) -> String {
    round_decimal(number, places).unwrap_or_else(|| round_float(number, places))
}

fn round_decimal(number: f64, places: i32) -> Option<String> {
    let magnitude = number.abs();
    if !(1e-20..1e27).contains(&magnitude) {
        return None;
    }
    let decimal = Decimal::from_str(&number.to_string()).ok()?;
    let rounded = if places >= 0 {
        decimal.round_dp(places.try_into().ok()?)
    } else {
        let shift: u32 = (-places).try_into().ok()?;
        if shift > 27 {
            return None;
        }
        let factor = Decimal::from_i128_with_scale(10i128.pow(shift), 0);
        decimal.checked_div(factor)?.round().checked_mul(factor)?
    };
    Some(rounded.normalize().to_string())
}

fn round_float(number: f64, places: i32) -> String {
    if number == 0.0 || places.saturating_add(magnitude(number)) >= 17 {
        return format!("{number}");
    }
    let scale = 10f64.powi(places);
    let rounded = (number * scale).round() / scale;
    if places <= 0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn en_us() -> NumberFormat {
        NumberFormat::for_locale("en-US").unwrap()
    }

    fn render(value: f64, sig_figs: i32) -> String {
        let fmt = en_us();
        PrecisionNumber::with_precision(value, &fmt, Some(sig_figs), None)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_sig_figs_from_literal() {
        let fmt = en_us();
        let cases = [
            ("4.00", 3),
            ("100", 1),
            ("100.", 3),
            ("62.", 2),
            ("0.0045", 2),
            ("6234", 4),
            ("1,234.5", 5),
            ("1.20e3", 3),
            ("-7.0", 2),
        ];
        for (literal, expected) in cases {
            let n = PrecisionNumber::parse(literal, &fmt).unwrap();
            assert_eq!(n.sig_figs(), Some(expected), "{literal}");
        }
    }

    #[test]
    fn test_zero_literals() {
        let fmt = en_us();
        let zero = PrecisionNumber::parse("0.0", &fmt).unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero.least_significant_digit(), Some(-1));
        assert_eq!(PrecisionNumber::parse("0", &fmt).unwrap().least_significant_digit(), Some(0));
        assert_eq!(zero.to_string(), "0e-1");
        assert_eq!(PrecisionNumber::parse("0", &fmt).unwrap().to_string(), "0");
    }

    #[test]
    fn test_multiplication_keeps_fewest_sig_figs() {
        let fmt = en_us();
        let a = PrecisionNumber::parse("4.00", &fmt).unwrap();
        let b = PrecisionNumber::parse("2.0", &fmt).unwrap();
        let product = a * b;
        assert_eq!(product.sig_figs(), Some(2));
        assert_eq!(product.to_string(), "8.0");
    }

    #[test]
    fn test_addition_keeps_coarsest_place() {
        let fmt = en_us();
        let a = PrecisionNumber::parse("4.0", &fmt).unwrap();
        let b = PrecisionNumber::parse("0.25", &fmt).unwrap();
        let sum = a + b;
        assert_eq!(sum.least_significant_digit(), Some(-1));
        assert_eq!(sum.to_string(), "4.2");
    }

    #[test]
    fn test_exact_operand_does_not_degrade() {
        let fmt = en_us();
        let feet = PrecisionNumber::parse("10.0", &fmt).unwrap();
        let meters = feet * 0.3048;
        assert_eq!(meters.sig_figs(), Some(3));
        assert_eq!(meters.to_string(), "3.05");
    }

    #[test]
    fn test_zero_times_power_of_ten() {
        let fmt = en_us();
        let zero = PrecisionNumber::parse("0.00", &fmt).unwrap();
        let scaled = zero * 1000.0;
        assert!(scaled.is_zero());
        assert_eq!(scaled.least_significant_digit(), Some(1));
        let divided = zero.checked_div_exact(100.0).unwrap();
        assert_eq!(divided.least_significant_digit(), Some(-4));
    }

    #[test]
    fn test_division_by_zero() {
        let fmt = en_us();
        let a = PrecisionNumber::parse("3", &fmt).unwrap();
        let zero = PrecisionNumber::parse("0.0", &fmt).unwrap();
        assert!(matches!(a.checked_div(zero), Err(Error::DivisionByZero)));
    }

    #[test]
    fn test_not_a_number_propagates() {
        let fmt = en_us();
        let nan = PrecisionNumber::exact(f64::NAN, &fmt);
        let a = PrecisionNumber::parse("3", &fmt).unwrap();
        let sum = a + nan;
        assert!(sum.is_nan());
        assert_eq!(sum.least_significant_digit(), None);
        assert_eq!(sum.to_string(), "NaN");
    }

    #[test]
    fn test_inconsistent_precision_rejected() {
        let fmt = en_us();
        assert!(PrecisionNumber::with_precision(123.0, &fmt, Some(3), Some(0)).is_ok());
        assert!(matches!(
            PrecisionNumber::with_precision(123.0, &fmt, Some(3), Some(-1)),
            Err(Error::InconsistentPrecision(_))
        ));
        assert!(matches!(
            PrecisionNumber::with_precision(0.0, &fmt, Some(1), None),
            Err(Error::InconsistentPrecision(_))
        ));
    }

    #[test]
    fn test_comparisons_ignore_precision() {
        let fmt = en_us();
        let a = PrecisionNumber::parse("2.000", &fmt).unwrap();
        let b = PrecisionNumber::parse("2", &fmt).unwrap();
        assert!(a == b);
        assert!(a < 3.0);
        assert!(a >= 2.0);
        assert!(-a < b);
        assert_eq!((-a).abs().sig_figs(), Some(4));
    }

    #[test]
    fn test_rounding_renders() {
        assert_eq!(render(99.779328, 2), "1.0e+2");
        assert_eq!(render(100.101, 3), "100.");
        assert_eq!(render(3719.8, 4), "3720.");
        assert_eq!(render(0.1, 2), "0.10");
        assert_eq!(render(9.96, 2), "10.");
        assert_eq!(render(158.3436, 4), "158.3");
        assert_eq!(render(16187.4, 2), "16000");
        assert_eq!(render(3.048, 1), "3");
        assert_eq!(render(-17.7777, 3), "-17.8");
        assert_eq!(render(2.5e17, 2), "2.5e+17");
    }

    #[test]
    fn test_combine_remainder_subunit() {
        let fmt = en_us();
        let feet = PrecisionNumber::parse("10", &fmt).unwrap();
        let inches = PrecisionNumber::parse("4", &fmt).unwrap();
        let total = combine_with_superunit(feet, inches, 12, false).unwrap();
        assert!((total.value() - 124.0).abs() < 1e-9);
        assert_eq!(total.sig_figs(), Some(3));
    }

    #[test]
    fn test_combine_standalone_subunit() {
        let fmt = en_us();
        let pounds = PrecisionNumber::parse("6", &fmt).unwrap();
        let ounces = PrecisionNumber::parse("2.1", &fmt).unwrap();
        let total = combine_with_superunit(pounds, ounces, 16, true).unwrap();
        assert!((total.value() - 98.1).abs() < 1e-9);
        assert_eq!(total.sig_figs(), Some(3));

        // the superunit is known more finely than the subunit
        let feet = PrecisionNumber::parse("4.0", &fmt).unwrap();
        let inches = PrecisionNumber::parse("20", &fmt).unwrap();
        let total = combine_with_superunit(feet, inches, 12, false).unwrap();
        assert!((total.value() - 68.0).abs() < 1e-9);
        assert_eq!(total.sig_figs(), Some(2));

        let feet = PrecisionNumber::parse("4", &fmt).unwrap();
        let total = combine_with_superunit(feet, inches, 12, false).unwrap();
        assert_eq!(total.sig_figs(), Some(1));
    }

    #[test]
    fn test_lowest_terms() {
        assert_eq!(lowest_terms(4, 12), (1, 3));
        assert_eq!(lowest_terms(11, 12), (11, 12));
        assert_eq!(lowest_terms(0, 12), (0, 1));
    }
}
