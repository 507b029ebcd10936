use std::fmt;

use dashu_float::DBig;
use dashu_int::{IBig, UBig};

use crate::estimator::ProbabilityResult;

/// Fractional digits of the percentage rendering.
pub const PERCENT_FRACTION_DIGITS: usize = 10;

/// Fractional digits of the mantissa in exponential rendering.
pub const EXPONENTIAL_FRACTION_DIGITS: usize = 6;

/// Prefix for a result from the exact product or the pigeonhole rule.
pub const EXACT_MARKER: &str = "= ";

/// Prefix for a result from the exponential approximation.
pub const APPROXIMATE_MARKER: &str = "≈ ";

/// Renders a probability for display.
///
/// - `"100%"` and `"0%"` for the endpoints;
/// - exponential notation with six fractional digits below `1e-6` (`"2.710503e-8"`);
/// - otherwise a percentage fixed to ten fractional digits (`"50.7297234324%"`).
///
/// Rounding is half up in both notations.
pub fn format_probability(value: &DBig) -> String {
    if *value >= DBig::ONE {
        return "100%".to_string();
    }
    if *value <= DBig::ZERO {
        return "0%".to_string();
    }

    let (significand, exponent) = decompose(value);

    if *value < DBig::from_parts(IBig::ONE, -6) {
        format_exponential(&significand, exponent)
    } else {
        format_percent(&significand, exponent)
    }
}

impl ProbabilityResult {
    /// `"= "` for exact results, `"≈ "` for approximations.
    pub fn marker(&self) -> &'static str {
        if self.exact { EXACT_MARKER } else { APPROXIMATE_MARKER }
    }

    pub fn formatted(&self) -> String {
        format_probability(&self.value)
    }
}

impl fmt::Display for ProbabilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.marker(), self.formatted())
    }
}

/// Splits a non-negative value into `significand * 10^exponent`.
fn decompose(value: &DBig) -> (UBig, isize) {
    let repr = value.repr();
    let significand = UBig::try_from(repr.significand().clone()).unwrap_or(UBig::ZERO);
    (significand, repr.exponent())
}

fn pow10(exponent: usize) -> UBig {
    UBig::from(10u8).pow(exponent)
}

/// `round(significand * 10^shift)`, half up.
fn scale_round(significand: &UBig, shift: isize) -> UBig {
    if shift >= 0 {
        return significand * pow10(shift.unsigned_abs());
    }

    let divisor = pow10(shift.unsigned_abs());
    let quotient = significand / &divisor;
    let remainder = significand % &divisor;
    if &remainder + &remainder >= divisor { quotient + UBig::ONE } else { quotient }
}

fn format_percent(significand: &UBig, exponent: isize) -> String {
    // value * 100 * 10^10
    let shift = exponent + 2 + PERCENT_FRACTION_DIGITS as isize;
    let scaled = scale_round(significand, shift);

    let unit = pow10(PERCENT_FRACTION_DIGITS);
    let whole = &scaled / &unit;
    let fraction = (&scaled % &unit).to_string();

    format!("{whole}.{fraction:0>width$}%", width = PERCENT_FRACTION_DIGITS)
}

fn format_exponential(significand: &UBig, exponent: isize) -> String {
    let digits = significand.to_string().len() as isize;
    let kept = EXPONENTIAL_FRACTION_DIGITS as isize + 1;

    let mut mantissa = scale_round(significand, kept - digits);
    let mut decimal_exponent = exponent + digits - 1;

    // Rounding carried into a new digit, e.g. 9.9999996 -> 10.000000.
    if mantissa >= pow10(kept as usize) {
        mantissa = mantissa / UBig::from(10u8);
        decimal_exponent += 1;
    }

    let mantissa = mantissa.to_string();
    let (lead, rest) = mantissa.split_at(1);
    if decimal_exponent < 0 {
        format!("{lead}.{rest}e{decimal_exponent}")
    } else {
        format!("{lead}.{rest}e+{decimal_exponent}")
    }
}
