use std::fmt;
use std::str::FromStr;

use dashu_int::UBig;

use crate::error::DomainError;

/// Raw counts with more significant digits than this are rejected as overflow.
pub const MAX_INPUT_DIGITS: usize = 20_000;

/// Largest accepted bit length (2^65536 already has 19,729 decimal digits).
pub const MAX_BIT_LENGTH: usize = 65_536;

/// How a numeric input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// The value is a bit length `b`, resolving to `2^b`.
    #[default]
    Bits,
    /// The value is used as-is.
    Count,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Bits => "bits",
            Mode::Count => "count",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("bits") {
            Ok(Mode::Bits)
        } else if s.eq_ignore_ascii_case("count") {
            Ok(Mode::Count)
        } else {
            Err(DomainError::invalid("mode", format!("expected 'bits' or 'count', got '{s}'")))
        }
    }
}

/// A positive input together with its interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountSpec {
    pub mode: Mode,
    pub value: UBig,
}

/// The number of possible hash values.
pub type BucketSpec = CountSpec;

/// The number of hashes drawn.
pub type HashSpec = CountSpec;

/// Keeps ASCII digits only and strips leading zeros, leaving a lone `"0"` in place.
pub fn sanitize_digits(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

impl CountSpec {
    pub fn new(mode: Mode, value: impl Into<UBig>) -> Self {
        Self { mode, value: value.into() }
    }

    pub fn bits(bits: u32) -> Self {
        Self::new(Mode::Bits, UBig::from(bits))
    }

    pub fn count(count: u64) -> Self {
        Self::new(Mode::Count, UBig::from(count))
    }

    /// Parses user text the way the input fields do: non-digits are dropped, leading
    /// zeros are stripped, and the remaining value must be positive.
    pub fn parse(mode: Mode, raw: &str) -> Result<Self, DomainError> {
        let digits = sanitize_digits(raw);
        if digits.is_empty() {
            return Err(DomainError::invalid("input", "no digits"));
        }
        if digits == "0" {
            return Err(DomainError::invalid("input", "must be positive"));
        }
        if digits.len() > MAX_INPUT_DIGITS {
            return Err(DomainError::overflow("input", format!("{MAX_INPUT_DIGITS} digits")));
        }

        let value = UBig::from_str_radix(&digits, 10)
            .map_err(|e| DomainError::invalid("input", e.to_string()))?;

        Ok(Self { mode, value })
    }

    /// Resolves the spec to a concrete count.
    pub fn resolve(&self) -> Result<UBig, DomainError> {
        if self.value == UBig::ZERO {
            return Err(DomainError::invalid("input", "must be positive"));
        }

        match self.mode {
            Mode::Count => Ok(self.value.clone()),
            Mode::Bits => {
                if self.value > UBig::from(MAX_BIT_LENGTH) {
                    return Err(DomainError::overflow(
                        "bit length",
                        format!("{MAX_BIT_LENGTH} bits"),
                    ));
                }
                let bits = usize::try_from(self.value.clone())
                    .map_err(|_| DomainError::overflow("bit length", MAX_BIT_LENGTH))?;
                Ok(UBig::ONE << bits)
            }
        }
    }
}
