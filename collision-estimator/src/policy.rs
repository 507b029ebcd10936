use crate::error::DomainError;

/// Hash counts up to and including this value use the exact product by default.
pub const DEFAULT_EXACT_CUTOFF: u64 = 10_000;

/// Significant decimal digits carried through the arithmetic by default.
pub const DEFAULT_DECIMAL_PRECISION: usize = 100;

/// Largest accepted decimal precision.
pub const MAX_DECIMAL_PRECISION: usize = 9999;

/// Numeric settings for a single estimation.
///
/// `exact_cutoff` picks the algorithm: hash counts at or below it are computed with the
/// exact product, larger ones with the exponential approximation. `decimal_precision` is
/// the number of significant digits every intermediate result is rounded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumericPolicy {
    pub exact_cutoff: u64,
    pub decimal_precision: usize,
}

impl Default for NumericPolicy {
    fn default() -> Self {
        Self { exact_cutoff: DEFAULT_EXACT_CUTOFF, decimal_precision: DEFAULT_DECIMAL_PRECISION }
    }
}

impl NumericPolicy {
    /// Creates a validated policy.
    pub fn new(exact_cutoff: u64, decimal_precision: usize) -> Result<Self, DomainError> {
        let policy = Self { exact_cutoff, decimal_precision };
        policy.validate()?;
        Ok(policy)
    }

    pub fn with_exact_cutoff(self, exact_cutoff: u64) -> Result<Self, DomainError> {
        Self::new(exact_cutoff, self.decimal_precision)
    }

    pub fn with_decimal_precision(self, decimal_precision: usize) -> Result<Self, DomainError> {
        Self::new(self.exact_cutoff, decimal_precision)
    }

    /// Checks the policy invariants. Fields are public, so the estimator calls this again
    /// on every request.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.exact_cutoff == 0 {
            return Err(DomainError::invalid("exact cutoff", "must be at least 1"));
        }
        if !(1..=MAX_DECIMAL_PRECISION).contains(&self.decimal_precision) {
            return Err(DomainError::invalid(
                "decimal precision",
                format!(
                    "{} is outside [1, {}]",
                    self.decimal_precision, MAX_DECIMAL_PRECISION
                ),
            ));
        }
        Ok(())
    }
}
