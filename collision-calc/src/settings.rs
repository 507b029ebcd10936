use collision_estimator::{
    BucketSpec, CountSpec, DomainError, HashSpec, Mode, NumericPolicy, ProbabilityResult,
    estimate_specs, sanitize_digits,
};

use crate::command::Command;

/// Command-line spelling of [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    /// The value is a bit length b, meaning 2^b.
    Bits,
    /// The value is used as-is.
    Count,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Bits => Mode::Bits,
            ModeArg::Count => Mode::Count,
        }
    }
}

/// Current modes and numeric policy of a calculator session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub bucket_mode: Mode,
    pub hash_mode: Mode,
    pub policy: NumericPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self { bucket_mode: Mode::Bits, hash_mode: Mode::Count, policy: NumericPolicy::default() }
    }
}

/// A finished one-shot calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub buckets: String,
    pub hashes: String,
    pub result: Result<ProbabilityResult, DomainError>,
}

/// Human-readable form of a raw input under a mode, e.g. `2^64` or `365`.
pub fn describe(mode: Mode, raw: &str) -> String {
    let digits = sanitize_digits(raw);
    let digits = if digits.is_empty() { "?".to_string() } else { digits };
    match mode {
        Mode::Bits => format!("2^{digits}"),
        Mode::Count => digits,
    }
}

impl Settings {
    /// Applies a settings command. Returns `true` when the settings changed, meaning the
    /// last result is stale. The settings are left untouched on error.
    pub fn apply(&mut self, command: &Command) -> Result<bool, DomainError> {
        let updated = match command {
            Command::SetPrecision(precision) => {
                Self { policy: self.policy.with_decimal_precision(*precision)?, ..*self }
            }
            Command::SetCutoff(cutoff) => {
                Self { policy: self.policy.with_exact_cutoff(*cutoff)?, ..*self }
            }
            Command::SetBucketMode(mode) => Self { bucket_mode: *mode, ..*self },
            Command::SetHashMode(mode) => Self { hash_mode: *mode, ..*self },
            _ => return Ok(false),
        };

        let changed = updated != *self;
        *self = updated;
        Ok(changed)
    }

    /// Sanitizes and parses both raw inputs under the current modes.
    pub fn specs(&self, buckets: &str, hashes: &str) -> Result<(BucketSpec, HashSpec), DomainError> {
        let buckets = CountSpec::parse(self.bucket_mode, buckets)?;
        let hashes = CountSpec::parse(self.hash_mode, hashes)?;
        Ok((buckets, hashes))
    }

    /// Runs a synchronous calculation.
    pub fn calculate(&self, buckets: &str, hashes: &str) -> Calculation {
        let result = self
            .specs(buckets, hashes)
            .and_then(|(b, h)| estimate_specs(&b, &h, &self.policy));

        Calculation {
            buckets: describe(self.bucket_mode, buckets),
            hashes: describe(self.hash_mode, hashes),
            result,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "bucket mode: {}, hash mode: {}, exact cutoff: {}, precision: {}",
            self.bucket_mode,
            self.hash_mode,
            self.policy.exact_cutoff,
            self.policy.decimal_precision
        )
    }
}
