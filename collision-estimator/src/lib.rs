//! Hash collision probability estimation.
//!
//! Given `k` possible hash values (buckets) and `n` hashes drawn uniformly at random,
//! the probability that at least two of them land in the same bucket is
//!
//! ```text
//! P(collision) = 1 - prod_{i=0}^{n-1} (k - i) / k
//! ```
//!
//! This crate evaluates that expression with arbitrary-precision decimal arithmetic so
//! that bucket counts such as 2^256 neither underflow nor lose every significant digit
//! to rounding.
//!
//! # Algorithm selection
//!
//! - `n > k`: a collision is certain (pigeonhole), the result is exactly 1.
//! - `n <= exact_cutoff`: the product above, one rounded division and one rounded
//!   multiplication per draw.
//! - otherwise: the birthday approximation `1 - exp(-n(n-1) / 2k)`.
//!
//! Every intermediate value is rounded to [`NumericPolicy::decimal_precision`]
//! significant digits.
//!
//! # Example
//!
//! ```
//! use collision_estimator::{CountSpec, Mode, NumericPolicy, estimate_specs};
//!
//! let buckets = CountSpec::parse(Mode::Count, "365").unwrap();
//! let hashes = CountSpec::parse(Mode::Count, "23").unwrap();
//! let result = estimate_specs(&buckets, &hashes, &NumericPolicy::default()).unwrap();
//!
//! assert!(result.exact);
//! assert_eq!(result.to_string(), "= 50.7297234324%");
//! ```

pub mod error;
pub mod estimator;
pub mod format;
pub mod input;
pub mod policy;
#[cfg(feature = "tokio")]
pub mod recalc;

pub use error::DomainError;
pub use estimator::{Method, ProbabilityResult, estimate, estimate_specs};
pub use format::{APPROXIMATE_MARKER, EXACT_MARKER, format_probability};
pub use input::{
    BucketSpec, CountSpec, HashSpec, MAX_BIT_LENGTH, MAX_INPUT_DIGITS, Mode, sanitize_digits,
};
pub use policy::{
    DEFAULT_DECIMAL_PRECISION, DEFAULT_EXACT_CUTOFF, MAX_DECIMAL_PRECISION, NumericPolicy,
};
#[cfg(feature = "tokio")]
pub use recalc::{Outcome, Recalculator, estimate_async};

pub use dashu_float::DBig;
pub use dashu_int::UBig;
