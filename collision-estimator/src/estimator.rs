use dashu_float::round::mode::HalfAway;
use dashu_float::{Context, DBig};
use dashu_int::{IBig, UBig};

use crate::error::DomainError;
use crate::input::{BucketSpec, HashSpec};
use crate::policy::NumericPolicy;

/// ln(10) scaled by 10^9, rounded up.
const LN_10_NANOS: u64 = 2_302_585_093;

/// Which formula produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// More hashes than buckets: a collision is certain.
    Pigeonhole,
    /// Product of the per-draw no-collision probabilities.
    Exact,
    /// `1 - exp(-n(n-1) / 2k)`.
    Approximate,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Pigeonhole => "pigeonhole",
            Method::Exact => "exact",
            Method::Approximate => "approximate",
        }
    }
}

/// The probability that at least two drawn hashes share a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityResult {
    /// Always within `[0, 1]`.
    pub value: DBig,
    /// False when the exponential approximation was used.
    pub exact: bool,
    pub method: Method,
}

impl ProbabilityResult {
    fn certain() -> Self {
        Self { value: DBig::ONE, exact: true, method: Method::Pigeonhole }
    }

    pub fn is_certain(&self) -> bool {
        self.value >= DBig::ONE
    }

    /// Lossy conversion for reporting. Values below the `f64` range become 0.
    pub fn to_f64(&self) -> f64 {
        let repr = self.value.repr();
        format!("{}e{}", repr.significand(), repr.exponent()).parse().unwrap_or(f64::NAN)
    }
}

/// Estimates the collision probability for `hash_count` draws into `bucket_count` buckets.
///
/// Hash counts above `bucket_count` are certain to collide. Hash counts up to
/// `policy.exact_cutoff` (inclusive) use the exact product, anything larger the
/// exponential approximation. All arithmetic is rounded to `policy.decimal_precision`
/// significant digits.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(cutoff = policy.exact_cutoff, precision = policy.decimal_precision)
)]
pub fn estimate(
    bucket_count: &UBig,
    hash_count: &UBig,
    policy: &NumericPolicy,
) -> Result<ProbabilityResult, DomainError> {
    if *bucket_count == UBig::ZERO {
        return Err(DomainError::invalid("bucket count", "must be positive"));
    }
    if *hash_count == UBig::ZERO {
        return Err(DomainError::invalid("hash count", "must be positive"));
    }
    policy.validate()?;

    if hash_count > bucket_count {
        tracing::debug!("more hashes than buckets, collision is certain");
        return Ok(ProbabilityResult::certain());
    }

    let context = Context::<HalfAway>::new(policy.decimal_precision);

    if *hash_count <= UBig::from(policy.exact_cutoff) {
        // Bounded by the cutoff, so this always fits.
        let draws = u64::try_from(hash_count.clone())
            .map_err(|_| DomainError::overflow("hash count", policy.exact_cutoff))?;
        tracing::debug!(draws, "using exact product");

        let no_collision = exact_no_collision(&context, bucket_count, draws);
        let value = context.sub(DBig::ONE.repr(), no_collision.repr()).value();
        return Ok(ProbabilityResult { value, exact: true, method: Method::Exact });
    }

    let value =
        approximate_collision(&context, policy.decimal_precision, bucket_count, hash_count);
    Ok(ProbabilityResult { value, exact: false, method: Method::Approximate })
}

/// Resolves both specs and estimates.
pub fn estimate_specs(
    buckets: &BucketSpec,
    hashes: &HashSpec,
    policy: &NumericPolicy,
) -> Result<ProbabilityResult, DomainError> {
    let bucket_count = buckets.resolve()?;
    let hash_count = hashes.resolve()?;
    estimate(&bucket_count, &hash_count, policy)
}

fn integer(value: UBig) -> DBig {
    DBig::from_parts(IBig::from(value), 0)
}

/// `prod_{i=0}^{draws-1} (k - i) / k`, rounding each term before it enters the product.
fn exact_no_collision(context: &Context<HalfAway>, bucket_count: &UBig, draws: u64) -> DBig {
    let denominator = integer(bucket_count.clone());
    let mut product = DBig::ONE;

    for i in 0..draws {
        let numerator = integer(bucket_count - UBig::from(i));
        let term = context.div(numerator.repr(), denominator.repr()).value();
        product = context.mul(product.repr(), term.repr()).value();
    }

    product
}

/// `1 - exp(-n(n-1) / 2k)`, evaluated as `-expm1(-x)`.
fn approximate_collision(
    context: &Context<HalfAway>,
    precision: usize,
    bucket_count: &UBig,
    hash_count: &UBig,
) -> DBig {
    let n = integer(hash_count.clone());
    let n_minus_one = integer(hash_count - UBig::ONE);
    let twice_buckets = integer(bucket_count.clone() << 1usize);

    let pairs = context.mul(n.repr(), n_minus_one.repr()).value();
    let exponent = context.div(pairs.repr(), twice_buckets.repr()).value();

    // exp(-x) is below half an ulp of 1 here, so the difference rounds to exactly 1.
    if exponent > saturation_threshold(precision) {
        tracing::debug!("approximation saturated at 1");
        return DBig::ONE;
    }

    tracing::debug!("using exponential approximation");
    // 1 - exp(-x) == -(exp(-x) - 1), without cancellation for tiny x.
    -context.exp_m1((-exponent).repr()).value()
}

/// An integer `t` with `exp(-t) < 10^-(precision + 1)`.
fn saturation_threshold(precision: usize) -> DBig {
    let digits = precision as u64 + 1;
    let threshold = (digits * LN_10_NANOS).div_ceil(1_000_000_000) + 1;
    integer(UBig::from(threshold))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::input::{CountSpec, Mode};

    fn ubig(n: u64) -> UBig {
        UBig::from(n)
    }

    fn pow2(bits: usize) -> UBig {
        UBig::ONE << bits
    }

    fn policy(exact_cutoff: u64, decimal_precision: usize) -> NumericPolicy {
        NumericPolicy::new(exact_cutoff, decimal_precision).unwrap()
    }

    fn relative_error(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn test_birthday_paradox() {
        let result = estimate(&ubig(365), &ubig(23), &NumericPolicy::default()).unwrap();
        assert!(result.exact);
        assert_eq!(result.method, Method::Exact);

        let expected = DBig::from_str("0.50729723432398540722541722833703250023597").unwrap();
        let tolerance = DBig::from_parts(IBig::ONE, -40);
        let diff = result.value.clone() - expected;
        assert!(diff < tolerance && diff > -tolerance.clone(), "diff = {diff}");
    }

    #[test]
    fn test_64_bit_birthday_bound() {
        let result = estimate(&pow2(64), &ubig(1_000_000), &NumericPolicy::default()).unwrap();
        assert!(!result.exact);
        assert_eq!(result.method, Method::Approximate);
        assert!(relative_error(result.to_f64(), 2.7105026839742e-8) < 1e-10);
    }

    #[test]
    fn test_pigeonhole() {
        let result = estimate(&ubig(10), &ubig(11), &NumericPolicy::default()).unwrap();
        assert!(result.exact);
        assert_eq!(result.method, Method::Pigeonhole);
        assert_eq!(result.value, DBig::ONE);
    }

    #[test]
    fn test_equal_counts_use_formula() {
        let result = estimate(&ubig(10), &ubig(10), &NumericPolicy::default()).unwrap();
        assert_eq!(result.method, Method::Exact);
        assert!(result.value < DBig::ONE);
        // 1 - 10!/10^10
        assert!(relative_error(result.to_f64(), 0.999637120) < 1e-12);
    }

    #[test]
    fn test_single_hash_never_collides() {
        let result = estimate(&pow2(256), &ubig(1), &policy(1, 100)).unwrap();
        assert!(result.exact);
        assert_eq!(result.value, DBig::ZERO);

        let result = estimate(&ubig(1), &ubig(1), &NumericPolicy::default()).unwrap();
        assert_eq!(result.value, DBig::ZERO);
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let at = estimate(&pow2(32), &ubig(50), &policy(50, 50)).unwrap();
        assert_eq!(at.method, Method::Exact);

        let above = estimate(&pow2(32), &ubig(51), &policy(50, 50)).unwrap();
        assert_eq!(above.method, Method::Approximate);
    }

    #[test]
    fn test_continuity_at_cutoff() {
        let buckets = pow2(64);
        let policy = policy(10_000, 40);

        let exact = estimate(&buckets, &ubig(10_000), &policy).unwrap();
        let approx = estimate(&buckets, &ubig(10_001), &policy).unwrap();
        assert!(exact.exact);
        assert!(!approx.exact);
        assert!(relative_error(approx.to_f64(), exact.to_f64()) < 1e-3);
    }

    #[test]
    fn test_tiny_probability_on_huge_bucket_count() {
        let result = estimate(&pow2(256), &ubig(2), &NumericPolicy::default()).unwrap();
        assert!(result.exact);
        assert!(relative_error(result.to_f64(), 8.6361685550944446e-78) < 1e-12);
    }

    #[test]
    fn test_precision_reaches_exponential() {
        let buckets = pow2(32);
        let hashes = ubig(100_000);

        let coarse = estimate(&buckets, &hashes, &policy(10_000, 1)).unwrap();
        let fine = estimate(&buckets, &hashes, &policy(10_000, 100)).unwrap();

        assert!(!coarse.exact);
        assert_ne!(coarse.value, fine.value);
        assert_eq!(coarse.value.precision(), 1);
        assert_eq!(fine.value.precision(), 100);
        // Three one-digit roundings (x, exp(-x), 1 - exp(-x)) stay well within 0.15.
        assert!((coarse.to_f64() - fine.to_f64()).abs() < 0.15);
        assert!(relative_error(fine.to_f64(), 0.6878094613387440) < 1e-12);
    }

    #[test]
    fn test_saturates_to_one() {
        let result = estimate(&ubig(1_000_000), &ubig(100_000), &policy(10, 20)).unwrap();
        assert!(!result.exact);
        assert!(result.is_certain());
    }

    #[test]
    fn test_idempotent() {
        let policy = policy(200, 60);
        let a = estimate(&pow2(20), &ubig(150), &policy).unwrap();
        let b = estimate(&pow2(20), &ubig(150), &policy).unwrap();
        assert_eq!(a, b);

        let a = estimate(&pow2(20), &ubig(5000), &policy).unwrap();
        let b = estimate(&pow2(20), &ubig(5000), &policy).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_inputs() {
        let policy = NumericPolicy::default();
        assert!(estimate(&UBig::ZERO, &ubig(1), &policy).unwrap_err().is_invalid_input());
        assert!(estimate(&ubig(1), &UBig::ZERO, &policy).unwrap_err().is_invalid_input());

        let bad_precision = NumericPolicy { exact_cutoff: 10, decimal_precision: 0 };
        assert!(estimate(&ubig(10), &ubig(2), &bad_precision).unwrap_err().is_invalid_input());

        let bad_cutoff = NumericPolicy { exact_cutoff: 0, decimal_precision: 10 };
        assert!(estimate(&ubig(10), &ubig(2), &bad_cutoff).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_estimate_specs() {
        let buckets = CountSpec::parse(Mode::Bits, "64").unwrap();
        let hashes = CountSpec::parse(Mode::Count, "1,000,000").unwrap();
        let result = estimate_specs(&buckets, &hashes, &NumericPolicy::default()).unwrap();
        assert!(!result.exact);

        let too_wide = CountSpec::new(Mode::Bits, ubig(1 << 20));
        let err = estimate_specs(&too_wide, &hashes, &NumericPolicy::default()).unwrap_err();
        assert!(matches!(err, DomainError::Overflow { .. }));
    }

    #[test]
    fn test_random_inputs_stay_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = policy(500, 30);

        for _ in 0..200 {
            let buckets = ubig(rng.gen_range(1..=1_000_000));
            let hashes = ubig(rng.gen_range(1..=5_000));
            let result = estimate(&buckets, &hashes, &policy).unwrap();
            assert!(result.value >= DBig::ZERO, "{buckets} {hashes}");
            assert!(result.value <= DBig::ONE, "{buckets} {hashes}");
        }
    }

    #[test]
    fn test_tiny_approximation_keeps_digits() {
        let result = estimate(&pow2(512), &ubig(1_000_000), &NumericPolicy::default()).unwrap();
        assert_eq!(result.method, Method::Approximate);
        assert!(result.value > DBig::ZERO);
        assert!(relative_error(result.to_f64(), 3.7291666364297378e-143) < 1e-12);
    }

    #[test]
    fn test_monotonic_in_hash_count_per_path() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = policy(300, 30);

        for _ in 0..20 {
            let buckets = ubig(rng.gen_range(1_000..=10_000_000));
            for (start, end, method) in [(1u64, 300u64, Method::Exact), (301, 900, Method::Approximate)]
            {
                let mut previous = DBig::ZERO;
                for hashes in (start..=end).step_by(37) {
                    let result = estimate(&buckets, &ubig(hashes), &policy).unwrap();
                    assert_eq!(result.method, method);
                    assert!(result.value >= previous, "{buckets} buckets, {hashes} hashes");
                    previous = result.value;
                }
            }
        }
    }

    #[test]
    fn test_switch_to_approximation_can_step_down() {
        let buckets = ubig(1_000);
        let policy = policy(100, 40);

        let exact = estimate(&buckets, &ubig(100), &policy).unwrap();
        let approx = estimate(&buckets, &ubig(101), &policy).unwrap();
        assert_eq!(exact.method, Method::Exact);
        assert_eq!(approx.method, Method::Approximate);
        assert!(relative_error(exact.to_f64(), 0.9940410733677595) < 1e-12);
        assert!(relative_error(approx.to_f64(), 0.9935906665537436) < 1e-12);
        assert!(approx.value < exact.value);
    }

    #[test]
    fn test_monotonic_in_bucket_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = policy(300, 30);

        for _ in 0..20 {
            let hashes = ubig(rng.gen_range(1..=600));
            let mut previous = DBig::ONE;
            for bits in 4..=48 {
                let result = estimate(&pow2(bits), &hashes, &policy).unwrap();
                assert!(result.value <= previous, "{bits} bits, {hashes} hashes");
                previous = result.value;
            }
        }
    }
}
