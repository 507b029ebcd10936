use collision_estimator::UBig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates `(buckets, hashes)` pairs with bucket counts between 2^16 and 2^256 and
/// hash counts up to `max_hashes`.
/// Uses a fixed seed for reproducible benchmark results.
pub fn generate_random_inputs(count: usize, max_hashes: u64) -> Vec<(UBig, UBig)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let bits: usize = rng.gen_range(16..=256);
            let hashes = rng.gen_range(2..=max_hashes);
            (UBig::ONE << bits, UBig::from(hashes))
        })
        .collect()
}
