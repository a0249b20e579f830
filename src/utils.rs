use rand::{thread_rng, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha RNG. Without a seed one is drawn from the thread RNG;
/// the seed actually used is returned so the run can be replayed.
pub fn rng_from_seed(seed: Option<u64>) -> (ChaCha8Rng, u64) {
    let seed = seed.unwrap_or_else(|| thread_rng().gen());
    (ChaCha8Rng::seed_from_u64(seed), seed)
}

/// Elapsed seconds since `start`
pub fn seconds_since(start: std::time::Instant) -> f64 {
    start.elapsed().as_secs_f64()
}
