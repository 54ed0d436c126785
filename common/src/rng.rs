use rand::rngs::StdRng;
use rand::SeedableRng;

/// A reproducible rng when a seed is configured, otherwise one seeded from entropy.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
