use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

// e * 100_000
const RANDOM_SEED: u64 = 271_828;

/// Fixed-seed generator, so the same input always quantizes the same way.
pub fn new() -> impl Rng {
    Xoshiro256PlusPlus::seed_from_u64(RANDOM_SEED)
}
