use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of uniform random integers for the carver.
///
/// Reseeding with the same value and making the same sequence of calls must yield
/// the same numbers, which is what makes carved roads reproducible.
pub trait RandomSource {
    /// Returns a uniformly distributed integer in `low..high`. Requires `low < high`.
    fn next_int(&mut self, low: i32, high: i32) -> i32;

    /// Restarts the sequence from `seed`.
    fn reseed(&mut self, seed: u64);
}

impl RandomSource for StdRng {
    fn next_int(&mut self, low: i32, high: i32) -> i32 {
        self.random_range(low..high)
    }

    fn reseed(&mut self, seed: u64) {
        *self = StdRng::seed_from_u64(seed);
    }
}

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}
