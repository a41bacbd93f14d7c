use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::question::domain::random_source::RandomSource;

/// `RandomSource` backed by `rand`'s standard generator.
///
/// `from_entropy` is used for serving; `seeded` gives reproducible sets
/// for the CLI's `--seed` flag and for tests.
#[derive(Debug, Clone)]
pub struct RngRandomSource {
    rng: StdRng,
}

impl RngRandomSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RngRandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for RngRandomSource {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
