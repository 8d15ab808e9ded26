use crate::errors::{MazeError, Result};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of every nondeterministic choice made while carving.
///
/// Seeded construction makes a whole generation run a pure function of the
/// seed, so a maze can be reproduced exactly. Unseeded construction draws
/// from OS entropy and is irreproducible.
#[derive(Debug, Clone)]
pub struct MazeRng {
    rng: SmallRng,
    seed: Option<u64>,
}

impl MazeRng {
    pub fn new(seed: Option<u64>) -> MazeRng {
        let rng = match seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_entropy(),
        };
        MazeRng { rng, seed }
    }

    /// The seed this source was built from, if any.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform random permutation (Fisher-Yates) in place.
    pub fn shuffle<T>(&mut self, values: &mut [T]) {
        values.shuffle(&mut self.rng);
    }

    /// A uniform draw from `0..bound_exclusive`. The bound must be positive.
    pub fn uniform(&mut self, bound_exclusive: usize) -> usize {
        self.rng.gen_range(0..bound_exclusive)
    }

    /// Uniform pick of one element.
    pub fn choose<'a, T>(&mut self, values: &'a [T]) -> Result<&'a T> {
        if values.is_empty() {
            Err(MazeError::EmptyChoice)
        } else {
            let index = self.uniform(values.len());
            Ok(&values[index])
        }
    }
}
