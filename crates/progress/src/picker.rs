//! Strategies for picking a chapter out of the available set.

use psalms_core::ChapterNumber;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Picks the chapter a draw lands on.
pub trait ChapterPicker: Send {
    /// Pick one member of `available`, or `None` if it is empty.
    fn pick(&mut self, available: &[ChapterNumber]) -> Option<ChapterNumber>;
}

/// Uniform random picker.
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Picker seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible picker.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterPicker for RandomPicker {
    fn pick(&mut self, available: &[ChapterNumber]) -> Option<ChapterNumber> {
        available.choose(&mut self.rng).copied()
    }
}
