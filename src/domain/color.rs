//! Color sources for newly constructed nodes

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::entities::Rgb;

/// Supplies the display color for each new node.
///
/// A tree owns exactly one source, so colors are scoped to the session that
/// built the tree.
pub trait ColorSource: std::fmt::Debug {
    fn next_color(&mut self) -> Rgb;
}

/// Uniform random colors from an explicitly seeded generator.
#[derive(Debug)]
pub struct SeededColors {
    rng: StdRng,
}

impl SeededColors {
    /// Reproducible colors: the same seed yields the same sequence.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }
}

impl ColorSource for SeededColors {
    fn next_color(&mut self) -> Rgb {
        Rgb(
            self.rng.gen_range(0..=255),
            self.rng.gen_range(0..=255),
            self.rng.gen_range(0..=255),
        )
    }
}

/// Always the same color. Useful for tests and monochrome output.
#[derive(Debug, Clone, Copy)]
pub struct FixedColor(pub Rgb);

impl ColorSource for FixedColor {
    fn next_color(&mut self) -> Rgb {
        self.0
    }
}
