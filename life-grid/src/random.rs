use crate::{GridError, LifeGrid};
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl LifeGrid {
    /// Each cell is independently alive with probability `density`.
    pub fn random(
        width: u32,
        height: u32,
        density: f64,
        rand: &mut Random,
    ) -> Result<Self, GridError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(GridError::InvalidDensity(density));
        }
        let cells = (0..width as usize * height as usize)
            .map(|_| rand.next_bool(density))
            .collect();
        Self::from_cells(width, height, cells)
    }
}
