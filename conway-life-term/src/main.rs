#![deny(clippy::all)]
#![forbid(unsafe_code)]

use life_grid::{GenerationEngine, GridError, LifeGrid, Random, World};
use log::{info, warn};
use std::env;
use term_main_support::{animate, AnimateError, AnimationConfig, TerminalSize};

const WIDTH: u32 = 80;
const HEIGHT: u32 = 20;
const DENSITY: f64 = 0.5;
const SEED_VAR: &str = "CONWAY_SEED";

fn main() -> Result<(), AnimateError> {
    env_logger::init();
    let mut rand = random_from_env();
    let outcome = animate(&AnimationConfig::default(), |size| {
        let (width, height) = fit_to_terminal(size);
        ConwayWorld::new(width, height, &mut rand)
    })?;
    println!("Exiting... ({:?} after {} generations)", outcome.reason, outcome.generations);
    Ok(())
}

fn random_from_env() -> Random {
    match env::var(SEED_VAR) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(seed) => {
                info!("Seeding from {}={}", SEED_VAR, seed);
                Random::from_seed(seed)
            }
            Err(err) => {
                warn!("Ignoring {}={:?}: {}", SEED_VAR, raw, err);
                Random::new()
            }
        },
        Err(_) => Random::new(),
    }
}

/// Shrinks the default grid to the terminal, keeping one row for the status line.
fn fit_to_terminal(size: TerminalSize) -> (u32, u32) {
    let width = WIDTH.min(size.width as u32);
    let height = HEIGHT.min((size.height as u32).saturating_sub(1));
    (width, height)
}

#[derive(Debug)]
pub struct ConwayWorld {
    grid: LifeGrid,
    engine: GenerationEngine,
    generation: u64,
}

impl ConwayWorld {
    pub fn new(width: u32, height: u32, rand: &mut Random) -> Result<Self, GridError> {
        Ok(Self::with_grid(LifeGrid::random(width, height, DENSITY, rand)?))
    }

    fn with_grid(grid: LifeGrid) -> Self {
        Self {
            grid,
            engine: GenerationEngine::new(),
            generation: 0,
        }
    }
}

impl World for ConwayWorld {
    fn width(&self) -> u32 {
        self.grid.width()
    }

    fn height(&self) -> u32 {
        self.grid.height()
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn live_count(&self) -> usize {
        self.grid.live_count()
    }

    fn to_text(&self) -> String {
        self.grid.to_text()
    }

    fn update(&mut self) -> bool {
        let next = self.engine.step(&self.grid);
        self.grid = next.grid;
        self.generation += 1;
        next.changed
    }
}
