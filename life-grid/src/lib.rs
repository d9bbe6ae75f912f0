#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod engine;
mod grid;
mod random;

pub use engine::{next_state, Generation, GenerationEngine};
pub use grid::{LifeGrid, Loc, Neighborhood, ALIVE_GLYPH, DEAD_GLYPH};
pub use random::Random;

pub trait World {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn generation(&self) -> u64;
    fn live_count(&self) -> usize;
    fn to_text(&self) -> String;
    /// Advances one generation. Returns whether any cell changed.
    fn update(&mut self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("{len} cells supplied for a {width}x{height} grid")]
    CellCount { width: u32, height: u32, len: usize },
    #[error("Row {row} has {len} cells, expected {width}")]
    RaggedRow { row: usize, len: usize, width: usize },
    #[error("Cell {row}, {col} is outside a {width}x{height} grid")]
    OutOfBounds {
        row: u32,
        col: u32,
        width: u32,
        height: u32,
    },
    #[error("Grid dimension {0} does not fit in u32")]
    TooLarge(usize),
    #[error("Density {0} is not within 0.0..=1.0")]
    InvalidDensity(f64),
    #[error("Could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
