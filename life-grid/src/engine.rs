use crate::{GridError, LifeGrid};
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Birth on exactly 3 live neighbors, survival on 2 or 3, death otherwise.
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    if alive {
        (2..=3).contains(&live_neighbors)
    } else {
        live_neighbors == 3
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generation {
    pub grid: LifeGrid,
    /// True iff at least one cell differs from the previous generation.
    pub changed: bool,
}

/// Computes successive generations, one rayon task per row.
#[derive(Debug, Default)]
pub struct GenerationEngine {
    pool: Option<ThreadPool>,
}

impl GenerationEngine {
    /// Runs on rayon's global pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    pub fn with_threads(num_threads: usize) -> Result<Self, GridError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("life-row-{}", index))
            .build()?;
        Ok(Self { pool: Some(pool) })
    }

    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    pub fn step(&self, grid: &LifeGrid) -> Generation {
        let width = grid.width() as usize;
        let mut next_cells = vec![false; grid.num_cells()];

        // Each row worker writes only its own chunk and reports its own flag;
        // the flags are OR-ed after every row has finished.
        let changed = if next_cells.is_empty() {
            false
        } else {
            self.install(|| {
                next_cells
                    .par_chunks_mut(width)
                    .enumerate()
                    .map(|(row, next_row)| Self::update_row(grid, row as i64, next_row))
                    .reduce(|| false, |a, b| a | b)
            })
        };

        let next = grid.with_cells(next_cells);
        debug!(
            "Stepped {}x{} grid: {} live, changed: {}",
            next.width(),
            next.height(),
            next.live_count(),
            changed
        );
        Generation {
            grid: next,
            changed,
        }
    }

    fn update_row(grid: &LifeGrid, row: i64, next_row: &mut [bool]) -> bool {
        let mut changed = false;
        for (col, next_cell) in next_row.iter_mut().enumerate() {
            let col = col as i64;
            let alive = grid.is_alive(row, col);
            *next_cell = next_state(alive, grid.count_neighbors(row, col));
            changed |= *next_cell != alive;
        }
        changed
    }

    fn install<R, F>(&self, f: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

impl LifeGrid {
    pub fn next_generation(&self) -> Generation {
        GenerationEngine::new().step(self)
    }
}
