use crate::GridError;
use std::fmt;

pub const ALIVE_GLYPH: char = '*';
pub const DEAD_GLYPH: char = ' ';

/// One generation of cells. Once built, a grid is never modified; the next
/// generation is always a new grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifeGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl LifeGrid {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    pub fn from_cells(width: u32, height: u32, cells: Vec<bool>) -> Result<Self, GridError> {
        if cells.len() != width as usize * height as usize {
            return Err(GridError::CellCount {
                width,
                height,
                len: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::RaggedRow {
                row,
                len: bad.len(),
                width,
            });
        }
        let height = Self::dimension(rows.len())?;
        let width = Self::dimension(width)?;
        Self::from_cells(width, height, rows.into_iter().flatten().collect())
    }

    pub fn from_live_cells(width: u32, height: u32, live: &[Loc]) -> Result<Self, GridError> {
        let mut cells = vec![false; width as usize * height as usize];
        for loc in live {
            let index = loc
                .grid_index(width, height)
                .ok_or(GridError::OutOfBounds {
                    row: loc.row,
                    col: loc.col,
                    width,
                    height,
                })?;
            cells[index] = true;
        }
        Self::from_cells(width, height, cells)
    }

    /// A grid of the same dimensions as `self` holding `cells`.
    pub(crate) fn with_cells(&self, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), self.cells.len());
        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    fn dimension(len: usize) -> Result<u32, GridError> {
        u32::try_from(len).map_err(|_| GridError::TooLarge(len))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &bool> + Clone {
        self.cells.iter()
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn row(&self, row: u32) -> &[bool] {
        assert!(row < self.height, "Row {} out of bounds", row);
        let start = row as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Cells outside the grid are dead; there is no wraparound.
    pub fn is_alive(&self, row: i64, col: i64) -> bool {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return false;
        }
        self.cells[row as usize * self.width as usize + col as usize]
    }

    pub fn count_neighbors(&self, row: i64, col: i64) -> u8 {
        Neighborhood::new(self, row, col).num_live()
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LifeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut line = String::with_capacity(self.width as usize + 1);
        for row in 0..self.height {
            line.clear();
            line.extend(
                self.row(row)
                    .iter()
                    .map(|&alive| if alive { ALIVE_GLYPH } else { DEAD_GLYPH }),
            );
            line.push('\n');
            f.write_str(&line)?;
        }
        Ok(())
    }
}

/// The 3x3 window around a coordinate. The center need not be inside the grid.
pub struct Neighborhood<'a> {
    grid: &'a LifeGrid,
    rows: [i64; 3],
    cols: [i64; 3],
}

impl<'a> Neighborhood<'a> {
    pub fn new(grid: &'a LifeGrid, row: i64, col: i64) -> Self {
        Self {
            grid,
            rows: [row.saturating_sub(1), row, row.saturating_add(1)],
            cols: [col.saturating_sub(1), col, col.saturating_add(1)],
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> bool {
        self.grid.is_alive(self.rows[row], self.cols[col])
    }

    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(bool),
    {
        f(self.cell(0, 0));
        f(self.cell(0, 1));
        f(self.cell(0, 2));

        f(self.cell(1, 0));
        f(self.cell(1, 2));

        f(self.cell(2, 0));
        f(self.cell(2, 1));
        f(self.cell(2, 2));
    }

    pub fn num_live(&self) -> u8 {
        let mut result = 0;
        self.for_neighbor_cells(|alive| {
            if alive {
                result += 1;
            }
        });
        result
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Loc {
    pub row: u32,
    pub col: u32,
}

impl Loc {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn grid_index(&self, width: u32, height: u32) -> Option<usize> {
        if self.row < height && self.col < width {
            Some(self.row as usize * width as usize + self.col as usize)
        } else {
            None
        }
    }
}
