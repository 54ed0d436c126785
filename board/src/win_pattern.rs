use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// A binary shape that ends the game when every marked cell holds the same colour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinPattern {
    rows: usize,
    cols: usize,
    cells: Vec<i8>,
    magnitude: i32,
}

impl WinPattern {
    pub fn new(rows: Vec<Vec<i8>>) -> Result<Self> {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, |r| r.len());

        if num_rows == 0 || num_cols == 0 {
            return Err(anyhow!("A win pattern must have at least one row and column"));
        }

        if rows.iter().any(|r| r.len() != num_cols) {
            return Err(anyhow!("Win pattern rows must all have {} columns", num_cols));
        }

        let cells: Vec<i8> = rows.into_iter().flatten().collect();

        if let Some(v) = cells.iter().find(|v| **v != 0 && **v != 1) {
            return Err(anyhow!("Win pattern cells must be 0 or 1, found {}", v));
        }

        let magnitude = cells.iter().map(|v| (*v as i32) * (*v as i32)).sum();

        if magnitude == 0 {
            return Err(anyhow!("A win pattern must mark at least one cell"));
        }

        Ok(Self {
            rows: num_rows,
            cols: num_cols,
            cells,
            magnitude,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The pattern's squared magnitude, equal to the number of marked cells.
    pub fn magnitude(&self) -> i32 {
        self.magnitude
    }

    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.cells[row * self.cols + col]
    }

    pub fn fits(&self, size: usize) -> bool {
        self.rows <= size && self.cols <= size
    }

    /// Returns +1 or -1 if the colour of that sign fills every marked cell of the pattern at some
    /// offset of the `size` x `size` grid.
    pub fn matches(&self, cells: &[i8], size: usize) -> Option<i8> {
        if !self.fits(size) {
            return None;
        }

        for i in 0..=(size - self.rows) {
            for j in 0..=(size - self.cols) {
                let dot = self.correlate(cells, size, i, j);

                if dot.abs() == self.magnitude {
                    return Some(dot.signum() as i8);
                }
            }
        }

        None
    }

    fn correlate(&self, cells: &[i8], size: usize, row: usize, col: usize) -> i32 {
        let mut dot = 0;

        for r in 0..self.rows {
            for c in 0..self.cols {
                let p = self.get(r, c) as i32;
                if p != 0 {
                    dot += p * cells[(row + r) * size + col + c] as i32;
                }
            }
        }

        dot
    }
}
