use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use itertools::Itertools;

use super::{MoveMask, WinPattern};

/// Content address of a position: the cells of the board and nothing else.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardKey(Box<[i8]>);

impl BoardKey {
    pub fn cells(&self) -> &[i8] {
        &self.0
    }
}

impl From<Vec<i8>> for BoardKey {
    fn from(cells: Vec<i8>) -> Self {
        Self(cells.into_boxed_slice())
    }
}

/// An immutable game position in canonical form.
///
/// The stones of the player about to move are always stored as `1` and the stones of the player
/// who just moved as `-1`. `take_action` places a `1` and then negates the whole board, so the
/// perspective flips on every ply and all values are relative to the player to move.
#[derive(Clone, Debug)]
pub struct BoardState {
    size: usize,
    cells: Vec<i8>,
    patterns: Arc<[WinPattern]>,
}

impl BoardState {
    /// The empty starting position.
    pub fn initial(size: usize, patterns: Vec<WinPattern>) -> Result<Self> {
        Self::from_cells(size, vec![0; size * size], patterns.into())
    }

    pub fn from_cells(size: usize, cells: Vec<i8>, patterns: Arc<[WinPattern]>) -> Result<Self> {
        if size == 0 {
            return Err(anyhow!("Board size must be at least 1"));
        }

        if cells.len() != size * size {
            return Err(anyhow!(
                "Expected {} cells for a board of size {}, got {}",
                size * size,
                size,
                cells.len()
            ));
        }

        if let Some(v) = cells.iter().find(|v| !(-1..=1).contains(*v)) {
            return Err(anyhow!("Board cells must be -1, 0 or 1, found {}", v));
        }

        if let Some(p) = patterns.iter().find(|p| !p.fits(size)) {
            return Err(anyhow!(
                "A {}x{} pattern does not fit on a board of size {}",
                p.rows(),
                p.cols(),
                size
            ));
        }

        Ok(Self {
            size,
            cells,
            patterns,
        })
    }

    /// A position with the same size and patterns but different contents.
    pub fn with_cells(&self, cells: Vec<i8>) -> Result<Self> {
        Self::from_cells(self.size, cells, self.patterns.clone())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> i8 {
        self.cells[row * self.size + col]
    }

    pub fn patterns(&self) -> &Arc<[WinPattern]> {
        &self.patterns
    }

    pub fn key(&self) -> BoardKey {
        BoardKey::from(self.cells.clone())
    }

    /// The result from the perspective of the player to move. `Some(-1.0)` when the previous mover
    /// completed a pattern, `Some(1.0)` when a pattern of the player to move is on the board,
    /// `Some(0.0)` for a full board without a pattern and `None` while the game is ongoing.
    pub fn result(&self) -> Option<f32> {
        for pattern in self.patterns.iter() {
            if let Some(sign) = pattern.matches(&self.cells, self.size) {
                return Some(sign as f32);
            }
        }

        if self.cells.iter().all(|c| *c != 0) {
            return Some(0.0);
        }

        None
    }

    pub fn is_terminal(&self) -> bool {
        self.result().is_some()
    }

    pub fn moves(&self) -> MoveMask {
        MoveMask::new(self.cells.iter().map(|c| *c == 0).collect())
    }

    pub fn is_legal(&self, index: usize) -> bool {
        self.cells.get(index).map_or(false, |c| *c == 0)
    }

    /// Places a stone for the player to move at `index` and flips the board to the next player's
    /// perspective. `index` must be legal.
    pub fn take_action(&self, index: usize) -> Self {
        debug_assert!(self.is_legal(index), "Illegal move {} on {:?}", index, self.cells);

        let mut cells = self.cells.clone();
        cells[index] = 1;
        for cell in cells.iter_mut() {
            *cell = -*cell;
        }

        Self {
            size: self.size,
            cells,
            patterns: self.patterns.clone(),
        }
    }

    pub fn try_take_action(&self, index: usize) -> Result<Self> {
        if !self.is_legal(index) {
            return Err(anyhow!("Move {} is not legal", index));
        }

        Ok(self.take_action(index))
    }

    /// Number of stones on the board.
    pub fn number_of_actions(&self) -> usize {
        self.cells.iter().filter(|c| **c != 0).count()
    }

    /// Renders the board with `x` for the stones that `perspective` maps to `1`.
    pub fn render(&self, perspective: i8) -> String {
        self.cells
            .chunks(self.size)
            .map(|row| {
                row.iter()
                    .map(|c| match c * perspective {
                        1 => "x",
                        -1 => "o",
                        _ => ".",
                    })
                    .join(" ")
            })
            .join("\n")
    }
}

impl Hash for BoardState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for BoardState {}

impl Display for BoardState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.render(1))
    }
}
