use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::WinPattern;

/// The named sets of winning shapes that can be selected from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeSet {
    /// Three in a row, column or diagonal.
    TicTacToe,
    /// Any of the four L-trominoes inside a 2x2 square.
    L,
    /// Three in a row or column, diagonals do not count.
    ThreeLine,
    /// The four orthogonal neighbours of a cell.
    Plus,
}

impl ShapeSet {
    pub fn patterns(&self) -> Vec<WinPattern> {
        let shapes: Vec<Vec<Vec<i8>>> = match self {
            ShapeSet::TicTacToe => vec![
                vec![vec![1, 1, 1]],
                vec![vec![1], vec![1], vec![1]],
                vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]],
                vec![vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0]],
            ],
            ShapeSet::L => vec![
                vec![vec![0, 1], vec![1, 1]],
                vec![vec![1, 0], vec![1, 1]],
                vec![vec![1, 1], vec![0, 1]],
                vec![vec![1, 1], vec![1, 0]],
            ],
            ShapeSet::ThreeLine => vec![vec![vec![1, 1, 1]], vec![vec![1], vec![1], vec![1]]],
            ShapeSet::Plus => vec![vec![vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]]],
        };

        shapes
            .into_iter()
            .map(|s| WinPattern::new(s).expect("Built in shapes are valid"))
            .collect()
    }
}

impl FromStr for ShapeSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tic-tac-toe" | "tictactoe" => Ok(ShapeSet::TicTacToe),
            "l" => Ok(ShapeSet::L),
            "three-line" | "3line" => Ok(ShapeSet::ThreeLine),
            "plus" => Ok(ShapeSet::Plus),
            other => Err(anyhow!("Unknown shape set: {}", other)),
        }
    }
}

impl Display for ShapeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeSet::TicTacToe => "tic-tac-toe",
            ShapeSet::L => "l",
            ShapeSet::ThreeLine => "three-line",
            ShapeSet::Plus => "plus",
        };

        write!(f, "{}", name)
    }
}
