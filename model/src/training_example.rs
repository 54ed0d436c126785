use serde::{Deserialize, Serialize};

/// One labelled self-play position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub size: usize,
    /// The canonical board, row-major.
    pub board: Vec<i8>,
    /// Target move distribution over all cells.
    pub policy: Vec<f32>,
    /// Final outcome relative to the player to move at `board`.
    pub value: f32,
}

impl TrainingExample {
    pub fn new(size: usize, board: Vec<i8>, policy: Vec<f32>, value: f32) -> Self {
        Self {
            size,
            board,
            policy,
            value,
        }
    }
}
