use board::BoardState;

/// Maps a position to a move prior and a value estimate.
///
/// Implementations must be synchronous and free of side effects visible to the caller. The
/// value is from the perspective of the player to move and lies in `[-1, 1]`.
pub trait GameAnalyzer {
    fn get_state_analysis(&self, game_state: &BoardState) -> GameStateAnalysis;
}

impl<T: GameAnalyzer + ?Sized> GameAnalyzer for &T {
    fn get_state_analysis(&self, game_state: &BoardState) -> GameStateAnalysis {
        (**self).get_state_analysis(game_state)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameStateAnalysis {
    /// One probability per cell, in row-major order.
    pub policy_scores: Vec<f32>,
    pub value_score: f32,
}

impl GameStateAnalysis {
    pub fn new(value_score: f32, policy_scores: Vec<f32>) -> Self {
        GameStateAnalysis {
            policy_scores,
            value_score,
        }
    }
}
