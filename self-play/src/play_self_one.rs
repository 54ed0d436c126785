use anyhow::{anyhow, Result};
use board::BoardState;
use mcts::{sample_action, MCTS};
use model::{GameAnalyzer, TrainingExample};
use rand::Rng;

use super::SelfPlayOptions;

/// A position seen during self-play and the move distribution the search produced for it.
#[derive(Clone, Debug)]
pub struct DraftExample {
    pub board: Vec<i8>,
    pub policy: Vec<f32>,
}

/// Plays one game from `start` to the end, sampling every move from the search distribution.
///
/// Returns the drafts in move order and the terminal state.
pub fn play_self_one<M, R>(
    mcts: &mut MCTS<'_, M>,
    start: &BoardState,
    options: &SelfPlayOptions,
    rng: &mut R,
) -> Result<(Vec<DraftExample>, BoardState)>
where
    M: GameAnalyzer,
    R: Rng + ?Sized,
{
    let mut game_state = start.clone();
    let mut drafts = Vec::new();

    while !game_state.is_terminal() {
        let policy = mcts.predict_moves(&game_state, options.temperature, rng)?;
        let action = sample_action(&policy, rng)?;

        drafts.push(DraftExample {
            board: game_state.cells().to_vec(),
            policy,
        });

        game_state = game_state.try_take_action(action)?;
    }

    Ok((drafts, game_state))
}

/// Attaches the game outcome to every draft.
///
/// `terminal_result` is relative to the player to move in the terminal state. Each step back
/// through the game flips the perspective, so the most recent draft receives the negated result.
pub fn label_examples(
    size: usize,
    drafts: Vec<DraftExample>,
    terminal: &BoardState,
) -> Result<Vec<TrainingExample>> {
    let terminal_result = terminal
        .result()
        .ok_or_else(|| anyhow!("Expected a terminal state:{}", terminal))?;

    let num_drafts = drafts.len();

    Ok(drafts
        .into_iter()
        .enumerate()
        .map(|(i, draft)| {
            let steps_back = num_drafts - i;
            let sign = if steps_back % 2 == 1 { -1.0 } else { 1.0 };

            TrainingExample::new(size, draft.board, draft.policy, sign * terminal_result)
        })
        .collect())
}
