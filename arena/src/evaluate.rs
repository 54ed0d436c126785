use anyhow::{anyhow, Result};
use board::BoardState;
use common::LogSink;
use mcts::{sample_action, MCTS};
use model::GameAnalyzer;
use rand::Rng;
use serde::Serialize;

use super::ArenaOptions;

/// Plays matches between two search engines.
pub struct Arena<'a> {
    options: ArenaOptions,
    log: LogSink<'a>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameResult {
    pub actions: Vec<usize>,
    /// True when the first engine passed to `Arena::test` made the first move.
    pub a_moved_first: bool,
    /// Outcome from the first engine's perspective: 1 for a win, -1 for a loss, 0 for a draw.
    pub a_score: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    /// Normalized score of the first engine in `[0, 1]`. 0.5 is an even match.
    pub score: f32,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub num_of_games_played: usize,
}

impl Arena<'static> {
    pub fn new(options: ArenaOptions) -> Self {
        Self::with_log(options, LogSink::global("arena"))
    }
}

impl<'a> Arena<'a> {
    pub fn with_log(options: ArenaOptions, log: LogSink<'a>) -> Self {
        Self { options, log }
    }

    pub fn options(&self) -> &ArenaOptions {
        &self.options
    }

    /// Plays the configured number of matches between `mcts_a` and `mcts_b`.
    pub fn evaluate<A, B, R>(
        &self,
        mcts_a: &mut MCTS<'_, A>,
        mcts_b: &mut MCTS<'_, B>,
        start: &BoardState,
        rng: &mut R,
    ) -> Result<MatchResult>
    where
        A: GameAnalyzer,
        B: GameAnalyzer,
        R: Rng + ?Sized,
    {
        self.test(mcts_a, mcts_b, start, self.options.evaluation_matches, rng)
    }

    /// Plays `matches` games from `start`, with `mcts_a` moving first in the even numbered games.
    ///
    /// Scoring starts as if every game were drawn and moves by half a point per decisive game, so
    /// the normalized score is 1.0 when `mcts_a` wins everything.
    pub fn test<A, B, R>(
        &self,
        mcts_a: &mut MCTS<'_, A>,
        mcts_b: &mut MCTS<'_, B>,
        start: &BoardState,
        matches: usize,
        rng: &mut R,
    ) -> Result<MatchResult>
    where
        A: GameAnalyzer,
        B: GameAnalyzer,
        R: Rng + ?Sized,
    {
        if matches == 0 {
            return Err(anyhow!("An arena test needs at least one match"));
        }

        let mut score = matches as f32 / 2.0;
        let mut wins = 0;
        let mut losses = 0;
        let mut draws = 0;

        for game in 0..matches {
            let a_moved_first = game % 2 == 0;
            let game_result = if a_moved_first {
                let (actions, first_score) = self.play_game(mcts_a, mcts_b, start, rng)?;
                GameResult {
                    actions,
                    a_moved_first,
                    a_score: first_score,
                }
            } else {
                let (actions, first_score) = self.play_game(mcts_b, mcts_a, start, rng)?;
                GameResult {
                    actions,
                    a_moved_first,
                    a_score: -first_score,
                }
            };

            score += 0.5 * game_result.a_score;

            if game_result.a_score > 0.0 {
                wins += 1;
            } else if game_result.a_score < 0.0 {
                losses += 1;
            } else {
                draws += 1;
            }

            self.log.debug(format_args!("{:?}", game_result));
        }

        let match_result = MatchResult {
            score: score / matches as f32,
            wins,
            losses,
            draws,
            num_of_games_played: matches,
        };

        self.log.info(format_args!(
            "Arena finished: score {:.3} (W {} / L {} / D {})",
            match_result.score, wins, losses, draws
        ));

        Ok(match_result)
    }

    /// Plays one game and returns its moves and the outcome for the side that moved first.
    fn play_game<F, S, R>(
        &self,
        first: &mut MCTS<'_, F>,
        second: &mut MCTS<'_, S>,
        start: &BoardState,
        rng: &mut R,
    ) -> Result<(Vec<usize>, f32)>
    where
        F: GameAnalyzer,
        S: GameAnalyzer,
        R: Rng + ?Sized,
    {
        let temperature = self.options.temperature;
        let mut actions = Vec::new();
        let mut state = start.clone();

        while !state.is_terminal() {
            let policy = if actions.len() % 2 == 0 {
                first.predict_moves(&state, temperature, rng)?
            } else {
                second.predict_moves(&state, temperature, rng)?
            };

            let action = sample_action(&policy, rng)?;
            state = state.try_take_action(action)?;
            actions.push(action);
        }

        let result = state
            .result()
            .ok_or_else(|| anyhow!("Expected a terminal state"))?;

        // The result is relative to the player to move, which is the first player after an even
        // number of moves.
        let first_score = if actions.len() % 2 == 0 { result } else { -result };

        Ok((actions, first_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use board::ShapeSet;
    use common::CaptureLog;
    use log::Level;
    use mcts::MCTSOptions;
    use model::TabularModel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board(cells: Vec<i8>) -> BoardState {
        BoardState::initial(3, ShapeSet::TicTacToe.patterns())
            .unwrap()
            .with_cells(cells)
            .unwrap()
    }

    fn arena(temperature: f32) -> Arena<'static> {
        Arena::new(ArenaOptions {
            evaluation_matches: 4,
            temperature,
        })
    }

    #[test]
    fn test_mover_always_wins_from_winning_position() {
        // Only cell 2 is empty and filling it completes the top row.
        let start = board(vec![1, 1, 0, -1, -1, 1, -1, 1, -1]);
        let model = TabularModel::new(3);
        let mut mcts_a = MCTS::new(&model, MCTSOptions::new(3, 1.0));
        let mut mcts_b = MCTS::new(&model, MCTSOptions::new(3, 1.0));
        let mut rng = StdRng::seed_from_u64(1);

        let result = arena(1.0)
            .test(&mut mcts_a, &mut mcts_b, &start, 3, &mut rng)
            .unwrap();

        assert_eq!(result.wins, 2);
        assert_eq!(result.losses, 1);
        assert_eq!(result.draws, 0);
        assert_eq!(result.num_of_games_played, 3);
        assert_approx_eq!(result.score, 2.0 / 3.0);
    }

    #[test]
    fn test_forced_draws_score_one_half() {
        // Only cell 8 is empty and filling it completes nothing.
        let start = board(vec![1, -1, 1, 1, -1, -1, -1, 1, 0]);
        let model = TabularModel::new(3);
        let mut mcts_a = MCTS::new(&model, MCTSOptions::new(2, 1.0));
        let mut mcts_b = MCTS::new(&model, MCTSOptions::new(2, 1.0));
        let mut rng = StdRng::seed_from_u64(1);

        let result = arena(0.0)
            .evaluate(&mut mcts_a, &mut mcts_b, &start, &mut rng)
            .unwrap();

        assert_eq!(result.draws, 4);
        assert_approx_eq!(result.score, 0.5);
    }

    #[test]
    fn test_identical_engines_score_near_one_half() {
        let start = board(vec![0; 9]);
        let model = TabularModel::new(3);
        let mut mcts_a = MCTS::new(&model, MCTSOptions::new(5, 1.0));
        let mut mcts_b = MCTS::new(&model, MCTSOptions::new(5, 1.0));
        let mut rng = StdRng::seed_from_u64(2024);

        let result = arena(1.0)
            .test(&mut mcts_a, &mut mcts_b, &start, 200, &mut rng)
            .unwrap();

        assert_eq!(result.wins + result.losses + result.draws, 200);
        assert!(
            (result.score - 0.5).abs() < 0.15,
            "Score {} too far from an even match",
            result.score
        );
    }

    #[test]
    fn test_zero_matches_is_an_error() {
        let start = board(vec![0; 9]);
        let model = TabularModel::new(3);
        let mut mcts_a = MCTS::new(&model, MCTSOptions::new(1, 1.0));
        let mut mcts_b = MCTS::new(&model, MCTSOptions::new(1, 1.0));
        let mut rng = StdRng::seed_from_u64(1);

        assert!(arena(1.0)
            .test(&mut mcts_a, &mut mcts_b, &start, 0, &mut rng)
            .is_err());
    }

    #[test]
    fn test_reports_summary() {
        let start = board(vec![1, 1, 0, -1, -1, 1, -1, 1, -1]);
        let model = TabularModel::new(3);
        let capture = CaptureLog::new();
        let mut mcts_a = MCTS::new(&model, MCTSOptions::new(1, 1.0));
        let mut mcts_b = MCTS::new(&model, MCTSOptions::new(1, 1.0));
        let mut rng = StdRng::seed_from_u64(1);

        Arena::with_log(ArenaOptions::default(), capture.sink("arena"))
            .test(&mut mcts_a, &mut mcts_b, &start, 2, &mut rng)
            .unwrap();

        assert_eq!(capture.count(Level::Debug), 2);
        assert!(capture.contains(Level::Info, "score 0.500 (W 1 / L 1 / D 0)"));
    }
}
