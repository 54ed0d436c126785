use std::fmt::{self, Display, Formatter};
use std::path::Path;

use anyhow::Result;
use board::BoardState;
use common::LogSink;
use mcts::{sample_action, MCTSOptions, MCTS};
use model::{GameAnalyzer, Model, ModelFactory};
use rand::rngs::StdRng;
use self_learn::{IterationReport, SelfLearn};

use super::{PlayOptions, TrainOptions};

/// A game between two sides, one of which may be driven by the engine.
///
/// Internally the board is kept in canonical form. Everything this type hands out is in the fixed
/// perspective of the side that moved first: its stones are `1` and a result of `1.0` means it
/// won.
pub struct Game<'a, F: ModelFactory> {
    model_factory: F,
    model: F::M,
    start: BoardState,
    state: BoardState,
    current_player: i8,
    mcts_options: MCTSOptions,
    options: PlayOptions,
    rng: StdRng,
    log: LogSink<'a>,
}

impl<F: ModelFactory> Game<'static, F> {
    pub fn new(
        model_factory: F,
        model: F::M,
        start: BoardState,
        mcts_options: MCTSOptions,
        options: PlayOptions,
        rng: StdRng,
    ) -> Self {
        Self::with_log(
            model_factory,
            model,
            start,
            mcts_options,
            options,
            rng,
            LogSink::global("game"),
        )
    }
}

impl<'a, F: ModelFactory> Game<'a, F> {
    pub fn with_log(
        model_factory: F,
        model: F::M,
        start: BoardState,
        mcts_options: MCTSOptions,
        options: PlayOptions,
        rng: StdRng,
        log: LogSink<'a>,
    ) -> Self {
        Self {
            model_factory,
            model,
            state: start.clone(),
            start,
            current_player: 1,
            mcts_options,
            options,
            rng,
            log,
        }
    }

    pub fn reset(&mut self) {
        self.state = self.start.clone();
        self.current_player = 1;
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn model(&self) -> &F::M {
        &self.model
    }

    /// `1` while the side that moved first is to move, `-1` otherwise.
    pub fn current_player(&self) -> i8 {
        self.current_player
    }

    pub fn current_board(&self) -> Vec<i8> {
        self.state
            .cells()
            .iter()
            .map(|c| c * self.current_player)
            .collect()
    }

    pub fn result(&self) -> Option<f32> {
        self.state
            .result()
            .map(|r| r * self.current_player as f32)
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Searches the current position and samples a move at the configured temperature.
    pub fn predict(&mut self) -> Result<usize> {
        self.predict_with_temperature(self.options.temperature)
    }

    pub fn predict_with_temperature(&mut self, temperature: f32) -> Result<usize> {
        let mut mcts = MCTS::with_log(
            &self.model,
            self.mcts_options.clone(),
            self.log.with_target("mcts"),
        );

        let policy = mcts.predict_moves(&self.state, temperature, &mut self.rng)?;

        sample_action(&policy, &mut self.rng)
    }

    pub fn can_move(&self, index: usize) -> bool {
        !self.is_over() && self.state.is_legal(index)
    }

    /// Plays `index` for the side to move. Returns `false` and leaves the game unchanged when the
    /// move is not legal.
    pub fn take_action(&mut self, index: usize) -> bool {
        if !self.can_move(index) {
            self.log
                .warn(format_args!("Attempted invalid move at index {}", index));
            self.log.debug(format_args!(
                "In\n{}\nat index {}",
                self.state.render(self.current_player),
                index
            ));
            return false;
        }

        self.state = self.state.take_action(index);
        self.current_player = -self.current_player;
        true
    }

    /// The model's value estimate of the current position for the side that moved first.
    pub fn evaluation(&self) -> f32 {
        self.model.get_state_analysis(&self.state).value_score * self.current_player as f32
    }

    pub fn save_model(&self, path: &Path) -> Result<()> {
        self.model.save(path)?;
        self.log
            .info(format_args!("Saved model to {}", path.display()));

        Ok(())
    }

    /// Runs self-learning from the starting position, continuing from the current model, and
    /// plays with the accepted model afterwards.
    pub fn train(&mut self, options: &TrainOptions) -> Result<Vec<IterationReport>> {
        let self_learn = SelfLearn::with_log(
            &self.model_factory,
            options.self_learn.clone(),
            self.mcts_options.clone(),
            options.self_play.clone(),
            options.arena.clone(),
            self.log.with_target("self_learn"),
        )?;

        let (model, reports) = self_learn.learn(self.model.clone(), &self.start, &mut self.rng)?;
        self.model = model;

        Ok(reports)
    }
}

impl<F: ModelFactory> Display for Game<'_, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.state.render(self.current_player))
    }
}
