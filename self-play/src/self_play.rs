use anyhow::Result;
use board::BoardState;
use common::LogSink;
use mcts::MCTS;
use model::{GameAnalyzer, TrainingExample};
use rand::Rng;

use super::{augment, label_examples, play_self_one, SelfPlayOptions};

/// Generates augmented training examples by letting one search engine play against itself.
pub struct SelfPlay<'a> {
    options: SelfPlayOptions,
    log: LogSink<'a>,
}

impl SelfPlay<'static> {
    pub fn new(options: SelfPlayOptions) -> Self {
        Self::with_log(options, LogSink::global("self_play"))
    }
}

impl<'a> SelfPlay<'a> {
    pub fn with_log(options: SelfPlayOptions, log: LogSink<'a>) -> Self {
        Self { options, log }
    }

    /// Plays a single game and returns its labelled, augmented examples.
    pub fn play_one<M, R>(
        &self,
        mcts: &mut MCTS<'_, M>,
        start: &BoardState,
        rng: &mut R,
    ) -> Result<Vec<TrainingExample>>
    where
        M: GameAnalyzer,
        R: Rng + ?Sized,
    {
        let (drafts, terminal) = play_self_one(mcts, start, &self.options, rng)?;
        let num_moves = drafts.len();
        let examples = label_examples(start.size(), drafts, &terminal)?;

        self.log.debug(format_args!(
            "Self play game finished after {} moves with result {:?}:{}",
            num_moves,
            terminal.result(),
            terminal
        ));

        Ok(augment(&examples))
    }

    /// Plays `episodes` games with the same search engine and concatenates their examples.
    pub fn play<M, R>(
        &self,
        mcts: &mut MCTS<'_, M>,
        start: &BoardState,
        episodes: usize,
        rng: &mut R,
    ) -> Result<Vec<TrainingExample>>
    where
        M: GameAnalyzer,
        R: Rng + ?Sized,
    {
        let mut examples = Vec::new();

        for _ in 0..episodes {
            examples.extend(self.play_one(mcts, start, rng)?);
        }

        self.log.info(format_args!(
            "Self play produced {} examples from {} games",
            examples.len(),
            episodes
        ));

        Ok(examples)
    }
}
