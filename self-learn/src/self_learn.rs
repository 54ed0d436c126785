use anyhow::{Context, Result};
use arena::{Arena, ArenaOptions};
use board::BoardState;
use common::LogSink;
use mcts::{MCTSOptions, MCTS};
use model::{Model, ModelFactory};
use rand::Rng;
use self_play::{SelfPlay, SelfPlayOptions};
use serde::Serialize;

use super::{ExamplePool, SelfLearnOptions};

/// Runs the generate, train, evaluate loop.
pub struct SelfLearn<'a, F> {
    model_factory: &'a F,
    options: SelfLearnOptions,
    mcts_options: MCTSOptions,
    self_play_options: SelfPlayOptions,
    arena_options: ArenaOptions,
    log: LogSink<'a>,
}

/// What happened during one training round.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IterationReport {
    pub iteration: usize,
    /// Arena score of the freshly trained challenger against the accepted model.
    pub challenger_score: f32,
    pub accepted: bool,
    /// Arena score of the accepted model against an untrained one.
    pub untrained_score: f32,
    pub pool_size: usize,
}

impl<'a, F> SelfLearn<'a, F>
where
    F: ModelFactory,
{
    pub fn new(
        model_factory: &'a F,
        options: SelfLearnOptions,
        mcts_options: MCTSOptions,
        self_play_options: SelfPlayOptions,
        arena_options: ArenaOptions,
    ) -> Result<Self> {
        Self::with_log(
            model_factory,
            options,
            mcts_options,
            self_play_options,
            arena_options,
            LogSink::global("self_learn"),
        )
    }

    pub fn with_log(
        model_factory: &'a F,
        options: SelfLearnOptions,
        mcts_options: MCTSOptions,
        self_play_options: SelfPlayOptions,
        arena_options: ArenaOptions,
        log: LogSink<'a>,
    ) -> Result<Self> {
        options.validate()?;
        mcts_options.validate()?;
        arena_options.validate()?;

        Ok(Self {
            model_factory,
            options,
            mcts_options,
            self_play_options,
            arena_options,
            log,
        })
    }

    /// The model training starts from: the configured saved model, or a new untrained one.
    pub fn initial_model(&self) -> Result<F::M> {
        match &self.options.model_path {
            Some(path) => {
                self.log
                    .info(format_args!("Loading model from {}", path.display()));

                self.model_factory
                    .load(path)
                    .with_context(|| format!("Failed to load model at {:?}", path))
            }
            None => Ok(self.model_factory.create()),
        }
    }

    /// Trains starting from `initial_model` for the configured number of iterations and returns
    /// the last accepted model along with a report per iteration.
    pub fn learn<R: Rng + ?Sized>(
        &self,
        initial_model: F::M,
        start: &BoardState,
        rng: &mut R,
    ) -> Result<(F::M, Vec<IterationReport>)> {
        let self_play = SelfPlay::with_log(
            self.self_play_options.clone(),
            self.log.with_target("self_play"),
        );
        let arena = Arena::with_log(self.arena_options.clone(), self.log.with_target("arena"));

        let mut accepted = initial_model;
        let mut pool = ExamplePool::new();
        let mut reports = Vec::with_capacity(self.options.iterations);

        for iteration in 1..=self.options.iterations {
            self.log.info(format_args!(
                "Starting iteration {} of {}",
                iteration, self.options.iterations
            ));

            let examples = {
                let mut mcts = self.mcts(&accepted);
                self_play.play(
                    &mut mcts,
                    start,
                    self.options.episodes_per_iteration,
                    rng,
                )?
            };

            pool.extend(examples);
            self.log.info(format_args!(
                "Example pool holds {} examples",
                pool.len()
            ));

            let mut challenger = accepted.clone();
            challenger.train(pool.examples())?;
            self.log.debug(format_args!(
                "Trained challenger on {} examples",
                pool.len()
            ));

            let challenger_result = {
                let mut mcts_challenger = self.mcts(&challenger);
                let mut mcts_accepted = self.mcts(&accepted);
                arena.evaluate(&mut mcts_challenger, &mut mcts_accepted, start, rng)?
            };

            let is_accepted = challenger_result.score >= self.options.acceptance_threshold;

            if is_accepted {
                self.log.info(format_args!(
                    "Accepting challenger with score {:.3}",
                    challenger_result.score
                ));
                accepted = challenger;
            } else {
                self.log.info(format_args!(
                    "Rejecting challenger with score {:.3}",
                    challenger_result.score
                ));
            }

            let untrained = self.model_factory.create();
            let untrained_result = {
                let mut mcts_accepted = self.mcts(&accepted);
                let mut mcts_untrained = self.mcts(&untrained);
                arena.evaluate(&mut mcts_accepted, &mut mcts_untrained, start, rng)?
            };

            self.log.info(format_args!(
                "Score against an untrained model: {:.3}",
                untrained_result.score
            ));

            reports.push(IterationReport {
                iteration,
                challenger_score: challenger_result.score,
                accepted: is_accepted,
                untrained_score: untrained_result.score,
                pool_size: pool.len(),
            });
        }

        Ok((accepted, reports))
    }

    fn mcts<'m>(&self, model: &'m F::M) -> MCTS<'m, F::M>
    where
        'a: 'm,
    {
        MCTS::with_log(
            model,
            self.mcts_options.clone(),
            self.log.with_target("mcts"),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use anyhow::anyhow;
    use assert_approx_eq::assert_approx_eq;
    use board::ShapeSet;
    use common::CaptureLog;
    use log::Level;
    use model::{GameAnalyzer, GameStateAnalysis, TabularModelFactory, TrainingExample};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Clone, Debug, Default)]
    struct RecordingModel {
        examples_seen: usize,
        times_trained: usize,
    }

    impl GameAnalyzer for RecordingModel {
        fn get_state_analysis(&self, game_state: &BoardState) -> GameStateAnalysis {
            let num_cells = game_state.cells().len();
            GameStateAnalysis::new(0.0, vec![1.0 / num_cells as f32; num_cells])
        }
    }

    impl Model for RecordingModel {
        fn train(&mut self, examples: &[TrainingExample]) -> Result<()> {
            self.examples_seen = examples.len();
            self.times_trained += 1;
            Ok(())
        }

        fn save(&self, _: &Path) -> Result<()> {
            Ok(())
        }
    }

    struct RecordingModelFactory;

    impl ModelFactory for RecordingModelFactory {
        type M = RecordingModel;

        fn create(&self) -> Self::M {
            RecordingModel::default()
        }

        fn load(&self, path: &Path) -> Result<Self::M> {
            Err(anyhow!("Nothing saved at {:?}", path))
        }
    }

    fn tic_tac_toe(cells: Vec<i8>) -> BoardState {
        BoardState::initial(3, ShapeSet::TicTacToe.patterns())
            .unwrap()
            .with_cells(cells)
            .unwrap()
    }

    /// One empty cell left and whoever fills it wins, so every arena comparison is even.
    fn one_move_win() -> BoardState {
        tic_tac_toe(vec![1, 1, 0, -1, -1, 1, -1, 1, -1])
    }

    fn options(iterations: usize, acceptance_threshold: f32) -> SelfLearnOptions {
        SelfLearnOptions {
            iterations,
            episodes_per_iteration: 2,
            acceptance_threshold,
            model_path: None,
        }
    }

    fn arena_options() -> ArenaOptions {
        ArenaOptions {
            evaluation_matches: 2,
            temperature: 1.0,
        }
    }

    fn self_learn(
        factory: &RecordingModelFactory,
        options: SelfLearnOptions,
    ) -> Result<SelfLearn<'_, RecordingModelFactory>> {
        SelfLearn::new(
            factory,
            options,
            MCTSOptions::new(3, 1.0),
            SelfPlayOptions::default(),
            arena_options(),
        )
    }

    #[test]
    fn test_accepted_challenger_is_trained_on_whole_pool() {
        let factory = RecordingModelFactory;
        let self_learn = SelfLearn::new(
            &factory,
            options(3, 0.5),
            MCTSOptions::new(3, 1.0),
            SelfPlayOptions::default(),
            arena_options(),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let (model, reports) = self_learn
            .learn(factory.create(), &one_move_win(), &mut rng)
            .unwrap();

        let pool_sizes: Vec<usize> = reports.iter().map(|r| r.pool_size).collect();
        assert_eq!(pool_sizes, vec![16, 32, 48]);
        assert!(reports.iter().all(|r| r.accepted));
        for report in &reports {
            assert_approx_eq!(report.challenger_score, 0.5);
            assert_approx_eq!(report.untrained_score, 0.5);
        }
        assert_eq!(model.examples_seen, 48);
        assert_eq!(model.times_trained, 3);
    }

    #[test]
    fn test_rejected_challenger_leaves_accepted_model_untouched() {
        let factory = RecordingModelFactory;
        let self_learn = self_learn(&factory, options(2, 0.55)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let (model, reports) = self_learn
            .learn(factory.create(), &one_move_win(), &mut rng)
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| !r.accepted));
        assert_eq!(reports[1].pool_size, 32);
        assert_eq!(model.examples_seen, 0);
        assert_eq!(model.times_trained, 0);
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let factory = RecordingModelFactory;

        assert!(self_learn(&factory, options(1, 0.0)).is_err());
        assert!(self_learn(&factory, options(1, 1.01)).is_err());
        assert!(self_learn(&factory, options(1, 1.0)).is_ok());
    }

    #[test]
    fn test_invalid_search_or_arena_options_are_rejected() {
        let factory = RecordingModelFactory;

        let no_simulations = SelfLearn::new(
            &factory,
            options(1, 0.5),
            MCTSOptions::new(0, 1.0),
            SelfPlayOptions::default(),
            arena_options(),
        );
        assert!(no_simulations.is_err());

        let no_matches = SelfLearn::new(
            &factory,
            options(1, 0.5),
            MCTSOptions::new(3, 1.0),
            SelfPlayOptions::default(),
            ArenaOptions {
                evaluation_matches: 0,
                temperature: 1.0,
            },
        );
        assert!(no_matches.is_err());
    }

    #[test]
    fn test_initial_model() {
        let factory = RecordingModelFactory;

        let fresh = self_learn(&factory, options(1, 0.5)).unwrap();
        assert_eq!(fresh.initial_model().unwrap().times_trained, 0);

        let mut with_path = options(1, 0.5);
        with_path.model_path = Some(PathBuf::from("missing.json.gz"));
        let from_disk = self_learn(&factory, with_path).unwrap();
        assert!(from_disk.initial_model().is_err());
    }

    #[test]
    fn test_learns_tic_tac_toe_with_tabular_model() {
        let factory = TabularModelFactory::new(3);
        let capture = CaptureLog::new();
        let self_learn = SelfLearn::with_log(
            &factory,
            options(2, 0.55),
            MCTSOptions::new(5, 1.0),
            SelfPlayOptions::default(),
            arena_options(),
            capture.sink("self_learn"),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let (_, reports) = self_learn
            .learn(factory.create(), &tic_tac_toe(vec![0; 9]), &mut rng)
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports[1].pool_size > reports[0].pool_size);
        assert_eq!(reports[0].pool_size % 8, 0);

        for report in reports {
            assert!((0.0..=1.0).contains(&report.challenger_score));
            assert!((0.0..=1.0).contains(&report.untrained_score));
        }

        assert!(capture.contains(Level::Info, "Example pool holds"));
        assert!(capture.contains(Level::Info, "Starting iteration 2 of 2"));
        assert_eq!(
            capture
                .records()
                .iter()
                .filter(|r| {
                    r.target == "self_learn" && r.message.starts_with("Trained challenger")
                })
                .count(),
            2
        );
        assert!(capture
            .records()
            .iter()
            .any(|r| r.target == "arena" && r.level == Level::Info));
    }
}
