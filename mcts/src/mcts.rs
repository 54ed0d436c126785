use std::collections::HashMap;

use anyhow::{anyhow, Result};
use board::{BoardKey, BoardState};
use common::{normalize_in_place, LogSink};
use model::GameAnalyzer;
use rand::Rng;

use super::node::MCTSNode;
use super::options::MCTSOptions;
use super::temp::visits_to_distribution;

/// Monte-Carlo tree search over canonical board states.
///
/// Statistics are keyed by board contents and persist across calls, so repeated searches from
/// the same position keep refining the same tree. Values returned by `search` are from the
/// perspective of the player to move in the searched state.
pub struct MCTS<'a, M> {
    analyzer: &'a M,
    options: MCTSOptions,
    log: LogSink<'a>,
    nodes: HashMap<BoardKey, MCTSNode>,
    terminals: HashMap<BoardKey, Option<f32>>,
}

impl<'a, M> MCTS<'a, M>
where
    M: GameAnalyzer,
{
    pub fn new(analyzer: &'a M, options: MCTSOptions) -> Self {
        Self::with_log(analyzer, options, LogSink::global("mcts"))
    }

    pub fn with_log(analyzer: &'a M, options: MCTSOptions, log: LogSink<'a>) -> Self {
        Self {
            analyzer,
            options,
            log,
            nodes: HashMap::new(),
            terminals: HashMap::new(),
        }
    }

    pub fn options(&self) -> &MCTSOptions {
        &self.options
    }

    /// Runs one simulation from `game_state` and returns its value.
    pub fn search(&mut self, game_state: &BoardState) -> Result<f32> {
        let key = game_state.key();

        let terminal = *self
            .terminals
            .entry(key.clone())
            .or_insert_with(|| game_state.result());

        if let Some(result) = terminal {
            return Ok(result);
        }

        if !self.nodes.contains_key(&key) {
            return Ok(self.expand(key, game_state));
        }

        let action = self.select_action(&key)?;
        let next_state = game_state.take_action(action);
        let value = -self.search(&next_state)?;

        if let Some(node) = self.nodes.get_mut(&key) {
            node.backup(action, value);
        }

        Ok(value)
    }

    /// Runs the configured number of simulations from `game_state`.
    pub fn search_simulations(&mut self, game_state: &BoardState) -> Result<()> {
        for _ in 0..self.options.simulations {
            self.search(game_state)?;
        }

        Ok(())
    }

    /// Searches `game_state` and converts the resulting visit counts into a move distribution.
    ///
    /// A temperature of zero returns a one-hot vector on a most visited move. Larger temperatures
    /// flatten the distribution. Illegal moves always receive zero probability.
    pub fn predict_moves<R: Rng + ?Sized>(
        &mut self,
        game_state: &BoardState,
        temperature: f32,
        rng: &mut R,
    ) -> Result<Vec<f32>> {
        if temperature.is_nan() || temperature < 0.0 {
            return Err(anyhow!("Temperature must be non-negative, got {}", temperature));
        }

        if self.options.simulations == 0 {
            return Err(anyhow!("Predicting moves needs at least one simulation"));
        }

        if game_state.is_terminal() {
            return Err(anyhow!(
                "Cannot predict moves for a terminal state:{}",
                game_state
            ));
        }

        self.search_simulations(game_state)?;

        let visits = self
            .visit_counts(game_state)
            .unwrap_or_else(|| vec![0; game_state.cells().len()]);

        Ok(visits_to_distribution(
            &visits,
            &game_state.moves(),
            temperature,
            rng,
        ))
    }

    /// Visit count of every move out of `game_state`, or `None` if it has not been expanded.
    pub fn visit_counts(&self, game_state: &BoardState) -> Option<Vec<usize>> {
        self.nodes
            .get(&game_state.key())
            .map(|node| node.edges().iter().map(|e| e.visits()).collect())
    }

    /// Number of simulations that passed through `game_state` after its expansion.
    pub fn state_visits(&self, game_state: &BoardState) -> usize {
        self.nodes
            .get(&game_state.key())
            .map_or(0, |node| node.visits())
    }

    pub fn action_value(&self, game_state: &BoardState, action: usize) -> Option<f32> {
        self.nodes
            .get(&game_state.key())
            .and_then(|node| node.edge(action))
            .map(|edge| edge.value())
    }

    /// The masked and renormalized prior stored when `game_state` was expanded.
    pub fn prior(&self, game_state: &BoardState) -> Option<&[f32]> {
        self.nodes.get(&game_state.key()).map(|node| node.policy())
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn expand(&mut self, key: BoardKey, game_state: &BoardState) -> f32 {
        let analysis = self.analyzer.get_state_analysis(game_state);
        let moves = game_state.moves();

        let mut policy: Vec<f32> = moves
            .iter()
            .enumerate()
            .map(|(i, legal)| {
                if legal {
                    analysis.policy_scores.get(i).copied().unwrap_or(0.0)
                } else {
                    0.0
                }
            })
            .collect();

        if normalize_in_place(&mut policy) == 0.0 {
            self.log.debug(format_args!(
                "Prior for expanded state has no mass on legal moves:{}",
                game_state
            ));
        }

        self.nodes.insert(key, MCTSNode::new(policy, moves));

        analysis.value_score
    }

    fn select_action(&self, key: &BoardKey) -> Result<usize> {
        let node = self
            .nodes
            .get(key)
            .ok_or_else(|| anyhow!("Selection requested for an unexpanded state"))?;

        let cpuct = self.options.cpuct;
        let state_visits = node.visits() as f32;
        let mut best_score = f32::NEG_INFINITY;
        let mut best_action = None;

        for (action, edge) in node.edges().iter().enumerate() {
            if !node.moves().is_legal(action) {
                continue;
            }

            let prior = node.policy()[action];
            let score = edge.value()
                + cpuct * prior * (2.0 * state_visits / (1 + edge.visits()) as f32).sqrt();

            if score.is_nan() {
                self.log.warn(format_args!(
                    "Invalid statistics for action {}: value {} visits {} prior {} state visits {}",
                    action,
                    edge.value(),
                    edge.visits(),
                    prior,
                    state_visits
                ));
                continue;
            }

            if score > best_score {
                best_score = score;
                best_action = Some(action);
            }
        }

        best_action.ok_or_else(|| {
            self.log.warn(format_args!(
                "No selectable move for state {:?} after {} visits",
                key.cells(),
                state_visits
            ));
            anyhow!("No selectable move for an expanded non-terminal state")
        })
    }
}
