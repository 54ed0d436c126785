use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use board::{BoardKey, BoardState};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use super::{GameAnalyzer, GameStateAnalysis, Model, ModelFactory, TrainingExample};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct TableEntry {
    policy: Vec<f32>,
    value: f32,
    samples: usize,
}

/// An evaluator that remembers the mean policy and outcome of every position it was trained on.
/// Positions it has never seen get a uniform policy and a neutral value.
#[derive(Clone, Debug)]
pub struct TabularModel {
    size: usize,
    entries: HashMap<BoardKey, TableEntry>,
}

#[derive(Serialize, Deserialize)]
struct TabularModelFile {
    size: usize,
    entries: Vec<(Vec<i8>, TableEntry)>,
}

impl TabularModel {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            entries: HashMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_positions(&self) -> usize {
        self.entries.len()
    }

    fn num_cells(&self) -> usize {
        self.size * self.size
    }

    fn uniform_policy(&self) -> Vec<f32> {
        let num_cells = self.num_cells();
        vec![1.0 / num_cells as f32; num_cells]
    }

    fn from_file(file: TabularModelFile) -> Self {
        Self {
            size: file.size,
            entries: file
                .entries
                .into_iter()
                .map(|(key, entry)| (BoardKey::from(key), entry))
                .collect(),
        }
    }

    fn to_file(&self) -> TabularModelFile {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.cells().to_vec(), entry.clone()))
            .collect();

        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        TabularModelFile {
            size: self.size,
            entries,
        }
    }
}

impl GameAnalyzer for TabularModel {
    fn get_state_analysis(&self, game_state: &BoardState) -> GameStateAnalysis {
        match self.entries.get(&game_state.key()) {
            Some(entry) => GameStateAnalysis::new(entry.value, entry.policy.clone()),
            None => GameStateAnalysis::new(0.0, self.uniform_policy()),
        }
    }
}

impl Model for TabularModel {
    fn train(&mut self, examples: &[TrainingExample]) -> Result<()> {
        let num_cells = self.num_cells();
        let mut entries: HashMap<BoardKey, TableEntry> = HashMap::new();

        for example in examples {
            if example.size != self.size
                || example.board.len() != num_cells
                || example.policy.len() != num_cells
            {
                return Err(anyhow!(
                    "Training example for a board of size {} does not fit a model of size {}",
                    example.size,
                    self.size
                ));
            }

            let entry = entries
                .entry(BoardKey::from(example.board.clone()))
                .or_insert_with(|| TableEntry {
                    policy: vec![0.0; num_cells],
                    value: 0.0,
                    samples: 0,
                });

            for (total, p) in entry.policy.iter_mut().zip(example.policy.iter()) {
                *total += p;
            }

            entry.value += example.value;
            entry.samples += 1;
        }

        for entry in entries.values_mut() {
            let samples = entry.samples as f32;

            for p in entry.policy.iter_mut() {
                *p /= samples;
            }

            entry.value /= samples;
        }

        self.entries = entries;

        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create model file at: {:?}", path))?;
        let mut compressor = GzEncoder::new(file, Compression::default());
        serde_json::to_writer(&mut compressor, &self.to_file())?;
        compressor.finish()?;

        Ok(())
    }
}

pub struct TabularModelFactory {
    size: usize,
}

impl TabularModelFactory {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl ModelFactory for TabularModelFactory {
    type M = TabularModel;

    fn create(&self) -> Self::M {
        TabularModel::new(self.size)
    }

    fn load(&self, path: &Path) -> Result<Self::M> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model file at: {:?}", path))?;
        let content = GzDecoder::new(file);
        let model_file: TabularModelFile = serde_json::from_reader(content)
            .with_context(|| format!("Failed to read model file at: {:?}", path))?;

        if model_file.size != self.size {
            return Err(anyhow!(
                "Model at {:?} was trained for size {} but size {} was requested",
                PathBuf::from(path),
                model_file.size,
                self.size
            ));
        }

        Ok(TabularModel::from_file(model_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use board::ShapeSet;

    fn start() -> BoardState {
        BoardState::initial(3, ShapeSet::TicTacToe.patterns()).unwrap()
    }

    fn one_hot(index: usize) -> Vec<f32> {
        let mut policy = vec![0.0; 9];
        policy[index] = 1.0;
        policy
    }

    #[test]
    fn test_untrained_is_uniform_and_neutral() {
        let model = TabularModelFactory::new(3).create();
        let analysis = model.get_state_analysis(&start());

        assert_eq!(analysis.policy_scores.len(), 9);
        assert_approx_eq!(analysis.policy_scores.iter().sum::<f32>(), 1.0);
        assert_approx_eq!(analysis.value_score, 0.0);
    }

    #[test]
    fn test_train_averages_examples_of_the_same_position() {
        let mut model = TabularModel::new(3);
        let examples = vec![
            TrainingExample::new(3, vec![0; 9], one_hot(0), 1.0),
            TrainingExample::new(3, vec![0; 9], one_hot(4), -1.0),
            TrainingExample::new(3, vec![0; 9], one_hot(4), 1.0),
        ];

        model.train(&examples).unwrap();
        let analysis = model.get_state_analysis(&start());

        assert_eq!(model.num_positions(), 1);
        assert_approx_eq!(analysis.policy_scores[0], 1.0 / 3.0);
        assert_approx_eq!(analysis.policy_scores[4], 2.0 / 3.0);
        assert_approx_eq!(analysis.value_score, 1.0 / 3.0);
    }

    #[test]
    fn test_train_replaces_previous_table() {
        let mut model = TabularModel::new(3);
        let other = start().take_action(0);

        model
            .train(&[TrainingExample::new(3, vec![0; 9], one_hot(0), 1.0)])
            .unwrap();
        model
            .train(&[TrainingExample::new(3, other.cells().to_vec(), one_hot(1), -1.0)])
            .unwrap();

        assert_approx_eq!(model.get_state_analysis(&start()).value_score, 0.0);
        assert_approx_eq!(model.get_state_analysis(&other).value_score, -1.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = TabularModel::new(3);
        let mut challenger = original.clone();

        challenger
            .train(&[TrainingExample::new(3, vec![0; 9], one_hot(0), 1.0)])
            .unwrap();

        assert_eq!(original.num_positions(), 0);
        assert_eq!(challenger.num_positions(), 1);
    }

    #[test]
    fn test_rejects_examples_of_another_size() {
        let mut model = TabularModel::new(3);
        let example = TrainingExample::new(4, vec![0; 16], vec![0.0; 16], 0.0);

        assert!(model.train(&[example]).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json.gz");
        let mut model = TabularModel::new(3);
        let examples = vec![
            TrainingExample::new(3, vec![0; 9], one_hot(4), 0.5),
            TrainingExample::new(3, start().take_action(4).cells().to_vec(), one_hot(0), -0.5),
        ];
        model.train(&examples).unwrap();

        model.save(&path).unwrap();
        let loaded = TabularModelFactory::new(3).load(&path).unwrap();

        assert_eq!(loaded.num_positions(), 2);
        assert_eq!(
            loaded.get_state_analysis(&start()),
            model.get_state_analysis(&start())
        );
        assert!(TabularModelFactory::new(4).load(&path).is_err());
    }
}
