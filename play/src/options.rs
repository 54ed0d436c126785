use anyhow::{Context, Result};
use arena::ArenaOptions;
use board::{BoardState, ShapeSet};
use common::Config;
use self_learn::SelfLearnOptions;
use self_play::SelfPlayOptions;
use serde::{Deserialize, Serialize};

/// Board size and the named set of winning shapes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardOptions {
    pub size: usize,
    pub shapes: ShapeSet,
}

impl BoardOptions {
    /// The empty board these options describe.
    pub fn start(&self) -> Result<BoardState> {
        BoardState::initial(self.size, self.shapes.patterns()).with_context(|| {
            format!(
                "Invalid board of size {} with {} shapes",
                self.size, self.shapes
            )
        })
    }
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            size: 3,
            shapes: ShapeSet::TicTacToe,
        }
    }
}

impl Config for BoardOptions {
    fn load(config: &common::ConfigLoader) -> Result<Self> {
        let default = Self::default();

        let shapes = match config.get("shapes").and_then(|v| v.as_string()) {
            Some(name) => name.parse()?,
            None => default.shapes,
        };

        Ok(Self {
            size: config
                .get("size")
                .and_then(|v| v.as_usize())
                .unwrap_or(default.size),
            shapes,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayOptions {
    /// Temperature used when the engine picks a move for the host.
    pub temperature: f32,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self { temperature: 0.5 }
    }
}

impl Config for PlayOptions {
    fn load(config: &common::ConfigLoader) -> Result<Self> {
        Ok(Self {
            temperature: config
                .get("play_temperature")
                .and_then(|v| v.as_f32())
                .unwrap_or(Self::default().temperature),
        })
    }
}

/// Everything `Game::train` needs besides the search options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainOptions {
    pub self_learn: SelfLearnOptions,
    pub self_play: SelfPlayOptions,
    pub arena: ArenaOptions,
}

impl Config for TrainOptions {
    fn load(config: &common::ConfigLoader) -> Result<Self> {
        Ok(Self {
            self_learn: config.load()?,
            self_play: config.load()?,
            arena: config.load()?,
        })
    }
}
