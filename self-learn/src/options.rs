use std::path::PathBuf;

use anyhow::{anyhow, Result};
use common::Config;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfLearnOptions {
    pub iterations: usize,
    pub episodes_per_iteration: usize,
    /// Minimum arena score a challenger needs to replace the accepted model. In `(0, 1]`.
    pub acceptance_threshold: f32,
    /// A previously saved model to start from instead of an untrained one.
    pub model_path: Option<PathBuf>,
}

impl SelfLearnOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.acceptance_threshold > 0.0 && self.acceptance_threshold <= 1.0) {
            return Err(anyhow!(
                "acceptance_threshold must be in (0, 1], got {}",
                self.acceptance_threshold
            ));
        }

        Ok(())
    }
}

impl Default for SelfLearnOptions {
    fn default() -> Self {
        Self {
            iterations: 10,
            episodes_per_iteration: 16,
            acceptance_threshold: 0.55,
            model_path: None,
        }
    }
}

impl Config for SelfLearnOptions {
    fn load(config: &common::ConfigLoader) -> Result<Self> {
        let default = Self::default();

        let options = Self {
            iterations: config
                .get("iterations")
                .and_then(|v| v.as_usize())
                .unwrap_or(default.iterations),
            episodes_per_iteration: config
                .get("episodes_per_iteration")
                .and_then(|v| v.as_usize())
                .unwrap_or(default.episodes_per_iteration),
            acceptance_threshold: config
                .get("acceptance_threshold")
                .and_then(|v| v.as_f32())
                .unwrap_or(default.acceptance_threshold),
            model_path: config.get_relative_path("model_path"),
        };

        options.validate()?;

        Ok(options)
    }
}
