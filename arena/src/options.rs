use anyhow::{anyhow, Result};
use common::Config;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaOptions {
    /// Number of games played per comparison.
    pub evaluation_matches: usize,
    /// Temperature of the move distribution sampled by both sides.
    pub temperature: f32,
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            evaluation_matches: 16,
            temperature: 1.0,
        }
    }
}

impl Config for ArenaOptions {
    fn load(config: &common::ConfigLoader) -> Result<Self> {
        let default = Self::default();

        let options = Self {
            evaluation_matches: config
                .get("evaluation_matches")
                .and_then(|v| v.as_usize())
                .unwrap_or(default.evaluation_matches),
            temperature: config
                .get("arena_temperature")
                .and_then(|v| v.as_f32())
                .unwrap_or(default.temperature),
        };

        options.validate()?;

        Ok(options)
    }
}

impl ArenaOptions {
    pub fn validate(&self) -> Result<()> {
        if self.evaluation_matches == 0 {
            return Err(anyhow!("evaluation_matches must be at least 1"));
        }

        if self.temperature.is_nan() || self.temperature < 0.0 {
            return Err(anyhow!(
                "arena_temperature must be non-negative, got {}",
                self.temperature
            ));
        }

        Ok(())
    }
}
