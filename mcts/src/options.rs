use anyhow::{anyhow, Result};
use common::Config;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSOptions {
    /// Number of `search` calls made per move decision.
    pub simulations: usize,
    /// Scales the prior term of the selection score.
    pub cpuct: f32,
}

impl MCTSOptions {
    pub fn new(simulations: usize, cpuct: f32) -> Self {
        Self { simulations, cpuct }
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(anyhow!("simulations must be at least 1"));
        }

        if self.cpuct.is_nan() || self.cpuct < 0.0 {
            return Err(anyhow!("cpuct must be non-negative, got {}", self.cpuct));
        }

        Ok(())
    }
}

impl Default for MCTSOptions {
    fn default() -> Self {
        Self {
            simulations: 25,
            cpuct: 1.0,
        }
    }
}

impl Config for MCTSOptions {
    fn load(config: &common::ConfigLoader) -> Result<Self> {
        let default = Self::default();

        let options = Self {
            simulations: config
                .get("simulations")
                .and_then(|v| v.as_usize())
                .unwrap_or(default.simulations),
            cpuct: config
                .get("cpuct")
                .and_then(|v| v.as_f32())
                .unwrap_or(default.cpuct),
        };

        options.validate()?;

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ConfigLoader;

    fn load(config: &str) -> Result<MCTSOptions> {
        ConfigLoader::from_str(config, "train".to_string())?.load()
    }

    #[test]
    fn test_load_defaults_and_overrides() {
        assert_eq!(load("size = 3").unwrap(), MCTSOptions::default());
        assert_eq!(
            load("train { simulations = 40, cpuct = 2 }").unwrap(),
            MCTSOptions::new(40, 2.0)
        );
    }

    #[test]
    fn test_load_rejects_zero_simulations() {
        assert!(load("simulations = 0").is_err());
        assert!(load("cpuct = -1.5").is_err());
    }
}
