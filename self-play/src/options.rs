use anyhow::Result;
use common::Config;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayOptions {
    /// Temperature of the move distribution sampled during self-play.
    pub temperature: f32,
}

impl Default for SelfPlayOptions {
    fn default() -> Self {
        Self { temperature: 1.0 }
    }
}

impl Config for SelfPlayOptions {
    fn load(config: &common::ConfigLoader) -> Result<Self> {
        Ok(Self {
            temperature: config
                .get("self_play_temperature")
                .and_then(|v| v.as_f32())
                .unwrap_or(Self::default().temperature),
        })
    }
}
