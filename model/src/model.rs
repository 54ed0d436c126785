use std::path::Path;

use anyhow::Result;

use super::{GameAnalyzer, TrainingExample};

/// A trainable evaluator. `Clone` must produce an independent deep copy so that training a clone
/// never disturbs the original.
pub trait Model: GameAnalyzer + Clone {
    fn train(&mut self, examples: &[TrainingExample]) -> Result<()>;

    fn save(&self, path: &Path) -> Result<()>;
}

/// Creates evaluators of one architecture, either untrained or restored from disk.
pub trait ModelFactory {
    type M: Model;

    fn create(&self) -> Self::M;

    fn load(&self, path: &Path) -> Result<Self::M>;
}
