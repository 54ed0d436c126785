use model::TrainingExample;

/// Every training example produced during a run. Examples are never evicted.
#[derive(Debug, Default)]
pub struct ExamplePool {
    examples: Vec<TrainingExample>,
}

impl ExamplePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, examples: impl IntoIterator<Item = TrainingExample>) {
        self.examples.extend(examples);
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
