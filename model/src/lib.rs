pub mod analytics;
pub mod model;
pub mod tabular;
pub mod training_example;

pub use analytics::*;
pub use model::*;
pub use tabular::*;
pub use training_example::*;
