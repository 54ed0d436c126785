mod example_pool;
mod options;
mod self_learn;

pub use example_pool::*;
pub use options::*;
pub use self_learn::*;
