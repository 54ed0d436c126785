pub mod mcts;
mod node;
pub mod options;
pub mod temp;

pub use mcts::*;
pub use options::*;
pub use temp::*;
