mod game;
mod options;

pub use game::*;
pub use options::*;
