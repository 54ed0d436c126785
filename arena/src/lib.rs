pub mod evaluate;

mod options;

pub use evaluate::*;
pub use options::*;
