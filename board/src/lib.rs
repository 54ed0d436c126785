pub mod board_state;
pub mod move_mask;
pub mod shapes;
pub mod symmetries;
pub mod win_pattern;

pub use board_state::*;
pub use move_mask::*;
pub use shapes::*;
pub use symmetries::*;
pub use win_pattern::*;
