pub mod config;
pub mod log_sink;
pub mod math;
pub mod rng;

pub use config::*;
pub use log_sink::*;
pub use math::*;
pub use rng::*;
