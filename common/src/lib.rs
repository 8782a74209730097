pub mod config;
pub mod fs;
pub mod math;
pub mod rng;
pub mod softmax;

pub use config::*;
pub use fs::*;
pub use math::*;
pub use rng::*;
pub use softmax::*;
