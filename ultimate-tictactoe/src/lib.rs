pub mod action;
pub mod engine;
pub mod heuristic;
pub mod main_board;
pub mod mappings;
pub mod sub_board;
pub mod value;

pub use action::*;
pub use crate::engine::*;
pub use heuristic::*;
pub use main_board::*;
pub use mappings::*;
pub use sub_board::*;
pub use value::*;
