mod agent;
#[cfg(test)]
mod counting_game;
mod heuristic_rave;
pub mod mcts;
mod node;
pub mod node_details;
mod oracle;
pub mod options;
mod rave;
mod rollout;
mod solver;
pub mod strategy;
pub mod temp;
#[cfg(test)]
mod tic_tac_toe;
mod ucb1;

pub use agent::*;
pub use heuristic_rave::*;
pub use mcts::*;
pub use node::*;
pub use node_details::*;
pub use oracle::*;
pub use options::*;
pub use rave::*;
pub use rollout::*;
pub use solver::*;
pub use strategy::*;
pub use temp::*;
pub use ucb1::*;
