use serde::{Deserialize, Serialize};

use super::Outcome;

/// Final result of a game, indexed by player id. A win is `1.0`, a loss `-1.0` and a draw `0.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Value(pub [f32; 2]);

impl Value {
    pub fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win(1) => Value([1.0, -1.0]),
            Outcome::Win(_) => Value([-1.0, 1.0]),
            Outcome::Draw => Value([0.0, 0.0]),
        }
    }
}

impl engine::value::Value for Value {
    fn get_value_for_player(&self, player: usize) -> f32 {
        self.0[player - 1]
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Value({}, {})", self.0[0], self.0[1])
    }
}
