use serde::{Deserialize, Serialize};

#[derive(PartialEq, Debug, Serialize, Deserialize)]
pub struct NodeMetrics<A> {
    /// The total number of visits of the node.
    pub visits: usize,
    /// The valid actions of the current game_state of the node.
    pub children: Vec<EdgeMetrics<A>>,
}

impl<A> NodeMetrics<A> {
    pub fn child_max_visits(&self) -> Option<&EdgeMetrics<A>> {
        self.children.iter().max_by_key(|c| c.visits)
    }
}

#[derive(PartialEq, Debug, Serialize, Deserialize)]
pub struct EdgeMetrics<A> {
    /// The action that this edge represents.
    action: A,
    /// The number of visits for the child node of this specific edge.
    visits: usize,
    /// Sum of rewards backed up through the child, from the perspective of the player taking the action.
    total_reward: f32,
}

impl<A> EdgeMetrics<A> {
    pub fn new(action: A, visits: usize, total_reward: f32) -> Self {
        Self {
            action,
            visits,
            total_reward,
        }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn visits(&self) -> usize {
        self.visits
    }

    pub fn total_reward(&self) -> f32 {
        self.total_reward
    }

    pub fn avg_value(&self) -> f32 {
        common::div_or_zero(self.total_reward, self.visits as f32)
    }
}
