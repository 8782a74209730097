use anyhow::Result;

/// Synchronously evaluates a game state into a prior over its legal actions and a scalar value.
pub trait GameAnalyzer {
    type Action;
    type State;

    fn analyze(&self, game_state: &Self::State) -> Result<GameStateAnalysis<Self::Action>>;
}

#[derive(Clone, Debug)]
pub struct GameStateAnalysis<A> {
    pub policy_scores: Vec<ActionWithPolicy<A>>,
    /// Expected outcome in `[-1, 1]` for the player to move.
    pub value_score: f32,
}

impl<A> GameStateAnalysis<A> {
    pub fn new(value_score: f32, policy_scores: Vec<ActionWithPolicy<A>>) -> Self {
        GameStateAnalysis {
            policy_scores,
            value_score,
        }
    }

    pub fn policy_score(&self, action: &A) -> Option<f32>
    where
        A: PartialEq,
    {
        self.policy_scores
            .iter()
            .find(|p| p.action == *action)
            .map(|p| p.policy_score)
    }
}

#[derive(Clone, Debug)]
pub struct ActionWithPolicy<A> {
    pub action: A,
    pub policy_score: f32,
}

impl<A> ActionWithPolicy<A> {
    pub fn new(action: A, policy_score: f32) -> Self {
        ActionWithPolicy {
            action,
            policy_score,
        }
    }
}
