use anyhow::Result;
use generational_arena::Index;
use rand::Rng;

use super::node::{NodeArena, SearchNode, Seed};

/// Result of evaluating a leaf.
#[derive(Debug)]
pub struct Evaluation<A> {
    /// Reward for the mover of the evaluated node. Infinite when the node is proven.
    pub reward: f32,
    /// Actions played past the evaluated node, with the player who played each.
    pub playout: Vec<(usize, A)>,
}

impl<A> Evaluation<A> {
    pub fn new(reward: f32) -> Self {
        Self {
            reward,
            playout: vec![],
        }
    }
}

/// The pieces of a simulation that differ between search variants. The tree itself drives
/// selection, expansion and the evaluate/backpropagate calls.
pub trait SearchStrategy {
    type State;
    type Action;

    /// Expand a leaf the first time it is reached and evaluate it in place, rather than expanding
    /// on the second visit and descending into a new child.
    fn expands_on_first_visit(&self) -> bool {
        false
    }

    /// Nodes whose value is settled are treated as leaves during selection.
    fn is_settled(&self, _node: &SearchNode<Self::State, Self::Action>) -> bool {
        false
    }

    fn select_score(
        &self,
        parent: &SearchNode<Self::State, Self::Action>,
        child: &SearchNode<Self::State, Self::Action>,
    ) -> f32;

    fn expand_seed(
        &self,
        parent: &SearchNode<Self::State, Self::Action>,
        action: &Self::Action,
        child_state: &Self::State,
        agent: usize,
    ) -> Seed;

    /// Called once the children of `node` have been inserted.
    fn on_expanded(
        &self,
        _arena: &mut NodeArena<Self::State, Self::Action>,
        _node: Index,
    ) -> Result<()> {
        Ok(())
    }

    fn evaluate<R: Rng>(
        &self,
        arena: &NodeArena<Self::State, Self::Action>,
        leaf: Index,
        rng: &mut R,
    ) -> Result<Evaluation<Self::Action>>;

    fn backpropagate(
        &self,
        arena: &mut NodeArena<Self::State, Self::Action>,
        leaf: Index,
        evaluation: Evaluation<Self::Action>,
    );
}

/// Adds `reward` to the leaf and walks to the root, negating at each step.
pub fn backpropagate_negamax<S, A>(arena: &mut NodeArena<S, A>, leaf: Index, reward: f32) {
    let mut reward = reward;
    let mut current = Some(leaf);

    while let Some(index) = current {
        let node = &mut arena[index];
        node.record(reward);
        current = node.parent();
        reward = -reward;
    }
}
