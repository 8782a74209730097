use anyhow::Result;
use common::ln_or_zero;
use engine::{GameEngine, ValidActions, Value};
use generational_arena::Index;
use rand::Rng;

use super::node::{NodeArena, SearchNode, Seed};
use super::options::SearchOptions;
use super::rollout::random_playout;
use super::strategy::{backpropagate_negamax, Evaluation, SearchStrategy};

/// `mean + w * sqrt(ln(N) / n)`. Unvisited children are always tried first.
pub fn ucb1_score<S, A>(parent: &SearchNode<S, A>, child: &SearchNode<S, A>, exploration_weight: f32) -> f32 {
    if child.visits() == 0 {
        return f32::INFINITY;
    }

    child.mean_reward() + exploration_term(parent, child, exploration_weight)
}

pub(crate) fn exploration_term<S, A>(
    parent: &SearchNode<S, A>,
    child: &SearchNode<S, A>,
    exploration_weight: f32,
) -> f32 {
    exploration_weight * (ln_or_zero(parent.visits() as f32) / child.visits() as f32).sqrt()
}

/// Plain UCT: random rollouts and negamax backpropagation.
pub struct Ucb1Strategy<'e, E> {
    engine: &'e E,
    exploration_weight: f32,
}

impl<'e, E> Ucb1Strategy<'e, E> {
    pub fn new(engine: &'e E, options: &SearchOptions) -> Self {
        Self {
            engine,
            exploration_weight: options.exploration_weight,
        }
    }
}

impl<S, A, E> SearchStrategy for Ucb1Strategy<'_, E>
where
    S: Clone,
    E: GameEngine<State = S, Action = A> + ValidActions<State = S, Action = A>,
    E::Terminal: Value,
{
    type State = S;
    type Action = A;

    fn select_score(&self, parent: &SearchNode<S, A>, child: &SearchNode<S, A>) -> f32 {
        ucb1_score(parent, child, self.exploration_weight)
    }

    fn expand_seed(&self, _: &SearchNode<S, A>, _: &A, _: &S, _: usize) -> Seed {
        Seed::default()
    }

    fn evaluate<R: Rng>(&self, arena: &NodeArena<S, A>, leaf: Index, rng: &mut R) -> Result<Evaluation<A>> {
        let node = &arena[leaf];
        Ok(random_playout(self.engine, node.state(), node.mover(), false, rng))
    }

    fn backpropagate(&self, arena: &mut NodeArena<S, A>, leaf: Index, evaluation: Evaluation<A>) {
        backpropagate_negamax(arena, leaf, evaluation.reward);
    }
}
