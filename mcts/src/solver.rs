use anyhow::Result;
use engine::{GameEngine, ValidActions, Value};
use generational_arena::Index;
use rand::Rng;

use super::node::{NodeArena, SearchNode, Seed};
use super::options::SearchOptions;
use super::rollout::random_playout;
use super::strategy::{Evaluation, SearchStrategy};
use super::ucb1::exploration_term;

/// UCT with exact win/loss proofs. A node proven to be won by its mover holds `+inf`, one proven
/// lost holds `-inf`. Proofs propagate upward by the minimax rule and never mix with finite rewards.
pub struct SolverStrategy<'e, E> {
    engine: &'e E,
    exploration_weight: f32,
}

impl<'e, E> SolverStrategy<'e, E> {
    pub fn new(engine: &'e E, options: &SearchOptions) -> Self {
        Self {
            engine,
            exploration_weight: options.exploration_weight,
        }
    }
}

impl<S, A, E> SearchStrategy for SolverStrategy<'_, E>
where
    S: Clone,
    E: GameEngine<State = S, Action = A> + ValidActions<State = S, Action = A>,
    E::Terminal: Value,
{
    type State = S;
    type Action = A;

    fn is_settled(&self, node: &SearchNode<S, A>) -> bool {
        node.is_proven()
    }

    fn select_score(&self, parent: &SearchNode<S, A>, child: &SearchNode<S, A>) -> f32 {
        if child.is_proven() {
            return child.total_reward();
        }

        // Unvisited children come before any visited child but after a proven win.
        if child.visits() == 0 {
            return f32::MAX;
        }

        child.mean_reward() + exploration_term(parent, child, self.exploration_weight)
    }

    fn expand_seed(&self, parent: &SearchNode<S, A>, _: &A, child_state: &S, _: usize) -> Seed {
        let proof = self
            .engine
            .terminal_state(child_state)
            .map(|terminal| terminal.get_value_for_player(parent.player_to_move()))
            .and_then(|value| {
                if value > 0.0 {
                    Some(f32::INFINITY)
                } else if value < 0.0 {
                    Some(f32::NEG_INFINITY)
                } else {
                    None
                }
            });

        match proof {
            Some(proof) => Seed::with_reward(0, proof, Default::default()),
            None => Seed::default(),
        }
    }

    fn evaluate<R: Rng>(&self, arena: &NodeArena<S, A>, leaf: Index, rng: &mut R) -> Result<Evaluation<A>> {
        let node = &arena[leaf];

        if node.is_proven() {
            return Ok(Evaluation::new(node.total_reward()));
        }

        Ok(random_playout(self.engine, node.state(), node.mover(), false, rng))
    }

    fn backpropagate(&self, arena: &mut NodeArena<S, A>, leaf: Index, evaluation: Evaluation<A>) {
        let mut reward = evaluation.reward;
        let mut current = leaf;
        arena[current].record(reward);

        while let Some(parent) = arena[current].parent() {
            let child = &arena[current];

            reward = if child.is_proven_win() {
                // The player to move at the parent has a winning action.
                f32::NEG_INFINITY
            } else if child.is_proven_loss() {
                let all_children_lost = arena[parent]
                    .children()
                    .iter()
                    .all(|c| arena[*c].is_proven_loss());

                if all_children_lost {
                    f32::INFINITY
                } else {
                    1.0
                }
            } else {
                -reward
            };

            arena[parent].record(reward);
            current = parent;
        }
    }
}
