use std::collections::HashSet;
use std::hash::Hash;

use anyhow::Result;
use engine::{GameEngine, ValidActions, Value};
use generational_arena::Index;
use rand::Rng;

use super::node::{AmafStats, NodeArena, NodeStats, SearchNode, Seed};
use super::options::SearchOptions;
use super::rollout::random_playout;
use super::strategy::{Evaluation, SearchStrategy};
use super::ucb1::exploration_term;

/// Weight given to the AMAF mean: `amaf_n / (n + amaf_n + k * n * amaf_n)`.
pub fn rave_beta(visits: u32, amaf_count: u32, rave_decay: f32) -> f32 {
    let n = visits as f32;
    let amaf_n = amaf_count as f32;
    let denominator = n + amaf_n + rave_decay * n * amaf_n;

    common::div_or_zero(amaf_n, denominator)
}

pub fn rave_score<S, A>(
    parent: &SearchNode<S, A>,
    child: &SearchNode<S, A>,
    exploration_weight: f32,
    rave_decay: f32,
) -> f32 {
    let amaf = child.amaf();

    if child.visits() == 0 {
        return if amaf.count > 0 { amaf.mean() } else { f32::INFINITY };
    }

    let exploration = exploration_term(parent, child, exploration_weight);

    if amaf.count == 0 {
        return child.mean_reward() + exploration;
    }

    let beta = rave_beta(child.visits(), amaf.count, rave_decay);
    (1.0 - beta) * child.mean_reward() + beta * amaf.mean() + exploration
}

/// MC-RAVE: UCT blended with all-moves-as-first statistics gathered from every simulation that
/// passes through a node.
pub struct RaveStrategy<'e, E> {
    engine: &'e E,
    exploration_weight: f32,
    rave_decay: f32,
}

impl<'e, E> RaveStrategy<'e, E> {
    pub fn new(engine: &'e E, options: &SearchOptions) -> Self {
        Self {
            engine,
            exploration_weight: options.exploration_weight,
            rave_decay: options.rave_decay,
        }
    }

    pub fn engine(&self) -> &'e E {
        self.engine
    }
}

impl<S, A, E> SearchStrategy for RaveStrategy<'_, E>
where
    S: Clone,
    A: Clone + Eq + Hash,
    E: GameEngine<State = S, Action = A> + ValidActions<State = S, Action = A>,
    E::Terminal: Value,
{
    type State = S;
    type Action = A;

    fn select_score(&self, parent: &SearchNode<S, A>, child: &SearchNode<S, A>) -> f32 {
        rave_score(parent, child, self.exploration_weight, self.rave_decay)
    }

    fn expand_seed(&self, _: &SearchNode<S, A>, _: &A, _: &S, _: usize) -> Seed {
        Seed::new(NodeStats::Amaf(AmafStats::default()))
    }

    fn evaluate<R: Rng>(&self, arena: &NodeArena<S, A>, leaf: Index, rng: &mut R) -> Result<Evaluation<A>> {
        let node = &arena[leaf];
        Ok(random_playout(self.engine, node.state(), node.mover(), true, rng))
    }

    fn backpropagate(&self, arena: &mut NodeArena<S, A>, leaf: Index, evaluation: Evaluation<A>) {
        let Evaluation { mut reward, playout } = evaluation;

        // Every (player, action) pair played after the current node. Each pair counts once.
        let mut played: HashSet<(usize, A)> = playout.into_iter().collect();

        let mut current = Some(leaf);
        while let Some(index) = current {
            let player_to_move = arena[index].player_to_move();

            for i in 0..arena[index].children().len() {
                let child = arena[index].children()[i];
                let played_by_player_to_move = arena[child]
                    .action()
                    .map_or(false, |action| played.contains(&(player_to_move, action.clone())));

                if played_by_player_to_move {
                    arena[child].record_amaf(-reward);
                }
            }

            let node = &mut arena[index];
            node.record(reward);

            if let Some(action) = node.action() {
                played.insert((node.mover(), action.clone()));
            }

            current = node.parent();
            reward = -reward;
        }
    }
}
