use std::hash::Hash;

use anyhow::Result;
use engine::{GameEngine, ValidActions, Value};
use generational_arena::Index;
use rand::Rng;

use super::node::{AmafStats, NodeArena, NodeStats, SearchNode, Seed};
use super::options::{LossLookahead, SearchOptions};
use super::rave::RaveStrategy;
use super::strategy::{Evaluation, SearchStrategy};

/// Game specific knowledge of intermediate goals.
pub trait MoveHeuristic {
    type State;
    type Action;

    /// Whether `action` achieved a sub goal for the player who played it.
    fn achieves_sub_goal(&self, before: &Self::State, action: &Self::Action, after: &Self::State) -> bool;
}

/// MC-RAVE whose agent-side children start with a one move lookahead evaluation.
pub struct HeuristicRaveStrategy<'e, E, H> {
    rave: RaveStrategy<'e, E>,
    heuristic: H,
    sub_goal_bonus: f32,
    loss_lookahead: LossLookahead,
}

impl<'e, E, H> HeuristicRaveStrategy<'e, E, H> {
    pub fn new(engine: &'e E, heuristic: H, options: &SearchOptions) -> Self {
        Self {
            rave: RaveStrategy::new(engine, options),
            heuristic,
            sub_goal_bonus: options.sub_goal_bonus,
            loss_lookahead: options.loss_lookahead,
        }
    }
}

impl<S, A, E, H> HeuristicRaveStrategy<'_, E, H>
where
    E: GameEngine<State = S, Action = A> + ValidActions<State = S, Action = A>,
    E::Terminal: Value,
{
    fn wins(&self, state: &S, player: usize) -> bool {
        self.rave
            .engine()
            .terminal_state(state)
            .map_or(false, |terminal| terminal.get_value_for_player(player) > 0.0)
    }

    fn opponent_wins_next(&self, state: &S) -> bool {
        let engine = self.rave.engine();
        if engine.terminal_state(state).is_some() {
            return false;
        }

        let opponent = engine.player_to_move(state);
        let replies = engine.valid_actions(state);
        let mut reply_wins = replies
            .iter()
            .map(|reply| self.wins(&engine.take_action(state, reply), opponent));

        match self.loss_lookahead {
            LossLookahead::Every => !replies.is_empty() && reply_wins.all(|wins| wins),
            LossLookahead::Any => reply_wins.any(|wins| wins),
        }
    }
}

impl<S, A, E, H> SearchStrategy for HeuristicRaveStrategy<'_, E, H>
where
    S: Clone,
    A: Clone + Eq + Hash,
    E: GameEngine<State = S, Action = A> + ValidActions<State = S, Action = A>,
    E::Terminal: Value,
    H: MoveHeuristic<State = S, Action = A>,
{
    type State = S;
    type Action = A;

    fn select_score(&self, parent: &SearchNode<S, A>, child: &SearchNode<S, A>) -> f32 {
        self.rave.select_score(parent, child)
    }

    fn expand_seed(&self, parent: &SearchNode<S, A>, action: &A, child_state: &S, agent: usize) -> Seed {
        let mover = parent.player_to_move();
        if mover != agent {
            return self.rave.expand_seed(parent, action, child_state, agent);
        }

        let seeded = |total_reward: f32, amaf_value: f32| {
            Seed::with_reward(1, total_reward, NodeStats::Amaf(AmafStats::new(1, amaf_value)))
        };

        if self.wins(child_state, mover) {
            seeded(f32::INFINITY, f32::INFINITY)
        } else if self.opponent_wins_next(child_state) {
            seeded(f32::NEG_INFINITY, f32::NEG_INFINITY)
        } else if self.heuristic.achieves_sub_goal(parent.state(), action, child_state) {
            seeded(1.0, self.sub_goal_bonus)
        } else {
            self.rave.expand_seed(parent, action, child_state, agent)
        }
    }

    fn evaluate<R: Rng>(&self, arena: &NodeArena<S, A>, leaf: Index, rng: &mut R) -> Result<Evaluation<A>> {
        self.rave.evaluate(arena, leaf, rng)
    }

    fn backpropagate(&self, arena: &mut NodeArena<S, A>, leaf: Index, evaluation: Evaluation<A>) {
        self.rave.backpropagate(arena, leaf, evaluation)
    }
}
