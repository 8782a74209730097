use anyhow::{anyhow, Context, Result};
use engine::{GameEngine, Value};
use generational_arena::Index;
use model::GameAnalyzer;
use rand::Rng;

use super::node::{NodeArena, NodeStats, OracleStats, SearchNode, Seed};
use super::options::SearchOptions;
use super::strategy::{backpropagate_negamax, Evaluation, SearchStrategy};

/// `mean + w * prior * sqrt(N) / (1 + n)`. Unvisited children have a mean of 0.
pub fn puct_score<S, A>(parent: &SearchNode<S, A>, child: &SearchNode<S, A>, exploration_weight: f32) -> f32 {
    let prior = child.oracle().prior;
    let exploration = exploration_weight * prior * (parent.visits() as f32).sqrt() / (1 + child.visits()) as f32;

    child.mean_reward() + exploration
}

/// PUCT guided by an external analyzer. Leaves are expanded on their first visit and valued by the
/// analyzer instead of a rollout.
pub struct OracleStrategy<'e, E, M> {
    engine: &'e E,
    analyzer: &'e M,
    exploration_weight: f32,
}

impl<'e, E, M> OracleStrategy<'e, E, M> {
    pub fn new(engine: &'e E, analyzer: &'e M, options: &SearchOptions) -> Self {
        Self {
            engine,
            analyzer,
            exploration_weight: options.exploration_weight,
        }
    }
}

impl<S, A, E, M> SearchStrategy for OracleStrategy<'_, E, M>
where
    A: PartialEq,
    E: GameEngine<State = S, Action = A>,
    E::Terminal: Value,
    M: GameAnalyzer<State = S, Action = A>,
{
    type State = S;
    type Action = A;

    fn expands_on_first_visit(&self) -> bool {
        true
    }

    fn select_score(&self, parent: &SearchNode<S, A>, child: &SearchNode<S, A>) -> f32 {
        puct_score(parent, child, self.exploration_weight)
    }

    fn expand_seed(&self, _: &SearchNode<S, A>, _: &A, _: &S, _: usize) -> Seed {
        Seed::new(NodeStats::Oracle(OracleStats::default()))
    }

    fn on_expanded(&self, arena: &mut NodeArena<S, A>, node: Index) -> Result<()> {
        let analysis = self
            .analyzer
            .analyze(arena[node].state())
            .context("Failed to analyze the expanded node")?;

        let stats = OracleStats {
            predicted_value: Some(analysis.value_score),
            ..arena[node].oracle()
        };
        arena[node].set_stats(NodeStats::Oracle(stats));

        for i in 0..arena[node].children().len() {
            let child = arena[node].children()[i];
            let prior = arena[child]
                .action()
                .and_then(|action| analysis.policy_score(action))
                .unwrap_or(0.0);

            arena[child].set_stats(NodeStats::Oracle(OracleStats {
                prior,
                predicted_value: None,
            }));
        }

        Ok(())
    }

    fn evaluate<R: Rng>(&self, arena: &NodeArena<S, A>, leaf: Index, _: &mut R) -> Result<Evaluation<A>> {
        let node = &arena[leaf];

        if let Some(terminal) = self.engine.terminal_state(node.state()) {
            return Ok(Evaluation::new(terminal.get_value_for_player(node.mover())));
        }

        let predicted_value = node
            .oracle()
            .predicted_value
            .ok_or_else(|| anyhow!("Non-terminal leaf was not analyzed before evaluation"))?;

        Ok(Evaluation::new(-predicted_value))
    }

    fn backpropagate(&self, arena: &mut NodeArena<S, A>, leaf: Index, evaluation: Evaluation<A>) {
        backpropagate_negamax(arena, leaf, evaluation.reward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn node(visits: u32, total_reward: f32, prior: f32) -> SearchNode<(), ()> {
        let stats = NodeStats::Oracle(OracleStats {
            prior,
            predicted_value: None,
        });
        SearchNode::new((), None, None, 1, false, Seed::with_reward(visits, total_reward, stats))
    }

    #[test]
    fn test_unvisited_child_is_ranked_by_prior() {
        let parent = node(16, 0.0, 1.0);

        assert_approx_eq!(puct_score(&parent, &node(0, 0.0, 0.5), 2.0), 4.0);
        assert!(puct_score(&parent, &node(0, 0.0, 0.5), 2.0) > puct_score(&parent, &node(0, 0.0, 0.1), 2.0));
    }

    #[test]
    fn test_visited_child_score() {
        let parent = node(16, 0.0, 1.0);
        let child = node(3, 1.5, 0.25);

        assert_approx_eq!(puct_score(&parent, &child, 1.0), 0.5 + 0.25 * 4.0 / 4.0);
    }
}
