use std::fmt::Debug;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use engine::{GameEngine, ValidActions};
use generational_arena::{Arena, Index};
use log::{debug, warn};
use model::{EdgeMetrics, NodeMetrics};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::Dirichlet;

use super::node::{NodeArena, SearchNode, Seed};
use super::node_details::{EdgeDetails, NodeDetails};
use super::options::{DirichletOptions, SearchBudget};
use super::strategy::SearchStrategy;
use super::temp::TempAndNoise;

/// A search tree for one player, parameterised by the strategy of the search variant.
pub struct MCTS<'a, E, St>
where
    St: SearchStrategy,
{
    engine: &'a E,
    strategy: St,
    agent: usize,
    root: Index,
    arena: NodeArena<St::State, St::Action>,
    rng: StdRng,
}

impl<'a, S, A, E, St> MCTS<'a, E, St>
where
    S: Clone,
    A: Clone + PartialEq + Debug,
    E: GameEngine<State = S, Action = A> + ValidActions<State = S, Action = A>,
    St: SearchStrategy<State = S, Action = A>,
{
    /// Creates a tree rooted at `game_state`, searching on behalf of `agent`.
    pub fn new(game_state: S, agent: usize, engine: &'a E, strategy: St, rng: StdRng) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Self::create_node(engine, game_state, None, None, Seed::default()));

        Self {
            engine,
            strategy,
            agent,
            root,
            arena,
            rng,
        }
    }

    pub fn agent(&self) -> usize {
        self.agent
    }

    pub fn root(&self) -> &SearchNode<S, A> {
        &self.arena[self.root]
    }

    pub fn root_index(&self) -> Index {
        self.root
    }

    pub fn node(&self, index: Index) -> Option<&SearchNode<S, A>> {
        self.arena.get(index)
    }

    /// Number of nodes held by the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn strategy(&self) -> &St {
        &self.strategy
    }

    pub fn expand_root(&mut self) -> Result<()> {
        self.expand(self.root)
    }

    pub fn search_visits(&mut self, visits: usize) -> Result<usize> {
        self.search(|searches| searches < visits)
    }

    /// Runs until the simulation count is reached or, when set, the time limit elapses.
    pub fn search_budget(&mut self, budget: &SearchBudget) -> Result<usize> {
        let start = Instant::now();
        let simulations = budget.simulations;
        let time_limit = budget.time_limit;

        self.search(|searches| {
            searches < simulations && time_limit.map_or(true, |limit| start.elapsed() < limit)
        })
    }

    /// Runs simulations while `alive` returns true for the number completed so far. Stops early once
    /// a root child is proven to win.
    pub fn search<F: FnMut(usize) -> bool>(&mut self, alive: F) -> Result<usize> {
        let mut alive = alive;
        self.expand_root()?;

        let mut searches = 0;
        while !self.has_proven_win() && alive(searches) {
            self.simulate()?;
            searches += 1;
        }

        debug!(
            "Ran {} simulations, root visits: {}, nodes: {}",
            searches,
            self.root().visits(),
            self.arena.len()
        );

        Ok(searches)
    }

    /// One selection, expansion, evaluation and backpropagation pass.
    pub fn simulate(&mut self) -> Result<()> {
        let mut leaf = self.select_leaf();

        let node = &self.arena[leaf];
        let expands_on_first_visit = self.strategy.expands_on_first_visit();
        let should_expand = !node.is_terminal()
            && !node.has_children()
            && !self.strategy.is_settled(node)
            && (node.visits() > 0 || expands_on_first_visit);

        if should_expand {
            self.expand(leaf)?;

            if !expands_on_first_visit {
                if let Some(child) = self.select_child(leaf) {
                    leaf = child;
                }
            }
        }

        let evaluation = self.strategy.evaluate(&self.arena, leaf, &mut self.rng)?;
        self.strategy.backpropagate(&mut self.arena, leaf, evaluation);

        Ok(())
    }

    pub fn has_proven_win(&self) -> bool {
        self.root()
            .children()
            .iter()
            .any(|child| self.arena[*child].is_proven_win())
    }

    /// The root child with the best mean reward among those visited or proven to win. Falls back to
    /// the first child when nothing has been visited.
    pub fn best_action(&self) -> Result<A> {
        let children = self.root().children();
        let first = *children
            .first()
            .ok_or_else(|| anyhow!("Root has no children to choose from"))?;

        let mut best: Option<(Index, f32)> = None;
        for &child in children {
            let node = &self.arena[child];
            if node.visits() == 0 && !node.is_proven_win() {
                continue;
            }

            let mean = node.mean_reward();
            if best.map_or(true, |(_, best_mean)| mean > best_mean) {
                best = Some((child, mean));
            }
        }

        let chosen = best.map_or(first, |(child, _)| child);
        self.action_of(chosen)
    }

    /// Samples a root child proportionally to `visits^(1/T)`, optionally blended with Dirichlet noise.
    /// A temperature of 0 picks the most visited child.
    pub fn select_action_using_temperature(&mut self, temp: &TempAndNoise) -> Result<A> {
        let children = self.root().children().to_vec();
        if children.is_empty() {
            bail!("Root has no children to choose from");
        }

        if temp.temperature == 0.0 {
            let most_visited = self.most_visited_child(self.root).unwrap_or(children[0]);

            return self.action_of(most_visited);
        }

        let visits: Vec<u32> = children.iter().map(|child| self.arena[*child].visits()).collect();
        let mut weights = temperature_weights(&visits, temp.temperature);

        if let Some(dirichlet) = &temp.dirichlet {
            weights = generate_noise(weights, dirichlet, &mut self.rng)?;
        }

        let chosen_idx = match WeightedIndex::new(&weights) {
            Err(_) => {
                warn!("Invalid visit weights. Most likely all are 0. Move will be randomly selected.");
                warn!("{:?}", weights);
                self.rng.gen_range(0..children.len())
            }
            Ok(weighted_index) => weighted_index.sample(&mut self.rng),
        };

        self.action_of(children[chosen_idx])
    }

    /// Makes the child reached by `action` the new root and drops every other subtree. The tree is
    /// left untouched if no child matches.
    pub fn advance_to_action(&mut self, action: &A) -> Result<()> {
        self.expand_root()?;

        let chosen = self
            .root()
            .children()
            .iter()
            .copied()
            .find(|child| self.arena[*child].action() == Some(action))
            .ok_or_else(|| anyhow!("No child of the root matches action {:?}", action))?;

        let root = self
            .arena
            .remove(self.root)
            .ok_or_else(|| anyhow!("Root node should exist in arena"))?;

        for child in root.into_children() {
            if child != chosen {
                self.remove_subtree(child);
            }
        }

        self.arena[chosen].detach();
        self.root = chosen;

        Ok(())
    }

    /// Discards the whole tree and starts over from `game_state`.
    pub fn reset(&mut self, game_state: S) {
        self.arena.clear();
        self.root = self
            .arena
            .insert(Self::create_node(self.engine, game_state, None, None, Seed::default()));
    }

    pub fn root_node_metrics(&self) -> NodeMetrics<A> {
        let root = self.root();

        NodeMetrics {
            visits: root.visits() as usize,
            children: root
                .children()
                .iter()
                .filter_map(|child| {
                    let node = &self.arena[*child];
                    node.action()
                        .map(|action| EdgeMetrics::new(action.clone(), node.visits() as usize, node.total_reward()))
                })
                .collect(),
        }
    }

    /// Root children ranked by visits, then mean.
    pub fn root_node_details(&self) -> Result<NodeDetails<A>> {
        let mut children = self
            .root()
            .children()
            .iter()
            .map(|child| Ok((self.action_of(*child)?, self.edge_details(self.root, *child))))
            .collect::<Result<Vec<_>>>()?;
        children.sort_by(|(_, x), (_, y)| y.rank(x));

        Ok(NodeDetails {
            visits: self.root().visits(),
            children,
        })
    }

    /// Follows the most visited child from the root.
    pub fn principal_variation(&self) -> Result<Vec<(A, EdgeDetails)>> {
        let mut variation = vec![];
        let mut current = self.root;

        while let Some(child) = self.most_visited_child(current) {
            if self.arena[child].visits() == 0 {
                break;
            }

            variation.push((self.action_of(child)?, self.edge_details(current, child)));
            current = child;
        }

        Ok(variation)
    }

    fn edge_details(&self, parent: Index, child: Index) -> EdgeDetails {
        let parent = &self.arena[parent];
        let node = &self.arena[child];
        let amaf = node.amaf();

        EdgeDetails {
            visits: node.visits(),
            mean: node.mean_reward(),
            amaf_visits: amaf.count,
            amaf_mean: amaf.mean(),
            prior: node.oracle().prior,
            score: self.strategy.select_score(parent, node),
        }
    }

    /// Ties go to the earliest child.
    fn most_visited_child(&self, index: Index) -> Option<Index> {
        let mut best: Option<Index> = None;

        for &child in self.arena[index].children() {
            if best.map_or(true, |best| self.arena[child].visits() > self.arena[best].visits()) {
                best = Some(child);
            }
        }

        best
    }

    fn select_leaf(&self) -> Index {
        let mut current = self.root;

        loop {
            let node = &self.arena[current];
            if !node.has_children() || node.is_terminal() || self.strategy.is_settled(node) {
                return current;
            }

            match self.select_child(current) {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Highest scoring child. Ties go to the earliest child.
    fn select_child(&self, index: Index) -> Option<Index> {
        let parent = &self.arena[index];
        let mut best: Option<(Index, f32)> = None;

        for &child in parent.children() {
            let score = self.strategy.select_score(parent, &self.arena[child]);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child, score));
            }
        }

        best.map(|(child, _)| child)
    }

    fn expand(&mut self, index: Index) -> Result<()> {
        let node = &self.arena[index];
        if node.is_terminal() || node.has_children() {
            return Ok(());
        }

        let game_state = node.state().clone();
        let actions = self.engine.valid_actions(&game_state);

        let mut children = Vec::with_capacity(actions.len());
        for action in actions {
            let child_state = self.engine.take_action(&game_state, &action);
            let seed = self
                .strategy
                .expand_seed(&self.arena[index], &action, &child_state, self.agent);
            let child = Self::create_node(self.engine, child_state, Some(action), Some(index), seed);
            children.push(self.arena.insert(child));
        }

        self.arena[index].set_children(children);

        if let Err(err) = self.strategy.on_expanded(&mut self.arena, index) {
            // Leave the node unexpanded so a later search retries it.
            for child in self.arena[index].children().to_vec() {
                self.remove_subtree(child);
            }
            self.arena[index].set_children(vec![]);

            return Err(err).context("Failed to expand node");
        }

        Ok(())
    }

    fn remove_subtree(&mut self, index: Index) {
        let mut pending = vec![index];

        while let Some(index) = pending.pop() {
            if let Some(node) = self.arena.remove(index) {
                pending.extend(node.into_children());
            }
        }
    }

    fn action_of(&self, index: Index) -> Result<A> {
        self.arena[index]
            .action()
            .cloned()
            .ok_or_else(|| anyhow!("Node has no action leading into it"))
    }

    fn create_node(engine: &E, game_state: S, action: Option<A>, parent: Option<Index>, seed: Seed) -> SearchNode<S, A> {
        let player_to_move = engine.player_to_move(&game_state);
        let is_terminal = engine.terminal_state(&game_state).is_some();

        SearchNode::new(game_state, action, parent, player_to_move, is_terminal, seed)
    }
}

/// `visits^(1/T)` normalized to a distribution. Visits are scaled by the maximum first so low
/// temperatures cannot overflow.
fn temperature_weights(visits: &[u32], temperature: f32) -> Vec<f32> {
    let max_visits = visits.iter().copied().max().unwrap_or(0) as f32;
    let weights: Vec<f32> = visits
        .iter()
        .map(|visits| common::div_or_zero(*visits as f32, max_visits).powf(1.0 / temperature))
        .collect();
    let total: f32 = weights.iter().sum();

    weights
        .into_iter()
        .map(|w| common::div_or_zero(w, total))
        .collect()
}

/// Blends `(1 - e) * p + e * noise` over the distribution.
fn generate_noise<R: Rng>(weights: Vec<f32>, dirichlet: &DirichletOptions, rng: &mut R) -> Result<Vec<f32>> {
    let num_actions = weights.len();

    // Do not apply noise if there is only one action.
    if num_actions < 2 {
        return Ok(weights);
    }

    let e = dirichlet.epsilon;
    let dirichlet_noise = Dirichlet::new_with_size(dirichlet.alpha, num_actions)
        .map_err(|err| anyhow!("Error creating dirichlet distribution: {:?}", err))?
        .sample(rng);

    Ok(dirichlet_noise
        .into_iter()
        .zip(weights)
        .map(|(noise, weight)| (1.0 - e) * weight + e * noise)
        .collect())
}
