use std::fmt::{Debug, Display};

use anyhow::{Context, Result};
use common::{create_rng_from_seed, Config, ConfigLoader};
use engine::{GameEngine, InferAction, ValidActions};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::mcts::MCTS;
use super::options::{SearchBudget, TemperatureOptions};
use super::strategy::SearchStrategy;
use super::temp::{Temperature, TemperatureMaxMoves};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentOptions {
    pub budget: SearchBudget,
    /// Sample the move from the visit distribution instead of taking the best mean.
    pub temperature: Option<TemperatureOptions>,
}

impl AgentOptions {
    pub fn simulations(simulations: usize) -> Self {
        Self {
            budget: SearchBudget::simulations(simulations),
            temperature: None,
        }
    }
}

impl Config for AgentOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let use_temperature = config
            .get("use_temperature")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Ok(Self {
            budget: config.load()?,
            temperature: if use_temperature {
                Some(config.load()?)
            } else {
                None
            },
        })
    }
}

/// Plays one side of a game, keeping its search tree between turns.
pub struct Agent<'a, E, St>
where
    St: SearchStrategy,
{
    engine: &'a E,
    mcts: MCTS<'a, E, St>,
    options: AgentOptions,
}

impl<'a, S, A, E, St> Agent<'a, E, St>
where
    S: Clone + PartialEq + Debug,
    A: Clone + PartialEq + Debug + Display,
    E: GameEngine<State = S, Action = A> + ValidActions<State = S, Action = A> + InferAction<State = S, Action = A>,
    St: SearchStrategy<State = S, Action = A>,
{
    pub fn new(
        game_state: S,
        player: usize,
        engine: &'a E,
        strategy: St,
        options: AgentOptions,
        seed: Option<u64>,
    ) -> Self {
        Self {
            engine,
            mcts: MCTS::new(game_state, player, engine, strategy, create_rng_from_seed(seed)),
            options,
        }
    }

    pub fn player(&self) -> usize {
        self.mcts.agent()
    }

    pub fn tree(&self) -> &MCTS<'a, E, St> {
        &self.mcts
    }

    /// Searches from `game_state` and returns the chosen action. The tree is not advanced until
    /// `commit_move` is called.
    pub fn choose_move(&mut self, game_state: &S) -> Result<A> {
        self.sync_root(game_state)?;

        let searches = self
            .mcts
            .search_budget(&self.options.budget)
            .context("Failed to search for a move")?;

        let temp = self
            .options
            .temperature
            .clone()
            .map(|options| TemperatureMaxMoves::new(options, self.engine).temp(game_state));

        let action = match temp {
            Some(temp) => self.mcts.select_action_using_temperature(&temp)?,
            None => self.mcts.best_action()?,
        };

        let metrics = self.mcts.root_node_metrics();
        let chosen = metrics.children.iter().find(|edge| *edge.action() == action);
        info!(
            "Player {} chose {} after {} simulations (visits: {}, value: {:.3})",
            self.player(),
            action,
            searches,
            chosen.map_or(0, |edge| edge.visits()),
            chosen.map_or(0.0, |edge| edge.avg_value())
        );

        if log::log_enabled!(log::Level::Debug) {
            debug!("{}", self.mcts.root_node_details()?);
        }

        Ok(action)
    }

    /// Re-roots the tree on the child reached by `action` once it has been played.
    pub fn commit_move(&mut self, action: &A) -> Result<()> {
        self.mcts
            .advance_to_action(action)
            .with_context(|| format!("Failed to re-root on own action {}", action))
    }

    /// Brings the root in line with `game_state`, reusing the subtree of the move played since the
    /// last search. Rebuilds the tree if that move cannot be found.
    pub fn sync_root(&mut self, game_state: &S) -> Result<()> {
        if self.mcts.root().state() == game_state {
            return Ok(());
        }

        let action = self.engine.infer_action(self.mcts.root().state(), game_state);

        if let Some(action) = &action {
            let advanced = self.mcts.advance_to_action(action).is_ok();
            if advanced && self.mcts.root().state() == game_state {
                debug!("Reusing subtree of {} with {} visits", action, self.mcts.root().visits());
                return Ok(());
            }
        }

        warn!(
            "Search tree is out of sync with the game (inferred action: {:?}), rebuilding from the current state",
            action
        );

        self.mcts.reset(game_state.clone());
        Ok(())
    }
}
