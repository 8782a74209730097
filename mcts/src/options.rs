use std::time::Duration;

use anyhow::{bail, Result};
use common::{Config, ConfigLoader};
use serde::{Deserialize, Serialize};

/// Which opponent replies must win immediately before a move is flagged as losing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossLookahead {
    Every,
    Any,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub exploration_weight: f32,
    /// `k` in `beta = amaf_n / (n + amaf_n + k * n * amaf_n)`.
    pub rave_decay: f32,
    pub sub_goal_bonus: f32,
    pub loss_lookahead: LossLookahead,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            exploration_weight: std::f32::consts::SQRT_2,
            rave_decay: 1.0,
            sub_goal_bonus: 10.0,
            loss_lookahead: LossLookahead::Every,
        }
    }
}

impl Config for SearchOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let defaults = Self::default();

        let loss_lookahead = match config
            .get("loss_lookahead")
            .and_then(|v| v.as_string())
            .as_deref()
        {
            None | Some("every") => LossLookahead::Every,
            Some("any") => LossLookahead::Any,
            Some(other) => bail!("Unknown loss_lookahead '{}', expected 'every' or 'any'", other),
        };

        Ok(Self {
            exploration_weight: config
                .get("exploration_weight")
                .and_then(|v| v.as_f32())
                .unwrap_or(defaults.exploration_weight),
            rave_decay: config
                .get("rave_decay")
                .and_then(|v| v.as_f32())
                .unwrap_or(defaults.rave_decay),
            sub_goal_bonus: config
                .get("sub_goal_bonus")
                .and_then(|v| v.as_f32())
                .unwrap_or(defaults.sub_goal_bonus),
            loss_lookahead,
        })
    }
}

/// Simulations run per move. The time limit, when set, is checked between simulations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchBudget {
    pub simulations: usize,
    pub time_limit: Option<Duration>,
}

impl SearchBudget {
    pub fn simulations(simulations: usize) -> Self {
        Self {
            simulations,
            time_limit: None,
        }
    }
}

impl Config for SearchBudget {
    fn load(config: &ConfigLoader) -> Result<Self> {
        Ok(Self {
            simulations: config
                .get("number_of_simulations")
                .and_then(|v| v.as_usize())
                .unwrap_or(2000),
            time_limit: config
                .get("time_limit")
                .and_then(|v| v.as_f32())
                .map(Duration::from_secs_f32),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirichletOptions {
    pub alpha: f32,
    pub epsilon: f32,
}

/// Visit-count sampling of the root move: `temperature` applies until `temperature_max_moves`,
/// `temperature_post_max_moves` afterwards. Dirichlet noise only applies inside the early window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemperatureOptions {
    pub temperature: f32,
    pub temperature_post_max_moves: f32,
    pub temperature_max_moves: usize,
    pub dirichlet: Option<DirichletOptions>,
}

impl Config for TemperatureOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let use_noise = config
            .get("use_dirichlet_noise")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);

        let dirichlet = use_noise.then(|| DirichletOptions {
            alpha: config
                .get("dirichlet_alpha")
                .and_then(|v| v.as_f32())
                .unwrap_or(0.5),
            epsilon: config
                .get("epsilon")
                .and_then(|v| v.as_f32())
                .unwrap_or(0.25),
        });

        Ok(Self {
            temperature: config
                .get("temperature_start")
                .and_then(|v| v.as_f32())
                .unwrap_or(1.0),
            temperature_post_max_moves: config
                .get("temperature_end")
                .and_then(|v| v.as_f32())
                .unwrap_or(0.0),
            temperature_max_moves: config
                .get("temperature_change_turn")
                .and_then(|v| v.as_usize())
                .unwrap_or(30),
            dirichlet,
        })
    }
}
