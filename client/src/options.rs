use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use common::{Config, ConfigLoader};
use mcts::{AgentOptions, SearchOptions};
use serde::{Deserialize, Serialize};
use ultimate_tictactoe::DEFAULT_BOARD_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Random,
    Ucb1,
    Solver,
    Rave,
    HeuristicRave,
}

impl FromStr for PlayerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "random" => PlayerKind::Random,
            "ucb1" => PlayerKind::Ucb1,
            "solver" => PlayerKind::Solver,
            "rave" => PlayerKind::Rave,
            "heuristic_rave" => PlayerKind::HeuristicRave,
            other => bail!(
                "Unknown player kind '{}', expected one of random, ucb1, solver, rave, heuristic_rave",
                other
            ),
        })
    }
}

impl Display for PlayerKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            PlayerKind::Random => "random",
            PlayerKind::Ucb1 => "ucb1",
            PlayerKind::Solver => "solver",
            PlayerKind::Rave => "rave",
            PlayerKind::HeuristicRave => "heuristic_rave",
        };

        write!(f, "{}", name)
    }
}

/// Options of the `play` scope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayOptions {
    pub board_size: usize,
    pub games: usize,
    pub seed: Option<u64>,
}

impl Config for PlayOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let board_size = config
            .get("board_size")
            .and_then(|v| v.as_usize())
            .unwrap_or(DEFAULT_BOARD_SIZE);

        anyhow::ensure!(board_size >= 1, "board_size must be at least 1");

        Ok(Self {
            board_size,
            games: config
                .get("games")
                .and_then(|v| v.as_usize())
                .unwrap_or(1),
            seed: config
                .get("seed")
                .and_then(|v| v.as_usize())
                .map(|seed| seed as u64),
        })
    }
}

/// Options of a `player_1` or `player_2` scope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatOptions {
    pub kind: PlayerKind,
    pub search: SearchOptions,
    pub agent: AgentOptions,
}

impl Config for SeatOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let kind = config
            .get("kind")
            .and_then(|v| v.as_string())
            .map(|kind| kind.parse())
            .transpose()
            .with_context(|| format!("Invalid kind in scope {}", config.scope()))?
            .unwrap_or(PlayerKind::Random);

        Ok(Self {
            kind,
            search: config.load()?,
            agent: config.load()?,
        })
    }
}
