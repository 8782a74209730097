use std::fmt::{self, Display, Formatter};

use anyhow::Result;
use engine::{GameEngine, GameState, InferAction, ValidActions};
use model::{ActionWithPolicy, GameAnalyzer, GameStateAnalysis};

use super::heuristic_rave::MoveHeuristic;

pub const TARGET: usize = 10;

/// Players alternately add one or two to a shared count. Whoever reaches the target wins. The
/// player to move loses exactly when the distance to the target is a multiple of three.
#[derive(Hash, PartialEq, Eq, Clone, Debug)]
pub struct CountingGameState {
    pub p1_turn: bool,
    pub count: usize,
}

impl CountingGameState {
    pub fn new(count: usize, p1_turn: bool) -> Self {
        Self { p1_turn, count }
    }

    pub fn player_to_move(&self) -> usize {
        if self.p1_turn {
            1
        } else {
            2
        }
    }

    pub fn is_lost_for_player_to_move(&self) -> bool {
        (TARGET - self.count) % 3 == 0
    }
}

impl GameState for CountingGameState {
    fn initial() -> Self {
        Self::new(0, true)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Value(pub [f32; 2]);

impl engine::Value for Value {
    fn get_value_for_player(&self, player: usize) -> f32 {
        self.0[player - 1]
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum CountingAction {
    AddOne,
    AddTwo,
}

impl CountingAction {
    fn amount(&self) -> usize {
        match self {
            CountingAction::AddOne => 1,
            CountingAction::AddTwo => 2,
        }
    }
}

impl Display for CountingAction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "+{}", self.amount())
    }
}

pub struct CountingGameEngine {}

impl CountingGameEngine {
    pub fn new() -> Self {
        Self {}
    }
}

impl GameEngine for CountingGameEngine {
    type Action = CountingAction;
    type State = CountingGameState;
    type Terminal = Value;

    fn take_action(&self, game_state: &Self::State, action: &Self::Action) -> Self::State {
        let count = game_state.count + action.amount();
        assert!(count <= TARGET, "Count {} overshoots the target", count);

        CountingGameState::new(count, !game_state.p1_turn)
    }

    fn terminal_state(&self, game_state: &Self::State) -> Option<Self::Terminal> {
        if game_state.count < TARGET {
            return None;
        }

        // The player who just moved reached the target.
        Some(if game_state.p1_turn {
            Value([-1.0, 1.0])
        } else {
            Value([1.0, -1.0])
        })
    }

    fn player_to_move(&self, game_state: &Self::State) -> usize {
        game_state.player_to_move()
    }

    fn move_number(&self, game_state: &Self::State) -> usize {
        game_state.count + 1
    }
}

impl ValidActions for CountingGameEngine {
    type Action = CountingAction;
    type State = CountingGameState;

    fn valid_actions(&self, game_state: &Self::State) -> Vec<Self::Action> {
        [CountingAction::AddOne, CountingAction::AddTwo]
            .into_iter()
            .filter(|action| game_state.count + action.amount() <= TARGET)
            .collect()
    }
}

impl InferAction for CountingGameEngine {
    type Action = CountingAction;
    type State = CountingGameState;

    fn infer_action(&self, before: &Self::State, after: &Self::State) -> Option<Self::Action> {
        if before.p1_turn == after.p1_turn {
            return None;
        }

        match after.count.checked_sub(before.count) {
            Some(1) => Some(CountingAction::AddOne),
            Some(2) => Some(CountingAction::AddTwo),
            _ => None,
        }
    }
}

/// Knows who is winning but has no preference between actions.
pub struct CountingAnalyzer {}

impl CountingAnalyzer {
    pub fn new() -> Self {
        Self {}
    }
}

impl GameAnalyzer for CountingAnalyzer {
    type Action = CountingAction;
    type State = CountingGameState;

    fn analyze(&self, game_state: &Self::State) -> Result<GameStateAnalysis<Self::Action>> {
        let value_score = if game_state.is_lost_for_player_to_move() {
            -0.5
        } else {
            0.5
        };

        let policy_scores = CountingGameEngine::new()
            .valid_actions(game_state)
            .into_iter()
            .map(|action| ActionWithPolicy::new(action, 0.5))
            .collect();

        Ok(GameStateAnalysis::new(value_score, policy_scores))
    }
}

/// Treats leaving the opponent on a lost count as a sub goal.
pub struct CountingHeuristic {}

impl MoveHeuristic for CountingHeuristic {
    type State = CountingGameState;
    type Action = CountingAction;

    fn achieves_sub_goal(&self, _: &Self::State, _: &Self::Action, after: &Self::State) -> bool {
        after.count < TARGET && after.is_lost_for_player_to_move()
    }
}
