use engine::{GameEngine, InferAction, ValidActions};

use super::{MainBoard, Move, Value};

#[derive(Default)]
pub struct Engine {}

impl Engine {
    pub fn new() -> Self {
        Self {}
    }
}

impl GameEngine for Engine {
    type Action = Move;
    type State = MainBoard;
    type Terminal = Value;

    fn take_action(&self, game_state: &Self::State, action: &Self::Action) -> Self::State {
        let mut next = game_state.clone();

        if let Err(err) = next.make_move(action) {
            panic!("Tried to take an illegal action {}: {:#}", action, err);
        }

        next
    }

    fn terminal_state(&self, game_state: &Self::State) -> Option<Self::Terminal> {
        game_state.winner().map(Value::from_outcome)
    }

    fn player_to_move(&self, game_state: &Self::State) -> usize {
        game_state.player_to_move()
    }

    fn move_number(&self, game_state: &Self::State) -> usize {
        game_state.move_count() + 1
    }
}

impl ValidActions for Engine {
    type Action = Move;
    type State = MainBoard;

    fn valid_actions(&self, game_state: &Self::State) -> Vec<Self::Action> {
        game_state.legal_moves()
    }
}

impl InferAction for Engine {
    type Action = Move;
    type State = MainBoard;

    fn infer_action(&self, before: &Self::State, after: &Self::State) -> Option<Self::Action> {
        before.diff_move(after)
    }
}
