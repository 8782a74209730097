use mcts::MoveHeuristic;

use super::{MainBoard, Move, Outcome};

/// Winning a sub-board is the sub goal of every move.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubBoardCapture;

impl MoveHeuristic for SubBoardCapture {
    type State = MainBoard;
    type Action = Move;

    fn achieves_sub_goal(&self, before: &MainBoard, action: &Move, after: &MainBoard) -> bool {
        before.sub_outcome(action.sub_board).is_none()
            && after.sub_outcome(action.sub_board) == Some(Outcome::Win(before.player_to_move()))
    }
}
