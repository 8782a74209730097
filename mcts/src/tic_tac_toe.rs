use engine::{GameEngine, GameState, ValidActions};

use super::heuristic_rave::MoveHeuristic;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Plain 3x3 tic-tac-toe. Cells are numbered row-major and no cell can be played twice in a game.
#[derive(Hash, PartialEq, Eq, Clone, Debug)]
pub struct TicTacToeState {
    cells: [usize; 9],
}

impl TicTacToeState {
    /// Parses rows such as `"X.O.XO..."`, `X` being player 1.
    pub fn parse(board: &str) -> Self {
        let mut cells = [0; 9];
        for (cell, c) in cells.iter_mut().zip(board.chars()) {
            *cell = match c {
                'X' => 1,
                'O' => 2,
                _ => 0,
            };
        }

        Self { cells }
    }

    pub fn player_to_move(&self) -> usize {
        if self.cells.iter().filter(|c| **c != 0).count() % 2 == 0 {
            1
        } else {
            2
        }
    }

    fn winner(&self) -> Option<usize> {
        LINES
            .iter()
            .find(|[a, b, c]| self.cells[*a] != 0 && self.cells[*a] == self.cells[*b] && self.cells[*a] == self.cells[*c])
            .map(|[a, _, _]| self.cells[*a])
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != 0)
    }
}

impl GameState for TicTacToeState {
    fn initial() -> Self {
        Self { cells: [0; 9] }
    }
}

pub struct TicTacToeEngine {}

impl TicTacToeEngine {
    pub fn new() -> Self {
        Self {}
    }
}

impl GameEngine for TicTacToeEngine {
    type Action = usize;
    type State = TicTacToeState;
    type Terminal = super::counting_game::Value;

    fn take_action(&self, game_state: &Self::State, action: &Self::Action) -> Self::State {
        assert_eq!(game_state.cells[*action], 0, "Cell {} is taken", action);

        let mut cells = game_state.cells;
        cells[*action] = game_state.player_to_move();
        TicTacToeState { cells }
    }

    fn terminal_state(&self, game_state: &Self::State) -> Option<Self::Terminal> {
        use super::counting_game::Value;

        match game_state.winner() {
            Some(1) => Some(Value([1.0, -1.0])),
            Some(_) => Some(Value([-1.0, 1.0])),
            None if game_state.is_full() => Some(Value([0.0, 0.0])),
            None => None,
        }
    }

    fn player_to_move(&self, game_state: &Self::State) -> usize {
        game_state.player_to_move()
    }

    fn move_number(&self, game_state: &Self::State) -> usize {
        game_state.cells.iter().filter(|c| **c != 0).count() + 1
    }
}

impl ValidActions for TicTacToeEngine {
    type Action = usize;
    type State = TicTacToeState;

    fn valid_actions(&self, game_state: &Self::State) -> Vec<Self::Action> {
        if self.terminal_state(game_state).is_some() {
            return vec![];
        }

        (0..9).filter(|cell| game_state.cells[*cell] == 0).collect()
    }
}

/// Leaving two in a line with the third cell open is a sub goal.
pub struct ThreatHeuristic {}

impl MoveHeuristic for ThreatHeuristic {
    type State = TicTacToeState;
    type Action = usize;

    fn achieves_sub_goal(&self, _: &Self::State, action: &Self::Action, after: &Self::State) -> bool {
        let mover = after.cells[*action];

        LINES.iter().filter(|line| line.contains(action)).any(|line| {
            let owned = line.iter().filter(|cell| after.cells[**cell] == mover).count();
            let open = line.iter().filter(|cell| after.cells[**cell] == 0).count();
            owned == 2 && open == 1
        })
    }
}
