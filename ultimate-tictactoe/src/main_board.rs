use std::fmt::{self, Display, Formatter};

use anyhow::{ensure, Context, Result};
use engine::opponent;
use itertools::iproduct;

use super::sub_board::line_winner;
use super::{Coord, Move, Outcome, SubBoard};

pub const DEFAULT_BOARD_SIZE: usize = 3;

/// An N×N grid of N×N sub-boards. Sub-boards are stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MainBoard {
    size: usize,
    sub_boards: Vec<SubBoard>,
    allowed_sub_boards: Vec<Coord>,
    player_to_move: usize,
    move_count: usize,
    winner: Option<Outcome>,
}

impl MainBoard {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            sub_boards: (0..size * size).map(|_| SubBoard::new(size)).collect(),
            allowed_sub_boards: all_coords(size).collect(),
            player_to_move: 1,
            move_count: 0,
            winner: None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn player_to_move(&self) -> usize {
        self.player_to_move
    }

    /// Number of moves played so far.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    pub fn allowed_sub_boards(&self) -> &[Coord] {
        &self.allowed_sub_boards
    }

    pub fn sub_board(&self, (row, col): Coord) -> &SubBoard {
        &self.sub_boards[row * self.size + col]
    }

    pub fn sub_outcome(&self, coord: Coord) -> Option<Outcome> {
        self.sub_board(coord).outcome()
    }

    pub fn sub_outcomes(&self) -> Vec<Option<Outcome>> {
        self.sub_boards.iter().map(|b| b.outcome()).collect()
    }

    pub fn cell(&self, mv: &Move) -> Option<usize> {
        self.sub_board(mv.sub_board).cell(mv.cell)
    }

    /// Legal moves, sub-boards in allowed order and cells row-major. Empty once the game is decided.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.winner.is_some() {
            return vec![];
        }

        self.allowed_sub_boards
            .iter()
            .flat_map(|&sub_board| {
                self.sub_board(sub_board)
                    .empty_cells()
                    .map(move |cell| Move::new(sub_board, cell))
            })
            .collect()
    }

    /// Plays the move for the player to move. On error the board is left untouched.
    pub fn make_move(&mut self, mv: &Move) -> Result<()> {
        let Move { sub_board, cell } = *mv;

        ensure!(self.winner.is_none(), "The game is already over");
        ensure!(
            self.in_bounds(sub_board) && self.in_bounds(cell),
            "Move {} is out of bounds for board size {}",
            mv,
            self.size
        );
        ensure!(
            self.allowed_sub_boards.contains(&sub_board),
            "Sub-board {:?} is not allowed, expected one of {:?}",
            sub_board,
            self.allowed_sub_boards
        );

        let player = self.player_to_move;
        let size = self.size;
        self.sub_boards[sub_board.0 * size + sub_board.1]
            .make_move(player, cell)
            .with_context(|| format!("Illegal move {}", mv))?;

        self.allowed_sub_boards = if self.sub_outcome(cell).is_none() {
            vec![cell]
        } else {
            all_coords(size)
                .filter(|coord| self.sub_outcome(*coord).is_none())
                .collect()
        };

        self.player_to_move = opponent(player);
        self.move_count += 1;
        self.winner = self.compute_winner();

        Ok(())
    }

    /// The single move separating this board from a later one, found by comparing cells.
    pub fn diff_move(&self, after: &MainBoard) -> Option<Move> {
        if self.size != after.size {
            return None;
        }

        let mut changed = all_coords(self.size)
            .flat_map(|sub_board| all_coords(self.size).map(move |cell| Move::new(sub_board, cell)))
            .filter(|mv| self.cell(mv) != after.cell(mv));

        match (changed.next(), changed.next()) {
            (Some(mv), None) if self.cell(&mv).is_none() => Some(mv),
            _ => None,
        }
    }

    fn in_bounds(&self, (row, col): Coord) -> bool {
        row < self.size && col < self.size
    }

    fn compute_winner(&self) -> Option<Outcome> {
        let winner = line_winner(self.size, |coord| {
            self.sub_outcome(coord).and_then(|outcome| outcome.winner())
        });

        if let Some(winner) = winner {
            return Some(Outcome::Win(winner));
        }

        if self.sub_boards.iter().all(|b| b.is_decided()) {
            return Some(Outcome::Draw);
        }

        None
    }
}

fn all_coords(size: usize) -> impl Iterator<Item = Coord> {
    iproduct!(0..size, 0..size)
}

impl engine::GameState for MainBoard {
    fn initial() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

impl Display for MainBoard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let size = self.size;
        let width = size * (2 * size).saturating_sub(1) + 4 * size.saturating_sub(1);
        let separator = "-".repeat(width);

        writeln!(f, "{}", separator)?;
        for main_row in 0..size {
            for cell_row in 0..size {
                let line = (0..size)
                    .map(|main_col| {
                        (0..size)
                            .map(|cell_col| {
                                match self.sub_board((main_row, main_col)).cell((cell_row, cell_col)) {
                                    Some(player) => player.to_string(),
                                    None => "_".to_string(),
                                }
                            })
                            .collect::<Vec<_>>()
                            .join("|")
                    })
                    .collect::<Vec<_>>()
                    .join(" || ");

                writeln!(f, "{}", line)?;
            }
            writeln!(f, "{}", separator)?;
        }

        Ok(())
    }
}
