use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use super::Coord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Draw,
    Win(usize),
}

impl Outcome {
    pub fn winner(&self) -> Option<usize> {
        match self {
            Outcome::Win(player) => Some(*player),
            Outcome::Draw => None,
        }
    }
}

/// A single N×N tic-tac-toe grid. Cells hold `0` when empty, otherwise the id of the player who
/// claimed them. Once decided the board never changes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubBoard {
    size: usize,
    cells: Vec<u8>,
    outcome: Option<Outcome>,
}

impl SubBoard {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
            outcome: None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_decided(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn cell(&self, (row, col): Coord) -> Option<usize> {
        match self.cells[row * self.size + col] {
            0 => None,
            player => Some(player as usize),
        }
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == 0)
            .map(move |(i, _)| (i / self.size, i % self.size))
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell == 0).count()
    }

    pub fn make_move(&mut self, player: usize, coord: Coord) -> Result<()> {
        let (row, col) = coord;

        ensure!(player == 1 || player == 2, "Invalid player id {}", player);
        ensure!(
            row < self.size && col < self.size,
            "Cell {:?} is out of bounds",
            coord
        );
        ensure!(!self.is_decided(), "Sub-board is already decided");
        ensure!(self.cell(coord).is_none(), "Cell {:?} is occupied", coord);

        self.cells[row * self.size + col] = player as u8;
        self.outcome = self.compute_outcome();

        Ok(())
    }

    fn compute_outcome(&self) -> Option<Outcome> {
        if let Some(winner) = line_winner(self.size, |coord| self.cell(coord)) {
            return Some(Outcome::Win(winner));
        }

        if self.cells.iter().all(|cell| *cell != 0) {
            return Some(Outcome::Draw);
        }

        None
    }
}

/// The player occupying a complete row, column or diagonal of an N×N grid, if any.
pub(crate) fn line_winner<F>(size: usize, cell: F) -> Option<usize>
where
    F: Fn(Coord) -> Option<usize>,
{
    let line_owner = |coords: &mut dyn Iterator<Item = Coord>| {
        let mut owner = None;
        for coord in coords {
            match (cell(coord), owner) {
                (None, _) => return None,
                (Some(player), None) => owner = Some(player),
                (Some(player), Some(current)) if player != current => return None,
                _ => {}
            }
        }
        owner
    };

    for i in 0..size {
        let row = line_owner(&mut (0..size).map(|j| (i, j)));
        if row.is_some() {
            return row;
        }

        let column = line_owner(&mut (0..size).map(|j| (j, i)));
        if column.is_some() {
            return column;
        }
    }

    line_owner(&mut (0..size).map(|i| (i, i)))
        .or_else(|| line_owner(&mut (0..size).map(|i| (i, size - 1 - i))))
}
