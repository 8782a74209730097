use anyhow::{anyhow, Result};
use common::create_rng_from_seed;
use mcts::{Agent, SearchStrategy};
use rand::prelude::{SliceRandom, StdRng};
use ultimate_tictactoe::{Engine, MainBoard, Move};

/// One seat at the board.
pub trait Player {
    fn choose_move(&mut self, board: &MainBoard) -> Result<Move>;

    /// Called after the move returned by `choose_move` has been played.
    fn commit_move(&mut self, _mv: &Move) -> Result<()> {
        Ok(())
    }
}

/// Picks uniformly among the legal moves.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: create_rng_from_seed(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn choose_move(&mut self, board: &MainBoard) -> Result<Move> {
        board
            .legal_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("No legal moves available"))
    }
}

pub struct MctsPlayer<'a, St>
where
    St: SearchStrategy,
{
    agent: Agent<'a, Engine, St>,
}

impl<'a, St> MctsPlayer<'a, St>
where
    St: SearchStrategy,
{
    pub fn new(agent: Agent<'a, Engine, St>) -> Self {
        Self { agent }
    }
}

impl<St> Player for MctsPlayer<'_, St>
where
    St: SearchStrategy<State = MainBoard, Action = Move>,
{
    fn choose_move(&mut self, board: &MainBoard) -> Result<Move> {
        self.agent.choose_move(board)
    }

    fn commit_move(&mut self, mv: &Move) -> Result<()> {
        self.agent.commit_move(mv)
    }
}
