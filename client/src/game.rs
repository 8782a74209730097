use anyhow::{bail, Context, Result};
use engine::{GameEngine, Value as _};
use log::{info, warn};
use mcts::{Agent, HeuristicRaveStrategy, RaveStrategy, SolverStrategy, Ucb1Strategy};
use serde::Serialize;
use ultimate_tictactoe::{Engine, MainBoard, SubBoardCapture};

use super::options::{PlayOptions, PlayerKind, SeatOptions};
use super::player::{MctsPlayer, Player, RandomPlayer};

const MAX_MOVE_ATTEMPTS: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeatSummary {
    pub kind: String,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchSummary {
    pub games: usize,
    pub board_size: usize,
    pub player_1: SeatSummary,
    pub player_2: SeatSummary,
}

pub fn create_player<'a>(
    engine: &'a Engine,
    board: &MainBoard,
    seat: usize,
    options: &SeatOptions,
    seed: Option<u64>,
) -> Box<dyn Player + 'a> {
    let search = &options.search;
    let agent = options.agent.clone();
    let board = board.clone();

    match options.kind {
        PlayerKind::Random => Box::new(RandomPlayer::new(seed)),
        PlayerKind::Ucb1 => Box::new(MctsPlayer::new(Agent::new(
            board,
            seat,
            engine,
            Ucb1Strategy::new(engine, search),
            agent,
            seed,
        ))),
        PlayerKind::Solver => Box::new(MctsPlayer::new(Agent::new(
            board,
            seat,
            engine,
            SolverStrategy::new(engine, search),
            agent,
            seed,
        ))),
        PlayerKind::Rave => Box::new(MctsPlayer::new(Agent::new(
            board,
            seat,
            engine,
            RaveStrategy::new(engine, search),
            agent,
            seed,
        ))),
        PlayerKind::HeuristicRave => Box::new(MctsPlayer::new(Agent::new(
            board,
            seat,
            engine,
            HeuristicRaveStrategy::new(engine, SubBoardCapture, search),
            agent,
            seed,
        ))),
    }
}

/// Plays one game from `board` to the end. Returns the final board.
pub fn play_game(engine: &Engine, board: MainBoard, players: &mut [Box<dyn Player + '_>; 2]) -> Result<MainBoard> {
    let mut board = board;

    while engine.terminal_state(&board).is_none() {
        let player_to_move = engine.player_to_move(&board);
        let player = &mut players[player_to_move - 1];

        let mut attempts = 0;
        let mv = loop {
            attempts += 1;
            let mv = player.choose_move(&board)?;

            match board.make_move(&mv) {
                Ok(()) => break mv,
                Err(err) if attempts < MAX_MOVE_ATTEMPTS => {
                    warn!("Player {} chose an illegal move {}: {:#}", player_to_move, mv, err);
                }
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("Player {} failed to produce a legal move", player_to_move)
                    })
                }
            }
        };

        player.commit_move(&mv)?;
        info!("Move {}: player {} played {}", board.move_count(), player_to_move, mv);
    }

    info!("Final board:\n{}", board);
    Ok(board)
}

/// Plays `options.games` games with seat 1 always moving first.
pub fn play_match(engine: &Engine, options: &PlayOptions, seats: &[SeatOptions; 2]) -> Result<MatchSummary> {
    if options.games == 0 {
        bail!("games must be at least 1");
    }

    let mut summary = MatchSummary {
        games: options.games,
        board_size: options.board_size,
        player_1: SeatSummary {
            kind: seats[0].kind.to_string(),
            ..Default::default()
        },
        player_2: SeatSummary {
            kind: seats[1].kind.to_string(),
            ..Default::default()
        },
    };

    for game in 0..options.games {
        let board = MainBoard::new(options.board_size);
        let seed = |seat: u64| options.seed.map(|seed| seed + game as u64 * 2 + seat);

        let mut players = [
            create_player(engine, &board, 1, &seats[0], seed(0)),
            create_player(engine, &board, 2, &seats[1], seed(1)),
        ];

        let board = play_game(engine, board, &mut players)
            .with_context(|| format!("Game {} failed", game + 1))?;

        let terminal = engine
            .terminal_state(&board)
            .context("Game ended without a result")?;

        for (player, seat) in [(1, &mut summary.player_1), (2, &mut summary.player_2)] {
            let value = terminal.get_value_for_player(player);
            if value > 0.0 {
                seat.wins += 1;
            } else if value < 0.0 {
                seat.losses += 1;
            } else {
                seat.draws += 1;
            }
        }

        info!(
            "Game {} of {} finished after {} moves: {:?}",
            game + 1,
            options.games,
            board.move_count(),
            board.winner()
        );
    }

    Ok(summary)
}
