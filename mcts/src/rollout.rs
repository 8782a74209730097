use engine::{GameEngine, ValidActions, Value};
use rand::Rng;

use super::strategy::Evaluation;

/// Plays uniformly random actions from `game_state` until the game ends. The reward is the final
/// value for `player`.
pub fn random_playout<S, A, E, R>(
    engine: &E,
    game_state: &S,
    player: usize,
    record_actions: bool,
    rng: &mut R,
) -> Evaluation<A>
where
    S: Clone,
    E: GameEngine<State = S, Action = A> + ValidActions<State = S, Action = A>,
    E::Terminal: Value,
    R: Rng,
{
    let mut playout = vec![];
    let mut state = game_state.clone();

    loop {
        if let Some(terminal) = engine.terminal_state(&state) {
            return Evaluation {
                reward: terminal.get_value_for_player(player),
                playout,
            };
        }

        let mut actions = engine.valid_actions(&state);
        if actions.is_empty() {
            return Evaluation {
                reward: 0.0,
                playout,
            };
        }

        let action = actions.swap_remove(rng.gen_range(0..actions.len()));
        let mover = engine.player_to_move(&state);
        state = engine.take_action(&state, &action);

        if record_actions {
            playout.push((mover, action));
        }
    }
}
