/// Outcome of a finished game. Values are in `[-1, 1]`: a win is `1.0`, a loss `-1.0` and a draw `0.0`.
pub trait Value: Clone {
    fn get_value_for_player(&self, player: usize) -> f32;
}
