/// Player ids are `1` and `2`.
pub fn opponent(player: usize) -> usize {
    3 - player
}
