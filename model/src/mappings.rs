use super::analytics::ActionWithPolicy;

pub trait InputMap<S> {
    /// Number of floats produced by `game_state_to_input`.
    fn input_size(&self) -> usize;

    fn game_state_to_input(&self, game_state: &S, input: &mut [f32]);
}

pub trait PolicyMap<S, A> {
    /// Maps a policy over every action slot to the legal actions of the state, normalized to sum to one.
    fn policy_to_valid_actions(&self, game_state: &S, policy_scores: &[f32]) -> Vec<ActionWithPolicy<A>>;
}
