pub trait GameEngine {
    type Action;
    type State;
    type Terminal;

    fn take_action(&self, game_state: &Self::State, action: &Self::Action) -> Self::State;
    fn terminal_state(&self, game_state: &Self::State) -> Option<Self::Terminal>;
    fn player_to_move(&self, game_state: &Self::State) -> usize;
    fn move_number(&self, game_state: &Self::State) -> usize;
}

pub trait ValidActions {
    type Action;
    type State;

    /// Legal actions from the given state, in a stable order. Empty exactly when the state is terminal.
    fn valid_actions(&self, game_state: &Self::State) -> Vec<Self::Action>;
}

pub trait InferAction {
    type Action;
    type State;

    /// The single action that transforms `before` into `after`, if there is exactly one.
    fn infer_action(&self, before: &Self::State, after: &Self::State) -> Option<Self::Action>;
}
