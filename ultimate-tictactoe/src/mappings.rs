use model::{update_logit_policies_to_softmax, ActionWithPolicy, InputMap, PolicyMap};

use super::{MainBoard, Move};

/// Encodes boards for a policy/value oracle. Every cell of the board owns one slot, numbered
/// `((sub_row * N + sub_col) * N + cell_row) * N + cell_col`.
#[derive(Clone, Debug)]
pub struct Mapper {
    board_size: usize,
}

impl Mapper {
    pub fn new(board_size: usize) -> Self {
        Self { board_size }
    }

    /// Number of cells on the board, which is also the length of the policy output.
    pub fn policy_size(&self) -> usize {
        self.board_size.pow(4)
    }

    pub fn move_to_index(&self, mv: &Move) -> usize {
        let n = self.board_size;
        ((mv.sub_board.0 * n + mv.sub_board.1) * n + mv.cell.0) * n + mv.cell.1
    }

    pub fn index_to_move(&self, index: usize) -> Move {
        let n = self.board_size;
        let sub_board_index = index / (n * n);
        let cell_index = index % (n * n);

        Move::new(
            (sub_board_index / n, sub_board_index % n),
            (cell_index / n, cell_index % n),
        )
    }
}

impl InputMap<MainBoard> for Mapper {
    fn input_size(&self) -> usize {
        self.policy_size() * 3 + 1
    }

    /// Player 1 occupancy, player 2 occupancy and the legal move mask, followed by `player_to_move - 1`.
    fn game_state_to_input(&self, game_state: &MainBoard, input: &mut [f32]) {
        let cells = self.policy_size();
        let (p1_plane, rest) = input.split_at_mut(cells);
        let (p2_plane, rest) = rest.split_at_mut(cells);
        let (legal_plane, player) = rest.split_at_mut(cells);

        for index in 0..cells {
            let mv = self.index_to_move(index);
            let occupant = game_state.cell(&mv);
            p1_plane[index] = if occupant == Some(1) { 1.0 } else { 0.0 };
            p2_plane[index] = if occupant == Some(2) { 1.0 } else { 0.0 };
            legal_plane[index] = 0.0;
        }

        for mv in game_state.legal_moves() {
            legal_plane[self.move_to_index(&mv)] = 1.0;
        }

        player[0] = (game_state.player_to_move() - 1) as f32;
    }
}

impl PolicyMap<MainBoard, Move> for Mapper {
    fn policy_to_valid_actions(
        &self,
        game_state: &MainBoard,
        policy_scores: &[f32],
    ) -> Vec<ActionWithPolicy<Move>> {
        let mut valid_actions_with_policies: Vec<_> = game_state
            .legal_moves()
            .into_iter()
            .map(|mv| {
                let logit = policy_scores
                    .get(self.move_to_index(&mv))
                    .copied()
                    .unwrap_or(0.0);
                ActionWithPolicy::new(mv, logit)
            })
            .collect();

        update_logit_policies_to_softmax(&mut valid_actions_with_policies, 1.0);

        valid_actions_with_policies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_index_round_trips_for_every_cell() {
        let mapper = Mapper::new(3);

        for index in 0..mapper.policy_size() {
            assert_eq!(mapper.move_to_index(&mapper.index_to_move(index)), index);
        }

        assert_eq!(mapper.index_to_move(0), Move::new((0, 0), (0, 0)));
        assert_eq!(mapper.index_to_move(40), Move::new((1, 1), (1, 1)));
        assert_eq!(mapper.index_to_move(80), Move::new((2, 2), (2, 2)));
        assert_eq!(mapper.index_to_move(29), Move::new((1, 0), (0, 2)));
    }

    #[test]
    fn test_encoding_after_two_moves() {
        let mapper = Mapper::new(3);
        let mut board = MainBoard::new(3);
        board.make_move(&Move::new((1, 1), (0, 0))).unwrap();
        board.make_move(&Move::new((0, 0), (2, 2))).unwrap();

        let mut input = vec![0.5; mapper.input_size()];
        mapper.game_state_to_input(&board, &mut input);

        assert_eq!(input.len(), 244);
        assert_eq!(input[..81].iter().sum::<f32>(), 1.0);
        assert_eq!(input[mapper.move_to_index(&Move::new((1, 1), (0, 0)))], 1.0);
        assert_eq!(input[81 + mapper.move_to_index(&Move::new((0, 0), (2, 2)))], 1.0);
        assert_eq!(input[81..162].iter().sum::<f32>(), 1.0);
        // Player 1 is sent to (2, 2) which is empty.
        assert_eq!(input[162..243].iter().sum::<f32>(), 9.0);
        assert_eq!(input[162 + mapper.move_to_index(&Move::new((2, 2), (0, 0)))], 1.0);
        assert_eq!(input[243], 0.0);
    }

    #[test]
    fn test_policy_is_softmaxed_over_legal_moves() {
        let mapper = Mapper::new(3);
        let mut board = MainBoard::new(3);
        board.make_move(&Move::new((0, 0), (1, 1))).unwrap();

        let mut policy = vec![0.0; mapper.policy_size()];
        policy[mapper.move_to_index(&Move::new((0, 0), (0, 0)))] = 50.0;
        policy[mapper.move_to_index(&Move::new((1, 1), (2, 2)))] = 2.0;

        let actions = mapper.policy_to_valid_actions(&board, &policy);

        assert_eq!(actions.len(), 9);
        assert!(actions.iter().all(|a| a.action.sub_board == (1, 1)));
        assert_approx_eq!(actions.iter().map(|a| a.policy_score).sum::<f32>(), 1.0);

        let best = actions
            .iter()
            .max_by(|a, b| a.policy_score.partial_cmp(&b.policy_score).unwrap())
            .unwrap();
        assert_eq!(best.action, Move::new((1, 1), (2, 2)));
    }

    struct CountingPredictor {
        calls: Rc<Cell<usize>>,
    }

    impl model::Predictor for CountingPredictor {
        fn predict(&self, input: &[f32]) -> anyhow::Result<model::Prediction> {
            self.calls.set(self.calls.get() + 1);

            Ok(model::Prediction {
                policy: vec![0.0; input.len() / 3],
                value: 0.0,
            })
        }
    }

    #[test]
    fn test_oracle_search_queries_each_expanded_node_once() {
        use crate::Engine;
        use mcts::{OracleStrategy, SearchOptions, MCTS};

        let engine = Engine::new();
        let calls = Rc::new(Cell::new(0));
        let predictor = CountingPredictor {
            calls: calls.clone(),
        };
        let analyzer = model::OracleAnalyzer::new(predictor, Mapper::new(3));
        let strategy = OracleStrategy::new(&engine, &analyzer, &SearchOptions::default());
        let mut mcts = MCTS::new(MainBoard::new(3), 1, &engine, strategy, common::create_rng_from_seed(Some(4)));

        mcts.search_visits(30).unwrap();

        let mut expanded = 0;
        let mut pending = vec![mcts.root_index()];
        while let Some(index) = pending.pop() {
            let node = mcts.node(index).unwrap();
            if node.has_children() {
                expanded += 1;
                assert!(node.oracle().predicted_value.is_some());
            }
            pending.extend(node.children().iter().copied());
        }

        let children = mcts.root().children();
        assert_eq!(children.len(), 81);
        assert!(children
            .iter()
            .all(|c| (mcts.node(*c).unwrap().oracle().prior - 1.0 / 81.0).abs() < 1e-6));
        assert_eq!(expanded, 31);
        assert_eq!(calls.get(), expanded);
    }
}
