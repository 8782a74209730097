use std::marker::PhantomData;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use super::analytics::{GameAnalyzer, GameStateAnalysis};
use super::mappings::{InputMap, PolicyMap};

/// External policy/value model. Consumes an encoded state and returns one policy logit per
/// action slot plus a value for the player to move.
pub trait Predictor {
    fn predict(&self, input: &[f32]) -> Result<Prediction>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub policy: Vec<f32>,
    pub value: f32,
}

/// Adapts a raw `Predictor` into a `GameAnalyzer` through a game specific mapper.
pub struct OracleAnalyzer<P, M, S, A> {
    predictor: P,
    mapper: M,
    _phantom: PhantomData<fn(&S) -> A>,
}

impl<P, M, S, A> OracleAnalyzer<P, M, S, A> {
    pub fn new(predictor: P, mapper: M) -> Self {
        Self {
            predictor,
            mapper,
            _phantom: PhantomData,
        }
    }
}

impl<P, M, S, A> GameAnalyzer for OracleAnalyzer<P, M, S, A>
where
    P: Predictor,
    M: InputMap<S> + PolicyMap<S, A>,
{
    type Action = A;
    type State = S;

    fn analyze(&self, game_state: &S) -> Result<GameStateAnalysis<A>> {
        let mut input = vec![0.0; self.mapper.input_size()];
        self.mapper.game_state_to_input(game_state, &mut input);

        let prediction = self
            .predictor
            .predict(&input)
            .context("Failed to get a prediction for the game state")?;

        ensure!(
            prediction.value.is_finite(),
            "Predicted value {} is not finite",
            prediction.value
        );

        let policy_scores = self
            .mapper
            .policy_to_valid_actions(game_state, &prediction.policy);

        Ok(GameStateAnalysis::new(
            prediction.value.clamp(-1.0, 1.0),
            policy_scores,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{update_logit_policies_to_softmax, ActionWithPolicy};
    use anyhow::anyhow;
    use assert_approx_eq::assert_approx_eq;
    use std::cell::RefCell;

    struct FixedPredictor {
        prediction: Option<Prediction>,
        inputs: RefCell<Vec<Vec<f32>>>,
    }

    impl Predictor for FixedPredictor {
        fn predict(&self, input: &[f32]) -> Result<Prediction> {
            self.inputs.borrow_mut().push(input.to_vec());
            self.prediction
                .clone()
                .ok_or_else(|| anyhow!("Predictor is unavailable"))
        }
    }

    /// Three slots where the state marks which slots are legal.
    struct SlotMapper;

    impl InputMap<[bool; 3]> for SlotMapper {
        fn input_size(&self) -> usize {
            3
        }

        fn game_state_to_input(&self, game_state: &[bool; 3], input: &mut [f32]) {
            for (slot, legal) in input.iter_mut().zip(game_state) {
                *slot = if *legal { 1.0 } else { 0.0 };
            }
        }
    }

    impl PolicyMap<[bool; 3], usize> for SlotMapper {
        fn policy_to_valid_actions(
            &self,
            game_state: &[bool; 3],
            policy_scores: &[f32],
        ) -> Vec<ActionWithPolicy<usize>> {
            let mut policies: Vec<_> = game_state
                .iter()
                .zip(policy_scores)
                .enumerate()
                .filter(|(_, (legal, _))| **legal)
                .map(|(i, (_, p))| ActionWithPolicy::new(i, *p))
                .collect();

            update_logit_policies_to_softmax(&mut policies, 1.0);

            policies
        }
    }

    #[test]
    fn test_analysis_is_restricted_to_legal_actions() {
        let predictor = FixedPredictor {
            prediction: Some(Prediction {
                policy: vec![5.0, 0.0, 0.0],
                value: 0.25,
            }),
            inputs: RefCell::new(vec![]),
        };
        let analyzer = OracleAnalyzer::new(predictor, SlotMapper);

        let analysis = analyzer.analyze(&[false, true, true]).unwrap();

        assert_eq!(analysis.policy_scores.len(), 2);
        assert_eq!(analysis.policy_score(&0), None);
        assert_approx_eq!(analysis.policy_score(&1).unwrap(), 0.5);
        assert_approx_eq!(analysis.policy_score(&2).unwrap(), 0.5);
        assert_approx_eq!(analysis.value_score, 0.25);
        assert_eq!(
            analyzer.predictor.inputs.borrow().as_slice(),
            &[vec![0.0, 1.0, 1.0]]
        );
    }

    #[test]
    fn test_value_is_clamped() {
        let predictor = FixedPredictor {
            prediction: Some(Prediction {
                policy: vec![0.0, 0.0, 0.0],
                value: 3.0,
            }),
            inputs: RefCell::new(vec![]),
        };
        let analyzer = OracleAnalyzer::new(predictor, SlotMapper);

        let analysis = analyzer.analyze(&[true, true, true]).unwrap();

        assert_approx_eq!(analysis.value_score, 1.0);
    }

    #[test]
    fn test_predictor_errors_are_propagated() {
        let predictor = FixedPredictor {
            prediction: None,
            inputs: RefCell::new(vec![]),
        };
        let analyzer = OracleAnalyzer::new(predictor, SlotMapper);

        assert!(analyzer.analyze(&[true, true, true]).is_err());
    }
}
