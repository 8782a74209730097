use engine::GameEngine;

use super::options::{DirichletOptions, TemperatureOptions};

pub trait Temperature {
    type State;

    fn temp(&self, state: &Self::State) -> TempAndNoise;
}

/// Temperature for sampling the root move and the noise blended into the visit distribution.
#[derive(Clone, Debug, PartialEq)]
pub struct TempAndNoise {
    pub temperature: f32,
    pub dirichlet: Option<DirichletOptions>,
}

/// Uses `temperature` and noise for the first `temperature_max_moves` moves, then
/// `temperature_post_max_moves` without noise.
pub struct TemperatureMaxMoves<'e, E> {
    pub options: TemperatureOptions,
    pub engine: &'e E,
}

impl<'e, E> TemperatureMaxMoves<'e, E> {
    pub fn new(options: TemperatureOptions, engine: &'e E) -> Self {
        Self { options, engine }
    }
}

impl<E> Temperature for TemperatureMaxMoves<'_, E>
where
    E: GameEngine,
{
    type State = E::State;

    fn temp(&self, state: &Self::State) -> TempAndNoise {
        let move_number = self.engine.move_number(state);

        if move_number < self.options.temperature_max_moves {
            TempAndNoise {
                temperature: self.options.temperature,
                dirichlet: self.options.dirichlet.clone(),
            }
        } else {
            TempAndNoise {
                temperature: self.options.temperature_post_max_moves,
                dirichlet: None,
            }
        }
    }
}
