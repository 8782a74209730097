use log::debug;
use rand::prelude::{SeedableRng, StdRng};

/// Creates a deterministic rng when a seed is provided, otherwise one seeded from entropy.
pub fn create_rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            debug!("Creating rng from seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_produces_same_sequence() {
        let mut left = create_rng_from_seed(Some(7));
        let mut right = create_rng_from_seed(Some(7));

        let left: Vec<u32> = (0..8).map(|_| left.gen()).collect();
        let right: Vec<u32> = (0..8).map(|_| right.gen()).collect();

        assert_eq!(left, right);
    }
}
