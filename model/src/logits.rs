use super::analytics::ActionWithPolicy;
use common::softmax::softmax;

/// Replaces raw logits with their softmax, restricted to the actions present in the slice.
pub fn update_logit_policies_to_softmax<A>(logit_policies: &mut [ActionWithPolicy<A>], temperature: f32) {
    let policy_scores_by_action = logit_policies
        .iter()
        .map(|p| p.policy_score)
        .collect::<Vec<_>>();
    let softmaxed_policies = softmax(&policy_scores_by_action, temperature);

    for (awp, policy) in logit_policies.iter_mut().zip(softmaxed_policies) {
        awp.policy_score = policy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_softmax_sums_to_one() {
        let mut policies = vec![
            ActionWithPolicy::new('a', 2.0),
            ActionWithPolicy::new('b', 1.0),
            ActionWithPolicy::new('c', -1.0),
        ];

        update_logit_policies_to_softmax(&mut policies, 1.0);

        let sum: f32 = policies.iter().map(|p| p.policy_score).sum();
        assert_approx_eq!(sum, 1.0);
        assert!(policies[0].policy_score > policies[1].policy_score);
        assert!(policies[1].policy_score > policies[2].policy_score);
    }
}
