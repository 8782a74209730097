use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};

pub struct NodeDetails<A> {
    pub visits: u32,
    pub children: Vec<(A, EdgeDetails)>,
}

impl<A: Display> Display for NodeDetails<A> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let actions = format!(
            "[{}]",
            self.children
                .iter()
                .fold(String::new(), |acc, (a, edge)| acc
                    + &format!("\n\t(A: {}, {}),", a, edge))
        );

        write!(
            f,
            "V: {visits}, Actions: {actions}",
            visits = self.visits,
            actions = actions
        )
    }
}

impl<A: Display> Debug for NodeDetails<A> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Statistics of one root child at the time it was inspected.
#[derive(Clone, PartialEq)]
pub struct EdgeDetails {
    pub visits: u32,
    pub mean: f32,
    pub amaf_visits: u32,
    pub amaf_mean: f32,
    pub prior: f32,
    pub score: f32,
}

impl Display for EdgeDetails {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "N: {visits}, Q: {mean:.3}, AMAF: {amaf_visits}/{amaf_mean:.3}, P: {prior:.3}, score: {score:.3}",
            visits = self.visits,
            mean = self.mean,
            amaf_visits = self.amaf_visits,
            amaf_mean = self.amaf_mean,
            prior = self.prior,
            score = self.score,
        )
    }
}

impl Debug for EdgeDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl EdgeDetails {
    /// Orders by visits, then by mean. Used to rank children for display.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.visits
            .cmp(&other.visits)
            .then_with(|| self.mean.partial_cmp(&other.mean).unwrap_or(Ordering::Equal))
    }
}
