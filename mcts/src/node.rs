use common::div_or_zero;
use generational_arena::{Arena, Index};

pub type NodeArena<S, A> = Arena<SearchNode<S, A>>;

/// All-moves-as-first statistics of the action leading into a node, as seen from its parent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AmafStats {
    pub count: u32,
    pub value: f32,
}

impl AmafStats {
    pub fn new(count: u32, value: f32) -> Self {
        Self { count, value }
    }

    pub fn mean(&self) -> f32 {
        if self.value.is_infinite() {
            return self.value;
        }

        div_or_zero(self.value, self.count as f32)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OracleStats {
    /// Probability the oracle assigned to the action leading into this node.
    pub prior: f32,
    /// Oracle value for the player to move at this node, once analyzed.
    pub predicted_value: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum NodeStats {
    #[default]
    Plain,
    Amaf(AmafStats),
    Oracle(OracleStats),
}

/// Initial statistics for a freshly expanded node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Seed {
    pub visits: u32,
    pub total_reward: f32,
    pub stats: NodeStats,
}

impl Seed {
    pub fn new(stats: NodeStats) -> Self {
        Self {
            visits: 0,
            total_reward: 0.0,
            stats,
        }
    }

    pub fn with_reward(visits: u32, total_reward: f32, stats: NodeStats) -> Self {
        Self {
            visits,
            total_reward,
            stats,
        }
    }
}

/// A node of the search tree. `total_reward` is from the perspective of the node's mover, the player
/// whose action led into the node. `+inf`/`-inf` mark a proven win/loss for that player.
#[derive(Debug)]
pub struct SearchNode<S, A> {
    state: S,
    action: Option<A>,
    parent: Option<Index>,
    children: Vec<Index>,
    player_to_move: usize,
    is_terminal: bool,
    visits: u32,
    total_reward: f32,
    stats: NodeStats,
}

impl<S, A> SearchNode<S, A> {
    pub fn new(
        state: S,
        action: Option<A>,
        parent: Option<Index>,
        player_to_move: usize,
        is_terminal: bool,
        seed: Seed,
    ) -> Self {
        Self {
            state,
            action,
            parent,
            children: vec![],
            player_to_move,
            is_terminal,
            visits: seed.visits,
            total_reward: seed.total_reward,
            stats: seed.stats,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn player_to_move(&self) -> usize {
        self.player_to_move
    }

    /// The player who made the action leading into this node.
    pub fn mover(&self) -> usize {
        engine::opponent(self.player_to_move)
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn total_reward(&self) -> f32 {
        self.total_reward
    }

    pub fn mean_reward(&self) -> f32 {
        if self.is_proven() {
            return self.total_reward;
        }

        div_or_zero(self.total_reward, self.visits as f32)
    }

    pub fn is_proven_win(&self) -> bool {
        self.total_reward == f32::INFINITY
    }

    pub fn is_proven_loss(&self) -> bool {
        self.total_reward == f32::NEG_INFINITY
    }

    pub fn is_proven(&self) -> bool {
        self.total_reward.is_infinite()
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    pub fn amaf(&self) -> AmafStats {
        match self.stats {
            NodeStats::Amaf(amaf) => amaf,
            _ => AmafStats::default(),
        }
    }

    pub fn oracle(&self) -> OracleStats {
        match self.stats {
            NodeStats::Oracle(oracle) => oracle,
            _ => OracleStats::default(),
        }
    }

    /// Counts a visit. Once a node holds an infinite reward only its visit count changes.
    pub(crate) fn record(&mut self, reward: f32) {
        self.visits += 1;

        if self.is_proven() {
            return;
        }

        if reward.is_infinite() {
            self.total_reward = reward;
        } else {
            self.total_reward += reward;
        }
    }

    pub(crate) fn record_amaf(&mut self, reward: f32) {
        let mut amaf = self.amaf();
        amaf.count += 1;

        if !amaf.value.is_infinite() {
            amaf.value += reward;
        }

        self.stats = NodeStats::Amaf(amaf);
    }

    pub(crate) fn set_stats(&mut self, stats: NodeStats) {
        self.stats = stats;
    }

    pub(crate) fn set_children(&mut self, children: Vec<Index>) {
        self.children = children;
    }

    pub(crate) fn detach(&mut self) {
        self.parent = None;
    }

    pub(crate) fn into_children(self) -> Vec<Index> {
        self.children
    }
}
