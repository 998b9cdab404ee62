//! Search tree nodes.

/// Index of a node inside its [`SearchTree`](crate::SearchTree) arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The first node allocated in every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// The id of the arena slot at `index`.
    ///
    /// # Panics
    /// If `index` does not fit a `u32`.
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(u32::try_from(index).expect("search tree exceeded u32 node ids"))
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the Monte Carlo search tree.
///
/// Owns the game state it represents and the statistics of every simulation
/// tallied through it. `wins` is stored from the perspective of the player who
/// made the move leading into this node, so a parent picks the child with the
/// highest win rate.
#[derive(Debug, Clone)]
pub struct SearchNode<S> {
    /// The position this node represents.
    pub(crate) state: S,
    /// Accumulated value mass; draws contribute fractional credit.
    pub(crate) wins: f64,
    /// Number of simulation outcomes tallied into this node.
    pub(crate) plays: u64,
    /// One flag per action slot, computed once when the node is created.
    pub(crate) legal_actions: Vec<bool>,
    /// Prior weights per action slot, zero wherever the action is illegal.
    pub(crate) priors: Vec<f64>,
    /// `None` until expanded, then exactly one slot per action.
    pub(crate) children: Option<Vec<Option<NodeId>>>,
    /// The node this one was expanded from. Not an owning link.
    pub(crate) parent: Option<NodeId>,
}

impl<S> SearchNode<S> {
    /// Creates an unexpanded node with empty statistics.
    ///
    /// `priors` is masked by `legal_actions` so illegal actions always carry
    /// zero weight, whatever the game reported.
    pub fn new(state: S, legal_actions: Vec<bool>, priors: Vec<f64>) -> Self {
        debug_assert_eq!(legal_actions.len(), priors.len());
        let priors = priors
            .into_iter()
            .zip(&legal_actions)
            .map(|(prior, &legal)| if legal { prior.max(0.0) } else { 0.0 })
            .collect();
        Self {
            state,
            wins: 0.0,
            plays: 0,
            legal_actions,
            priors,
            children: None,
            parent: None,
        }
    }

    /// Adds one simulation outcome.
    #[inline]
    pub fn tally(&mut self, value: f64) {
        self.wins += value;
        self.plays += 1;
    }

    /// Adds the aggregate statistics of another node for the same position.
    #[inline]
    pub fn absorb(&mut self, wins: f64, plays: u64) {
        self.wins += wins;
        self.plays += plays;
    }

    /// Mean value of the tallied outcomes, `0` when nothing was tallied.
    pub fn win_rate(&self) -> f64 {
        if self.plays > 0 {
            self.wins / self.plays as f64
        } else {
            0.0
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn wins(&self) -> f64 {
        self.wins
    }

    pub fn plays(&self) -> u64 {
        self.plays
    }

    pub fn legal_actions(&self) -> &[bool] {
        &self.legal_actions
    }

    pub fn priors(&self) -> &[f64] {
        &self.priors
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child slots, or `None` if the node has not been expanded.
    pub fn children(&self) -> Option<&[Option<NodeId>]> {
        self.children.as_deref()
    }

    /// The child reached through `action`, if expanded and legal.
    pub fn child(&self, action: usize) -> Option<NodeId> {
        self.children.as_ref().and_then(|children| children.get(action).copied().flatten())
    }

    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    pub fn action_count(&self) -> usize {
        self.legal_actions.len()
    }

    pub fn legal_action_count(&self) -> usize {
        self.legal_actions.iter().filter(|&&legal| legal).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_from_index() {
        assert_eq!(NodeId::from_index(0), NodeId::ROOT);
        assert_eq!(NodeId::from_index(u32::MAX as usize).index(), u32::MAX as usize);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "exceeded u32 node ids")]
    fn test_node_id_past_u32_range_panics() {
        NodeId::from_index(u32::MAX as usize + 1);
    }

    #[test]
    fn test_win_rate_of_untested_node_is_zero() {
        let node = SearchNode::new((), vec![true, true], vec![1.0, 1.0]);
        assert_eq!(node.plays(), 0);
        assert_eq!(node.win_rate(), 0.0);
    }

    #[test]
    fn test_tally_accumulates_fractional_wins() {
        let mut node = SearchNode::new((), vec![true], vec![1.0]);
        node.tally(1.0);
        node.tally(0.5);
        node.tally(0.0);
        assert_eq!(node.plays(), 3);
        assert!((node.wins() - 1.5).abs() < 1e-12);
        assert!((node.win_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_priors_are_masked_by_legality() {
        let node = SearchNode::new((), vec![true, false, true, false], vec![0.5, 3.0, 0.0, 1.0]);
        assert_eq!(node.priors(), &[0.5, 0.0, 0.0, 0.0]);
        for (prior, legal) in node.priors().iter().zip(node.legal_actions()) {
            if *prior > 0.0 {
                assert!(*legal);
            }
            if !*legal {
                assert_eq!(*prior, 0.0);
            }
        }
    }

    #[test]
    fn test_absorb_adds_statistics() {
        let mut node = SearchNode::new((), vec![true], vec![1.0]);
        node.tally(1.0);
        node.absorb(2.5, 4);
        assert_eq!(node.plays(), 5);
        assert!((node.wins() - 3.5).abs() < 1e-12);
        assert!(!node.is_expanded());
        assert_eq!(node.child(0), None);
    }
}
