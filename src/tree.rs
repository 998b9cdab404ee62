//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous `Vec` and refer to each other by [`NodeId`].
//! Ownership runs from parent to child through the arena; the `parent` index
//! of a node is only followed for backpropagation and root rewinding.

use crate::node::{NodeId, SearchNode};
use crate::Game;

/// An arena-backed search tree. The node at [`NodeId::ROOT`] has no parent.
#[derive(Debug, Clone)]
pub struct SearchTree<S> {
    nodes: Vec<SearchNode<S>>,
}

impl<S> SearchTree<S> {
    /// Creates a tree holding a single root node.
    pub fn new(mut root: SearchNode<S>) -> Self {
        root.parent = None;
        Self { nodes: vec![root] }
    }

    /// Creates a tree rooted at `state`, asking `game` for its legal actions and priors.
    pub fn from_state<G>(game: &G, state: S) -> Self
    where
        G: Game<State = S>,
    {
        let legal_actions = game.legal_actions(&state);
        let priors = game.priors(&state);
        Self::new(SearchNode::new(state, legal_actions, priors))
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode<S> {
        &mut self.nodes[id.index()]
    }

    /// Total number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true for a constructed tree.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Moves a node into the arena and returns its id.
    pub(crate) fn allocate(&mut self, node: SearchNode<S>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Hands out every node as an owned slot so subtrees can be moved out one by one.
    pub(crate) fn into_slots(self) -> Vec<Option<SearchNode<S>>> {
        self.nodes.into_iter().map(Some).collect()
    }

    /// Materializes every child of `id`.
    ///
    /// Each legal action gets a child node built from the resulting state;
    /// illegal slots stay empty. Expanding an already expanded node does
    /// nothing, so existing children and their statistics are kept.
    pub fn expand<G>(&mut self, game: &G, id: NodeId)
    where
        G: Game<State = S>,
    {
        if self.node(id).is_expanded() {
            return;
        }

        let action_count = self.node(id).action_count();
        let mut children = vec![None; action_count];
        for (action, slot) in children.iter_mut().enumerate() {
            if !self.node(id).legal_actions[action] {
                continue;
            }
            let state = game.apply_action(&self.node(id).state, action);
            let legal_actions = game.legal_actions(&state);
            let priors = game.priors(&state);
            let mut child = SearchNode::new(state, legal_actions, priors);
            child.parent = Some(id);
            *slot = Some(self.allocate(child));
        }
        self.node_mut(id).children = Some(children);
    }

    /// Tallies `value` into `id` and alternating `1 - value` / `value` into each ancestor.
    ///
    /// Consecutive levels belong to opposing players, so the perspective flips
    /// at every step up. Stops at the node without a parent.
    pub fn backpropagate(&mut self, id: NodeId, value: f64) {
        let mut current = Some(id);
        let mut value = value;
        while let Some(id) = current {
            let node = self.node_mut(id);
            node.tally(value);
            current = node.parent;
            value = 1.0 - value;
        }
    }

    /// Per-slot win rates of the children of `id`, `0` for empty slots.
    pub fn child_win_rates(&self, id: NodeId) -> Vec<f64> {
        self.per_child(id, |child| child.win_rate())
    }

    /// Per-slot play counts of the children of `id`, `0` for empty slots.
    pub fn child_plays(&self, id: NodeId) -> Vec<u64> {
        self.per_child(id, |child| child.plays)
    }

    fn per_child<T: Default>(&self, id: NodeId, f: impl Fn(&SearchNode<S>) -> T) -> Vec<T> {
        let node = self.node(id);
        match node.children() {
            Some(children) => children
                .iter()
                .map(|slot| slot.map(|child| f(self.node(child))).unwrap_or_default())
                .collect(),
            None => (0..node.action_count()).map(|_| T::default()).collect(),
        }
    }

    /// Follows parent links from `id` to the node without a parent.
    pub fn topmost_ancestor(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::TicTacToe;

    fn tictactoe_tree() -> (TicTacToe, SearchTree<<TicTacToe as Game>::State>) {
        let game = TicTacToe::new(3, 3);
        let tree = SearchTree::from_state(&game, game.new_game());
        (game, tree)
    }

    #[test]
    fn test_expand_creates_one_child_per_legal_action() {
        let (game, mut tree) = tictactoe_tree();
        tree.expand(&game, NodeId::ROOT);

        let children = tree.node(NodeId::ROOT).children().unwrap();
        assert_eq!(children.len(), 9);
        assert!(children.iter().all(Option::is_some));
        assert_eq!(tree.len(), 10);
        for &child in children.iter().flatten() {
            assert_eq!(tree.node(child).parent(), Some(NodeId::ROOT));
            assert_eq!(tree.node(child).legal_action_count(), 8);
        }
    }

    #[test]
    fn test_expand_leaves_illegal_slots_empty() {
        let game = TicTacToe::new(3, 3);
        let state = game.apply_action(&game.new_game(), 4);
        let mut tree = SearchTree::from_state(&game, state);
        tree.expand(&game, NodeId::ROOT);

        let root = tree.node(NodeId::ROOT);
        assert_eq!(root.child(4), None);
        assert!(!root.legal_actions()[4]);
        assert_eq!(root.priors()[4], 0.0);
        assert_eq!(root.children().unwrap().iter().flatten().count(), 8);
    }

    #[test]
    fn test_expand_twice_keeps_children_and_statistics() {
        let (game, mut tree) = tictactoe_tree();
        tree.expand(&game, NodeId::ROOT);
        let first_child = tree.node(NodeId::ROOT).child(0).unwrap();
        tree.backpropagate(first_child, 1.0);
        let size = tree.len();

        tree.expand(&game, NodeId::ROOT);

        assert_eq!(tree.len(), size);
        assert_eq!(tree.node(NodeId::ROOT).children().unwrap().len(), 9);
        assert_eq!(tree.node(NodeId::ROOT).child(0), Some(first_child));
        assert_eq!(tree.node(first_child).plays(), 1);
        assert_eq!(tree.node(first_child).wins(), 1.0);
    }

    #[test]
    fn test_backpropagation_alternates_perspective() {
        let (game, mut tree) = tictactoe_tree();
        // Build a chain root -> a -> b -> c -> d.
        let mut chain = vec![NodeId::ROOT];
        for action in 0..4 {
            let current = *chain.last().unwrap();
            tree.expand(&game, current);
            let next = (0..9).find_map(|a| tree.node(current).child((a + action) % 9)).unwrap();
            chain.push(next);
        }

        let leaf = *chain.last().unwrap();
        tree.backpropagate(leaf, 0.75);

        let depth = chain.len() - 1;
        for (position, &id) in chain.iter().enumerate() {
            let k = depth - position;
            let expected = if k % 2 == 0 { 0.75 } else { 0.25 };
            assert_eq!(tree.node(id).plays(), 1);
            assert!((tree.node(id).wins() - expected).abs() < 1e-12, "ancestor {k} levels up");
        }
        assert_eq!(tree.topmost_ancestor(leaf), NodeId::ROOT);
    }

    #[test]
    fn test_child_vectors_align_with_action_space() {
        let game = TicTacToe::new(3, 3);
        let state = game.apply_action(&game.new_game(), 0);
        let mut tree = SearchTree::from_state(&game, state);
        assert_eq!(tree.child_plays(NodeId::ROOT), vec![0; 9]);

        tree.expand(&game, NodeId::ROOT);
        let child = tree.node(NodeId::ROOT).child(5).unwrap();
        tree.backpropagate(child, 1.0);
        tree.backpropagate(child, 0.0);

        let plays = tree.child_plays(NodeId::ROOT);
        let rates = tree.child_win_rates(NodeId::ROOT);
        assert_eq!(plays.len(), 9);
        assert_eq!(plays[5], 2);
        assert_eq!(plays[0], 0);
        assert!((rates[5] - 0.5).abs() < 1e-12);
        assert_eq!(rates[0], 0.0);
    }
}
