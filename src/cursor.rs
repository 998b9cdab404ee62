//! Tracking the node that stands for the game's actual position.

use crate::node::{NodeId, SearchNode};
use crate::tree::SearchTree;
use log::{trace, warn};

/// A search tree together with the node that is currently the root.
///
/// The root moves down the tree as moves are played and can be rewound to
/// the first position of the game. Ancestors of the current root are kept so
/// rewinding can restore the full history.
#[derive(Debug, Clone)]
pub struct RootCursor<S> {
    tree: SearchTree<S>,
    root: NodeId,
}

impl<S: PartialEq> RootCursor<S> {
    /// Places the cursor on the first node of `tree`.
    pub fn new(tree: SearchTree<S>) -> Self {
        Self {
            tree,
            root: NodeId::ROOT,
        }
    }

    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &SearchNode<S> {
        self.tree.node(self.root)
    }

    /// Splits the cursor into the tree and the current root for searching.
    pub(crate) fn tree_and_root_mut(&mut self) -> (&mut SearchTree<S>, NodeId) {
        (&mut self.tree, self.root)
    }

    /// Moves the root to the child whose state equals `state`.
    ///
    /// Returns `None`, discarding all statistics, when the root was never
    /// expanded or no child matches.
    pub fn advance(self, state: &S) -> Option<Self> {
        let root = self.tree.node(self.root);
        let Some(children) = root.children() else {
            trace!("root was never expanded, discarding the search tree");
            return None;
        };

        let matched = children
            .iter()
            .flatten()
            .copied()
            .find(|&child| self.tree.node(child).state() == state);
        match matched {
            Some(child) => {
                trace!(
                    "advanced root to node {:?} with {} plays",
                    child,
                    self.tree.node(child).plays()
                );
                Some(Self {
                    tree: self.tree,
                    root: child,
                })
            }
            None => {
                warn!("no child of the root matches the played position, discarding the search tree");
                None
            }
        }
    }

    /// Moves the root back to the first position of the game.
    pub fn rewind(&mut self) {
        self.root = self.tree.topmost_ancestor(self.root);
    }
}
