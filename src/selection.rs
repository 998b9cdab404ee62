//! UCT action selection.

use crate::node::NodeId;
use crate::tree::SearchTree;

/// How the children of a node are scored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Selection {
    /// Win rate plus the prior-weighted exploration bonus, used while simulating.
    Explore { exploration_rate: f64 },
    /// Win rate only, used to pick the move actually played.
    Exploit,
}

/// Scores every action slot of an expanded node.
///
/// `score[i] = win_rate[i] + c * prior[i] * sqrt(plays) / (1 + child_plays[i])`
/// when exploring, `score[i] = win_rate[i]` when exploiting. Empty slots score
/// from zero statistics.
///
/// # Panics
/// If the node has not been expanded.
pub fn uct_scores<S>(tree: &SearchTree<S>, id: NodeId, selection: Selection) -> Vec<f64> {
    let node = tree.node(id);
    assert!(node.is_expanded(), "selection requires an expanded node");

    let mut scores = tree.child_win_rates(id);
    if let Selection::Explore { exploration_rate } = selection {
        let parent_plays_sqrt = (node.plays() as f64).sqrt();
        for ((score, prior), plays) in scores.iter_mut().zip(node.priors()).zip(tree.child_plays(id)) {
            *score += exploration_rate * prior * parent_plays_sqrt / (1.0 + plays as f64);
        }
    }
    scores
}

/// Picks the action with the highest score plus legality flag.
///
/// Adding `1` for legal slots makes a legal all-zero child beat an illegal
/// all-zero slot. Every score term is non-negative, so this is enough to keep
/// illegal slots from being chosen. Ties go to the lowest action index.
///
/// # Panics
/// If the node has not been expanded.
pub fn select_action<S>(tree: &SearchTree<S>, id: NodeId, selection: Selection) -> usize {
    let legal_actions = tree.node(id).legal_actions();
    let scores = uct_scores(tree, id, selection);

    let mut best_action = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (action, (score, &legal)) in scores.iter().zip(legal_actions).enumerate() {
        let guarded = score + if legal { 1.0 } else { 0.0 };
        if guarded > best_score {
            best_score = guarded;
            best_action = action;
        }
    }
    best_action
}
