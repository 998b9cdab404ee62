//! Root-parallel search and tree merging.
//!
//! Each worker grows a private tree from the same root position, so no
//! synchronization is needed while simulating. After all workers have joined,
//! their trees are merged into the shared tree by action index: every tree
//! was seeded from the same state, so slot `i` means the same action in all
//! of them.

use crate::node::{NodeId, SearchNode};
use crate::simulation::Simulator;
use crate::tree::SearchTree;
use crate::Game;
use log::trace;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::ThreadPool;
use std::time::Instant;

/// When a worker has to stop starting new simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub deadline: Option<Instant>,
    pub simulations: Option<u64>,
}

impl Limits {
    /// Whether another simulation may start after `completed` have finished.
    ///
    /// Only checked between simulations; one that has started always runs to
    /// completion.
    #[inline]
    pub fn allows(&self, completed: u64) -> bool {
        if self.simulations.is_some_and(|limit| completed >= limit) {
            return false;
        }
        match self.deadline {
            Some(deadline) => Instant::now() < deadline,
            None => true,
        }
    }
}

/// Runs simulations against `root` of `tree` until `limits` stop it.
/// Returns the number of simulations performed.
pub fn run_worker<G: Game>(
    simulator: &Simulator<'_, G>,
    tree: &mut SearchTree<G::State>,
    root: NodeId,
    limits: Limits,
    rng: &mut Xoshiro256PlusPlus,
) -> u64 {
    let mut completed = 0;
    while limits.allows(completed) {
        simulator.simulate(tree, root, rng);
        completed += 1;
    }
    completed
}

/// The result of one parallel worker.
#[derive(Debug)]
pub struct WorkerReport<S> {
    pub tree: SearchTree<S>,
    pub simulations: u64,
}

/// Grows one independent tree per seed on `pool` and returns them once every worker has joined.
///
/// Each tree starts from a copy of `template`: same state, legal actions and
/// priors, but no statistics and no children.
pub fn run_parallel<G: Game>(
    pool: &ThreadPool,
    simulator: &Simulator<'_, G>,
    template: &SearchNode<G::State>,
    limits: Limits,
    seeds: &[u64],
) -> Vec<WorkerReport<G::State>> {
    let mut reports: Vec<(WorkerReport<G::State>, Xoshiro256PlusPlus)> = seeds
        .iter()
        .map(|&seed| {
            let root = SearchNode::new(
                template.state().clone(),
                template.legal_actions().to_vec(),
                template.priors().to_vec(),
            );
            let report = WorkerReport {
                tree: SearchTree::new(root),
                simulations: 0,
            };
            (report, Xoshiro256PlusPlus::seed_from_u64(seed))
        })
        .collect();

    pool.scope(|scope| {
        for (worker, (report, rng)) in reports.iter_mut().enumerate() {
            scope.spawn(move |_| {
                report.simulations = run_worker(simulator, &mut report.tree, NodeId::ROOT, limits, rng);
                trace!("worker {} finished after {} simulations", worker, report.simulations);
            });
        }
    });

    reports.into_iter().map(|(report, _)| report).collect()
}

/// Merges whole worker trees into `target` at node `at`.
///
/// Statistics of aligned nodes are summed. Where `target` has no children yet
/// but a source does, that source's child array is moved over wholesale and
/// re-parented; the other sources are then merged into it slot by slot.
/// Source subtrees with no counterpart in `target` are dropped.
pub fn merge_trees<S>(target: &mut SearchTree<S>, at: NodeId, sources: Vec<SearchTree<S>>) {
    let mut sources: Vec<Vec<Option<SearchNode<S>>>> = sources.into_iter().map(SearchTree::into_slots).collect();

    // Each entry pairs a target node with the (source tree, source node) pairs aligned to it.
    let initial: Vec<(usize, NodeId)> = (0..sources.len()).map(|source| (source, NodeId::ROOT)).collect();
    let mut pending = vec![(at, initial)];

    while let Some((target_id, aligned)) = pending.pop() {
        let mut expanded = Vec::with_capacity(aligned.len());
        for (source, source_id) in aligned {
            let Some(node) = sources[source][source_id.index()].as_ref() else {
                continue;
            };
            target.node_mut(target_id).absorb(node.wins, node.plays);
            if node.is_expanded() {
                expanded.push((source, source_id));
            }
        }
        if expanded.is_empty() {
            continue;
        }

        if !target.node(target_id).is_expanded() {
            let (source, source_id) = expanded.remove(0);
            adopt_children(target, target_id, &mut sources[source], source_id);
        }

        let action_count = target.node(target_id).action_count();
        for action in 0..action_count {
            let Some(target_child) = target.node(target_id).child(action) else {
                continue;
            };
            let children: Vec<(usize, NodeId)> = expanded
                .iter()
                .filter_map(|&(source, source_id)| {
                    let node = sources[source][source_id.index()].as_ref()?;
                    node.child(action).map(|child| (source, child))
                })
                .collect();
            if !children.is_empty() {
                pending.push((target_child, children));
            }
        }
    }
}

/// Moves the children of `source_id` and all their descendants into `target` under `target_id`.
fn adopt_children<S>(
    target: &mut SearchTree<S>,
    target_id: NodeId,
    source: &mut [Option<SearchNode<S>>],
    source_id: NodeId,
) {
    let Some(children) = source[source_id.index()].as_mut().and_then(|node| node.children.take()) else {
        return;
    };

    target.node_mut(target_id).children = Some(vec![None; children.len()]);
    let mut pending: Vec<(NodeId, NodeId, usize)> = children
        .iter()
        .enumerate()
        .filter_map(|(action, child)| child.map(|child| (child, target_id, action)))
        .collect();

    while let Some((source_child, new_parent, action)) = pending.pop() {
        let Some(mut node) = source[source_child.index()].take() else {
            continue;
        };
        let grandchildren = node.children.take();
        node.parent = Some(new_parent);
        let new_id = target.allocate(node);
        if let Some(slots) = target.node_mut(new_parent).children.as_mut() {
            slots[action] = Some(new_id);
        }

        if let Some(grandchildren) = grandchildren {
            target.node_mut(new_id).children = Some(vec![None; grandchildren.len()]);
            pending.extend(
                grandchildren
                    .iter()
                    .enumerate()
                    .filter_map(|(action, child)| child.map(|child| (child, new_id, action))),
            );
        }
    }
}
