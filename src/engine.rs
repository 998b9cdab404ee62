//! The search engine facing the game driver.

use crate::config::{SearchBudget, SearchConfig};
use crate::cursor::RootCursor;
use crate::error::SearchError;
use crate::node::SearchNode;
use crate::parallel::{merge_trees, run_parallel, run_worker, Limits};
use crate::selection::{select_action, Selection};
use crate::simulation::Simulator;
use crate::tree::SearchTree;
use crate::Game;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::{Duration, Instant};

/// Counters describing one finished search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStatistics {
    /// Simulations run by all workers together.
    pub simulations: u64,
    /// Plays of the root after merging.
    pub root_plays: u64,
    /// Nodes in the shared arena after merging, pruned siblings of earlier roots included.
    pub total_nodes: usize,
    /// Workers used for the search.
    pub workers: usize,
    /// Wall-clock duration of the search.
    pub elapsed: Duration,
}

/// The move picked by a search.
#[derive(Debug, Clone)]
pub struct SearchOutcome<S> {
    /// Action index played from the searched position.
    pub action: usize,
    /// Position reached by playing `action`.
    pub state: S,
    pub statistics: SearchStatistics,
}

/// Monte Carlo Tree Search engine for one game.
///
/// The engine keeps its search tree between moves. After every move actually
/// played, the driver reports the reached positions with
/// [`advance_root`](Mcts::advance_root) so the statistics gathered for that
/// line are reused by the next search.
pub struct Mcts<G: Game> {
    game: G,
    config: SearchConfig,
    cursor: Option<RootCursor<G::State>>,
    /// Worker pool for root-parallel search, built on first use.
    pool: Option<ThreadPool>,
    /// Source of per-search worker seeds.
    seeder: Xoshiro256PlusPlus,
    last_statistics: Option<SearchStatistics>,
}

impl<G: Game> Mcts<G> {
    /// Creates a new engine.
    ///
    /// # Errors
    /// [`SearchError::InvalidConfig`] if `config` does not validate.
    pub fn new(game: G, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let seeder = match config.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::seed_from_u64(rand::rng().random()),
        };
        Ok(Self {
            game,
            config,
            cursor: None,
            pool: None,
            seeder,
            last_statistics: None,
        })
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Searches `state` and returns the position reached by the chosen move.
    ///
    /// # Panics
    /// If the engine's root does not hold `state`, or if `state` has no legal action.
    pub fn find_move(&mut self, state: &G::State, budget: impl Into<SearchBudget>) -> Result<G::State, SearchError> {
        self.search(state, budget).map(|outcome| outcome.state)
    }

    /// Searches `state` within `budget` and picks the child with the best win rate.
    ///
    /// An empty budget falls back to the configured time limit.
    ///
    /// # Errors
    /// [`SearchError::ThreadPool`] if the worker threads cannot be started.
    ///
    /// # Panics
    /// If the engine's root does not hold `state`, or if `state` has no legal action.
    pub fn search(
        &mut self,
        state: &G::State,
        budget: impl Into<SearchBudget>,
    ) -> Result<SearchOutcome<G::State>, SearchError> {
        let start = Instant::now();
        let limits = self.limits(budget.into(), start);

        let workers = self.config.workers;
        if workers > 1 && self.pool.is_none() {
            self.pool = Some(ThreadPoolBuilder::new().num_threads(workers).build()?);
        }
        let seeds: Vec<u64> = (0..workers).map(|_| self.seeder.random()).collect();

        let game = &self.game;
        let cursor = self
            .cursor
            .get_or_insert_with(|| RootCursor::new(SearchTree::from_state(game, state.clone())));
        assert!(
            cursor.root_node().state() == state,
            "search requested for a position the engine is not primed for; advance or drop the root first"
        );
        assert!(
            cursor.root_node().legal_action_count() > 0 && game.winner(state, None).is_none(),
            "search requested for a finished position"
        );

        let simulator = Simulator::new(game, self.config.max_depth, self.config.exploration_rate);
        let (tree, root) = cursor.tree_and_root_mut();
        let simulations = match &self.pool {
            Some(pool) if workers > 1 => {
                let reports = run_parallel(pool, &simulator, tree.node(root), limits, &seeds);
                let simulations = reports.iter().map(|report| report.simulations).sum();
                merge_trees(tree, root, reports.into_iter().map(|report| report.tree).collect());
                simulations
            }
            _ => {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seeds[0]);
                run_worker(&simulator, tree, root, limits, &mut rng)
            }
        };

        // With a budget spent before the first simulation the root stays unexpanded;
        // play its first legal action, which is what an all-zero exploit score picks.
        let action = if tree.node(root).is_expanded() {
            select_action(tree, root, Selection::Exploit)
        } else {
            tree.node(root)
                .legal_actions()
                .iter()
                .position(|&legal| legal)
                .unwrap_or_default()
        };
        let next = game.apply_action(tree.node(root).state(), action);

        let statistics = SearchStatistics {
            simulations,
            root_plays: tree.node(root).plays(),
            total_nodes: tree.len(),
            workers,
            elapsed: start.elapsed(),
        };
        debug!(
            "search finished: action {} after {} simulations on {} worker(s), root win rate {:.3}, {} nodes in {:?}",
            action,
            statistics.simulations,
            workers,
            tree.node(root).win_rate(),
            statistics.total_nodes,
            statistics.elapsed
        );
        self.last_statistics = Some(statistics);

        Ok(SearchOutcome {
            action,
            state: next,
            statistics,
        })
    }

    /// Moves the root through each of `states` in order.
    ///
    /// If a state is not a child of the current root, or the root was never
    /// expanded, the tree is discarded and the next search starts fresh.
    pub fn advance_root<'a, I>(&mut self, states: I)
    where
        I: IntoIterator<Item = &'a G::State>,
        G::State: 'a,
    {
        for state in states {
            self.cursor = self.cursor.take().and_then(|cursor| cursor.advance(state));
        }
    }

    /// Moves the root back to the first position the tree was built from.
    pub fn rewind_root(&mut self) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.rewind();
        }
    }

    /// Discards the whole tree and its statistics.
    pub fn drop_root(&mut self) {
        if self.cursor.take().is_some() {
            debug!("search tree dropped");
        }
    }

    /// The node standing for the current position, if any.
    pub fn root(&self) -> Option<&SearchNode<G::State>> {
        self.cursor.as_ref().map(RootCursor::root_node)
    }

    /// Win rates of the root's children per action slot.
    pub fn root_child_win_rates(&self) -> Option<Vec<f64>> {
        self.cursor
            .as_ref()
            .map(|cursor| cursor.tree().child_win_rates(cursor.root()))
    }

    /// Play counts of the root's children per action slot.
    pub fn root_child_plays(&self) -> Option<Vec<u64>> {
        self.cursor
            .as_ref()
            .map(|cursor| cursor.tree().child_plays(cursor.root()))
    }

    /// Plays of the current root, `0` when there is no tree.
    pub fn root_plays(&self) -> u64 {
        self.root().map_or(0, SearchNode::plays)
    }

    /// Number of nodes in the arena, including ancestors of the current root and
    /// the subtrees of siblings left behind by [`advance_root`](Mcts::advance_root).
    /// Those stay allocated until the tree is dropped or discarded.
    pub fn tree_size(&self) -> usize {
        self.cursor.as_ref().map_or(0, |cursor| cursor.tree().len())
    }

    pub fn last_statistics(&self) -> Option<&SearchStatistics> {
        self.last_statistics.as_ref()
    }

    fn limits(&self, budget: SearchBudget, start: Instant) -> Limits {
        let budget = if budget.is_unbounded() {
            SearchBudget::time(self.config.time_limit)
        } else {
            budget
        };
        Limits {
            deadline: budget.time.map(|time| start + time),
            simulations: budget.simulations,
        }
    }
}
