//! Search configuration and per-move budgets.

use crate::error::SearchError;
use std::time::Duration;

/// Configuration for the search engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Weight of the exploration term in the UCT score.
    /// Higher values spread simulations over more actions.
    pub exploration_rate: f64,

    /// Maximum number of tree steps per simulation before the rollout starts.
    pub max_depth: usize,

    /// Number of independent trees grown in parallel. `1` searches the
    /// shared tree directly on the calling thread.
    pub workers: usize,

    /// Budget used when a search is started with an empty [`SearchBudget`].
    pub time_limit: Duration,

    /// Seed for the rollout generators. `None` seeds from the thread-local generator.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration_rate: std::f64::consts::SQRT_2,
            max_depth: 100,
            workers: 1,
            time_limit: Duration::from_secs(1),
            seed: None,
        }
    }
}

impl SearchConfig {
    /// A small, seeded, single-worker configuration for tests.
    pub fn for_testing() -> Self {
        Self {
            exploration_rate: 1.0,
            max_depth: 10,
            workers: 1,
            time_limit: Duration::from_millis(50),
            seed: Some(42),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_exploration_rate(mut self, exploration_rate: f64) -> Self {
        self.exploration_rate = exploration_rate;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_depth == 0 {
            return Err(SearchError::InvalidConfig("max_depth must be at least 1".to_string()));
        }
        if self.workers == 0 {
            return Err(SearchError::InvalidConfig("workers must be at least 1".to_string()));
        }
        if !self.exploration_rate.is_finite() || self.exploration_rate < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration_rate must be a non-negative finite number, got {}",
                self.exploration_rate
            )));
        }
        Ok(())
    }
}

/// Limits for a single move search. The search stops at whichever limit is hit first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    /// Wall-clock time for the whole search.
    pub time: Option<Duration>,
    /// Simulations per worker.
    pub simulations: Option<u64>,
}

impl SearchBudget {
    /// A time-only budget.
    pub fn time(time: Duration) -> Self {
        Self { time: Some(time), simulations: None }
    }

    /// A budget of `simulations` per worker with no time limit.
    pub fn simulations(simulations: u64) -> Self {
        Self { time: None, simulations: Some(simulations) }
    }

    pub fn with_time(mut self, time: Duration) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_simulations(mut self, simulations: u64) -> Self {
        self.simulations = Some(simulations);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.time.is_none() && self.simulations.is_none()
    }
}

impl From<Duration> for SearchBudget {
    fn from(time: Duration) -> Self {
        SearchBudget::time(time)
    }
}
