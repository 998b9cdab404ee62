//! # Root-Parallel Monte Carlo Tree Search
//!
//! A game-agnostic MCTS engine for two-player, perfect-information, zero-sum,
//! turn-based games. The engine only talks to a game through the [`Game`]
//! trait, so any board game that can report its legal actions, apply an
//! action and detect a winner can be searched.
//!
//! ## Algorithm
//! Every simulation descends the tree for at most `max_depth` steps using UCT,
//! expanding nodes on first visit, then estimates the value of the reached
//! position with a uniformly random rollout and propagates it back up the
//! parent chain with alternating perspective.
//!
//! ## Parallelism
//! With more than one worker the engine uses root parallelization: every
//! worker grows its own private tree from the current position, and once the
//! budget is spent the trees are merged into the shared tree by action index.
//! No locks are taken while simulating.
//!
//! ## Usage
//! ```
//! use mcts::games::tictactoe::TicTacToe;
//! use mcts::{Game, Mcts, SearchBudget, SearchConfig};
//!
//! let game = TicTacToe::new(3, 3);
//! let start = game.new_game();
//! let mut engine = Mcts::new(game, SearchConfig::for_testing()).unwrap();
//! let next = engine.find_move(&start, SearchBudget::simulations(200)).unwrap();
//! engine.advance_root([&next]);
//! ```

pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod games;
pub mod node;
pub mod parallel;
pub mod selection;
pub mod simulation;
pub mod tree;

pub use config::{SearchBudget, SearchConfig};
pub use cursor::RootCursor;
pub use engine::{Mcts, SearchOutcome, SearchStatistics};
pub use error::SearchError;
pub use node::{NodeId, SearchNode};
pub use tree::SearchTree;

use std::fmt::Debug;
use std::hash::Hash;

/// One of the two players of a game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Player {
    /// The player who moves first.
    One,
    /// The player who moves second.
    Two,
}

impl Player {
    /// Returns the other player.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// The result of a finished game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Outcome {
    /// The game ended without a winner.
    Draw,
    /// The given player won.
    Win(Player),
}

/// The capability set a game must provide to be searched.
///
/// Actions are plain indices in `0..action_count()`. Every state of a game
/// shares this action layout, which is what lets independently grown search
/// trees be merged slot by slot.
///
/// `Send` and `Sync` are required because worker threads share the adapter
/// and move states between threads.
pub trait Game: Send + Sync {
    /// A board position plus the player to move. Equality must be structural.
    type State: Clone + Eq + Hash + Debug + Send + Sync;

    /// Number of action slots; fixed for the whole game.
    fn action_count(&self) -> usize;

    /// Returns the initial position.
    fn new_game(&self) -> Self::State;

    /// Returns one flag per action slot, `true` where the action is playable.
    fn legal_actions(&self, state: &Self::State) -> Vec<bool>;

    /// Returns a new state with `action` applied and the turn advanced.
    /// The behavior for an illegal action is up to the implementation.
    fn apply_action(&self, state: &Self::State, action: usize) -> Self::State;

    /// Returns the outcome if the game is over, `None` while it is ongoing.
    ///
    /// `last_action` is a hint naming the action that produced `state`; an
    /// implementation may use it to only inspect lines through that action.
    /// Without it the whole board must be checked.
    fn winner(&self, state: &Self::State, last_action: Option<usize>) -> Option<Outcome>;

    /// Returns the player whose turn it is.
    fn current_player(&self, state: &Self::State) -> Player;

    /// Static prior weights per action slot. Defaults to uniform over legal actions.
    fn priors(&self, state: &Self::State) -> Vec<f64> {
        self.legal_actions(state)
            .into_iter()
            .map(|legal| if legal { 1.0 } else { 0.0 })
            .collect()
    }
}
