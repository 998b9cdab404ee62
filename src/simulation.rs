//! Depth-limited simulation with random rollouts.
//!
//! A simulation walks down from the root with UCT for at most `max_depth`
//! steps, expanding nodes on first visit. From wherever it stops it plays
//! uniformly random moves until the game ends and backpropagates the result.

use crate::node::NodeId;
use crate::selection::{select_action, Selection};
use crate::tree::SearchTree;
use crate::{Game, Outcome, Player};
use rand::Rng;

/// Runs simulations against a tree for one game.
///
/// Holds only shared references and plain settings, so one simulator can be
/// used by every worker thread at once.
#[derive(Debug)]
pub struct Simulator<'a, G: Game> {
    game: &'a G,
    max_depth: usize,
    exploration_rate: f64,
}

impl<'a, G: Game> Simulator<'a, G> {
    pub fn new(game: &'a G, max_depth: usize, exploration_rate: f64) -> Self {
        Self {
            game,
            max_depth,
            exploration_rate,
        }
    }

    /// Runs one simulation starting at `root` and tallies its value.
    ///
    /// # Panics
    /// If no descent step can be taken from `root`, i.e. the root is terminal
    /// or has no legal action. Callers must not search finished games.
    pub fn simulate<R: Rng + ?Sized>(&self, tree: &mut SearchTree<G::State>, root: NodeId, rng: &mut R) {
        let selection = Selection::Explore {
            exploration_rate: self.exploration_rate,
        };
        let mut node = root;
        let mut last_action = None;
        let mut mover = self.game.current_player(tree.node(root).state());
        let mut steps = 0;

        for _ in 0..self.max_depth {
            if !tree.node(node).is_expanded() {
                if self.game.winner(tree.node(node).state(), last_action).is_some() {
                    break;
                }
                tree.expand(self.game, node);
            }
            if tree.node(node).legal_action_count() == 0 {
                break;
            }

            mover = self.game.current_player(tree.node(node).state());
            let action = select_action(tree, node, selection);
            node = tree
                .node(node)
                .child(action)
                .expect("selection only returns legal actions of an expanded node");
            last_action = Some(action);
            steps += 1;
        }

        assert!(steps > 0, "simulation started from a position without legal actions");

        let value = self.sample_value(tree.node(node).state(), last_action, mover, rng);
        tree.backpropagate(node, value);
    }

    /// Estimates the value of `state` for `player` with one random rollout.
    ///
    /// Returns `1` if `player` wins the rollout, `0` if the opponent wins and
    /// `0.5` for a draw. `last_action` is passed on as the winner-check hint
    /// for the starting position.
    ///
    /// # Panics
    /// If the game reports neither an outcome nor a legal action for some
    /// position, which breaks the [`Game`] contract.
    pub fn sample_value<R: Rng + ?Sized>(
        &self,
        state: &G::State,
        last_action: Option<usize>,
        player: Player,
        rng: &mut R,
    ) -> f64 {
        let outcome = match self.game.winner(state, last_action) {
            Some(outcome) => outcome,
            None => self.rollout(state.clone(), rng),
        };
        match outcome {
            Outcome::Draw => 0.5,
            Outcome::Win(winner) if winner == player => 1.0,
            Outcome::Win(_) => 0.0,
        }
    }

    fn rollout<R: Rng + ?Sized>(&self, mut state: G::State, rng: &mut R) -> Outcome {
        let mut actions = Vec::with_capacity(self.game.action_count());
        loop {
            actions.clear();
            actions.extend(
                self.game
                    .legal_actions(&state)
                    .into_iter()
                    .enumerate()
                    .filter_map(|(action, legal)| legal.then_some(action)),
            );
            assert!(!actions.is_empty(), "game reported no outcome for a position without legal actions");

            let action = actions[rng.random_range(0..actions.len())];
            state = self.game.apply_action(&state, action);
            if let Some(outcome) = self.game.winner(&state, Some(action)) {
                return outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::TicTacToe;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn play(game: &TicTacToe, actions: &[usize]) -> <TicTacToe as Game>::State {
        actions
            .iter()
            .fold(game.new_game(), |state, &action| game.apply_action(&state, action))
    }

    #[test]
    fn test_every_simulation_tallies_the_root_once() {
        let game = TicTacToe::new(3, 3);
        let simulator = Simulator::new(&game, 10, 1.0);
        let mut tree = SearchTree::from_state(&game, game.new_game());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);

        for _ in 0..300 {
            simulator.simulate(&mut tree, NodeId::ROOT, &mut rng);
        }

        let root = tree.node(NodeId::ROOT);
        assert_eq!(root.plays(), 300);
        let child_total: u64 = tree.child_plays(NodeId::ROOT).iter().sum();
        assert!(root.plays() >= child_total);
        for id in (0..tree.len() as u32).map(NodeId) {
            let node = tree.node(id);
            if node.plays() > 0 {
                assert!((0.0..=1.0).contains(&node.win_rate()));
            }
        }
    }

    #[test]
    fn test_depth_limit_bounds_tree_growth() {
        let game = TicTacToe::new(3, 3);
        let simulator = Simulator::new(&game, 1, 1.0);
        let mut tree = SearchTree::from_state(&game, game.new_game());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);

        for _ in 0..50 {
            simulator.simulate(&mut tree, NodeId::ROOT, &mut rng);
        }

        // Only the root is ever expanded with a single descent step.
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.node(NodeId::ROOT).plays(), 50);
    }

    #[test]
    fn test_sample_value_of_finished_game() {
        let game = TicTacToe::new(3, 3);
        // X: 0, 1, 2 (top row); O: 3, 4
        let state = play(&game, &[0, 3, 1, 4, 2]);
        let simulator = Simulator::new(&game, 10, 1.0);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        assert_eq!(simulator.sample_value(&state, Some(2), Player::One, &mut rng), 1.0);
        assert_eq!(simulator.sample_value(&state, None, Player::Two, &mut rng), 0.0);
    }

    #[test]
    fn test_sample_value_of_draw_is_half() {
        let game = TicTacToe::new(3, 3);
        // X O X / X O O / O X X
        let state = play(&game, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        let simulator = Simulator::new(&game, 10, 1.0);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        assert_eq!(simulator.sample_value(&state, None, Player::One, &mut rng), 0.5);
    }

    #[test]
    #[should_panic(expected = "without legal actions")]
    fn test_simulating_a_finished_game_panics() {
        let game = TicTacToe::new(3, 3);
        let state = play(&game, &[0, 3, 1, 4, 2]);
        let simulator = Simulator::new(&game, 10, 1.0);
        let mut tree = SearchTree::from_state(&game, state);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        simulator.simulate(&mut tree, NodeId::ROOT, &mut rng);
    }
}
