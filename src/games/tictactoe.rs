//! # Tic-Tac-Toe (k in a row on an n×n board)
//!
//! Players alternate placing a piece on any empty cell. The first player to
//! line up `line_size` pieces horizontally, vertically or diagonally wins; a
//! full board without such a line is a draw. `TicTacToe::new(3, 3)` is the
//! classic game, larger boards give Gomoku-style variants.
//!
//! Action `i` places a piece on row `i / size`, column `i % size`.

use super::{cell_of, player_at};
use crate::{Game, Outcome, Player};
use mcts_shared::{check_line_through, check_line_win};
use std::fmt;

/// Game rules and dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    size: usize,
    line_size: usize,
}

/// A Tic-Tac-Toe position.
///
/// Cells hold `1` for player one, `-1` for player two and `0` when empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicTacToeState {
    board: Vec<i32>,
    size: usize,
    current_player: Player,
}

impl TicTacToe {
    pub fn new(size: usize, line_size: usize) -> Self {
        Self { size, line_size }
    }
}

impl TicTacToeState {
    /// The piece on `(row, col)`, if any.
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        player_at(self.board[row * self.size + col])
    }

    fn is_full(&self) -> bool {
        self.board.iter().all(|&cell| cell != 0)
    }
}

impl Game for TicTacToe {
    type State = TicTacToeState;

    fn action_count(&self) -> usize {
        self.size * self.size
    }

    fn new_game(&self) -> Self::State {
        TicTacToeState {
            board: vec![0; self.size * self.size],
            size: self.size,
            current_player: Player::One,
        }
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<bool> {
        state.board.iter().map(|&cell| cell == 0).collect()
    }

    fn apply_action(&self, state: &Self::State, action: usize) -> Self::State {
        debug_assert_eq!(state.board[action], 0, "cell {action} is already taken");
        let mut next = state.clone();
        next.board[action] = cell_of(state.current_player);
        next.current_player = state.current_player.opponent();
        next
    }

    fn winner(&self, state: &Self::State, last_action: Option<usize>) -> Option<Outcome> {
        match last_action {
            Some(action) => {
                let (row, col) = (action / self.size, action % self.size);
                if check_line_through(&state.board, self.size, self.size, col, row, self.line_size) {
                    return player_at(state.board[action]).map(Outcome::Win);
                }
            }
            None => {
                for player in [Player::One, Player::Two] {
                    if check_line_win(&state.board, self.size, self.size, cell_of(player), self.line_size) {
                        return Some(Outcome::Win(player));
                    }
                }
            }
        }

        if state.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    fn current_player(&self, state: &Self::State) -> Player {
        state.current_player
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.chunks(self.size) {
            for &cell in row {
                let symbol = match cell {
                    1 => "X",
                    -1 => "O",
                    _ => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
