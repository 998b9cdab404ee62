//! # Connect 4 Game Implementation
//!
//! This module implements the classic Connect 4 board game.
//! Players take turns dropping pieces into columns, trying to get 4 pieces
//! in a row (horizontally, vertically, or diagonally).
//!
//! ## Rules
//! - Players alternate dropping pieces into columns
//! - Pieces fall to the lowest available spot in the column due to gravity
//! - First player to get 4 pieces in a row wins
//! - Game is a draw if the board fills up with no winner
//!
//! Action `c` drops a piece into column `c`.

use super::{cell_of, player_at};
use crate::{Game, Outcome, Player};
use mcts_shared::{check_line_through, check_line_win};
use std::fmt;

/// Board dimensions and winning line length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connect4 {
    width: usize,
    height: usize,
    line_size: usize,
}

/// A Connect 4 position
///
/// The board is a flat row-major vector with row 0 at the top. It uses 1 for
/// player 1 pieces, -1 for player 2 pieces, and 0 for empty spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connect4State {
    board: Vec<i32>,
    width: usize,
    current_player: Player,
}

impl Default for Connect4 {
    /// The standard 7 wide, 6 tall board with 4 in a row.
    fn default() -> Self {
        Self::new(7, 6, 4)
    }
}

impl Connect4 {
    /// Creates a new Connect 4 game with the specified configuration
    pub fn new(width: usize, height: usize, line_size: usize) -> Self {
        Self {
            width,
            height,
            line_size,
        }
    }

    /// Gets the number of pieces needed in a row to win
    pub fn line_size(&self) -> usize {
        self.line_size
    }

    /// Row of the topmost piece in `column`, if the column holds any.
    fn top_row(&self, state: &Connect4State, column: usize) -> Option<usize> {
        (0..self.height).find(|&row| state.board[row * self.width + column] != 0)
    }
}

impl Connect4State {
    /// The piece at `(row, col)`, row 0 being the top.
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        player_at(self.board[row * self.width + col])
    }
}

impl Game for Connect4 {
    type State = Connect4State;

    fn action_count(&self) -> usize {
        self.width
    }

    fn new_game(&self) -> Self::State {
        Connect4State {
            board: vec![0; self.width * self.height],
            width: self.width,
            current_player: Player::One,
        }
    }

    /// A column is playable while its top cell is empty.
    fn legal_actions(&self, state: &Self::State) -> Vec<bool> {
        state.board[..self.width].iter().map(|&cell| cell == 0).collect()
    }

    fn apply_action(&self, state: &Self::State, action: usize) -> Self::State {
        let mut next = state.clone();
        if let Some(row) = (0..self.height).rev().find(|&row| next.board[row * self.width + action] == 0) {
            next.board[row * self.width + action] = cell_of(state.current_player);
        }
        next.current_player = state.current_player.opponent();
        next
    }

    fn winner(&self, state: &Self::State, last_action: Option<usize>) -> Option<Outcome> {
        match last_action {
            Some(column) => {
                if let Some(row) = self.top_row(state, column) {
                    if check_line_through(&state.board, self.width, self.height, column, row, self.line_size) {
                        return state.cell(row, column).map(Outcome::Win);
                    }
                }
            }
            None => {
                for player in [Player::One, Player::Two] {
                    if check_line_win(&state.board, self.width, self.height, cell_of(player), self.line_size) {
                        return Some(Outcome::Win(player));
                    }
                }
            }
        }

        if state.board[..self.width].iter().all(|&cell| cell != 0) {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    fn current_player(&self, state: &Self::State) -> Player {
        state.current_player
    }
}

impl fmt::Display for Connect4State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.chunks(self.width) {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &Connect4, columns: &[usize]) -> Connect4State {
        columns
            .iter()
            .fold(game.new_game(), |state, &column| game.apply_action(&state, column))
    }

    #[test]
    fn test_new_game() {
        let game = Connect4::default();
        let state = game.new_game();
        assert_eq!(game.action_count(), 7);
        assert_eq!(game.current_player(&state), Player::One);
        assert_eq!(game.legal_actions(&state), vec![true; 7]);
        assert_eq!(game.line_size(), 4);
    }

    #[test]
    fn test_make_move() {
        let game = Connect4::default();
        let state = play(&game, &[3]);
        assert_eq!(state.cell(5, 3), Some(Player::One));
        assert_eq!(game.current_player(&state), Player::Two);

        let state = game.apply_action(&state, 3);
        assert_eq!(state.cell(4, 3), Some(Player::Two));
        assert_eq!(game.current_player(&state), Player::One);
    }

    #[test]
    fn test_full_column_is_illegal() {
        let game = Connect4::default();
        let state = play(&game, &[0, 0, 0, 0, 0, 0]);
        let legal = game.legal_actions(&state);
        assert!(!legal[0]);
        assert!(legal[1..].iter().all(|&l| l));
    }

    #[test]
    fn test_win_condition_horizontal() {
        let game = Connect4::default();
        // Player 1: 0, 1, 2, 3
        // Player 2: 0, 1, 2
        let state = play(&game, &[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(game.winner(&state, Some(3)), Some(Outcome::Win(Player::One)));
        assert_eq!(game.winner(&state, None), Some(Outcome::Win(Player::One)));
    }

    #[test]
    fn test_win_condition_vertical() {
        let game = Connect4::default();
        // Player 1: 0, 0, 0, 0
        // Player 2: 1, 1, 1
        let state = play(&game, &[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(game.winner(&state, Some(0)), Some(Outcome::Win(Player::One)));
        // The hint only inspects the given column's top piece.
        assert_eq!(game.winner(&state, Some(1)), None);
    }

    #[test]
    fn test_win_condition_diagonal() {
        let game = Connect4::default();
        // Player 1 builds / from the bottom-left corner.
        let state = play(&game, &[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);
        assert_eq!(game.winner(&state, Some(3)), Some(Outcome::Win(Player::One)));
        assert_eq!(game.winner(&state, None), Some(Outcome::Win(Player::One)));
    }

    #[test]
    fn test_draw_on_full_board() {
        // 2x2 with 3 in a row can never be won.
        let game = Connect4::new(2, 2, 3);
        let state = play(&game, &[0, 1, 0, 1]);
        assert_eq!(game.winner(&state, None), Some(Outcome::Draw));
        assert_eq!(game.winner(&state, Some(1)), Some(Outcome::Draw));
    }
}
