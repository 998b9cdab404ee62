//! # Game Implementations Module
//!
//! Reference games for the search engine. Each game implements the
//! [`Game`](crate::Game) trait: a fixed action layout, legal-action masks,
//! action application, and winner detection.
//!
//! ## Supported Games
//! - **Tic-Tac-Toe**: k in a row on an n×n board (3×3 with 3 in a row is the classic game)
//! - **Connect 4**: Gravity-based connection game on a 7x6 grid
//!
//! ## Adding New Games
//! To add a new game, create a new module with:
//! 1. A rules type implementing `Game`
//! 2. A state type with structural `Eq` and `Hash` (board plus player to move)
//! 3. A `Display` impl for the state

pub mod connect4;
pub mod tictactoe;

use crate::Player;

/// Board cell value for `player`'s pieces: `1` for the first player, `-1` for the second.
pub fn cell_of(player: Player) -> i32 {
    match player {
        Player::One => 1,
        Player::Two => -1,
    }
}

/// Inverse of [`cell_of`]; `None` for an empty cell.
pub fn player_at(cell: i32) -> Option<Player> {
    match cell {
        1 => Some(Player::One),
        -1 => Some(Player::Two),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_encoding_round_trips() {
        for player in [Player::One, Player::Two] {
            assert_eq!(player_at(cell_of(player)), Some(player));
        }
        assert_eq!(cell_of(Player::One), -cell_of(Player::Two));
        assert_eq!(player_at(0), None);
    }
}
