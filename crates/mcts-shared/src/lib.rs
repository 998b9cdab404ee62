#![no_std]

//! Line detection for grid games (Tic-Tac-Toe, Connect 4, and other k-in-a-row variants).
//!
//! Boards are flat row-major slices of `i32` cells: `0` is empty, any other
//! value identifies the player that owns the cell.

/// The four line directions as `(dx, dy)`: horizontal, vertical and both diagonals.
/// The opposite directions are covered by walking each line both ways.
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Checks for a win anywhere on a grid-based board
///
/// # Arguments
/// * `board` - The board data as a flat slice
/// * `width` - Board width
/// * `height` - Board height
/// * `player` - The player ID to check for (e.g., 1 or -1)
/// * `line_size` - Number of consecutive pieces needed to win
pub fn check_line_win(board: &[i32], width: usize, height: usize, player: i32, line_size: usize) -> bool {
    if player == 0 || line_size == 0 {
        return false;
    }
    for y in 0..height {
        for x in 0..width {
            if cell(board, width, height, x as i32, y as i32) != player {
                continue;
            }
            // Only start counting from the first cell of each run so every line is walked once.
            for &(dx, dy) in DIRECTIONS.iter() {
                let (px, py) = (x as i32 - dx, y as i32 - dy);
                if cell(board, width, height, px, py) == player {
                    continue;
                }
                if run_length(board, width, height, x as i32, y as i32, dx, dy, player) >= line_size {
                    return true;
                }
            }
        }
    }
    false
}

/// Checks whether the piece at `(x, y)` completes a line of `line_size` for its owner
///
/// This is the cheap check used after a move: only the four lines passing
/// through the given cell are inspected. Returns `false` for an empty cell.
pub fn check_line_through(board: &[i32], width: usize, height: usize, x: usize, y: usize, line_size: usize) -> bool {
    let (x, y) = (x as i32, y as i32);
    let player = cell(board, width, height, x, y);
    if player == 0 || line_size == 0 {
        return false;
    }
    DIRECTIONS.iter().any(|&(dx, dy)| {
        let forward = run_length(board, width, height, x, y, dx, dy, player);
        let backward = run_length(board, width, height, x, y, -dx, -dy, player);
        // The starting cell is counted by both walks.
        forward + backward - 1 >= line_size
    })
}

/// Returns the cell value at `(x, y)`, or `0` outside the board.
fn cell(board: &[i32], width: usize, height: usize, x: i32, y: i32) -> i32 {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return 0;
    }
    board.get(y as usize * width + x as usize).copied().unwrap_or(0)
}

/// Counts consecutive `player` cells starting at `(x, y)` and stepping by `(dx, dy)`.
#[allow(clippy::too_many_arguments)]
fn run_length(board: &[i32], width: usize, height: usize, x: i32, y: i32, dx: i32, dy: i32, player: i32) -> usize {
    let mut count = 0;
    let (mut cx, mut cy) = (x, y);
    while cell(board, width, height, cx, cy) == player {
        count += 1;
        cx += dx;
        cy += dy;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_scan_finds_each_direction() {
        // 3x3, row-major
        let horizontal = [0, 0, 0, 1, 1, 1, 0, 0, 0];
        let vertical = [0, -1, 0, 0, -1, 0, 0, -1, 0];
        let diagonal = [1, 0, 0, 0, 1, 0, 0, 0, 1];
        let anti_diagonal = [0, 0, 1, 0, 1, 0, 1, 0, 0];

        assert!(check_line_win(&horizontal, 3, 3, 1, 3));
        assert!(check_line_win(&vertical, 3, 3, -1, 3));
        assert!(!check_line_win(&vertical, 3, 3, 1, 3));
        assert!(check_line_win(&diagonal, 3, 3, 1, 3));
        assert!(check_line_win(&anti_diagonal, 3, 3, 1, 3));
    }

    #[test]
    fn test_no_win_on_short_line() {
        let board = [1, 1, 0, 0, 0, 0, 0, 0, 0];
        assert!(!check_line_win(&board, 3, 3, 1, 3));
        assert!(!check_line_through(&board, 3, 3, 1, 0, 3));
    }

    #[test]
    fn test_line_through_middle_of_run() {
        // 7 wide, 1 tall: the last piece was dropped in the middle of the run.
        let board = [0, 1, 1, 1, 1, 0, 0];
        assert!(check_line_through(&board, 7, 1, 2, 0, 4));
        assert!(!check_line_through(&board, 7, 1, 5, 0, 4));
    }

    #[test]
    fn test_wrapping_rows_do_not_count() {
        // 3 wide: cells 2,3,4 are contiguous in memory but span two rows.
        let board = [0, 0, 1, 1, 1, 0, 0, 0, 0];
        assert!(!check_line_win(&board, 3, 3, 1, 3));
    }
}
