//! Movement validity for grid footprints
//!
//! All checks are pure functions of the board and the enemy set passed in,
//! so repeated calls with the same arguments agree.

use super::state::{Board, Cell, Enemy, footprint_at};

/// Whether `enemy` may occupy the footprint anchored at `anchor`.
///
/// Rejects footprints that break the boundary rule, touch a rack, or touch
/// the current footprint of any other enemy in `enemies`.
pub fn is_move_valid(board: &Board, enemy: &Enemy, anchor: Cell, enemies: &[Enemy]) -> bool {
    if !within_bounds(board, anchor, enemy.footprint) {
        return false;
    }

    footprint_at(anchor, enemy.footprint).into_iter().all(|cell| {
        !board.is_rack(cell)
            && !enemies
                .iter()
                .any(|other| other.id != enemy.id && other.occupies(cell))
    })
}

/// Boundary rule: every cell on-board, or only the anchor when the board
/// allows multi-cell overhang
pub fn within_bounds(board: &Board, anchor: Cell, size: i32) -> bool {
    if board.is_wall(anchor) {
        return false;
    }
    if size > 1 && !board.allow_overhang {
        return !board.is_wall(anchor + Cell::splat(size - 1));
    }
    true
}

/// Whether the footprint is wholly on the board regardless of overhang
pub fn fully_on_board(board: &Board, anchor: Cell, size: i32) -> bool {
    !board.is_wall(anchor) && !board.is_wall(anchor + Cell::splat(size - 1))
}

/// Axis-aligned overlap of two square footprints
pub fn overlaps(a_anchor: Cell, a_size: i32, b_anchor: Cell, b_size: i32) -> bool {
    a_anchor.x < b_anchor.x + b_size
        && b_anchor.x < a_anchor.x + a_size
        && a_anchor.y < b_anchor.y + b_size
        && b_anchor.y < a_anchor.y + a_size
}
