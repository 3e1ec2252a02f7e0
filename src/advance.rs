// Copyright (c) 2026 rezky_nightky

use crate::columns::ActiveColumns;
use crate::grid::{Cell, Grid};

/// Whether `row` sits inside the trail that starts at `fall_position`.
pub fn in_trail(row: u16, fall_position: u16, trail_length: u16) -> bool {
    row >= fall_position && row < fall_position.saturating_add(trail_length)
}

/// Next fall position of a raining column; wraps to the top once the next
/// row would be off the grid.
pub fn next_fall_position(fall_position: u16, rows: u16) -> u16 {
    let next = fall_position.saturating_add(1);
    if next >= rows {
        0
    } else {
        next
    }
}

/// Rebuilds every `active` flag from the current fall positions and column
/// membership. Fall positions are carried over untouched.
pub fn recompute_active_flags(grid: &Grid, active: &ActiveColumns, trail_length: u16) -> Grid {
    grid.map(|row, col, cell| Cell {
        active: active.contains(col) && in_trail(row, cell.fall_position, trail_length),
        fall_position: cell.fall_position,
    })
}

/// Moves the trail of every active column down one row.
pub fn advance_rows(grid: &Grid, active: &ActiveColumns) -> Grid {
    let rows = grid.rows();
    grid.map(|_, col, cell| {
        if active.contains(col) {
            Cell {
                active: cell.active,
                fall_position: next_fall_position(cell.fall_position, rows),
            }
        } else {
            *cell
        }
    })
}
