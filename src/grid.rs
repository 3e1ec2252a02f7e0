// Copyright (c) 2026 rezky_nightky

/// Per-cell animation state.
///
/// `fall_position` is the row where the trail of this cell's column begins.
/// Every cell in one column carries the same value. `active` is a display
/// flag rebuilt on each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub active: bool,
    pub fall_position: u16,
}

/// Fixed-size row-major matrix of [`Cell`].
///
/// Never mutated in place: updates go through [`Grid::map`], which returns a
/// fresh grid that the owner swaps in whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: u16,
    cols: u16,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows as usize * cols as usize],
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    pub fn get(&self, row: u16, col: u16) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// The cell a column is judged by when deciding retirement.
    pub fn last_row_cell(&self, col: u16) -> Option<&Cell> {
        self.get(self.rows.checked_sub(1)?, col)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> + '_ {
        let cols = self.cols as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| ((i / cols) as u16, (i % cols) as u16, c))
    }

    pub fn map<F>(&self, mut f: F) -> Grid
    where
        F: FnMut(u16, u16, &Cell) -> Cell,
    {
        let cells = self.iter().map(|(row, col, c)| f(row, col, c)).collect();
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_inactive_at_row_zero() {
        let g = Grid::new(15, 20);
        assert_eq!(g.iter().count(), 300);
        assert!(g
            .iter()
            .all(|(_, _, c)| !c.active && c.fall_position == 0));
    }

    #[test]
    fn get_is_bounds_checked() {
        let g = Grid::new(3, 4);
        assert!(g.get(2, 3).is_some());
        assert!(g.get(3, 0).is_none());
        assert!(g.get(0, 4).is_none());
        assert!(Grid::new(0, 4).last_row_cell(0).is_none());
    }

    #[test]
    fn iter_is_row_major() {
        let g = Grid::new(2, 3);
        let coords: Vec<(u16, u16)> = g.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn map_derives_a_copy_and_leaves_source_alone() {
        let g = Grid::new(3, 3);
        let next = g.map(|row, col, c| Cell {
            active: row == col,
            fall_position: c.fall_position + row,
        });
        assert!(g.iter().all(|(_, _, c)| *c == Cell::default()));
        assert!(next.get(1, 1).unwrap().active);
        assert!(!next.get(1, 2).unwrap().active);
        assert_eq!(next.get(2, 0).unwrap().fall_position, 2);
        assert_eq!(next.last_row_cell(0).unwrap().fall_position, 2);
    }
}
