// Copyright (c) 2026 rezky_nightky

use std::ops::RangeInclusive;

use log::debug;
use rand::{
    distr::{Distribution, Uniform},
    Rng,
};

use crate::grid::Grid;

/// Columns currently raining, in insertion order, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveColumns {
    cols: Vec<u16>,
}

impl ActiveColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn contains(&self, col: u16) -> bool {
        self.cols.contains(&col)
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.cols.iter().copied()
    }

    /// Returns false if the column was already present.
    pub fn insert(&mut self, col: u16) -> bool {
        if self.contains(col) {
            return false;
        }
        self.cols.push(col);
        true
    }

    fn retain<F: FnMut(u16) -> bool>(&mut self, mut keep: F) {
        self.cols.retain(|&c| keep(c));
    }
}

/// Keeps the active column set above its floor and retires columns whose
/// trail has run off the bottom of the grid.
#[derive(Clone, Debug)]
pub struct ColumnScheduler {
    cols: u16,
    trail_length: u16,
    min_active: usize,
    retirement_probability: f32,

    rand_chance: Uniform<f32>,
    rand_col: Uniform<u16>,
    rand_batch: Uniform<usize>,
}

impl ColumnScheduler {
    pub fn new(
        cols: u16,
        trail_length: u16,
        min_active: usize,
        batch: RangeInclusive<usize>,
        retirement_probability: f32,
    ) -> Self {
        Self {
            cols,
            trail_length,
            min_active,
            retirement_probability,
            rand_chance: Uniform::new(0.0, 1.0).expect("valid range"),
            rand_col: Uniform::new_inclusive(0, cols.saturating_sub(1)).expect("valid range"),
            rand_batch: Uniform::new_inclusive(*batch.start(), *batch.end()).expect("valid range"),
        }
    }

    /// True once the trail starting at `fall_position` touches the last row.
    pub fn reached_bottom(&self, fall_position: u16, rows: u16) -> bool {
        fall_position.saturating_add(self.trail_length) >= rows
    }

    /// Drops bottomed-out columns with `retirement_probability` each.
    /// Returns how many were retired.
    pub fn retire<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        active: &mut ActiveColumns,
        rng: &mut R,
    ) -> usize {
        if self.retirement_probability <= 0.0 {
            return 0;
        }

        let before = active.len();
        active.retain(|col| {
            let Some(cell) = grid.last_row_cell(col) else {
                return true;
            };
            if !self.reached_bottom(cell.fall_position, grid.rows()) {
                return true;
            }
            let retire = self.rand_chance.sample(rng) <= self.retirement_probability;
            if retire {
                debug!("column {} retired at fall position {}", col, cell.fall_position);
            }
            !retire
        });
        before - active.len()
    }

    /// Adds a random batch of fresh columns when the set is under its floor.
    /// Returns the columns added.
    pub fn top_up<R: Rng + ?Sized>(&self, active: &mut ActiveColumns, rng: &mut R) -> Vec<u16> {
        if active.len() >= self.min_active {
            return Vec::new();
        }

        let free = (self.cols as usize).saturating_sub(active.len());
        let want = self.rand_batch.sample(rng).min(free);
        let mut batch: Vec<u16> = Vec::with_capacity(want);
        while batch.len() < want {
            let col = self.rand_col.sample(rng);
            if !active.contains(col) && !batch.contains(&col) {
                batch.push(col);
            }
        }

        for &col in &batch {
            active.insert(col);
        }
        debug!(
            "topped up {} columns {:?} (now {} active)",
            batch.len(),
            batch,
            active.len()
        );
        batch
    }
}

#[cfg(test)]
impl ActiveColumns {
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }
}
