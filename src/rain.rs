// Copyright (c) 2026 rezky_nightky

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    advance::{advance_rows, recompute_active_flags},
    columns::{ActiveColumns, ColumnScheduler},
    config::RainConfig,
    grid::Grid,
    palette::{gradient, ColorCycler, Rgb},
    runtime::PaletteName,
};

/// Faint value shown for cells farther than a trail length from its head.
pub const FAR_OPACITY: f32 = 0.1;

/// Fade of a cell relative to the trail head. Zero at the head, rising by
/// `1 / trail_length` per row of distance, then [`FAR_OPACITY`] once the
/// distance reaches the trail length.
pub fn opacity(row: u16, fall_position: u16, trail_length: u16) -> f32 {
    let d = row.abs_diff(fall_position);
    if d < trail_length {
        let n = trail_length as f32;
        1.0 - (n - d as f32) / n
    } else {
        FAR_OPACITY
    }
}

/// Everything the painter needs for one grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCell {
    pub column_active: bool,
    pub cell_active: bool,
    pub opacity: f32,
    pub gradient_start: Rgb,
    pub gradient_end: Rgb,
}

impl RenderCell {
    /// Effective alpha: transparent unless the column rains and the cell is lit.
    pub fn alpha(&self) -> f32 {
        if self.column_active && self.cell_active {
            self.opacity
        } else {
            0.0
        }
    }
}

/// Owning context of the animation: grid, raining columns, current palette
/// and the random source, updated only through [`Rainfall::tick`],
/// [`Rainfall::top_up`] and [`Rainfall::cycle_palette`].
pub struct Rainfall {
    config: RainConfig,
    grid: Grid,
    active: ActiveColumns,
    palette: PaletteName,

    scheduler: ColumnScheduler,
    cycler: ColorCycler,
    mt: StdRng,

    ticks: u64,
    paint_requested: bool,
}

impl Rainfall {
    pub fn new(config: RainConfig, mt: StdRng) -> Result<Self, String> {
        config.validate()?;
        let scheduler = ColumnScheduler::new(
            config.cols,
            config.trail_length,
            config.min_active_columns,
            config.top_up_batch.clone(),
            config.retirement_probability,
        );
        let cycler = ColorCycler::new(&config.palettes)?;
        Ok(Self {
            grid: Grid::new(config.rows, config.cols),
            active: ActiveColumns::new(),
            palette: config.initial_palette,
            scheduler,
            cycler,
            mt,
            ticks: 0,
            paint_requested: true,
            config,
        })
    }

    pub fn with_seed(config: RainConfig, seed: u64) -> Result<Self, String> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active_columns(&self) -> &ActiveColumns {
        &self.active
    }

    pub fn palette(&self) -> PaletteName {
        self.palette
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Scheduling pass outside a tick, run once at mount.
    pub fn top_up(&mut self) {
        let added = self.scheduler.top_up(&mut self.active, &mut self.mt);
        if !added.is_empty() {
            self.paint_requested = true;
        }
    }

    /// One fast-timer step.
    ///
    /// Flags are rebuilt against the membership the tick started with, then
    /// columns are retired and topped up, then every column in the updated
    /// set moves down a row.
    pub fn tick(&mut self) {
        let flagged = recompute_active_flags(&self.grid, &self.active, self.config.trail_length);
        self.grid = flagged;

        let retired = self.scheduler.retire(&self.grid, &mut self.active, &mut self.mt);
        let added = self.scheduler.top_up(&mut self.active, &mut self.mt);
        if retired > 0 || !added.is_empty() {
            debug!(
                "tick {}: retired {}, added {}, {} active",
                self.ticks,
                retired,
                added.len(),
                self.active.len()
            );
        }

        self.grid = advance_rows(&self.grid, &self.active);
        self.ticks += 1;
        self.paint_requested = true;
    }

    pub fn cycle_palette(&mut self) {
        let next = self.cycler.next(self.palette, &mut self.mt);
        info!("palette {} -> {}", self.palette, next);
        self.palette = next;
        self.paint_requested = true;
    }

    /// Clears and returns the pending paint request, so any number of
    /// mutations between two paints costs a single paint.
    pub fn take_paint_request(&mut self) -> bool {
        std::mem::take(&mut self.paint_requested)
    }

    pub fn request_paint(&mut self) {
        self.paint_requested = true;
    }

    pub fn render_cell(&self, row: u16, col: u16) -> Option<RenderCell> {
        let cell = self.grid.get(row, col)?;
        let g = gradient(self.palette);
        Some(RenderCell {
            column_active: self.active.contains(col),
            cell_active: cell.active,
            opacity: opacity(row, cell.fall_position, self.config.trail_length),
            gradient_start: g.start,
            gradient_end: g.end,
        })
    }
}

#[cfg(test)]
impl Rainfall {
    pub fn fall_position(&self, col: u16) -> Option<u16> {
        self.grid.last_row_cell(col).map(|c| c.fall_position)
    }
}
