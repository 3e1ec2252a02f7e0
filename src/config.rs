// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::palette::gradient;
use crate::runtime::PaletteName;

pub const ROWS: u16 = 15;
pub const COLS: u16 = 20;
pub const TRAIL_LENGTH: u16 = 6;
pub const MIN_ACTIVE_COLUMNS: usize = 4;
pub const TOP_UP_BATCH: RangeInclusive<usize> = 4..=6;
pub const TICK_PERIOD: Duration = Duration::from_millis(100);
pub const COLOR_CHANGE_PERIOD: Duration = Duration::from_millis(5000);
pub const RETIREMENT_PROBABILITY: f32 = 0.3;

/// Animation parameters. `Default` yields the fixed values above; tests build
/// variants (e.g. retirement disabled) directly.
#[derive(Clone, Debug, PartialEq)]
pub struct RainConfig {
    pub rows: u16,
    pub cols: u16,
    pub trail_length: u16,
    pub min_active_columns: usize,
    pub top_up_batch: RangeInclusive<usize>,
    pub tick_period: Duration,
    pub color_change_period: Duration,
    pub retirement_probability: f32,
    pub palettes: Vec<PaletteName>,
    pub initial_palette: PaletteName,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            rows: ROWS,
            cols: COLS,
            trail_length: TRAIL_LENGTH,
            min_active_columns: MIN_ACTIVE_COLUMNS,
            top_up_batch: TOP_UP_BATCH,
            tick_period: TICK_PERIOD,
            color_change_period: COLOR_CHANGE_PERIOD,
            retirement_probability: RETIREMENT_PROBABILITY,
            palettes: PaletteName::ALL.to_vec(),
            initial_palette: PaletteName::default(),
        }
    }
}

impl RainConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.rows == 0 || self.cols == 0 {
            return Err(format!("grid must be non-empty (got {}x{})", self.rows, self.cols));
        }
        if self.trail_length == 0 {
            return Err("trail length must be >0".to_string());
        }
        if self.min_active_columns > self.cols as usize {
            return Err(format!(
                "min active columns {} exceeds column count {}",
                self.min_active_columns, self.cols
            ));
        }
        if self.top_up_batch.is_empty() || *self.top_up_batch.start() == 0 {
            return Err("top-up batch range must be >0 and low <= high".to_string());
        }
        if self.tick_period.is_zero() || self.color_change_period.is_zero() {
            return Err("timer periods must be >0".to_string());
        }
        if !(0.0..=1.0).contains(&self.retirement_probability) {
            return Err(format!(
                "retirement probability {} (min 0 max 1)",
                self.retirement_probability
            ));
        }
        for (i, p) in self.palettes.iter().enumerate() {
            if self.palettes[..i].contains(p) {
                return Err(format!("palette {} is listed more than once", p));
            }
        }
        if self.palettes.len() < 2 {
            return Err("at least 2 palettes are required".to_string());
        }
        if !self.palettes.contains(&self.initial_palette) {
            return Err(format!(
                "initial palette {} is not in the palette table",
                self.initial_palette
            ));
        }
        Ok(())
    }
}

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rainfall-grid", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'p',
        long = "palette",
        default_value = "blue",
        help_heading = "APPEARANCE",
        help = "Initial palette (see --list-palettes)"
    )]
    pub palette: String,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit if TERM says 256color, else 16-color"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random generator for a reproducible run"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        help_heading = "GENERAL",
        help = "Write logs to PATH (level from RUST_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "list-palettes",
        help_heading = "HELP",
        help = "List available palettes and exit"
    )]
    pub list_palettes: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

pub fn print_list_palettes() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE PALETTES:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --palette.\x1b[0m");
    } else {
        println!("AVAILABLE PALETTES:");
        println!("NOTE: Use only the VALUE (left side) with --palette.");
    }
    println!();
    println!("VALUE        GRADIENT");
    for p in PaletteName::ALL {
        let g = gradient(p);
        println!("{:<12} {} -> {}", p.as_str(), hex(g.start), hex(g.end));
    }
}
