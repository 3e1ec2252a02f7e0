// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;
use rand::distr::{Distribution, Uniform};
use rand::Rng;

use crate::runtime::{ColorMode, PaletteName};

pub type Rgb = (u8, u8, u8);

/// Vertical gradient painted over a falling cell: top color, bottom color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gradient {
    pub start: Rgb,
    pub end: Rgb,
}

pub fn gradient(name: PaletteName) -> Gradient {
    let (start, end) = match name {
        PaletteName::Blue => ((0x00, 0xBF, 0xFF), (0x00, 0x00, 0xFF)),
        PaletteName::Green => ((0x90, 0xEE, 0x90), (0x00, 0x64, 0x00)),
        PaletteName::Yellow => ((0xFF, 0xFF, 0x00), (0xFF, 0xA5, 0x00)),
        PaletteName::Orange => ((0xFF, 0xA5, 0x00), (0xFF, 0x45, 0x00)),
        PaletteName::Pink => ((0xFF, 0x69, 0xB4), (0xFF, 0x14, 0x93)),
        PaletteName::Purple => ((0x93, 0x70, 0xDB), (0x4B, 0x00, 0x82)),
        PaletteName::Cyan => ((0x00, 0xFF, 0xFF), (0x00, 0x8B, 0x8B)),
        PaletteName::Red => ((0xFF, 0x63, 0x47), (0x8B, 0x00, 0x00)),
    };
    Gradient { start, end }
}

pub fn parse_palette_name(s: &str) -> Result<PaletteName, String> {
    let s = s.trim().to_ascii_lowercase();
    PaletteName::ALL
        .iter()
        .copied()
        .find(|p| p.as_str() == s)
        .ok_or_else(|| format!("invalid palette: {} (see --list-palettes)", s))
}

/// Rotates the current palette on the slow timer.
///
/// Every pick is uniform over the whole table, redrawn until it lands on a
/// palette other than the current one, so two consecutive picks never match.
#[derive(Clone, Debug)]
pub struct ColorCycler {
    palettes: Vec<PaletteName>,
    rand_idx: Uniform<usize>,
}

impl ColorCycler {
    /// Duplicates are dropped; at least 2 distinct palettes must remain.
    pub fn new(palettes: &[PaletteName]) -> Result<Self, String> {
        let mut distinct: Vec<PaletteName> = Vec::with_capacity(palettes.len());
        for &p in palettes {
            if !distinct.contains(&p) {
                distinct.push(p);
            }
        }
        if distinct.len() < 2 {
            return Err(format!(
                "color cycling needs at least 2 distinct palettes (got {})",
                distinct.len()
            ));
        }
        let rand_idx = Uniform::new(0, distinct.len()).map_err(|e| e.to_string())?;
        Ok(Self {
            palettes: distinct,
            rand_idx,
        })
    }

    pub fn next<R: Rng + ?Sized>(&self, current: PaletteName, rng: &mut R) -> PaletteName {
        loop {
            let pick = self.palettes[self.rand_idx.sample(rng)];
            if pick != current {
                return pick;
            }
        }
    }
}

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let dr = (a.0 as i32) - (b.0 as i32);
    let dg = (a.1 as i32) - (b.1 as i32);
    let db = (a.2 as i32) - (b.2 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256((r, g, b): Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cube = (
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = if avg < 8 {
        (16, (0, 0, 0))
    } else if avg > 238 {
        (231, (255, 255, 255))
    } else {
        let idx = 232 + ((avg - 8) / 10);
        let v = 8 + 10 * (idx - 232);
        (idx, (v, v, v))
    };

    if dist2((r, g, b), gray) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(rgb: Rgb) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, c)| dist2(rgb, *c))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

/// Maps an RGB value onto whatever the terminal can show. Mono has no colors.
pub fn to_color(mode: ColorMode, rgb: Rgb) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb {
            r: rgb.0,
            g: rgb.1,
            b: rgb.2,
        }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(rgb))),
        ColorMode::Color16 => Some(rgb_to_color16(rgb)),
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

/// Composites `fg` over `bg` with the given alpha.
pub fn blend(fg: Rgb, bg: Rgb, alpha: f32) -> Rgb {
    let t = alpha.clamp(0.0, 1.0);
    (
        lerp_u8(bg.0, fg.0, t),
        lerp_u8(bg.1, fg.1, t),
        lerp_u8(bg.2, fg.2, t),
    )
}
