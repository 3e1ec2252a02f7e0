// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::{
    frame::Frame,
    glyph::Glyph,
    palette::{blend, to_color, Rgb},
    rain::{Rainfall, RenderCell},
    runtime::ColorMode,
};

pub const TITLE: &str = "Rainfall Grid";
pub const FOOTER: &str = "Enjoy the dynamic rainfall pattern!";

const PAGE_BG: Rgb = (0x11, 0x18, 0x27);
const TABLE_BG: Rgb = (0x00, 0x00, 0x00);
const BORDER_FG: Rgb = (0x80, 0x80, 0x80);
const TITLE_FG: Rgb = (0xFF, 0xFF, 0xFF);
const FOOTER_FG: Rgb = (0x9C, 0xA3, 0xAF);

/// Terminal columns per grid cell; two make a roughly square cell.
pub const CELL_WIDTH: u16 = 2;

/// Upper half block: foreground paints the top half, background the bottom.
const HALF_BLOCK: char = '\u{2580}';
const SHADES: [char; 5] = [' ', '\u{2591}', '\u{2592}', '\u{2593}', '\u{2588}'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub title_y: u16,
    pub box_x: u16,
    pub box_y: u16,
    pub box_w: u16,
    pub box_h: u16,
    pub footer_y: u16,
}

impl Layout {
    /// Centers title, bordered grid and footer on a `width x height` screen.
    pub fn new(width: u16, height: u16, rows: u16, cols: u16) -> Self {
        let box_w = cols.saturating_mul(CELL_WIDTH).saturating_add(2);
        let box_h = rows.saturating_add(2);
        let block_h = box_h.saturating_add(4);
        let title_y = height.saturating_sub(block_h) / 2;
        let box_y = title_y + 2;
        Self {
            title_y,
            box_x: width.saturating_sub(box_w) / 2,
            box_y,
            box_w,
            box_h,
            footer_y: box_y.saturating_add(box_h).saturating_add(1),
        }
    }

    /// Screen position of the left half of grid cell (`row`, `col`).
    pub fn cell_origin(&self, row: u16, col: u16) -> (u16, u16) {
        (
            self.box_x
                .saturating_add(1)
                .saturating_add(col.saturating_mul(CELL_WIDTH)),
            self.box_y.saturating_add(1).saturating_add(row),
        )
    }
}

/// Draws the rainfall into a frame for one color mode.
#[derive(Clone, Copy, Debug)]
pub struct Painter {
    mode: ColorMode,
}

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        Self { mode }
    }

    pub fn page_bg(&self) -> Option<Color> {
        to_color(self.mode, PAGE_BG)
    }

    pub fn cell_glyph(&self, rc: &RenderCell) -> Glyph {
        let alpha = rc.alpha();
        if self.mode == ColorMode::Mono {
            let step = (alpha * (SHADES.len() - 1) as f32).ceil() as usize;
            return Glyph {
                ch: SHADES[step.min(SHADES.len() - 1)],
                fg: None,
                bg: None,
                bold: false,
            };
        }

        let top = blend(rc.gradient_start, TABLE_BG, alpha);
        let bottom = blend(rc.gradient_end, TABLE_BG, alpha);
        Glyph {
            ch: HALF_BLOCK,
            fg: to_color(self.mode, top),
            bg: to_color(self.mode, bottom),
            bold: false,
        }
    }

    fn centered(frame: &mut Frame, y: u16, text: &str, fg: Option<Color>, bold: bool) {
        let w = text.chars().count() as u16;
        let x = frame.width.saturating_sub(w) / 2;
        frame.put_str(x, y, text, fg, bold);
    }

    fn draw_border(&self, frame: &mut Frame, l: &Layout) {
        let fg = to_color(self.mode, BORDER_FG);
        let bg = self.page_bg();
        let right = l.box_x.saturating_add(l.box_w.saturating_sub(1));
        let bottom = l.box_y.saturating_add(l.box_h.saturating_sub(1));
        let edge = |ch| Glyph {
            ch,
            fg,
            bg,
            bold: false,
        };

        for x in l.box_x + 1..right {
            frame.set(x, l.box_y, edge('\u{2500}'));
            frame.set(x, bottom, edge('\u{2500}'));
        }
        for y in l.box_y + 1..bottom {
            frame.set(l.box_x, y, edge('\u{2502}'));
            frame.set(right, y, edge('\u{2502}'));
        }
        frame.set(l.box_x, l.box_y, edge('\u{250C}'));
        frame.set(right, l.box_y, edge('\u{2510}'));
        frame.set(l.box_x, bottom, edge('\u{2514}'));
        frame.set(right, bottom, edge('\u{2518}'));
    }

    /// Paints title, border, every grid cell and footer. Glyphs that did not
    /// change since the previous paint leave the frame clean.
    pub fn paint(&self, rain: &Rainfall, frame: &mut Frame) {
        let grid = rain.grid();
        let l = Layout::new(frame.width, frame.height, grid.rows(), grid.cols());

        Self::centered(frame, l.title_y, TITLE, to_color(self.mode, TITLE_FG), true);
        self.draw_border(frame, &l);

        for (row, col, _) in grid.iter() {
            let Some(rc) = rain.render_cell(row, col) else {
                continue;
            };
            let glyph = self.cell_glyph(&rc);
            let (x, y) = l.cell_origin(row, col);
            for dx in 0..CELL_WIDTH {
                frame.set(x.saturating_add(dx), y, glyph);
            }
        }

        Self::centered(frame, l.footer_y, FOOTER, to_color(self.mode, FOOTER_FG), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RainConfig;
    use crate::palette::gradient;
    use crate::runtime::PaletteName;

    fn rain() -> Rainfall {
        let cfg = RainConfig {
            retirement_probability: 0.0,
            ..RainConfig::default()
        };
        let mut rain = Rainfall::with_seed(cfg, 77).unwrap();
        rain.top_up();
        rain.tick();
        rain.tick();
        rain
    }

    fn row_text(frame: &Frame, y: u16) -> String {
        (0..frame.width)
            .map(|x| frame.get(x, y).unwrap().ch)
            .collect()
    }

    #[test]
    fn layout_centers_block() {
        let l = Layout::new(80, 24, 15, 20);
        assert_eq!((l.box_w, l.box_h), (42, 17));
        assert_eq!(l.box_x, 19);
        assert_eq!(l.title_y, 1);
        assert_eq!(l.box_y, 3);
        assert_eq!(l.footer_y, 21);
        assert_eq!(l.cell_origin(0, 0), (20, 4));
        assert_eq!(l.cell_origin(14, 19), (58, 18));
    }

    #[test]
    fn paint_draws_title_border_and_footer() {
        let painter = Painter::new(ColorMode::TrueColor);
        let mut frame = Frame::new(80, 24, painter.page_bg());
        painter.paint(&rain(), &mut frame);

        let l = Layout::new(80, 24, 15, 20);
        assert_eq!(row_text(&frame, l.title_y).trim(), TITLE);
        assert_eq!(row_text(&frame, l.footer_y).trim(), FOOTER);
        assert_eq!(frame.get(l.box_x, l.box_y).unwrap().ch, '\u{250C}');
        assert_eq!(frame.get(l.box_x + 41, l.box_y + 16).unwrap().ch, '\u{2518}');
    }

    #[test]
    fn idle_columns_paint_black_and_lit_cells_blend() {
        let rain = rain();
        let painter = Painter::new(ColorMode::TrueColor);
        let mut frame = Frame::new(80, 24, painter.page_bg());
        painter.paint(&rain, &mut frame);
        let l = Layout::new(80, 24, 15, 20);
        let black = Some(Color::Rgb { r: 0, g: 0, b: 0 });

        let idle = (0..20).find(|&c| !rain.active_columns().contains(c)).unwrap();
        let (x, y) = l.cell_origin(3, idle);
        let g = frame.get(x, y).unwrap();
        assert_eq!((g.fg, g.bg), (black, black));

        let col = rain.active_columns().iter().next().unwrap();
        let (x, y) = l.cell_origin(6, col);
        let rc = rain.render_cell(6, col).unwrap();
        let want = gradient(PaletteName::Blue);
        let top = blend(want.start, (0, 0, 0), rc.alpha());
        let g = frame.get(x, y).unwrap();
        assert_eq!(g.ch, HALF_BLOCK);
        assert_eq!(g.fg, Some(Color::Rgb { r: top.0, g: top.1, b: top.2 }));
        assert_eq!(frame.get(x + 1, y).unwrap(), g);
    }

    #[test]
    fn mono_uses_shade_blocks() {
        let painter = Painter::new(ColorMode::Mono);
        let base = RenderCell {
            column_active: true,
            cell_active: true,
            opacity: 5.0 / 6.0,
            gradient_start: (0, 0, 0),
            gradient_end: (0, 0, 0),
        };
        assert_eq!(painter.cell_glyph(&base).ch, '\u{2588}');
        let dim = RenderCell {
            opacity: 1.0 / 6.0,
            ..base
        };
        assert_eq!(painter.cell_glyph(&dim).ch, '\u{2591}');
        let off = RenderCell {
            cell_active: false,
            ..base
        };
        assert_eq!(painter.cell_glyph(&off).ch, ' ');
        assert_eq!(painter.page_bg(), None);
    }

    #[test]
    fn repaint_without_change_keeps_frame_clean() {
        let rain = rain();
        let painter = Painter::new(ColorMode::Color256);
        let mut frame = Frame::new(80, 24, painter.page_bg());
        painter.paint(&rain, &mut frame);
        frame.clear_dirty();
        painter.paint(&rain, &mut frame);
        assert!(!frame.is_dirty());
    }

    #[test]
    fn tiny_screen_is_clipped_not_panicking() {
        let painter = Painter::new(ColorMode::Color16);
        let mut frame = Frame::new(10, 5, painter.page_bg());
        painter.paint(&rain(), &mut frame);
        assert!(frame.is_dirty());
    }
}
