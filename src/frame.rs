// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::glyph::Glyph;

/// Off-screen glyph buffer with change tracking, flushed by the terminal.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    glyphs: Vec<Glyph>,
    blank: Glyph,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let len = width as usize * height as usize;
        let blank = Glyph::blank_with_bg(bg);
        Self {
            width,
            height,
            glyphs: vec![blank; len],
            blank,
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_all || !self.dirty.is_empty()
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
        } else {
            for &i in &self.dirty {
                self.dirty_map[i] = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn glyph_at_index(&self, i: usize) -> Glyph {
        self.glyphs.get(i).copied().unwrap_or(self.blank)
    }

    /// Writes one glyph. Off-screen coordinates are clipped; rewriting the
    /// same glyph does not mark the cell dirty.
    pub fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.glyphs[i] == glyph {
            return;
        }
        self.glyphs[i] = glyph;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    /// Writes `text` left to right from (`x`, `y`), clipped at the right edge.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, fg: Option<Color>, bold: bool) {
        let bg = self.blank.bg;
        for (dx, ch) in text.chars().enumerate() {
            let Ok(dx) = u16::try_from(dx) else {
                break;
            };
            let Some(cx) = x.checked_add(dx) else {
                break;
            };
            self.set(cx, y, Glyph { ch, fg, bg, bold });
        }
    }
}

#[cfg(test)]
impl Frame {
    pub fn get(&self, x: u16, y: u16) -> Option<&Glyph> {
        self.index(x, y).map(|i| &self.glyphs[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(ch: char) -> Glyph {
        Glyph {
            ch,
            fg: None,
            bg: None,
            bold: false,
        }
    }

    #[test]
    fn new_frame_is_blank_and_fully_dirty() {
        let f = Frame::new(2, 2, Some(Color::Black));
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
        assert_eq!(f.get(1, 1).unwrap().bg, Some(Color::Black));
        assert!(f.is_dirty_all());
        assert!(f.get(2, 0).is_none());
    }

    #[test]
    fn set_tracks_each_changed_cell_once() {
        let mut f = Frame::new(3, 2, None);
        f.clear_dirty();
        assert!(!f.is_dirty());

        f.set(1, 1, glyph('a'));
        f.set(1, 1, glyph('b'));
        f.set(0, 0, Glyph::blank_with_bg(None));
        f.set(5, 5, glyph('z'));
        assert_eq!(f.dirty_indices(), &[4]);

        f.clear_dirty();
        f.set(1, 1, glyph('b'));
        assert!(!f.is_dirty());
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut f = Frame::new(4, 1, None);
        f.put_str(2, 0, "hello", None, true);
        assert_eq!(f.get(2, 0).unwrap().ch, 'h');
        assert_eq!(f.get(3, 0).unwrap().ch, 'e');
        assert!(f.get(3, 0).unwrap().bold);
        assert_eq!(f.glyph_at_index(0).ch, ' ');
    }
}
