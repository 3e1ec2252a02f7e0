// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::Frame;
use crate::glyph::Glyph;

/// Pen state last sent to the terminal, so runs of equal style are not
/// re-announced for every glyph.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    pos: Option<(u16, u16)>,
}

pub struct Terminal {
    stdout: Stdout,
    last_size: Option<(u16, u16)>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last_size: None,
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn put(&mut self, pen: &mut Pen, x: u16, y: u16, g: Glyph) -> Result<()> {
        if pen.pos != Some((x, y)) {
            self.stdout.queue(cursor::MoveTo(x, y))?;
        }
        if g.fg != pen.fg {
            self.stdout
                .queue(SetForegroundColor(g.fg.unwrap_or(Color::Reset)))?;
            pen.fg = g.fg;
        }
        if g.bg != pen.bg {
            self.stdout
                .queue(SetBackgroundColor(g.bg.unwrap_or(Color::Reset)))?;
            pen.bg = g.bg;
        }
        if g.bold != pen.bold {
            self.stdout.queue(SetAttribute(if g.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            pen.bold = g.bold;
        }
        self.stdout.queue(Print(g.ch))?;
        pen.pos = Some((x + 1, y));
        Ok(())
    }

    /// Flushes the frame. Writes every glyph after a resize, a full
    /// invalidation, or when a third of the screen changed; otherwise only
    /// the dirty glyphs, in screen order.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size = (frame.width, frame.height);
        let resized = self.last_size != Some(size);
        if resized {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last_size = Some(size);
        }

        let total = frame.width as usize * frame.height as usize;
        let dirty_is_large = total > 0 && frame.dirty_indices().len() >= total / 3;
        let mut pen = Pen::default();
        self.stdout.queue(ResetColor)?;

        if resized || frame.is_dirty_all() || dirty_is_large {
            for y in 0..frame.height {
                for x in 0..frame.width {
                    let i = y as usize * frame.width as usize + x as usize;
                    self.put(&mut pen, x, y, frame.glyph_at_index(i))?;
                }
            }
        } else {
            let mut dirty = frame.dirty_indices().to_vec();
            dirty.sort_unstable();
            let w = frame.width as usize;
            for i in dirty {
                let (x, y) = ((i % w) as u16, (i / w) as u16);
                self.put(&mut pen, x, y, frame.glyph_at_index(i))?;
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
