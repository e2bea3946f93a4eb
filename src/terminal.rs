// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::{Frame, Glyph};

/// Raw-mode alternate-screen session. Dropping it restores the terminal.
pub struct Terminal {
    stdout: Stdout,
    shown: Option<(u16, u16)>,
    run_buf: String,
}

#[derive(Default)]
struct Pen {
    fg: Option<Option<Color>>,
    bg: Option<Option<Color>>,
    pos: Option<(u16, u16)>,
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
            shown: None,
            run_buf: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn queue_style(&mut self, pen: &mut Pen, glyph: Glyph) -> Result<()> {
        if pen.fg != Some(glyph.fg) {
            self.stdout
                .queue(SetForegroundColor(glyph.fg.unwrap_or(Color::Reset)))?;
            pen.fg = Some(glyph.fg);
        }
        if pen.bg != Some(glyph.bg) {
            self.stdout
                .queue(SetBackgroundColor(glyph.bg.unwrap_or(Color::Reset)))?;
            pen.bg = Some(glyph.bg);
        }
        Ok(())
    }

    /// Writes the frame, repainting everything on a size change or when most
    /// of it is dirty, otherwise only runs of changed glyphs.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let mut pen = Pen::default();
        let size = (frame.width, frame.height);
        let resized = self.shown != Some(size);
        let total = frame.width as usize * frame.height as usize;
        let full = resized || frame.is_dirty_all() || frame.dirty_indices().len() >= total / 3;

        if resized {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.shown = Some(size);
        }

        if full {
            for y in 0..frame.height {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..frame.width {
                    let idx = y as usize * frame.width as usize + x as usize;
                    let glyph = frame.glyph_at_index(idx);
                    self.queue_style(&mut pen, glyph)?;
                    self.stdout.queue(Print(glyph.ch))?;
                }
            }
        } else {
            let mut dirty = frame.dirty_indices().to_vec();
            dirty.sort_unstable();
            let width = frame.width as usize;

            let mut i = 0usize;
            while i < dirty.len() {
                let idx0 = dirty[i];
                let glyph0 = frame.glyph_at_index(idx0);
                let x0 = (idx0 % width) as u16;
                let y0 = (idx0 / width) as u16;

                self.run_buf.clear();
                self.run_buf.push(glyph0.ch);
                let mut last = idx0;
                let mut j = i + 1;
                while j < dirty.len() {
                    let idx1 = dirty[j];
                    let glyph1 = frame.glyph_at_index(idx1);
                    let same_row = idx1 / width == idx0 / width;
                    if idx1 != last + 1
                        || !same_row
                        || glyph1.fg != glyph0.fg
                        || glyph1.bg != glyph0.bg
                    {
                        break;
                    }
                    self.run_buf.push(glyph1.ch);
                    last = idx1;
                    j += 1;
                }

                if pen.pos != Some((x0, y0)) {
                    self.stdout.queue(cursor::MoveTo(x0, y0))?;
                }
                self.queue_style(&mut pen, glyph0)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;

                let next_x = x0 as usize + (j - i);
                pen.pos = (next_x < width).then_some((next_x as u16, y0));
                i = j;
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
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
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
