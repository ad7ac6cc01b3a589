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

use crate::frame::{Cell, Frame};

/// Attributes last emitted to the terminal.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
}

impl Pen {
    fn apply(&mut self, out: &mut Stdout, cell: &Cell) -> Result<()> {
        if cell.fg != self.fg {
            out.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.fg = cell.fg;
        }
        if cell.bg != self.bg {
            out.queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            self.bg = cell.bg;
        }
        if cell.bold != self.bold {
            out.queue(SetAttribute(if cell.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            self.bold = cell.bold;
        }
        Ok(())
    }
}

pub struct Terminal {
    stdout: Stdout,
    shown: Option<(u16, u16)>,
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = init {
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

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let resized = self.shown != Some((frame.width, frame.height));
        let total = frame.width as usize * frame.height as usize;
        let large = total > 0 && frame.dirty_indices().len() >= total / 3;

        let mut pen = Pen::default();
        if resized || frame.is_dirty_all() || large {
            if resized {
                self.stdout
                    .queue(terminal::Clear(terminal::ClearType::All))?;
            }
            self.redraw_all(frame, &mut pen)?;
        } else {
            self.redraw_dirty(frame, &mut pen)?;
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        self.shown = Some((frame.width, frame.height));
        frame.clear_dirty();
        Ok(())
    }

    fn redraw_all(&mut self, frame: &Frame, pen: &mut Pen) -> Result<()> {
        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let cell = frame.cell_at_index(y as usize * frame.width as usize + x as usize);
                pen.apply(&mut self.stdout, &cell)?;
                self.stdout.queue(Print(cell.ch))?;
            }
        }
        Ok(())
    }

    /// Emits dirty cells as runs of horizontally adjacent, same-styled cells.
    fn redraw_dirty(&mut self, frame: &Frame, pen: &mut Pen) -> Result<()> {
        let width = frame.width as usize;
        let mut dirty = frame.dirty_indices().to_vec();
        dirty.sort_unstable();

        let mut i = 0;
        while i < dirty.len() {
            let start = dirty[i];
            let head = frame.cell_at_index(start);
            self.run_buf.clear();
            self.run_buf.push(head.ch);

            let mut j = i + 1;
            while j < dirty.len() {
                let idx = dirty[j];
                let prev = dirty[j - 1];
                if idx != prev + 1 || idx % width == 0 {
                    break;
                }
                let cell = frame.cell_at_index(idx);
                if cell.fg != head.fg || cell.bg != head.bg || cell.bold != head.bold {
                    break;
                }
                self.run_buf.push(cell.ch);
                j += 1;
            }

            let (x, y) = ((start % width) as u16, (start / width) as u16);
            self.stdout.queue(cursor::MoveTo(x, y))?;
            pen.apply(&mut self.stdout, &head)?;
            self.stdout.queue(Print(self.run_buf.as_str()))?;
            i = j;
        }
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
