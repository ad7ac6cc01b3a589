// Copyright (c) 2026 rezky_nightky

//! Cell-grid raster standing in for a pixel canvas on a terminal.
//!
//! One cell covers `cell_px x cell_px` virtual pixels. Every cell keeps the
//! last glyph written to it plus an "ink" colour; translucent rectangles
//! blend the ink toward the fill colour, which is how old glyphs fade out.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::style::Color;

use crate::frame::{Cell, Frame};
use crate::paint::{Fill, Font, PaintContext, Rgb, Surface};
use crate::palette::{quantize, ColorMode};

/// Ink dimmer than this renders as an empty cell.
const INK_FLOOR: f32 = 0.06;
/// Mono terminals have no shades; glyphs show only while this bright.
const MONO_FLOOR: f32 = 0.35;
const BOLD_ABOVE: f32 = 0.9;

#[derive(Debug)]
struct Raster {
    width_px: u32,
    height_px: u32,
    cell_px: u32,
    cols: u16,
    rows: u16,
    glyphs: Vec<char>,
    ink: Vec<[f32; 3]>,
}

impl Raster {
    fn new(width_px: u32, height_px: u32, cell_px: u32) -> Self {
        let cell_px = cell_px.max(1);
        let cols = (width_px / cell_px).min(u16::MAX as u32) as u16;
        let rows = (height_px / cell_px).min(u16::MAX as u32) as u16;
        let len = cols as usize * rows as usize;
        Self {
            width_px,
            height_px,
            cell_px,
            cols,
            rows,
            glyphs: vec![' '; len],
            ink: vec![[0.0; 3]; len],
        }
    }

    fn index(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    fn blend(&mut self, idx: usize, fill: Fill) {
        let a = fill.alpha;
        let src = [fill.color.r, fill.color.g, fill.color.b];
        for (dst, s) in self.ink[idx].iter_mut().zip(src) {
            *dst = *dst * (1.0 - a) + (s as f32 / 255.0) * a;
        }
    }
}

/// Cheap-clone handle; every clone paints into the same raster.
#[derive(Clone, Debug)]
pub struct Canvas {
    raster: Rc<RefCell<Raster>>,
}

impl Canvas {
    pub fn new(width_px: u32, height_px: u32, cell_px: u32) -> Self {
        Self {
            raster: Rc::new(RefCell::new(Raster::new(width_px, height_px, cell_px))),
        }
    }

    pub fn cols(&self) -> u16 {
        self.raster.borrow().cols
    }

    pub fn rows(&self) -> u16 {
        self.raster.borrow().rows
    }

    pub fn cell_px(&self) -> u32 {
        self.raster.borrow().cell_px
    }

    /// Glyph and ink brightness (max channel, `0..=1`) of one cell.
    pub fn cell(&self, col: u16, row: u16) -> Option<(char, f32)> {
        let r = self.raster.borrow();
        let i = r.index(col as i64, row as i64)?;
        let ink = r.ink[i];
        Some((r.glyphs[i], ink[0].max(ink[1]).max(ink[2])))
    }

    /// Copies the raster into `frame`, reallocating it when the grid changed.
    pub fn compose(&self, frame: &mut Frame, mode: ColorMode, bg: Option<Color>) {
        let r = self.raster.borrow();
        if frame.width != r.cols || frame.height != r.rows || frame.bg() != bg {
            *frame = Frame::new(r.cols, r.rows, bg);
        }

        for row in 0..r.rows {
            for col in 0..r.cols {
                let i = row as usize * r.cols as usize + col as usize;
                let [cr, cg, cb] = r.ink[i];
                let level = cr.max(cg).max(cb);
                let floor = if mode == ColorMode::Mono {
                    MONO_FLOOR
                } else {
                    INK_FLOOR
                };
                let cell = if level < floor || r.glyphs[i] == ' ' {
                    Cell::blank(bg)
                } else {
                    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                    Cell {
                        ch: r.glyphs[i],
                        fg: quantize(Rgb::new(to_u8(cr), to_u8(cg), to_u8(cb)), mode),
                        bg,
                        bold: level > BOLD_ABOVE,
                    }
                };
                frame.set(col, row, cell);
            }
        }
    }
}

impl Surface for Canvas {
    type Context = CanvasContext;

    fn width_px(&self) -> u32 {
        self.raster.borrow().width_px
    }

    fn height_px(&self) -> u32 {
        self.raster.borrow().height_px
    }

    fn set_size_px(&mut self, width_px: u32, height_px: u32) {
        let mut r = self.raster.borrow_mut();
        let cell_px = r.cell_px;
        *r = Raster::new(width_px, height_px, cell_px);
    }

    fn context_2d(&mut self) -> Option<CanvasContext> {
        Some(CanvasContext {
            raster: Rc::clone(&self.raster),
            fill: Fill::solid(Rgb::BLACK),
        })
    }
}

#[derive(Debug)]
pub struct CanvasContext {
    raster: Rc<RefCell<Raster>>,
    fill: Fill,
}

impl PaintContext for CanvasContext {
    fn set_fill_style(&mut self, fill: Fill) {
        self.fill = fill;
    }

    // Glyph size is fixed by the cell grid.
    fn set_font(&mut self, _font: Font) {}

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let mut r = self.raster.borrow_mut();
        let cell = r.cell_px as f64;
        let c0 = (x / cell).floor().max(0.0) as i64;
        let r0 = (y / cell).floor().max(0.0) as i64;
        let c1 = ((x + w) / cell).ceil().min(r.cols as f64) as i64;
        let r1 = ((y + h) / cell).ceil().min(r.rows as f64) as i64;
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(i) = r.index(col, row) {
                    r.blend(i, self.fill);
                }
            }
        }
    }

    fn fill_text(&mut self, glyph: char, x: f64, y: f64) {
        let mut r = self.raster.borrow_mut();
        let cell = r.cell_px as f64;
        let col = (x / cell).floor() as i64;
        // The glyph box sits just above its baseline.
        let row = (y / cell).ceil() as i64 - 1;
        if let Some(i) = r.index(col, row) {
            r.glyphs[i] = glyph;
            r.blend(i, self.fill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_derived_from_pixel_size() {
        let c = Canvas::new(140, 70, 14);
        assert_eq!((c.cols(), c.rows()), (10, 5));
        assert_eq!((c.width_px(), c.height_px()), (140, 70));
    }

    #[test]
    fn fill_text_lands_in_the_cell_above_the_baseline() {
        let mut c = Canvas::new(140, 70, 14);
        let mut ctx = c.context_2d().unwrap();
        ctx.set_fill_style(Fill::solid(Rgb::MATRIX_GREEN));
        ctx.fill_text('A', 28.0, 42.0);
        assert_eq!(c.cell(2, 2), Some(('A', 1.0)));
        assert_eq!(c.cell(2, 3).map(|(ch, _)| ch), Some(' '));
    }

    #[test]
    fn fill_text_outside_the_grid_is_clipped() {
        let mut c = Canvas::new(28, 28, 14);
        let mut ctx = c.context_2d().unwrap();
        ctx.set_fill_style(Fill::solid(Rgb::MATRIX_GREEN));
        ctx.fill_text('A', 0.0, 0.0);
        ctx.fill_text('A', 0.0, -14.0);
        ctx.fill_text('A', 0.0, 140.0);
        ctx.fill_text('A', 42.0, 14.0);
        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(c.cell(col, row).map(|(ch, _)| ch), Some(' '));
            }
        }
    }

    #[test]
    fn translucent_overlay_fades_ink_geometrically() {
        let mut c = Canvas::new(14, 14, 14);
        let mut ctx = c.context_2d().unwrap();
        ctx.set_fill_style(Fill::solid(Rgb::new(0, 255, 0)));
        ctx.fill_text('x', 0.0, 14.0);
        ctx.set_fill_style(Fill::translucent(Rgb::BLACK, 0.05));
        for _ in 0..10 {
            ctx.fill_rect(0.0, 0.0, 14.0, 14.0);
        }
        let (_, level) = c.cell(0, 0).unwrap();
        assert!((level - 0.95f32.powi(10)).abs() < 1e-4);
    }

    #[test]
    fn resize_reallocates_and_clears() {
        let mut c = Canvas::new(28, 28, 14);
        let mut ctx = c.context_2d().unwrap();
        ctx.set_fill_style(Fill::solid(Rgb::MATRIX_GREEN));
        ctx.fill_text('x', 0.0, 14.0);

        c.set_size_px(70, 14);
        assert_eq!((c.cols(), c.rows()), (5, 1));
        assert_eq!(c.cell(0, 0).map(|(ch, _)| ch), Some(' '));

        // The captured context keeps painting into the resized raster.
        ctx.fill_text('y', 56.0, 14.0);
        assert_eq!(c.cell(4, 0).map(|(ch, _)| ch), Some('y'));
    }

    #[test]
    fn compose_hides_faded_ink_and_bolds_fresh_glyphs() {
        let mut c = Canvas::new(28, 14, 14);
        let mut ctx = c.context_2d().unwrap();
        ctx.set_fill_style(Fill::solid(Rgb::new(0, 255, 0)));
        ctx.fill_text('a', 0.0, 14.0);
        ctx.fill_text('b', 14.0, 14.0);
        ctx.set_fill_style(Fill::translucent(Rgb::BLACK, 0.97));
        ctx.fill_rect(14.0, 0.0, 14.0, 14.0);

        let mut frame = Frame::new(1, 1, None);
        c.compose(&mut frame, ColorMode::TrueColor, None);
        assert_eq!((frame.width, frame.height), (2, 1));

        let a = frame.get(0, 0).unwrap();
        assert_eq!(a.ch, 'a');
        assert!(a.bold);
        assert_eq!(a.fg, Some(Color::Rgb { r: 0, g: 255, b: 0 }));
        assert_eq!(frame.get(1, 0).unwrap().ch, ' ');
    }
}
