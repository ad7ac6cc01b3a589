// Copyright (c) 2026 rezky_nightky

//! The rain field: one descent position per glyph column, advanced once per
//! scheduled frame and painted over a slowly darkening surface.

use log::{debug, trace};

use crate::error::{require_range, RainError};
use crate::glyphs::GlyphAlphabet;
use crate::paint::{Fill, Font, PaintContext, Rgb, Surface};
use crate::random::RandomSource;
use crate::schedule::{FrameHandle, FrameScheduler};
use crate::viewport::{ResizeObserver, Viewport, ViewportSize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainConfig {
    /// Font size and column pitch, in pixels.
    pub glyph_cell_px: u32,
    /// Opacity of the black overlay painted each frame.
    pub trail_alpha: f32,
    pub glyph_color: Rgb,
    /// An off-screen column restarts when a uniform draw exceeds this.
    pub reset_threshold: f64,
    /// Rows fallen per frame.
    pub descent_step: f64,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            glyph_cell_px: 14,
            trail_alpha: 0.05,
            glyph_color: Rgb::MATRIX_GREEN,
            reset_threshold: 0.975,
            descent_step: 1.0,
        }
    }
}

impl RainConfig {
    pub fn validate(&self) -> Result<(), RainError> {
        require_range("glyph cell size", self.glyph_cell_px as f64, 1.0, 4096.0)?;
        require_range("trail alpha", self.trail_alpha as f64, 0.0, 1.0)?;
        require_range("reset threshold", self.reset_threshold, 0.0, 1.0)?;
        require_range("descent step", self.descent_step, 0.0, 1.0e6)?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub index: usize,
    /// Row of the next glyph; negative while still above the top edge.
    pub descent: f64,
}

pub struct RainField<S, F, R>
where
    S: Surface,
    F: FrameScheduler,
    R: RandomSource,
{
    surface: S,
    ctx: S::Context,
    alphabet: GlyphAlphabet,
    config: RainConfig,
    columns: Vec<Column>,
    active: Option<FrameHandle>,
    scheduler: F,
    rng: R,
    frames_drawn: u64,
    // Declared last: dropped after `Drop::drop` has stopped the loop.
    resize: ResizeObserver,
}

impl<S, F, R> RainField<S, F, R>
where
    S: Surface,
    F: FrameScheduler,
    R: RandomSource,
{
    pub fn new<V: Viewport + ?Sized>(
        mut surface: S,
        viewport: &mut V,
        scheduler: F,
        rng: R,
        alphabet: GlyphAlphabet,
        config: RainConfig,
    ) -> Result<Self, RainError> {
        config.validate()?;
        let ctx = surface.context_2d().ok_or(RainError::NoPaintContext)?;
        let resize = viewport.observe();

        let size = viewport.size();
        if (size.width_px, size.height_px) != (surface.width_px(), surface.height_px()) {
            surface.set_size_px(size.width_px, size.height_px);
        }

        let mut field = Self {
            surface,
            ctx,
            alphabet,
            config,
            columns: Vec::new(),
            active: None,
            scheduler,
            rng,
            frames_drawn: 0,
            resize,
        };
        field.init_columns();
        debug!(
            "rain field created: {}x{}px, {} columns, {} glyphs",
            field.surface.width_px(),
            field.surface.height_px(),
            field.columns.len(),
            field.alphabet.len()
        );
        Ok(field)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn start(&mut self) {
        if self.active.is_some() {
            return;
        }
        self.active = Some(self.scheduler.request_frame());
        debug!("rain field started");
    }

    pub fn stop(&mut self) {
        if let Some(h) = self.active.take() {
            self.scheduler.cancel_frame(h);
            debug!("rain field stopped after {} frames", self.frames_drawn);
        }
    }

    /// Applies pending viewport resizes, then runs the frame the scheduler
    /// reports as due. Returns whether the surface changed.
    pub fn pump(&mut self) -> bool {
        let resized = self.sync_viewport();
        let drew = match self.scheduler.poll_due() {
            Some(h) => self.run_frame(h),
            None => false,
        };
        resized || drew
    }

    /// Rebuilds the column grid from the newest pending viewport size. A
    /// notification repeating the current size leaves the field untouched.
    pub fn sync_viewport(&mut self) -> bool {
        match self.resize.latest() {
            Some(size)
                if (size.width_px, size.height_px)
                    != (self.surface.width_px(), self.surface.height_px()) =>
            {
                self.apply_resize(size);
                true
            }
            _ => false,
        }
    }

    /// Runs one frame if `handle` is the one currently scheduled; stale or
    /// cancelled handles are ignored.
    pub fn run_frame(&mut self, handle: FrameHandle) -> bool {
        if self.active != Some(handle) {
            return false;
        }
        self.draw();
        self.active = Some(self.scheduler.request_frame());
        true
    }

    fn apply_resize(&mut self, size: ViewportSize) {
        let before = self.columns.len();
        self.surface.set_size_px(size.width_px, size.height_px);
        self.init_columns();
        debug!(
            "viewport resized to {}x{}px: {} -> {} columns",
            size.width_px,
            size.height_px,
            before,
            self.columns.len()
        );
    }

    fn init_columns(&mut self) {
        let cell = self.config.glyph_cell_px as f64;
        let count = (self.surface.width_px() / self.config.glyph_cell_px) as usize;
        let above = -(self.surface.height_px() as f64) / cell;

        let rng = &mut self.rng;
        self.columns = (0..count)
            .map(|index| Column {
                index,
                descent: rng.next_f64() * above,
            })
            .collect();
    }

    fn draw(&mut self) {
        let cell = self.config.glyph_cell_px as f64;
        let width = self.surface.width_px() as f64;
        let height = self.surface.height_px() as f64;

        self.ctx
            .set_fill_style(Fill::translucent(Rgb::BLACK, self.config.trail_alpha));
        self.ctx.fill_rect(0.0, 0.0, width, height);

        self.ctx.set_fill_style(Fill::solid(self.config.glyph_color));
        self.ctx.set_font(Font::monospace(self.config.glyph_cell_px));

        for col in &mut self.columns {
            let glyph = self.alphabet.pick(self.rng.next_f64());
            let y = col.descent * cell;
            self.ctx.fill_text(glyph, col.index as f64 * cell, y);

            if y > height && self.rng.next_f64() > self.config.reset_threshold {
                trace!("column {} back to top", col.index);
                col.descent = 0.0;
            }
            col.descent += self.config.descent_step;
        }

        self.frames_drawn += 1;
    }
}

impl<S, F, R> Drop for RainField<S, F, R>
where
    S: Surface,
    F: FrameScheduler,
    R: RandomSource,
{
    fn drop(&mut self) {
        self.stop();
    }
}
