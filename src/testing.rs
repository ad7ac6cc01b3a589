// Copyright (c) 2026 rezky_nightky

//! Test doubles for the engine's injected capabilities.

use std::cell::RefCell;
use std::rc::Rc;

use crate::paint::{Fill, Font, PaintContext, Surface};
use crate::random::RandomSource;
use crate::schedule::{FrameHandle, FrameScheduler, ManualScheduler};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Call {
    FillStyle(Fill),
    Font(Font),
    Rect(f64, f64, f64, f64),
    Text(char, f64, f64),
    Resize(u32, u32),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub struct RecordingSurface {
    width: u32,
    height: u32,
    has_context: bool,
    calls: CallLog,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            has_context: true,
            calls: Rc::default(),
        }
    }

    pub fn without_context(width: u32, height: u32) -> Self {
        Self {
            has_context: false,
            ..Self::new(width, height)
        }
    }

    pub fn calls(&self) -> CallLog {
        Rc::clone(&self.calls)
    }
}

impl Surface for RecordingSurface {
    type Context = RecordingContext;

    fn width_px(&self) -> u32 {
        self.width
    }

    fn height_px(&self) -> u32 {
        self.height
    }

    fn set_size_px(&mut self, width_px: u32, height_px: u32) {
        self.width = width_px;
        self.height = height_px;
        self.calls.borrow_mut().push(Call::Resize(width_px, height_px));
    }

    fn context_2d(&mut self) -> Option<RecordingContext> {
        self.has_context.then(|| RecordingContext {
            calls: Rc::clone(&self.calls),
        })
    }
}

pub struct RecordingContext {
    calls: CallLog,
}

impl PaintContext for RecordingContext {
    fn set_fill_style(&mut self, fill: Fill) {
        self.calls.borrow_mut().push(Call::FillStyle(fill));
    }

    fn set_font(&mut self, font: Font) {
        self.calls.borrow_mut().push(Call::Font(font));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.borrow_mut().push(Call::Rect(x, y, w, h));
    }

    fn fill_text(&mut self, glyph: char, x: f64, y: f64) {
        self.calls.borrow_mut().push(Call::Text(glyph, x, y));
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
pub struct ScriptedRandom {
    values: Vec<f64>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty());
        Self { values, pos: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}

/// A `ManualScheduler` the test can still inspect after handing it over.
#[derive(Clone, Default)]
pub struct SharedScheduler(pub Rc<RefCell<ManualScheduler>>);

impl FrameScheduler for SharedScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.0.borrow_mut().request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.0.borrow_mut().cancel_frame(handle);
    }

    fn poll_due(&mut self) -> Option<FrameHandle> {
        self.0.borrow_mut().poll_due()
    }
}
