// Copyright (c) 2026 rezky_nightky

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSize {
    pub width_px: u32,
    pub height_px: u32,
}

impl ViewportSize {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }

    /// Terminal geometry expressed in square virtual pixels of `cell_px`.
    pub fn from_cells(cols: u16, rows: u16, cell_px: u32) -> Self {
        Self::new(cols as u32 * cell_px, rows as u32 * cell_px)
    }
}

/// The host window whose size drives the surface.
pub trait Viewport {
    fn size(&self) -> ViewportSize;
    fn observe(&mut self) -> ResizeObserver;
}

/// A live resize registration. Dropping it unregisters.
#[derive(Debug)]
pub struct ResizeObserver {
    rx: Receiver<ViewportSize>,
}

impl ResizeObserver {
    pub fn new(rx: Receiver<ViewportSize>) -> Self {
        Self { rx }
    }

    /// Drains pending notifications and keeps only the newest.
    pub fn latest(&self) -> Option<ViewportSize> {
        let mut last = None;
        loop {
            match self.rx.try_recv() {
                Ok(size) => last = Some(size),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        last
    }
}

/// Host-side fan-out of resize notifications.
#[derive(Debug)]
pub struct ViewportHub {
    size: ViewportSize,
    observers: Vec<Sender<ViewportSize>>,
}

impl ViewportHub {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            size,
            observers: Vec::new(),
        }
    }

    pub fn notify(&mut self, size: ViewportSize) {
        self.size = size;
        self.observers.retain(|tx| tx.send(size).is_ok());
    }

    /// Registrations whose observer is still alive as of the last notify.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Viewport for ViewportHub {
    fn size(&self) -> ViewportSize {
        self.size
    }

    fn observe(&mut self) -> ResizeObserver {
        let (tx, rx) = channel();
        self.observers.push(tx);
        ResizeObserver::new(rx)
    }
}
