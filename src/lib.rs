// Copyright (c) 2026 rezky_nightky

pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod glyphs;
pub mod paint;
pub mod palette;
pub mod random;
pub mod schedule;
pub mod terminal;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use engine::{Column, RainConfig, RainField};
pub use error::RainError;
