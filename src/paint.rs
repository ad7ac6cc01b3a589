// Copyright (c) 2026 rezky_nightky

//! The drawing seam: a surface with pixel dimensions that hands out a 2d
//! paint context. The engine only ever talks to these traits.

use crate::error::RainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const MATRIX_GREEN: Rgb = Rgb::new(0x00, 0xFF, 0x41);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `RRGGBB`, with or without a leading `#`.
    pub fn from_hex(s: &str) -> Result<Self, RainError> {
        let t = s.trim();
        let hex = t.strip_prefix('#').unwrap_or(t);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RainError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| RainError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fill {
    pub color: Rgb,
    pub alpha: f32,
}

impl Fill {
    pub fn solid(color: Rgb) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub fn translucent(color: Rgb, alpha: f32) -> Self {
        Self {
            color,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFamily {
    Monospace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font {
    pub size_px: u32,
    pub family: FontFamily,
}

impl Font {
    pub fn monospace(size_px: u32) -> Self {
        Self {
            size_px,
            family: FontFamily::Monospace,
        }
    }
}

pub trait PaintContext {
    fn set_fill_style(&mut self, fill: Fill);
    fn set_font(&mut self, font: Font);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    /// `y` is the text baseline.
    fn fill_text(&mut self, glyph: char, x: f64, y: f64);
}

/// A drawing target owned by the host.
///
/// `context_2d` returns a handle into the surface's backing store; callers
/// capture it once and keep painting through it across resizes.
pub trait Surface {
    type Context: PaintContext;

    fn width_px(&self) -> u32;
    fn height_px(&self) -> u32;
    fn set_size_px(&mut self, width_px: u32, height_px: u32);
    fn context_2d(&mut self) -> Option<Self::Context>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_from_hex_accepts_optional_hash() {
        assert_eq!(Rgb::from_hex("#00FF41").unwrap(), Rgb::MATRIX_GREEN);
        assert_eq!(Rgb::from_hex("00ff41").unwrap(), Rgb::MATRIX_GREEN);
    }

    #[test]
    fn rgb_from_hex_rejects_garbage() {
        assert!(Rgb::from_hex("green").is_err());
        assert!(Rgb::from_hex("#00FF4").is_err());
        assert!(Rgb::from_hex("#00FF4G").is_err());
    }

    #[test]
    fn translucent_fill_clamps_alpha() {
        assert_eq!(Fill::translucent(Rgb::BLACK, 3.0).alpha, 1.0);
        assert_eq!(Fill::translucent(Rgb::BLACK, -1.0).alpha, 0.0);
    }
}
