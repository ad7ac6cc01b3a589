// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Cell {
    pub fn blank(bg: Option<Color>) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg,
            bold: false,
        }
    }
}

/// Terminal-sized cell buffer that remembers which cells changed since the
/// last present.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    bg: Option<Color>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank(bg); len],
            bg,
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn bg(&self) -> Option<Color> {
        self.bg
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn has_changes(&self) -> bool {
        self.dirty_all || !self.dirty.is_empty()
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_map.fill(false);
        } else {
            for &i in &self.dirty {
                self.dirty_map[i] = false;
            }
        }
        self.dirty_all = false;
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells.get(i).copied().unwrap_or(Cell::blank(self.bg))
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(ch: char) -> Cell {
        Cell {
            ch,
            fg: Some(Color::Green),
            bg: None,
            bold: false,
        }
    }

    #[test]
    fn new_frame_is_fully_dirty_until_cleared() {
        let mut f = Frame::new(3, 2, None);
        assert!(f.is_dirty_all());
        f.clear_dirty();
        assert!(!f.has_changes());
    }

    #[test]
    fn set_tracks_each_changed_cell_once() {
        let mut f = Frame::new(3, 2, None);
        f.clear_dirty();
        f.set(1, 1, glyph('x'));
        f.set(1, 1, glyph('y'));
        f.set(0, 0, Cell::blank(None));
        assert_eq!(f.dirty_indices(), &[4]);
        assert_eq!(f.get(1, 1).map(|c| c.ch), Some('y'));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut f = Frame::new(2, 2, None);
        f.clear_dirty();
        f.set(2, 0, glyph('x'));
        f.set(0, 9, glyph('x'));
        assert!(!f.has_changes());
        assert!(f.get(2, 0).is_none());
    }
}
