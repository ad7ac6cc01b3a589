// Copyright (c) 2026 rezky_nightky

use crate::error::RainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Charset(u32);

impl Charset {
    pub const ENGLISH_LETTERS: Charset = Charset(0x1);
    pub const ENGLISH_DIGITS: Charset = Charset(0x2);
    pub const ENGLISH_PUNCTUATION: Charset = Charset(0x4);
    pub const KATAKANA: Charset = Charset(0x8);
    pub const GREEK: Charset = Charset(0x10);
    pub const CYRILLIC: Charset = Charset(0x20);
    pub const BINARY: Charset = Charset(0x100);
    pub const HEX: Charset = Charset(0x200);
    pub const SYMBOLS: Charset = Charset(0x2000);
    pub const DNA: Charset = Charset(0x40000);

    pub const ASCII: Charset = Charset(0x7);
    pub const ASCII_SAFE: Charset = Charset(0x3);
    pub const MATRIX: Charset = Charset(0xB);

    pub fn contains(self, other: Charset) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn union(self, other: Charset) -> Charset {
        Charset(self.0 | other.0)
    }
}

pub const PRESETS: &[(&str, &str)] = &[
    ("auto", "matrix on UTF-8 locales, otherwise letters + digits"),
    ("matrix", "Letters + digits + half-width katakana"),
    ("ascii", "Letters + digits + punctuation"),
    ("english", "Letters only"),
    ("digits", "Digits only (aliases: dec, decimal)"),
    ("binary", "0 and 1 (aliases: bin, 01)"),
    ("hex", "0-9 and A-F"),
    ("katakana", "Half-width katakana"),
    ("greek", "Greek"),
    ("cyrillic", "Cyrillic"),
    ("symbols", "Math symbols"),
    ("dna", "DNA bases (ACGT)"),
    ("code", "Letters + digits + punctuation + symbols"),
];

pub fn charset_from_str(name: &str, utf8: bool) -> Result<Charset, RainError> {
    let name = name.trim().to_ascii_lowercase();
    let cs = match name.as_str() {
        "auto" if utf8 => Charset::MATRIX,
        "auto" => Charset::ASCII_SAFE,
        "matrix" => Charset::MATRIX,
        "ascii" => Charset::ASCII,
        "english" => Charset::ENGLISH_LETTERS,
        "digits" | "dec" | "decimal" => Charset::ENGLISH_DIGITS,
        "bin" | "binary" | "01" => Charset::BINARY,
        "hex" | "hexadecimal" => Charset::HEX,
        "katakana" => Charset::KATAKANA,
        "greek" => Charset::GREEK,
        "cyrillic" => Charset::CYRILLIC,
        "symbols" => Charset::SYMBOLS,
        "dna" => Charset::DNA,
        "code" => Charset::ASCII.union(Charset::SYMBOLS),
        _ => return Err(RainError::UnknownCharset(name)),
    };
    Ok(cs)
}

/// Parses `--chars` as comma-separated hex codepoints taken in pairs, each
/// pair an inclusive range: `30,39,41,46` is `0-9` plus `A-F`.
pub fn parse_char_ranges(spec: &str) -> Result<Vec<(char, char)>, RainError> {
    let mut points = Vec::new();
    for (i, part) in spec.split(',').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let v = u32::from_str_radix(part, 16)
            .map_err(|_| RainError::InvalidChars(format!("invalid hex char at index {}", i + 1)))?;
        let ch = char::from_u32(v).ok_or_else(|| {
            RainError::InvalidChars(format!("invalid unicode scalar at index {}", i + 1))
        })?;
        points.push(ch);
    }
    if points.len() % 2 != 0 {
        return Err(RainError::InvalidChars(
            "odd number of unicode chars given (must be even)".to_string(),
        ));
    }
    Ok(points.chunks(2).map(|p| (p[0], p[1])).collect())
}

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    out.extend((start..=end).filter_map(char::from_u32));
}

pub fn build_chars(charset: Charset, user_ranges: &[(char, char)]) -> Vec<char> {
    let mut out: Vec<char> = Vec::new();

    if charset.contains(Charset::BINARY) {
        push_range(&mut out, 0x30, 0x31);
    }
    if charset.contains(Charset::HEX) {
        push_range(&mut out, 0x30, 0x39);
        push_range(&mut out, 0x41, 0x46);
    }
    if charset.contains(Charset::ENGLISH_LETTERS) {
        push_range(&mut out, 0x41, 0x5A);
        push_range(&mut out, 0x61, 0x7A);
    }
    if charset.contains(Charset::ENGLISH_DIGITS) {
        push_range(&mut out, 0x30, 0x39);
    }
    if charset.contains(Charset::ENGLISH_PUNCTUATION) {
        push_range(&mut out, 0x21, 0x2F);
        push_range(&mut out, 0x3A, 0x40);
        push_range(&mut out, 0x5B, 0x60);
        push_range(&mut out, 0x7B, 0x7E);
    }
    if charset.contains(Charset::KATAKANA) {
        // Half-width forms keep one glyph per terminal cell.
        push_range(&mut out, 0xFF66, 0xFF9D);
    }
    if charset.contains(Charset::GREEK) {
        push_range(&mut out, 0x0391, 0x03A9);
        push_range(&mut out, 0x03B1, 0x03C9);
    }
    if charset.contains(Charset::CYRILLIC) {
        push_range(&mut out, 0x0410, 0x044F);
    }
    if charset.contains(Charset::SYMBOLS) {
        out.extend("∞∑∫√π∆Ωµλ≈≠≤≥×÷±∂∇∈∩∪⊂⊃⊕⊗".chars());
    }
    if charset.contains(Charset::DNA) {
        out.extend("ACGT".chars());
    }

    for &(a, b) in user_ranges {
        push_range(&mut out, a as u32, b as u32);
    }

    out
}

/// Ordered, immutable, never-empty set of glyphs to draw from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphAlphabet {
    glyphs: Box<[char]>,
}

impl GlyphAlphabet {
    pub fn new(glyphs: Vec<char>) -> Self {
        let glyphs = if glyphs.is_empty() {
            vec!['0', '1']
        } else {
            glyphs
        };
        Self {
            glyphs: glyphs.into_boxed_slice(),
        }
    }

    pub fn from_charset(charset: Charset, user_ranges: &[(char, char)]) -> Self {
        Self::new(build_chars(charset, user_ranges))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn as_slice(&self) -> &[char] {
        &self.glyphs
    }

    /// Maps a uniform draw in `[0, 1)` onto a glyph.
    pub fn pick(&self, u: f64) -> char {
        let last = self.glyphs.len() - 1;
        let idx = ((u.max(0.0) * self.glyphs.len() as f64) as usize).min(last);
        self.glyphs[idx]
    }
}

impl Default for GlyphAlphabet {
    fn default() -> Self {
        Self::from_charset(Charset::MATRIX, &[])
    }
}
