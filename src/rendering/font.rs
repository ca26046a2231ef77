//! Tile fonts: a glyph sheet addressed by fixed-size cells plus a character to cell lookup.
//!
//! A [`TileFont`] wraps any [`Drawable`] glyph sheet. Glyphs are drawn in white on a
//! transparent background; [`Renderer::text`] recolors them to the requested color before
//! drawing. Characters the lookup does not map have no glyph and are skipped during layout.
//!
//! [`TileFont::builtin`] provides a tiny 3x5 font covering digits, letters (case-insensitive)
//! and the punctuation in [`PUNCTUATION`], backed by the zero-allocation [`GlyphSheet`].
//!
//! [`Renderer::text`]: crate::rendering::renderer::Renderer::text

use crate::rendering::color::Rgba;
use crate::rendering::drawable::{Drawable, Grid, Slice};

/// Maps a character to the `(column, row)` of its glyph cell, if it has one.
pub type GlyphLookup = fn(char) -> Option<(usize, usize)>;

/// A font made of equally sized glyph cells on a sheet.
#[derive(Clone, Copy, Debug)]
pub struct TileFont<S> {
    glyphs: Grid<S>,
    lookup: GlyphLookup,
    spacing: usize,
}

impl<S: Drawable> TileFont<S> {
    /// Creates a font over `source`, cut into `glyph_width` x `glyph_height` cells.
    ///
    /// `spacing` is the number of pixels between two consecutive glyph cells.
    ///
    /// # Panics
    ///
    /// Panics if a glyph dimension is zero or does not evenly divide the source.
    pub fn new(
        source: S,
        glyph_width: usize,
        glyph_height: usize,
        spacing: usize,
        lookup: GlyphLookup,
    ) -> Self {
        assert!(
            glyph_width > 0 && glyph_height > 0,
            "glyph cells must not be empty, got {glyph_width}x{glyph_height}"
        );
        assert!(
            source.width() % glyph_width == 0 && source.height() % glyph_height == 0,
            "{glyph_width}x{glyph_height} glyph cells do not tile a {}x{} sheet",
            source.width(),
            source.height()
        );
        Self {
            glyphs: source.grid(glyph_width, glyph_height),
            lookup,
            spacing,
        }
    }

    /// The glyph cell of `c`, or `None` if the font has no glyph for it.
    pub fn lookup(&self, c: char) -> Option<(usize, usize)> {
        (self.lookup)(c)
    }

    /// The glyph of `c`, or `None` if the font has no glyph for it.
    pub fn glyph(&self, c: char) -> Option<Slice<&S>> {
        let (cx, cy) = self.lookup(c)?;
        debug_assert!(
            cx < self.glyphs.columns() && cy < self.glyphs.rows(),
            "glyph cell ({cx}, {cy}) of {c:?} is outside the sheet"
        );
        Some(self.glyphs.cell(cx, cy))
    }

    pub fn glyph_width(&self) -> usize {
        self.glyphs.item_width()
    }

    pub fn glyph_height(&self) -> usize {
        self.glyphs.item_height()
    }

    pub fn spacing(&self) -> usize {
        self.spacing
    }

    /// Horizontal distance between the starts of two consecutive characters.
    pub fn advance(&self) -> usize {
        self.glyph_width() + self.spacing
    }

    /// The width in pixels `text` occupies when laid out on one line.
    ///
    /// Every character takes a slot, mapped or not. No trailing spacing is counted.
    pub fn text_width(&self, text: &str) -> usize {
        match text.chars().count() {
            0 => 0,
            n => n * self.advance() - self.spacing,
        }
    }
}

impl TileFont<GlyphSheet> {
    /// The built-in 3x5 font with one pixel of spacing.
    pub fn builtin() -> Self {
        Self::new(GlyphSheet, GLYPH_WIDTH, GLYPH_HEIGHT, 1, builtin_lookup)
    }
}

const GLYPH_WIDTH: usize = 3;
const GLYPH_HEIGHT: usize = 5;

/// The punctuation supported by the built-in font, in sheet order after the letters.
pub const PUNCTUATION: &str = ".,:;!?'\"-+=*/()_<>#%";

const DIGITS_START: usize = 0;
const LETTERS_START: usize = 10;
const PUNCTUATION_START: usize = 36;

fn builtin_lookup(c: char) -> Option<(usize, usize)> {
    let column = match c {
        '0'..='9' => DIGITS_START + (c as usize - '0' as usize),
        'A'..='Z' => LETTERS_START + (c as usize - 'A' as usize),
        'a'..='z' => LETTERS_START + (c as usize - 'a' as usize),
        // punctuation is ASCII, so byte offsets are character offsets
        _ => PUNCTUATION_START + PUNCTUATION.find(c)?,
    };
    Some((column, 0))
}

/// The built-in glyph sheet: one row of 3x5 cells, white glyph pixels on clear.
///
/// Pixels are decoded straight from a static bit table on every read.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlyphSheet;

impl Drawable for GlyphSheet {
    type Color = Rgba;

    fn width(&self) -> usize {
        GLYPHS.len() * GLYPH_WIDTH
    }

    fn height(&self) -> usize {
        GLYPH_HEIGHT
    }

    fn get(&self, x: usize, y: usize) -> Rgba {
        let row = GLYPHS[x / GLYPH_WIDTH][y];
        // bit 2 is the leftmost column
        let column = GLYPH_WIDTH - 1 - x % GLYPH_WIDTH;
        if (row >> column) & 1 == 1 {
            Rgba::WHITE
        } else {
            Rgba::CLEAR
        }
    }
}

#[rustfmt::skip]
const GLYPHS: [[u8; GLYPH_HEIGHT]; 56] = [
    // 0-9
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
    // A-Z
    [0b010, 0b101, 0b111, 0b101, 0b101],
    [0b110, 0b101, 0b110, 0b101, 0b110],
    [0b011, 0b100, 0b100, 0b100, 0b011],
    [0b110, 0b101, 0b101, 0b101, 0b110],
    [0b111, 0b100, 0b110, 0b100, 0b111],
    [0b111, 0b100, 0b110, 0b100, 0b100],
    [0b011, 0b100, 0b101, 0b101, 0b011],
    [0b101, 0b101, 0b111, 0b101, 0b101],
    [0b111, 0b010, 0b010, 0b010, 0b111],
    [0b001, 0b001, 0b001, 0b101, 0b010],
    [0b101, 0b101, 0b110, 0b101, 0b101],
    [0b100, 0b100, 0b100, 0b100, 0b111],
    [0b101, 0b111, 0b111, 0b101, 0b101],
    [0b110, 0b101, 0b101, 0b101, 0b101],
    [0b010, 0b101, 0b101, 0b101, 0b010],
    [0b110, 0b101, 0b110, 0b100, 0b100],
    [0b010, 0b101, 0b101, 0b110, 0b011],
    [0b110, 0b101, 0b110, 0b101, 0b101],
    [0b011, 0b100, 0b010, 0b001, 0b110],
    [0b111, 0b010, 0b010, 0b010, 0b010],
    [0b101, 0b101, 0b101, 0b101, 0b111],
    [0b101, 0b101, 0b101, 0b101, 0b010],
    [0b101, 0b101, 0b111, 0b111, 0b101],
    [0b101, 0b101, 0b010, 0b101, 0b101],
    [0b101, 0b101, 0b010, 0b010, 0b010],
    [0b111, 0b001, 0b010, 0b100, 0b111],
    // . , : ; ! ? ' "
    [0b000, 0b000, 0b000, 0b000, 0b010],
    [0b000, 0b000, 0b000, 0b010, 0b100],
    [0b000, 0b010, 0b000, 0b010, 0b000],
    [0b000, 0b010, 0b000, 0b010, 0b100],
    [0b010, 0b010, 0b010, 0b000, 0b010],
    [0b110, 0b001, 0b010, 0b000, 0b010],
    [0b010, 0b010, 0b000, 0b000, 0b000],
    [0b101, 0b101, 0b000, 0b000, 0b000],
    // - + = * / ( ) _
    [0b000, 0b000, 0b111, 0b000, 0b000],
    [0b000, 0b010, 0b111, 0b010, 0b000],
    [0b000, 0b111, 0b000, 0b111, 0b000],
    [0b000, 0b101, 0b010, 0b101, 0b000],
    [0b001, 0b001, 0b010, 0b100, 0b100],
    [0b001, 0b010, 0b010, 0b010, 0b001],
    [0b100, 0b010, 0b010, 0b010, 0b100],
    [0b000, 0b000, 0b000, 0b000, 0b111],
    // < > # %
    [0b001, 0b010, 0b100, 0b010, 0b001],
    [0b100, 0b010, 0b001, 0b010, 0b100],
    [0b101, 0b111, 0b101, 0b111, 0b101],
    [0b101, 0b001, 0b010, 0b100, 0b101],
];
