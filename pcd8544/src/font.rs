//! Fixed-width bitmap fonts for the PCD8544.
//!
//! Each glyph is five columns of eight vertical pixels, which maps directly onto the controller's
//! data bytes: one byte written is one column drawn in the current bank, with the least
//! significant bit at the top.

use core::iter;

/// Number of columns in every glyph, excluding kerning columns
pub const GLYPH_WIDTH: usize = 5;

/// The bitmap for a single character.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph([u8; GLYPH_WIDTH]);

impl Glyph {
    pub const fn new(columns: [u8; GLYPH_WIDTH]) -> Self {
        Self(columns)
    }

    pub fn columns(&self) -> &[u8; GLYPH_WIDTH] {
        &self.0
    }

    /// Ink on the first column means a blank column has to be emitted before the glyph, otherwise
    /// it would run into whatever was drawn to its left.
    pub fn needs_leading_kern(&self) -> bool {
        self.0[0] != 0x00
    }

    /// Same as [`Self::needs_leading_kern`] but for the right-hand edge
    pub fn needs_trailing_kern(&self) -> bool {
        self.0[GLYPH_WIDTH - 1] != 0x00
    }

    /// Number of columns this glyph occupies once kerning columns are added
    pub fn rendered_width(&self) -> usize {
        GLYPH_WIDTH + self.needs_leading_kern() as usize + self.needs_trailing_kern() as usize
    }

    /// The exact sequence of data bytes that draws this glyph, kerning columns included
    pub fn render_columns(self) -> impl Iterator<Item = u8> {
        let leading = iter::repeat(0x00).take(self.needs_leading_kern() as usize);
        let trailing = iter::repeat(0x00).take(self.needs_trailing_kern() as usize);

        leading.chain(self.0).chain(trailing)
    }
}

/// A contiguous table of glyphs starting at some character code.
///
/// Lookups are bounds checked; a character outside the table has no glyph, and it's up to the
/// caller to decide what that means.
#[derive(Copy, Clone, Debug)]
pub struct Font {
    first: u32,
    glyphs: &'static [Glyph],
}

impl Font {
    /// Build a font whose first glyph renders `first`, the second glyph `first + 1`, and so on.
    pub const fn new(first: char, glyphs: &'static [Glyph]) -> Self {
        Self {
            first: first as u32,
            glyphs,
        }
    }

    /// Look up the glyph for `c`, if the table has one
    pub fn glyph(&self, c: char) -> Option<Glyph> {
        let index = (c as u32).checked_sub(self.first)?;

        self.glyphs.get(index as usize).copied()
    }

    /// Every character this font can render, in table order
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.glyphs.len()).filter_map(|index| char::from_u32(self.first + index as u32))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// The built-in font, covering printable ASCII from `' '` through DEL.
#[cfg(feature = "ascii-font")]
pub const ASCII: Font = Font::new(' ', ASCII_FONT_TABLE);

/// 5x8 ASCII glyphs, offset to position 32.
///
/// This is the font commonly shipped with Nokia 5110 breakout board sample code.
#[cfg(feature = "ascii-font")]
const ASCII_FONT_TABLE: &[Glyph] = &[
    Glyph([0x00, 0x00, 0x00, 0x00, 0x00]), // 20 (space)
    Glyph([0x00, 0x00, 0x5f, 0x00, 0x00]), // 21 !
    Glyph([0x00, 0x07, 0x00, 0x07, 0x00]), // 22 "
    Glyph([0x14, 0x7f, 0x14, 0x7f, 0x14]), // 23 #
    Glyph([0x24, 0x2a, 0x7f, 0x2a, 0x12]), // 24 $
    Glyph([0x23, 0x13, 0x08, 0x64, 0x62]), // 25 %
    Glyph([0x36, 0x49, 0x55, 0x22, 0x50]), // 26 &
    Glyph([0x00, 0x05, 0x03, 0x00, 0x00]), // 27 '
    Glyph([0x00, 0x1c, 0x22, 0x41, 0x00]), // 28 (
    Glyph([0x00, 0x41, 0x22, 0x1c, 0x00]), // 29 )
    Glyph([0x14, 0x08, 0x3e, 0x08, 0x14]), // 2a *
    Glyph([0x08, 0x08, 0x3e, 0x08, 0x08]), // 2b +
    Glyph([0x00, 0x50, 0x30, 0x00, 0x00]), // 2c ,
    Glyph([0x08, 0x08, 0x08, 0x08, 0x08]), // 2d -
    Glyph([0x00, 0x60, 0x60, 0x00, 0x00]), // 2e .
    Glyph([0x20, 0x10, 0x08, 0x04, 0x02]), // 2f /
    Glyph([0x3e, 0x51, 0x49, 0x45, 0x3e]), // 30 0
    Glyph([0x00, 0x42, 0x7f, 0x40, 0x00]), // 31 1
    Glyph([0x42, 0x61, 0x51, 0x49, 0x46]), // 32 2
    Glyph([0x21, 0x41, 0x45, 0x4b, 0x31]), // 33 3
    Glyph([0x18, 0x14, 0x12, 0x7f, 0x10]), // 34 4
    Glyph([0x27, 0x45, 0x45, 0x45, 0x39]), // 35 5
    Glyph([0x3c, 0x4a, 0x49, 0x49, 0x30]), // 36 6
    Glyph([0x01, 0x71, 0x09, 0x05, 0x03]), // 37 7
    Glyph([0x36, 0x49, 0x49, 0x49, 0x36]), // 38 8
    Glyph([0x06, 0x49, 0x49, 0x29, 0x1e]), // 39 9
    Glyph([0x00, 0x36, 0x36, 0x00, 0x00]), // 3a :
    Glyph([0x00, 0x56, 0x36, 0x00, 0x00]), // 3b ;
    Glyph([0x08, 0x14, 0x22, 0x41, 0x00]), // 3c <
    Glyph([0x14, 0x14, 0x14, 0x14, 0x14]), // 3d =
    Glyph([0x00, 0x41, 0x22, 0x14, 0x08]), // 3e >
    Glyph([0x02, 0x01, 0x51, 0x09, 0x06]), // 3f ?
    Glyph([0x32, 0x49, 0x79, 0x41, 0x3e]), // 40 @
    Glyph([0x7e, 0x11, 0x11, 0x11, 0x7e]), // 41 A
    Glyph([0x7f, 0x49, 0x49, 0x49, 0x36]), // 42 B
    Glyph([0x3e, 0x41, 0x41, 0x41, 0x22]), // 43 C
    Glyph([0x7f, 0x41, 0x41, 0x22, 0x1c]), // 44 D
    Glyph([0x7f, 0x49, 0x49, 0x49, 0x41]), // 45 E
    Glyph([0x7f, 0x09, 0x09, 0x09, 0x01]), // 46 F
    Glyph([0x3e, 0x41, 0x49, 0x49, 0x7a]), // 47 G
    Glyph([0x7f, 0x08, 0x08, 0x08, 0x7f]), // 48 H
    Glyph([0x00, 0x41, 0x7f, 0x41, 0x00]), // 49 I
    Glyph([0x20, 0x40, 0x41, 0x3f, 0x01]), // 4a J
    Glyph([0x7f, 0x08, 0x14, 0x22, 0x41]), // 4b K
    Glyph([0x7f, 0x40, 0x40, 0x40, 0x40]), // 4c L
    Glyph([0x7f, 0x02, 0x0c, 0x02, 0x7f]), // 4d M
    Glyph([0x7f, 0x04, 0x08, 0x10, 0x7f]), // 4e N
    Glyph([0x3e, 0x41, 0x41, 0x41, 0x3e]), // 4f O
    Glyph([0x7f, 0x09, 0x09, 0x09, 0x06]), // 50 P
    Glyph([0x3e, 0x41, 0x51, 0x21, 0x5e]), // 51 Q
    Glyph([0x7f, 0x09, 0x19, 0x29, 0x46]), // 52 R
    Glyph([0x46, 0x49, 0x49, 0x49, 0x31]), // 53 S
    Glyph([0x01, 0x01, 0x7f, 0x01, 0x01]), // 54 T
    Glyph([0x3f, 0x40, 0x40, 0x40, 0x3f]), // 55 U
    Glyph([0x1f, 0x20, 0x40, 0x20, 0x1f]), // 56 V
    Glyph([0x3f, 0x40, 0x38, 0x40, 0x3f]), // 57 W
    Glyph([0x63, 0x14, 0x08, 0x14, 0x63]), // 58 X
    Glyph([0x07, 0x08, 0x70, 0x08, 0x07]), // 59 Y
    Glyph([0x61, 0x51, 0x49, 0x45, 0x43]), // 5a Z
    Glyph([0x00, 0x7f, 0x41, 0x41, 0x00]), // 5b [
    Glyph([0x02, 0x04, 0x08, 0x10, 0x20]), // 5c backslash
    Glyph([0x00, 0x41, 0x41, 0x7f, 0x00]), // 5d ]
    Glyph([0x04, 0x02, 0x01, 0x02, 0x04]), // 5e ^
    Glyph([0x40, 0x40, 0x40, 0x40, 0x40]), // 5f _
    Glyph([0x00, 0x01, 0x02, 0x04, 0x00]), // 60 `
    Glyph([0x20, 0x54, 0x54, 0x54, 0x78]), // 61 a
    Glyph([0x7f, 0x48, 0x44, 0x44, 0x38]), // 62 b
    Glyph([0x38, 0x44, 0x44, 0x44, 0x20]), // 63 c
    Glyph([0x38, 0x44, 0x44, 0x48, 0x7f]), // 64 d
    Glyph([0x38, 0x54, 0x54, 0x54, 0x18]), // 65 e
    Glyph([0x08, 0x7e, 0x09, 0x01, 0x02]), // 66 f
    Glyph([0x0c, 0x52, 0x52, 0x52, 0x3e]), // 67 g
    Glyph([0x7f, 0x08, 0x04, 0x04, 0x78]), // 68 h
    Glyph([0x00, 0x44, 0x7d, 0x40, 0x00]), // 69 i
    Glyph([0x20, 0x40, 0x44, 0x3d, 0x00]), // 6a j
    Glyph([0x7f, 0x10, 0x28, 0x44, 0x00]), // 6b k
    Glyph([0x00, 0x41, 0x7f, 0x40, 0x00]), // 6c l
    Glyph([0x7c, 0x04, 0x18, 0x04, 0x78]), // 6d m
    Glyph([0x7c, 0x08, 0x04, 0x04, 0x78]), // 6e n
    Glyph([0x38, 0x44, 0x44, 0x44, 0x38]), // 6f o
    Glyph([0x7c, 0x14, 0x14, 0x14, 0x08]), // 70 p
    Glyph([0x08, 0x14, 0x14, 0x18, 0x7c]), // 71 q
    Glyph([0x7c, 0x08, 0x04, 0x04, 0x08]), // 72 r
    Glyph([0x48, 0x54, 0x54, 0x54, 0x20]), // 73 s
    Glyph([0x04, 0x3f, 0x44, 0x40, 0x20]), // 74 t
    Glyph([0x3c, 0x40, 0x40, 0x20, 0x7c]), // 75 u
    Glyph([0x1c, 0x20, 0x40, 0x20, 0x1c]), // 76 v
    Glyph([0x3c, 0x40, 0x30, 0x40, 0x3c]), // 77 w
    Glyph([0x44, 0x28, 0x10, 0x28, 0x44]), // 78 x
    Glyph([0x0c, 0x50, 0x50, 0x50, 0x3c]), // 79 y
    Glyph([0x44, 0x64, 0x54, 0x4c, 0x44]), // 7a z
    Glyph([0x00, 0x08, 0x36, 0x41, 0x00]), // 7b {
    Glyph([0x00, 0x00, 0x7f, 0x00, 0x00]), // 7c |
    Glyph([0x00, 0x41, 0x36, 0x08, 0x00]), // 7d }
    Glyph([0x10, 0x08, 0x08, 0x10, 0x08]), // 7e ~
    Glyph([0x78, 0x46, 0x41, 0x46, 0x78]), // 7f DEL
];
