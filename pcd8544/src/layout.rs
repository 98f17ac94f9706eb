//! Horizontal text layout.
//!
//! Layout works in columns, the same unit the controller addresses.  Banks are left alone: the
//! caller picks the bank, layout only decides where in it the text starts.

use crate::error::UnknownCharacter;
use crate::font::Font;
use crate::WIDTH;

/// Where a piece of centered text ended up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Placement {
    /// The text fits and starts at `column`
    Centered { column: u8, width: usize },

    /// The text is wider than the display.  It's drawn from column 0 and whatever doesn't fit
    /// wraps into the next bank, courtesy of the controller's address auto-increment.
    Overflow { width: usize },
}

impl Placement {
    /// Column the first glyph is drawn at
    pub fn column(&self) -> u8 {
        match self {
            Placement::Centered { column, .. } => *column,
            Placement::Overflow { .. } => 0,
        }
    }

    /// Total rendered width of the text, kerning included
    pub fn width(&self) -> usize {
        match self {
            Placement::Centered { width, .. } | Placement::Overflow { width } => *width,
        }
    }
}

/// Count the columns `text` occupies when drawn with `font`: five per glyph, plus one for each
/// kerning column.
///
/// Fails on the first character the font can't draw.
pub fn measure_width(font: &Font, text: &str) -> Result<usize, UnknownCharacter> {
    text.chars().try_fold(0, |width, c| {
        let glyph = font.glyph(c).ok_or(UnknownCharacter(c))?;

        Ok(width + glyph.rendered_width())
    })
}

/// Work out the starting column that centers `width` columns on the display.
///
/// Odd amounts of spare room leave the extra column on the right.
pub fn center(width: usize) -> Placement {
    match (WIDTH as usize).checked_sub(width) {
        Some(spare) => Placement::Centered {
            column: (spare / 2) as u8,
            width,
        },
        None => Placement::Overflow { width },
    }
}
