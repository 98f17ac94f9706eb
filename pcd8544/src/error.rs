use core::fmt;

/// Errors returned by [`crate::Pcd8544`] operations.
///
/// `E` is the error type of whatever [`crate::Transport`] the driver was built with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The transport failed to move a byte to the controller
    Transport(E),

    /// The font has no glyph for this character.  Text is checked before anything is sent, so
    /// the display has not been touched.
    UnknownCharacter(char),

    /// A composed string did not fit in [`crate::MAX_TEXT_LEN`] bytes
    TextTooLong,
}

/// A character with no glyph in the font in use
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCharacter(pub char);

impl<E> From<UnknownCharacter> for Error<E> {
    fn from(UnknownCharacter(c): UnknownCharacter) -> Self {
        Error::UnknownCharacter(c)
    }
}

impl fmt::Display for UnknownCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no glyph for character {:?}", self.0)
    }
}

/// A composed string outgrew its fixed-capacity buffer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextTooLong;

impl<E> From<TextTooLong> for Error<E> {
    fn from(_: TextTooLong) -> Self {
        Error::TextTooLong
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "transport error: {e:?}"),
            Error::UnknownCharacter(c) => fmt::Display::fmt(&UnknownCharacter(*c), f),
            Error::TextTooLong => write!(f, "text does not fit in the formatting buffer"),
        }
    }
}
