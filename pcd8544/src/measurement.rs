//! Turning sensor readings into display text.
//!
//! Everything here is pure string building; [`crate::Pcd8544`] does the drawing.  Strings live in
//! fixed-capacity `heapless` buffers so nothing allocates.

use heapless::{String, Vec};

use crate::error::TextTooLong;

/// Capacity of the buffer a measurement row is composed in
pub const MAX_TEXT_LEN: usize = 32;

/// Most decimal digits a `u32` can have
pub const MAX_DIGITS: usize = 10;

/// Shown instead of a value that exceeds its measurement's `max_valid`
pub const OUT_OF_RANGE: &str = "OUT OF RANGE";

/// A composed measurement row
pub type Text = String<MAX_TEXT_LEN>;

/// Render `value` as decimal digits, most significant first.  No sign, padding or grouping, and
/// zero is `"0"`.
pub fn format_unsigned(mut value: u32) -> String<MAX_DIGITS> {
    let mut digits = [0u8; MAX_DIGITS];
    let mut len = 0;

    // Peel digits off the bottom, then flip them around
    loop {
        digits[len] = b'0' + (value % 10) as u8;
        len += 1;
        value /= 10;

        if value == 0 {
            break;
        }
    }
    digits[..len].reverse();

    // Always ASCII digits that fit, so the fallback is never taken
    Vec::from_slice(&digits[..len])
        .ok()
        .and_then(|digits| String::from_utf8(digits).ok())
        .unwrap_or_default()
}

/// One reading from a sensor, along with the largest value that sensor can be trusted to report.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement<'a> {
    pub magnitude: u32,
    /// Appended directly after the digits, so include a leading space if you want one
    pub units: &'a str,
    pub max_valid: u32,
}

impl<'a> Measurement<'a> {
    pub fn new(magnitude: u32, units: &'a str, max_valid: u32) -> Self {
        Self {
            magnitude,
            units,
            max_valid,
        }
    }

    /// A reading is shown only when it's no larger than `max_valid`.
    ///
    /// There is no lower bound.  Anything a caller considers too small has to be filtered before
    /// it gets here.
    pub fn is_valid(&self) -> bool {
        self.magnitude <= self.max_valid
    }

    /// Append the digits and units to `text`
    fn write_to(&self, text: &mut Text) -> Result<(), TextTooLong> {
        text.push_str(&format_unsigned(self.magnitude))
            .map_err(|_| TextTooLong)?;
        text.push_str(self.units).map_err(|_| TextTooLong)
    }

    /// The text to show for this measurement alone
    pub fn reading(&self) -> Result<Reading, TextTooLong> {
        if !self.is_valid() {
            return Ok(Reading::OutOfRange);
        }

        let mut text = Text::new();
        self.write_to(&mut text)?;

        Ok(Reading::Value(text))
    }

    /// The text to show for two measurements sharing one row, `"<self> <other>"`.  If either one
    /// is out of range the whole row is.
    pub fn reading_with(&self, other: &Measurement<'_>) -> Result<Reading, TextTooLong> {
        if !self.is_valid() || !other.is_valid() {
            return Ok(Reading::OutOfRange);
        }

        let mut text = Text::new();
        self.write_to(&mut text)?;
        text.push(' ').map_err(|_| TextTooLong)?;
        other.write_to(&mut text)?;

        Ok(Reading::Value(text))
    }
}

/// What a measurement row says
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    Value(Text),
    OutOfRange,
}

impl Reading {
    pub fn as_str(&self) -> &str {
        match self {
            Reading::Value(text) => text.as_str(),
            Reading::OutOfRange => OUT_OF_RANGE,
        }
    }
}

/// Static caption text drawn once, centered on its bank
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Label<'a> {
    pub bank: u8,
    pub text: &'a str,
}

impl<'a> Label<'a> {
    pub const fn new(bank: u8, text: &'a str) -> Self {
        Self { bank, text }
    }
}

pub const DISTANCE_LABEL_BANK: u8 = 1;
/// Bank the distance reading is printed on, just under its caption
pub const DISTANCE_BANK: u8 = 2;
pub const TEMPERATURE_LABEL_BANK: u8 = 3;
/// Bank the temperature reading(s) are printed on, just under their caption
pub const TEMPERATURE_BANK: u8 = 4;

/// The captions for the distance + temperature layout.  Readings go on [`DISTANCE_BANK`] and
/// [`TEMPERATURE_BANK`].
///
/// A distance-only screen would sit one bank lower, on banks 2 and 3.  Both pairs are moved up so
/// the temperature row still fits above the bottom bank.
pub const DEFAULT_LABELS: [Label<'static>; 2] = [
    Label::new(DISTANCE_LABEL_BANK, "DISTANCE:"),
    Label::new(TEMPERATURE_LABEL_BANK, "TEMPERATURE:"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_digits_most_significant_first() {
        assert_eq!("0", format_unsigned(0).as_str());
        assert_eq!("7", format_unsigned(7).as_str());
        assert_eq!("10", format_unsigned(10).as_str());
        assert_eq!("4500", format_unsigned(4500).as_str());
        assert_eq!("65535", format_unsigned(65535).as_str());
        assert_eq!("4294967295", format_unsigned(u32::MAX).as_str());
    }

    #[test]
    fn formatting_round_trips() {
        for n in 0..=65535u32 {
            let text = format_unsigned(n);

            assert!(!text.starts_with('0') || n == 0, "leading zero in {text}");
            assert_eq!(Ok(n), text.parse::<u32>());
        }
    }

    #[test]
    fn single_reading_boundary() {
        let at_limit = Measurement::new(4500, "mm", 4500);
        assert!(at_limit.is_valid());
        assert_eq!("4500mm", at_limit.reading().unwrap().as_str());

        let over_limit = Measurement::new(4501, "mm", 4500);
        assert!(!over_limit.is_valid());
        assert_eq!(Reading::OutOfRange, over_limit.reading().unwrap());
        assert_eq!(OUT_OF_RANGE, over_limit.reading().unwrap().as_str());
    }

    #[test]
    fn zero_is_always_valid() {
        let reading = Measurement::new(0, " cm", 0).reading().unwrap();

        assert_eq!("0 cm", reading.as_str());
    }

    #[test]
    fn dual_reading_joins_with_a_space() {
        let celsius = Measurement::new(25, "C", 158);
        let fahrenheit = Measurement::new(77, "F", 158);

        assert_eq!(
            "25C 77F",
            celsius.reading_with(&fahrenheit).unwrap().as_str()
        );
    }

    #[test]
    fn dual_reading_is_out_of_range_if_either_is() {
        let ok = Measurement::new(158, "F", 158);
        let bad = Measurement::new(159, "F", 158);

        assert_eq!(Reading::OutOfRange, bad.reading_with(&ok).unwrap());
        assert_eq!(Reading::OutOfRange, ok.reading_with(&bad).unwrap());
        assert_eq!(Reading::OutOfRange, bad.reading_with(&bad).unwrap());
    }

    #[test]
    fn oversized_units_are_rejected() {
        let long_units = "                              units";
        assert_eq!(
            Err(TextTooLong),
            Measurement::new(1, long_units, 10).reading()
        );

        // Each half fits, together they don't
        let a = Measurement::new(u32::MAX, "abcdef", u32::MAX);
        let b = Measurement::new(u32::MAX, "ghijkl", u32::MAX);
        assert!(a.reading().is_ok());
        assert_eq!(Err(TextTooLong), a.reading_with(&b));
    }

    #[test]
    fn default_labels_sit_above_their_readings() {
        assert_eq!(DISTANCE_BANK, DEFAULT_LABELS[0].bank + 1);
        assert_eq!(TEMPERATURE_BANK, DEFAULT_LABELS[1].bank + 1);
        assert!(TEMPERATURE_BANK < crate::BANKS - 1);
    }
}
