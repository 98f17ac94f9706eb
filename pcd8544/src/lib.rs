#![cfg_attr(not(test), no_std)]
//! Driver for the PCD8544 controller found on 84x48 monochrome "Nokia 5110" LCD modules, with
//! just enough text layout to put centered labels and sensor readings on screen.
//!
//! The display is six banks of 84 columns, each column being eight vertical pixels.  Every data
//! byte written draws one column and the controller advances to the next column on its own,
//! wrapping into the next bank at the right-hand edge.  Nothing is buffered on this side: text is
//! streamed straight to the controller and the only state kept here is the cursor position.

mod error;
pub mod font;
pub mod layout;
pub mod measurement;
mod transport;

use embedded_hal_1::delay::DelayNs;
use embedded_hal_1::digital::OutputPin;
use embedded_hal_1::spi::SpiDevice;

pub use error::*;
pub use font::{Font, Glyph};
pub use layout::Placement;
pub use measurement::{Label, Measurement, Reading, MAX_TEXT_LEN};
pub use transport::*;

/// Display width in pixels, and so in columns
pub const WIDTH: u8 = 84;

/// Display height in pixels
pub const HEIGHT: u8 = 48;

/// Number of 8 pixel tall banks
pub const BANKS: u8 = HEIGHT / 8;

/// Bytes of display RAM, which is how many zero bytes it takes to blank the whole thing
pub const RAM_BYTES: usize = WIDTH as usize * HEIGHT as usize / 8;

/// The controller's address pointer, as last set through this driver.
///
/// Writing data moves the controller's pointer along without this being updated, so treat this
/// as "where the last explicit addressing command pointed", not as a live position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CursorPosition {
    /// `0..WIDTH`
    pub column: u8,
    /// `0..BANKS`
    pub bank: u8,
}

impl CursorPosition {
    pub const ORIGIN: CursorPosition = CursorPosition { column: 0, bank: 0 };
}

/// Analog settings sent during [`Pcd8544::init`].
///
/// The defaults suit the common red and blue breakout boards at room temperature.  Modules vary
/// quite a bit, so contrast in particular may need tuning.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Operating voltage, `0..=0x7f`
    pub contrast: u8,
    /// `0..=3`
    pub temperature_coefficient: u8,
    /// Bias system, `0..=7`.  4 is the datasheet's recommendation for a 1:48 mux rate.
    pub bias: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contrast: 0x3f,
            temperature_coefficient: 0,
            bias: 4,
        }
    }
}

/// How the controller maps RAM to pixels
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::VariantArray)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// All pixels off, RAM untouched
    Blank,
    /// Set bits are dark pixels
    Normal,
    /// All pixels on, RAM untouched
    AllSegmentsOn,
    /// Set bits are light pixels
    Inverse,
}

pub struct Pcd8544Builder {
    config: Config,
    font: Font,
}

impl Pcd8544Builder {
    /// Override the default [`Config`]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use an arbitrary [`Transport`] implementation; nothing more needs to be specified!
    pub fn with_transport<T: Transport>(self, transport: T) -> Pcd8544Builder2<T> {
        Pcd8544Builder2 {
            config: self.config,
            font: self.font,
            transport,
        }
    }

    /// Use one of the built-in transports, which need a delay for the reset pulse and (for the
    /// bit-banged one) the clock.
    pub fn with_delay<D: DelayNs>(self, delay: D) -> Pcd8544Builder1<D> {
        Pcd8544Builder1 {
            config: self.config,
            font: self.font,
            delay,
        }
    }

    #[cfg(feature = "embassy-time")]
    /// Use the [`DelayNs`] implementation from `embassy-time`
    pub fn with_embassy_delay(self) -> Pcd8544Builder1<EmbassyDelay> {
        self.with_delay(EmbassyDelay)
    }
}

pub struct Pcd8544Builder1<D: DelayNs> {
    config: Config,
    font: Font,
    delay: D,
}

impl<D: DelayNs> Pcd8544Builder1<D> {
    /// Talk to the display through a hardware SPI device.  `mode_select` is the D/C pin.
    pub fn with_spi<SPI: SpiDevice, DC: OutputPin, RST: OutputPin>(
        self,
        spi: SPI,
        mode_select: DC,
        reset: RST,
    ) -> Pcd8544Builder2<SpiTransport<SPI, DC, RST, D>> {
        Pcd8544Builder2 {
            config: self.config,
            font: self.font,
            transport: SpiTransport::new(spi, mode_select, reset, self.delay),
        }
    }

    /// Bit-bang the serial protocol on five GPIO pins.
    ///
    /// This is fallible if the underlying pin implementation is.
    pub fn with_wiring<DIN, CLK, CE, DC, RST>(
        self,
        wiring: Wiring<DIN, CLK, CE, DC, RST>,
    ) -> Result<Pcd8544Builder2<BitBangTransport<DIN, CLK, CE, DC, RST, D>>, TransportError>
    where
        DIN: OutputPin,
        CLK: OutputPin,
        CE: OutputPin,
        DC: OutputPin,
        RST: OutputPin,
    {
        Ok(Pcd8544Builder2 {
            config: self.config,
            font: self.font,
            transport: BitBangTransport::new(wiring, self.delay)?,
        })
    }

    /// Bit-bang the serial protocol on the specified Embassy RP HAL pins
    #[cfg(feature = "embassy-rp")]
    #[allow(clippy::type_complexity)]
    pub fn with_embassy_rp_pins<
        'a,
        DinPin: embassy_rp::gpio::Pin,
        ClkPin: embassy_rp::gpio::Pin,
        CePin: embassy_rp::gpio::Pin,
        DcPin: embassy_rp::gpio::Pin,
        RstPin: embassy_rp::gpio::Pin,
    >(
        self,
        din: DinPin,
        clk: ClkPin,
        ce: CePin,
        dc: DcPin,
        rst: RstPin,
    ) -> Result<
        Pcd8544Builder2<
            BitBangTransport<
                embassy_rp::gpio::Output<'a, DinPin>,
                embassy_rp::gpio::Output<'a, ClkPin>,
                embassy_rp::gpio::Output<'a, CePin>,
                embassy_rp::gpio::Output<'a, DcPin>,
                embassy_rp::gpio::Output<'a, RstPin>,
                D,
            >,
        >,
        TransportError,
    > {
        self.with_wiring(EmbassyRpWiring::from_pins(din, clk, ce, dc, rst))
    }
}

pub struct Pcd8544Builder2<T: Transport> {
    config: Config,
    font: Font,
    transport: T,
}

impl<T: Transport> Pcd8544Builder2<T> {
    /// Construct the [`Pcd8544`] instance using the selected transport.  The display isn't
    /// touched until [`Pcd8544::init`].
    pub fn build(self) -> Pcd8544<T> {
        Pcd8544::new(self.transport, self.font, self.config)
    }
}

/// Driver for the PCD8544 LCD controller.
///
/// The implementation is generalized over the serial link, behind the [`Transport`] trait, and
/// over the [`Font`] text is drawn with.
///
/// The most straightforward way to instantiate this driver is using [`Self::builder`]:
///
/// ```ignore
/// let p = embassy_rp::init(Default::default());
/// let mut lcd = pcd8544::Pcd8544::builder()
///     .with_embassy_delay()
///     .with_embassy_rp_pins(p.PIN_11, p.PIN_10, p.PIN_13, p.PIN_12, p.PIN_14)
///     .unwrap()
///     .build();
/// lcd.init().unwrap();
/// lcd.set_bank(2).unwrap();
/// lcd.print_centered("HELLO").unwrap();
/// ```
pub struct Pcd8544<T> {
    transport: T,
    font: Font,
    config: Config,
    cursor: CursorPosition,
}

impl Pcd8544<()> {
    /// Return a builder using the built-in ASCII font and default [`Config`]
    #[cfg(feature = "ascii-font")]
    pub fn builder() -> Pcd8544Builder {
        Self::builder_with_font(font::ASCII)
    }

    /// Return a builder that draws text with `font`
    pub fn builder_with_font(font: Font) -> Pcd8544Builder {
        Pcd8544Builder {
            config: Config::default(),
            font,
        }
    }
}

impl<T: Transport> Pcd8544<T> {
    pub fn new(transport: T, font: Font, config: Config) -> Self {
        Self {
            transport,
            font,
            config,
            cursor: CursorPosition::ORIGIN,
        }
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.transport
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Reset the controller, configure it, and blank the display.
    ///
    /// Safe to call again at any point to start over.
    pub fn init(&mut self) -> Result<(), Error<T::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("initializing PCD8544 with {}", self.config);

        self.transport.reset().map_err(Error::Transport)?;

        let config = self.config;
        self.send_command(Command::FunctionSet { extended: true })?;
        self.send_command(Command::SetContrast(config.contrast))?;
        self.send_command(Command::SetTemperatureCoefficient(
            config.temperature_coefficient,
        ))?;
        self.send_command(Command::SetBias(config.bias))?;
        self.send_command(Command::FunctionSet { extended: false })?;
        self.send_command(Command::SetDisplayMode(DisplayMode::Normal))?;

        self.clear()
    }

    /// Move to `column` in the current bank.  Columns past the right-hand edge are ignored.
    pub fn set_column(&mut self, column: u8) -> Result<(), Error<T::Error>> {
        if column >= WIDTH {
            #[cfg(feature = "defmt")]
            defmt::trace!("ignoring out of range column {=u8}", column);
            return Ok(());
        }

        self.send_command(Command::SetColumn(column))?;
        self.cursor.column = column;

        Ok(())
    }

    /// Move to `bank` in the current column.  Banks past the bottom edge are ignored.
    pub fn set_bank(&mut self, bank: u8) -> Result<(), Error<T::Error>> {
        if bank >= BANKS {
            #[cfg(feature = "defmt")]
            defmt::trace!("ignoring out of range bank {=u8}", bank);
            return Ok(());
        }

        self.send_command(Command::SetBank(bank))?;
        self.cursor.bank = bank;

        Ok(())
    }

    /// Move to `column` in `bank`.  If either is out of range nothing moves.
    pub fn set_position(&mut self, column: u8, bank: u8) -> Result<(), Error<T::Error>> {
        if column >= WIDTH || bank >= BANKS {
            return Ok(());
        }

        self.set_bank(bank)?;
        self.set_column(column)
    }

    /// Move to the top left corner
    pub fn reset_cursor(&mut self) -> Result<(), Error<T::Error>> {
        self.set_column(0)?;
        self.set_bank(0)
    }

    /// Blank all of display RAM.
    ///
    /// Writing every byte wraps the controller's pointer all the way around, so it's back at the
    /// top left corner afterwards, matching [`Self::cursor`].
    pub fn clear(&mut self) -> Result<(), Error<T::Error>> {
        self.reset_cursor()?;

        self.write_zeros(RAM_BYTES)
    }

    /// Blank `bank` from `from_column` to the right-hand edge.  Out of range coordinates are
    /// ignored, like they are for [`Self::set_position`].
    pub fn clear_row(&mut self, bank: u8, from_column: u8) -> Result<(), Error<T::Error>> {
        if bank >= BANKS || from_column >= WIDTH {
            return Ok(());
        }

        self.set_bank(bank)?;
        self.set_column(from_column)?;

        self.write_zeros((WIDTH - from_column) as usize)
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) -> Result<(), Error<T::Error>> {
        self.send_command(Command::SetDisplayMode(mode))
    }

    /// Light text on a dark background
    pub fn invert(&mut self) -> Result<(), Error<T::Error>> {
        self.set_display_mode(DisplayMode::Inverse)
    }

    /// Dark text on a light background
    pub fn normal(&mut self) -> Result<(), Error<T::Error>> {
        self.set_display_mode(DisplayMode::Normal)
    }

    /// Draw one column of eight pixels at the controller's current address
    pub fn write_data_byte(&mut self, value: u8) -> Result<(), Error<T::Error>> {
        self.transport
            .send_byte(value, ByteKind::Data)
            .map_err(Error::Transport)
    }

    /// Send a raw instruction byte.
    ///
    /// This bypasses the cursor bookkeeping, so addressing through here leaves
    /// [`Self::cursor`] stale.
    pub fn write_command_byte(&mut self, value: u8) -> Result<(), Error<T::Error>> {
        self.transport
            .send_byte(value, ByteKind::Command)
            .map_err(Error::Transport)
    }

    /// Draw a single character at the controller's current address
    pub fn print_char(&mut self, c: char) -> Result<(), Error<T::Error>> {
        let glyph = self.font.glyph(c).ok_or(Error::UnknownCharacter(c))?;

        self.render_glyph(glyph)
    }

    /// Draw `text` at the controller's current address.
    ///
    /// Every character is checked against the font first, so if this fails with
    /// [`Error::UnknownCharacter`] nothing has been drawn.
    pub fn print_str(&mut self, text: &str) -> Result<(), Error<T::Error>> {
        layout::measure_width(&self.font, text)?;

        self.render_str(text)
    }

    /// Draw every glyph in the font, in table order, from the current address.  Handy for
    /// checking a font on real hardware.
    pub fn print_all_glyphs(&mut self) -> Result<(), Error<T::Error>> {
        let font = self.font;

        for c in font.chars() {
            self.print_char(c)?;
        }

        Ok(())
    }

    /// Draw `text` horizontally centered in the current bank.
    ///
    /// Text too wide for the display is drawn from column 0 and reported as
    /// [`Placement::Overflow`].
    pub fn print_centered(&mut self, text: &str) -> Result<Placement, Error<T::Error>> {
        let width = layout::measure_width(&self.font, text)?;

        self.render_centered(text, width)
    }

    /// Blank `bank` and draw `reading` centered in it.
    ///
    /// A bank past the bottom edge leaves the display untouched and returns `None`.
    pub fn print_reading(
        &mut self,
        bank: u8,
        reading: &Reading,
    ) -> Result<Option<Placement>, Error<T::Error>> {
        let text = reading.as_str();
        // Check the glyphs before blanking, so a bad unit string doesn't leave an empty row
        let width = layout::measure_width(&self.font, text)?;

        if bank >= BANKS {
            #[cfg(feature = "defmt")]
            defmt::warn!("not drawing {=str} on missing bank {=u8}", text, bank);
            return Ok(None);
        }

        self.clear_row(bank, 0)?;
        self.set_bank(bank)?;

        self.render_centered(text, width).map(Some)
    }

    /// Show one measurement centered on `bank`, or "OUT OF RANGE" if it exceeds its `max_valid`.
    pub fn print_measurement(
        &mut self,
        bank: u8,
        measurement: &Measurement<'_>,
    ) -> Result<Option<Placement>, Error<T::Error>> {
        let reading = measurement.reading()?;

        self.print_reading(bank, &reading)
    }

    /// Show two measurements as a single centered row, `"<first> <second>"`.  If either is out of
    /// range the row says "OUT OF RANGE" instead.
    pub fn print_dual_measurement(
        &mut self,
        bank: u8,
        first: &Measurement<'_>,
        second: &Measurement<'_>,
    ) -> Result<Option<Placement>, Error<T::Error>> {
        let reading = first.reading_with(second)?;

        self.print_reading(bank, &reading)
    }

    /// Blank the display and draw the static captions, each centered on its own bank.
    ///
    /// Labels on banks that don't exist are skipped.
    pub fn setup_labels(&mut self, labels: &[Label<'_>]) -> Result<(), Error<T::Error>> {
        for label in labels {
            layout::measure_width(&self.font, label.text)?;
        }

        self.clear()?;

        for label in labels {
            if label.bank >= BANKS {
                #[cfg(feature = "defmt")]
                defmt::warn!("skipping label {=str} on bank {=u8}", label.text, label.bank);
                continue;
            }

            self.set_bank(label.bank)?;
            self.print_centered(label.text)?;
        }

        Ok(())
    }

    fn render_centered(&mut self, text: &str, width: usize) -> Result<Placement, Error<T::Error>> {
        let placement = layout::center(width);

        #[cfg(feature = "defmt")]
        if let Placement::Overflow { width } = placement {
            defmt::warn!("{=str} is {=usize} columns wide, drawing from the left edge", text, width);
        }

        self.set_column(placement.column())?;
        self.render_str(text)?;

        Ok(placement)
    }

    /// Draw text that has already been checked against the font
    fn render_str(&mut self, text: &str) -> Result<(), Error<T::Error>> {
        for c in text.chars() {
            self.print_char(c)?;
        }

        Ok(())
    }

    fn render_glyph(&mut self, glyph: Glyph) -> Result<(), Error<T::Error>> {
        for column in glyph.render_columns() {
            self.write_data_byte(column)?;
        }

        Ok(())
    }

    fn write_zeros(&mut self, count: usize) -> Result<(), Error<T::Error>> {
        for _ in 0..count {
            self.write_data_byte(0x00)?;
        }

        Ok(())
    }

    fn send_command(&mut self, command: Command) -> Result<(), Error<T::Error>> {
        let command_byte = command.encode();

        #[cfg(feature = "defmt")]
        defmt::trace!("command byte = {=u8:x}", command_byte);

        self.write_command_byte(command_byte)
    }
}

/// Instructions understood by the PCD8544, as Rust enums for greater readability.
///
/// Some opcodes mean different things depending on which instruction set is active:
/// [`Command::SetContrast`] and [`Command::SetColumn`] share `0x80`, and only
/// [`Command::FunctionSet`] switches between them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    /// Power on, horizontal addressing, and select the basic or extended instruction set
    FunctionSet { extended: bool },

    /// Extended set.  Operating voltage, which is what contrast means on this controller
    SetContrast(u8),

    /// Extended set
    SetTemperatureCoefficient(u8),

    /// Extended set
    SetBias(u8),

    /// Basic set
    SetDisplayMode(DisplayMode),

    /// Basic set.  X address, `0..WIDTH`
    SetColumn(u8),

    /// Basic set.  Y address, `0..BANKS`
    SetBank(u8),
}

impl Command {
    /// Convert this command into the byte to send to the controller.  Values are masked to the
    /// width of their field.
    fn encode(&self) -> u8 {
        match self {
            Command::FunctionSet { extended } => 0b0010_0000 | *extended as u8,
            Command::SetContrast(vop) => 0b1000_0000 | (vop & 0b0111_1111),
            Command::SetTemperatureCoefficient(tc) => 0b0000_0100 | (tc & 0b0000_0011),
            Command::SetBias(bias) => 0b0001_0000 | (bias & 0b0000_0111),
            Command::SetDisplayMode(mode) => match mode {
                DisplayMode::Blank => 0b0000_1000,
                DisplayMode::AllSegmentsOn => 0b0000_1001,
                DisplayMode::Normal => 0b0000_1100,
                DisplayMode::Inverse => 0b0000_1101,
            },
            Command::SetColumn(x) => 0b1000_0000 | (x & 0b0111_1111),
            Command::SetBank(y) => 0b0100_0000 | (y & 0b0000_0111),
        }
    }
}

#[cfg(all(test, feature = "ascii-font"))]
mod tests {
    use super::*;
    use crate::measurement::{DEFAULT_LABELS, OUT_OF_RANGE};
    use core::convert::Infallible;
    use strum::VariantArray;

    const STARTUP: [u8; 6] = [0x21, 0xbf, 0x04, 0x14, 0x20, 0x0c];

    /// Records every byte sent, in order
    #[derive(Default)]
    struct RecordingTransport {
        bytes: Vec<(ByteKind, u8)>,
        resets: usize,
    }

    impl Transport for RecordingTransport {
        type Error = Infallible;

        fn reset(&mut self) -> Result<(), Self::Error> {
            self.resets += 1;
            Ok(())
        }

        fn send_byte(&mut self, value: u8, kind: ByteKind) -> Result<(), Self::Error> {
            self.bytes.push((kind, value));
            Ok(())
        }
    }

    /// Accepts `remaining` bytes and then fails every transfer
    struct FlakyTransport {
        remaining: usize,
    }

    impl Transport for FlakyTransport {
        type Error = &'static str;

        fn reset(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn send_byte(&mut self, _value: u8, _kind: ByteKind) -> Result<(), Self::Error> {
            if self.remaining == 0 {
                return Err("link down");
            }
            self.remaining -= 1;
            Ok(())
        }
    }

    fn lcd() -> Pcd8544<RecordingTransport> {
        Pcd8544::builder()
            .with_transport(RecordingTransport::default())
            .build()
    }

    /// Take the recorded bytes, leaving the log empty
    fn take(lcd: &mut Pcd8544<RecordingTransport>) -> Vec<(ByteKind, u8)> {
        core::mem::take(&mut lcd.transport.bytes)
    }

    fn commands(bytes: &[u8]) -> Vec<(ByteKind, u8)> {
        bytes.iter().map(|b| (ByteKind::Command, *b)).collect()
    }

    fn data(bytes: &[u8]) -> Vec<(ByteKind, u8)> {
        bytes.iter().map(|b| (ByteKind::Data, *b)).collect()
    }

    /// The data bytes `text` renders to in the ASCII font
    fn columns(text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|c| font::ASCII.glyph(c).unwrap().render_columns())
            .collect()
    }

    /// Expected traffic for blanking `bank` and then drawing `text` centered at `column`
    fn row(bank: u8, column: u8, text: &str) -> Vec<(ByteKind, u8)> {
        let mut expected = commands(&[0x40 | bank, 0x80]);
        expected.extend(data(&[0x00; WIDTH as usize]));
        expected.extend(commands(&[0x40 | bank, 0x80 | column]));
        expected.extend(data(&columns(text)));
        expected
    }

    #[test]
    fn init_sends_startup_sequence_then_clears() {
        let mut lcd = lcd();
        lcd.init().unwrap();

        assert_eq!(1, lcd.transport.resets);

        let mut expected = commands(&STARTUP);
        expected.extend(commands(&[0x80, 0x40]));
        expected.extend(data(&[0x00; RAM_BYTES]));
        assert_eq!(expected, take(&mut lcd));
        assert_eq!(CursorPosition::ORIGIN, lcd.cursor());
    }

    #[test]
    fn init_is_repeatable() {
        let mut lcd = lcd();
        lcd.init().unwrap();
        let first = take(&mut lcd);

        lcd.set_position(30, 4).unwrap();
        take(&mut lcd);

        lcd.init().unwrap();
        assert_eq!(first, take(&mut lcd));
        assert_eq!(2, lcd.transport.resets);
    }

    #[test]
    fn config_is_masked_into_startup_bytes() {
        let config = Config {
            contrast: 0xff,
            temperature_coefficient: 2,
            bias: 3,
        };
        let mut lcd = Pcd8544::builder()
            .config(config)
            .with_transport(RecordingTransport::default())
            .build();
        lcd.init().unwrap();

        assert_eq!(
            commands(&[0x21, 0xff, 0x06, 0x13, 0x20, 0x0c]),
            take(&mut lcd)[..6]
        );
    }

    #[test]
    fn addressing() {
        let mut lcd = lcd();

        lcd.set_column(83).unwrap();
        lcd.set_bank(5).unwrap();

        assert_eq!(commands(&[0xd3, 0x45]), take(&mut lcd));
        assert_eq!(CursorPosition { column: 83, bank: 5 }, lcd.cursor());
    }

    #[test]
    fn out_of_range_addressing_is_a_no_op() {
        let mut lcd = lcd();
        lcd.set_position(17, 3).unwrap();
        take(&mut lcd);
        let before = lcd.cursor();

        lcd.set_column(84).unwrap();
        lcd.set_bank(6).unwrap();
        lcd.set_column(u8::MAX).unwrap();
        lcd.set_bank(u8::MAX).unwrap();
        lcd.set_position(84, 0).unwrap();
        lcd.set_position(0, 6).unwrap();

        assert_eq!(before, lcd.cursor());
        assert!(take(&mut lcd).is_empty());
    }

    #[test]
    fn clear_always_writes_all_of_ram() {
        let mut lcd = lcd();

        for (column, bank) in [(0, 0), (40, 3), (83, 5)] {
            lcd.set_position(column, bank).unwrap();
            take(&mut lcd);

            lcd.clear().unwrap();

            let bytes = take(&mut lcd);
            let data_bytes = bytes.iter().filter(|(kind, _)| *kind == ByteKind::Data);
            assert_eq!(RAM_BYTES, data_bytes.clone().count());
            assert!(data_bytes.into_iter().all(|(_, b)| *b == 0x00));
            assert_eq!(CursorPosition::ORIGIN, lcd.cursor());
        }
    }

    #[test]
    fn clear_row_blanks_to_the_right_edge() {
        let mut lcd = lcd();

        lcd.clear_row(3, 10).unwrap();

        let mut expected = commands(&[0x43, 0x8a]);
        expected.extend(data(&[0x00; 74]));
        assert_eq!(expected, take(&mut lcd));
        assert_eq!(CursorPosition { column: 10, bank: 3 }, lcd.cursor());

        lcd.clear_row(6, 0).unwrap();
        lcd.clear_row(0, 84).unwrap();
        assert!(take(&mut lcd).is_empty());
    }

    #[test]
    fn display_modes() {
        let mut lcd = lcd();

        for mode in DisplayMode::VARIANTS {
            lcd.set_display_mode(*mode).unwrap();
        }
        lcd.invert().unwrap();
        lcd.normal().unwrap();

        assert_eq!(
            commands(&[0x08, 0x0c, 0x09, 0x0d, 0x0d, 0x0c]),
            take(&mut lcd)
        );
    }

    #[test]
    fn characters_are_kerned_only_where_inked() {
        let mut lcd = lcd();

        // Blank first and last columns
        lcd.print_char('I').unwrap();
        assert_eq!(data(&[0x00, 0x41, 0x7f, 0x41, 0x00]), take(&mut lcd));

        // Ink on both edges
        lcd.print_char('M').unwrap();
        assert_eq!(
            data(&[0x00, 0x7f, 0x02, 0x0c, 0x02, 0x7f, 0x00]),
            take(&mut lcd)
        );
    }

    #[test]
    fn unknown_characters_draw_nothing() {
        let mut lcd = lcd();

        assert_eq!(Err(Error::UnknownCharacter('é')), lcd.print_char('é'));
        assert_eq!(Err(Error::UnknownCharacter('\n')), lcd.print_str("OK\n"));
        assert_eq!(
            Err(Error::UnknownCharacter('°')),
            lcd.print_centered("25°C")
        );

        assert!(take(&mut lcd).is_empty());
    }

    #[test]
    fn print_all_glyphs_renders_the_whole_table() {
        let mut lcd = lcd();

        lcd.print_all_glyphs().unwrap();

        let expected: Vec<u8> = font::ASCII
            .chars()
            .flat_map(|c| font::ASCII.glyph(c).unwrap().render_columns())
            .collect();
        assert_eq!(data(&expected), take(&mut lcd));
    }

    #[test]
    fn centering_is_the_same_on_every_bank() {
        let mut lcd = lcd();

        for bank in 0..BANKS {
            lcd.set_bank(bank).unwrap();
            take(&mut lcd);

            let placement = lcd.print_centered("HELLO").unwrap();

            let bytes = take(&mut lcd);
            assert_eq!((ByteKind::Command, 0x80 | placement.column()), bytes[0]);
            assert_eq!(layout::center(35), placement);
            assert_eq!(data(&columns("HELLO")), bytes[1..]);
        }
    }

    #[test]
    fn overly_wide_text_starts_at_the_left_edge() {
        let mut lcd = lcd();

        let placement = lcd.print_centered("MMMMMMMMMMMMM").unwrap();

        assert_eq!(Placement::Overflow { width: 91 }, placement);
        assert_eq!((ByteKind::Command, 0x80), take(&mut lcd)[0]);
    }

    #[test]
    fn measurement_at_its_limit_is_shown() {
        let mut lcd = lcd();

        let placement = lcd
            .print_measurement(2, &Measurement::new(4500, "mm", 4500))
            .unwrap();

        assert_eq!(Some(Placement::Centered { column: 21, width: 42 }), placement);
        assert_eq!(row(2, 21, "4500mm"), take(&mut lcd));
    }

    #[test]
    fn measurement_past_its_limit_is_out_of_range() {
        let mut lcd = lcd();

        let placement = lcd
            .print_measurement(2, &Measurement::new(4501, "mm", 4500))
            .unwrap();

        assert_eq!(Some(Placement::Centered { column: 2, width: 80 }), placement);
        assert_eq!(row(2, 2, OUT_OF_RANGE), take(&mut lcd));
    }

    #[test]
    fn dual_measurement_is_centered_as_one_string() {
        let mut lcd = lcd();

        let placement = lcd
            .print_dual_measurement(
                4,
                &Measurement::new(25, "C", 158),
                &Measurement::new(77, "F", 158),
            )
            .unwrap()
            .unwrap();

        assert_eq!(
            layout::measure_width(&font::ASCII, "25C 77F"),
            Ok(placement.width())
        );
        assert_eq!(Placement::Centered { column: 18, width: 47 }, placement);
        assert_eq!(row(4, 18, "25C 77F"), take(&mut lcd));
    }

    #[test]
    fn dual_measurement_with_one_bad_value() {
        let mut lcd = lcd();

        lcd.print_dual_measurement(
            4,
            &Measurement::new(25, "C", 158),
            &Measurement::new(159, "F", 158),
        )
        .unwrap();

        assert_eq!(row(4, 2, OUT_OF_RANGE), take(&mut lcd));
    }

    #[test]
    fn bad_units_leave_the_row_alone() {
        let mut lcd = lcd();

        assert_eq!(
            Err(Error::UnknownCharacter('°')),
            lcd.print_measurement(4, &Measurement::new(21, "°C", 100))
        );
        assert!(take(&mut lcd).is_empty());
    }

    #[test]
    fn measurements_on_missing_banks_draw_nothing() {
        let mut lcd = lcd();
        lcd.set_position(0, 2).unwrap();
        take(&mut lcd);

        assert_eq!(
            Ok(None),
            lcd.print_measurement(BANKS, &Measurement::new(12, "mm", 4500))
        );
        assert_eq!(
            Ok(None),
            lcd.print_dual_measurement(
                9,
                &Measurement::new(25, "C", 158),
                &Measurement::new(77, "F", 158),
            )
        );

        assert!(take(&mut lcd).is_empty());
        assert_eq!(CursorPosition { column: 0, bank: 2 }, lcd.cursor());
    }

    #[test]
    fn labels_are_drawn_after_a_full_clear() {
        let mut lcd = lcd();

        lcd.setup_labels(&DEFAULT_LABELS).unwrap();

        let mut expected = commands(&[0x80, 0x40]);
        expected.extend(data(&[0x00; RAM_BYTES]));
        expected.extend(commands(&[0x41, 0x80 | 12]));
        expected.extend(data(&columns("DISTANCE:")));
        expected.extend(commands(&[0x43, 0x80 | 1]));
        expected.extend(data(&columns("TEMPERATURE:")));
        assert_eq!(expected, take(&mut lcd));
    }

    #[test]
    fn labels_on_missing_banks_are_skipped() {
        let mut lcd = lcd();

        lcd.setup_labels(&[Label::new(9, "NOPE"), Label::new(0, "OK")])
            .unwrap();

        let bytes = take(&mut lcd);
        let mut expected = commands(&[0x40, 0x80 | 35]);
        expected.extend(data(&columns("OK")));
        assert_eq!(expected, bytes[2 + RAM_BYTES..]);
    }

    #[test]
    fn transport_errors_propagate() {
        let mut lcd = Pcd8544::builder()
            .with_transport(FlakyTransport { remaining: 3 })
            .build();

        assert_eq!(Err(Error::Transport("link down")), lcd.init());

        // Failed before the column was acknowledged, so the cursor wasn't moved
        let mut lcd = Pcd8544::builder()
            .with_transport(FlakyTransport { remaining: 0 })
            .build();
        assert_eq!(Err(Error::Transport("link down")), lcd.set_column(5));
        assert_eq!(CursorPosition::ORIGIN, lcd.cursor());
    }
}
