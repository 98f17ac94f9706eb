//! Module describing the [`Transport`] trait and the implementations built on Embedded HAL.

use embedded_hal_1::delay::DelayNs;
use embedded_hal_1::digital::{self, OutputPin};
use embedded_hal_1::spi::{self, SpiDevice};

/// How long the reset line is held low when the controller is brought up
pub const RESET_PULSE_MS: u32 = 100;

/// Half of one clock period on the bit-banged link.  The PCD8544 accepts up to 4MHz, this runs
/// well under that so slow GPIO doesn't matter.
pub const CLOCK_HALF_PERIOD_NS: u32 = 250;

/// Which side of the command/data selector a byte is sent on.
///
/// The PCD8544 samples its D/C line on the last bit of each byte: low means the byte is an
/// instruction, high means it's a column of pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteKind {
    Command,
    Data,
}

/// The byte-serial link to a PCD8544, likely in terms of some platform-specific HAL.
///
/// Implementations own the physical wiring.  Every call to [`Self::send_byte`] must be framed by
/// asserting chip-select before the byte and releasing it once the byte has been fully clocked
/// out; the driver never issues overlapping transfers.
///
/// A transport may block until the byte is out.  Whether it gives up after some bound is its own
/// business, the driver only sees the `Result`.
pub trait Transport {
    type Error;

    /// Pulse the controller's reset line.  The controller's RAM and registers are undefined
    /// afterwards, so this is always followed by the startup command sequence.
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Send a single byte with the command/data selector set according to `kind`
    fn send_byte(&mut self, value: u8, kind: ByteKind) -> Result<(), Self::Error>;
}

/// Failure reported by the built-in transports
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    Spi(spi::ErrorKind),
    Pin(digital::ErrorKind),
}

fn pin_error<E: digital::Error>(e: E) -> TransportError {
    TransportError::Pin(e.kind())
}

fn spi_error<E: spi::Error>(e: E) -> TransportError {
    TransportError::Spi(e.kind())
}

/// Drive the D/C line for a byte of the given kind
fn select<P: OutputPin>(mode_select: &mut P, kind: ByteKind) -> Result<(), TransportError> {
    let result = match kind {
        ByteKind::Command => mode_select.set_low(),
        ByteKind::Data => mode_select.set_high(),
    };

    result.map_err(pin_error)
}

/// [`Transport`] over a hardware SPI peripheral.
///
/// The [`SpiDevice`] owns the data and clock lines plus chip-select, and frames every byte as its
/// own transaction.  Configure it for mode 0, MSB first, no faster than 4MHz.
pub struct SpiTransport<SPI, DC, RST, D> {
    spi: SPI,
    /// Data/command selector, low for commands
    mode_select: DC,
    /// Active-low reset
    reset: RST,
    delay: D,
}

impl<SPI, DC, RST, D> SpiTransport<SPI, DC, RST, D> {
    pub fn new(spi: SPI, mode_select: DC, reset: RST, delay: D) -> Self {
        Self {
            spi,
            mode_select,
            reset,
            delay,
        }
    }

    /// Give back the peripherals this transport was built from
    pub fn release(self) -> (SPI, DC, RST, D) {
        (self.spi, self.mode_select, self.reset, self.delay)
    }
}

impl<SPI, DC, RST, D> Transport for SpiTransport<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    type Error = TransportError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.reset.set_low().map_err(pin_error)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.reset.set_high().map_err(pin_error)
    }

    fn send_byte(&mut self, value: u8, kind: ByteKind) -> Result<(), Self::Error> {
        select(&mut self.mode_select, kind)?;

        self.spi.write(&[value]).map_err(spi_error)
    }
}

/// The five lines connecting the PCD8544, for use with [`BitBangTransport`]
#[derive(Debug)]
pub struct Wiring<DIN, CLK, CE, DC, RST> {
    /// Serial data in (from the controller's point of view)
    pub data: DIN,
    pub clock: CLK,
    /// Active-low chip enable
    pub chip_select: CE,
    /// D/C, low for commands and high for data
    pub mode_select: DC,
    /// Active-low reset
    pub reset: RST,
}

/// [`Transport`] that bit-bangs the serial protocol on five plain output pins, for boards where
/// the display isn't hooked up to an SPI peripheral.
pub struct BitBangTransport<DIN, CLK, CE, DC, RST, D> {
    wiring: Wiring<DIN, CLK, CE, DC, RST>,
    delay: D,
}

impl<DIN, CLK, CE, DC, RST, D> BitBangTransport<DIN, CLK, CE, DC, RST, D>
where
    DIN: OutputPin,
    CLK: OutputPin,
    CE: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the pins and put the link in its idle state: chip deselected, clock
    /// low, reset released.
    pub fn new(wiring: Wiring<DIN, CLK, CE, DC, RST>, delay: D) -> Result<Self, TransportError> {
        let mut me = Self { wiring, delay };

        me.wiring.chip_select.set_high().map_err(pin_error)?;
        me.wiring.clock.set_low().map_err(pin_error)?;
        me.wiring.reset.set_high().map_err(pin_error)?;

        Ok(me)
    }

    /// Give back the pins and delay this transport was built from
    pub fn release(self) -> (Wiring<DIN, CLK, CE, DC, RST>, D) {
        (self.wiring, self.delay)
    }

    /// Shift the byte value out on the data pin, MSB first.  The controller samples on the rising
    /// edge of the clock.
    fn shift_byte_out(&mut self, b: u8) -> Result<(), TransportError> {
        for bit in (0..8).rev() {
            let value = (b >> bit) & 0x01 != 0;

            let result = if value {
                self.wiring.data.set_high()
            } else {
                self.wiring.data.set_low()
            };
            result.map_err(pin_error)?;

            self.delay.delay_ns(CLOCK_HALF_PERIOD_NS);
            self.wiring.clock.set_high().map_err(pin_error)?;
            self.delay.delay_ns(CLOCK_HALF_PERIOD_NS);
            self.wiring.clock.set_low().map_err(pin_error)?;
        }

        Ok(())
    }
}

impl<DIN, CLK, CE, DC, RST, D> Transport for BitBangTransport<DIN, CLK, CE, DC, RST, D>
where
    DIN: OutputPin,
    CLK: OutputPin,
    CE: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    type Error = TransportError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.wiring.reset.set_low().map_err(pin_error)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.wiring.reset.set_high().map_err(pin_error)
    }

    fn send_byte(&mut self, value: u8, kind: ByteKind) -> Result<(), Self::Error> {
        select(&mut self.wiring.mode_select, kind)?;

        self.wiring.chip_select.set_low().map_err(pin_error)?;
        let result = self.shift_byte_out(value);
        // Release chip select even if shifting failed part way, so the next byte starts clean
        self.wiring.chip_select.set_high().map_err(pin_error)?;

        result
    }
}

#[cfg(feature = "embassy-time")]
pub use embassy_time::Delay as EmbassyDelay;

#[cfg(feature = "embassy-rp")]
mod embassy_rp_wiring {
    use embassy_rp::gpio::{self, Level, Output};

    /// [`super::Wiring`] made of Embassy RP HAL output pins
    pub type EmbassyRpWiring<'a, DinPin, ClkPin, CePin, DcPin, RstPin> = super::Wiring<
        Output<'a, DinPin>,
        Output<'a, ClkPin>,
        Output<'a, CePin>,
        Output<'a, DcPin>,
        Output<'a, RstPin>,
    >;

    impl<
            'a,
            DinPin: gpio::Pin,
            ClkPin: gpio::Pin,
            CePin: gpio::Pin,
            DcPin: gpio::Pin,
            RstPin: gpio::Pin,
        > EmbassyRpWiring<'a, DinPin, ClkPin, CePin, DcPin, RstPin>
    {
        /// Claim the given RP2040 pins as outputs, already in their idle levels
        pub fn from_pins(din: DinPin, clk: ClkPin, ce: CePin, dc: DcPin, rst: RstPin) -> Self {
            Self {
                data: Output::new(din, Level::Low),
                clock: Output::new(clk, Level::Low),
                chip_select: Output::new(ce, Level::High),
                mode_select: Output::new(dc, Level::Low),
                reset: Output::new(rst, Level::High),
            }
        }
    }
}

#[cfg(feature = "embassy-rp")]
pub use embassy_rp_wiring::EmbassyRpWiring;
