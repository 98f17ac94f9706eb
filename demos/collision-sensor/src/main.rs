//! Distance and temperature readout on a Nokia 5110 LCD wired to an RP2040 board like the Pi Pico

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp;
use embassy_time::Timer;
use pcd8544::measurement::{DEFAULT_LABELS, DISTANCE_BANK, TEMPERATURE_BANK};
use pcd8544::Measurement;
use {defmt_rtt as _, panic_probe as _};

/// The ultrasonic ranger this was built for reports nothing meaningful past 4.5m
const MAX_DISTANCE_MM: u32 = 4500;

/// Upper limit of the temperature sensor, in either unit
const MAX_TEMPERATURE: u32 = 158;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // Instantiate the PCD8544 driver using a bit-banging implementation of its serial link,
    // implemented using the `embassy-rp` HAL and the `embassy-time` delay.
    //
    // DIN, CLK, CE, DC, RST
    let mut lcd = pcd8544::Pcd8544::builder()
        .with_embassy_delay()
        .with_embassy_rp_pins(p.PIN_11, p.PIN_10, p.PIN_13, p.PIN_12, p.PIN_14)
        .unwrap()
        .build();
    lcd.init().unwrap();
    lcd.setup_labels(&DEFAULT_LABELS).unwrap();

    debug!("Display ready");

    // No sensors on this board, so sweep through readings that exercise every display state,
    // including out of range
    let mut distance = 0u32;
    let mut celsius = 18u32;

    loop {
        let placement = lcd
            .print_measurement(
                DISTANCE_BANK,
                &Measurement::new(distance, "mm", MAX_DISTANCE_MM),
            )
            .unwrap();
        if let Some(placement) = placement {
            debug!("distance {=u32}mm drawn at column {=u8}", distance, placement.column());
        }

        let fahrenheit = celsius * 9 / 5 + 32;
        lcd.print_dual_measurement(
            TEMPERATURE_BANK,
            &Measurement::new(celsius, "C", MAX_TEMPERATURE),
            &Measurement::new(fahrenheit, "F", MAX_TEMPERATURE),
        )
        .unwrap();

        distance = (distance + 250) % (MAX_DISTANCE_MM + 1000);
        celsius = if celsius >= 75 { 18 } else { celsius + 1 };

        Timer::after_millis(500).await;
    }
}
