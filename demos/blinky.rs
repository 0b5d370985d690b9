//! Simple blinky example
//!
//! Blinks the red LED on PA17 of an ItsyBitsy M4 style ATSAMD51G19 board and
//! mirrors the level of a button on PA16 (to ground, pulled up) on PA18.
#![no_main]
#![no_std]

use atsamd51_gpio::{
    gpio::{Package, PinId, PinMode, Port},
    prelude::*,
};
use cortex_m_rt::entry;
use panic_halt as _;
use rtt_target::{rprintln, rtt_init_print};

const LED: PinId = PinId::new(17);
const BUTTON: PinId = PinId::new(16);
const MIRROR: PinId = PinId::new(18);

#[entry]
fn main() -> ! {
    rtt_init_print!();
    let port = Port::take(Package::G).unwrap();
    let mut led = port.into_mode(LED, PinMode::Output);
    port.configure(BUTTON, PinMode::InputPullup);
    port.configure(MIRROR, PinMode::Output);
    rprintln!("{} blinking, {} mirrors {}", LED, MIRROR, BUTTON);

    for _ in 0..10 {
        led.set_low().ok();
        cortex_m::asm::delay(10_000_000);
        led.set_high().ok();
        cortex_m::asm::delay(10_000_000);
    }
    loop {
        led.toggle().ok();
        port.set_level(MIRROR, !port.level(BUTTON));
        cortex_m::asm::delay(10_000_000);
    }
}
