//! Bit-banged SPI style clock and data output using the raw OUTSET/OUTCLR registers
//!
//! The register addresses and masks are resolved once, the loop then only does
//! volatile stores.
#![no_main]
#![no_std]

use atsamd51_gpio::gpio::{Mmio, Package, PinId, PinMode, Port};
use cortex_m_rt::entry;
use panic_halt as _;

const SCK: PinId = PinId::new(22);
const MOSI: PinId = PinId::new(23);

struct Line {
    set: *mut u32,
    clear: *mut u32,
    mask: u32,
}

impl Line {
    fn new(port: &Port<Mmio>, pin: PinId) -> Self {
        let (set, mask) = port.mask_set(pin);
        let (clear, _) = port.mask_clear(pin);
        Line {
            set: Mmio::ptr(set),
            clear: Mmio::ptr(clear),
            mask,
        }
    }

    #[inline(always)]
    fn write(&self, high: bool) {
        // Safety: OUTSET and OUTCLR are write-one-to-set/clear registers, only the bit of this
        // pin is affected
        unsafe {
            if high {
                self.set.write_volatile(self.mask);
            } else {
                self.clear.write_volatile(self.mask);
            }
        }
    }
}

fn shift_out(sck: &Line, mosi: &Line, byte: u8) {
    for bit in (0..8).rev() {
        mosi.write(byte & (1 << bit) != 0);
        sck.write(true);
        cortex_m::asm::delay(8);
        sck.write(false);
        cortex_m::asm::delay(8);
    }
}

#[entry]
fn main() -> ! {
    let port = Port::take(Package::G).unwrap();
    port.configure(SCK, PinMode::Output);
    port.configure(MOSI, PinMode::Output);
    port.set_level(SCK, false);

    let sck = Line::new(&port, SCK);
    let mosi = Line::new(&port, MOSI);
    let mut counter: u8 = 0;
    loop {
        shift_out(&sck, &mosi, counter);
        counter = counter.wrapping_add(1);
        cortex_m::asm::delay(1_000_000);
    }
}
