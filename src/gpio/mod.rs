//! # GPIO module
//!
//! The PORT peripheral of the ATSAMD51 spreads the state of a pin over several
//! registers of its port group:
//!
//! - one bit in DIR, OUT and IN, with write-one-to-set/clear/toggle companions
//! - one configuration byte in the PINCFG file, four bytes per word
//! - one multiplexer nibble in the PMUX file, two nibbles per byte, four bytes
//!   per word
//!
//! [`resolve`] computes where each of these lives for a given [`PinId`].
//! [`Port`] uses it to implement the pin operations: [`Port::configure`],
//! [`Port::set_level`] and [`Port::level`], plus [`Port::mask_set`] and
//! [`Port::mask_clear`] for drivers that want to bit-bang a pin themselves.
//!
//! Register access goes through the [`RegisterBank`] trait. [`Mmio`] is the real
//! peripheral; [`SimPort`] (with the `sim` feature) keeps the registers in memory.
//!
//! ## Examples
//!
//! ```ignore
//! use atsamd51_gpio::gpio::{PinId, PinMode, Package, Port};
//!
//! const LED: PinId = PinId::new(17);
//!
//! let port = Port::take(Package::G).unwrap();
//! port.configure(LED, PinMode::Output);
//! port.set_level(LED, true);
//! ```
//!
//! - [Blinky example](../../demos/blinky.rs)
pub mod dynpin;
pub use dynpin::*;

pub mod mode;
pub use mode::*;

pub mod pin;
pub use pin::*;

pub mod port;
pub use port::*;

pub mod reg;
pub use reg::{Mmio, PinCfg, Reg, RegKind, RegisterBank};

pub mod resolve;

#[cfg(any(test, feature = "sim"))]
pub mod sim;
#[cfg(any(test, feature = "sim"))]
pub use sim::SimPort;
