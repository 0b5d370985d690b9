//! # Pin to register resolution
//!
//! Pure functions mapping a [`PinId`] to the register and bit range holding one
//! of its fields. Three field shapes exist on the PORT peripheral:
//!
//! - single bits in the per-group DIR, OUT and IN registers and their
//!   set/clear/toggle companions, at bit `pin % 32`
//! - configuration bytes, four per word: word `(pin % 32) / 4`, bits
//!   `(pin % 4) * 8 ..+ 8`
//! - multiplexer nibbles, two per byte and the bytes packed like the
//!   configuration bytes: byte `(pin % 32) / 2`, even pins in the low nibble,
//!   odd pins in the high nibble
//!
//! Nothing here touches hardware. The packed fields come with `extract` and
//! `insert` helpers so the caller can do the read-modify-write on the full
//! aligned word while leaving the neighbouring pins alone.
use super::pin::{Bank, PinId};
use super::reg::{Reg, RegKind};

//==================================================================================================
//  Single bit registers
//==================================================================================================

/// Register and mask of a pin's bit in one of the single-bit registers
///
/// `kind` must be one of the [single-bit](RegKind::is_single_bit) registers.
#[inline]
pub fn bank_register(pin: PinId, kind: RegKind) -> (Reg, u32) {
    debug_assert!(kind.is_single_bit(), "{:?} is a packed register", kind);
    (Reg::new(pin.bank(), kind), pin.mask_32())
}

//==================================================================================================
//  Packed fields
//==================================================================================================

/// 8-bit field inside a 32-bit word
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ByteField {
    pub reg: Reg,
    /// Bit offset of the byte, one of 0, 8, 16, 24
    pub shift: u32,
}

impl ByteField {
    #[inline]
    pub const fn mask(&self) -> u32 {
        0xFF << self.shift
    }

    #[inline]
    pub const fn extract(&self, word: u32) -> u8 {
        (word >> self.shift) as u8
    }

    /// Replace the field in `word`, leaving the other three bytes untouched
    #[inline]
    pub const fn insert(&self, word: u32, value: u8) -> u32 {
        (word & !self.mask()) | ((value as u32) << self.shift)
    }
}

/// 4-bit field inside a 32-bit word
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NibbleField {
    pub reg: Reg,
    /// Bit offset of the nibble. `shift % 8` is 0 for even and 4 for odd pins.
    pub shift: u32,
}

impl NibbleField {
    #[inline]
    pub const fn mask(&self) -> u32 {
        0xF << self.shift
    }

    #[inline]
    pub const fn extract(&self, word: u32) -> u8 {
        ((word >> self.shift) & 0xF) as u8
    }

    /// Replace the nibble in `word`. Only the low four bits of `value` are used; the
    /// sibling nibble and the other bytes are preserved.
    #[inline]
    pub const fn insert(&self, word: u32, value: u8) -> u32 {
        (word & !self.mask()) | (((value & 0xF) as u32) << self.shift)
    }

    /// The byte containing this nibble and its sibling
    #[inline]
    pub const fn byte(&self) -> ByteField {
        ByteField {
            reg: self.reg,
            shift: self.shift & !0x7,
        }
    }
}

/// Bytes packed into one register word
const BYTES_PER_WORD: u8 = 4;
/// Multiplexer selectors packed into one byte
const NIBBLES_PER_BYTE: u8 = 2;

/// Locate byte number `index` of a packed byte file
#[inline]
fn byte_in_file(bank: Bank, index: u8, file: fn(u8) -> RegKind) -> ByteField {
    ByteField {
        reg: Reg::new(bank, file(index / BYTES_PER_WORD)),
        shift: (index % BYTES_PER_WORD) as u32 * 8,
    }
}

/// Configuration byte of a pin
#[inline]
pub fn packed_byte(pin: PinId) -> ByteField {
    byte_in_file(pin.bank(), pin.num(), RegKind::PinCfg)
}

/// Multiplexer nibble of a pin
///
/// `pin` and [`pin.sibling()`](PinId::sibling) resolve to the same byte.
#[inline]
pub fn nibble(pin: PinId) -> NibbleField {
    let byte = byte_in_file(pin.bank(), pin.num() / NIBBLES_PER_BYTE, RegKind::PMux);
    NibbleField {
        reg: byte.reg,
        shift: byte.shift + if pin.is_odd() { 4 } else { 0 },
    }
}
