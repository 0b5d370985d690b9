//! # Pin identifiers, port groups and device packages
//!
//! A [`PinId`] is a plain index in `0..64`. Pins `0..32` live in [`Bank::A`]
//! (`PA00`..`PA31`), pins `32..64` in [`Bank::B`] (`PB00`..`PB31`). Every valid
//! [`PinId`] has a location in every register file of the PORT peripheral, so
//! the resolver never has to deal with an out-of-range index.
//!
//! Not every pin is bonded out on every package. The [`Package`] passed to
//! [`Port::new`](super::Port::new) records which pins physically exist.

use core::convert::TryFrom;
use core::fmt;

/// Number of pins in one port group
pub const PINS_PER_BANK: u8 = 32;
/// Number of pins addressable through [`PinId`]
pub const NUM_PINS: u8 = 2 * PINS_PER_BANK;

//==================================================================================================
//  Errors and Definitions
//==================================================================================================

/// GPIO error type
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// The index does not name a pin of port group A or B
    InvalidPin(u8),
    /// The pin exists in the register map but is not bonded out on the package
    NotBonded(PinId),
    /// The hardware direction or input-enable state of the pin does not support the
    /// requested operation. [`DynPin`](super::DynPin)s do not track their mode, so the
    /// registers are checked at run-time.
    InvalidPinType,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    Low = 0,
    High = 1,
}

impl From<bool> for PinState {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

impl From<PinState> for bool {
    #[inline]
    fn from(state: PinState) -> Self {
        state == PinState::High
    }
}

//==================================================================================================
//  Bank
//==================================================================================================

/// Port group owning a set of 32 pins
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    A = 0,
    B = 1,
}

impl Bank {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    const fn letter(self) -> char {
        match self {
            Bank::A => 'A',
            Bank::B => 'B',
        }
    }
}

//==================================================================================================
//  PinId
//==================================================================================================

/// Value-level pin identifier in the range `0..64`
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(u8);

impl PinId {
    /// Create a new [`PinId`]
    ///
    /// Panics if `num` is not smaller than [`NUM_PINS`]. In a `const` context the
    /// check happens at compile time:
    ///
    /// ```
    /// use atsamd51_gpio::gpio::PinId;
    /// const LED: PinId = PinId::new(17);
    /// ```
    #[inline]
    pub const fn new(num: u8) -> Self {
        assert!(num < NUM_PINS, "pin index out of range");
        PinId(num)
    }

    /// Pin `num` of the given [`Bank`]. Panics if `num` is not smaller than 32.
    #[inline]
    pub const fn with_bank(bank: Bank, num: u8) -> Self {
        assert!(num < PINS_PER_BANK, "pin number out of range for a port group");
        PinId(bank as u8 * PINS_PER_BANK + num)
    }

    /// Return the raw index
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn bank(self) -> Bank {
        if self.0 < PINS_PER_BANK {
            Bank::A
        } else {
            Bank::B
        }
    }

    /// Position of the pin inside its port group
    #[inline]
    pub const fn num(self) -> u8 {
        self.0 % PINS_PER_BANK
    }

    /// Single-bit mask of the pin inside its port group's 32-bit registers
    #[inline]
    pub const fn mask_32(self) -> u32 {
        1 << self.num()
    }

    /// The pin sharing this pin's multiplexer byte
    #[inline]
    pub const fn sibling(self) -> PinId {
        PinId(self.0 ^ 1)
    }

    #[inline]
    pub const fn is_odd(self) -> bool {
        self.0 & 1 == 1
    }
}

impl TryFrom<u8> for PinId {
    type Error = PinError;

    #[inline]
    fn try_from(num: u8) -> Result<Self, PinError> {
        if num < NUM_PINS {
            Ok(PinId(num))
        } else {
            Err(PinError::InvalidPin(num))
        }
    }
}

impl From<PinId> for u8 {
    #[inline]
    fn from(pin: PinId) -> Self {
        pin.0
    }
}

/// Formats the datasheet name, e.g. `PA07` or `PB22`
impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{:02}", self.bank().letter(), self.num())
    }
}

impl fmt::Debug for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PinId({})", self)
    }
}

//==================================================================================================
//  Package
//==================================================================================================

/// Device package. Determines which pins of the two port groups are bonded out.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Package {
    /// 48 pins, e.g. ATSAMD51G19. PA00-PA25, PA27, PA30, PA31, PB02, PB03, PB08-PB11, PB22,
    /// PB23.
    G,
    /// 64 pins, e.g. ATSAMD51J19. Adds PB00-PB17 and PB30, PB31.
    J,
}

impl Package {
    /// Bonded pins per port group, bit `n` set if pin `n` exists
    pub const fn bonded(self) -> [u32; 2] {
        match self {
            Package::G => [0xCBFF_FFFF, 0x00C0_0F0C],
            Package::J => [0xCBFF_FFFF, 0xC0C3_FFFF],
        }
    }

    #[inline]
    pub const fn has(self, pin: PinId) -> bool {
        self.bonded()[pin.bank().index()] & pin.mask_32() != 0
    }

    /// Iterate over all pins available on this package
    pub fn pins(self) -> impl Iterator<Item = PinId> {
        (0..NUM_PINS).map(PinId).filter(move |pin| self.has(*pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_partition() {
        assert_eq!(PinId::new(0).bank(), Bank::A);
        assert_eq!(PinId::new(31).bank(), Bank::A);
        assert_eq!(PinId::new(32).bank(), Bank::B);
        assert_eq!(PinId::new(63).bank(), Bank::B);
        assert_eq!(PinId::new(40).num(), 8);
        assert_eq!(PinId::with_bank(Bank::B, 22), PinId::new(54));
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert_eq!(PinId::try_from(63), Ok(PinId::new(63)));
        assert_eq!(PinId::try_from(64), Err(PinError::InvalidPin(64)));
        assert_eq!(PinId::try_from(255), Err(PinError::InvalidPin(255)));
    }

    #[test]
    #[should_panic]
    fn new_panics_out_of_range() {
        let _ = PinId::new(64);
    }

    #[test]
    fn datasheet_names() {
        assert_eq!(format!("{}", PinId::new(7)), "PA07");
        assert_eq!(format!("{}", PinId::new(54)), "PB22");
        assert_eq!(format!("{:?}", PinId::new(33)), "PinId(PB01)");
    }

    #[test]
    fn package_bonding() {
        assert_eq!(Package::G.pins().count(), 37);
        assert_eq!(Package::J.pins().count(), 51);
        assert!(Package::G.has(PinId::new(27)));
        assert!(!Package::G.has(PinId::new(26)));
        assert!(!Package::G.has(PinId::new(32)));
        assert!(Package::J.has(PinId::new(32)));
        assert!(Package::J.has(PinId::new(63)));
        assert!(!Package::J.has(PinId::new(50)));
    }

    #[test]
    fn sibling_shares_pair() {
        assert_eq!(PinId::new(6).sibling(), PinId::new(7));
        assert_eq!(PinId::new(7).sibling(), PinId::new(6));
        assert!(PinId::new(7).is_odd());
    }
}
