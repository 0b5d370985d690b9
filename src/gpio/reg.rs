//! # Register surface of the PORT peripheral
//!
//! Every register the GPIO module touches is named by a [`Reg`] handle. The
//! handles are plain values and can be resolved to memory addresses with
//! [`Mmio::ptr`], or interpreted by any other [`RegisterBank`] implementation,
//! e.g. the simulated bank used by the tests.
use super::pin::Bank;
use core::marker::PhantomData;
use core::ops::BitOr;
use core::sync::atomic::{AtomicBool, Ordering};
use paste::paste;
use volatile_register::{RO, RW, WO};

//==================================================================================================
//  Register handles
//==================================================================================================

/// Register of one port group
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegKind {
    Dir,
    DirClr,
    DirSet,
    DirTgl,
    Out,
    OutClr,
    OutSet,
    OutTgl,
    In,
    /// Word `n` (0..4) of the multiplexer file, holding the selectors of pins `8n..8n+8`
    PMux(u8),
    /// Word `n` (0..8) of the pin configuration file, holding the bytes of pins `4n..4n+4`
    PinCfg(u8),
}

/// Number of 32-bit words in the multiplexer file of a port group
pub const PMUX_WORDS: u8 = 4;
/// Number of 32-bit words in the pin configuration file of a port group
pub const PINCFG_WORDS: u8 = 8;

impl RegKind {
    /// Whether the register holds one bit per pin of the group
    #[inline]
    pub const fn is_single_bit(self) -> bool {
        !matches!(self, RegKind::PMux(_) | RegKind::PinCfg(_))
    }

    /// Byte offset relative to the start of the port group
    pub const fn offset(self) -> usize {
        match self {
            RegKind::Dir => 0x00,
            RegKind::DirClr => 0x04,
            RegKind::DirSet => 0x08,
            RegKind::DirTgl => 0x0C,
            RegKind::Out => 0x10,
            RegKind::OutClr => 0x14,
            RegKind::OutSet => 0x18,
            RegKind::OutTgl => 0x1C,
            RegKind::In => 0x20,
            RegKind::PMux(n) => 0x30 + 4 * n as usize,
            RegKind::PinCfg(n) => 0x40 + 4 * n as usize,
        }
    }
}

/// Handle for a 32-bit register of the PORT peripheral
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reg {
    pub bank: Bank,
    pub kind: RegKind,
}

impl Reg {
    /// Distance between two port groups in the address map
    pub const GROUP_STRIDE: usize = 0x80;

    #[inline]
    pub const fn new(bank: Bank, kind: RegKind) -> Self {
        Reg { bank, kind }
    }

    /// Byte offset relative to the PORT base address
    #[inline]
    pub const fn offset(self) -> usize {
        self.bank.index() * Self::GROUP_STRIDE + self.kind.offset()
    }
}

//==================================================================================================
//  RegisterBank
//==================================================================================================

/// Raw, word-addressed access to the PORT registers
///
/// Like the register types of a PAC, all accesses go through `&self`. The
/// hardware is the shared state; an implementation must not cache anything.
///
/// [`modify`](RegisterBank::modify) is a plain read followed by a write. It is
/// not atomic with respect to other execution contexts that modify the same
/// word.
pub trait RegisterBank {
    fn read(&self, reg: Reg) -> u32;

    fn write(&self, reg: Reg, value: u32);

    #[inline]
    fn modify<F: FnOnce(u32) -> u32>(&self, reg: Reg, f: F) {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

impl<R: RegisterBank + ?Sized> RegisterBank for &R {
    #[inline]
    fn read(&self, reg: Reg) -> u32 {
        (**self).read(reg)
    }

    #[inline]
    fn write(&self, reg: Reg, value: u32) {
        (**self).write(reg, value)
    }
}

//==================================================================================================
//  PinCfg
//==================================================================================================

/// Content of a pin configuration byte
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinCfg(u8);

macro_rules! pincfg_bits {
    ($($(#[$meta:meta])* $name:ident: $bit:literal,)+) => {
        paste! {
            impl PinCfg {
                $(
                    #[doc = "Mask of the " $name " bit"]
                    pub const [<$name:upper>]: PinCfg = PinCfg(1 << $bit);

                    $(#[$meta])*
                    #[inline]
                    pub const fn $name(self) -> bool {
                        self.0 & (1 << $bit) != 0
                    }

                    #[inline]
                    pub const fn [<with_ $name>](self, enable: bool) -> Self {
                        if enable {
                            PinCfg(self.0 | (1 << $bit))
                        } else {
                            PinCfg(self.0 & !(1 << $bit))
                        }
                    }
                )+
            }
        }
    };
}

pincfg_bits! {
    /// Peripheral multiplexer enabled, the PMUX selector drives the pin
    pmuxen: 0,
    /// Input buffer enabled, IN reflects the pin level
    inen: 1,
    /// Pull resistor enabled, OUT selects pull-up or pull-down
    pullen: 2,
    /// Strong drive
    drvstr: 6,
}

impl PinCfg {
    /// Bits with a meaning; everything else is reserved
    pub const MASK: u8 = 0b0100_0111;

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        PinCfg(bits & Self::MASK)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for PinCfg {
    type Output = PinCfg;

    #[inline]
    fn bitor(self, rhs: PinCfg) -> PinCfg {
        PinCfg(self.0 | rhs.0)
    }
}

//==================================================================================================
//  Memory mapped register block
//==================================================================================================

/// Registers of one port group, 0x80 bytes
#[repr(C)]
pub struct PortGroup {
    pub dir: RW<u32>,
    pub dirclr: RW<u32>,
    pub dirset: RW<u32>,
    pub dirtgl: RW<u32>,
    pub out: RW<u32>,
    pub outclr: RW<u32>,
    pub outset: RW<u32>,
    pub outtgl: RW<u32>,
    pub in_: RO<u32>,
    pub ctrl: RW<u32>,
    pub wrconfig: WO<u32>,
    pub evctrl: RW<u32>,
    /// Multiplexer bytes, accessed as aligned words
    pub pmux: [RW<u32>; PMUX_WORDS as usize],
    /// Pin configuration bytes, accessed as aligned words
    pub pincfg: [RW<u32>; PINCFG_WORDS as usize],
    _reserved: [u32; 8],
}

#[repr(C)]
pub struct RegisterBlock {
    pub group: [PortGroup; 2],
}

static TAKEN: AtomicBool = AtomicBool::new(false);

/// Handle for the memory mapped PORT peripheral
///
/// Zero-sized, like a PAC peripheral struct. Use [`Mmio::take`] to obtain the
/// singleton.
pub struct Mmio {
    _marker: PhantomData<*const ()>,
}

// Same reasoning as for the PAC peripherals: the handle only grants access,
// ownership of the handle can move between contexts.
unsafe impl Send for Mmio {}

impl Mmio {
    /// Base address of the PORT peripheral
    pub const PTR: *const RegisterBlock = 0x4100_8000 as *const _;

    /// Returns the PORT handle exactly once
    pub fn take() -> Option<Self> {
        cortex_m::interrupt::free(|_| {
            if TAKEN.load(Ordering::Relaxed) {
                None
            } else {
                TAKEN.store(true, Ordering::Relaxed);
                // Safety: Guarded by the TAKEN flag
                Some(unsafe { Self::steal() })
            }
        })
    }

    /// Create a handle without checking the singleton flag
    ///
    /// # Safety
    ///
    /// Handles created this way alias any handle returned by [`Mmio::take`].
    #[inline]
    pub unsafe fn steal() -> Self {
        Mmio {
            _marker: PhantomData,
        }
    }

    /// Raw address of a register, for tight bit-banging loops
    #[inline]
    pub fn ptr(reg: Reg) -> *mut u32 {
        (Self::PTR as usize + reg.offset()) as *mut u32
    }

    #[inline]
    fn group(&self, bank: Bank) -> &PortGroup {
        // Safety: PTR is the fixed PORT base address and `bank.index()` is always 0 or 1
        unsafe { &(*Self::PTR).group[bank.index()] }
    }
}

impl RegisterBank for Mmio {
    #[inline]
    fn read(&self, reg: Reg) -> u32 {
        let group = self.group(reg.bank);
        match reg.kind {
            RegKind::Dir => group.dir.read(),
            RegKind::DirClr => group.dirclr.read(),
            RegKind::DirSet => group.dirset.read(),
            RegKind::DirTgl => group.dirtgl.read(),
            RegKind::Out => group.out.read(),
            RegKind::OutClr => group.outclr.read(),
            RegKind::OutSet => group.outset.read(),
            RegKind::OutTgl => group.outtgl.read(),
            RegKind::In => group.in_.read(),
            RegKind::PMux(n) => group.pmux[n as usize].read(),
            RegKind::PinCfg(n) => group.pincfg[n as usize].read(),
        }
    }

    #[inline]
    fn write(&self, reg: Reg, value: u32) {
        let group = self.group(reg.bank);
        // Safety: The register handles only name PORT registers, and the value is written
        // to the register as a whole
        unsafe {
            match reg.kind {
                RegKind::Dir => group.dir.write(value),
                RegKind::DirClr => group.dirclr.write(value),
                RegKind::DirSet => group.dirset.write(value),
                RegKind::DirTgl => group.dirtgl.write(value),
                RegKind::Out => group.out.write(value),
                RegKind::OutClr => group.outclr.write(value),
                RegKind::OutSet => group.outset.write(value),
                RegKind::OutTgl => group.outtgl.write(value),
                RegKind::In => panic!("IN is a read-only register"),
                RegKind::PMux(n) => group.pmux[n as usize].write(value),
                RegKind::PinCfg(n) => group.pincfg[n as usize].write(value),
            }
        }
    }
}
