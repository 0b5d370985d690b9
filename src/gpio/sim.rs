//! # Simulated PORT peripheral
//!
//! [`SimPort`] implements [`RegisterBank`] in plain memory so the resolver and
//! the configuration engine can be exercised off-target. It models the parts
//! of the PORT behaviour the GPIO module relies on:
//!
//! - DIRSET/DIRCLR/DIRTGL and OUTSET/OUTCLR/OUTTGL only affect the bits written as 1,
//!   reading them returns DIR or OUT
//! - IN follows OUT for outputs, the external level for inputs, and the pull
//!   direction for undriven pulled inputs. It reads 0 while the input buffer is
//!   disabled.
//!
//! It also counts accesses and remembers the last write, which lets tests check
//! *how* a register was changed and not only the end result. Unit tests of this
//! crate additionally get the full sequence of writes.
use super::pin::{Bank, PinId};
use super::reg::{PinCfg, Reg, RegKind, RegisterBank, PINCFG_WORDS, PMUX_WORDS};
use super::resolve::packed_byte;
#[cfg(test)]
use core::cell::RefCell;
use core::cell::Cell;

#[derive(Default)]
struct SimGroup {
    dir: Cell<u32>,
    out: Cell<u32>,
    pmux: [Cell<u32>; PMUX_WORDS as usize],
    pincfg: [Cell<u32>; PINCFG_WORDS as usize],
    /// Level applied to the pin from outside
    external: Cell<u32>,
    /// Pins with an external driver attached
    driven: Cell<u32>,
}

/// Register bank backed by memory, starting from the reset state (all zero)
#[derive(Default)]
pub struct SimPort {
    groups: [SimGroup; 2],
    reads: Cell<usize>,
    writes: Cell<usize>,
    last_write: Cell<Option<(Reg, u32)>>,
    #[cfg(test)]
    write_log: RefCell<Vec<(Reg, u32)>>,
}

impl SimPort {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn group(&self, bank: Bank) -> &SimGroup {
        &self.groups[bank.index()]
    }

    /// Drive `pin` from outside with the given level
    pub fn drive(&self, pin: PinId, high: bool) {
        let group = self.group(pin.bank());
        let mask = pin.mask_32();
        group.driven.set(group.driven.get() | mask);
        if high {
            group.external.set(group.external.get() | mask);
        } else {
            group.external.set(group.external.get() & !mask);
        }
    }

    /// Remove the external driver from `pin`
    pub fn release(&self, pin: PinId) {
        let group = self.group(pin.bank());
        group.driven.set(group.driven.get() & !pin.mask_32());
    }

    /// Number of register reads since creation or the last [`reset_counters`](Self::reset_counters)
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Number of register writes since creation or the last [`reset_counters`](Self::reset_counters)
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn last_write(&self) -> Option<(Reg, u32)> {
        self.last_write.get()
    }

    pub fn reset_counters(&self) {
        self.reads.set(0);
        self.writes.set(0);
        self.last_write.set(None);
        #[cfg(test)]
        self.write_log.borrow_mut().clear();
    }

    /// Writes since creation or the last [`reset_counters`](Self::reset_counters), oldest first
    #[cfg(test)]
    pub fn write_log(&self) -> Vec<(Reg, u32)> {
        self.write_log.borrow().clone()
    }

    /// Value of the IN register of a group
    fn input(&self, bank: Bank) -> u32 {
        let group = self.group(bank);
        let mut level = 0;
        let mut inen = 0;
        let mut pulled = 0;
        for num in 0..32u8 {
            let field = packed_byte(PinId::with_bank(bank, num));
            let cfg = PinCfg::from_bits(field.extract(self.peek(field.reg)));
            if cfg.inen() {
                inen |= 1 << num;
            }
            if cfg.pullen() {
                pulled |= 1 << num;
            }
        }
        let dir = group.dir.get();
        let driven = group.driven.get() & !dir;
        level |= group.out.get() & dir;
        level |= group.external.get() & driven;
        level |= group.out.get() & pulled & !dir & !driven;
        level & inen
    }

    /// Read a register without counting the access
    pub fn peek(&self, reg: Reg) -> u32 {
        let group = self.group(reg.bank);
        match reg.kind {
            RegKind::Dir | RegKind::DirClr | RegKind::DirSet | RegKind::DirTgl => group.dir.get(),
            RegKind::Out | RegKind::OutClr | RegKind::OutSet | RegKind::OutTgl => group.out.get(),
            RegKind::In => self.input(reg.bank),
            RegKind::PMux(n) => group.pmux[n as usize].get(),
            RegKind::PinCfg(n) => group.pincfg[n as usize].get(),
        }
    }

    /// Write a register without counting the access
    pub fn poke(&self, reg: Reg, value: u32) {
        let group = self.group(reg.bank);
        let dir = &group.dir;
        let out = &group.out;
        match reg.kind {
            RegKind::Dir => dir.set(value),
            RegKind::DirClr => dir.set(dir.get() & !value),
            RegKind::DirSet => dir.set(dir.get() | value),
            RegKind::DirTgl => dir.set(dir.get() ^ value),
            RegKind::Out => out.set(value),
            RegKind::OutClr => out.set(out.get() & !value),
            RegKind::OutSet => out.set(out.get() | value),
            RegKind::OutTgl => out.set(out.get() ^ value),
            RegKind::In => panic!("IN is a read-only register"),
            RegKind::PMux(n) => group.pmux[n as usize].set(value),
            RegKind::PinCfg(n) => group.pincfg[n as usize].set(value),
        }
    }
}

impl RegisterBank for SimPort {
    fn read(&self, reg: Reg) -> u32 {
        self.reads.set(self.reads.get() + 1);
        self.peek(reg)
    }

    fn write(&self, reg: Reg, value: u32) {
        self.writes.set(self.writes.get() + 1);
        self.last_write.set(Some((reg, value)));
        #[cfg(test)]
        self.write_log.borrow_mut().push((reg, value));
        self.poke(reg, value)
    }
}
