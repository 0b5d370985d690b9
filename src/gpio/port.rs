//! # Pin configuration engine
//!
//! [`Port`] owns a [`RegisterBank`] and implements the pin operations on top of
//! the [resolver](super::resolve). Nothing is cached; every call reads or writes
//! the registers directly, so other code reconfiguring pins behind the back of
//! a [`Port`] is always observed.
//!
//! ## Concurrency
//!
//! Level changes ([`set_level`](Port::set_level), [`toggle`](Port::toggle)) and
//! direction changes go through the write-one-to-set/clear/toggle registers and
//! are safe to use from interrupts. [`configure`](Port::configure) additionally
//! performs read-modify-write cycles on packed configuration and multiplexer
//! words shared by four (PINCFG) or eight (PMUX) pins. Reconfiguring two pins
//! sharing such a word from different execution contexts must be serialized by
//! the caller, e.g. with [`cortex_m::interrupt::free`].
use super::dynpin::DynPin;
use super::mode::{Function, ModeFields, PinMode};
use super::pin::{Package, PinError, PinId};
use super::reg::{Mmio, PinCfg, Reg, RegKind, RegisterBank};
use super::resolve::{bank_register, nibble, packed_byte};

/// GPIO access to both port groups of the PORT peripheral
pub struct Port<R: RegisterBank> {
    regs: R,
    package: Package,
}

impl Port<Mmio> {
    /// Take the PORT peripheral. Returns `None` if it was taken before.
    pub fn take(package: Package) -> Option<Self> {
        Mmio::take().map(|regs| Port::new(regs, package))
    }
}

impl<R: RegisterBank> Port<R> {
    pub fn new(regs: R, package: Package) -> Self {
        Port { regs, package }
    }

    /// Consumes the port and returns the register bank
    pub fn release(self) -> R {
        self.regs
    }

    #[inline]
    pub fn package(&self) -> Package {
        self.package
    }

    #[inline]
    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// Check whether `pin` is bonded out on the configured package
    #[inline]
    pub fn check(&self, pin: PinId) -> Result<PinId, PinError> {
        if self.package.has(pin) {
            Ok(pin)
        } else {
            Err(PinError::NotBonded(pin))
        }
    }

    #[inline]
    #[track_caller]
    fn assert_bonded(&self, pin: PinId) {
        if !self.package.has(pin) {
            panic!("{} is not bonded out on package {:?}", pin, self.package);
        }
    }

    //==============================================================================================
    //  Levels
    //==============================================================================================

    /// Drive the output level of a pin
    ///
    /// A single write of the pin mask to OUTSET or OUTCLR. Only useful on output pins; on
    /// pulled inputs this selects the pull direction.
    #[inline]
    pub fn set_level(&self, pin: PinId, high: bool) {
        self.assert_bonded(pin);
        let kind = if high { RegKind::OutSet } else { RegKind::OutClr };
        let (reg, mask) = bank_register(pin, kind);
        self.regs.write(reg, mask);
    }

    /// Read the level of a pin from the IN register
    ///
    /// Reads as low while the input buffer of the pin is disabled.
    #[inline]
    pub fn level(&self, pin: PinId) -> bool {
        self.assert_bonded(pin);
        let (reg, mask) = bank_register(pin, RegKind::In);
        self.regs.read(reg) & mask != 0
    }

    /// Read back the driven output level from the OUT register
    #[inline]
    pub fn is_set_high(&self, pin: PinId) -> bool {
        self.assert_bonded(pin);
        let (reg, mask) = bank_register(pin, RegKind::Out);
        self.regs.read(reg) & mask != 0
    }

    /// Invert the output level of a pin with a single write to OUTTGL
    #[inline]
    pub fn toggle(&self, pin: PinId) {
        self.assert_bonded(pin);
        let (reg, mask) = bank_register(pin, RegKind::OutTgl);
        self.regs.write(reg, mask);
    }

    /// Return the register and mask to drive a given pin high. This can be used to implement
    /// bit-banged drivers, see [`Mmio::ptr`].
    #[inline]
    pub fn mask_set(&self, pin: PinId) -> (Reg, u32) {
        self.assert_bonded(pin);
        bank_register(pin, RegKind::OutSet)
    }

    /// Return the register and mask to drive a given pin low
    #[inline]
    pub fn mask_clear(&self, pin: PinId) -> (Reg, u32) {
        self.assert_bonded(pin);
        bank_register(pin, RegKind::OutClr)
    }

    /// Return the register and mask to toggle a given pin
    #[inline]
    pub fn mask_toggle(&self, pin: PinId) -> (Reg, u32) {
        self.assert_bonded(pin);
        bank_register(pin, RegKind::OutTgl)
    }

    //==============================================================================================
    //  Configuration
    //==============================================================================================

    /// Configure a pin
    ///
    /// Every call writes all fields the mode needs, in the order direction, output value,
    /// multiplexer selector, configuration byte. Configuring the same mode twice yields the
    /// same register state.
    ///
    /// The multiplexer and configuration updates are read-modify-write cycles on words shared
    /// with neighbouring pins, see the [module documentation](self).
    pub fn configure(&self, pin: PinId, mode: PinMode) {
        self.assert_bonded(pin);
        #[cfg(feature = "defmt")]
        defmt::trace!("configure {} as {}", pin, mode);
        let ModeFields {
            dir,
            out,
            pmux,
            pincfg,
        } = mode.into();
        if let Some(output) = dir {
            let kind = if output {
                RegKind::DirSet
            } else {
                RegKind::DirClr
            };
            let (reg, mask) = bank_register(pin, kind);
            self.regs.write(reg, mask);
        }
        if let Some(high) = out {
            let kind = if high {
                RegKind::OutSet
            } else {
                RegKind::OutClr
            };
            let (reg, mask) = bank_register(pin, kind);
            self.regs.write(reg, mask);
        }
        if let Some(function) = pmux {
            self.set_pmux(pin, function);
        }
        self.set_pin_cfg(pin, pincfg);
    }

    /// Decode the current mode of a pin from the registers
    ///
    /// Returns `None` if the registers hold a state [`configure`](Self::configure) does not
    /// produce, e.g. the reset state.
    pub fn mode(&self, pin: PinId) -> Option<PinMode> {
        self.assert_bonded(pin);
        let (dir_reg, mask) = bank_register(pin, RegKind::Dir);
        let (out_reg, _) = bank_register(pin, RegKind::Out);
        let dir = self.regs.read(dir_reg) & mask != 0;
        let out = self.regs.read(out_reg) & mask != 0;
        let field = nibble(pin);
        let pmux = field.extract(self.regs.read(field.reg));
        PinMode::decode(dir, out, self.pin_cfg(pin), pmux)
    }

    /// Whether the direction bit of the pin is set
    #[inline]
    pub fn is_output(&self, pin: PinId) -> bool {
        self.assert_bonded(pin);
        let (reg, mask) = bank_register(pin, RegKind::Dir);
        self.regs.read(reg) & mask != 0
    }

    /// Read the configuration byte of a pin
    #[inline]
    pub fn pin_cfg(&self, pin: PinId) -> PinCfg {
        self.assert_bonded(pin);
        let field = packed_byte(pin);
        PinCfg::from_bits(field.extract(self.regs.read(field.reg)))
    }

    /// Overwrite the configuration byte of a pin, preserving the three other bytes of the
    /// word
    pub fn set_pin_cfg(&self, pin: PinId, cfg: PinCfg) {
        self.assert_bonded(pin);
        let field = packed_byte(pin);
        self.regs
            .modify(field.reg, |word| field.insert(word, cfg.bits()));
    }

    /// Read the multiplexer selector of a pin. `None` for the reserved values.
    #[inline]
    pub fn pmux(&self, pin: PinId) -> Option<Function> {
        self.assert_bonded(pin);
        let field = nibble(pin);
        Function::from_bits(field.extract(self.regs.read(field.reg)))
    }

    /// Write the multiplexer selector of a pin
    ///
    /// The selector of the sibling pin sharing the byte and the other bytes of the word are
    /// preserved. This does not enable the multiplexer, see [`PinCfg::PMUXEN`].
    pub fn set_pmux(&self, pin: PinId, function: Function) {
        self.assert_bonded(pin);
        let field = nibble(pin);
        self.regs
            .modify(field.reg, |word| field.insert(word, function.bits()));
    }

    //==============================================================================================
    //  Pin handles
    //==============================================================================================

    /// Configure a pin and return a value-level handle for it
    pub fn into_mode(&self, pin: PinId, mode: PinMode) -> DynPin<'_, R> {
        self.configure(pin, mode);
        DynPin::new(self, pin)
    }

    /// Return a value-level handle for a pin without touching its configuration
    pub fn pin(&self, pin: PinId) -> Result<DynPin<'_, R>, PinError> {
        self.check(pin).map(|pin| DynPin::new(self, pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::mode::{ANALOG, COM, SERCOM, SERCOM_ALT};
    use crate::gpio::pin::Bank;
    use crate::gpio::sim::SimPort;

    fn port() -> Port<SimPort> {
        Port::new(SimPort::new(), Package::J)
    }

    fn pincfg_word(port: &Port<SimPort>, bank: Bank, n: u8) -> u32 {
        port.regs().peek(Reg::new(bank, RegKind::PinCfg(n)))
    }

    #[test]
    fn output_level_round_trip() {
        let port = port();
        for pin in [PinId::new(0), PinId::new(5), PinId::new(31), PinId::new(54)] {
            port.configure(pin, PinMode::Output);
            port.set_level(pin, true);
            assert!(port.level(pin));
            assert!(port.is_set_high(pin));
            port.set_level(pin, false);
            assert!(!port.level(pin));
            port.toggle(pin);
            assert!(port.level(pin));
        }
    }

    #[test]
    fn set_level_is_a_single_write() {
        let port = port();
        let pin = PinId::new(40);
        port.configure(pin, PinMode::Output);
        port.regs().reset_counters();

        port.set_level(pin, true);
        assert_eq!(port.regs().reads(), 0);
        assert_eq!(port.regs().writes(), 1);
        assert_eq!(
            port.regs().last_write(),
            Some((Reg::new(Bank::B, RegKind::OutSet), 1 << 8))
        );

        port.set_level(pin, false);
        assert_eq!(port.regs().reads(), 0);
        assert_eq!(
            port.regs().last_write(),
            Some((Reg::new(Bank::B, RegKind::OutClr), 1 << 8))
        );
    }

    #[test]
    fn set_level_leaves_other_pins_alone() {
        let port = port();
        let a = PinId::new(4);
        let b = PinId::new(5);
        port.configure(a, PinMode::Output);
        port.configure(b, PinMode::Output);
        port.set_level(a, true);
        port.set_level(b, true);
        port.set_level(a, false);
        assert!(!port.level(a));
        assert!(port.level(b));
    }

    #[test]
    fn input_pullup_on_pin_5() {
        let port = port();
        let pin = PinId::new(5);
        port.configure(pin, PinMode::InputPullup);
        let regs = port.regs();
        assert_eq!(regs.peek(Reg::new(Bank::A, RegKind::Dir)) & (1 << 5), 0);
        assert_eq!(regs.peek(Reg::new(Bank::A, RegKind::Out)), 1 << 5);
        let cfg = port.pin_cfg(pin);
        assert!(cfg.inen() && cfg.pullen());
        assert_eq!(cfg, PinCfg::INEN | PinCfg::PULLEN);
        // Pin 5 is byte 1 of PINCFG word 1
        assert_eq!(pincfg_word(&port, Bank::A, 1), 0b110 << 8);
        // Nothing to read but the pull-up
        assert!(port.level(pin));
        assert_eq!(port.mode(pin), Some(PinMode::InputPullup));
    }

    #[test]
    fn input_pulldown_and_external_driver() {
        let port = port();
        let pin = PinId::new(35);
        port.configure(pin, PinMode::InputPulldown);
        assert!(!port.level(pin));
        assert!(!port.is_output(pin));
        port.regs().drive(pin, true);
        assert!(port.level(pin));
        port.regs().release(pin);
        assert!(!port.level(pin));
        assert_eq!(port.mode(pin), Some(PinMode::InputPulldown));
    }

    #[test]
    fn output_then_input_clears_direction() {
        let port = port();
        let pin = PinId::new(10);
        port.configure(pin, PinMode::Output);
        assert!(port.is_output(pin));
        port.configure(pin, PinMode::Input);
        assert!(!port.is_output(pin));
        assert_eq!(port.pin_cfg(pin), PinCfg::INEN);
        port.regs().drive(pin, true);
        assert!(port.level(pin));
        assert_eq!(port.mode(pin), Some(PinMode::Input));
    }

    #[test]
    fn peripheral_on_odd_pin_preserves_sibling() {
        let port = port();
        let pmux0 = Reg::new(Bank::A, RegKind::PMux(0));
        // Pin 6 holds selector 3, and the other bytes carry some garbage
        port.regs().poke(pmux0, 0x0312_4567);
        let before = port.regs().peek(pmux0);

        port.configure(PinId::new(7), PinMode::Peripheral(Function::G));

        let after = port.regs().peek(pmux0);
        assert_eq!(after >> 28, 6);
        assert_eq!((after >> 24) & 0xF, 3);
        assert_eq!(before ^ after, 0x6000_0000);
        assert_eq!(port.pmux(PinId::new(7)), Some(Function::G));
        assert_eq!(port.pmux(PinId::new(6)), Some(Function::D));
    }

    #[test]
    fn nibble_write_then_read() {
        let port = port();
        for pin in Package::J.pins() {
            let sibling = pin.sibling();
            let field = nibble(sibling);
            let before = field.extract(port.regs().peek(field.reg));
            port.set_pmux(pin, Function::K);
            assert_eq!(port.pmux(pin), Some(Function::K));
            assert_eq!(field.extract(port.regs().peek(field.reg)), before);
        }
    }

    #[test]
    fn pin_cfg_write_preserves_word() {
        let port = port();
        let word = Reg::new(Bank::B, RegKind::PinCfg(2));
        port.regs().poke(word, 0x4702_0647);
        port.set_pin_cfg(PinId::new(32 + 10), PinCfg::PULLEN);
        assert_eq!(port.regs().peek(word), 0x4704_0647);
    }

    #[test]
    fn peripheral_variants() {
        let port = port();
        let pin = PinId::new(16);

        port.configure(pin, SERCOM);
        assert_eq!(
            port.pin_cfg(pin),
            PinCfg::PMUXEN | PinCfg::DRVSTR | PinCfg::INEN
        );
        assert_eq!(port.pmux(pin), Some(Function::C));
        assert_eq!(port.mode(pin), Some(SERCOM));

        port.configure(pin, SERCOM_ALT);
        assert_eq!(port.pin_cfg(pin), PinCfg::PMUXEN | PinCfg::DRVSTR);
        assert_eq!(port.pmux(pin), Some(Function::D));
        assert_eq!(port.mode(pin), Some(SERCOM_ALT));

        port.configure(pin, COM);
        assert_eq!(port.pin_cfg(pin), PinCfg::PMUXEN);
        assert_eq!(port.mode(pin), Some(COM));
    }

    #[test]
    fn analog_disconnects_input() {
        let port = port();
        let pin = PinId::new(2);
        port.configure(pin, PinMode::Output);
        port.set_level(pin, true);
        port.configure(pin, ANALOG);
        let cfg = port.pin_cfg(pin);
        assert!(cfg.pmuxen() && cfg.drvstr());
        assert!(!cfg.inen());
        assert_eq!(port.pmux(pin), Some(Function::B));
        assert!(!port.level(pin));
        assert_eq!(port.mode(pin), Some(PinMode::Analog));
    }

    #[test]
    fn configure_is_idempotent() {
        let port = port();
        let pin = PinId::new(45);
        let regs = [
            Reg::new(Bank::B, RegKind::Dir),
            Reg::new(Bank::B, RegKind::Out),
            Reg::new(Bank::B, RegKind::PMux(1)),
            Reg::new(Bank::B, RegKind::PinCfg(3)),
        ];
        for mode in [PinMode::InputPullup, SERCOM, PinMode::Output, ANALOG] {
            port.configure(pin, mode);
            let first = regs.map(|reg| port.regs().peek(reg));
            port.configure(pin, mode);
            let second = regs.map(|reg| port.regs().peek(reg));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn configure_writes_in_order() {
        let port = port();
        let cfg = |cfg: PinCfg| cfg.bits() as u32;

        port.configure(PinId::new(45), PinMode::InputPullup);
        assert_eq!(
            port.regs().write_log(),
            [
                (Reg::new(Bank::B, RegKind::DirClr), 1 << 13),
                (Reg::new(Bank::B, RegKind::OutSet), 1 << 13),
                (
                    Reg::new(Bank::B, RegKind::PinCfg(3)),
                    cfg(PinCfg::INEN | PinCfg::PULLEN) << 8
                ),
            ]
        );
        assert_eq!(port.regs().peek(Reg::new(Bank::B, RegKind::Out)), 1 << 13);

        port.regs().reset_counters();
        port.configure(PinId::new(7), PinMode::Peripheral(Function::G));
        assert_eq!(
            port.regs().write_log(),
            [
                (Reg::new(Bank::A, RegKind::PMux(0)), 6 << 28),
                (
                    Reg::new(Bank::A, RegKind::PinCfg(1)),
                    cfg(PinCfg::PMUXEN | PinCfg::DRVSTR | PinCfg::INEN) << 24
                ),
            ]
        );
    }

    #[test]
    fn pulldown_on_bank_b_clears_only_its_bit() {
        let port = port();
        let out = Reg::new(Bank::B, RegKind::Out);
        port.regs().poke(out, 0xFFFF_FFFF);
        port.regs().poke(Reg::new(Bank::B, RegKind::Dir), 0xFFFF_FFFF);

        port.configure(PinId::new(35), PinMode::InputPulldown);
        assert_eq!(
            port.regs().write_log(),
            [
                (Reg::new(Bank::B, RegKind::DirClr), 1 << 3),
                (Reg::new(Bank::B, RegKind::OutClr), 1 << 3),
                (
                    Reg::new(Bank::B, RegKind::PinCfg(0)),
                    ((PinCfg::INEN | PinCfg::PULLEN).bits() as u32) << 24
                ),
            ]
        );
        assert_eq!(port.regs().peek(out), 0xFFFF_FFF7);
        assert_eq!(
            port.regs().peek(Reg::new(Bank::B, RegKind::Dir)),
            0xFFFF_FFF7
        );
        assert_eq!(port.regs().peek(Reg::new(Bank::A, RegKind::Out)), 0);
    }

    #[test]
    fn reset_state_has_no_mode() {
        let port = port();
        assert_eq!(port.mode(PinId::new(12)), None);
    }

    #[test]
    fn bit_bang_masks() {
        let port = port();
        let pin = PinId::new(33);
        assert_eq!(
            port.mask_set(pin),
            (Reg::new(Bank::B, RegKind::OutSet), 1 << 1)
        );
        assert_eq!(
            port.mask_clear(pin),
            (Reg::new(Bank::B, RegKind::OutClr), 1 << 1)
        );
        assert_eq!(
            port.mask_toggle(pin),
            (Reg::new(Bank::B, RegKind::OutTgl), 1 << 1)
        );
    }

    #[test]
    fn check_reports_unbonded_pins() {
        let port = Port::new(SimPort::new(), Package::G);
        assert_eq!(port.check(PinId::new(34)), Ok(PinId::new(34)));
        assert_eq!(
            port.check(PinId::new(32)),
            Err(PinError::NotBonded(PinId::new(32)))
        );
    }

    #[test]
    #[should_panic(expected = "PB00 is not bonded out")]
    fn unbonded_pin_fails_fast() {
        let port = Port::new(SimPort::new(), Package::G);
        port.configure(PinId::new(32), PinMode::Output);
    }
}
