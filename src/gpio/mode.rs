//! # Pin modes
//!
//! [`PinMode`] is the closed set of configurations [`Port::configure`] knows how
//! to write. A mode is never stored; the registers are the only record of it,
//! and [`Port::mode`] decodes them again on request.
//!
//! [`Port::configure`]: super::Port::configure
//! [`Port::mode`]: super::Port::mode
use super::reg::PinCfg;

//==================================================================================================
//  Function
//==================================================================================================

/// Peripheral multiplexer selector
///
/// The peripheral behind each letter depends on the pin, see the I/O multiplexing table in the
/// datasheet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Function {
    /// EIC
    A = 0,
    /// ADC, AC, DAC, PTC
    B = 1,
    /// SERCOM
    C = 2,
    /// SERCOM alternate
    D = 3,
    /// TC
    E = 4,
    /// TCC
    F = 5,
    /// TCC, PDEC
    G = 6,
    /// QSPI, CAN1, USB, CORTEX_CM4
    H = 7,
    /// SDHC, CAN0
    I = 8,
    /// I2S
    J = 9,
    /// PCC
    K = 10,
    /// GMAC
    L = 11,
    /// GCLK, AC
    M = 12,
    /// CCL
    N = 13,
}

impl Function {
    /// Decode a multiplexer nibble. Values 14 and 15 are reserved.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        use Function::*;
        Some(match bits {
            0 => A,
            1 => B,
            2 => C,
            3 => D,
            4 => E,
            5 => F,
            6 => G,
            7 => H,
            8 => I,
            9 => J,
            10 => K,
            11 => L,
            12 => M,
            13 => N,
            _ => return None,
        })
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

//==================================================================================================
//  PinMode
//==================================================================================================

/// Value-level `enum` representing pin modes
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Driven output. The input buffer stays on so the pin can read back its own level.
    Output,
    /// Floating input
    Input,
    InputPulldown,
    InputPullup,
    /// Peripheral function with strong drive and the digital input enabled
    Peripheral(Function),
    /// Peripheral function with strong drive, digital input disabled
    PeripheralAlt(Function),
    /// Peripheral function with default drive and no digital input, used for pins like USB and
    /// QSPI which are fully controlled by their peripheral
    PeripheralRaw(Function),
    /// Disconnected from the digital input path and routed to the analog peripherals
    Analog,
}

/// SERCOM on the primary multiplexer position
pub const SERCOM: PinMode = PinMode::Peripheral(Function::C);
/// SERCOM on the alternate multiplexer position
pub const SERCOM_ALT: PinMode = PinMode::PeripheralAlt(Function::D);
/// Communication peripherals like USB and QSPI
pub const COM: PinMode = PinMode::PeripheralRaw(Function::H);
pub const ANALOG: PinMode = PinMode::Analog;

//==================================================================================================
//  ModeFields
//==================================================================================================

/// Collect all fields needed to set the [`PinMode`]
///
/// `None` means the register is left alone by this mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(super) struct ModeFields {
    /// true for output
    pub dir: Option<bool>,
    /// With the pull resistor enabled: true for pull-up, false for pull-down
    pub out: Option<bool>,
    pub pmux: Option<Function>,
    pub pincfg: PinCfg,
}

impl From<PinMode> for ModeFields {
    #[inline]
    fn from(mode: PinMode) -> Self {
        use PinMode::*;
        let mut fields = ModeFields {
            dir: None,
            out: None,
            pmux: None,
            pincfg: PinCfg::INEN,
        };
        match mode {
            Output => {
                fields.dir = Some(true);
            }
            Input => {
                fields.dir = Some(false);
            }
            InputPulldown => {
                fields.dir = Some(false);
                fields.out = Some(false);
                fields.pincfg = PinCfg::INEN | PinCfg::PULLEN;
            }
            InputPullup => {
                fields.dir = Some(false);
                fields.out = Some(true);
                fields.pincfg = PinCfg::INEN | PinCfg::PULLEN;
            }
            Peripheral(function) => {
                fields.pmux = Some(function);
                fields.pincfg = PinCfg::PMUXEN | PinCfg::DRVSTR | PinCfg::INEN;
            }
            PeripheralAlt(function) => {
                fields.pmux = Some(function);
                fields.pincfg = PinCfg::PMUXEN | PinCfg::DRVSTR;
            }
            PeripheralRaw(function) => {
                fields.pmux = Some(function);
                fields.pincfg = PinCfg::PMUXEN;
            }
            Analog => {
                fields.pmux = Some(Function::B);
                fields.pincfg = PinCfg::PMUXEN | PinCfg::DRVSTR;
            }
        }
        fields
    }
}

impl PinMode {
    /// Recover the mode from the raw register state of a pin
    ///
    /// Returns `None` for encodings no [`PinMode`] produces, e.g. the reset state where the
    /// input buffer is off. `PeripheralAlt(Function::B)` and `Analog` write identical register
    /// values and decode as `Analog`.
    pub fn decode(dir: bool, out: bool, pincfg: PinCfg, pmux: u8) -> Option<PinMode> {
        if pincfg.pmuxen() {
            let function = Function::from_bits(pmux)?;
            return match (pincfg.drvstr(), pincfg.inen(), pincfg.pullen()) {
                (true, true, false) => Some(PinMode::Peripheral(function)),
                (true, false, false) if function == Function::B => Some(PinMode::Analog),
                (true, false, false) => Some(PinMode::PeripheralAlt(function)),
                (false, false, false) => Some(PinMode::PeripheralRaw(function)),
                _ => None,
            };
        }
        let input_only = PinCfg::INEN;
        let pulled = PinCfg::INEN | PinCfg::PULLEN;
        match (dir, pincfg) {
            (true, cfg) if cfg == input_only => Some(PinMode::Output),
            (false, cfg) if cfg == input_only => Some(PinMode::Input),
            (false, cfg) if cfg == pulled && out => Some(PinMode::InputPullup),
            (false, cfg) if cfg == pulled => Some(PinMode::InputPulldown),
            _ => None,
        }
    }

    #[inline]
    pub fn is_output(&self) -> bool {
        matches!(self, PinMode::Output)
    }

    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            PinMode::Input | PinMode::InputPulldown | PinMode::InputPullup
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_modes_drive_out() {
        let up = ModeFields::from(PinMode::InputPullup);
        assert_eq!(up.dir, Some(false));
        assert_eq!(up.out, Some(true));
        assert_eq!(up.pincfg, PinCfg::INEN | PinCfg::PULLEN);
        let down = ModeFields::from(PinMode::InputPulldown);
        assert_eq!(down.out, Some(false));
    }

    #[test]
    fn peripheral_variants_differ_in_pincfg() {
        assert_eq!(ModeFields::from(SERCOM).pincfg.bits(), 0b0100_0011);
        assert_eq!(ModeFields::from(SERCOM_ALT).pincfg.bits(), 0b0100_0001);
        assert_eq!(ModeFields::from(COM).pincfg.bits(), 0b0000_0001);
        let analog = ModeFields::from(ANALOG);
        assert_eq!(analog.pmux, Some(Function::B));
        assert!(!analog.pincfg.inen());
        assert_eq!(analog.dir, None);
    }

    #[test]
    fn decode_inverts_encode() {
        let modes = [
            PinMode::Output,
            PinMode::Input,
            PinMode::InputPulldown,
            PinMode::InputPullup,
            SERCOM,
            SERCOM_ALT,
            COM,
            PinMode::Peripheral(Function::N),
            PinMode::Analog,
        ];
        for mode in modes {
            let fields = ModeFields::from(mode);
            let dir = fields.dir.unwrap_or(false);
            let out = fields.out.unwrap_or(false);
            let pmux = fields.pmux.map(Function::bits).unwrap_or(0);
            assert_eq!(PinMode::decode(dir, out, fields.pincfg, pmux), Some(mode));
        }
    }

    #[test]
    fn decode_rejects_reset_state() {
        assert_eq!(PinMode::decode(false, false, PinCfg::default(), 0), None);
        assert_eq!(
            PinMode::decode(false, false, PinCfg::PMUXEN, 14),
            None,
            "reserved selector"
        );
    }

    #[test]
    fn function_bits() {
        assert_eq!(Function::from_bits(6), Some(Function::G));
        assert_eq!(Function::from_bits(15), None);
        assert_eq!(Function::H.bits(), 7);
    }
}
