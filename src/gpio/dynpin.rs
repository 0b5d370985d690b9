//! # Value-level pin handles
//!
//! A [`DynPin`] bundles a [`PinId`] with a reference to its [`Port`], so a
//! single pin can be handed to a driver expecting the embedded HAL GPIO traits.
//!
//! ```ignore
//! let port = Port::take(Package::G).unwrap();
//! let mut led = port.into_mode(PinId::new(17), PinMode::Output);
//! led.set_high().ok();
//! ```
//!
//! Unlike the handles of HALs with a type-level pin API, a [`DynPin`] does not
//! remember the mode it was put into. The operations check the registers
//! instead, so a pin reconfigured through the [`Port`] (or by a peripheral
//! driver) is never acted upon with stale assumptions.
//!
//! # Embedded HAL traits
//!
//! This module implements all of the embedded HAL GPIO traits for [`DynPin`]. If the direction
//! or input buffer of the pin does not allow the operation, the trait functions return
//! [`InvalidPinType`](PinError::InvalidPinType).

use super::mode::{Function, PinMode};
use super::pin::{PinError, PinId, PinState};
use super::port::Port;
use super::reg::RegisterBank;
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

//==================================================================================================
//  DynPin
//==================================================================================================

/// A value-level pin of a [`Port`]
pub struct DynPin<'a, R: RegisterBank> {
    port: &'a Port<R>,
    id: PinId,
}

impl<'a, R: RegisterBank> DynPin<'a, R> {
    /// The pin must be bonded out on the package of `port`
    #[inline]
    pub(super) fn new(port: &'a Port<R>, id: PinId) -> Self {
        DynPin { port, id }
    }

    /// Return a copy of the pin ID
    #[inline]
    pub fn id(&self) -> PinId {
        self.id
    }

    /// Decode the pin mode from the registers
    #[inline]
    pub fn mode(&self) -> Option<PinMode> {
        self.port.mode(self.id)
    }

    /// Convert the pin to the requested [`PinMode`]
    #[inline]
    pub fn into_mode(&mut self, mode: PinMode) {
        self.port.configure(self.id, mode);
    }

    /// Configure the pin to operate as an output
    #[inline]
    pub fn into_output(&mut self) {
        self.into_mode(PinMode::Output);
    }

    /// Configure the pin to operate as an output with the given initial level
    ///
    /// The level is written before the direction changes, so the pin never glitches to the
    /// previous output value.
    #[inline]
    pub fn into_output_in_state(&mut self, state: PinState) {
        self.port.set_level(self.id, state.into());
        self.into_mode(PinMode::Output);
    }

    /// Configure the pin to operate as a floating input
    #[inline]
    pub fn into_floating_input(&mut self) {
        self.into_mode(PinMode::Input);
    }

    /// Configure the pin to operate as a pulled down input
    #[inline]
    pub fn into_pull_down_input(&mut self) {
        self.into_mode(PinMode::InputPulldown);
    }

    /// Configure the pin to operate as a pulled up input
    #[inline]
    pub fn into_pull_up_input(&mut self) {
        self.into_mode(PinMode::InputPullup);
    }

    /// Route the pin to a peripheral. See the I/O multiplexing table of the datasheet.
    #[inline]
    pub fn into_peripheral(&mut self, function: Function) {
        self.into_mode(PinMode::Peripheral(function));
    }

    #[inline]
    pub fn into_analog(&mut self) {
        self.into_mode(PinMode::Analog);
    }

    #[inline]
    fn _read(&self) -> Result<bool, PinError> {
        if self.port.pin_cfg(self.id).inen() {
            Ok(self.port.level(self.id))
        } else {
            Err(PinError::InvalidPinType)
        }
    }

    #[inline]
    fn _write(&mut self, bit: bool) -> Result<(), PinError> {
        if self.port.is_output(self.id) {
            self.port.set_level(self.id, bit);
            Ok(())
        } else {
            Err(PinError::InvalidPinType)
        }
    }

    #[inline]
    fn _toggle(&mut self) -> Result<(), PinError> {
        if self.port.is_output(self.id) {
            self.port.toggle(self.id);
            Ok(())
        } else {
            Err(PinError::InvalidPinType)
        }
    }

    #[inline]
    fn _is_set_high(&self) -> Result<bool, PinError> {
        if self.port.is_output(self.id) {
            Ok(self.port.is_set_high(self.id))
        } else {
            Err(PinError::InvalidPinType)
        }
    }
}

//==================================================================================================
// Embedded HAL traits
//==================================================================================================

impl<R: RegisterBank> OutputPin for DynPin<'_, R> {
    type Error = PinError;
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self._write(true)
    }
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self._write(false)
    }
}

impl<R: RegisterBank> InputPin for DynPin<'_, R> {
    type Error = PinError;
    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        self._read()
    }
    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        self._read().map(|v| !v)
    }
}

impl<R: RegisterBank> StatefulOutputPin for DynPin<'_, R> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        self._is_set_high()
    }
    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        self._is_set_high().map(|v| !v)
    }
}

impl<R: RegisterBank> ToggleableOutputPin for DynPin<'_, R> {
    type Error = PinError;
    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self._toggle()
    }
}
