//! GPIO support for the PORT peripheral of the Microchip ATSAMD51 family
//!
//! See the [`gpio`] module for an overview.
#![cfg_attr(not(test), no_std)]

pub mod gpio;
pub mod prelude;
