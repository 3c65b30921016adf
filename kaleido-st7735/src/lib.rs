//! ST7735 panel driver for the Crystalfontz 128x128 LCD
//!
//! The driver owns the frame buffer and the transport link. Drawing goes
//! to the buffer (directly or through `embedded-graphics`); an explicit
//! [`Display::flush`] pushes the whole frame to the controller. There is
//! no partial update; every flush retransmits all pixels.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod spi_link;

// Re-export key types at crate root for convenience
pub use display::{Display, Orientation};
pub use spi_link::{SpiLink, SpiLinkError};
