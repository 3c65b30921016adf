//! Color translation to the panel's native pixel format.
//!
//! The panel stores 16-bit 5-6-5 RGB pixels and receives them over the
//! link as two bytes, most significant first. Pixels are therefore kept
//! in memory already byte-swapped, so the transmit loop can emit the low
//! byte then the high byte of each stored word without reshuffling.

/// A pixel in the display's native representation.
///
/// The inner value is the 5-6-5 packed color with its two bytes swapped:
/// bits 0-7 hold the red channel and the top of green, bits 8-15 the rest
/// of green and blue. The swap is part of the wire contract, not a
/// convention this crate is free to change; storing unswapped values
/// produces visibly corrupted colors on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NativeColor(pub u16);

impl NativeColor {
    pub const BLACK: NativeColor = NativeColor::from_rgb(0x00_0000);
    pub const WHITE: NativeColor = NativeColor::from_rgb(0xFF_FFFF);
    pub const RED: NativeColor = NativeColor::from_rgb(0xFF_0000);
    pub const GREEN: NativeColor = NativeColor::from_rgb(0x00_FF00);
    pub const BLUE: NativeColor = NativeColor::from_rgb(0x00_00FF);
    pub const YELLOW: NativeColor = NativeColor::from_rgb(0xFF_FF00);
    pub const CYAN: NativeColor = NativeColor::from_rgb(0x00_FFFF);
    pub const MAGENTA: NativeColor = NativeColor::from_rgb(0xFF_00FF);

    /// Translate a 24-bit RGB color (red in bits 16-23, green in bits
    /// 8-15, blue in bits 0-7) to the native representation.
    ///
    /// Each channel is truncated to its native width by keeping its high
    /// bits, packed as `RRRRR GGGGGG BBBBB`, and the result byte-swapped.
    pub const fn from_rgb(rgb: u32) -> Self {
        let rgb565 = ((rgb & 0x00f8_0000) >> 8)
            | ((rgb & 0x0000_fc00) >> 5)
            | ((rgb & 0x0000_00f8) >> 3);
        NativeColor((rgb565 as u16).swap_bytes())
    }

    /// The plain 5-6-5 value, undoing the storage byte swap.
    pub const fn rgb565(self) -> u16 {
        self.0.swap_bytes()
    }

    /// The two bytes of this pixel in transmit order.
    pub const fn bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl From<u32> for NativeColor {
    /// Translate from 24-bit RGB, see [`NativeColor::from_rgb`].
    fn from(rgb: u32) -> Self {
        Self::from_rgb(rgb)
    }
}

use embedded_graphics_core::pixelcolor::{raw::RawU16, Rgb565};
use embedded_graphics_core::prelude::RawData;

impl From<Rgb565> for NativeColor {
    fn from(color: Rgb565) -> Self {
        NativeColor(RawU16::from(color).into_inner().swap_bytes())
    }
}

impl From<NativeColor> for Rgb565 {
    fn from(color: NativeColor) -> Self {
        RawU16::new(color.rgb565()).into()
    }
}
