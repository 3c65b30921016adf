//! Board-agnostic rasterizer core for the Kaleido display stack
//!
//! This crate contains everything that can be computed without touching
//! hardware:
//!
//! - Color translation to the panel's 16-bit wire format
//! - An in-memory frame buffer with the drawing primitives panel drivers
//!   and the `embedded-graphics` ecosystem build on
//! - Decoding of indexed (1/4/8 bpp) and native pixel runs and of the
//!   uncompressed image container that carries them
//!
//! All drawing lands in the [`Framebuffer`]; pushing a finished frame to
//! a physical panel is the job of a driver crate.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod color;
pub mod framebuffer;
pub mod image;

// Re-export key types at crate root for convenience
pub use color::NativeColor;
pub use framebuffer::{Framebuffer, Rect, HEIGHT, WIDTH};
pub use image::{Image, ImageError, ImageFormat, Palette, PixelSource};
