//! Indexed pixel-run decoding and the uncompressed image container.
//!
//! Image data arrives in one of four encodings: 1, 4 or 8 bits per pixel
//! through a palette, or 16-bit words already in native form. Runs are
//! decoded straight into a [`Framebuffer`] row; multi-row blits are
//! driven by [`Framebuffer::draw_image`], one byte-aligned row at a
//! time.

use crate::color::NativeColor;
use crate::framebuffer::Framebuffer;

/// Pixel encoding of a run or an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageFormat {
    /// 1 bpp, most significant bit first, two-entry palette of already
    /// translated colors.
    Mono,
    /// 4 bpp, high nibble first, palette of 24-bit RGB entries.
    Indexed4,
    /// 8 bpp, one palette index per byte.
    Indexed8,
    /// 16 bpp little-endian words in native (translated) form.
    Native,
}

impl ImageFormat {
    /// Map an image header format tag (the bit depth) to a format.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ImageFormat::Mono),
            4 => Some(ImageFormat::Indexed4),
            8 => Some(ImageFormat::Indexed8),
            16 => Some(ImageFormat::Native),
            _ => None,
        }
    }

    pub const fn bits_per_pixel(self) -> usize {
        match self {
            ImageFormat::Mono => 1,
            ImageFormat::Indexed4 => 4,
            ImageFormat::Indexed8 => 8,
            ImageFormat::Native => 16,
        }
    }

    /// Source bytes per image row; every row starts on a byte boundary.
    pub const fn bytes_per_row(self, width: u16) -> usize {
        (width as usize * self.bits_per_pixel() + 7) / 8
    }
}

/// A borrowed palette of 24-bit RGB entries.
///
/// Entries are three bytes each, stored little-endian (blue first), the
/// layout image containers carry them in. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct Palette<'a>(&'a [u8]);

impl<'a> Palette<'a> {
    /// Wrap raw palette bytes; length should be a multiple of 3.
    pub fn new(entries: &'a [u8]) -> Self {
        Self(entries)
    }

    /// Number of color entries.
    pub fn len(&self) -> usize {
        self.0.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The 24-bit RGB value of one entry.
    pub fn rgb(&self, index: usize) -> u32 {
        let i = index * 3;
        u32::from_le_bytes([self.0[i], self.0[i + 1], self.0[i + 2], 0])
    }
}

/// One run of encoded pixels plus the lookup data its format needs.
#[derive(Debug, Clone, Copy)]
pub enum PixelSource<'a> {
    /// 1 bpp data with a pre-translated two-entry palette. No color
    /// translation happens at this depth.
    Mono {
        data: &'a [u8],
        palette: &'a [NativeColor; 2],
    },
    /// 4 bpp data with an untranslated RGB palette.
    Indexed4 { data: &'a [u8], palette: Palette<'a> },
    /// 8 bpp data with an untranslated RGB palette.
    Indexed8 { data: &'a [u8], palette: Palette<'a> },
    /// Native 16-bit little-endian words, copied through untouched.
    Native { data: &'a [u8] },
}

impl Framebuffer {
    /// Decode `count` pixels into one row, left to right, starting at
    /// `(x, y)`.
    ///
    /// `offset` is the sub-pixel position within the first source unit:
    /// the bit index (0-7) for 1 bpp, 0 or 1 to start on the low nibble
    /// for 4 bpp, ignored for the byte-aligned formats. The caller
    /// guarantees the run fits the row; there is no row wrap.
    pub fn draw_run(
        &mut self,
        x: usize,
        y: usize,
        offset: usize,
        count: usize,
        source: PixelSource<'_>,
    ) {
        let run = &mut self.px[y][x..x + count];

        match source {
            PixelSource::Mono { data, palette } => {
                let mut written = 0;
                let mut bit = offset;
                for &byte in data {
                    while bit < 8 && written < count {
                        run[written] = palette[usize::from((byte >> (7 - bit)) & 1)];
                        written += 1;
                        bit += 1;
                    }
                    if written == count {
                        break;
                    }
                    bit = 0;
                }
            }
            PixelSource::Indexed4 { data, palette } => {
                // Explicit pending-nibble state; a run may start or stop
                // mid-byte.
                let mut high = offset == 0;
                let mut i = 0;
                for slot in run.iter_mut() {
                    let index = if high {
                        usize::from(data[i] >> 4)
                    } else {
                        let low = usize::from(data[i] & 0x0f);
                        i += 1;
                        low
                    };
                    high = !high;
                    *slot = NativeColor::from_rgb(palette.rgb(index));
                }
            }
            PixelSource::Indexed8 { data, palette } => {
                for (slot, &index) in run.iter_mut().zip(&data[..count]) {
                    *slot = NativeColor::from_rgb(palette.rgb(usize::from(index)));
                }
            }
            PixelSource::Native { data } => {
                for (slot, word) in run.iter_mut().zip(data.chunks_exact(2)) {
                    *slot = NativeColor(u16::from_le_bytes([word[0], word[1]]));
                }
            }
        }
    }

    /// Blit a parsed image with its top-left corner at `(x, y)`.
    ///
    /// Mono images are drawn black-on-white; use
    /// [`Framebuffer::draw_image_mono`] to pick the two colors.
    pub fn draw_image(&mut self, image: &Image<'_>, x: usize, y: usize) {
        if image.format == ImageFormat::Mono {
            self.draw_image_mono(image, x, y, &[NativeColor::BLACK, NativeColor::WHITE]);
            return;
        }

        let stride = image.format.bytes_per_row(image.width);
        let palette = image.palette();
        let rows = image.data.chunks(stride).take(usize::from(image.height));
        for (row, data) in rows.enumerate() {
            let source = match image.format {
                ImageFormat::Indexed4 => PixelSource::Indexed4 { data, palette },
                ImageFormat::Indexed8 => PixelSource::Indexed8 { data, palette },
                _ => PixelSource::Native { data },
            };
            self.draw_run(x, y + row, 0, usize::from(image.width), source);
        }
    }

    /// Blit a 1 bpp image using the given pre-translated colors for
    /// clear and set bits.
    pub fn draw_image_mono(
        &mut self,
        image: &Image<'_>,
        x: usize,
        y: usize,
        palette: &[NativeColor; 2],
    ) {
        let stride = ImageFormat::Mono.bytes_per_row(image.width);
        let rows = image.data.chunks(stride).take(usize::from(image.height));
        for (row, data) in rows.enumerate() {
            self.draw_run(
                x,
                y + row,
                0,
                usize::from(image.width),
                PixelSource::Mono { data, palette },
            );
        }
    }
}

/// Errors from parsing an image container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageError {
    /// The byte stream ends before header, palette or pixel data do.
    Truncated,
    /// The format tag is not one of the supported bit depths.
    UnknownFormat,
}

/// A borrowed, parsed image.
///
/// Wire layout: format tag byte (the bit depth), width and height as
/// little-endian `u16`, then for the 4/8 bpp formats a palette-size byte
/// holding `entries - 1` followed by the three-byte entries, then the
/// pixel rows. Mono images carry no palette; the colors come from the
/// drawing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image<'a> {
    pub format: ImageFormat,
    pub width: u16,
    pub height: u16,
    palette: &'a [u8],
    data: &'a [u8],
}

impl<'a> Image<'a> {
    /// Parse an image header and check that palette and pixel data are
    /// fully present. The pixel data itself is not validated.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ImageError> {
        if bytes.len() < 5 {
            return Err(ImageError::Truncated);
        }
        let format = ImageFormat::from_tag(bytes[0]).ok_or(ImageError::UnknownFormat)?;
        let width = u16::from_le_bytes([bytes[1], bytes[2]]);
        let height = u16::from_le_bytes([bytes[3], bytes[4]]);
        let rest = &bytes[5..];

        let (palette, rest) = match format {
            ImageFormat::Indexed4 | ImageFormat::Indexed8 => {
                let (&count, rest) = rest.split_first().ok_or(ImageError::Truncated)?;
                let len = (usize::from(count) + 1) * 3;
                if rest.len() < len {
                    return Err(ImageError::Truncated);
                }
                rest.split_at(len)
            }
            ImageFormat::Mono | ImageFormat::Native => (&rest[..0], rest),
        };

        let expected = format.bytes_per_row(width) * usize::from(height);
        let data = rest.get(..expected).ok_or(ImageError::Truncated)?;

        Ok(Self {
            format,
            width,
            height,
            palette,
            data,
        })
    }

    /// The embedded palette bytes (empty for mono and native images).
    pub fn palette(&self) -> Palette<'a> {
        Palette::new(self.palette)
    }

    /// The raw pixel rows.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}
