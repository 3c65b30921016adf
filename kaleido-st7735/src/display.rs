//! Panel driver: controller bring-up, orientation and the flush engine.

use embedded_hal::delay::DelayNs;
use kaleido_hal::DisplayLink;
use kaleido_raster::{Framebuffer, NativeColor, Rect, HEIGHT, WIDTH};

/// ST7735 command set (the subset this driver uses)
#[allow(dead_code)]
mod cmd {
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const GAMSET: u8 = 0x26;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const SETPWCTR: u8 = 0xB1;
    pub const SETSTBA: u8 = 0xC0;

    pub const MADCTL_MY: u8 = 0x80;
    pub const MADCTL_MX: u8 = 0x40;
    pub const MADCTL_MV: u8 = 0x20;
    pub const MADCTL_BGR: u8 = 0x08;
}

/// Screen orientation.
///
/// Changing orientation reprograms the controller's scan direction and
/// shifts the addressing window; it never touches buffer contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    #[default]
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl Orientation {
    /// Orientation from its numeric index; only the low two bits count.
    pub fn from_index(index: u8) -> Self {
        match index & 0x3 {
            0 => Orientation::Up,
            1 => Orientation::Left,
            2 => Orientation::Down,
            _ => Orientation::Right,
        }
    }

    /// Addressing-window offset for this orientation.
    ///
    /// The panel's visible area does not start at controller address
    /// (0, 0) in every rotation. These are the vendor's per-rotation
    /// constants, taken as given.
    pub const fn window_offset(self) -> (u16, u16) {
        match self {
            Orientation::Up => (2, 3),
            Orientation::Left => (3, 2),
            Orientation::Down => (2, 1),
            Orientation::Right => (1, 2),
        }
    }

    /// MADCTL scan-direction byte for this orientation.
    const fn madctl(self) -> u8 {
        match self {
            Orientation::Up => cmd::MADCTL_MX | cmd::MADCTL_MY | cmd::MADCTL_BGR,
            Orientation::Left => cmd::MADCTL_MY | cmd::MADCTL_MV | cmd::MADCTL_BGR,
            Orientation::Down => cmd::MADCTL_BGR,
            Orientation::Right => cmd::MADCTL_MX | cmd::MADCTL_MV | cmd::MADCTL_BGR,
        }
    }
}

/// The panel driver.
///
/// Owns the frame buffer and the link. All drawing is buffered;
/// [`Display::flush`] serializes the full frame, row-major, to the
/// controller and blocks until the last byte is handed to the link.
pub struct Display<L> {
    link: L,
    fb: Framebuffer,
    orientation: Orientation,
}

impl<L: DisplayLink> Display<L> {
    /// Create a driver over a link. The buffer starts black; nothing is
    /// sent until [`Display::init`] or [`Display::flush`].
    pub fn new(link: L) -> Self {
        Self {
            link,
            fb: Framebuffer::new(),
            orientation: Orientation::Up,
        }
    }

    /// One-time controller bring-up.
    ///
    /// Sleep-out, gamma, power and stand-by control, 16-bit color mode,
    /// scan direction, then a first full flush before the display turns
    /// on. The transport must already be initialized and the panel out
    /// of reset; that sequencing lives with the link implementation.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), L::Error> {
        self.link.write_command(cmd::SLPOUT)?;
        delay.delay_ms(120);

        self.link.write_command(cmd::GAMSET)?;
        self.link.write_data(0x04)?;

        self.link.write_command(cmd::SETPWCTR)?;
        self.link.write_data(0x0A)?;
        self.link.write_data(0x14)?;

        self.link.write_command(cmd::SETSTBA)?;
        self.link.write_data(0x0A)?;
        self.link.write_data(0x00)?;

        self.link.write_command(cmd::COLMOD)?;
        self.link.write_data(0x05)?;
        delay.delay_us(10);

        self.link.write_command(cmd::MADCTL)?;
        self.link.write_data(cmd::MADCTL_BGR)?;

        self.link.write_command(cmd::NORON)?;

        self.flush()?;
        delay.delay_us(10);

        self.link.write_command(cmd::DISPON)
    }

    /// Current orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Set the orientation and reprogram the controller scan direction.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), L::Error> {
        self.orientation = orientation;
        self.link.write_command(cmd::MADCTL)?;
        self.link.write_data(orientation.madctl())
    }

    /// Program the addressing window, bounds inclusive, shifted by the
    /// orientation offset. Coordinates go out high byte first.
    fn set_draw_frame(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), L::Error> {
        let (dx, dy) = self.orientation.window_offset();
        let (x0, x1) = (x0 + dx, x1 + dx);
        let (y0, y1) = (y0 + dy, y1 + dy);

        self.link.write_command(cmd::CASET)?;
        self.link.write_data((x0 >> 8) as u8)?;
        self.link.write_data(x0 as u8)?;
        self.link.write_data((x1 >> 8) as u8)?;
        self.link.write_data(x1 as u8)?;

        self.link.write_command(cmd::RASET)?;
        self.link.write_data((y0 >> 8) as u8)?;
        self.link.write_data(y0 as u8)?;
        self.link.write_data((y1 >> 8) as u8)?;
        self.link.write_data(y1 as u8)
    }

    /// Push the entire frame buffer to the panel.
    ///
    /// Full frame, every time; the stream for an unchanged buffer is
    /// byte-identical across calls. Blocks until the last pixel has been
    /// handed to the link.
    pub fn flush(&mut self) -> Result<(), L::Error> {
        self.set_draw_frame(0, 0, (WIDTH - 1) as u16, (HEIGHT - 1) as u16)?;
        self.link.write_command(cmd::RAMWR)?;

        for pixel in self.fb.pixels() {
            let [low, high] = pixel.bytes();
            self.link.write_data(low)?;
            self.link.write_data(high)?;
        }
        Ok(())
    }

    /// Fill the buffer with one color. Flush separately.
    pub fn clear(&mut self, color: NativeColor) {
        self.fb.fill(color);
    }

    /// Fill a rectangle in the buffer.
    pub fn fill_rect(&mut self, rect: &Rect, color: NativeColor) {
        self.fb.fill_rect(rect, color);
    }

    /// The composed frame.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Mutable access for the rasterizer and blit operations.
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.fb
    }

    /// Tear down the driver and hand the link back.
    pub fn release(self) -> L {
        self.link
    }
}

// Forward the embedded-graphics seam to the buffer, so primitives can be
// drawn on the display object directly.

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::Rgb565,
    primitives::Rectangle,
    Pixel,
};

impl<L> DrawTarget for Display<L> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.fb.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fb.fill_solid(area, color)
    }
}

impl<L> OriginDimensions for Display<L> {
    fn size(&self) -> Size {
        self.fb.size()
    }
}
