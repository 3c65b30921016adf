//! In-memory frame buffer and drawing primitives.
//!
//! All drawing operations write to the buffer; nothing here talks to
//! hardware. Horizontal runs use a two-pixels-per-iteration fast path
//! over the even-aligned interior of the run, which must stay
//! pixel-identical to the naive per-pixel loop (the unit tests hold the
//! two against each other).
//!
//! Coordinates are buffer-relative and unchecked beyond Rust's slice
//! bounds checks plus debug assertions; keeping them in range is the
//! caller's contract.

use crate::color::NativeColor;

/// Panel width in pixels.
pub const WIDTH: usize = 128;

/// Panel height in pixels.
pub const HEIGHT: usize = 128;

/// An axis-aligned rectangle with inclusive bounds.
///
/// Invariant: `x_min <= x_max` and `y_min <= y_max`. Not validated here;
/// the fill operations debug-assert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x_min: u16,
    pub y_min: u16,
    pub x_max: u16,
    pub y_max: u16,
}

impl Rect {
    pub const fn new(x_min: u16, y_min: u16, x_max: u16, y_max: u16) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Width in pixels (bounds are inclusive).
    pub const fn width(&self) -> u16 {
        self.x_max - self.x_min + 1
    }

    /// Height in pixels (bounds are inclusive).
    pub const fn height(&self) -> u16 {
        self.y_max - self.y_min + 1
    }
}

/// Full-frame pixel store, one native pixel per cell, indexed row-major.
///
/// Owned by whoever composes the frame (typically a panel driver), so
/// multiple instances can coexist for off-screen work and tests. A fresh
/// buffer is black.
#[derive(Clone)]
pub struct Framebuffer {
    pub(crate) px: [[NativeColor; WIDTH]; HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Create a new all-black frame buffer.
    pub fn new() -> Self {
        Self {
            px: [[NativeColor::BLACK; WIDTH]; HEIGHT],
        }
    }

    /// Read one pixel.
    pub fn pixel(&self, x: usize, y: usize) -> NativeColor {
        self.px[y][x]
    }

    /// Set one pixel.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: NativeColor) {
        self.px[y][x] = color;
    }

    /// Draw a horizontal line from `x1` to `x2` inclusive on row `y`.
    ///
    /// A leading pixel on an odd column and a trailing pixel on an even
    /// column are written individually; the remaining interior starts on
    /// an even column and has even length, and is filled two pixels per
    /// iteration.
    pub fn hline(&mut self, x1: usize, x2: usize, y: usize, color: NativeColor) {
        debug_assert!(x1 <= x2 && x2 < WIDTH && y < HEIGHT);

        let row = &mut self.px[y];
        let (mut x1, mut x2) = (x1, x2);

        if x1 & 1 == 1 {
            // starts at an odd coordinate: fill in first pixel
            row[x1] = color;
            x1 += 1;
        }
        if x2 & 1 == 0 {
            // ends at an even coordinate: fill in last pixel
            row[x2] = color;
            if x2 == 0 {
                return;
            }
            x2 -= 1;
        }
        if x1 >= x2 {
            return;
        }

        // fill in the bulk of the line 2 pixels at a time
        for pair in row[x1..=x2].chunks_exact_mut(2) {
            pair[0] = color;
            pair[1] = color;
        }
    }

    /// Draw a vertical line from `y1` to `y2` inclusive on column `x`.
    ///
    /// Rows are not contiguous, so there is no batched variant.
    pub fn vline(&mut self, x: usize, y1: usize, y2: usize, color: NativeColor) {
        debug_assert!(y1 <= y2 && y2 < HEIGHT && x < WIDTH);

        for row in &mut self.px[y1..=y2] {
            row[x] = color;
        }
    }

    /// Fill a rectangle, bounds inclusive.
    ///
    /// Applies the same odd/even column trim as [`Framebuffer::hline`]
    /// once for the whole rectangle, then runs the two-pixel fill over
    /// each interior row.
    pub fn fill_rect(&mut self, rect: &Rect, color: NativeColor) {
        debug_assert!(rect.x_min <= rect.x_max && (rect.x_max as usize) < WIDTH);
        debug_assert!(rect.y_min <= rect.y_max && (rect.y_max as usize) < HEIGHT);

        let (mut x1, mut x2) = (rect.x_min as usize, rect.x_max as usize);
        let (y1, y2) = (rect.y_min as usize, rect.y_max as usize);

        if x1 & 1 == 1 {
            // starts at an odd coordinate: fill in first column
            self.vline(x1, y1, y2, color);
            x1 += 1;
        }
        if x2 & 1 == 0 {
            // ends at an even coordinate: fill in last column
            self.vline(x2, y1, y2, color);
            if x2 == 0 {
                return;
            }
            x2 -= 1;
        }
        if x1 >= x2 {
            return;
        }

        // fill the bulk of the rectangle, 2 pixels at a time per row
        for row in &mut self.px[y1..=y2] {
            for pair in row[x1..=x2].chunks_exact_mut(2) {
                pair[0] = color;
                pair[1] = color;
            }
        }
    }

    /// Fill the whole buffer with one color.
    pub fn fill(&mut self, color: NativeColor) {
        self.fill_rect(
            &Rect::new(0, 0, (WIDTH - 1) as u16, (HEIGHT - 1) as u16),
            color,
        );
    }

    /// All pixels in row-major order, the order the panel expects them.
    pub fn pixels(&self) -> impl Iterator<Item = NativeColor> + '_ {
        self.px.iter().flat_map(|row| row.iter().copied())
    }
}

// Seam to the embedded-graphics primitives layer (lines, circles, text).
// Out-of-bounds pixels are clipped here because the DrawTarget contract
// requires it; the inherent drawing methods above keep the unchecked
// contract instead.

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Size},
    pixelcolor::Rgb565,
    primitives::Rectangle,
    Pixel,
};

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if (0..WIDTH as i32).contains(&point.x) && (0..HEIGHT as i32).contains(&point.y) {
                self.set_pixel(point.x as usize, point.y as usize, color.into());
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if let Some(bottom_right) = area.bottom_right() {
            self.fill_rect(
                &Rect::new(
                    area.top_left.x as u16,
                    area.top_left.y as u16,
                    bottom_right.x as u16,
                    bottom_right.y as u16,
                ),
                color.into(),
            );
        }
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Per-pixel reference fill the fast path must match exactly.
    fn reference_fill(fb: &mut Framebuffer, rect: &Rect, color: NativeColor) {
        for y in rect.y_min..=rect.y_max {
            for x in rect.x_min..=rect.x_max {
                fb.set_pixel(x as usize, y as usize, color);
            }
        }
    }

    fn buffers_equal(a: &Framebuffer, b: &Framebuffer) -> bool {
        a.pixels().eq(b.pixels())
    }

    #[test]
    fn set_pixel_round_trip() {
        let mut fb = Framebuffer::new();
        assert_eq!(fb.pixel(5, 7), NativeColor::BLACK);
        fb.set_pixel(5, 7, NativeColor::CYAN);
        assert_eq!(fb.pixel(5, 7), NativeColor::CYAN);
        assert_eq!(fb.pixel(7, 5), NativeColor::BLACK);
    }

    #[test]
    fn hline_matches_reference_at_every_alignment() {
        // Every start parity and every length up to 64, per the fast
        // path's boundary cases.
        for x1 in 0..2usize {
            for len in 1..=64usize {
                let x2 = x1 + len - 1;

                let mut fast = Framebuffer::new();
                fast.hline(x1, x2, 3, NativeColor::WHITE);

                let mut naive = Framebuffer::new();
                reference_fill(
                    &mut naive,
                    &Rect::new(x1 as u16, 3, x2 as u16, 3),
                    NativeColor::WHITE,
                );

                assert!(
                    buffers_equal(&fast, &naive),
                    "hline mismatch at x1={x1} len={len}"
                );
            }
        }
    }

    #[test]
    fn hline_at_row_edges() {
        let mut fb = Framebuffer::new();
        fb.hline(0, WIDTH - 1, 0, NativeColor::RED);
        fb.hline(0, 0, HEIGHT - 1, NativeColor::GREEN);
        fb.hline(WIDTH - 1, WIDTH - 1, 1, NativeColor::BLUE);

        assert!((0..WIDTH).all(|x| fb.pixel(x, 0) == NativeColor::RED));
        assert_eq!(fb.pixel(0, HEIGHT - 1), NativeColor::GREEN);
        assert_eq!(fb.pixel(1, HEIGHT - 1), NativeColor::BLACK);
        assert_eq!(fb.pixel(WIDTH - 1, 1), NativeColor::BLUE);
        assert_eq!(fb.pixel(WIDTH - 2, 1), NativeColor::BLACK);
    }

    #[test]
    fn vline_fills_column_only() {
        let mut fb = Framebuffer::new();
        fb.vline(10, 2, 9, NativeColor::YELLOW);

        for y in 0..HEIGHT {
            let expected = if (2..=9).contains(&y) {
                NativeColor::YELLOW
            } else {
                NativeColor::BLACK
            };
            assert_eq!(fb.pixel(10, y), expected);
            assert_eq!(fb.pixel(11, y), NativeColor::BLACK);
            assert_eq!(fb.pixel(9, y), NativeColor::BLACK);
        }
    }

    #[test]
    fn rect_fill_matches_reference_exhaustively() {
        // All widths 1..=64 at both start parities, a couple of rows.
        for x1 in 0..2usize {
            for w in 1..=64usize {
                let rect = Rect::new(x1 as u16, 5, (x1 + w - 1) as u16, 8);

                let mut fast = Framebuffer::new();
                fast.fill_rect(&rect, NativeColor::MAGENTA);

                let mut naive = Framebuffer::new();
                reference_fill(&mut naive, &rect, NativeColor::MAGENTA);

                assert!(
                    buffers_equal(&fast, &naive),
                    "fill_rect mismatch at x1={x1} w={w}"
                );
            }
        }
    }

    #[test]
    fn rect_fill_does_not_bleed() {
        let mut fb = Framebuffer::new();
        fb.fill_rect(&Rect::new(3, 4, 10, 6), NativeColor::WHITE);

        assert_eq!(fb.pixel(2, 5), NativeColor::BLACK);
        assert_eq!(fb.pixel(11, 5), NativeColor::BLACK);
        assert_eq!(fb.pixel(5, 3), NativeColor::BLACK);
        assert_eq!(fb.pixel(5, 7), NativeColor::BLACK);
        assert_eq!(fb.pixel(3, 4), NativeColor::WHITE);
        assert_eq!(fb.pixel(10, 6), NativeColor::WHITE);
    }

    #[test]
    fn fill_covers_everything() {
        let mut fb = Framebuffer::new();
        fb.fill(NativeColor::BLUE);
        assert!(fb.pixels().all(|p| p == NativeColor::BLUE));
    }

    proptest! {
        #[test]
        fn rect_fill_matches_reference(
            x1 in 0usize..WIDTH,
            y1 in 0usize..HEIGHT,
            w in 0usize..64,
            h in 0usize..32,
        ) {
            let x2 = (x1 + w).min(WIDTH - 1);
            let y2 = (y1 + h).min(HEIGHT - 1);
            let rect = Rect::new(x1 as u16, y1 as u16, x2 as u16, y2 as u16);

            let mut fast = Framebuffer::new();
            fast.fill_rect(&rect, NativeColor::RED);

            let mut naive = Framebuffer::new();
            reference_fill(&mut naive, &rect, NativeColor::RED);

            prop_assert!(buffers_equal(&fast, &naive));
        }
    }

    mod draw_target {
        use super::*;
        use embedded_graphics::{
            pixelcolor::RgbColor,
            prelude::*,
            primitives::{Circle, PrimitiveStyle},
        };

        #[test]
        fn fill_solid_routes_through_fast_path() {
            let mut via_target = Framebuffer::new();
            via_target
                .fill_solid(
                    &Rectangle::new(Point::new(10, 10), Size::new(11, 6)),
                    Rgb565::GREEN,
                )
                .unwrap();

            let mut direct = Framebuffer::new();
            direct.fill_rect(&Rect::new(10, 10, 20, 15), NativeColor::GREEN);

            assert!(buffers_equal(&via_target, &direct));
        }

        #[test]
        fn out_of_bounds_pixels_are_clipped() {
            let mut fb = Framebuffer::new();
            fb.draw_iter([
                Pixel(Point::new(-1, 0), Rgb565::WHITE),
                Pixel(Point::new(0, -1), Rgb565::WHITE),
                Pixel(Point::new(WIDTH as i32, 0), Rgb565::WHITE),
                Pixel(Point::new(1, 1), Rgb565::WHITE),
            ])
            .unwrap();

            assert_eq!(fb.pixel(1, 1), NativeColor::WHITE);
            assert_eq!(fb.pixels().filter(|p| *p != NativeColor::BLACK).count(), 1);
        }

        #[test]
        fn circle_through_primitives_layer() {
            let mut fb = Framebuffer::new();
            Circle::new(Point::new(30, 30), 21)
                .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
                .draw(&mut fb)
                .unwrap();

            // Center painted, far corner untouched
            assert_eq!(fb.pixel(40, 40), NativeColor::RED);
            assert_eq!(fb.pixel(0, 0), NativeColor::BLACK);
        }
    }
}
