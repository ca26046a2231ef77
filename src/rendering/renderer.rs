//! The software rasterizer.
//!
//! [`Renderer`] owns the display [`Image`] and exposes the primitive drawing operations:
//!
//! *   [`pixel()`](Renderer::pixel): the single point of bounds enforcement. Writes outside the
//!     display are silently discarded. Every other primitive routes each of its writes through it.
//! *   [`clear()`](Renderer::clear), [`rectangle()`](Renderer::rectangle) and
//!     [`circle()`](Renderer::circle): shape primitives.
//! *   [`draw()`](Renderer::draw): blits any [`Drawable`], writing only its fully opaque pixels.
//! *   [`text()`](Renderer::text): lays out a line of text with a [`TileFont`].
//!
//! The coordinate origin is the top-left corner, x grows to the right and y grows downwards.
//! Positions are signed so shapes may hang off any edge of the display.

use crate::rendering::color::{Color, Rgba};
use crate::rendering::drawable::Drawable;
use crate::rendering::font::TileFont;
use crate::rendering::image::Image;

/// Owns the display buffer and rasterizes primitives into it.
///
/// # Example
///
/// ```rust
/// use pixgrid::rendering::color::Rgba;
/// use pixgrid::rendering::renderer::Renderer;
///
/// let mut renderer = Renderer::new(16, 16);
/// renderer.clear(Rgba::DARK_BLUE);
/// renderer.rectangle(2, 2, 4, 4, Rgba::WHITE, true);
/// renderer.circle(10, 10, 3, Rgba::RED, false);
/// renderer.text("HI", 1, 9, Rgba::YELLOW);
///
/// assert_eq!(renderer.display().get(3, 3), Rgba::WHITE);
/// assert_eq!(renderer.as_bytes().len(), 16 * 16 * 4);
/// ```
#[derive(Debug)]
pub struct Renderer {
    display: Image<Rgba>,
}

impl Renderer {
    /// Creates a renderer with a black display of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            display: Image::new(width, height, Rgba::BLACK),
        }
    }

    /// Gets the width of the display in pixels.
    pub fn width(&self) -> usize {
        self.display.width()
    }

    /// Gets the height of the display in pixels.
    pub fn height(&self) -> usize {
        self.display.height()
    }

    /// Reallocates the display at the new size, filled with black.
    ///
    /// Prior contents are not preserved, even when the size does not change.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.display = Image::new(width, height, Rgba::BLACK);
    }

    /// Resizes the display only if the size differs from the current one.
    ///
    /// Returns whether a resize happened.
    pub fn fit(&mut self, width: usize, height: usize) -> bool {
        if (width, height) == (self.width(), self.height()) {
            return false;
        }
        self.resize(width, height);
        true
    }

    /// The display buffer.
    pub fn display(&self) -> &Image<Rgba> {
        &self.display
    }

    /// The display buffer as row-major RGBA bytes, as handed to the host.
    pub fn as_bytes(&self) -> &[u8] {
        self.display.as_bytes()
    }

    /// Sets every pixel of the display to `color`.
    pub fn clear(&mut self, color: impl Color) {
        for y in 0..self.height() as i64 {
            for x in 0..self.width() as i64 {
                self.pixel(x, y, color);
            }
        }
    }

    /// Writes a single pixel, converted to the display's color type.
    ///
    /// Writes outside the display are discarded without error.
    #[inline]
    pub fn pixel(&mut self, x: i64, y: i64, color: impl Color) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if x >= self.width() || y >= self.height() {
            return;
        }
        self.display.set(x, y, Rgba::convert(color));
    }

    /// Draws `drawable` with its top-left corner at `(x, y)`.
    ///
    /// Only fully opaque source pixels are written; anything with partial alpha is skipped.
    pub fn draw<D: Drawable + ?Sized>(&mut self, drawable: &D, x: i64, y: i64) {
        // TODO: blend partially transparent pixels once there is a blend mode to select
        for iy in 0..drawable.height() {
            for ix in 0..drawable.width() {
                let color = drawable.get(ix, iy);
                if color.is_opaque() {
                    self.pixel(offset(x, ix), offset(y, iy), color);
                }
            }
        }
    }

    /// Draws a `w` by `h` rectangle with its top-left corner at `(x, y)`.
    ///
    /// Without `fill` only the border cells are painted. A negative width or height draws nothing.
    pub fn rectangle(&mut self, x: i64, y: i64, w: i64, h: i64, color: impl Color, fill: bool) {
        for iy in 0..h {
            for ix in 0..w {
                let border = ix == 0 || ix == w - 1 || iy == 0 || iy == h - 1;
                if fill || border {
                    self.pixel(x.saturating_add(ix), y.saturating_add(iy), color);
                }
            }
        }
    }

    /// Draws a circle of radius `r` around `(x, y)`.
    ///
    /// A pixel's distance to the center is rounded to the nearest integer. Filled circles paint
    /// every pixel with a distance of at most `r`; outlines paint exactly those at distance `r`,
    /// which may leave small gaps. A negative radius draws nothing.
    pub fn circle(&mut self, x: i64, y: i64, r: i64, color: impl Color, fill: bool) {
        if r < 0 {
            return;
        }
        for iy in y.saturating_sub(r)..=y.saturating_add(r) {
            for ix in x.saturating_sub(r)..=x.saturating_add(r) {
                let (dx, dy) = ((ix - x) as f64, (iy - y) as f64);
                let distance = (dx * dx + dy * dy).sqrt().round() as i64;
                let paint = if fill { distance <= r } else { distance == r };
                if paint {
                    self.pixel(ix, iy, color);
                }
            }
        }
    }

    /// Draws a line of text with the built-in font. See [`Renderer::text_with`].
    pub fn text(&mut self, text: &str, x: i64, y: i64, color: impl Color) {
        self.text_with(text, x, y, color, &TileFont::builtin());
    }

    /// Draws a line of text with `font`, the first glyph's top-left corner at `(x, y)`.
    ///
    /// Glyphs are recolored from white to `color`. The `i`th character starts at
    /// `x + i * font.advance()`. Characters without a glyph draw nothing but still take their
    /// slot. There is no wrapping.
    pub fn text_with<S: Drawable>(
        &mut self,
        text: &str,
        x: i64,
        y: i64,
        color: impl Color,
        font: &TileFont<S>,
    ) {
        let foreground = <S::Color as Color>::convert(Rgba::WHITE);
        let color = <S::Color as Color>::convert(color);
        for (i, c) in text.chars().enumerate() {
            let Some(glyph) = font.glyph(c) else {
                continue;
            };
            let glyph = glyph.replace_color(foreground, color);
            self.draw(&glyph, offset(x, i.saturating_mul(font.advance())), y);
        }
    }
}

/// `origin + delta`, saturating so far off-screen positions stay off-screen.
fn offset(origin: i64, delta: usize) -> i64 {
    origin.saturating_add(i64::try_from(delta).unwrap_or(i64::MAX))
}

impl Drawable for Renderer {
    type Color = Rgba;

    fn width(&self) -> usize {
        self.display.width()
    }

    fn height(&self) -> usize {
        self.display.height()
    }

    fn get(&self, x: usize, y: usize) -> Rgba {
        self.display.get(x, y)
    }
}
