//! Owned pixel buffers.
//!
//! [`Image`] is the only owning, mutable pixel storage of the rasterizer. It is a flat,
//! row-major vector of colors with a fixed width and height.
//!
//! Indexing is *unchecked* with respect to the two dimensional bounds: `x` must be below
//! `width` and `y` below `height`. Passing an `x` past the row end silently reads or writes the
//! next row, and only a linear index past the end of the buffer panics. Bounds are enforced once,
//! by [`Renderer::pixel`], so that per-pixel hot paths do not pay for them repeatedly.
//!
//! [`RgbaBytes`] is a read-only view over a borrowed RGBA byte frame, the format the display
//! buffer is handed to the host in.
//!
//! [`Renderer::pixel`]: crate::rendering::renderer::Renderer::pixel

use crate::rendering::color::{Color, Rgba};
use crate::rendering::drawable::Drawable;
use std::ops::{Index, IndexMut};

/// A 2D buffer of colors.
///
/// # Example
///
/// ```rust
/// use pixgrid::rendering::color::Rgba;
/// use pixgrid::rendering::image::Image;
///
/// let mut image = Image::new(4, 3, Rgba::BLACK);
/// image[(2, 1)] = Rgba::WHITE;
///
/// assert_eq!(image.get(2, 1), Rgba::WHITE);
/// assert_eq!(image.get(0, 0), Rgba::BLACK);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Image<C: Color = Rgba> {
    width: usize,
    height: usize,
    pixels: Vec<C>,
}

impl<C: Color> Image<C> {
    /// Creates a new image with every pixel set to `fill`.
    ///
    /// Zero sized images are allowed.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows.
    pub fn new(width: usize, height: usize, fill: C) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; Self::area(width, height)],
        }
    }

    /// Creates a new image by evaluating `f` once for every coordinate, in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> C) -> Self {
        let mut pixels = Vec::with_capacity(Self::area(width, height));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Creates an image from rows of colors. The first row is `y = 0`.
    ///
    /// ```rust
    /// use pixgrid::rendering::color::Rgba;
    /// use pixgrid::rendering::image::Image;
    ///
    /// let image = Image::from_rows(vec![
    ///     vec![Rgba::BLACK, Rgba::WHITE],
    ///     vec![Rgba::WHITE, Rgba::BLACK],
    ///     vec![Rgba::CLEAR, Rgba::CLEAR],
    /// ]);
    /// assert_eq!((image.width(), image.height()), (2, 3));
    /// assert_eq!(image.get(1, 0), Rgba::WHITE);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the rows are not all of the same length.
    pub fn from_rows<R: AsRef<[C]>>(rows: impl IntoIterator<Item = R>) -> Self {
        let mut width = None;
        let mut height = 0;
        let mut pixels = Vec::new();
        for row in rows {
            let row = row.as_ref();
            match width {
                None => width = Some(row.len()),
                Some(width) => assert_eq!(
                    width,
                    row.len(),
                    "row {height} has length {} but the first row has length {width}",
                    row.len()
                ),
            }
            pixels.extend_from_slice(row);
            height += 1;
        }
        let width = width.unwrap_or(0);
        // empty rows carry no pixels
        let height = if width == 0 { 0 } else { height };
        Self {
            width,
            height,
            pixels,
        }
    }

    fn area(width: usize, height: usize) -> usize {
        match width.checked_mul(height) {
            Some(area) => area,
            None => panic!("image of {width}x{height} pixels is not addressable"),
        }
    }

    #[inline]
    fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Gets the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Gets the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads the color at `(x, y)`. The caller guarantees `x < width` and `y < height`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> C {
        self.pixels[self.index_of(x, y)]
    }

    /// Writes the color at `(x, y)`. The caller guarantees `x < width` and `y < height`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: C) {
        let idx = self.index_of(x, y);
        self.pixels[idx] = color;
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: C) {
        for pixel in self.pixels.iter_mut() {
            *pixel = color;
        }
    }

    /// The pixels in row-major order.
    pub fn pixels(&self) -> &[C] {
        &self.pixels
    }
}

impl Image<Rgba> {
    /// The pixels as raw row-major RGBA bytes, four per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Compile-time sized literals always have rows of equal length.
///
/// ```rust
/// use pixgrid::rendering::color::Rgba;
/// use pixgrid::rendering::image::Image;
///
/// const X: Rgba = Rgba::WHITE;
/// const O: Rgba = Rgba::CLEAR;
/// let dot = Image::from([
///     [O, X, O],
///     [X, X, X],
///     [O, X, O],
/// ]);
/// assert_eq!(dot.get(1, 1), X);
/// ```
impl<C: Color, const W: usize, const H: usize> From<[[C; W]; H]> for Image<C> {
    fn from(rows: [[C; W]; H]) -> Self {
        Self::from_rows(rows)
    }
}

impl<C: Color> Index<(usize, usize)> for Image<C> {
    type Output = C;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[self.index_of(x, y)]
    }
}

impl<C: Color> IndexMut<(usize, usize)> for Image<C> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        let idx = self.index_of(x, y);
        &mut self.pixels[idx]
    }
}

impl<C: Color> Drawable for Image<C> {
    type Color = C;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get(&self, x: usize, y: usize) -> C {
        Image::get(self, x, y)
    }
}

/// A borrowed frame of raw row-major RGBA bytes, readable as a [`Drawable`].
#[derive(Clone, Copy, Debug)]
pub struct RgbaBytes<'a> {
    width: usize,
    height: usize,
    bytes: &'a [u8],
}

impl<'a> RgbaBytes<'a> {
    /// # Panics
    ///
    /// Panics if `bytes` does not hold exactly `width * height` pixels.
    pub fn new(width: usize, height: usize, bytes: &'a [u8]) -> Self {
        assert_eq!(
            bytes.len(),
            width * height * 4,
            "a {width}x{height} RGBA frame needs {} bytes",
            width * height * 4
        );
        Self {
            width,
            height,
            bytes,
        }
    }
}

impl Drawable for RgbaBytes<'_> {
    type Color = Rgba;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get(&self, x: usize, y: usize) -> Rgba {
        let idx = (y * self.width + x) * 4;
        Rgba::new(
            self.bytes[idx],
            self.bytes[idx + 1],
            self.bytes[idx + 2],
            self.bytes[idx + 3],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_every_cell() {
        for (w, h) in [(0, 0), (0, 5), (1, 1), (7, 3), (16, 16)] {
            let image = Image::new(w, h, Rgba::YELLOW);
            assert_eq!(image.pixels().len(), w * h);
            assert!(image.pixels().iter().all(|&c| c == Rgba::YELLOW));
        }
    }

    #[test]
    fn set_only_touches_one_cell() {
        let mut image = Image::new(3, 3, Rgba::BLACK);
        image.set(1, 2, Rgba::RED);
        for y in 0..3 {
            for x in 0..3 {
                let expected = if (x, y) == (1, 2) { Rgba::RED } else { Rgba::BLACK };
                assert_eq!(image.get(x, y), expected);
            }
        }
    }

    #[test]
    fn rows_are_row_major() {
        let image = Image::from([[1u8, 2, 3], [4, 5, 6]].map(|row| row.map(|v| Rgba::rgb(v, 0, 0))));
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.get(0, 1), Rgba::rgb(4, 0, 0));
        assert_eq!(image.get(2, 0), Rgba::rgb(3, 0, 0));
    }

    #[test]
    #[should_panic(expected = "row 1 has length 1")]
    fn unequal_rows_panic() {
        Image::from_rows(vec![vec![Rgba::BLACK, Rgba::BLACK], vec![Rgba::BLACK]]);
    }

    #[test]
    fn empty_rows_are_an_empty_image() {
        let image = Image::<Rgba>::from_rows(Vec::<Vec<Rgba>>::new());
        assert_eq!((image.width(), image.height()), (0, 0));
        let image = Image::<Rgba>::from_rows(vec![Vec::new(), Vec::new()]);
        assert_eq!((image.width(), image.height()), (0, 0));
    }

    #[test]
    fn bytes_are_rgba_row_major() {
        let mut image = Image::new(2, 1, Rgba::CLEAR);
        image.set(1, 0, Rgba::new(1, 2, 3, 4));
        assert_eq!(image.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);

        let view = RgbaBytes::new(2, 1, image.as_bytes());
        assert!(view.same_pixels(&image));
    }

    #[test]
    #[should_panic]
    fn byte_view_checks_length() {
        RgbaBytes::new(2, 2, &[0; 12]);
    }
}
