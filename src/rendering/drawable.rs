//! Read-only pixel sources and lazy combinators over them.
//!
//! A [`Drawable`] is anything rectangular that yields a color for every `(x, y)` inside it: an
//! owned [`Image`], a decoded bitmap, the renderer's display, or a view derived from another
//! drawable. The combinators never copy pixel data. They are O(1) to build and defer all the work
//! to whoever finally reads them, typically [`Renderer::draw`]. This allows slicing one cell out of
//! a sprite sheet and recoloring it without allocating:
//!
//! ```rust
//! use pixgrid::rendering::color::Rgba;
//! use pixgrid::rendering::drawable::Drawable;
//! use pixgrid::rendering::image::Image;
//!
//! let sheet = Image::new(32, 16, Rgba::WHITE).grid(16, 16);
//! let red_tile = sheet.cell(1, 0).replace_color(Rgba::WHITE, Rgba::RED);
//!
//! assert_eq!(red_tile.width(), 16);
//! assert_eq!(red_tile.get(3, 3), Rgba::RED);
//! ```
//!
//! Reads through views are unchecked the same way [`Image`] reads are: a [`Slice`] reaching past
//! the bounds of its inner drawable is a latent out-of-range read, and keeping it in bounds is
//! the caller's responsibility.
//!
//! [`Renderer::draw`]: crate::rendering::renderer::Renderer::draw

use crate::rendering::color::Color;
use crate::rendering::image::Image;

/// A read-only, rectangular, addressable source of pixels.
pub trait Drawable {
    /// The color type this drawable yields.
    type Color: Color;

    /// Width in pixels.
    fn width(&self) -> usize;

    /// Height in pixels.
    fn height(&self) -> usize;

    /// Reads the pixel at `(x, y)`. The caller guarantees `x < width` and `y < height`.
    ///
    /// Reads must be pure: reading the same coordinate twice yields the same color.
    fn get(&self, x: usize, y: usize) -> Self::Color;

    /// A lazy sub-rectangle of this drawable, starting at `(x, y)`.
    fn slice(self, x: usize, y: usize, width: usize, height: usize) -> Slice<Self>
    where
        Self: Sized,
    {
        Slice::new(self, x, y, width, height)
    }

    /// Views this drawable as a grid of equally sized cells.
    ///
    /// # Panics
    ///
    /// Panics if a cell dimension is zero.
    fn grid(self, item_width: usize, item_height: usize) -> Grid<Self>
    where
        Self: Sized,
    {
        Grid::new(self, item_width, item_height)
    }

    /// Lazily applies `map` to every color this drawable yields.
    fn color_map<F>(self, map: F) -> ColorMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Color) -> Self::Color,
    {
        ColorMap::new(self, map)
    }

    /// Lazily replaces every pixel equal to `existing` with `new`.
    ///
    /// Used for recoloring monochrome glyphs and sprites.
    fn replace_color(
        self,
        existing: Self::Color,
        new: Self::Color,
    ) -> ColorMap<Self, impl Fn(Self::Color) -> Self::Color>
    where
        Self: Sized,
    {
        self.color_map(move |color| if color == existing { new } else { color })
    }

    /// Materializes this drawable into an owned image, reading every pixel exactly once.
    ///
    /// Worth it when a deep chain of views would otherwise be re-evaluated many times.
    fn flatten(&self) -> Image<Self::Color> {
        Image::from_fn(self.width(), self.height(), |x, y| self.get(x, y))
    }

    /// Structural equality: same dimensions and every pixel equal after converting `other`'s
    /// colors into this drawable's color type.
    fn same_pixels<D: Drawable + ?Sized>(&self, other: &D) -> bool {
        if self.width() != other.width() || self.height() != other.height() {
            return false;
        }
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.get(x, y) != <Self::Color as Color>::convert(other.get(x, y)) {
                    return false;
                }
            }
        }
        true
    }
}

impl<D: Drawable + ?Sized> Drawable for &D {
    type Color = D::Color;

    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn get(&self, x: usize, y: usize) -> Self::Color {
        (**self).get(x, y)
    }
}

/// A lazy 2D slice of another drawable, for example one sprite out of a sprite sheet.
#[derive(Clone, Copy, Debug)]
pub struct Slice<D> {
    inner: D,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl<D: Drawable> Slice<D> {
    pub fn new(inner: D, x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            inner,
            x,
            y,
            width,
            height,
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The offset of this slice inside its inner drawable.
    pub fn offset(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}

impl<D: Drawable> Drawable for Slice<D> {
    type Color = D::Color;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> Self::Color {
        self.inner.get(x + self.x, y + self.y)
    }
}

/// A lazy grid of equally sized cells over another drawable: a sprite sheet, tile map or tile font.
///
/// The grid is still a plain drawable, reading its inner drawable at raw pixel coordinates.
/// [`Grid::cell`] additionally addresses whole cells.
#[derive(Clone, Copy, Debug)]
pub struct Grid<D> {
    inner: D,
    item_width: usize,
    item_height: usize,
}

impl<D: Drawable> Grid<D> {
    /// # Panics
    ///
    /// Panics if a cell dimension is zero.
    pub fn new(inner: D, item_width: usize, item_height: usize) -> Self {
        assert!(
            item_width > 0 && item_height > 0,
            "grid cells must not be empty, got {item_width}x{item_height}"
        );
        Self {
            inner,
            item_width,
            item_height,
        }
    }

    /// The cell at column `cx`, row `cy`.
    ///
    /// Spans `[cx * item_width, (cx + 1) * item_width) x [cy * item_height, (cy + 1) * item_height)`
    /// of the inner drawable.
    pub fn cell(&self, cx: usize, cy: usize) -> Slice<&D> {
        Slice::new(
            &self.inner,
            cx * self.item_width,
            cy * self.item_height,
            self.item_width,
            self.item_height,
        )
    }

    pub fn item_width(&self) -> usize {
        self.item_width
    }

    pub fn item_height(&self) -> usize {
        self.item_height
    }

    /// Number of whole cells per row.
    pub fn columns(&self) -> usize {
        self.inner.width() / self.item_width
    }

    /// Number of whole cells per column.
    pub fn rows(&self) -> usize {
        self.inner.height() / self.item_height
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Drawable> Drawable for Grid<D> {
    type Color = D::Color;

    fn width(&self) -> usize {
        self.inner.width()
    }

    fn height(&self) -> usize {
        self.inner.height()
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> Self::Color {
        self.inner.get(x, y)
    }
}

/// A lazy per-pixel color transform over another drawable.
#[derive(Clone, Copy)]
pub struct ColorMap<D, F> {
    inner: D,
    map: F,
}

impl<D, F> ColorMap<D, F>
where
    D: Drawable,
    F: Fn(D::Color) -> D::Color,
{
    pub fn new(inner: D, map: F) -> Self {
        Self { inner, map }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D, F> Drawable for ColorMap<D, F>
where
    D: Drawable,
    F: Fn(D::Color) -> D::Color,
{
    type Color = D::Color;

    fn width(&self) -> usize {
        self.inner.width()
    }

    fn height(&self) -> usize {
        self.inner.height()
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> Self::Color {
        (self.map)(self.inner.get(x, y))
    }
}
