//! Color representations for the software rasterizer.
//!
//! Every pixel source speaks some [`Color`] type. [`Rgba`] is the native type of the display
//! buffer and the common currency between color types: each concrete type says how to ingest
//! and emit RGBA, and [`Color::convert`] goes between any two of them through it.
//!
//! Conversions are one-directional and may be lossy. Converting an [`Rgba`] with partial
//! alpha to [`Rgb`] drops the alpha channel, for example.

use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;

/// A color type that pixel sources can yield.
pub trait Color: Copy + PartialEq + Debug {
    /// Ingests the channels of an RGBA color.
    fn from_rgba(rgba: Rgba) -> Self;

    /// Emits this color as RGBA.
    fn to_rgba(self) -> Rgba;

    /// Converts any other color type into this one.
    ///
    /// ```rust
    /// use pixgrid::rendering::color::{Color, Rgb, Rgba};
    ///
    /// let rgb = Rgb::convert(Rgba::new(10, 20, 30, 40));
    /// assert_eq!(rgb, Rgb::new(10, 20, 30));
    /// assert_eq!(Rgba::convert(rgb), Rgba::rgb(10, 20, 30));
    /// ```
    fn convert<C: Color>(other: C) -> Self {
        Self::from_rgba(other.to_rgba())
    }

    /// Returns whether this color is fully opaque.
    fn is_opaque(self) -> bool {
        self.to_rgba().a == u8::MAX
    }
}

/// A four channel, 8 bit per channel color. The native color of the display buffer.
///
/// The layout is exactly four bytes in `r, g, b, a` order, which is also the byte layout handed
/// to the host for presentation.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    /// Fully transparent. Never written by an opaque-only blit.
    pub const CLEAR: Rgba = Rgba::new(0, 0, 0, 0);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(0, 255, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);
    pub const YELLOW: Rgba = Rgba::rgb(255, 255, 0);
    pub const GRAY: Rgba = Rgba::rgb(128, 128, 128);
    pub const DARK_GRAY: Rgba = Rgba::rgb(64, 64, 64);
    pub const DARK_BLUE: Rgba = Rgba::rgb(29, 43, 83);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, u8::MAX)
    }
}

impl Color for Rgba {
    fn from_rgba(rgba: Rgba) -> Self {
        rgba
    }

    fn to_rgba(self) -> Rgba {
        self
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(color: Rgba) -> Self {
        [color.r, color.g, color.b, color.a]
    }
}

/// An opaque three channel color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Color for Rgb {
    /// Drops the alpha channel.
    fn from_rgba(rgba: Rgba) -> Self {
        Self::new(rgba.r, rgba.g, rgba.b)
    }

    fn to_rgba(self) -> Rgba {
        Rgba::rgb(self.r, self.g, self.b)
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(color: Rgb) -> Self {
        crossterm::style::Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_channel_wise() {
        assert_eq!(Rgba::new(1, 2, 3, 4), Rgba::new(1, 2, 3, 4));
        assert_ne!(Rgba::new(1, 2, 3, 4), Rgba::new(1, 2, 3, 5));
        assert_ne!(Rgba::BLACK, Rgba::CLEAR);
    }

    #[test]
    fn rgb_conversion_is_lossy_for_alpha() {
        let translucent = Rgba::new(200, 100, 50, 128);
        let rgb = Rgb::convert(translucent);
        assert_eq!(rgb, Rgb::new(200, 100, 50));
        let back = Rgba::convert(rgb);
        assert_eq!(back, Rgba::rgb(200, 100, 50));
        assert_ne!(back, translucent);
        assert!(back.is_opaque());
        assert!(!translucent.is_opaque());
    }

    #[test]
    fn byte_array_layout() {
        let color = Rgba::from([1, 2, 3, 4]);
        assert_eq!(color, Rgba::new(1, 2, 3, 4));
        assert_eq!(<[u8; 4]>::from(color), [1, 2, 3, 4]);
        assert_eq!(bytemuck::bytes_of(&color), &[1, 2, 3, 4]);
    }
}
