//! Small built-in images.

use crate::rendering::color::Rgba;
use crate::rendering::image::Image;

const O: Rgba = Rgba::CLEAR;
const B: Rgba = Rgba::BLACK;
const W: Rgba = Rgba::WHITE;

/// A 6x7 arrow cursor, its tip at `(1, 1)`.
pub fn cursor() -> Image<Rgba> {
    Image::from([
        [O, B, O, O, O, O],
        [B, W, B, O, O, O],
        [B, W, W, B, O, O],
        [B, W, W, W, B, O],
        [B, W, W, W, W, B],
        [B, W, W, B, B, O],
        [O, B, B, W, B, O],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_shape() {
        let cursor = cursor();
        assert_eq!((cursor.width(), cursor.height()), (6, 7));
        assert_eq!(cursor.get(1, 1), W);
        assert_eq!(cursor.get(0, 0), O);
        assert_eq!(cursor.get(5, 4), B);
    }
}
