//! Zero-copy TGA images.
//!
//! [`TgaImage`] validates the header of an uncompressed Truevision TGA file once and then reads
//! pixels straight out of the borrowed bytes, so an asset embedded with `include_bytes!` can be
//! drawn, sliced or gridded without decoding it into a buffer first.
//!
//! Supported are uncompressed true-color (24 and 32 bits per pixel) and uncompressed grayscale
//! (8 bits per pixel) images without a color map. Both the bottom-left and the top-left origin
//! are honored.

use crate::rendering::color::Rgba;
use crate::rendering::drawable::Drawable;
use std::fmt;
use std::io;

const HEADER_LEN: usize = 18;
const TRUE_COLOR: u8 = 2;
const GRAYSCALE: u8 = 3;
/// Image descriptor bit set when the first stored row is the top one.
const TOP_ORIGIN: u8 = 0x20;

/// Why a byte slice could not be read as a TGA image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TgaError {
    /// Fewer bytes than a TGA header.
    TooShort,
    /// The file uses a color map.
    ColorMapped,
    /// An image type or pixel depth that is not supported.
    Unsupported { image_type: u8, pixel_depth: u8 },
    /// The pixel data ends before the last pixel.
    Truncated { expected: usize, actual: usize },
}

impl fmt::Display for TgaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TgaError::TooShort => write!(f, "TGA data is shorter than its header"),
            TgaError::ColorMapped => write!(f, "color mapped TGA images are not supported"),
            TgaError::Unsupported {
                image_type,
                pixel_depth,
            } => write!(
                f,
                "unsupported TGA image type {image_type} with {pixel_depth} bits per pixel"
            ),
            TgaError::Truncated { expected, actual } => write!(
                f,
                "TGA pixel data is truncated: expected {expected} bytes, got {actual}"
            ),
        }
    }
}

impl std::error::Error for TgaError {}

impl From<TgaError> for io::Error {
    fn from(err: TgaError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// An uncompressed TGA image borrowed from its encoded bytes.
#[derive(Clone, Copy, Debug)]
pub struct TgaImage<'a> {
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
    top_origin: bool,
    pixels: &'a [u8],
}

impl<'a> TgaImage<'a> {
    /// Validates the header and pixel data length of `bytes`.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, TgaError> {
        if bytes.len() < HEADER_LEN {
            return Err(TgaError::TooShort);
        }
        let id_len = bytes[0] as usize;
        let color_map_type = bytes[1];
        let image_type = bytes[2];
        let width = u16::from_le_bytes([bytes[12], bytes[13]]) as usize;
        let height = u16::from_le_bytes([bytes[14], bytes[15]]) as usize;
        let pixel_depth = bytes[16];
        let descriptor = bytes[17];

        if color_map_type != 0 {
            return Err(TgaError::ColorMapped);
        }
        let bytes_per_pixel = match (image_type, pixel_depth) {
            (TRUE_COLOR, 24) => 3,
            (TRUE_COLOR, 32) => 4,
            (GRAYSCALE, 8) => 1,
            _ => {
                return Err(TgaError::Unsupported {
                    image_type,
                    pixel_depth,
                });
            }
        };

        let start = HEADER_LEN + id_len;
        let expected = width * height * bytes_per_pixel;
        let actual = bytes.len().saturating_sub(start);
        if actual < expected {
            return Err(TgaError::Truncated { expected, actual });
        }

        Ok(Self {
            width,
            height,
            bytes_per_pixel,
            top_origin: descriptor & TOP_ORIGIN != 0,
            pixels: &bytes[start..start + expected],
        })
    }
}

impl Drawable for TgaImage<'_> {
    type Color = Rgba;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get(&self, x: usize, y: usize) -> Rgba {
        let row = if self.top_origin {
            y
        } else {
            self.height - 1 - y
        };
        let idx = (row * self.width + x) * self.bytes_per_pixel;
        let px = &self.pixels[idx..idx + self.bytes_per_pixel];
        // stored as BGR(A)
        match *px {
            [v] => Rgba::rgb(v, v, v),
            [b, g, r] => Rgba::rgb(r, g, b),
            [b, g, r, a] => Rgba::new(r, g, b, a),
            _ => unreachable!("pixel depth is validated on parse"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(image_type: u8, width: u16, height: u16, depth: u8, descriptor: u8) -> Vec<u8> {
        let mut bytes = vec![0; HEADER_LEN];
        bytes[2] = image_type;
        bytes[12..14].copy_from_slice(&width.to_le_bytes());
        bytes[14..16].copy_from_slice(&height.to_le_bytes());
        bytes[16] = depth;
        bytes[17] = descriptor;
        bytes
    }

    #[test]
    fn bottom_left_true_color() {
        let mut bytes = header(TRUE_COLOR, 2, 2, 24, 0);
        // bottom row first, BGR
        bytes.extend_from_slice(&[0, 0, 255, 0, 255, 0]);
        bytes.extend_from_slice(&[255, 0, 0, 255, 255, 255]);
        let tga = TgaImage::parse(&bytes).unwrap();
        assert_eq!((tga.width(), tga.height()), (2, 2));
        assert_eq!(tga.get(0, 0), Rgba::BLUE);
        assert_eq!(tga.get(1, 0), Rgba::WHITE);
        assert_eq!(tga.get(0, 1), Rgba::RED);
        assert_eq!(tga.get(1, 1), Rgba::GREEN);
    }

    #[test]
    fn top_left_with_alpha_and_image_id() {
        let mut bytes = header(TRUE_COLOR, 2, 1, 32, TOP_ORIGIN | 8);
        bytes[0] = 3;
        bytes.extend_from_slice(b"id!");
        bytes.extend_from_slice(&[1, 2, 3, 0, 4, 5, 6, 255]);
        let tga = TgaImage::parse(&bytes).unwrap();
        assert_eq!(tga.get(0, 0), Rgba::new(3, 2, 1, 0));
        assert_eq!(tga.get(1, 0), Rgba::new(6, 5, 4, 255));
    }

    #[test]
    fn grayscale_is_opaque() {
        let mut bytes = header(GRAYSCALE, 1, 1, 8, TOP_ORIGIN);
        bytes.push(77);
        let tga = TgaImage::parse(&bytes).unwrap();
        assert_eq!(tga.get(0, 0), Rgba::rgb(77, 77, 77));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(TgaImage::parse(&[0; 4]).unwrap_err(), TgaError::TooShort);

        let mut mapped = header(1, 1, 1, 8, 0);
        mapped[1] = 1;
        assert_eq!(TgaImage::parse(&mapped).unwrap_err(), TgaError::ColorMapped);

        let rle = header(10, 1, 1, 32, 0);
        assert_eq!(
            TgaImage::parse(&rle).unwrap_err(),
            TgaError::Unsupported {
                image_type: 10,
                pixel_depth: 32
            }
        );

        let mut short = header(TRUE_COLOR, 2, 2, 32, 0);
        short.extend_from_slice(&[0; 15]);
        assert_eq!(
            TgaImage::parse(&short).unwrap_err(),
            TgaError::Truncated {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn errors_convert_to_io() {
        let err: io::Error = TgaError::TooShort.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn slices_of_a_sheet() {
        let mut bytes = header(GRAYSCALE, 4, 2, 8, TOP_ORIGIN);
        bytes.extend_from_slice(&[0, 1, 2, 3, 4, 5, 6, 7]);
        let sheet = TgaImage::parse(&bytes).unwrap().grid(2, 2);
        let cell = sheet.cell(1, 0);
        assert_eq!(cell.get(0, 0), Rgba::rgb(2, 2, 2));
        assert_eq!(cell.get(1, 1), Rgba::rgb(7, 7, 7));
    }
}
