//! Software rendering into a pixel buffer.
//!
//! **Sub-modules:**
//!
//! *   [`color`](crate::rendering::color): The [`Color`](color::Color) trait and the native [`Rgba`](color::Rgba) color.
//! *   [`image`](crate::rendering::image): [`Image`](image::Image), the owned 2D pixel buffer.
//! *   [`drawable`](crate::rendering::drawable): The [`Drawable`](drawable::Drawable) pixel source trait and its lazy combinators.
//! *   [`font`](crate::rendering::font): [`TileFont`](font::TileFont) glyph lookup and the built-in 3x5 font.
//! *   [`renderer`](crate::rendering::renderer): The [`Renderer`](renderer::Renderer) and its drawing primitives.
//! *   [`tga`](crate::rendering::tga): Zero-copy TGA assets.
//! *   [`images`](crate::rendering::images): Built-in images such as the mouse cursor.
//!
//! **Key Concepts:**
//!
//! *   **Drawables:** Anything rectangular that yields a color per coordinate. Sprite sheets, glyph
//!     sheets and decoded assets are drawables, and so are views derived from them.
//! *   **Combinators:** [`slice`](drawable::Drawable::slice), [`grid`](drawable::Drawable::grid) and
//!     [`color_map`](drawable::Drawable::color_map) build views without copying pixels.
//!     [`flatten`](drawable::Drawable::flatten) materializes a view into an [`Image`](image::Image).
//! *   **Renderer:** Owns the display buffer. [`pixel`](renderer::Renderer::pixel) is the only
//!     place writes are clipped; every other primitive goes through it.
//!
//! **Rendering Process (Simplified):**
//!
//! 1.  The frame driver hands the game a `&mut Renderer` once per frame.
//! 2.  The game clears the display and draws shapes, text and drawables.
//! 3.  The driver forwards [`Renderer::as_bytes`](renderer::Renderer::as_bytes) to the host for presentation.

pub mod color;
pub mod drawable;
pub mod font;
pub mod image;
pub mod images;
pub mod renderer;
pub mod tga;
