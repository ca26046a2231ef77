//! Hosts: where frames are presented and input comes from.
//!
//! A [`Host`] is the platform side of a [`FrameDriver`](crate::FrameDriver). It reports how many
//! pixels are available, the mouse position, and takes the finished display buffer once per
//! frame as raw row-major RGBA bytes.
//!
//! *   [`terminal`]: presents frames in a terminal with half-block characters.
//! *   [`recorder`]: wraps another host and records every presented frame.

use std::io;

pub mod recorder;
pub mod terminal;

/// The platform a game is presented on.
pub trait Host {
    /// The size in pixels the display should have.
    fn available_size(&mut self) -> (usize, usize);

    /// The mouse position in display pixels.
    fn mouse_position(&mut self) -> (i64, i64);

    /// Tells the host the display now has this size.
    fn set_display_size(&mut self, _width: usize, _height: usize) {}

    /// Presents a frame of `width * height` pixels, four bytes (R, G, B, A) each, row-major.
    fn present(&mut self, width: usize, height: usize, rgba: &[u8]) -> io::Result<()>;

    /// Processes pending platform events. Called once before every frame.
    fn poll_events(&mut self) {}

    /// Whether the frame loop should stop.
    fn should_quit(&mut self) -> bool {
        false
    }
}
