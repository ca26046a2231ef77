//! Recording presented frames.
//!
//! [`RecordingHost`] wraps any other [`Host`] and keeps a copy of every frame it presents,
//! stamped with its offset from the start of the recording. Recordings are stored with `bincode`
//! and can be turned back into images with [`RecordedFrame::to_image`].

use crate::host::Host;
use crate::rendering::color::Rgba;
use crate::rendering::drawable::Drawable;
use crate::rendering::image::{Image, RgbaBytes};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RecordedFrame {
    pub width: usize,
    pub height: usize,
    /// Row-major RGBA bytes, as presented.
    pub rgba: Vec<u8>,
    /// The offset in ns from the start of the recording
    pub ns_offset: u128,
}

impl RecordedFrame {
    /// Decodes the frame into an image.
    pub fn to_image(&self) -> Image<Rgba> {
        RgbaBytes::new(self.width, self.height, &self.rgba).flatten()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Recording {
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    pub fn read_from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        bincode::deserialize_from(BufReader::new(file)).map_err(invalid_data)
    }

    /// Writes the recording to `path`, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, self).map_err(invalid_data)?;
        writer.flush()?;
        log::info!("saved {} frames to {}", self.frames.len(), path.display());
        Ok(())
    }

    /// The offset of the last frame, in ns.
    pub fn duration_ns(&self) -> u128 {
        self.frames.last().map_or(0, |frame| frame.ns_offset)
    }
}

fn invalid_data(err: bincode::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

/// A [`Host`] adapter that records every presented frame before passing it on.
pub struct RecordingHost<H> {
    inner: H,
    recording: Recording,
    start: Instant,
}

impl<H: Host> RecordingHost<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            recording: Recording::default(),
            start: Instant::now(),
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn into_parts(self) -> (H, Recording) {
        (self.inner, self.recording)
    }
}

impl<H: Host> Host for RecordingHost<H> {
    fn available_size(&mut self) -> (usize, usize) {
        self.inner.available_size()
    }

    fn mouse_position(&mut self) -> (i64, i64) {
        self.inner.mouse_position()
    }

    fn set_display_size(&mut self, width: usize, height: usize) {
        self.inner.set_display_size(width, height);
    }

    fn present(&mut self, width: usize, height: usize, rgba: &[u8]) -> io::Result<()> {
        self.recording.frames.push(RecordedFrame {
            width,
            height,
            rgba: rgba.to_vec(),
            ns_offset: self.start.elapsed().as_nanos(),
        });
        self.inner.present(width, height, rgba)
    }

    fn poll_events(&mut self) {
        self.inner.poll_events();
    }

    fn should_quit(&mut self) -> bool {
        self.inner.should_quit()
    }
}
