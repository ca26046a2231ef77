//! A tiny software rasterizer for pixel-grid games.
//!
//! The core is [`rendering`]: a [`Drawable`](rendering::drawable::Drawable) pixel source trait
//! with lazy combinators, an owned [`Image`](rendering::image::Image) buffer, tile fonts, and the
//! [`Renderer`] that draws pixels, shapes, sprites and text into its display buffer.
//!
//! Around it sits a small frame driver. A [`Game`] is driven by a [`FrameDriver`], which once per
//! frame fits the display to the [`Host`], samples input, runs fixed-rate updates, lets the game
//! draw, and hands the display bytes to the host. [`host::terminal::TerminalHost`] presents frames
//! in a terminal using half-block characters, inside a [`host::terminal::TerminalSession`].
//!
//! # Example
//! ```rust ,no_run
//! use pixgrid::host::terminal::{FrameBuffered, TerminalHost, TerminalSession};
//! use pixgrid::rendering::color::Rgba;
//! use pixgrid::{FrameDriver, Game, Input, Renderer, UpdateInfo, run};
//!
//! struct Dot {
//!     mouse: (i64, i64),
//! }
//!
//! impl Game for Dot {
//!     fn update(&mut self, input: &Input, _info: UpdateInfo) {
//!         self.mouse = input.mouse;
//!     }
//!
//!     fn frame(&mut self, renderer: &mut Renderer) {
//!         renderer.clear(Rgba::BLACK);
//!         renderer.circle(self.mouse.0, self.mouse.1, 3, Rgba::WHITE, true);
//!     }
//! }
//!
//! let mut host = TerminalHost::new(FrameBuffered::stdout()).unwrap();
//! let mut driver = FrameDriver::new(Dot { mouse: (0, 0) }, 128, 128);
//!
//! let session = TerminalSession::start().unwrap();
//! let result = run(&mut driver, &mut host, Some(60.0));
//! session.end().unwrap();
//! result.unwrap();
//! ```

use std::io;
use std::time::{Duration, Instant};

pub mod host;
pub mod rendering;
pub mod util;

pub use crate::host::Host;
pub use crate::rendering::renderer::Renderer;
use crate::util::fixedupdate::TickAccumulator;

/// Fixed updates per second unless configured otherwise.
pub const DEFAULT_TICK_RATE: f64 = 60.0;

/// Input sampled from the host once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    /// Mouse position in display pixels.
    pub mouse: (i64, i64),
}

/// Information about the current fixed update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateInfo {
    /// The fixed length of a tick in seconds.
    pub dt: f64,
    /// The number of this tick, starting at 0.
    pub tick: u64,
}

/// A game that a [`FrameDriver`] can run on any [`Host`].
pub trait Game {
    /// Called at a fixed rate, possibly several times or not at all between two frames.
    fn update(&mut self, input: &Input, info: UpdateInfo);

    /// Called once per frame to draw. Frames have no timing guarantees.
    fn frame(&mut self, renderer: &mut Renderer);
}

/// Owns a game, its renderer and its input state, and drives them one frame at a time.
pub struct FrameDriver<G> {
    game: G,
    renderer: Renderer,
    input: Input,
    ticks: TickAccumulator,
}

impl<G: Game> FrameDriver<G> {
    /// Creates a driver with an initial display size, updating at [`DEFAULT_TICK_RATE`].
    pub fn new(game: G, width: usize, height: usize) -> Self {
        Self {
            game,
            renderer: Renderer::new(width, height),
            input: Input::default(),
            ticks: TickAccumulator::from_rate(DEFAULT_TICK_RATE),
        }
    }

    /// Sets the number of fixed updates per second.
    pub fn with_tick_rate(mut self, rate: f64) -> Self {
        self.ticks = TickAccumulator::from_rate(rate);
        self
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The input sampled on the last frame.
    pub fn input(&self) -> Input {
        self.input
    }

    /// Number of fixed updates run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.ticks()
    }

    /// Tells the host the initial display size. Call once before the first frame.
    pub fn start(&mut self, host: &mut impl Host) {
        let (width, height) = (self.renderer.width(), self.renderer.height());
        log::info!("starting with a {width}x{height} display");
        host.set_display_size(width, height);
    }

    /// Runs one frame, `dt` seconds after the previous one.
    ///
    /// Fits the display to the host's available size (clearing it if the size changed), samples
    /// the mouse, runs every fixed update that became due, draws the frame and presents it.
    pub fn resume(&mut self, host: &mut impl Host, dt: f64) -> io::Result<()> {
        let (width, height) = host.available_size();
        if self.renderer.fit(width, height) {
            log::debug!("display resized to {width}x{height}");
            host.set_display_size(width, height);
        }

        self.input.mouse = host.mouse_position();

        self.ticks.fuel(dt);
        while self.ticks.next_tick() {
            let info = UpdateInfo {
                dt: self.ticks.tick_dt(),
                tick: self.ticks.ticks() - 1,
            };
            self.game.update(&self.input, info);
        }

        self.game.frame(&mut self.renderer);

        host.present(
            self.renderer.width(),
            self.renderer.height(),
            self.renderer.as_bytes(),
        )
    }
}

/// Runs frames until the host asks to quit.
///
/// With a `target_fps`, sleeps after every frame to reach that rate, shortening each sleep by
/// how much the previous one overslept. A `target_fps` whose frame time is not a valid duration
/// (zero, negative, NaN or vanishingly small) is rejected with [`io::ErrorKind::InvalidInput`]
/// before the first frame.
pub fn run<G: Game, H: Host>(
    driver: &mut FrameDriver<G>,
    host: &mut H,
    target_fps: Option<f64>,
) -> io::Result<()> {
    let frame_time = target_fps.map(frame_duration).transpose()?;
    driver.start(host);

    let mut last_frame = Instant::now();
    let mut last_overhead = Duration::ZERO;
    let mut frames = 0u64;

    loop {
        host.poll_events();
        if host.should_quit() {
            break;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        driver.resume(host, dt)?;
        frames += 1;

        if let Some(frame_time) = frame_time {
            let remaining = frame_time
                .saturating_sub(now.elapsed())
                .saturating_sub(last_overhead);
            let sleep_start = Instant::now();
            std::thread::sleep(remaining);
            last_overhead = sleep_start.elapsed().saturating_sub(remaining);
        }
    }

    log::info!("stopped after {frames} frames and {} ticks", driver.ticks());
    Ok(())
}

/// The time one frame may take at `fps` frames per second.
fn frame_duration(fps: f64) -> io::Result<Duration> {
    Duration::try_from_secs_f64(fps.recip()).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot run at {fps} frames per second: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::color::Rgba;
    use crate::rendering::drawable::Drawable;
    use crate::rendering::image::RgbaBytes;

    #[derive(Default)]
    struct MockHost {
        size: (usize, usize),
        mouse: (i64, i64),
        announced: Vec<(usize, usize)>,
        presented: Vec<(usize, usize, Vec<u8>)>,
    }

    impl Host for MockHost {
        fn available_size(&mut self) -> (usize, usize) {
            self.size
        }

        fn mouse_position(&mut self) -> (i64, i64) {
            self.mouse
        }

        fn set_display_size(&mut self, width: usize, height: usize) {
            self.announced.push((width, height));
        }

        fn present(&mut self, width: usize, height: usize, rgba: &[u8]) -> io::Result<()> {
            self.presented.push((width, height, rgba.to_vec()));
            Ok(())
        }
    }

    /// Marks the mouse position seen by its last update.
    #[derive(Default)]
    struct Marker {
        updates: Vec<UpdateInfo>,
        frames: usize,
        mouse: (i64, i64),
    }

    impl Game for Marker {
        fn update(&mut self, input: &Input, info: UpdateInfo) {
            self.mouse = input.mouse;
            self.updates.push(info);
        }

        fn frame(&mut self, renderer: &mut Renderer) {
            self.frames += 1;
            renderer.clear(Rgba::BLACK);
            renderer.pixel(self.mouse.0, self.mouse.1, Rgba::WHITE);
        }
    }

    #[test]
    fn start_announces_the_initial_size() {
        let mut host = MockHost::default();
        let mut driver = FrameDriver::new(Marker::default(), 128, 96);
        driver.start(&mut host);
        assert_eq!(host.announced, vec![(128, 96)]);
    }

    #[test]
    fn resume_fits_samples_updates_and_presents() {
        let mut host = MockHost {
            size: (4, 3),
            mouse: (2, 1),
            ..MockHost::default()
        };
        let mut driver = FrameDriver::new(Marker::default(), 8, 8).with_tick_rate(10.0);
        driver.resume(&mut host, 0.1).unwrap();

        assert_eq!(host.announced, vec![(4, 3)]);
        assert_eq!(driver.renderer().width(), 4);
        assert_eq!(driver.input().mouse, (2, 1));
        assert_eq!(driver.game().updates.len(), 1);
        assert_eq!(driver.game().frames, 1);

        let (width, height, bytes) = &host.presented[0];
        let frame = RgbaBytes::new(*width, *height, bytes);
        assert_eq!(frame.get(2, 1), Rgba::WHITE);
        assert_eq!(frame.get(0, 0), Rgba::BLACK);
    }

    #[test]
    fn unchanged_size_is_not_reannounced() {
        let mut host = MockHost {
            size: (8, 8),
            ..MockHost::default()
        };
        let mut driver = FrameDriver::new(Marker::default(), 8, 8);
        driver.resume(&mut host, 0.0).unwrap();
        driver.resume(&mut host, 0.0).unwrap();
        assert!(host.announced.is_empty());

        host.size = (6, 2);
        driver.resume(&mut host, 0.0).unwrap();
        assert_eq!(host.announced, vec![(6, 2)]);
        assert_eq!(host.presented[2].2.len(), 6 * 2 * 4);
    }

    #[test]
    fn updates_run_at_the_fixed_rate() {
        let mut host = MockHost {
            size: (2, 2),
            ..MockHost::default()
        };
        let mut driver = FrameDriver::new(Marker::default(), 2, 2).with_tick_rate(4.0);

        // a short frame is drawn without an update
        driver.resume(&mut host, 0.125).unwrap();
        assert!(driver.game().updates.is_empty());
        assert_eq!(driver.game().frames, 1);

        // a long one catches up on every tick it missed
        driver.resume(&mut host, 0.625).unwrap();
        let ticks: Vec<u64> = driver.game().updates.iter().map(|info| info.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2]);
        assert!(driver.game().updates.iter().all(|info| info.dt == 0.25));
        assert_eq!(driver.game().frames, 2);
        assert_eq!(driver.ticks(), 3);
    }

    /// Quits after a fixed number of polls.
    struct Frames(usize);

    impl Host for Frames {
        fn available_size(&mut self) -> (usize, usize) {
            (2, 2)
        }

        fn mouse_position(&mut self) -> (i64, i64) {
            (0, 0)
        }

        fn present(&mut self, _width: usize, _height: usize, _rgba: &[u8]) -> io::Result<()> {
            Ok(())
        }

        fn poll_events(&mut self) {
            self.0 = self.0.saturating_sub(1);
        }

        fn should_quit(&mut self) -> bool {
            self.0 == 0
        }
    }

    #[test]
    fn run_stops_when_the_host_quits() {
        let mut host = Frames(4);
        let mut driver = FrameDriver::new(Marker::default(), 2, 2);
        run(&mut driver, &mut host, None).unwrap();
        assert_eq!(driver.game().frames, 3);
    }

    #[test]
    fn unreachable_frame_rates_are_rejected() {
        for fps in [0.0, -30.0, 1e-30, f64::NAN] {
            let mut host = Frames(2);
            let mut driver = FrameDriver::new(Marker::default(), 2, 2);
            let err = run(&mut driver, &mut host, Some(fps)).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{fps}");
            assert_eq!(driver.game().frames, 0);
        }
    }

    #[test]
    fn mouse_is_sampled_every_frame() {
        let mut host = MockHost {
            size: (5, 5),
            ..MockHost::default()
        };
        let mut driver = FrameDriver::new(Marker::default(), 5, 5).with_tick_rate(1.0);
        host.mouse = (3, 4);
        driver.resume(&mut host, 0.0).unwrap();
        assert_eq!(driver.input().mouse, (3, 4));
        // no tick ran, so the game has not seen it yet
        assert_eq!(driver.game().mouse, (0, 0));
        host.mouse = (1, 1);
        driver.resume(&mut host, 1.0).unwrap();
        assert_eq!(driver.game().mouse, (1, 1));
    }
}
