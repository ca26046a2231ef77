//! Fixed-rate updates.
//!
//! Frames arrive whenever the host asks for one, so their spacing is not reliable. A
//! [`TickAccumulator`] turns those irregular frame times into a whole number of fixed-length
//! ticks, which is what [`FrameDriver`] uses to call [`Game::update`] at a steady rate.
//!
//! [`FrameDriver`]: crate::FrameDriver
//! [`Game::update`]: crate::Game::update

/// Accumulates elapsed time and hands it out again in ticks of a fixed length.
///
/// # Example
/// ```
/// use pixgrid::util::fixedupdate::TickAccumulator;
///
/// let mut ticks = TickAccumulator::from_rate(4.0);
/// ticks.fuel(1.0); // seconds since the last frame
/// let mut updates = 0;
/// while ticks.next_tick() {
///     updates += 1;
/// }
/// assert_eq!(updates, 4);
/// ```
#[derive(Clone, Debug)]
pub struct TickAccumulator {
    accumulated: f64,
    tick_dt: f64,
    ticks: u64,
}

impl TickAccumulator {
    /// Creates an accumulator with ticks lasting `tick_dt` seconds.
    ///
    /// # Panics
    ///
    /// Panics unless `tick_dt` is positive and finite.
    pub fn new(tick_dt: f64) -> Self {
        assert!(
            tick_dt.is_finite() && tick_dt > 0.0,
            "ticks must have a positive, finite length, got {tick_dt}"
        );
        Self {
            accumulated: 0.0,
            tick_dt,
            ticks: 0,
        }
    }

    /// Creates an accumulator producing `rate` ticks per second.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is zero, negative or so large that a tick has no length.
    pub fn from_rate(rate: f64) -> Self {
        Self::new(1.0 / rate)
    }

    /// Length of one tick in seconds.
    pub fn tick_dt(&self) -> f64 {
        self.tick_dt
    }

    /// Number of ticks handed out so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Adds elapsed time.
    pub fn fuel(&mut self, dt: f64) {
        self.accumulated += dt;
    }

    /// Whole ticks currently available.
    pub fn available_ticks(&self) -> u64 {
        (self.accumulated / self.tick_dt).floor() as u64
    }

    /// Takes one tick if enough time has accumulated.
    pub fn next_tick(&mut self) -> bool {
        if self.accumulated < self.tick_dt {
            return false;
        }
        self.accumulated -= self.tick_dt;
        self.ticks += 1;
        true
    }
}
