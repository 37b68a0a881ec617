//! Host-side frame clock.
//!
//! [`Session::tick`](crate::Session::tick) takes the elapsed time as an
//! argument; hosts use a [`FrameClock`] to produce it. The clock measures wall
//! time between display refreshes, or hands out a fixed step for headless and
//! deterministic runs. A paused clock hands out zero, so the session holds
//! still while the host keeps redrawing.
//!
//! # Example
//!
//! ```ignore
//! use slitwave::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // Once per display refresh:
//! let delta = clock.update();
//! if !clock.is_paused() {
//!     session.tick(&config, delta);
//! }
//! ```

use std::time::{Duration, Instant};

/// Frame rate is averaged over windows of this length.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Wall-clock timing for the frame loop.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    /// Unpaused frames handed out since the last reset.
    frames: u64,
    fps: f64,
    /// Start of the current fps window and the frame count when it opened.
    window_start: Instant,
    window_frames: u64,
    paused: bool,
    /// Replaces the measured wall time when set.
    fixed_delta: Option<f64>,
}

impl FrameClock {
    /// A wall-time clock starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            frames: 0,
            fps: 0.0,
            window_start: now,
            window_frames: 0,
            paused: false,
            fixed_delta: None,
        }
    }

    /// A clock that always advances by `delta` seconds per frame.
    pub fn fixed(delta: f64) -> Self {
        Self { fixed_delta: Some(delta), ..Self::new() }
    }

    /// Step to the next frame and return its delta in seconds.
    ///
    /// While paused this returns 0 and the frame count holds.
    pub fn update(&mut self) -> f64 {
        let now = Instant::now();
        let measured = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        if self.paused {
            return 0.0;
        }
        self.frames += 1;

        let window = now.duration_since(self.window_start);
        if window >= FPS_WINDOW {
            self.fps = (self.frames - self.window_frames) as f64 / window.as_secs_f64();
            self.window_frames = self.frames;
            self.window_start = now;
        }

        self.fixed_delta.unwrap_or(measured)
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Flip between paused and running. Returns the new paused state.
    ///
    /// Resuming restarts the wall-time measurement so the first frame back
    /// does not carry the whole pause as its delta.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if !self.paused {
            self.last_frame = Instant::now();
        }
        self.paused
    }

    /// Zero the frame count and fps and resume. A fixed delta is kept.
    pub fn reset(&mut self) {
        *self = Self { fixed_delta: self.fixed_delta, ..Self::new() };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
