//! # slitwave - Double-Slit Experiment Engine
//!
//! A particle-by-particle simulation of the double-slit experiment. Particles
//! leave an emitter, pass (or are absorbed at) a barrier with two slits, get
//! nudged toward interference maxima, and land on a screen where their hits
//! build up an intensity histogram.
//!
//! The engine is host-agnostic: a host owns the [`Config`], calls
//! [`Session::tick`] once per frame and draws from [`Session::snapshot`],
//! either on its own or with the bundled software [`Renderer`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use slitwave::prelude::*;
//!
//! let config = Config::default();
//! let mut session = Session::seeded(&config, 42);
//! let mut clock = FrameClock::fixed(1.0 / 60.0);
//!
//! for _ in 0..3600 {
//!     session.tick(&config, clock.update());
//! }
//!
//! let mut frame = FrameBuffer::new(config.viewport.width, config.viewport.height);
//! Renderer::new().draw(&session.snapshot(), &config, &mut frame);
//! frame.save_png("pattern.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Config
//!
//! All tunables live in [`Config`]: emission rate, slit width and spacing,
//! which slits are open, particle type, detection mode, path drawing and the
//! viewport size. Configs serialize to JSON and are re-read every tick, so a
//! host can change them freely between frames. The session reacts to changes:
//!
//! | Change | Effect |
//! |--------|--------|
//! | Particle type | Full reset |
//! | Slits, in accumulation mode | Detections and histogram cleared |
//! | Switch to particle mode | Detections become fully opaque again |
//! | Viewport height | Histogram counts redistributed |
//!
//! ### Detection modes
//!
//! - [`DetectionMode::Particle`]: hits fade out over about 100 ticks
//! - [`DetectionMode::Wave`]: particles are hidden past the barrier and the
//!   wavefronts are drawn instead
//! - [`DetectionMode::Accumulation`]: hits persist and build the pattern
//!
//! ### Wave math
//!
//! [`wave`] holds the pure functions: path lengths and phases, complex
//! amplitudes from point sources, and the Fraunhofer single- and double-slit
//! intensity curves used for the analytic overlay.

pub mod analysis;
pub mod config;
pub mod detection;
pub mod error;
pub mod lifecycle;
pub mod particle;
pub mod render;
pub mod session;
pub mod time;
pub mod wave;

pub use config::{Config, DetectionMode, Geometry, ParticleType, Slit, Viewport};
pub use detection::{Detection, Detections};
pub use error::{ConfigError, ExportError};
pub use glam::{DVec2, Vec3};
pub use lifecycle::{Lifecycle, Outcome};
pub use particle::Particle;
pub use render::{FrameBuffer, Renderer, Rgba8};
pub use session::{Session, Snapshot, TickReport};
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use slitwave::prelude::*;
/// ```
pub mod prelude {
    pub use crate::analysis::{contrast, correlation, normalized};
    pub use crate::config::{Config, DetectionMode, ParticleType, Viewport};
    pub use crate::render::{FrameBuffer, Renderer};
    pub use crate::session::{Session, Snapshot, TickReport};
    pub use crate::time::FrameClock;
    pub use crate::wave::theoretical_profile;
    pub use crate::{DVec2, Vec3};
}
