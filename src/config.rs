//! Per-tick configuration snapshot.
//!
//! The host (viewer, runner, tests) owns a [`Config`] and hands an immutable
//! reference to [`Session::tick`](crate::Session::tick) every frame. Nothing in
//! the engine reads configuration from anywhere else.
//!
//! Configs serialize to JSON so scenes can be saved and replayed:
//!
//! ```ignore
//! let config = Config::load("scenes/narrow_slits.json")?;
//! let mut session = Session::seeded(&config, 7);
//! session.tick(&config, 1.0 / 60.0);
//! ```

use crate::error::ConfigError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// X position of the emitter.
pub const EMITTER_X: f64 = 70.0;
/// X position of the barrier holding the slits.
pub const BARRIER_X: f64 = 150.0;
/// Smallest x the detection screen may sit at.
pub const SCREEN_MIN_X: f64 = 250.0;
/// Horizontal speed of freshly emitted particles, in pixels per tick.
pub const PARTICLE_SPEED: f64 = 2.5;
/// Base wavelength used by all interference math, in pixels.
pub const WAVELENGTH: f64 = 20.0;

/// What kind of particle the emitter fires.
///
/// Only affects size and color; the physics is identical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleType {
    #[default]
    Photon,
    Electron,
}

impl ParticleType {
    /// Render radius in pixels.
    pub fn size(self) -> f64 {
        match self {
            ParticleType::Photon => 2.0,
            ParticleType::Electron => 3.0,
        }
    }

    /// Particle color (RGB, 0.0-1.0).
    ///
    /// Photons are deep sky blue (`#00BFFF`), electrons green (`#4CAF50`).
    pub fn color(self) -> Vec3 {
        match self {
            ParticleType::Photon => Vec3::new(0.0, 191.0 / 255.0, 1.0),
            ParticleType::Electron => Vec3::new(76.0 / 255.0, 175.0 / 255.0, 80.0 / 255.0),
        }
    }

    /// Cycle to the other particle type.
    pub fn next(self) -> Self {
        match self {
            ParticleType::Photon => ParticleType::Electron,
            ParticleType::Electron => ParticleType::Photon,
        }
    }
}

/// How detections behave and how the scene is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Detections fade out shortly after landing.
    Particle,
    /// Particles are hidden past the barrier and the wave field is drawn.
    Wave,
    /// Detections stay on screen; slit changes clear the screen.
    #[default]
    Accumulation,
}

impl DetectionMode {
    /// Cycle particle → wave → accumulation → particle.
    pub fn next(self) -> Self {
        match self {
            DetectionMode::Particle => DetectionMode::Wave,
            DetectionMode::Wave => DetectionMode::Accumulation,
            DetectionMode::Accumulation => DetectionMode::Particle,
        }
    }
}

/// Canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800, height: 400 }
    }
}

/// Complete configuration snapshot for one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Emission probability per tick, as a percentage (0-100).
    pub emission_rate: f64,
    /// Slit opening height in pixels (applies to both slits).
    pub slit_width: f64,
    /// Center-to-center slit distance in pixels.
    pub slit_distance: f64,
    pub top_slit_open: bool,
    pub bottom_slit_open: bool,
    pub particle_type: ParticleType,
    pub detection_mode: DetectionMode,
    /// Record particle trails for rendering.
    pub show_paths: bool,
    pub viewport: Viewport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            emission_rate: 30.0,
            slit_width: 10.0,
            slit_distance: 4.0,
            top_slit_open: true,
            bottom_slit_open: true,
            particle_type: ParticleType::Photon,
            detection_mode: DetectionMode::Accumulation,
            show_paths: false,
            viewport: Viewport::default(),
        }
    }
}

impl Config {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields fall back to [`Config::default`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Clamp every numeric field into the range the engine expects.
    ///
    /// Non-finite values are replaced by the defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Config::default();
        self.emission_rate = finite_or(self.emission_rate, defaults.emission_rate).clamp(0.0, 100.0);
        self.slit_width = finite_or(self.slit_width, defaults.slit_width).max(0.0);
        self.slit_distance = finite_or(self.slit_distance, defaults.slit_distance).max(0.0);
        self.viewport.width = self.viewport.width.max(SCREEN_MIN_X as u32);
        self.viewport.height = self.viewport.height.max(1);
        self
    }

    /// Whether any slit-related setting differs from `other`.
    pub fn slits_differ(&self, other: &Config) -> bool {
        self.slit_width != other.slit_width
            || self.slit_distance != other.slit_distance
            || self.top_slit_open != other.top_slit_open
            || self.bottom_slit_open != other.bottom_slit_open
    }

    /// Number of open slits (0, 1 or 2).
    pub fn open_slits(&self) -> usize {
        self.top_slit_open as usize + self.bottom_slit_open as usize
    }

    /// Derived positions for this snapshot.
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// A gap in the barrier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slit {
    pub center_y: f64,
    pub width: f64,
    pub open: bool,
}

impl Slit {
    /// Whether a particle at height `y` passes through this slit.
    ///
    /// The window is inclusive at `±width / 2`. A zero-width slit only
    /// admits its exact center.
    #[inline]
    pub fn admits(&self, y: f64) -> bool {
        self.open && (y - self.center_y).abs() <= self.width / 2.0
    }
}

/// Scene positions derived from a [`Config`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub emitter_x: f64,
    pub barrier_x: f64,
    /// The detection screen sits at the right edge of the viewport.
    pub screen_x: f64,
    pub width: f64,
    pub height: f64,
    pub center_y: f64,
    pub top: Slit,
    pub bottom: Slit,
}

impl Geometry {
    pub fn new(config: &Config) -> Self {
        let width = config.viewport.width as f64;
        let height = config.viewport.height as f64;
        let center_y = height / 2.0;
        let half = config.slit_distance / 2.0;

        Self {
            emitter_x: EMITTER_X,
            barrier_x: BARRIER_X,
            screen_x: width,
            width,
            height,
            center_y,
            top: Slit {
                center_y: center_y - half,
                width: config.slit_width,
                open: config.top_slit_open,
            },
            bottom: Slit {
                center_y: center_y + half,
                width: config.slit_width,
                open: config.bottom_slit_open,
            },
        }
    }

    /// Both slits, top first.
    pub fn slits(&self) -> [Slit; 2] {
        [self.top, self.bottom]
    }

    /// Both slits are open.
    pub fn interfering(&self) -> bool {
        self.top.open && self.bottom.open
    }

    /// Distance from the barrier to the screen.
    pub fn screen_distance(&self) -> f64 {
        self.screen_x - self.barrier_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slit_window_is_inclusive() {
        let slit = Slit { center_y: 170.0, width: 10.0, open: true };
        assert!(slit.admits(175.0));
        assert!(slit.admits(165.0));
        assert!(!slit.admits(175.001));
    }

    #[test]
    fn test_closed_slit_admits_nothing() {
        let slit = Slit { center_y: 100.0, width: 50.0, open: false };
        assert!(!slit.admits(100.0));
    }

    #[test]
    fn test_zero_width_slit_is_a_point() {
        let slit = Slit { center_y: 100.0, width: 0.0, open: true };
        assert!(slit.admits(100.0));
        assert!(!slit.admits(100.1));
    }

    #[test]
    fn test_geometry_places_slits_around_center() {
        let config = Config::default();
        let g = config.geometry();
        assert_eq!(g.center_y, 200.0);
        assert_eq!(g.top.center_y, 198.0);
        assert_eq!(g.bottom.center_y, 202.0);
        assert_eq!(g.screen_x, 800.0);
        assert!(g.interfering());
    }

    #[test]
    fn test_sanitized_clamps_out_of_range_values() {
        let config = Config {
            emission_rate: 250.0,
            slit_width: -3.0,
            slit_distance: f64::NAN,
            viewport: Viewport { width: 0, height: 0 },
            ..Config::default()
        }
        .sanitized();

        assert_eq!(config.emission_rate, 100.0);
        assert_eq!(config.slit_width, 0.0);
        assert_eq!(config.slit_distance, 4.0);
        assert_eq!(config.viewport, Viewport { width: 250, height: 1 });
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "slit_width": 4.0, "detection_mode": "wave" }"#).unwrap();
        assert_eq!(config.slit_width, 4.0);
        assert_eq!(config.detection_mode, DetectionMode::Wave);
        assert_eq!(config.slit_distance, 4.0);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("slitwave_config_{}.json", std::process::id()));
        let config = Config {
            particle_type: ParticleType::Electron,
            top_slit_open: false,
            ..Config::default()
        };
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_mode_cycle_returns_to_start() {
        let start = DetectionMode::Particle;
        assert_eq!(start.next().next().next(), start);
        assert_eq!(ParticleType::Photon.next().next(), ParticleType::Photon);
    }
}
