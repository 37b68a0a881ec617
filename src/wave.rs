//! Wave math: path lengths, phases, superposition and diffraction curves.
//!
//! Everything here is a pure function of its arguments. Complex amplitudes are
//! represented as [`DVec2`] with `x` the real and `y` the imaginary part.
//!
//! There are two superpositions:
//!
//! | Function | Sum | Used for |
//! |----------|-----|----------|
//! | [`complex_amplitude`] | raw sum, doubles at antinodes | steering decisions |
//! | [`display_amplitude`] | divided by open sources, in `[-1, 1]` | overlay brightness |

use crate::config::{Config, Slit, WAVELENGTH};
use glam::DVec2;
use std::f64::consts::{PI, TAU};

/// Below this `|alpha|` the sinc function returns its limit value 1.
pub const SINC_EPSILON: f64 = 1e-3;

/// Angular rate of the animated display wave (radians per simulated second).
pub const DISPLAY_WAVE_RATE: f64 = 5.0;

/// A coherent point source (one slit) at the barrier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Source {
    pub position: DVec2,
    pub open: bool,
}

impl Source {
    /// The source located at a slit center on the barrier.
    pub fn from_slit(slit: &Slit, barrier_x: f64) -> Self {
        Self {
            position: DVec2::new(barrier_x, slit.center_y),
            open: slit.open,
        }
    }
}

/// Euclidean distance between `a` and `b`.
#[inline]
pub fn path_length(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Phase accumulated over `distance` at the given wavelength.
#[inline]
pub fn phase(distance: f64, wavelength: f64) -> f64 {
    distance / wavelength * TAU
}

/// Superposed complex amplitude at `point` from every open source.
///
/// Each open source contributes `(cos φ, sin φ)` where `φ` is its path phase.
/// Contributions are summed, not averaged.
pub fn complex_amplitude(point: DVec2, sources: &[Source]) -> DVec2 {
    sources
        .iter()
        .filter(|s| s.open)
        .map(|s| {
            let phi = phase(path_length(s.position, point), WAVELENGTH);
            DVec2::new(phi.cos(), phi.sin())
        })
        .sum()
}

/// Intensity at a point: `re² + im²`.
#[inline]
pub fn probability(amplitude: DVec2) -> f64 {
    amplitude.length_squared()
}

/// Animated real amplitude for the wave overlay, normalized to `[-1, 1]`.
///
/// Returns 0 when no source is open.
pub fn display_amplitude(point: DVec2, sources: &[Source], time: f64) -> f64 {
    let mut open = 0;
    let mut amplitude = 0.0;
    for source in sources.iter().filter(|s| s.open) {
        let phi = phase(path_length(source.position, point), WAVELENGTH);
        amplitude += (phi - time * DISPLAY_WAVE_RATE).cos();
        open += 1;
    }
    if open == 0 {
        0.0
    } else {
        amplitude / open as f64
    }
}

/// Brightness in `[0.5, 1]` derived from a display amplitude.
#[inline]
pub fn wave_brightness(display_amplitude: f64) -> f64 {
    (display_amplitude * display_amplitude + 1.0) / 2.0
}

/// `sin(α) / α`, with the limit 1 near zero.
#[inline]
fn sinc(alpha: f64) -> f64 {
    if alpha.abs() < SINC_EPSILON {
        1.0
    } else {
        alpha.sin() / alpha
    }
}

/// Single-slit diffraction intensity, `sinc²(π·w·sinθ/λ)`, in `[0, 1]`.
pub fn single_slit_diffraction(theta: f64, slit_width: f64, wavelength: f64) -> f64 {
    let alpha = PI * slit_width * theta.sin() / wavelength;
    sinc(alpha).powi(2)
}

/// Closed-form double-slit intensity, `cos²(π·d·sinθ/λ) · sinc²(α)`.
///
/// This is the theoretical overlay. Particle outcomes never sample from it.
pub fn double_slit_pattern(theta: f64, slit_separation: f64, slit_width: f64, wavelength: f64) -> f64 {
    let phase_diff = slit_separation * theta.sin() / wavelength * PI;
    phase_diff.cos().powi(2) * single_slit_diffraction(theta, slit_width, wavelength)
}

/// Transmission weight for a path difference, `cos²(Δφ / 2)`.
#[inline]
pub fn steering_weight(path_difference: f64, wavelength: f64) -> f64 {
    (phase(path_difference, wavelength) / 2.0).cos().powi(2)
}

/// Analytic screen intensity for every row of the viewport.
///
/// Two open slits give the double-slit curve around their midpoint, one open
/// slit gives the diffraction curve around that slit, and no open slit gives
/// all zeros.
pub fn theoretical_profile(config: &Config) -> Vec<f64> {
    let geometry = config.geometry();
    let rows = config.viewport.height as usize;
    let distance = geometry.screen_distance();

    let (top, bottom) = (geometry.top, geometry.bottom);
    (0..rows)
        .map(|row| {
            let y = row as f64;
            match (top.open, bottom.open) {
                (true, true) => {
                    let mid = (top.center_y + bottom.center_y) / 2.0;
                    let theta = (y - mid).atan2(distance);
                    double_slit_pattern(theta, bottom.center_y - top.center_y, config.slit_width, WAVELENGTH)
                }
                (true, false) | (false, true) => {
                    let slit = if top.open { top } else { bottom };
                    let theta = (y - slit.center_y).atan2(distance);
                    single_slit_diffraction(theta, config.slit_width, WAVELENGTH)
                }
                (false, false) => 0.0,
            }
        })
        .collect()
}
