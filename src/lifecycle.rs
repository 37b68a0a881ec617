//! Particle lifecycle: emission, slit transmission, steering and arrival.
//!
//! Every tick the [`Lifecycle`] runs one emission trial and then advances the
//! whole live set. A particle ends its life in one of two ways:
//!
//! | Event | Where | Result |
//! |-------|-------|--------|
//! | No open slit admits it | barrier | [`Outcome::Absorbed`], no detection |
//! | It reaches the screen | right edge | [`Outcome::Detected`] with landing y |
//!
//! # Interference steering
//!
//! When both slits are open, a particle that transmits gets its vertical
//! velocity nudged once, at the slit. Rows of the screen near its straight-line
//! landing point pull it toward them in proportion to their interference
//! weight, so maxima attract and minima barely do. The result is a biased
//! random walk whose histogram approximates the double-slit curve; it is not a
//! sample from [`double_slit_pattern`](crate::wave::double_slit_pattern).

use crate::config::{Config, DetectionMode, Geometry, PARTICLE_SPEED, WAVELENGTH};
use crate::particle::Particle;
use crate::wave::{complex_amplitude, path_length, probability, steering_weight, Source};
use glam::{DVec2, Vec3};
use rand::Rng;
use std::f64::consts::TAU;

/// Vertical spread of the emission point, in pixels.
pub const SPAWN_JITTER: f64 = 5.0;
/// Vertical velocity kick applied on slit transmission.
pub const SLIT_JITTER: f64 = 0.2;

/// Result of advancing a particle by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Alive,
    /// Blocked by the barrier. No detection is recorded.
    Absorbed,
    /// Reached the screen at height `y`.
    Detected { y: f64 },
}

/// How the interference weight of a screen row is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SteeringKernel {
    /// `cos²(Δφ / 2)` from the path difference, in `[0, 1]`.
    PathDifference,
    /// `|a₁ + a₂|²` of the un-normalized superposition, in `[0, 4]`.
    Superposition,
}

/// Constants for the steering step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringProfile {
    pub kernel: SteeringKernel,
    /// Velocity increment per unit weight.
    pub gain: f64,
    /// Spacing of tested screen rows, in pixels.
    pub row_stride: usize,
    /// Rows closer than this to the extrapolated landing point take part.
    pub capture_radius: f64,
}

impl SteeringProfile {
    pub fn for_mode(mode: DetectionMode) -> Self {
        match mode {
            DetectionMode::Wave => Self {
                kernel: SteeringKernel::Superposition,
                gain: 0.005,
                row_stride: 5,
                capture_radius: 12.0,
            },
            DetectionMode::Particle | DetectionMode::Accumulation => Self {
                kernel: SteeringKernel::PathDifference,
                gain: 0.02,
                row_stride: 5,
                capture_radius: 10.0,
            },
        }
    }
}

/// A detectable particle that reached the screen this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrival {
    pub y: f64,
    pub color: Vec3,
}

/// What happened to the live set during [`Lifecycle::advance_all`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdvanceReport {
    pub arrivals: Vec<Arrival>,
    pub absorbed: usize,
}

/// Owns the live particle set and the "particles fired" counter.
#[derive(Clone, Debug, Default)]
pub struct Lifecycle {
    particles: Vec<Particle>,
    fired: u64,
    one_at_a_time: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live particles, in emission order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Total particles emitted since the last [`clear`](Self::clear).
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn one_at_a_time(&self) -> bool {
        self.one_at_a_time
    }

    /// Only emit when no particle is in flight.
    pub fn set_one_at_a_time(&mut self, enabled: bool) {
        self.one_at_a_time = enabled;
    }

    /// Drop every live particle and zero the fired counter.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.fired = 0;
    }

    /// Insert an already-built particle into the live set.
    ///
    /// Does not count as an emission.
    pub fn insert(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Run one emission trial.
    ///
    /// Draws a single uniform sample and emits when it falls below
    /// `emission_rate / 100`. Under one-at-a-time mode the trial is skipped
    /// entirely while any particle is still in flight.
    pub fn try_spawn<R: Rng + ?Sized>(&mut self, config: &Config, rng: &mut R) -> Option<&Particle> {
        if self.one_at_a_time && !self.particles.is_empty() {
            return None;
        }

        let sample: f64 = rng.gen();
        if sample >= config.emission_rate / 100.0 {
            return None;
        }

        let geometry = config.geometry();
        let y = geometry.center_y + (rng.gen::<f64>() - 0.5) * SPAWN_JITTER;
        let phase_offset = rng.gen::<f64>() * TAU;

        self.particles.push(Particle::new(
            DVec2::new(geometry.emitter_x, y),
            DVec2::new(PARTICLE_SPEED, 0.0),
            config.particle_type,
            phase_offset,
        ));
        self.fired += 1;
        self.particles.last()
    }

    /// Advance every live particle, removing the ones that ended.
    pub fn advance_all<R: Rng + ?Sized>(&mut self, config: &Config, rng: &mut R) -> AdvanceReport {
        let geometry = config.geometry();
        let mut report = AdvanceReport::default();

        self.particles.retain_mut(|p| match advance(p, &geometry, config, &mut *rng) {
            Outcome::Alive => true,
            Outcome::Absorbed => {
                report.absorbed += 1;
                false
            }
            Outcome::Detected { y } => {
                if p.detectable {
                    report.arrivals.push(Arrival { y, color: p.color });
                }
                false
            }
        });

        report
    }
}

/// Advance one particle by a tick.
pub fn advance<R: Rng + ?Sized>(
    particle: &mut Particle,
    geometry: &Geometry,
    config: &Config,
    rng: &mut R,
) -> Outcome {
    if config.show_paths {
        particle.sample_path();
    }

    if particle.position.x >= geometry.barrier_x && particle.mark_passed() {
        let y = particle.position.y;
        if !geometry.slits().iter().any(|slit| slit.admits(y)) {
            return Outcome::Absorbed;
        }

        particle.velocity.y += (rng.gen::<f64>() - 0.5) * SLIT_JITTER;
        if geometry.interfering() {
            steer(particle, geometry, &SteeringProfile::for_mode(config.detection_mode));
        }
    }

    particle.integrate();

    if particle.position.x >= geometry.screen_x {
        Outcome::Detected { y: particle.position.y }
    } else {
        Outcome::Alive
    }
}

/// Nudge a particle's vertical velocity toward high-weight screen rows.
///
/// Assumes both slits are open. Does nothing for a particle that is not
/// moving toward the screen.
pub fn steer(particle: &mut Particle, geometry: &Geometry, profile: &SteeringProfile) {
    let vx = particle.velocity.x;
    let distance = geometry.screen_x - particle.position.x;
    if !(vx > 0.0 && vx.is_finite()) || distance <= 0.0 {
        return;
    }

    let x = particle.position.x;
    let sources = [
        Source { position: DVec2::new(x, geometry.top.center_y), open: true },
        Source { position: DVec2::new(x, geometry.bottom.center_y), open: true },
    ];
    let rows = geometry.height.max(0.0) as usize;

    for row in (0..rows).step_by(profile.row_stride.max(1)) {
        let screen_y = row as f64;
        let landing = particle.position.y + particle.velocity.y * distance / vx;
        if (landing - screen_y).abs() >= profile.capture_radius {
            continue;
        }

        let target = DVec2::new(geometry.screen_x, screen_y);
        let weight = match profile.kernel {
            SteeringKernel::PathDifference => {
                let difference = path_length(sources[0].position, target) - path_length(sources[1].position, target);
                steering_weight(difference.abs(), WAVELENGTH)
            }
            SteeringKernel::Superposition => {
                probability(complex_amplitude(target, &sources))
            }
        };

        let direction = if screen_y - particle.position.y > 0.0 { 1.0 } else { -1.0 };
        particle.velocity.y += direction * weight * profile.gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticleType;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    /// Slits at 170 and 230, well clear of the beam.
    fn separated() -> Config {
        Config { slit_distance: 60.0, ..Config::default() }
    }

    fn at_barrier(y: f64) -> Particle {
        Particle::new(DVec2::new(150.0, y), DVec2::new(PARTICLE_SPEED, 0.0), ParticleType::Photon, 0.0)
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let config = Config { emission_rate: 0.0, ..separated() };
        let mut lifecycle = Lifecycle::new();
        let mut rng = rng();
        for _ in 0..1000 {
            assert!(lifecycle.try_spawn(&config, &mut rng).is_none());
        }
        assert_eq!(lifecycle.fired(), 0);
    }

    #[test]
    fn test_full_rate_always_spawns_at_emitter() {
        let config = Config { emission_rate: 100.0, ..separated() };
        let mut lifecycle = Lifecycle::new();
        let mut rng = rng();
        for _ in 0..50 {
            let p = lifecycle.try_spawn(&config, &mut rng).unwrap();
            assert_eq!(p.position.x, 70.0);
            assert!((p.position.y - 200.0).abs() <= SPAWN_JITTER / 2.0);
            assert_eq!(p.velocity, DVec2::new(PARTICLE_SPEED, 0.0));
            assert!((0.0..TAU).contains(&p.phase_offset));
        }
        assert_eq!(lifecycle.fired(), 50);
        assert_eq!(lifecycle.particles().len(), 50);
    }

    #[test]
    fn test_one_at_a_time_gates_emission() {
        let config = Config { emission_rate: 100.0, ..separated() };
        let mut lifecycle = Lifecycle::new();
        lifecycle.set_one_at_a_time(true);
        let mut rng = rng();

        assert!(lifecycle.try_spawn(&config, &mut rng).is_some());
        assert!(lifecycle.try_spawn(&config, &mut rng).is_none());

        lifecycle.clear();
        assert!(lifecycle.try_spawn(&config, &mut rng).is_some());
    }

    #[test]
    fn test_slit_window_boundary_transmits() {
        let config = separated();
        let geometry = config.geometry();
        // Top slit center is 170 with width 10.
        let mut p = at_barrier(175.0);
        let outcome = advance(&mut p, &geometry, &config, &mut rng());
        assert_eq!(outcome, Outcome::Alive);
        assert!(p.passed_barrier());
    }

    #[test]
    fn test_outside_window_is_absorbed() {
        let config = separated();
        let geometry = config.geometry();
        let mut p = at_barrier(200.0);
        assert_eq!(advance(&mut p, &geometry, &config, &mut rng()), Outcome::Absorbed);
    }

    #[test]
    fn test_closed_slit_absorbs_centered_particle() {
        let config = Config { top_slit_open: false, ..separated() };
        let geometry = config.geometry();
        let mut p = at_barrier(170.0);
        assert_eq!(advance(&mut p, &geometry, &config, &mut rng()), Outcome::Absorbed);
    }

    #[test]
    fn test_barrier_decision_happens_once() {
        let config = Config { bottom_slit_open: false, ..separated() };
        let geometry = config.geometry();
        let mut rng = rng();
        let mut p = at_barrier(170.0);

        assert_eq!(advance(&mut p, &geometry, &config, &mut rng), Outcome::Alive);
        let vy = p.velocity.y;
        for _ in 0..10 {
            assert_eq!(advance(&mut p, &geometry, &config, &mut rng), Outcome::Alive);
            assert!(p.passed_barrier());
            assert_eq!(p.velocity.y, vy);
        }
    }

    #[test]
    fn test_particle_is_detected_at_screen() {
        let config = Config { viewport: crate::config::Viewport { width: 300, height: 400 }, ..separated() };
        let geometry = config.geometry();
        let mut p = Particle::new(DVec2::new(298.0, 42.0), DVec2::new(PARTICLE_SPEED, 0.0), ParticleType::Photon, 0.0);
        p.mark_passed();
        assert_eq!(advance(&mut p, &geometry, &config, &mut rng()), Outcome::Detected { y: 42.0 });
    }

    #[test]
    fn test_steering_is_bounded_and_finite() {
        let config = separated();
        let geometry = config.geometry();
        for mode in [DetectionMode::Accumulation, DetectionMode::Wave] {
            let profile = SteeringProfile::for_mode(mode);
            let max_weight = match profile.kernel {
                SteeringKernel::PathDifference => 1.0,
                SteeringKernel::Superposition => 4.0,
            };
            let rows = (geometry.height as usize).div_ceil(profile.row_stride) as f64;
            for y in [165.0, 170.0, 175.0, 225.0, 230.0] {
                let mut p = at_barrier(y);
                steer(&mut p, &geometry, &profile);
                assert!(p.velocity.y.is_finite());
                assert!(p.velocity.y.abs() <= profile.gain * max_weight * rows);
            }
        }
    }

    #[test]
    fn test_minima_repel_and_maxima_attract() {
        // Slits at 140 and 260, screen 250 px away: maxima at 158, 200 and
        // 242, minima near 179 and 221.
        let config = Config {
            slit_width: 130.0,
            slit_distance: 120.0,
            viewport: crate::config::Viewport { width: 400, height: 400 },
            ..Config::default()
        };
        let geometry = config.geometry();
        let profile = SteeringProfile::for_mode(DetectionMode::Accumulation);

        for (y, toward) in [(172.0, -1.0), (183.0, 1.0), (191.0, 1.0), (209.0, -1.0), (217.0, -1.0), (228.0, 1.0)] {
            let mut p = at_barrier(y);
            steer(&mut p, &geometry, &profile);
            assert!(p.velocity.y * toward > 0.0, "y = {y}, vy = {}", p.velocity.y);
        }
    }

    #[test]
    fn test_phase_offset_never_moves_wave_steering() {
        let geometry = separated().geometry();
        let profile = SteeringProfile::for_mode(DetectionMode::Wave);
        let mut a = at_barrier(172.0);
        let mut b = at_barrier(172.0);
        b.phase_offset = 2.0;
        steer(&mut a, &geometry, &profile);
        steer(&mut b, &geometry, &profile);
        assert_eq!(a.velocity, b.velocity);
    }

    #[test]
    fn test_steering_skips_stationary_particle() {
        let config = separated();
        let geometry = config.geometry();
        let mut p = at_barrier(170.0);
        p.velocity = DVec2::ZERO;
        steer(&mut p, &geometry, &SteeringProfile::for_mode(DetectionMode::Particle));
        assert_eq!(p.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_zero_width_slits_absorb_without_nan() {
        let config = Config { slit_width: 0.0, emission_rate: 100.0, ..separated() };
        let mut lifecycle = Lifecycle::new();
        let mut rng = rng();
        let mut absorbed = 0;
        for _ in 0..400 {
            lifecycle.try_spawn(&config, &mut rng);
            let report = lifecycle.advance_all(&config, &mut rng);
            assert!(report.arrivals.is_empty());
            absorbed += report.absorbed;
            for p in lifecycle.particles() {
                assert!(p.velocity.x.is_finite() && p.velocity.y.is_finite());
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_undetectable_particle_lands_silently() {
        let config = Config { viewport: crate::config::Viewport { width: 300, height: 400 }, ..separated() };
        let mut lifecycle = Lifecycle::new();
        let mut p = Particle::new(DVec2::new(299.0, 10.0), DVec2::new(PARTICLE_SPEED, 0.0), ParticleType::Photon, 0.0);
        p.mark_passed();
        p.detectable = false;
        lifecycle.insert(p);

        let report = lifecycle.advance_all(&config, &mut rng());
        assert!(report.arrivals.is_empty());
        assert_eq!(report.absorbed, 0);
        assert!(lifecycle.particles().is_empty());
    }
}
