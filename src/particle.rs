//! The particle data model.

use crate::config::ParticleType;
use glam::{DVec2, Vec3};

/// A path sample is recorded every this many ticks while trails are on.
pub const PATH_STRIDE: u32 = 3;

/// A single in-flight particle.
///
/// Owned by [`Lifecycle`](crate::Lifecycle) from emission until it is either
/// absorbed by the barrier or detected on the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Render radius in pixels (fixed at spawn).
    pub size: f64,
    /// RGB color, 0.0-1.0 (fixed at spawn).
    pub color: Vec3,
    /// Recorded trail samples, oldest first.
    pub paths: Vec<DVec2>,
    /// Coherent phase seed in `[0, 2π)`.
    ///
    /// A global phase shared by both slit paths. It drops out of every
    /// intensity, so it never changes where the particle lands.
    pub phase_offset: f64,
    /// Whether a screen arrival produces a detection.
    pub detectable: bool,
    /// Ticks since emission.
    pub age: u32,
    passed_barrier: bool,
}

impl Particle {
    /// A fresh particle of the given type.
    pub fn new(position: DVec2, velocity: DVec2, kind: ParticleType, phase_offset: f64) -> Self {
        Self {
            position,
            velocity,
            size: kind.size(),
            color: kind.color(),
            paths: Vec::new(),
            phase_offset,
            detectable: true,
            age: 0,
            passed_barrier: false,
        }
    }

    /// Whether the barrier decision has already been made for this particle.
    #[inline]
    pub fn passed_barrier(&self) -> bool {
        self.passed_barrier
    }

    /// Flag the barrier as handled. Returns `false` if it already was.
    pub(crate) fn mark_passed(&mut self) -> bool {
        !std::mem::replace(&mut self.passed_barrier, true)
    }

    /// Append the current position to the trail on sampling ticks.
    pub(crate) fn sample_path(&mut self) {
        if self.age % PATH_STRIDE == 0 {
            self.paths.push(self.position);
        }
    }

    /// One Euler step with a unit tick.
    #[inline]
    pub(crate) fn integrate(&mut self) {
        self.position += self.velocity;
        self.age += 1;
    }
}
