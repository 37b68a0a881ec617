//! Simulation session: one visualization run.
//!
//! A [`Session`] owns the live particles, the detection accumulator, the
//! counters and the random source. Hosts call [`Session::tick`] once per
//! display refresh with the current [`Config`] and then draw from
//! [`Session::snapshot`].
//!
//! Each tick runs, in order:
//!
//! 1. React to config changes since the previous tick
//! 2. One emission trial
//! 3. Advance every live particle, including one emitted in step 2
//! 4. Record screen arrivals
//! 5. Fade detections

use crate::config::{Config, DetectionMode};
use crate::detection::{Detection, Detections};
use crate::lifecycle::Lifecycle;
use crate::particle::Particle;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Summary of a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: bool,
    pub absorbed: usize,
    pub detected: usize,
}

/// Read-only view of everything a renderer needs.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub particles: &'a [Particle],
    pub detections: &'a [Detection],
    pub histogram: &'a [u32],
    /// Particles emitted since the last reset.
    pub fired: u64,
    /// Simulated seconds since the last reset.
    pub sim_time: f64,
    pub one_at_a_time: bool,
}

/// State of one visualization run.
pub struct Session<R: Rng = SmallRng> {
    lifecycle: Lifecycle,
    detections: Detections,
    sim_time: f64,
    ticks: u64,
    /// Config seen by the previous tick.
    observed: Config,
    rng: R,
}

impl Session<SmallRng> {
    /// A session with an entropy-seeded random source.
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// A reproducible session.
    pub fn seeded(config: &Config, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    /// A session drawing all randomness from `rng`.
    pub fn with_rng(config: &Config, rng: R) -> Self {
        log::debug!(
            "new session: {}x{} viewport, {} slit(s) open",
            config.viewport.width,
            config.viewport.height,
            config.open_slits()
        );
        Self {
            lifecycle: Lifecycle::new(),
            detections: Detections::new(config.viewport.height as usize),
            sim_time: 0.0,
            ticks: 0,
            observed: config.clone(),
            rng,
        }
    }

    /// Run one frame of the simulation.
    ///
    /// `delta_secs` is the wall time since the previous tick; negative or
    /// non-finite values count as zero.
    pub fn tick(&mut self, config: &Config, delta_secs: f64) -> TickReport {
        self.observe(config);

        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.sim_time += delta_secs;
        }

        let spawned = self.lifecycle.try_spawn(config, &mut self.rng).is_some();
        let advanced = self.lifecycle.advance_all(config, &mut self.rng);
        for arrival in &advanced.arrivals {
            self.detections.record(arrival.y, arrival.color, self.sim_time);
        }
        self.detections.tick(config.detection_mode);
        self.ticks += 1;

        let report = TickReport {
            spawned,
            absorbed: advanced.absorbed,
            detected: advanced.arrivals.len(),
        };
        log::trace!("tick {}: {:?}", self.ticks, report);
        report
    }

    /// Apply the reset policy for whatever changed since the last tick.
    fn observe(&mut self, config: &Config) {
        if self.observed == *config {
            return;
        }

        let previous = std::mem::replace(&mut self.observed, config.clone());

        if config.viewport.height != previous.viewport.height {
            self.detections.resize(config.viewport.height as usize);
        }

        if config.particle_type != previous.particle_type {
            log::debug!("particle type changed to {:?}", config.particle_type);
            self.reset();
        } else if config.slits_differ(&previous) && config.detection_mode == DetectionMode::Accumulation {
            log::debug!("slits changed, clearing accumulated detections");
            self.detections.reset();
        }

        if config.detection_mode == DetectionMode::Particle && previous.detection_mode != DetectionMode::Particle {
            self.detections.refresh_opacity();
        }
    }

    /// Clear particles, detections, histogram, counters and one-at-a-time mode.
    pub fn reset(&mut self) {
        self.lifecycle.clear();
        self.lifecycle.set_one_at_a_time(false);
        self.detections.reset();
        self.sim_time = 0.0;
        self.ticks = 0;
        log::debug!("session reset");
    }

    /// Flip one-at-a-time mode. Returns the new state.
    pub fn toggle_one_at_a_time(&mut self) -> bool {
        let enabled = !self.lifecycle.one_at_a_time();
        self.lifecycle.set_one_at_a_time(enabled);
        enabled
    }

    pub fn set_one_at_a_time(&mut self, enabled: bool) {
        self.lifecycle.set_one_at_a_time(enabled);
    }

    pub fn one_at_a_time(&self) -> bool {
        self.lifecycle.one_at_a_time()
    }

    pub fn detections(&self) -> &Detections {
        &self.detections
    }

    pub fn particles(&self) -> &[Particle] {
        self.lifecycle.particles()
    }

    pub fn histogram(&self) -> &[u32] {
        self.detections.histogram()
    }

    pub fn fired(&self) -> u64 {
        self.lifecycle.fired()
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Ticks since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            particles: self.lifecycle.particles(),
            detections: self.detections.detections(),
            histogram: self.detections.histogram(),
            fired: self.lifecycle.fired(),
            sim_time: self.sim_time,
            one_at_a_time: self.lifecycle.one_at_a_time(),
        }
    }
}
