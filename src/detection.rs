//! Detection accumulator: screen hits and the per-row intensity histogram.

use crate::config::DetectionMode;
use glam::Vec3;

/// Opacity lost per tick by detections in [`DetectionMode::Particle`].
pub const FADE_STEP: f32 = 0.01;

/// A recorded screen hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Landing height. The x coordinate is always the screen edge.
    pub y: f64,
    pub color: Vec3,
    /// Simulation time of arrival, in seconds.
    pub time: f64,
    /// 1.0 when recorded, in `[0, 1]`.
    pub opacity: f32,
}

/// Owns the detection list and the intensity histogram.
#[derive(Clone, Debug)]
pub struct Detections {
    detections: Vec<Detection>,
    histogram: Vec<u32>,
}

impl Detections {
    /// An empty accumulator with `rows` histogram cells.
    pub fn new(rows: usize) -> Self {
        Self {
            detections: Vec::new(),
            histogram: vec![0; rows],
        }
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// Detection counts indexed by screen row.
    pub fn histogram(&self) -> &[u32] {
        &self.histogram
    }

    pub fn rows(&self) -> usize {
        self.histogram.len()
    }

    /// Sum of all histogram cells.
    pub fn total(&self) -> u64 {
        self.histogram.iter().map(|&c| c as u64).sum()
    }

    /// Largest histogram cell (0 when empty).
    pub fn max(&self) -> u32 {
        self.histogram.iter().copied().max().unwrap_or(0)
    }

    /// Record a hit at height `y`.
    ///
    /// Rows outside the histogram (including negative or non-finite `y`) are
    /// silently skipped; the detection itself is still kept for drawing.
    pub fn record(&mut self, y: f64, color: Vec3, time: f64) {
        self.detections.push(Detection { y, color, time, opacity: 1.0 });

        let row = y.floor();
        if row >= 0.0 && row < self.histogram.len() as f64 {
            self.histogram[row as usize] += 1;
        }
    }

    /// Per-tick fade. Only [`DetectionMode::Particle`] fades; other modes keep
    /// detections forever.
    pub fn tick(&mut self, mode: DetectionMode) {
        if mode != DetectionMode::Particle {
            return;
        }
        self.detections.retain_mut(|d| {
            d.opacity = (d.opacity - FADE_STEP).max(0.0);
            d.opacity > 0.0
        });
    }

    /// Make every detection fully visible again.
    pub fn refresh_opacity(&mut self) {
        for d in &mut self.detections {
            d.opacity = 1.0;
        }
    }

    /// Clear detections and zero the histogram, keeping its row count.
    pub fn reset(&mut self) {
        self.detections.clear();
        self.histogram.iter_mut().for_each(|c| *c = 0);
    }

    /// Redistribute counts into `rows` cells.
    ///
    /// Old row `i` lands in `floor(i * rows / old_rows)`. Counts merge when
    /// several old rows map to the same new row.
    pub fn resize(&mut self, rows: usize) {
        let old_rows = self.histogram.len();
        if rows == old_rows {
            return;
        }

        let mut resized = vec![0u32; rows];
        if rows > 0 {
            for (i, &count) in self.histogram.iter().enumerate() {
                let index = i * rows / old_rows;
                if let Some(cell) = resized.get_mut(index) {
                    *cell += count;
                }
            }
        }
        log::debug!("histogram resized {} -> {} rows", old_rows, rows);
        self.histogram = resized;
    }
}
