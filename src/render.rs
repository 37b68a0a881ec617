//! Software renderer for the experiment scene.
//!
//! Draws a [`Snapshot`] into an RGBA [`FrameBuffer`] that hosts can upload as a
//! texture or save as a PNG. Layers, back to front:
//!
//! | Layer | Notes |
//! |-------|-------|
//! | Emitter, barrier | slit gaps cut into the barrier |
//! | Screen strip | analytic curve, contrast `^0.7` |
//! | Wave overlay | wave mode only: animated strip and wavefront rings |
//! | Particles and trails | hidden past the barrier in wave mode |
//! | Detections | alpha follows opacity |
//! | Intensity graph | smoothed histogram along the bottom |

use crate::analysis::smooth;
use crate::config::{Config, DetectionMode, WAVELENGTH};
use crate::error::ExportError;
use crate::session::Snapshot;
use crate::wave::{display_amplitude, theoretical_profile, wave_brightness, Source};
use bytemuck::{Pod, Zeroable};
use glam::{DVec2, Vec3};
use std::path::Path;

/// Exponent applied to the analytic curve so dim fringes stay visible.
const PATTERN_CONTRAST: f64 = 0.7;
/// Width of the dark detection screen strip on the right edge.
const SCREEN_STRIP: f64 = 10.0;

/// A single RGBA pixel, laid out for direct upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque pixel from an RGB color in 0.0-1.0.
    pub fn from_color(color: Vec3) -> Self {
        let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        Self::new(c.x as u8, c.y as u8, c.z as u8, 255)
    }

    fn to_color(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }
}

/// An owned RGBA image.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate to a new size if it changed. Contents become undefined.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width != self.width || height != self.height {
            *self = Self::new(width, height);
        }
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    pub fn clear(&mut self, color: Vec3) {
        self.pixels.fill(Rgba8::from_color(color));
    }

    /// Alpha-blend `color` over one pixel. Out-of-bounds writes are dropped.
    pub fn blend(&mut self, x: i64, y: i64, color: Vec3, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 || alpha <= 0.0 {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        let alpha = alpha.min(1.0);
        let under = self.pixels[index].to_color();
        self.pixels[index] = Rgba8::from_color(under.lerp(color, alpha));
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Vec3, alpha: f32) {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let x1 = (x + w).ceil() as i64;
        let y1 = (y + h).ceil() as i64;
        for py in y0.max(0)..y1.min(self.height as i64) {
            for px in x0.max(0)..x1.min(self.width as i64) {
                self.blend(px, py, color, alpha);
            }
        }
    }

    pub fn fill_circle(&mut self, center: DVec2, radius: f64, color: Vec3, alpha: f32) {
        let r = radius.max(0.5);
        let x0 = (center.x - r).floor() as i64;
        let x1 = (center.x + r).ceil() as i64;
        let y0 = (center.y - r).floor() as i64;
        let y1 = (center.y + r).ceil() as i64;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let d = DVec2::new(px as f64 + 0.5, py as f64 + 0.5).distance(center);
                if d <= r {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// One pixel wide line.
    pub fn line(&mut self, from: DVec2, to: DVec2, color: Vec3, alpha: f32) {
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
        if steps > 1 << 16 {
            return;
        }
        for i in 0..=steps {
            let p = from + delta * (i as f64 / steps as f64);
            self.blend(p.x.floor() as i64, p.y.floor() as i64, color, alpha);
        }
    }

    pub fn circle_outline(&mut self, center: DVec2, radius: f64, color: Vec3, alpha: f32) {
        let steps = (radius * std::f64::consts::TAU).ceil().max(8.0) as usize;
        for i in 0..steps {
            let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
            let p = center + DVec2::new(angle.cos(), angle.sin()) * radius;
            self.blend(p.x.floor() as i64, p.y.floor() as i64, color, alpha);
        }
    }

    /// Encode as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.as_bytes().to_vec();
        let len = bytes.len();
        let image = image::RgbaImage::from_raw(self.width, self.height, bytes).ok_or(ExportError::Size {
            width: self.width,
            height: self.height,
            len,
        })?;
        image.save(path)?;
        log::info!("saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Draws snapshots into frame buffers.
#[derive(Clone, Debug)]
pub struct Renderer {
    pub background: Vec3,
    /// Height of the intensity graph along the bottom edge.
    pub graph_height: f64,
    /// Half-window of the moving average applied to the graph.
    pub smoothing: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            background: Vec3::new(0.04, 0.04, 0.06),
            graph_height: 100.0,
            smoothing: 3,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a full frame. The buffer is resized to the config's viewport.
    pub fn draw(&self, snapshot: &Snapshot<'_>, config: &Config, frame: &mut FrameBuffer) {
        frame.resize(config.viewport.width, config.viewport.height);
        frame.clear(self.background);

        self.draw_apparatus(config, frame);
        self.draw_screen(config, frame);
        if config.detection_mode == DetectionMode::Wave {
            self.draw_wave_overlay(snapshot, config, frame);
        }
        self.draw_particles(snapshot, config, frame);
        self.draw_detections(snapshot, config, frame);
        self.draw_graph(snapshot, config, frame);
    }

    fn draw_apparatus(&self, config: &Config, frame: &mut FrameBuffer) {
        let g = config.geometry();
        let grey = Vec3::splat(0.33);

        frame.fill_rect(g.emitter_x - 12.0, g.center_y - 8.0, 12.0, 16.0, grey, 1.0);

        let slits = g.slits();
        for row in 0..config.viewport.height {
            let y = row as f64 + 0.5;
            if !slits.iter().any(|s| s.admits(y)) {
                frame.fill_rect(g.barrier_x - 2.0, row as f64, 4.0, 1.0, grey, 1.0);
            }
        }
    }

    fn draw_screen(&self, config: &Config, frame: &mut FrameBuffer) {
        let g = config.geometry();
        frame.fill_rect(g.screen_x - SCREEN_STRIP, 0.0, SCREEN_STRIP, g.height, Vec3::splat(0.067), 1.0);

        if config.open_slits() == 0 {
            return;
        }
        for (row, value) in theoretical_profile(config).into_iter().enumerate() {
            let intensity = value.max(0.0).powf(PATTERN_CONTRAST) as f32;
            frame.fill_rect(g.screen_x - 5.0, row as f64, 5.0, 1.0, Vec3::splat(intensity), 1.0);
        }
    }

    fn draw_wave_overlay(&self, snapshot: &Snapshot<'_>, config: &Config, frame: &mut FrameBuffer) {
        let g = config.geometry();
        if config.open_slits() == 0 {
            return;
        }

        let sources = [
            Source::from_slit(&g.top, g.barrier_x),
            Source::from_slit(&g.bottom, g.barrier_x),
        ];
        let color = config.particle_type.color();
        let strip_x = g.screen_x - 5.0;
        for row in 0..config.viewport.height {
            let point = DVec2::new(strip_x, row as f64);
            let brightness = wave_brightness(display_amplitude(point, &sources, snapshot.sim_time));
            frame.fill_rect(strip_x - 10.0, row as f64, 10.0, 1.0, color, (brightness * 0.25) as f32);
        }

        if g.interfering() {
            let mut radius = 10.0;
            while radius < g.width {
                let alpha = (0.2 - radius / g.width * 0.2) as f32;
                for source in &sources {
                    frame.circle_outline(source.position, radius, Vec3::ONE, alpha);
                }
                radius += WAVELENGTH;
            }
        }
    }

    fn draw_particles(&self, snapshot: &Snapshot<'_>, config: &Config, frame: &mut FrameBuffer) {
        let barrier_x = config.geometry().barrier_x;
        let hide_past_barrier = config.detection_mode == DetectionMode::Wave;

        for p in snapshot.particles {
            if config.show_paths && p.paths.len() > 1 {
                let mut points = p.paths.iter().copied().chain(std::iter::once(p.position));
                if let Some(mut prev) = points.next() {
                    for next in points {
                        frame.line(prev, next, p.color, 0.5);
                        prev = next;
                    }
                }
            }

            if !hide_past_barrier || p.position.x < barrier_x {
                frame.fill_circle(p.position, p.size, p.color, 1.0);
            }
        }
    }

    fn draw_detections(&self, snapshot: &Snapshot<'_>, config: &Config, frame: &mut FrameBuffer) {
        let x = config.geometry().screen_x - 1.5;
        for d in snapshot.detections {
            frame.fill_circle(DVec2::new(x, d.y), 1.5, d.color, d.opacity);
        }
    }

    fn draw_graph(&self, snapshot: &Snapshot<'_>, config: &Config, frame: &mut FrameBuffer) {
        let width = config.viewport.width as f64;
        let bottom = config.viewport.height as f64;
        let top = bottom - self.graph_height;

        frame.fill_rect(0.0, top, width, self.graph_height, Vec3::ZERO, 0.3);
        frame.line(DVec2::new(0.0, top), DVec2::new(width, top), Vec3::splat(0.4), 1.0);

        let histogram = snapshot.histogram;
        if histogram.is_empty() {
            return;
        }
        let smoothed = smooth(histogram, self.smoothing);
        let max = histogram.iter().copied().max().unwrap_or(0).max(1) as f64;
        let color = config.particle_type.color();
        let height_of = |value: f64| bottom - (value / max).min(1.0) * self.graph_height;

        // Gradient fill under the curve, opaque at the top of the graph.
        for column in 0..config.viewport.width {
            let index = (column as usize * smoothed.len()) / config.viewport.width.max(1) as usize;
            let y_top = height_of(smoothed[index.min(smoothed.len() - 1)]);
            let mut y = y_top.floor().max(top);
            while y < bottom {
                let alpha = (1.0 - (y - top) / self.graph_height) as f32;
                frame.blend(column as i64, y as i64, color, alpha * 0.6);
                y += 1.0;
            }
        }

        let mut prev = DVec2::new(0.0, height_of(smoothed[0]));
        for (i, &value) in smoothed.iter().enumerate().skip(1) {
            let next = DVec2::new(i as f64 / smoothed.len() as f64 * width, height_of(value));
            frame.line(prev, next, color, 1.0);
            frame.line(prev + DVec2::Y, next + DVec2::Y, color, 1.0);
            prev = next;
        }
    }
}
