//! slitwave viewer - live double-slit experiment in a native window
//!
//! Usage: `slitwave-viewer [config.json]`
//!
//! The scene is rendered on the CPU into a frame buffer and uploaded to an
//! egui texture every frame. All controls are keyboard shortcuts, see
//! [`slitwave_viewer::controls`].

use eframe::egui;
use slitwave::{Config, FrameBuffer, FrameClock, Renderer, Session};
use slitwave_viewer::controls::{self, Command, BINDINGS};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => match Config::load(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config.sanitized()
            }
            Err(e) => {
                log::error!("failed to load config from {}: {}", path.display(), e);
                Config::default()
            }
        },
        None => Config::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.viewport.width as f32 + 16.0, config.viewport.height as f32 + 48.0])
            .with_title("slitwave"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native("slitwave", options, Box::new(|_cc| Ok(Box::new(ViewerApp::new(config)))))
}

struct ViewerApp {
    config: Config,
    session: Session,
    clock: FrameClock,
    renderer: Renderer,
    frame: FrameBuffer,
    texture: Option<egui::TextureHandle>,
    status_message: Option<(String, Instant)>,
    /// Number of PNGs written this run, used for file names.
    saved_frames: u32,
    show_help: bool,
}

impl ViewerApp {
    fn new(config: Config) -> Self {
        let session = Session::new(&config);
        let frame = FrameBuffer::new(config.viewport.width, config.viewport.height);
        Self {
            config,
            session,
            clock: FrameClock::new(),
            renderer: Renderer::new(),
            frame,
            texture: None,
            status_message: None,
            saved_frames: 0,
            show_help: false,
        }
    }

    fn show_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let pressed: Vec<Command> = ctx.input(|i| {
            BINDINGS
                .iter()
                .filter(|(key, _)| i.key_pressed(*key))
                .map(|&(_, command)| command)
                .collect()
        });
        if ctx.input(|i| i.key_pressed(egui::Key::H)) {
            self.show_help = !self.show_help;
        }

        for command in pressed {
            if command.apply(&mut self.config) {
                log::debug!("{:?}", command);
                continue;
            }
            match command {
                Command::Reset => {
                    self.session.reset();
                    self.clock.reset();
                    self.show_status("Reset");
                }
                Command::TogglePause => {
                    let paused = self.clock.toggle_pause();
                    self.show_status(if paused { "Paused" } else { "Running" });
                }
                Command::ToggleOneAtATime => {
                    let enabled = self.session.toggle_one_at_a_time();
                    self.show_status(if enabled { "One at a time" } else { "Continuous emission" });
                }
                Command::SaveFrame => self.save_frame(),
                _ => {}
            }
        }
    }

    fn save_frame(&mut self) {
        self.saved_frames += 1;
        let path = format!("slitwave-{:04}.png", self.saved_frames);
        match self.frame.save_png(&path) {
            Ok(()) => self.show_status(format!("Saved {}", path)),
            Err(e) => {
                log::error!("failed to save {}: {}", path, e);
                self.show_status(format!("Save failed: {}", e));
            }
        }
    }

    fn upload(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let size = [self.frame.width() as usize, self.frame.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, self.frame.as_bytes());
        match &mut self.texture {
            Some(texture) => {
                texture.set(image, egui::TextureOptions::NEAREST);
                texture.id()
            }
            None => {
                let texture = ctx.load_texture("scene", image, egui::TextureOptions::NEAREST);
                let id = texture.id();
                self.texture = Some(texture);
                id
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some((msg, time)) = &self.status_message {
                    if time.elapsed().as_secs() < 5 {
                        ui.label(msg);
                    } else {
                        self.status_message = None;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{:.0} FPS | frame {}", self.clock.fps(), self.clock.frame()));
                    ui.separator();
                    ui.label(format!(
                        "{:?} | {:?} | fired {} | detected {}{}{}",
                        self.config.particle_type,
                        self.config.detection_mode,
                        self.session.fired(),
                        self.session.detections().total(),
                        if self.session.one_at_a_time() { " | one at a time" } else { "" },
                        if self.clock.is_paused() { " | paused" } else { "" },
                    ));
                    ui.separator();
                    ui.label(egui::RichText::new("H: keys").small().weak());
                });
            });
        });

        if self.show_help {
            egui::Window::new("Keys").collapsible(false).show(ctx, |ui| {
                for line in controls::help_lines() {
                    ui.monospace(line);
                }
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            self.config.viewport.width = available.x.max(1.0) as u32;
            self.config.viewport.height = available.y.max(1.0) as u32;
            self.config = self.config.clone().sanitized();

            let delta = self.clock.update();
            if !self.clock.is_paused() {
                self.session.tick(&self.config, delta);
            }
            self.renderer.draw(&self.session.snapshot(), &self.config, &mut self.frame);

            let id = self.upload(ctx);
            let size = egui::vec2(self.frame.width() as f32, self.frame.height() as f32);
            ui.image((id, size));
        });

        ctx.request_repaint();
    }
}
