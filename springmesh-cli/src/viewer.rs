//! Interactive viewer for the cloth simulation
//!
//! Draws the mesh with an orthographic camera that orbits the vertical axis.
//! When started from a config file, the file is watched and the simulation
//! is rebuilt whenever it changes.

use notify::{Event, RecommendedWatcher, Watcher};
use springmesh_core::{Simulation, SimulationConfig};
use std::path::PathBuf;
use std::sync::mpsc;

use crate::config;

const FRAME_DT: f32 = 1.0 / 60.0;

/// Open the viewer window and block until it is closed
pub fn launch(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "springmesh",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(config_path, cc)))),
    )
    .map_err(|e| format!("viewer failed: {}", e).into())
}

/// Viewer application state
pub struct ViewerApp {
    config_path: Option<PathBuf>,
    sim_opt: Option<Simulation>,
    last_load_error: Option<String>,
    playing: bool,
    speed_multiplier: f32,
    yaw: f32,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ViewerApp {
    pub fn new(config_path: Option<PathBuf>, _cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .ok();

        if let (Some(w), Some(path)) = (watcher.as_mut(), config_path.as_ref()) {
            if let Err(e) = w.watch(path, notify::RecursiveMode::NonRecursive) {
                tracing::warn!(error = %e, path = %path.display(), "config watch failed");
            }
        }

        let mut app = Self {
            config_path,
            sim_opt: None,
            last_load_error: None,
            playing: false,
            speed_multiplier: 1.0,
            yaw: 0.0,
            file_watcher: watcher,
            file_receiver: rx,
        };
        app.reload_simulation();
        app
    }

    fn reload_simulation(&mut self) {
        let loaded = config::load(self.config_path.as_ref())
            .and_then(|config: SimulationConfig| Ok(Simulation::new(config)?));
        match loaded {
            Ok(sim) => {
                self.sim_opt = Some(sim);
                self.last_load_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "config reload failed");
                self.last_load_error = Some(format!("{}", e));
                self.sim_opt = None;
                self.playing = false;
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut needs_reload = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) => {
                    if let Some(path) = &self.config_path {
                        if paths.iter().any(|p| p.ends_with(path) || path.ends_with(p)) {
                            needs_reload = true;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "file watcher error");
                }
            }
        }

        if needs_reload {
            tracing::info!("config changed, reloading");
            self.reload_simulation();
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (toggle_first, toggle_second, reset, play) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Num1),
                i.key_pressed(egui::Key::Num2),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::Space),
            )
        });

        if play {
            self.playing = !self.playing;
        }
        if reset {
            if let Some(sim) = self.sim_opt.as_mut() {
                sim.initialize();
            }
        }
        if let Some(sim) = self.sim_opt.as_mut() {
            let pinned = sim.config().grid.pinned_indices();
            let keys = [(toggle_first, pinned.first()), (toggle_second, pinned.get(1))];
            for (pressed, index) in keys {
                if let (true, Some(&index)) = (pressed, index) {
                    if let Err(e) = sim.toggle_pin(index) {
                        self.last_load_error = Some(format!("{}", e));
                    }
                }
            }
        }
    }

    fn draw_scene(&self, ui: &egui::Ui, sim: &Simulation) {
        let rect = ui.max_rect();
        let painter = ui.painter();

        // Frame the sphere and the initial sheet, roughly [-50, 110] high
        let world_range = 160.0;
        let look_at = egui::vec2(10.0, 50.0);
        let scale = (rect.width().min(rect.height()) / world_range) * 0.9;
        let (sin, cos) = self.yaw.sin_cos();
        let project = |p: glam::Vec3| {
            let x = p.x * cos + p.z * sin;
            rect.center() + egui::vec2((x - look_at.x) * scale, -(p.y - look_at.y) * scale)
        };

        let ground = sim.ground();
        let ground_y = project(ground.point).y;
        painter.line_segment(
            [
                egui::pos2(rect.left(), ground_y),
                egui::pos2(rect.right(), ground_y),
            ],
            egui::Stroke::new(2.0, egui::Color32::DARK_GREEN),
        );

        let sphere = sim.sphere();
        painter.circle_stroke(
            project(sphere.center),
            sphere.radius * scale,
            egui::Stroke::new(1.5, egui::Color32::LIGHT_RED),
        );

        for (a, b) in sim.spring_segments() {
            painter.line_segment(
                [project(a), project(b)],
                egui::Stroke::new(0.5, egui::Color32::GRAY),
            );
        }

        for particle in sim.particles() {
            let (radius, color) = if particle.fixed {
                (4.0, egui::Color32::YELLOW)
            } else {
                (2.0, egui::Color32::LIGHT_BLUE)
            };
            painter.circle_filled(project(particle.pos), radius, color);
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    self.playing = !self.playing;
                }

                if ui.button("⏮ Reset").clicked() {
                    if let Some(sim) = self.sim_opt.as_mut() {
                        sim.initialize();
                    }
                    self.playing = false;
                }

                if ui.button("⏭ Step").clicked() {
                    if let Some(sim) = self.sim_opt.as_mut() {
                        sim.advance(FRAME_DT);
                    }
                }

                ui.separator();

                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.speed_multiplier, 1.0..=10.0));
                ui.label("Yaw:");
                ui.add(egui::Slider::new(
                    &mut self.yaw,
                    -std::f32::consts::PI..=std::f32::consts::PI,
                ));

                ui.separator();

                if let Some(sim) = &self.sim_opt {
                    ui.label(format!(
                        "Frame: {}  t = {:.2}s",
                        sim.frame_count(),
                        sim.elapsed()
                    ));
                }
                ui.label("[1]/[2] pin  [R] reset  [Space] play");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(sim) = &self.sim_opt {
                self.draw_scene(ui, sim);
            }

            if self.sim_opt.is_none() {
                if let Some(error) = &self.last_load_error {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.max_rect().height() * 0.4);
                        ui.label(
                            egui::RichText::new(format!("Error: {}", error))
                                .color(egui::Color32::RED)
                                .size(16.0),
                        );
                    });
                }
            }
        });

        if let Some(error) = &self.last_load_error {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.set_max_height(100.0);
                ui.label(egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED));
            });
        }

        // Advance only after this frame is drawn
        if self.playing {
            if let Some(sim) = self.sim_opt.as_mut() {
                let frames = self.speed_multiplier.round().max(1.0) as usize;
                for _ in 0..frames {
                    sim.advance(FRAME_DT);
                }
            }
            ctx.request_repaint();
        }
    }
}
