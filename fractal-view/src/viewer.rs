//! Interactive fractal viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the animated [`Fractal`],
//! its configuration and the random source, acts as the host frame clock,
//! and renders the instance matrices through a painter-backed
//! [`RenderBackend`].

use std::time::Instant;

use eframe::App;
use fractal_core::{
    Fractal, FractalConfig, InstancedDraw, PackedMatrix, RenderBackend, RootPose,
};
use glam::{Quat, Vec3, Vec4};
use rand::{SeedableRng, rngs::StdRng};

/// Orbit camera with an orthographic projection.
///
/// World points are rotated by `pitch` about X after `yaw` about Y, scaled
/// by `zoom` and centered in the drawing rect. The y-axis is flipped so
/// that positive y goes up on screen; larger view-space z is closer.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub pan: egui::Vec2,
}

impl Camera {
    fn view_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw)
    }

    /// Projects a world-space point, returning the screen position and
    /// the view-space depth used for back-to-front sorting.
    pub fn world_to_screen(&self, p: Vec3, rect: egui::Rect) -> (egui::Pos2, f32) {
        let v = self.view_rotation() * p;
        let center = rect.center();
        (
            egui::pos2(
                center.x + v.x * self.zoom + self.pan.x,
                center.y - v.y * self.zoom + self.pan.y,
            ),
            v.z,
        )
    }

    /// Inverse of [`Camera::world_to_screen`] for a known view depth.
    pub fn screen_to_world(&self, p: egui::Pos2, depth: f32, rect: egui::Rect) -> Vec3 {
        let center = rect.center();
        let v = Vec3::new(
            (p.x - center.x - self.pan.x) / self.zoom,
            (center.y - p.y + self.pan.y) / self.zoom,
            depth,
        );
        self.view_rotation().inverse() * v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.35,
            zoom: 140.0,
            pan: egui::vec2(0.0, 120.0),
        }
    }
}

/// One projected instance waiting to be painted.
#[derive(Clone, Copy, Debug)]
struct Disc {
    center: egui::Pos2,
    depth: f32,
    radius: f32,
    color: egui::Color32,
}

/// [`RenderBackend`] that projects every instance to a shaded disc.
///
/// Uploaded matrices are kept per level; each draw turns the level's
/// instances into discs. [`DiscBackend::paint`] then draws them back to
/// front.
struct DiscBackend {
    camera: Camera,
    rect: egui::Rect,
    buffers: Vec<Vec<PackedMatrix>>,
    discs: Vec<Disc>,
}

impl DiscBackend {
    fn new(camera: Camera, rect: egui::Rect) -> Self {
        Self {
            camera,
            rect,
            buffers: Vec::new(),
            discs: Vec::new(),
        }
    }

    fn paint(mut self, painter: &egui::Painter) {
        self.discs.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        for disc in &self.discs {
            painter.circle_filled(disc.center, disc.radius, disc.color);
        }
    }
}

/// Picks a color between `a` and `b` from the instance index and seed.
fn instance_color(a: Vec4, b: Vec4, seed: Vec4, instance: usize) -> egui::Color32 {
    let t = (instance as f32 * seed.x + seed.y).fract();
    let c = a.lerp(b, t).clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
    egui::Color32::from_rgba_unmultiplied(c.x as u8, c.y as u8, c.z as u8, c.w as u8)
}

impl RenderBackend for DiscBackend {
    fn upload_instances(&mut self, level: usize, matrices: &[PackedMatrix]) {
        if self.buffers.len() <= level {
            self.buffers.resize_with(level + 1, Vec::new);
        }
        let buffer = &mut self.buffers[level];
        buffer.clear();
        buffer.extend_from_slice(matrices);
    }

    fn draw_instanced(&mut self, draw: &InstancedDraw) {
        let Some(buffer) = self.buffers.get(draw.level) else {
            return;
        };
        let material = draw.material;
        for (i, m) in buffer.iter().take(draw.instance_count).enumerate() {
            let (center, depth) = self.camera.world_to_screen(m.translation, self.rect);
            self.discs.push(Disc {
                center,
                depth,
                radius: (m.uniform_scale() * 0.5 * self.camera.zoom).max(1.0),
                color: instance_color(
                    material.color_a,
                    material.color_b,
                    material.sequence_numbers,
                    i,
                ),
            });
        }
    }
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The animation core: [`Fractal`] and its [`FractalConfig`].
/// - The seeded random source used for every (re)build.
/// - UI configuration (camera, root turn speed, run state).
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running`, advance the root pose and call [`Fractal::tick`].
/// 3. Render all levels through a [`DiscBackend`].
///
/// ### Fields
/// - `fractal` - The animated hierarchy; inactive if the config was rejected.
/// - `cfg` - Configuration being edited in the side panel.
/// - `seed` - Seed of the current build; `rng` is reseeded from it on apply.
/// - `camera` - Orbit camera used for projection.
/// - `root_yaw` / `turn_speed` - Host-side rotation of the root, radians and rad/s.
/// - `last_tick_ms` - Wall time spent in the last tick (for display only).
/// - `last_error` - Message of the last rejected configuration.
pub struct Viewer {
    fractal: Fractal,
    cfg: FractalConfig,

    seed: u64,
    rng: StdRng,

    running: bool,
    camera: Camera,

    root_yaw: f32,
    turn_speed: f32,

    last_tick_ms: f64,
    last_error: Option<String>,
}

impl Viewer {
    /// Creates a viewer and activates a fractal built from `cfg` and `seed`.
    ///
    /// An invalid configuration does not abort: the viewer starts with an
    /// inactive fractal and shows the error in the status bar.
    pub fn new(cfg: FractalConfig, seed: u64) -> Self {
        let mut viewer = Self {
            fractal: Fractal::new(),
            cfg,
            seed,
            rng: StdRng::seed_from_u64(seed),
            running: true,
            camera: Camera::default(),
            root_yaw: 0.0,
            turn_speed: 0.2,
            last_tick_ms: 0.0,
            last_error: None,
        };
        viewer.apply_config();
        viewer
    }

    /// Rebuilds the fractal from the edited config and the current seed.
    fn apply_config(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        match self.fractal.reconfigure(self.cfg.clone(), &mut self.rng) {
            Ok(()) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    /// Picks a fresh seed and rebuilds.
    fn reseed(&mut self) {
        self.seed = rand::random();
        self.apply_config();
    }

    fn root_pose(&self) -> RootPose {
        RootPose {
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_y(self.root_yaw),
            scale: 1.0,
        }
    }

    /// Advances the host clock and the fractal by `dt` seconds.
    fn step(&mut self, dt: f32) {
        self.root_yaw += self.turn_speed * dt;
        let pose = self.root_pose();
        let start = Instant::now();
        self.fractal.tick(dt, &pose);
        self.last_tick_ms = start.elapsed().as_secs_f64() * 1000.0;
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, reseed, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step(1.0 / 60.0);
                }

                if ui.button("Reseed").clicked() {
                    self.reseed();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.camera.zoom, 10.0..=600.0).text("Zoom"));
                ui.add(egui::Slider::new(&mut self.turn_speed, -2.0..=2.0).text("Turn"));
            });
        });
    }

    /// Builds the bottom status bar (parts, tick time, seed, errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("tick = {:.3} ms", self.last_tick_ms));
                ui.label(format!("seed = {}", self.seed));
                ui.separator();
                let parts: usize = self.fractal.level_lengths().iter().sum();
                ui.label(format!("parts = {parts}"));
                if let Some(err) = &self.last_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }
            });
        });
    }

    /// Builds the right-hand configuration panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("depth:");
                    ui.add(egui::DragValue::new(&mut self.cfg.depth).range(1..=10).speed(0.1));
                });

                ui.separator();
                ui.label("Sag angle (deg)");
                Self::labeled_drag_f32(
                    ui,
                    "min:",
                    &mut self.cfg.sag_angle_range.min,
                    0.0..=90.0,
                    0.5,
                );
                Self::labeled_drag_f32(
                    ui,
                    "max:",
                    &mut self.cfg.sag_angle_range.max,
                    0.0..=90.0,
                    0.5,
                );

                ui.separator();
                ui.label("Spin speed (deg/s)");
                Self::labeled_drag_f32(
                    ui,
                    "min:",
                    &mut self.cfg.spin_speed_range.min,
                    -90.0..=90.0,
                    0.5,
                );
                Self::labeled_drag_f32(
                    ui,
                    "max:",
                    &mut self.cfg.spin_speed_range.max,
                    -90.0..=90.0,
                    0.5,
                );

                ui.separator();
                Self::labeled_drag_f32(
                    ui,
                    "reverse spin chance:",
                    &mut self.cfg.reverse_spin_probability,
                    0.0..=1.0,
                    0.01,
                );

                ui.separator();
                if ui.button("Apply").clicked() {
                    self.apply_config();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = FractalConfig::default();
                    self.apply_config();
                }
            });
    }

    /// Builds the central panel where the fractal is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Orbit with drag.
            if response.dragged() {
                let delta = response.drag_delta();
                self.camera.yaw += delta.x * 0.01;
                self.camera.pitch = (self.camera.pitch + delta.y * 0.01).clamp(-1.5, 1.5);
            }

            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.camera.zoom = (self.camera.zoom * factor).clamp(10.0, 600.0);
            }

            if self.running {
                let dt = ctx.input(|i| i.stable_dt);
                self.step(dt);
                ctx.request_repaint();
            }

            let mut backend = DiscBackend::new(self.camera, rect);
            self.fractal.render(&self.root_pose(), &mut backend);
            backend.paint(&painter);
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
