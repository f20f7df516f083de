use std::time::Duration;

use eframe::egui::{self, Color32, Key, Painter, Pos2, Stroke};
use nalgebra::Vector2;

use orbital_sim::dynamics::state::{heading_vector, EARTH_RADIUS};
use orbital_sim::input::{InputProvider, InputSnapshot};
use orbital_sim::render::{Canvas, Sprite};
use orbital_sim::satellite::{Class, SatelliteKind};
use orbital_sim::sim::Simulator;
use orbital_sim::types::SimConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = SimConfig::default();
    let sim = Simulator::new(config)?;
    let app = OrbitViz { sim, keys: Keyboard::default() };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 1000.0]),
        ..Default::default()
    };
    eframe::run_native("Orbital Simulator", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

// ---------------------------------------------------------------------------
// Keyboard input
// ---------------------------------------------------------------------------

/// Latest keyboard state, sampled once per frame from egui.
#[derive(Default)]
struct Keyboard {
    current: InputSnapshot,
}

impl Keyboard {
    fn sample(&mut self, ctx: &egui::Context) {
        self.current = ctx.input(|i| InputSnapshot {
            left: i.key_down(Key::ArrowLeft),
            right: i.key_down(Key::ArrowRight),
            thrust: i.key_down(Key::ArrowUp),
            fire: i.key_down(Key::Space),
            pause: i.key_down(Key::P),
            reset: i.key_pressed(Key::R),
            quit: i.key_pressed(Key::Escape) || i.key_pressed(Key::Q),
        });
    }
}

impl InputProvider for Keyboard {
    fn poll(&mut self) -> InputSnapshot {
        self.current
    }

    fn name(&self) -> &str {
        "keyboard"
    }
}

// ---------------------------------------------------------------------------
// egui canvas
// ---------------------------------------------------------------------------

struct PainterCanvas<'a> {
    painter: &'a Painter,
    center: Pos2,
    meters_per_pixel: f64,
    zoom: f32, // window pixels per world pixel
}

impl PainterCanvas<'_> {
    fn to_screen(&self, pos: Vector2<f64>) -> Pos2 {
        let px = pos / self.meters_per_pixel;
        Pos2::new(
            self.center.x + px.x as f32 * self.zoom,
            self.center.y - px.y as f32 * self.zoom,
        )
    }

    fn color(sprite: &Sprite) -> Color32 {
        if sprite.kind == SatelliteKind::Ship {
            return Color32::from_rgb(120, 200, 255);
        }
        match (sprite.kind.class(), sprite.defunct) {
            (Class::Projectile, _) => Color32::WHITE,
            (Class::Fragment, _) => Color32::GRAY,
            (Class::Whole, true) => Color32::from_rgb(200, 90, 60),
            (Class::Part, _) => Color32::from_rgb(200, 170, 90),
            _ => Color32::from_rgb(230, 230, 120),
        }
    }
}

impl Canvas for PainterCanvas<'_> {
    fn draw_earth(&mut self, pos: Vector2<f64>, rotation: f64) {
        let center = self.to_screen(pos);
        let radius = (EARTH_RADIUS / self.meters_per_pixel) as f32 * self.zoom;
        self.painter.circle_filled(center, radius, Color32::from_rgb(30, 80, 160));
        // meridian marker so the rotation is visible
        let tip = heading_vector(rotation) * EARTH_RADIUS + pos;
        self.painter
            .line_segment([center, self.to_screen(tip)], Stroke::new(1.5, Color32::from_rgb(60, 160, 80)));
    }

    fn draw_satellite(&mut self, sprite: &Sprite) {
        let center = self.to_screen(sprite.pos);
        let radius = (sprite.kind.radius_px() as f32 * self.zoom).max(1.0);
        let color = Self::color(sprite);
        self.painter.circle_filled(center, radius, color);

        let nose = sprite.pos + heading_vector(sprite.angle) * (2.0 * sprite.kind.radius_px() * self.meters_per_pixel);
        self.painter.line_segment([center, self.to_screen(nose)], Stroke::new(1.0, color));

        if sprite.thrust {
            let tail = sprite.pos - heading_vector(sprite.angle) * (3.0 * sprite.kind.radius_px() * self.meters_per_pixel);
            self.painter
                .line_segment([center, self.to_screen(tail)], Stroke::new(2.0, Color32::from_rgb(255, 140, 0)));
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

struct OrbitViz {
    sim: Simulator,
    keys: Keyboard,
}

impl eframe::App for OrbitViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.keys.sample(ctx);
        if let Err(e) = self.sim.step(&mut self.keys) {
            tracing::error!(%e, "simulation step failed");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if self.sim.quit_requested() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let stats = self.sim.stats();
            ui.label(format!(
                "Frame {}  |  Satellites: {}  |  Collisions: {}  |  Destroyed: {}{}",
                self.sim.frame(),
                self.sim.len(),
                stats.collisions,
                stats.destroyed,
                if self.sim.is_paused() { "  |  PAUSED" } else { "" },
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.max_rect();
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 0.0, Color32::BLACK);

            let bounds = self.sim.config().bounds;
            let zoom = (rect.width() / bounds.width_px as f32).min(rect.height() / bounds.height_px as f32);
            let mut canvas = PainterCanvas {
                painter: &painter,
                center: rect.center(),
                meters_per_pixel: self.sim.config().meters_per_pixel,
                zoom,
            };
            self.sim.render(&mut canvas);
        });

        let frame_time = 1.0 / self.sim.config().frame_rate;
        ctx.request_repaint_after(Duration::from_secs_f64(frame_time));
    }
}
