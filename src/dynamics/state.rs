use std::f64::consts::TAU;

use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665; // surface gravity, m/s^2
pub const EARTH_RADIUS: f64 = 6_378_000.0; // reference radius, m
pub const SECONDS_PER_DAY: f64 = 86_400.0;

// ---------------------------------------------------------------------------
// Headings
// ---------------------------------------------------------------------------
//
// Headings are radians measured clockwise from screen-up (+y), so a heading
// of 0 points at (0, 1) and a heading of pi/2 points at (1, 0).

/// Unit vector for a heading.
pub fn heading_vector(heading: f64) -> Vector2<f64> {
    Vector2::new(heading.sin(), heading.cos())
}

/// Wrap an angle into [0, 2pi).
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can return TAU itself for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit vector along `v`, or zero when `v` has no usable length.
pub fn unit_or_zero(v: &Vector2<f64>) -> Vector2<f64> {
    let n = v.norm();
    if n > 1e-9 {
        v / n
    } else {
        Vector2::zeros()
    }
}

// ---------------------------------------------------------------------------
// Kinematic state shared by every satellite
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub pos: Vector2<f64>, // m, Earth-centred
    pub vel: Vector2<f64>, // m/s
    pub angle: f64,        // rad, facing heading
    pub spin: f64,         // rad/frame
}

impl Default for Kinematics {
    fn default() -> Self {
        Self {
            pos: Vector2::zeros(),
            vel: Vector2::zeros(),
            angle: 0.0,
            spin: 0.0,
        }
    }
}

impl Kinematics {
    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>) -> Self {
        Self { pos, vel, ..Default::default() }
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Distance from Earth's centre, m.
    pub fn radius(&self) -> f64 {
        self.pos.norm()
    }

    /// Flight path angle (rad): angle between velocity and local horizontal.
    /// Zero when stationary or sitting at the origin.
    pub fn flight_path_angle(&self) -> f64 {
        let radial = unit_or_zero(&self.pos);
        let dir = unit_or_zero(&self.vel);
        radial.dot(&dir).clamp(-1.0, 1.0).asin()
    }

    /// Add an impulse of `magnitude` m/s along `heading`.
    pub fn kick(&mut self, heading: f64, magnitude: f64) {
        self.vel += heading_vector(heading) * magnitude;
    }
}

// ---------------------------------------------------------------------------
// World geometry and scale
// ---------------------------------------------------------------------------

/// Play-field extents in pixels, centred on Earth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self { width_px: 1000.0, height_px: 1000.0 }
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub frame_rate: f64,       // frames per wall-clock second
    pub time_dilation: f64,    // simulated seconds per wall-clock second
    pub meters_per_pixel: f64, // drawing scale; also sizes collision radii
    pub bounds: WorldBounds,
    pub defunct_chance: u32, // 1-in-N chance per frame for a whole satellite to fail
    pub seed: Option<u64>,   // None = seed from the clock
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            time_dilation: 24.0 * 60.0, // one simulated day per real minute
            meters_per_pixel: 128_000.0,
            bounds: WorldBounds::default(),
            defunct_chance: 4000,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Simulated seconds per frame.
    pub fn dt(&self) -> f64 {
        self.time_dilation / self.frame_rate
    }

    /// Earth rotation per frame (rad). Negative: counter-clockwise on screen.
    pub fn earth_spin(&self) -> f64 {
        (-TAU / self.frame_rate) * (self.time_dilation / SECONDS_PER_DAY)
    }
}
