use nalgebra::Vector2;

use crate::dynamics::state::{EARTH_RADIUS, G0};

/// Height above the reference radius, m. Negative inside the Earth.
pub fn altitude(pos: &Vector2<f64>) -> f64 {
    pos.norm() - EARTH_RADIUS
}

/// Inverse-square gravity toward the origin: a = g0 (Re / (Re + h))^2.
/// Returns zero at the origin itself.
pub fn gravity(pos: &Vector2<f64>) -> Vector2<f64> {
    let r = pos.norm();
    if r < 1.0 {
        return Vector2::zeros();
    }
    let g = G0 * (EARTH_RADIUS / (EARTH_RADIUS + altitude(pos))).powi(2);
    -pos / r * g
}

/// Speed of a circular orbit at distance `r` from the centre, m/s.
pub fn circular_speed(r: f64) -> f64 {
    if r <= 0.0 {
        return 0.0;
    }
    (G0 * EARTH_RADIUS * EARTH_RADIUS / r).sqrt()
}
