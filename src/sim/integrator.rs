use crate::dynamics::state::{normalize_angle, Kinematics};
use crate::physics::gravity;

// ---------------------------------------------------------------------------
// Kick-drift-kick leapfrog
// ---------------------------------------------------------------------------

/// Advance one frame of `dt` seconds under gravity.
///
/// Velocity takes half a kick at the old position, the position drifts a full
/// step, then velocity takes the second half kick at the new position. The
/// facing angle advances by the spin once per frame regardless of `dt`.
pub fn leapfrog_step(kin: &mut Kinematics, dt: f64) {
    let half = dt * 0.5;
    kin.vel += gravity(&kin.pos) * half;
    kin.pos += kin.vel * dt;
    kin.vel += gravity(&kin.pos) * half;
    kin.angle = normalize_angle(kin.angle + kin.spin);
}
