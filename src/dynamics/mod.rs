pub mod state;

pub use state::{heading_vector, normalize_angle, unit_or_zero, Kinematics, SimConfig, WorldBounds};
