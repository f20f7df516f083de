pub mod dynamics;
pub mod physics;
pub mod satellite;
pub mod sim;
pub mod input;
pub mod render;
pub mod io;
mod error;

pub use error::SimError;

// Flat re-exports of the types most callers need
pub mod types {
    pub use crate::dynamics::state::{Kinematics, SimConfig, WorldBounds, EARTH_RADIUS, G0};
    pub use crate::input::{InputProvider, InputSnapshot, ScriptedInput};
    pub use crate::render::{Canvas, DrawList, Sprite};
    pub use crate::satellite::{Factory, Satellite, SatelliteKind};
    pub use crate::sim::{Handle, Simulator};
}
