pub mod entity;
pub mod factory;
pub mod kind;

pub use entity::{Lifecycle, Role, Satellite, DEBRIS_LIFETIME, DEFUNCT_SPIN, VISIBILITY_AGE};
pub use factory::{presets, Factory};
pub use kind::{Class, SatelliteKind};
