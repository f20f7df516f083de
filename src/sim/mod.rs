pub mod arena;
pub mod collision;
pub mod event;
pub mod integrator;
pub mod registry;

pub use arena::{Arena, Handle};
pub use collision::detect_collisions;
pub use event::{EventKind, SimEvent, Stats};
pub use integrator::leapfrog_step;
pub use registry::Simulator;
