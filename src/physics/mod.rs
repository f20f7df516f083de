pub mod gravity;

pub use gravity::{altitude, circular_speed, gravity};
