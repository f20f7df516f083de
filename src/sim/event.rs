use super::arena::Handle;
use crate::satellite::SatelliteKind;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Fired { ship: Handle },
    Defunct { handle: Handle, kind: SatelliteKind },
    Expired { handle: Handle, kind: SatelliteKind },
    Collision { a: Handle, b: Handle },
    Destroyed { kind: SatelliteKind, children: usize },
    Paused(bool),
    Reset,
}

/// A discrete event that occurred during a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    pub frame: u64,
    pub kind: EventKind,
}

/// Running totals over the life of a simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub shots: u64,
    pub defunct: u64,
    pub expired: u64,
    pub collisions: u64,
    pub destroyed: u64,
    pub spawned: u64,
}

impl Stats {
    pub fn record(&mut self, kind: &EventKind) {
        match kind {
            EventKind::Fired { .. } => self.shots += 1,
            EventKind::Defunct { .. } => self.defunct += 1,
            EventKind::Expired { .. } => self.expired += 1,
            EventKind::Collision { .. } => self.collisions += 1,
            EventKind::Destroyed { children, .. } => {
                self.destroyed += 1;
                self.spawned += *children as u64;
            }
            EventKind::Paused(_) | EventKind::Reset => {}
        }
    }
}
