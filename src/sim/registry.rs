use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::arena::{Arena, Handle};
use super::collision::detect_collisions;
use super::event::{EventKind, SimEvent, Stats};
use crate::dynamics::state::{normalize_angle, SimConfig};
use crate::error::SimError;
use crate::input::{InputProvider, InputSnapshot};
use crate::render::Canvas;
use crate::satellite::{Factory, Lifecycle, Satellite};

// ---------------------------------------------------------------------------
// Simulator: owns every satellite and sequences the frame
// ---------------------------------------------------------------------------

/// The simulation registry.
///
/// Each [`tick`](Simulator::tick) runs input, move, collision, and
/// destruction passes in that order; [`render`](Simulator::render) is the
/// read-only draw pass. Satellites created mid-pass wait in a pending buffer
/// and join the arena once the pass is over.
pub struct Simulator {
    config: SimConfig,
    factory: Factory,
    satellites: Arena<Satellite>,
    pending: Vec<Satellite>,
    rng: SmallRng,
    frame: u64,
    earth_rotation: f64,
    paused: bool,
    pause_held: bool,
    quit: bool,
    events: Vec<SimEvent>,
    stats: Stats,
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    let seed = seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    });
    SmallRng::seed_from_u64(seed)
}

impl Simulator {
    /// Simulator populated with the initial fleet.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let mut sim = Self::empty(config);
        sim.populate()?;
        Ok(sim)
    }

    /// Simulator with no satellites.
    pub fn empty(config: SimConfig) -> Self {
        Self {
            factory: Factory::new(&config),
            rng: seeded_rng(config.seed),
            config,
            satellites: Arena::new(),
            pending: Vec::new(),
            frame: 0,
            earth_rotation: 0.0,
            paused: false,
            pause_held: false,
            quit: false,
            events: Vec::new(),
            stats: Stats::default(),
        }
    }

    fn populate(&mut self) -> Result<(), SimError> {
        let fleet = self.factory.initial_fleet(&mut self.rng)?;
        info!(satellites = fleet.len(), "initial fleet launched");
        for s in fleet {
            self.satellites.insert(s);
        }
        Ok(())
    }

    // -- accessors ----------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn earth_rotation(&self) -> f64 {
        self.earth_rotation
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn get(&self, handle: Handle) -> Option<&Satellite> {
        self.satellites.get(handle)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.satellites.contains(handle)
    }

    pub fn handles(&self) -> Vec<Handle> {
        self.satellites.handles()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Satellite)> {
        self.satellites.iter()
    }

    /// Events recorded during the most recent tick.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Add a satellite directly. Used by scenarios and tests.
    pub fn insert(&mut self, satellite: Satellite) -> Handle {
        self.satellites.insert(satellite)
    }

    // -- frame --------------------------------------------------------------

    /// Poll `input` and run one frame.
    pub fn step(&mut self, input: &mut dyn InputProvider) -> Result<(), SimError> {
        let snapshot = input.poll();
        self.tick(&snapshot)
    }

    /// Run one frame: input, move, collision, destruction.
    pub fn tick(&mut self, input: &InputSnapshot) -> Result<(), SimError> {
        self.events.clear();

        if input.quit && !self.quit {
            info!(frame = self.frame, "quit requested");
            self.quit = true;
        }
        if input.pause && !self.pause_held {
            self.paused = !self.paused;
            self.emit(EventKind::Paused(self.paused));
        }
        self.pause_held = input.pause;

        if input.reset {
            return self.reset();
        }
        if self.paused {
            return Ok(());
        }

        self.frame += 1;
        self.input_pass(input);
        self.move_pass();
        self.collision_pass();
        self.destruction_pass()?;
        Ok(())
    }

    /// Throw away every satellite and relaunch the initial fleet.
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.satellites.clear();
        self.pending.clear();
        self.frame = 0;
        self.earth_rotation = 0.0;
        self.emit(EventKind::Reset);
        self.populate()
    }

    /// Draw the current state: satellites first, Earth on top.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        for s in self.satellites.values() {
            canvas.draw_satellite(&s.sprite());
        }
        canvas.draw_earth(nalgebra::Vector2::zeros(), self.earth_rotation);
    }

    // -- passes -------------------------------------------------------------

    fn input_pass(&mut self, input: &InputSnapshot) {
        let mpp = self.config.meters_per_pixel;
        let mut fired = Vec::new();
        for (handle, s) in self.satellites.iter_mut() {
            if let Some(shot) = s.react(input, mpp) {
                self.pending.push(shot);
                fired.push(handle);
            }
        }
        for ship in fired {
            self.emit(EventKind::Fired { ship });
        }
        self.merge_pending();
    }

    fn move_pass(&mut self) {
        let dt = self.config.dt();
        let mut changes = Vec::new();
        for (handle, s) in self.satellites.iter_mut() {
            if s.is_dead() {
                continue;
            }
            match s.advance(dt, &mut self.rng) {
                Lifecycle::Steady => {}
                Lifecycle::WentDefunct => changes.push(EventKind::Defunct { handle, kind: s.kind() }),
                Lifecycle::Expired => changes.push(EventKind::Expired { handle, kind: s.kind() }),
            }
        }
        for change in changes {
            self.emit(change);
        }
        self.earth_rotation = normalize_angle(self.earth_rotation + self.config.earth_spin());
    }

    fn collision_pass(&mut self) {
        for (a, b) in detect_collisions(&mut self.satellites) {
            self.emit(EventKind::Collision { a, b });
        }
    }

    /// Every dead satellite leaves the arena this frame, even when one of
    /// the cascades fails; the first failure is reported afterwards.
    fn destruction_pass(&mut self) -> Result<(), SimError> {
        let mut failure = None;
        for handle in self.satellites.handles() {
            let cascade = match self.satellites.get(handle) {
                Some(s) if s.is_dead() => s.destroy(&self.factory, &mut self.rng),
                _ => continue,
            };
            let Some(s) = self.satellites.remove(handle) else {
                continue;
            };
            match cascade {
                Ok(children) => {
                    self.emit(EventKind::Destroyed { kind: s.kind(), children: children.len() });
                    self.pending.extend(children);
                }
                Err(e) => {
                    warn!(frame = self.frame, kind = %s.kind(), error = %e, "cascade failed");
                    failure.get_or_insert(e);
                }
            }
        }
        self.merge_pending();
        failure.map_or(Ok(()), Err)
    }

    fn merge_pending(&mut self) {
        for s in self.pending.drain(..) {
            self.satellites.insert(s);
        }
    }

    fn emit(&mut self, kind: EventKind) {
        match &kind {
            EventKind::Collision { a, b } => info!(frame = self.frame, %a, %b, "collision"),
            EventKind::Destroyed { kind, children } => {
                debug!(frame = self.frame, kind = %kind, children, "destroyed")
            }
            EventKind::Defunct { handle, kind } => {
                info!(frame = self.frame, %handle, kind = %kind, "satellite went defunct")
            }
            EventKind::Expired { handle, kind } => {
                debug!(frame = self.frame, %handle, kind = %kind, "expired")
            }
            EventKind::Fired { ship } => debug!(frame = self.frame, %ship, "fired"),
            EventKind::Paused(paused) => info!(frame = self.frame, paused, "pause toggled"),
            EventKind::Reset => info!("simulation reset"),
        }
        self.stats.record(&kind);
        self.events.push(SimEvent { frame: self.frame, kind });
    }
}
