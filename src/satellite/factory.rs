use rand::Rng;

use super::entity::{kicked, Satellite};
use super::kind::{Class, SatelliteKind};
use crate::dynamics::state::{Kinematics, SimConfig, WorldBounds};
use crate::error::SimError;

// ---------------------------------------------------------------------------
// Factory: (type tag, parent state, spawn angle) -> Satellite
// ---------------------------------------------------------------------------

/// Builds satellites at the configured scale.
#[derive(Debug, Clone)]
pub struct Factory {
    meters_per_pixel: f64,
    bounds: WorldBounds,
    defunct_chance: u32,
}

impl Factory {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            meters_per_pixel: config.meters_per_pixel,
            bounds: config.bounds,
            defunct_chance: config.defunct_chance,
        }
    }

    pub fn meters_per_pixel(&self) -> f64 {
        self.meters_per_pixel
    }

    fn radius(&self, kind: SatelliteKind) -> f64 {
        kind.radius_px() * self.meters_per_pixel
    }

    /// Build one satellite.
    ///
    /// Top-level craft ignore `parent` and start from their preset orbit; GPS
    /// uses `angle` as its orbital phase. Parts and fragments start from
    /// `parent` kicked along `angle`. Projectiles need an explicit offset and
    /// impulse, so asking for one here is an error.
    pub fn build<R: Rng + ?Sized>(
        &self,
        kind: SatelliteKind,
        parent: &Kinematics,
        angle: f64,
        rng: &mut R,
    ) -> Result<Satellite, SimError> {
        let radius = self.radius(kind);
        let sat = match kind.class() {
            Class::Ship => {
                let kin = presets::ship(&self.bounds, self.meters_per_pixel);
                Satellite::ship(kin, radius, self.defunct_chance)
            }
            Class::Whole => {
                let kin = presets::orbit(kind, angle)
                    .ok_or_else(|| SimError::InvalidVariant(kind.name().to_string()))?;
                Satellite::whole(kind, kin, radius, self.defunct_chance)
            }
            Class::Part => Satellite::part(kind, kicked(parent, angle, self.meters_per_pixel, rng), radius),
            Class::Fragment => {
                Satellite::fragment(kicked(parent, angle, self.meters_per_pixel, rng), radius, rng)
            }
            Class::Projectile => return Err(SimError::InvalidVariant(kind.name().to_string())),
        };
        Ok(sat)
    }

    /// Build from a textual type tag.
    pub fn build_tag<R: Rng + ?Sized>(
        &self,
        tag: &str,
        parent: &Kinematics,
        angle: f64,
        rng: &mut R,
    ) -> Result<Satellite, SimError> {
        let kind: SatelliteKind = tag.parse()?;
        self.build(kind, parent, angle, rng)
    }

    /// The starting scenario: the player ship, six GPS at even phases,
    /// Sputnik, Hubble, a Crew Dragon, and a Starlink.
    pub fn initial_fleet<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Satellite>, SimError> {
        let origin = Kinematics::default();
        let mut fleet = vec![self.build(SatelliteKind::Ship, &origin, 0.0, rng)?];
        for i in 0..presets::GPS_COUNT {
            let phase = (i as f64 * 360.0 / presets::GPS_COUNT as f64).to_radians();
            fleet.push(self.build(SatelliteKind::Gps, &origin, phase, rng)?);
        }
        for kind in [
            SatelliteKind::Sputnik,
            SatelliteKind::Hubble,
            SatelliteKind::Dragon,
            SatelliteKind::Starlink,
        ] {
            fleet.push(self.build(kind, &origin, 0.0, rng)?);
        }
        Ok(fleet)
    }
}

// ---------------------------------------------------------------------------
// Preset starting states
// ---------------------------------------------------------------------------

pub mod presets {
    use nalgebra::Vector2;

    use crate::dynamics::state::{heading_vector, Kinematics, WorldBounds};
    use crate::satellite::SatelliteKind;

    pub const GPS_COUNT: usize = 6;
    pub const GPS_ORBIT_RADIUS: f64 = 26_560_000.0; // m
    pub const GPS_SPEED: f64 = 3_880.0; // m/s

    /// Player ship: upper-left of the play field, falling.
    pub fn ship(bounds: &WorldBounds, meters_per_pixel: f64) -> Kinematics {
        let pos = Vector2::new(-0.45 * bounds.width_px, 0.45 * bounds.height_px) * meters_per_pixel;
        Kinematics::new(pos, Vector2::new(0.0, -2_000.0))
    }

    /// GPS at orbital phase `phase` (heading of its position), moving
    /// counter-clockwise.
    pub fn gps(phase: f64) -> Kinematics {
        let radial = heading_vector(phase);
        let prograde = Vector2::new(-radial.y, radial.x);
        Kinematics::new(radial * GPS_ORBIT_RADIUS, prograde * GPS_SPEED)
    }

    /// Starting orbit for a top-level kind; None for kinds that only exist
    /// as debris of something else.
    pub fn orbit(kind: SatelliteKind, angle: f64) -> Option<Kinematics> {
        let (pos, vel) = match kind {
            SatelliteKind::Gps => return Some(gps(angle)),
            SatelliteKind::Sputnik => ((-36_515_095.13, 21_082_000.0), (2_050.0, 2_684.68)),
            SatelliteKind::Hubble => ((0.0, -42_164_000.0), (3_100.0, 0.0)),
            SatelliteKind::Dragon => ((0.0, 8_000_000.0), (-7_900.0, 0.0)),
            SatelliteKind::Starlink => ((0.0, -13_020_000.0), (5_800.0, 0.0)),
            _ => return None,
        };
        Some(Kinematics::new(Vector2::new(pos.0, pos.1), Vector2::new(vel.0, vel.1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::heading_vector;
    use nalgebra::Vector2;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn setup() -> (Factory, SmallRng) {
        (Factory::new(&SimConfig::default()), SmallRng::seed_from_u64(11))
    }

    #[test]
    fn initial_fleet_composition() {
        let (factory, mut rng) = setup();
        let fleet = factory.initial_fleet(&mut rng).unwrap();
        let mut counts = BTreeMap::new();
        for s in &fleet {
            *counts.entry(s.kind()).or_insert(0) += 1;
        }
        assert_eq!(fleet.len(), 11);
        assert_eq!(counts[&SatelliteKind::Ship], 1);
        assert_eq!(counts[&SatelliteKind::Gps], 6);
        assert_eq!(counts[&SatelliteKind::Sputnik], 1);
        assert_eq!(counts[&SatelliteKind::Hubble], 1);
        assert_eq!(counts[&SatelliteKind::Dragon], 1);
        assert_eq!(counts[&SatelliteKind::Starlink], 1);
        assert!(fleet.iter().all(|s| s.age() == 0 && !s.is_dead()));
    }

    #[test]
    fn gps_phases_are_evenly_spaced() {
        let (factory, mut rng) = setup();
        let fleet = factory.initial_fleet(&mut rng).unwrap();
        let gps: Vec<_> = fleet.iter().filter(|s| s.kind() == SatelliteKind::Gps).collect();
        for (i, s) in gps.iter().enumerate() {
            let expected = heading_vector((i as f64 * 60.0).to_radians()) * presets::GPS_ORBIT_RADIUS;
            assert!((s.pos() - expected).norm() < 1e-3, "gps {i} at {:?}", s.pos());
            assert!(s.pos().dot(&s.vel()).abs() < 1e-3, "gps {i} velocity should be tangential");
        }
        // first GPS matches the classic (0, r) / (-v, 0) placement
        assert!((gps[0].vel() - Vector2::new(-presets::GPS_SPEED, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn ship_starts_upper_left() {
        let (factory, mut rng) = setup();
        let ship = factory
            .build(SatelliteKind::Ship, &Kinematics::default(), 0.0, &mut rng)
            .unwrap();
        let px = ship.pos() / factory.meters_per_pixel();
        assert!((px - Vector2::new(-450.0, 450.0)).norm() < 1e-9);
        assert!((ship.radius() - 6.0 * 128_000.0).abs() < 1e-6);
    }

    #[test]
    fn projectile_tag_is_rejected() {
        let (factory, mut rng) = setup();
        let err = factory
            .build(SatelliteKind::Projectile, &Kinematics::default(), 0.0, &mut rng)
            .unwrap_err();
        assert_eq!(err, SimError::InvalidVariant("projectile".into()));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let (factory, mut rng) = setup();
        let result = factory.build_tag("tie-fighter", &Kinematics::default(), 0.0, &mut rng);
        assert!(matches!(result, Err(SimError::InvalidVariant(tag)) if tag == "tie-fighter"));
    }

    #[test]
    fn parts_inherit_parent_motion() {
        let (factory, mut rng) = setup();
        let parent = Kinematics::new(Vector2::new(0.0, 8.0e6), Vector2::new(-7900.0, 0.0));
        let part = factory
            .build_tag("dragon-left", &parent, 0.0, &mut rng)
            .unwrap();
        assert_eq!(part.age(), 0);
        assert!(part.is_defunct());
        let dv = part.vel() - parent.vel;
        assert!(dv.x.abs() < 1e-9 && dv.y > 0.0, "kick at heading 0 points up, got {dv:?}");
    }

    #[test]
    fn every_cascade_builds() {
        let (factory, mut rng) = setup();
        let fleet = factory.initial_fleet(&mut rng).unwrap();
        let mut frontier = fleet;
        let mut fragments = 0;
        while let Some(s) = frontier.pop() {
            let children = s.destroy(&factory, &mut rng).unwrap();
            fragments += children.iter().filter(|c| c.kind() == SatelliteKind::Fragment).count();
            frontier.extend(children);
        }
        assert!(fragments > 50);
    }
}
