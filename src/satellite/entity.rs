use nalgebra::Vector2;
use rand::Rng;

use super::factory::Factory;
use super::kind::{Class, SatelliteKind};
use crate::dynamics::state::{heading_vector, normalize_angle, Kinematics};
use crate::error::SimError;
use crate::input::InputSnapshot;
use crate::render::Sprite;
use crate::sim::integrator::leapfrog_step;

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

/// Frames a satellite is immune to collisions after creation.
pub const VISIBILITY_AGE: u32 = 10;
/// Fragments and projectiles die once older than this.
pub const DEBRIS_LIFETIME: u32 = 100;
/// Tumble rate of a satellite that has gone defunct, rad/frame.
pub const DEFUNCT_SPIN: f64 = -0.08;

pub const KICK_SPEED_MIN: f64 = 1_000.0; // m/s
pub const KICK_SPEED_MAX: f64 = 3_000.0; // m/s
pub const KICK_OFFSET_PX: f64 = 4.0;
pub const FRAGMENT_MAX_START_AGE: u32 = 50;

pub const SHIP_TURN: f64 = 0.1; // rad per frame held
pub const SHIP_THRUST_DV: f64 = 30.0; // m/s per frame held
pub const MUZZLE_SPEED: f64 = 9_000.0; // m/s relative to the ship
pub const MUZZLE_OFFSET_PX: f64 = 19.0;

// ---------------------------------------------------------------------------
// Variant payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Role {
    /// Autonomous craft that can fail at random.
    Whole { chance_defunct: u32, defunct: bool },
    /// The player's craft. Fails at random like a whole satellite.
    Ship { thrust: bool, chance_defunct: u32, defunct: bool },
    Part,
    Fragment,
    Projectile,
}

/// What happened to a satellite during its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Steady,
    WentDefunct,
    Expired,
}

// ---------------------------------------------------------------------------
// Satellite
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Satellite {
    kind: SatelliteKind,
    role: Role,
    kin: Kinematics,
    radius: f64, // m
    age: u32,    // frames
    dead: bool,
}

/// Parent state plus a kick of random speed along `heading`, offset a few
/// pixels the same way so siblings do not start stacked.
pub fn kicked<R: Rng + ?Sized>(
    parent: &Kinematics,
    heading: f64,
    meters_per_pixel: f64,
    rng: &mut R,
) -> Kinematics {
    let mut kin = *parent;
    let speed = rng.gen_range(KICK_SPEED_MIN..KICK_SPEED_MAX);
    kin.kick(heading, speed);
    kin.pos += heading_vector(heading) * (KICK_OFFSET_PX * meters_per_pixel);
    kin
}

impl Satellite {
    fn with_role(kind: SatelliteKind, role: Role, kin: Kinematics, radius: f64) -> Self {
        Self {
            kind,
            role,
            kin,
            radius: radius.max(0.0),
            age: 0,
            dead: false,
        }
    }

    /// A whole satellite with a 1-in-`chance_defunct` per-frame failure chance.
    pub fn whole(kind: SatelliteKind, kin: Kinematics, radius: f64, chance_defunct: u32) -> Self {
        let role = Role::Whole { chance_defunct: chance_defunct.max(1), defunct: false };
        Self::with_role(kind, role, kin, radius)
    }

    pub fn ship(kin: Kinematics, radius: f64, chance_defunct: u32) -> Self {
        let role = Role::Ship { thrust: false, chance_defunct: chance_defunct.max(1), defunct: false };
        Self::with_role(SatelliteKind::Ship, role, kin, radius)
    }

    /// A sub-assembly already carrying its spawn kick.
    pub fn part(kind: SatelliteKind, kin: Kinematics, radius: f64) -> Self {
        Self::with_role(kind, Role::Part, kin, radius)
    }

    /// Debris with a random head start on its lifetime.
    pub fn fragment<R: Rng + ?Sized>(kin: Kinematics, radius: f64, rng: &mut R) -> Self {
        let mut s = Self::with_role(SatelliteKind::Fragment, Role::Fragment, kin, radius);
        s.age = rng.gen_range(0..FRAGMENT_MAX_START_AGE);
        s
    }

    /// A shot: parent state moved by `offset` and sped up by `impulse`.
    pub fn projectile(parent: &Kinematics, offset: Vector2<f64>, impulse: Vector2<f64>, radius: f64) -> Self {
        let kin = Kinematics {
            pos: parent.pos + offset,
            vel: parent.vel + impulse,
            angle: parent.angle,
            spin: 0.0,
        };
        Self::with_role(SatelliteKind::Projectile, Role::Projectile, kin, radius)
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn kind(&self) -> SatelliteKind {
        self.kind
    }

    pub fn class(&self) -> Class {
        self.kind.class()
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kin
    }

    pub fn pos(&self) -> Vector2<f64> {
        self.kin.pos
    }

    pub fn vel(&self) -> Vector2<f64> {
        self.kin.vel
    }

    pub fn angle(&self) -> f64 {
        self.kin.angle
    }

    pub fn spin(&self) -> f64 {
        self.kin.spin
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Old enough to collide and be killed.
    pub fn is_visible(&self) -> bool {
        self.age >= VISIBILITY_AGE
    }

    pub fn is_defunct(&self) -> bool {
        match self.role {
            Role::Whole { defunct, .. } | Role::Ship { defunct, .. } => defunct,
            Role::Part | Role::Fragment | Role::Projectile => true,
        }
    }

    pub fn is_thrusting(&self) -> bool {
        matches!(self.role, Role::Ship { thrust: true, .. })
    }

    /// Mark dead. Ignored while the satellite is still invisible.
    pub fn kill(&mut self) {
        if self.is_visible() {
            self.dead = true;
        }
    }

    // -- behaviour ----------------------------------------------------------

    /// React to the frame's controls. Only a live ship responds; firing
    /// returns the new projectile for the caller to insert.
    pub fn react(&mut self, input: &InputSnapshot, meters_per_pixel: f64) -> Option<Satellite> {
        if self.dead {
            return None;
        }
        let Role::Ship { thrust, .. } = &mut self.role else {
            return None;
        };

        let mut turn = 0.0;
        if input.right {
            turn += SHIP_TURN;
        }
        if input.left {
            turn -= SHIP_TURN;
        }
        self.kin.angle = normalize_angle(self.kin.angle + turn);

        *thrust = input.thrust;
        if input.thrust {
            self.kin.kick(self.kin.angle, SHIP_THRUST_DV);
        }

        if !input.fire {
            return None;
        }
        let dir = heading_vector(self.kin.angle);
        Some(Satellite::projectile(
            &self.kin,
            dir * (MUZZLE_OFFSET_PX * meters_per_pixel),
            dir * MUZZLE_SPEED,
            SatelliteKind::Projectile.radius_px() * meters_per_pixel,
        ))
    }

    /// One frame of motion plus the per-variant aging rules.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Lifecycle {
        leapfrog_step(&mut self.kin, dt);
        self.age += 1;

        match &mut self.role {
            Role::Whole { chance_defunct, defunct } | Role::Ship { chance_defunct, defunct, .. }
                if !*defunct =>
            {
                if rng.gen_range(0..*chance_defunct) == 0 {
                    *defunct = true;
                    self.kin.spin = DEFUNCT_SPIN;
                    return Lifecycle::WentDefunct;
                }
            }
            Role::Fragment | Role::Projectile if self.age > DEBRIS_LIFETIME => {
                self.dead = true;
                return Lifecycle::Expired;
            }
            _ => {}
        }
        Lifecycle::Steady
    }

    /// Build the satellites this one breaks into.
    pub fn destroy<R: Rng + ?Sized>(&self, factory: &Factory, rng: &mut R) -> Result<Vec<Satellite>, SimError> {
        self.kind
            .cascade()
            .iter()
            .map(|&(child, degrees)| factory.build(child, &self.kin, degrees.to_radians(), rng))
            .collect()
    }

    pub fn sprite(&self) -> Sprite {
        Sprite {
            kind: self.kind,
            pos: self.kin.pos,
            angle: self.kin.angle,
            thrust: self.is_thrusting(),
            defunct: self.is_defunct(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::SimConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const SCALE: f64 = 128_000.0;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn at_rest() -> Kinematics {
        Kinematics::new(Vector2::new(0.0, 2.0e7), Vector2::zeros())
    }

    #[test]
    fn certain_failure_goes_defunct_on_first_move() {
        let mut s = Satellite::whole(SatelliteKind::Sputnik, at_rest(), 4.0 * SCALE, 1);
        assert!(!s.is_defunct());
        assert_eq!(s.advance(48.0, &mut rng()), Lifecycle::WentDefunct);
        assert!(s.is_defunct());
        assert_eq!(s.spin(), DEFUNCT_SPIN);
    }

    #[test]
    fn ship_can_fail_and_still_fly() {
        let mut ship = Satellite::ship(at_rest(), 6.0 * SCALE, 1);
        assert_eq!(ship.advance(48.0, &mut rng()), Lifecycle::WentDefunct);
        assert!(ship.is_defunct());
        assert_eq!(ship.spin(), DEFUNCT_SPIN);
        assert!(ship.sprite().defunct);

        // a failed ship keeps tumbling and never rolls again
        let mut r = rng();
        for _ in 0..5 {
            assert_eq!(ship.advance(48.0, &mut r), Lifecycle::Steady);
        }
        assert!(ship.react(&InputSnapshot::fire(), SCALE).is_some());
    }

    #[test]
    fn age_counts_frames() {
        let mut s = Satellite::whole(SatelliteKind::Hubble, at_rest(), 1.0, u32::MAX);
        let mut r = rng();
        for _ in 0..25 {
            s.advance(48.0, &mut r);
        }
        assert_eq!(s.age(), 25);
    }

    #[test]
    fn debris_expires_after_lifetime() {
        let mut r = rng();
        let mut p = Satellite::projectile(&at_rest(), Vector2::zeros(), Vector2::new(9000.0, 0.0), SCALE);
        for _ in 0..DEBRIS_LIFETIME {
            assert_eq!(p.advance(48.0, &mut r), Lifecycle::Steady);
        }
        assert!(!p.is_dead());
        assert_eq!(p.advance(48.0, &mut r), Lifecycle::Expired);
        assert!(p.is_dead());
    }

    #[test]
    fn invisible_satellites_cannot_be_killed() {
        let mut s = Satellite::part(SatelliteKind::GpsLeft, at_rest(), SCALE).with_age(VISIBILITY_AGE - 1);
        s.kill();
        assert!(!s.is_dead());
        let mut s = s.with_age(VISIBILITY_AGE);
        s.kill();
        assert!(s.is_dead());
    }

    #[test]
    fn ship_turns_and_thrusts() {
        let mut ship = Satellite::ship(at_rest(), 6.0 * SCALE, u32::MAX);
        let input = InputSnapshot { right: true, thrust: true, ..Default::default() };
        assert!(ship.react(&input, SCALE).is_none());
        assert!((ship.angle() - SHIP_TURN).abs() < 1e-12);
        assert!(ship.is_thrusting());
        assert!((ship.vel().norm() - SHIP_THRUST_DV).abs() < 1e-9);

        ship.react(&InputSnapshot::idle(), SCALE);
        assert!(!ship.is_thrusting());
    }

    #[test]
    fn ship_fires_ahead_of_itself() {
        let mut ship = Satellite::ship(at_rest(), 6.0 * SCALE, u32::MAX);
        let shot = ship.react(&InputSnapshot::fire(), SCALE).expect("fire should spawn a projectile");
        assert_eq!(shot.kind(), SatelliteKind::Projectile);
        assert_eq!(shot.age(), 0);
        assert!((shot.pos() - ship.pos() - Vector2::new(0.0, 19.0 * SCALE)).norm() < 1e-6);
        assert!((shot.vel() - Vector2::new(0.0, MUZZLE_SPEED)).norm() < 1e-9);
        assert!((shot.radius() - SCALE).abs() < 1e-9);
    }

    #[test]
    fn only_ships_react() {
        let mut s = Satellite::whole(SatelliteKind::Gps, at_rest(), SCALE, 10);
        let before = s.clone();
        assert!(s.react(&InputSnapshot { fire: true, left: true, ..Default::default() }, SCALE).is_none());
        assert_eq!(s, before);
    }

    #[test]
    fn ship_cascade_is_four_fragments() {
        let factory = Factory::new(&SimConfig::default());
        let parent = Kinematics::new(Vector2::new(1.0e7, 1.0e7), Vector2::new(-100.0, 250.0));
        let ship = Satellite::ship(parent, 6.0 * SCALE, u32::MAX);
        let children = ship.destroy(&factory, &mut rng()).unwrap();
        assert_eq!(children.len(), 4);

        for (child, degrees) in children.iter().zip([0.0_f64, 90.0, 180.0, 270.0]) {
            assert_eq!(child.kind(), SatelliteKind::Fragment);
            assert!(child.age() < FRAGMENT_MAX_START_AGE);
            assert!((child.radius() - 2.0 * SCALE).abs() < 1e-9);

            let dv = child.vel() - parent.vel;
            let expected = heading_vector(degrees.to_radians());
            assert!((dv.normalize() - expected).norm() < 1e-9, "kick heading {degrees}");
            assert!((KICK_SPEED_MIN..KICK_SPEED_MAX).contains(&dv.norm()));
            let offset = child.pos() - parent.pos;
            assert!((offset - expected * KICK_OFFSET_PX * SCALE).norm() < 1e-6);
        }
    }

    #[test]
    fn defunct_query_per_variant() {
        let kin = at_rest();
        assert!(!Satellite::ship(kin, 1.0, 5).is_defunct());
        assert!(Satellite::part(SatelliteKind::DragonLeft, kin, 1.0).is_defunct());
        assert!(Satellite::fragment(kin, 1.0, &mut rng()).is_defunct());
        assert!(!Satellite::whole(SatelliteKind::Dragon, kin, 1.0, 5).is_defunct());
    }
}
