use std::fmt;
use std::str::FromStr;

use crate::error::SimError;

// ---------------------------------------------------------------------------
// Satellite type tags
// ---------------------------------------------------------------------------

/// Every concrete satellite type the factory knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SatelliteKind {
    Ship,
    Gps,
    GpsCenter,
    GpsLeft,
    GpsRight,
    Hubble,
    HubbleTelescope,
    HubbleComputer,
    HubbleLeft,
    HubbleRight,
    Sputnik,
    Dragon,
    DragonCenter,
    DragonLeft,
    DragonRight,
    Starlink,
    StarlinkBody,
    StarlinkArray,
    Fragment,
    Projectile,
}

/// Behavioural family a kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Ship,
    Whole,
    Part,
    Fragment,
    Projectile,
}

use SatelliteKind::*;

impl SatelliteKind {
    pub const ALL: [SatelliteKind; 20] = [
        Ship, Gps, GpsCenter, GpsLeft, GpsRight,
        Hubble, HubbleTelescope, HubbleComputer, HubbleLeft, HubbleRight,
        Sputnik, Dragon, DragonCenter, DragonLeft, DragonRight,
        Starlink, StarlinkBody, StarlinkArray, Fragment, Projectile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Ship => "ship",
            Gps => "gps",
            GpsCenter => "gps-center",
            GpsLeft => "gps-left",
            GpsRight => "gps-right",
            Hubble => "hubble",
            HubbleTelescope => "hubble-telescope",
            HubbleComputer => "hubble-computer",
            HubbleLeft => "hubble-left",
            HubbleRight => "hubble-right",
            Sputnik => "sputnik",
            Dragon => "dragon",
            DragonCenter => "dragon-center",
            DragonLeft => "dragon-left",
            DragonRight => "dragon-right",
            Starlink => "starlink",
            StarlinkBody => "starlink-body",
            StarlinkArray => "starlink-array",
            Fragment => "fragment",
            Projectile => "projectile",
        }
    }

    pub fn class(self) -> Class {
        match self {
            Ship => Class::Ship,
            Gps | Hubble | Sputnik | Dragon | Starlink => Class::Whole,
            Fragment => Class::Fragment,
            Projectile => Class::Projectile,
            _ => Class::Part,
        }
    }

    /// Collision radius in pixels; scaled to meters by the configured zoom.
    pub fn radius_px(self) -> f64 {
        match self {
            Ship => 6.0,
            Gps => 12.0,
            GpsCenter => 7.0,
            GpsLeft | GpsRight => 8.0,
            Hubble | HubbleTelescope => 10.0,
            HubbleComputer => 7.0,
            HubbleLeft | HubbleRight => 8.0,
            Sputnik => 4.0,
            Dragon => 7.0,
            DragonCenter | DragonLeft | DragonRight => 6.0,
            Starlink => 6.0,
            StarlinkBody => 2.0,
            StarlinkArray => 4.0,
            Fragment => 2.0,
            Projectile => 1.0,
        }
    }

    /// What this kind breaks into: (child kind, kick heading in degrees).
    pub fn cascade(self) -> &'static [(SatelliteKind, f64)] {
        match self {
            Ship | Sputnik | DragonCenter => &[
                (Fragment, 0.0),
                (Fragment, 90.0),
                (Fragment, 180.0),
                (Fragment, 270.0),
            ],
            Gps => &[
                (GpsCenter, 0.0),
                (GpsLeft, 90.0),
                (GpsRight, 270.0),
                (Fragment, 135.0),
                (Fragment, 225.0),
            ],
            Hubble => &[
                (HubbleTelescope, 0.0),
                (HubbleComputer, 90.0),
                (HubbleLeft, 180.0),
                (HubbleRight, 270.0),
            ],
            Dragon => &[
                (DragonCenter, 90.0),
                (DragonLeft, 0.0),
                (DragonRight, 180.0),
                (Fragment, 330.0),
                (Fragment, 250.0),
            ],
            Starlink => &[
                (StarlinkBody, 0.0),
                (StarlinkArray, 180.0),
                (Fragment, 90.0),
                (Fragment, 270.0),
            ],
            GpsCenter | HubbleTelescope | StarlinkBody | StarlinkArray => {
                &[(Fragment, 0.0), (Fragment, 120.0), (Fragment, 240.0)]
            }
            GpsLeft | GpsRight | HubbleComputer | HubbleLeft | HubbleRight | DragonLeft => {
                &[(Fragment, 0.0), (Fragment, 180.0)]
            }
            DragonRight => &[(Fragment, 90.0), (Fragment, 270.0)],
            Fragment | Projectile => &[],
        }
    }
}

impl fmt::Display for SatelliteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SatelliteKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase().replace('_', "-");
        SatelliteKind::ALL
            .into_iter()
            .find(|k| k.name() == tag)
            .ok_or_else(|| SimError::InvalidVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_parse() {
        for kind in SatelliteKind::ALL {
            assert_eq!(kind.name().parse::<SatelliteKind>(), Ok(kind));
        }
        assert_eq!("GPS_Center".parse::<SatelliteKind>(), Ok(GpsCenter));
    }

    #[test]
    fn unknown_tag_is_invalid_variant() {
        let err = "death-star".parse::<SatelliteKind>().unwrap_err();
        assert_eq!(err, SimError::InvalidVariant("death-star".into()));
    }

    #[test]
    fn terminal_kinds_have_no_cascade() {
        assert!(Fragment.cascade().is_empty());
        assert!(Projectile.cascade().is_empty());
    }

    #[test]
    fn parts_only_shed_fragments() {
        for kind in SatelliteKind::ALL.into_iter().filter(|k| k.class() == Class::Part) {
            let cascade = kind.cascade();
            assert!((1..=4).contains(&cascade.len()), "{kind} sheds {}", cascade.len());
            assert!(cascade.iter().all(|(child, _)| *child == Fragment));
        }
    }

    #[test]
    fn ship_breaks_into_four_quadrants() {
        let headings: Vec<f64> = Ship.cascade().iter().map(|(_, h)| *h).collect();
        assert_eq!(headings, vec![0.0, 90.0, 180.0, 270.0]);
    }
}
