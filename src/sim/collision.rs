use super::arena::{Arena, Handle};
use crate::satellite::Satellite;

/// True when the two bodies overlap: centre distance strictly less than the
/// sum of radii.
pub fn overlaps(a: &Satellite, b: &Satellite) -> bool {
    (a.pos() - b.pos()).norm() < a.radius() + b.radius()
}

fn eligible(s: &Satellite) -> bool {
    !s.is_dead() && s.is_visible()
}

/// Test every unordered pair of live, visible satellites once and kill both
/// members of each overlapping pair. A satellite killed earlier in the scan is
/// skipped for the rest of it. Returns the colliding pairs in scan order.
///
/// Quadratic in the number of satellites.
pub fn detect_collisions(satellites: &mut Arena<Satellite>) -> Vec<(Handle, Handle)> {
    let candidates: Vec<Handle> = satellites
        .iter()
        .filter(|(_, s)| eligible(s))
        .map(|(h, _)| h)
        .collect();

    let mut hits = Vec::new();
    for (i, &a) in candidates.iter().enumerate() {
        for &b in &candidates[i + 1..] {
            let hit = match (satellites.get(a), satellites.get(b)) {
                (Some(sa), Some(sb)) => eligible(sa) && eligible(sb) && overlaps(sa, sb),
                _ => false,
            };
            if !hit {
                continue;
            }
            for h in [a, b] {
                if let Some(s) = satellites.get_mut(h) {
                    s.kill();
                }
            }
            hits.push((a, b));
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::Kinematics;
    use crate::satellite::{SatelliteKind, VISIBILITY_AGE};
    use nalgebra::Vector2;

    fn body(x: f64, radius: f64, age: u32) -> Satellite {
        let kin = Kinematics::new(Vector2::new(x, 3.0e7), Vector2::zeros());
        Satellite::part(SatelliteKind::GpsCenter, kin, radius).with_age(age)
    }

    #[test]
    fn just_inside_sum_of_radii_collides() {
        let (r1, r2) = (300.0, 500.0);
        let eps = 1e-3;
        let mut arena = Arena::new();
        let a = arena.insert(body(0.0, r1, 20));
        let b = arena.insert(body(r1 + r2 - eps, r2, 20));
        assert_eq!(detect_collisions(&mut arena), vec![(a, b)]);
        assert!(arena.get(a).unwrap().is_dead());
        assert!(arena.get(b).unwrap().is_dead());
    }

    #[test]
    fn touching_exactly_does_not_collide() {
        let (r1, r2) = (256.0, 512.0);
        let mut arena = Arena::new();
        let a = arena.insert(body(0.0, r1, 20));
        let b = arena.insert(body(r1 + r2, r2, 20));
        assert!(detect_collisions(&mut arena).is_empty());
        assert!(!arena.get(a).unwrap().is_dead());
        assert!(!arena.get(b).unwrap().is_dead());
    }

    #[test]
    fn young_satellites_are_immune() {
        for age in 0..VISIBILITY_AGE {
            let mut arena = Arena::new();
            let young = arena.insert(body(0.0, 1_000.0, age));
            let old = arena.insert(body(0.0, 1_000.0, 50));
            assert!(detect_collisions(&mut arena).is_empty(), "age {age}");
            assert!(!arena.get(young).unwrap().is_dead());
            assert!(!arena.get(old).unwrap().is_dead());
        }
    }

    #[test]
    fn killed_satellite_does_not_take_a_third() {
        let mut arena = Arena::new();
        let a = arena.insert(body(0.0, 1_000.0, 20));
        let b = arena.insert(body(10.0, 1_000.0, 20));
        let c = arena.insert(body(20.0, 1_000.0, 20));
        let hits = detect_collisions(&mut arena);
        assert_eq!(hits, vec![(a, b)]);
        assert!(!arena.get(c).unwrap().is_dead());
    }

    #[test]
    fn dead_satellites_are_skipped() {
        let mut arena = Arena::new();
        let mut expired = body(0.0, 1_000.0, 200);
        expired.kill();
        arena.insert(expired);
        let live = arena.insert(body(0.0, 1_000.0, 20));
        assert!(detect_collisions(&mut arena).is_empty());
        assert!(!arena.get(live).unwrap().is_dead());
    }
}
