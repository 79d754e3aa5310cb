//! Circle geometry for movement and collision
//!
//! Everything in the arena is a circle; these are the few tests the world
//! needs between circles and the arena rectangle.

use glam::Vec2;

use crate::consts::COINCIDENT_EPSILON;

/// Whether two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Unit vector from `from` toward `to`, or `fallback` when they coincide
#[inline]
pub fn direction_or(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    let delta = to - from;
    if delta.length_squared() < COINCIDENT_EPSILON * COINCIDENT_EPSILON {
        fallback
    } else {
        delta.normalize()
    }
}

/// Swept circle-versus-circle test
///
/// Moves a circle at `pos` by `movement` and checks it against a stationary
/// circle. Returns the distance travelled along `movement` before contact and
/// the contact normal (pointing from the mover toward the target).
pub fn sweep_circles(
    pos: Vec2,
    radius: f32,
    movement: Vec2,
    target: Vec2,
    target_radius: f32,
) -> Option<(f32, Vec2)> {
    let move_len = movement.length();
    if move_len < COINCIDENT_EPSILON {
        return None;
    }

    let to_target = target - pos;
    let reach = radius + target_radius;
    let gap = to_target.length() - reach;

    // Too far to reach this step
    if move_len < gap {
        return None;
    }

    // Heading away
    let heading = movement / move_len;
    let towards = heading.dot(to_target);
    if towards < 0.0 {
        return None;
    }

    // Closest approach misses the target
    let closest_sq = to_target.length_squared() - towards * towards;
    let reach_sq = reach * reach;
    if closest_sq >= reach_sq {
        return None;
    }

    let distance = towards - (reach_sq - closest_sq).sqrt();
    if move_len < distance {
        return None;
    }

    let normal = direction_or(pos, target, heading);
    Some((distance.max(0.0), normal))
}

/// Uniform point inside `min..max`; `t` holds two unit-interval samples
#[inline]
pub fn point_in_rect(min: Vec2, max: Vec2, t: Vec2) -> Vec2 {
    min + (max - min) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_hits_target_ahead() {
        let hit = sweep_circles(Vec2::ZERO, 5.0, Vec2::new(30.0, 0.0), Vec2::new(20.0, 0.0), 5.0);
        let (distance, normal) = hit.expect("should hit");
        assert!((distance - 10.0).abs() < 1e-4);
        assert!((normal - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_sweep_ignores_target_out_of_reach() {
        let hit = sweep_circles(Vec2::ZERO, 5.0, Vec2::new(5.0, 0.0), Vec2::new(40.0, 0.0), 5.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_sweep_ignores_target_behind() {
        let hit = sweep_circles(Vec2::ZERO, 5.0, Vec2::new(-30.0, 0.0), Vec2::new(12.0, 0.0), 5.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_sweep_misses_sideways_target() {
        let hit = sweep_circles(Vec2::ZERO, 5.0, Vec2::new(50.0, 0.0), Vec2::new(25.0, 15.0), 4.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_sweep_overlapping_reports_zero_distance() {
        let hit = sweep_circles(Vec2::ZERO, 10.0, Vec2::new(2.0, 0.0), Vec2::new(8.0, 0.0), 10.0);
        let (distance, _) = hit.expect("overlapping circles moving together collide");
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_sweep_coincident_uses_heading_as_normal() {
        let hit = sweep_circles(Vec2::ONE, 4.0, Vec2::new(0.0, 3.0), Vec2::ONE, 4.0);
        let (_, normal) = hit.expect("coincident circles collide");
        assert!((normal - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_overlap_excludes_touching() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }
}
