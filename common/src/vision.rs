//! Field-of-view and line-of-sight queries shared by every sentry kind.

use bevy_math::Vec2;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{FOV_ANGLE_TOLERANCE_DEG, RAYCAST_MIN_STEPS, RAYCAST_PROBE_SIZE, RAYCAST_STEP_SPACING},
    protocol::Rect,
};

/// Angular cone plus reach of a sentry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionCone {
    /// Full opening angle in degrees.
    pub fov_deg: f32,
    pub range: f32,
}

/// Sampling parameters for the discretized line-of-sight test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct RaycastConfig {
    pub min_steps: u32,
    pub step_spacing: f32,
    pub probe_size: f32,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            min_steps: RAYCAST_MIN_STEPS,
            step_spacing: RAYCAST_STEP_SPACING,
            probe_size: RAYCAST_PROBE_SIZE,
        }
    }
}

/// Heading of a vector in degrees, measured from +X toward +Y.
#[must_use]
pub fn facing_deg_from(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

/// Unit vector for a heading in degrees.
#[must_use]
pub fn direction_from_deg(deg: f32) -> Vec2 {
    let rad = deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Signed difference `bearing - facing` normalized into (-180, 180].
#[must_use]
pub fn bearing_delta_deg(facing_deg: f32, bearing_deg: f32) -> f32 {
    let diff = (bearing_deg - facing_deg).rem_euclid(360.0);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

/// Walks the segment in evenly spaced samples and reports whether no probe
/// square along it touches an obstacle. The observer's own spot is not
/// sampled; the target's is.
#[must_use]
pub fn line_of_sight(from: Vec2, to: Vec2, obstacles: &[Rect], raycast: &RaycastConfig) -> bool {
    let segment = to - from;
    let distance = segment.length();
    let spacing = raycast.step_spacing.max(f32::EPSILON);
    let steps = ((distance / spacing).floor() as u32).max(raycast.min_steps).max(1);

    (1..=steps).all(|i| {
        let sample = from + segment * (i as f32 / steps as f32);
        let probe = Rect::from_center(sample, raycast.probe_size, raycast.probe_size);
        !obstacles.iter().any(|o| probe.overlaps(o))
    })
}

/// Can an observer at `observer`, facing `facing_deg`, see `target`?
///
/// Range is inclusive, and so is the cone edge: a target exactly `fov/2` off
/// the facing is visible.
#[must_use]
pub fn can_see(
    observer: Vec2,
    facing_deg: f32,
    cone: &VisionCone,
    target: Vec2,
    obstacles: &[Rect],
    raycast: &RaycastConfig,
) -> bool {
    let to_target = target - observer;
    let distance = to_target.length();

    if distance == 0.0 {
        return true;
    }
    if !distance.is_finite() || distance > cone.range {
        return false;
    }

    let delta = bearing_delta_deg(facing_deg, facing_deg_from(to_target));
    if delta.abs() > cone.fov_deg / 2.0 + FOV_ANGLE_TOLERANCE_DEG {
        return false;
    }

    line_of_sight(observer, target, obstacles, raycast)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONE: VisionCone = VisionCone {
        fov_deg: 60.0,
        range: 220.0,
    };

    fn at_bearing(deg: f32, distance: f32) -> Vec2 {
        direction_from_deg(deg) * distance
    }

    #[test]
    fn bearing_delta_is_normalized() {
        assert_eq!(bearing_delta_deg(0.0, 180.0), 180.0);
        assert_eq!(bearing_delta_deg(0.0, -180.0), 180.0);
        assert_eq!(bearing_delta_deg(170.0, -170.0), 20.0);
        assert_eq!(bearing_delta_deg(-170.0, 170.0), -20.0);
        assert_eq!(bearing_delta_deg(350.0, 10.0), 20.0);
    }

    #[test]
    fn standing_on_top_of_observer_is_seen() {
        let p = Vec2::new(40.0, 40.0);
        let wall = [Rect::new(0.0, 0.0, 100.0, 100.0)];
        assert!(can_see(p, 0.0, &CONE, p, &wall, &RaycastConfig::default()));
    }

    #[test]
    fn out_of_range_is_not_seen() {
        let raycast = RaycastConfig::default();
        assert!(can_see(Vec2::ZERO, 0.0, &CONE, Vec2::new(220.0, 0.0), &[], &raycast));
        assert!(!can_see(Vec2::ZERO, 0.0, &CONE, Vec2::new(220.5, 0.0), &[], &raycast));
    }

    #[test]
    fn visibility_is_monotonic_in_range() {
        let raycast = RaycastConfig::default();
        for bearing in [-25.0_f32, 0.0, 12.5, 29.0] {
            let mut seen_further = false;
            for step in (1..=300).rev() {
                let d = step as f32;
                let seen = can_see(Vec2::ZERO, 0.0, &CONE, at_bearing(bearing, d), &[], &raycast);
                if seen_further {
                    assert!(seen, "bearing {bearing}: visible further out but not at {d}");
                }
                seen_further |= seen;
            }
            assert!(seen_further);
        }
    }

    #[test]
    fn fov_edge_is_inclusive() {
        let raycast = RaycastConfig::default();
        let observer = Vec2::new(500.0, 300.0);
        for facing in [0.0_f32, 90.0, -135.0, 179.0] {
            let edge = observer + at_bearing(facing + 30.0, 100.0);
            let past_edge = observer + at_bearing(facing + 30.1, 100.0);
            let other_edge = observer + at_bearing(facing - 30.0, 100.0);
            assert!(can_see(observer, facing, &CONE, edge, &[], &raycast));
            assert!(can_see(observer, facing, &CONE, other_edge, &[], &raycast));
            assert!(!can_see(observer, facing, &CONE, past_edge, &[], &raycast));
        }
    }

    #[test]
    fn spanning_obstacle_blocks_sight() {
        let raycast = RaycastConfig::default();
        let wall = [Rect::new(40.0, -50.0, 10.0, 100.0)];
        assert!(can_see(Vec2::ZERO, 0.0, &CONE, Vec2::new(100.0, 0.0), &[], &raycast));
        assert!(!can_see(Vec2::ZERO, 0.0, &CONE, Vec2::new(100.0, 0.0), &wall, &raycast));

        // short segments still sample densely enough to hit a thin wall
        let thin = [Rect::new(20.0, -50.0, 4.0, 100.0)];
        assert!(!can_see(Vec2::ZERO, 0.0, &CONE, Vec2::new(40.0, 0.0), &thin, &raycast));
    }

    #[test]
    fn obstacle_off_the_segment_does_not_block() {
        let raycast = RaycastConfig::default();
        let wall = [Rect::new(40.0, 20.0, 10.0, 100.0)];
        assert!(can_see(Vec2::ZERO, 0.0, &CONE, Vec2::new(100.0, 0.0), &wall, &raycast));
    }
}
