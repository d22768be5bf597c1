use bevy_math::Vec2;

use crate::{constants::PHYSICS_EPSILON, protocol::Rect};

// Check if two 1D ranges overlap (strictly; touching ends do not count).
#[must_use]
pub fn ranges_overlap_1d(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_max > b_min && a_min < b_max
}

// Unit vector along `v`, or `None` for (near) zero vectors so callers never divide by zero.
#[must_use]
pub fn direction_or_none(v: Vec2) -> Option<Vec2> {
    let length = v.length();
    if length.is_finite() && length > PHYSICS_EPSILON {
        Some(v / length)
    } else {
        None
    }
}

// True if `rect` overlaps any of the obstacles.
#[must_use]
pub fn overlaps_any(rect: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|o| rect.overlaps(o))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_ranges_do_not_overlap() {
        assert!(!ranges_overlap_1d(0.0, 10.0, 10.0, 20.0));
        assert!(ranges_overlap_1d(0.0, 10.1, 10.0, 20.0));
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert_eq!(direction_or_none(Vec2::ZERO), None);
        assert_eq!(direction_or_none(Vec2::new(f32::NAN, 1.0)), None);
        assert_eq!(direction_or_none(Vec2::new(0.0, -3.0)), Some(Vec2::new(0.0, -1.0)));
    }
}
