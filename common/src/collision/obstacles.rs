use bevy_math::Vec2;

use super::helpers::direction_or_none;
use crate::{constants::MAX_COLLISION_STEP, protocol::Rect};

// Push an already-displaced box back out of every obstacle it overlaps.
//
// The box must have been moved along a single axis; the sign of that axis'
// delta decides which edge gets clamped. Obstacles are applied in order, so for
// overlapping obstacles the last one wins.
pub fn resolve_axis(hitbox: &mut Rect, obstacles: &[Rect], delta_x: f32, delta_y: f32) {
    for obstacle in obstacles {
        if !hitbox.overlaps(obstacle) {
            continue;
        }

        if delta_x > 0.0 {
            hitbox.set_right(obstacle.left());
        } else if delta_x < 0.0 {
            hitbox.set_left(obstacle.right());
        }

        if delta_y > 0.0 {
            hitbox.set_bottom(obstacle.top());
        } else if delta_y < 0.0 {
            hitbox.set_top(obstacle.bottom());
        }
    }
}

// Move a box along `direction` at `speed` for `delta` seconds, X first then Y.
//
// The direction is normalized so diagonal input is no faster than straight
// input. Long displacements are cut into sub-steps no longer than
// MAX_COLLISION_STEP so a stalled frame can't tunnel through a wall.
// Returns the displacement actually applied.
pub fn move_box(hitbox: &mut Rect, obstacles: &[Rect], direction: Vec2, speed: f32, delta: f32) -> Vec2 {
    let Some(dir) = direction_or_none(direction) else {
        return Vec2::ZERO;
    };

    let distance = speed * delta;
    if !distance.is_finite() || distance <= 0.0 {
        return Vec2::ZERO;
    }

    let start = Vec2::new(hitbox.x, hitbox.y);
    let steps = (distance / MAX_COLLISION_STEP).ceil().max(1.0) as u32;
    let step = dir * (distance / steps as f32);

    for _ in 0..steps {
        if step.x != 0.0 {
            hitbox.x += step.x;
            resolve_axis(hitbox, obstacles, step.x, 0.0);
        }
        if step.y != 0.0 {
            hitbox.y += step.y;
            resolve_axis(hitbox, obstacles, 0.0, step.y);
        }
    }

    Vec2::new(hitbox.x, hitbox.y) - start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::helpers::overlaps_any;

    fn room() -> Vec<Rect> {
        vec![
            Rect::new(0.0, 0.0, 400.0, 16.0),
            Rect::new(0.0, 284.0, 400.0, 16.0),
            Rect::new(0.0, 0.0, 16.0, 300.0),
            Rect::new(384.0, 0.0, 16.0, 300.0),
            Rect::new(150.0, 100.0, 20.0, 120.0),
        ]
    }

    #[test]
    fn positive_x_clamps_right_edge_to_obstacle() {
        let wall = Rect::new(40.0, -100.0, 20.0, 300.0);
        let mut hitbox = Rect::new(22.0, 0.0, 28.0, 36.0);
        resolve_axis(&mut hitbox, &[wall], 10.0, 0.0);
        assert_eq!(hitbox.right(), 40.0);
        assert!(!hitbox.overlaps(&wall));
    }

    #[test]
    fn negative_y_clamps_top_edge_to_obstacle() {
        let wall = Rect::new(0.0, 0.0, 100.0, 16.0);
        let mut hitbox = Rect::new(20.0, 10.0, 28.0, 36.0);
        resolve_axis(&mut hitbox, &[wall], 0.0, -6.0);
        assert_eq!(hitbox.top(), 16.0);
    }

    #[test]
    fn no_movement_leaves_box_untouched() {
        let mut hitbox = Rect::new(50.0, 50.0, 28.0, 36.0);
        let moved = move_box(&mut hitbox, &room(), Vec2::ZERO, 200.0, 0.016);
        assert_eq!(moved, Vec2::ZERO);
        assert_eq!(hitbox, Rect::new(50.0, 50.0, 28.0, 36.0));
    }

    #[test]
    fn diagonal_input_is_not_faster() {
        let mut straight = Rect::new(200.0, 150.0, 10.0, 10.0);
        let mut diagonal = straight;
        let a = move_box(&mut straight, &[], Vec2::new(1.0, 0.0), 100.0, 0.5);
        let b = move_box(&mut diagonal, &[], Vec2::new(1.0, 1.0), 100.0, 0.5);
        assert!((a.length() - 50.0).abs() < 1e-3);
        assert!((b.length() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn slides_along_wall_when_moving_diagonally_into_it() {
        let wall = Rect::new(100.0, 0.0, 20.0, 400.0);
        let mut hitbox = Rect::new(70.0, 100.0, 28.0, 36.0);
        move_box(&mut hitbox, &[wall], Vec2::new(1.0, 1.0), 100.0, 0.5);
        assert_eq!(hitbox.right(), 100.0);
        assert!(hitbox.y > 100.0);
    }

    #[test]
    fn stalled_frame_does_not_tunnel() {
        let wall = Rect::new(100.0, 0.0, 16.0, 400.0);
        let mut hitbox = Rect::new(50.0, 100.0, 28.0, 36.0);
        // 2 seconds at 200 u/s would jump well past the wall in one step
        move_box(&mut hitbox, &[wall], Vec2::new(1.0, 0.0), 200.0, 2.0);
        assert_eq!(hitbox.right(), 100.0);
    }

    #[test]
    fn resolved_box_never_overlaps_obstacles() {
        let obstacles = room();
        let directions = [
            Vec2::new(1.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(-1.0, -1.0),
        ];
        let mut hitbox = Rect::new(60.0, 60.0, 28.0, 36.0);
        for i in 0..2_000 {
            let dir = directions[(i / 37) % directions.len()];
            let delta = [0.016, 0.05, 0.3][i % 3];
            move_box(&mut hitbox, &obstacles, dir, 200.0, delta);
            assert!(!overlaps_any(&hitbox, &obstacles), "overlap at iteration {i}: {hitbox:?}");
        }
    }
}
