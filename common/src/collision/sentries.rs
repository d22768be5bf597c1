use bevy_math::Vec2;

use super::obstacles::move_box;
use crate::protocol::Rect;

// Square body of a guard centered on its position.
#[must_use]
pub fn guard_body(position: Vec2, size: f32) -> Rect {
    Rect::from_center(position, size, size)
}

#[must_use]
pub fn overlap_guard_vs_player(guard_pos: Vec2, guard_size: f32, player_hitbox: &Rect) -> bool {
    guard_body(guard_pos, guard_size).overlaps(player_hitbox)
}

// Move a guard body through the obstacle set with per-axis resolution and
// return the new center position. Patrols ignore walls, so obstacles the
// body already overlaps are skipped and the guard walks out of them.
#[must_use]
pub fn slide_guard_along_obstacles(
    obstacles: &[Rect],
    position: Vec2,
    size: f32,
    direction: Vec2,
    speed: f32,
    delta: f32,
) -> Vec2 {
    let mut body = guard_body(position, size);
    let blocking: Vec<Rect> = obstacles.iter().filter(|o| !body.overlaps(o)).copied().collect();
    let moved = move_box(&mut body, &blocking, direction, speed, delta);
    position + moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_centered_on_position() {
        let body = guard_body(Vec2::new(100.0, 50.0), 28.0);
        assert_eq!(body, Rect::new(86.0, 36.0, 28.0, 28.0));
    }

    #[test]
    fn touching_guard_does_not_capture() {
        let player = Rect::new(114.0, 36.0, 28.0, 36.0);
        assert!(!overlap_guard_vs_player(Vec2::new(100.0, 50.0), 28.0, &player));
        let player = Rect::new(113.0, 36.0, 28.0, 36.0);
        assert!(overlap_guard_vs_player(Vec2::new(100.0, 50.0), 28.0, &player));
    }

    #[test]
    fn guard_slides_up_to_wall() {
        let wall = Rect::new(200.0, 0.0, 16.0, 300.0);
        let pos = slide_guard_along_obstacles(&[wall], Vec2::new(150.0, 100.0), 28.0, Vec2::X, 108.0, 1.0);
        assert_eq!(pos, Vec2::new(186.0, 100.0));
    }

    #[test]
    fn guard_inside_a_wall_walks_out_of_it() {
        let wall = Rect::new(200.0, 0.0, 16.0, 300.0);
        let pos = slide_guard_along_obstacles(&[wall], Vec2::new(205.0, 100.0), 28.0, Vec2::NEG_X, 60.0, 0.1);
        assert_eq!(pos, Vec2::new(199.0, 100.0));

        // other walls still block
        let far = Rect::new(150.0, 0.0, 16.0, 300.0);
        let pos = slide_guard_along_obstacles(&[wall, far], Vec2::new(205.0, 100.0), 28.0, Vec2::NEG_X, 60.0, 1.0);
        assert_eq!(pos, Vec2::new(180.0, 100.0));
    }
}
