use bevy_math::Vec2;
use tracing::debug;

use super::{SentryBehavior, SentryContext};
use crate::{
    collision::{helpers::direction_or_none, sentries::guard_body, sentries::slide_guard_along_obstacles},
    config::{ConfigError, GuardConfig, GuardParams, GuardTuning, ensure_finite},
    protocol::{GuardPhase, Rect, SentryKind},
    vision::{RaycastConfig, VisionCone, can_see, facing_deg_from},
};

// ============================================================================
// Patrol Guard
// ============================================================================

// Walks a cyclic waypoint loop, pausing at every node, until the alert
// coordinator switches it to chasing the player.
#[derive(Debug, Clone)]
pub struct PatrolGuard {
    waypoints: Vec<Vec2>,
    // Waypoint the guard is travelling toward (or paused at).
    current_index: usize,
    position: Vec2,
    // Unit vector; only changes while the guard actually moves.
    facing: Vec2,
    pause_elapsed: f32,
    phase: GuardPhase,
    params: GuardParams,
}

impl PatrolGuard {
    pub fn new(config: &GuardConfig, tuning: &GuardTuning) -> Result<Self, ConfigError> {
        if config.waypoints.is_empty() {
            return Err(ConfigError::EmptyPatrol);
        }
        let waypoints = config
            .waypoints
            .iter()
            .map(|&p| ensure_finite("guard waypoint", p.into()))
            .collect::<Result<Vec<Vec2>, _>>()?;

        let params = GuardParams::resolve(config, tuning)?;
        let position = waypoints[0];
        let current_index = 1 % waypoints.len();
        let facing = direction_or_none(waypoints[current_index] - position).unwrap_or(Vec2::X);

        Ok(Self {
            waypoints,
            current_index,
            position,
            facing,
            pause_elapsed: 0.0,
            phase: GuardPhase::Patrolling,
            params,
        })
    }

    #[must_use]
    pub const fn phase(&self) -> GuardPhase {
        self.phase
    }

    #[must_use]
    pub fn is_alerted(&self) -> bool {
        self.phase == GuardPhase::Chasing
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn target_waypoint(&self) -> Vec2 {
        self.waypoints[self.current_index]
    }

    #[must_use]
    pub const fn facing(&self) -> Vec2 {
        self.facing
    }

    #[must_use]
    pub const fn pause_elapsed(&self) -> f32 {
        self.pause_elapsed
    }

    #[must_use]
    pub fn body(&self) -> Rect {
        guard_body(self.position, self.params.size)
    }

    #[must_use]
    pub const fn size(&self) -> f32 {
        self.params.size
    }

    // Switch to chasing. Returns false if the guard was already chasing.
    pub fn alert(&mut self) -> bool {
        if self.phase == GuardPhase::Chasing {
            return false;
        }
        debug!("guard at {:?} alerted ({:?} -> Chasing)", self.position, self.phase);
        self.phase = GuardPhase::Chasing;
        self.pause_elapsed = 0.0;
        true
    }

    // Return to the patrol loop from wherever the chase ended. The guard walks
    // back toward its current waypoint; it is never teleported onto the path.
    pub fn stand_down(&mut self) -> bool {
        if self.phase != GuardPhase::Chasing {
            return false;
        }
        debug!("guard at {:?} standing down, heading to waypoint {}", self.position, self.current_index);
        self.phase = GuardPhase::Patrolling;
        true
    }

    fn arrive(&mut self) {
        self.position = self.target_waypoint();
        self.phase = GuardPhase::Paused;
        self.pause_elapsed = 0.0;
    }

    fn patrol(&mut self, delta: f32) {
        let target = self.target_waypoint();
        let to_target = target - self.position;
        let distance = to_target.length();

        let Some(dir) = direction_or_none(to_target).filter(|_| distance >= self.params.arrival_epsilon) else {
            self.arrive();
            return;
        };

        let step = self.params.speed * delta;
        if step >= distance {
            self.position = target;
        } else {
            self.position += dir * step;
        }
        self.facing = dir;

        if self.position.distance(target) < self.params.arrival_epsilon {
            self.arrive();
        }
    }

    fn wait(&mut self, delta: f32) {
        self.pause_elapsed += delta;
        if self.pause_elapsed >= self.params.pause {
            self.pause_elapsed = 0.0;
            self.current_index = (self.current_index + 1) % self.waypoints.len();
            self.phase = GuardPhase::Patrolling;
        }
    }

    fn chase(&mut self, delta: f32, ctx: &SentryContext) {
        let to_player = ctx.player_center - self.position;
        let distance = to_player.length();
        let stop = self.params.chase_stop_distance;
        if distance <= stop {
            return;
        }
        let Some(dir) = direction_or_none(to_player) else {
            return;
        };
        self.facing = dir;

        let speed = self.params.speed * self.params.chase_multiplier;
        // Never run past the stop ring around the player.
        let delta = delta.min((distance - stop) / speed);
        self.position =
            slide_guard_along_obstacles(ctx.obstacles, self.position, self.params.size, dir, speed, delta);
    }
}

impl SentryBehavior for PatrolGuard {
    fn update(&mut self, delta: f32, ctx: &SentryContext) {
        match self.phase {
            GuardPhase::Patrolling => self.patrol(delta),
            GuardPhase::Paused => self.wait(delta),
            GuardPhase::Chasing => self.chase(delta, ctx),
        }
    }

    fn can_see(&self, target: Vec2, obstacles: &[Rect], raycast: &RaycastConfig) -> bool {
        can_see(self.position, self.facing_deg(), &self.params.cone, target, obstacles, raycast)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn facing_deg(&self) -> f32 {
        facing_deg_from(self.facing)
    }

    fn cone(&self) -> VisionCone {
        self.params.cone
    }

    fn kind(&self) -> SentryKind {
        SentryKind::Guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::mansion_layout;

    fn guard(waypoints: &[(f32, f32)], speed: f32, pause: f32) -> PatrolGuard {
        let config = GuardConfig::patrol(waypoints).with_speed(speed).with_pause(pause);
        PatrolGuard::new(&config, &GuardTuning::default()).unwrap()
    }

    fn idle_ctx(obstacles: &[Rect]) -> SentryContext<'_> {
        SentryContext {
            player_center: Vec2::new(10_000.0, 10_000.0),
            obstacles,
        }
    }

    #[test]
    fn empty_patrol_is_rejected() {
        let config = GuardConfig::default();
        assert_eq!(PatrolGuard::new(&config, &GuardTuning::default()).unwrap_err(), ConfigError::EmptyPatrol);
    }

    #[test]
    fn starts_at_first_waypoint_heading_to_second() {
        let g = guard(&[(10.0, 10.0), (10.0, 110.0)], 90.0, 0.6);
        assert_eq!(g.position(), Vec2::new(10.0, 10.0));
        assert_eq!(g.current_index(), 1);
        assert_eq!(g.phase(), GuardPhase::Patrolling);
        assert_eq!(g.facing(), Vec2::Y);
    }

    #[test]
    fn patrol_loop_is_deterministic() {
        let mut g = guard(&[(0.0, 0.0), (100.0, 0.0)], 50.0, 1.0);
        let ctx = idle_ctx(&[]);

        // 2.0 s of travel at 50 u/s
        for _ in 0..8 {
            g.update(0.25, &ctx);
        }
        assert_eq!(g.position(), Vec2::new(100.0, 0.0));
        assert_eq!(g.phase(), GuardPhase::Paused);

        // still paused just before the full second
        for _ in 0..3 {
            g.update(0.25, &ctx);
        }
        assert_eq!(g.phase(), GuardPhase::Paused);
        assert_eq!(g.position(), Vec2::new(100.0, 0.0));

        g.update(0.25, &ctx);
        assert_eq!(g.phase(), GuardPhase::Patrolling);
        assert_eq!(g.current_index(), 0);

        g.update(0.25, &ctx);
        assert_eq!(g.position(), Vec2::new(87.5, 0.0));
        assert_eq!(g.facing(), Vec2::NEG_X);
    }

    #[test]
    fn paused_guard_keeps_its_facing() {
        let mut g = guard(&[(0.0, 0.0), (0.0, 50.0)], 100.0, 5.0);
        let ctx = idle_ctx(&[]);
        g.update(0.5, &ctx);
        assert_eq!(g.phase(), GuardPhase::Paused);
        let facing = g.facing_deg();
        for _ in 0..10 {
            g.update(0.1, &ctx);
        }
        assert_eq!(g.facing_deg(), facing);
        assert!((facing - 90.0).abs() < 1e-4);
    }

    #[test]
    fn single_waypoint_pauses_forever() {
        let mut g = guard(&[(42.0, 7.0)], 90.0, 0.5);
        let ctx = idle_ctx(&[]);
        for _ in 0..100 {
            g.update(0.1, &ctx);
            assert_eq!(g.position(), Vec2::new(42.0, 7.0));
            assert!(g.facing().is_finite());
            assert_ne!(g.phase(), GuardPhase::Chasing);
        }
    }

    #[test]
    fn chase_is_faster_and_stops_near_player() {
        let mut g = guard(&[(0.0, 0.0), (0.0, 400.0)], 100.0, 0.6);
        assert!(g.alert());
        assert!(!g.alert());
        let ctx = SentryContext {
            player_center: Vec2::new(200.0, 0.0),
            obstacles: &[],
        };
        g.update(0.5, &ctx);
        assert!((g.position().x - 60.0).abs() < 1e-3);
        assert_eq!(g.facing(), Vec2::X);

        for _ in 0..20 {
            g.update(0.5, &ctx);
        }
        let gap = ctx.player_center.distance(g.position());
        assert!((gap - 4.0).abs() < 1e-3, "gap {gap}");
    }

    #[test]
    fn chase_is_blocked_by_walls() {
        let mut g = guard(&[(100.0, 100.0)], 100.0, 0.6);
        g.alert();
        let wall = [Rect::new(150.0, 0.0, 16.0, 300.0)];
        let ctx = SentryContext {
            player_center: Vec2::new(300.0, 100.0),
            obstacles: &wall,
        };
        for _ in 0..50 {
            g.update(0.1, &ctx);
            assert!(!g.body().overlaps(&wall[0]));
        }
        assert_eq!(g.position().x, 136.0);
    }

    #[test]
    fn chase_starting_inside_a_wall_does_not_jump() {
        // (780, 300) sits on the mansion's bottom-right corner
        let walls = mansion_layout().static_walls;
        let mut g = guard(&[(780.0, 300.0), (500.0, 300.0)], 90.0, 0.6);
        g.alert();
        let ctx = SentryContext {
            player_center: Vec2::new(600.0, 280.0),
            obstacles: walls.as_slice(),
        };
        let max_step = 90.0 * 1.2 / 60.0 + 1e-3;
        for _ in 0..60 {
            let before = g.position();
            g.update(1.0 / 60.0, &ctx);
            assert!(before.distance(g.position()) <= max_step, "{before} -> {}", g.position());
            assert!(g.position().x < before.x);
        }
    }

    #[test]
    fn stand_down_resumes_from_current_position() {
        let mut g = guard(&[(0.0, 0.0), (100.0, 0.0)], 50.0, 0.5);
        g.alert();
        let ctx = SentryContext {
            player_center: Vec2::new(0.0, 200.0),
            obstacles: &[],
        };
        for _ in 0..10 {
            g.update(0.1, &ctx);
        }
        let chased_to = g.position();
        assert!(chased_to.y > 0.0);

        assert!(g.stand_down());
        assert_eq!(g.phase(), GuardPhase::Patrolling);
        assert_eq!(g.position(), chased_to);
        assert_eq!(g.current_index(), 1);

        g.update(0.1, &ctx);
        let heading = (Vec2::new(100.0, 0.0) - chased_to).normalize();
        assert!((g.facing() - heading).length() < 1e-4);
    }
}
