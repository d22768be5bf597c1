pub mod camera;
pub mod guard;

use bevy_ecs::component::Component;
use bevy_math::Vec2;

pub use camera::SweepCamera;
pub use guard::PatrolGuard;

use crate::{
    collision::overlap_guard_vs_player,
    protocol::{AlertEvent, Point, Rect, SentryId, SentryKind, SentryState},
    vision::{RaycastConfig, VisionCone},
};

// World state a sentry may react to while updating.
#[derive(Debug, Clone, Copy)]
pub struct SentryContext<'a> {
    pub player_center: Vec2,
    pub obstacles: &'a [Rect],
}

// Shared capability of everything that watches the player: advance one tick,
// then answer a visibility query against the current pose.
pub trait SentryBehavior {
    fn update(&mut self, delta: f32, ctx: &SentryContext);
    fn can_see(&self, target: Vec2, obstacles: &[Rect], raycast: &RaycastConfig) -> bool;
    fn position(&self) -> Vec2;
    fn facing_deg(&self) -> f32;
    fn cone(&self) -> VisionCone;
    fn kind(&self) -> SentryKind;
}

// Sentry component - one per guard or camera entity
#[derive(Component, Debug, Clone)]
pub enum Sentry {
    Guard(PatrolGuard),
    Camera(SweepCamera),
}

impl Sentry {
    #[must_use]
    pub const fn as_guard(&self) -> Option<&PatrolGuard> {
        match self {
            Self::Guard(guard) => Some(guard),
            Self::Camera(_) => None,
        }
    }

    // React to a coordinator broadcast. Cameras ignore alarm state.
    pub fn on_alert(&mut self, event: AlertEvent) -> bool {
        match (self, event) {
            (Self::Guard(guard), AlertEvent::AlarmRaised) => guard.alert(),
            (Self::Guard(guard), AlertEvent::AlarmCleared) => guard.stand_down(),
            _ => false,
        }
    }

    #[must_use]
    pub fn state(&self, id: SentryId, sees_player: bool) -> SentryState {
        let cone = self.cone();
        SentryState {
            id,
            kind: self.kind(),
            position: Point::from(self.position()),
            facing_deg: self.facing_deg(),
            fov_deg: cone.fov_deg,
            range: cone.range,
            sees_player,
            guard_phase: self.as_guard().map(PatrolGuard::phase),
        }
    }

    fn behavior(&self) -> &dyn SentryBehavior {
        match self {
            Self::Guard(guard) => guard,
            Self::Camera(camera) => camera,
        }
    }
}

impl SentryBehavior for Sentry {
    fn update(&mut self, delta: f32, ctx: &SentryContext) {
        match self {
            Self::Guard(guard) => guard.update(delta, ctx),
            Self::Camera(camera) => camera.update(delta, ctx),
        }
    }

    fn can_see(&self, target: Vec2, obstacles: &[Rect], raycast: &RaycastConfig) -> bool {
        self.behavior().can_see(target, obstacles, raycast)
    }

    fn position(&self) -> Vec2 {
        self.behavior().position()
    }

    fn facing_deg(&self) -> f32 {
        self.behavior().facing_deg()
    }

    fn cone(&self) -> VisionCone {
        self.behavior().cone()
    }

    fn kind(&self) -> SentryKind {
        self.behavior().kind()
    }
}

// An alerted guard whose body touches the player's hitbox catches them.
// Walking into an unaware guard is not a capture.
#[must_use]
pub fn guard_captures(sentry: &Sentry, player_hitbox: &Rect) -> bool {
    sentry.as_guard().is_some_and(|guard| {
        guard.is_alerted() && overlap_guard_vs_player(guard.position(), guard.size(), player_hitbox)
    })
}
