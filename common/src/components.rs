#[allow(clippy::wildcard_imports)]
use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use crate::{
    collision::move_box,
    config::{ConfigError, PlayerTuning, ensure_positive},
    protocol::Rect,
};

// ============================================================================
// Shared Level Components
// ============================================================================

// The player's moving box. Only the collision resolver moves it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    pub hitbox: Rect,
    pub speed: f32,
}

impl PlayerBody {
    // Spawn with the top-left corner at `spawn`.
    pub fn new(spawn: Vec2, tuning: &PlayerTuning) -> Result<Self, ConfigError> {
        Ok(Self {
            hitbox: Rect::new(
                spawn.x,
                spawn.y,
                ensure_positive("player width", tuning.width)?,
                ensure_positive("player height", tuning.height)?,
            ),
            speed: ensure_positive("player speed", tuning.speed)?,
        })
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.hitbox.center()
    }

    pub fn step(&mut self, direction: Vec2, obstacles: &[Rect], delta: f32) -> Vec2 {
        move_box(&mut self.hitbox, obstacles, direction, self.speed, delta)
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inventory {
    pub carrying_objective: bool,
}

// Result of this tick's visibility query for one sentry.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Detection {
    pub sees_player: bool,
}
