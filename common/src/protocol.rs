#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

use bevy_ecs::component::Component;
use bevy_math::Vec2;

use crate::collision::helpers::ranges_overlap_1d;

// Macro to reduce boilerplate for structs
macro_rules! message {
    ($(#[$meta:meta])* struct $name:ident $body:tt) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        #[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "bincode", derive(Encode, Decode))]
        pub struct $name $body
    };
}

// ============================================================================
// Common Data Types
// ============================================================================

// Axis-aligned rectangle in level units; y grows downwards like screen space.
// Used for obstacles, hitboxes, guard bodies and trigger zones.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width.mul_add(0.5, self.x), self.height.mul_add(0.5, self.y))
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.width;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.height;
    }

    // Strict overlap: rectangles that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        ranges_overlap_1d(self.x, self.right(), other.x, other.right())
            && ranges_overlap_1d(self.y, self.bottom(), other.y, other.bottom())
    }

    // Grow (or shrink, for negative values) by the given totals, keeping the center.
    #[must_use]
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x - dx / 2.0, self.y - dy / 2.0, self.width + dx, self.height + dy)
    }
}

// Plain 2D point for the wire; the simulation itself works in `Vec2`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

// Sentry ID component - stable identifier used in snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct SentryId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum SentryKind {
    Guard,
    Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum GuardPhase {
    Patrolling,
    Paused,
    Chasing,
}

// ============================================================================
// Alarm & Outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum AlarmPhase {
    #[default]
    Calm,
    Alarmed,
}

// Signals emitted by the alert coordinator. The presentation layer starts the
// alarm audio on `AlarmRaised` and stops it on `AlarmCleared`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum AlertEvent {
    AlarmRaised,
    AlarmCleared,
    Recorded,
    RecordingErased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum EscapeKind {
    Clean,
    Alarmed,
    Recorded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum Outcome {
    Captured,
    Recorded,
    TimedOut,
    Escaped(EscapeKind),
}

impl Outcome {
    #[must_use]
    pub const fn is_failure(self) -> bool {
        !matches!(self, Self::Escaped(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct AlarmStatus {
    pub phase: AlarmPhase,
    pub remaining_secs: f32,
    pub recorded: bool,
}

// ============================================================================
// Snapshots
// ============================================================================

message! {
// Per-sentry state for drawing the sentry and its FOV cone.
struct SentryState {
    pub id: SentryId,
    pub kind: SentryKind,
    pub position: Point,
    pub facing_deg: f32,
    pub fov_deg: f32,
    pub range: f32,
    pub sees_player: bool,
    pub guard_phase: Option<GuardPhase>,
}
}

message! {
struct PlayerState {
    pub hitbox: Rect,
    pub carrying_objective: bool,
    pub hold_progress: f32,
}
}

message! {
// Everything the presentation layer needs for one tick.
struct TickSnapshot {
    pub tick: u64,
    pub elapsed_secs: f32,
    pub player: PlayerState,
    pub sentries: Vec<SentryState>,
    pub alarm: AlarmStatus,
    pub time_remaining: Option<f32>,
    pub events: Vec<AlertEvent>,
    pub outcome: Option<Outcome>,
}
}
