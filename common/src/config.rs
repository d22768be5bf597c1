use bevy_math::Vec2;
#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    constants::*,
    protocol::{Point, Rect},
    vision::{RaycastConfig, VisionCone},
};

// ============================================================================
// Errors
// ============================================================================

// Construction-time contract violations. Everything that passes validation runs
// without further error paths.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("guard patrol needs at least one waypoint")]
    EmptyPatrol,
    #[error("camera sweep bounds are inverted: min {min} > max {max}")]
    InvertedSweep { min: f32, max: f32 },
    #[error("camera angle {angle} lies outside its sweep [{min}, {max}]")]
    AngleOutsideSweep { angle: f32, min: f32, max: f32 },
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be finite and not negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
    #[error("field of view must be within (0, 360] degrees, got {0}")]
    FieldOfView(f32),
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("vault code must be 1 to {max_len} digits, got {code:?}")]
    InvalidCode { code: String, max_len: usize },
    #[error("hiding spot {index} does not exist ({count} spots)")]
    HidingSpot { index: usize, count: usize },
    #[error("{field} must have a positive size, got {rect:?}")]
    EmptyRect { field: &'static str, rect: Rect },
}

pub fn ensure_positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

pub fn ensure_non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

pub fn ensure_nonzero<T: Copy + Default + PartialEq>(field: &'static str, value: T) -> Result<T, ConfigError> {
    if value == T::default() {
        Err(ConfigError::Zero { field })
    } else {
        Ok(value)
    }
}

pub fn ensure_rect(field: &'static str, rect: Rect) -> Result<Rect, ConfigError> {
    let finite = [rect.x, rect.y, rect.width, rect.height].iter().all(|v| v.is_finite());
    if finite && rect.width > 0.0 && rect.height > 0.0 {
        Ok(rect)
    } else {
        Err(ConfigError::EmptyRect { field, rect })
    }
}

pub fn ensure_finite(field: &'static str, point: Vec2) -> Result<Vec2, ConfigError> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

pub fn ensure_cone(fov_deg: f32, range: f32) -> Result<VisionCone, ConfigError> {
    if !(fov_deg.is_finite() && fov_deg > 0.0 && fov_deg <= 360.0) {
        return Err(ConfigError::FieldOfView(fov_deg));
    }
    Ok(VisionCone {
        fov_deg,
        range: ensure_positive("vision range", range)?,
    })
}

// ============================================================================
// Tuning
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct PlayerTuning {
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct GuardTuning {
    pub speed: f32,
    pub chase_multiplier: f32,
    pub pause: f32,
    pub size: f32,
    pub fov_deg: f32,
    pub range: f32,
    pub arrival_epsilon: f32,
    pub chase_stop_distance: f32,
}

impl Default for GuardTuning {
    fn default() -> Self {
        Self {
            speed: GUARD_SPEED,
            chase_multiplier: GUARD_CHASE_MULTIPLIER,
            pause: GUARD_PAUSE,
            size: GUARD_SIZE,
            fov_deg: GUARD_FOV_DEG,
            range: GUARD_FOV_RANGE,
            arrival_epsilon: GUARD_ARRIVAL_EPSILON,
            chase_stop_distance: GUARD_CHASE_STOP_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct CameraTuning {
    pub fov_deg: f32,
    pub range: f32,
    pub sweep_speed: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            range: CAMERA_FOV_RANGE,
            sweep_speed: CAMERA_SWEEP_SPEED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct AlarmTuning {
    pub duration: f32,
}

impl Default for AlarmTuning {
    fn default() -> Self {
        Self {
            duration: ALARM_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct InteractionTuning {
    pub steal_time: f32,
    pub sabotage_time: f32,
    pub hold_release_decay: f32,
    pub hold_away_decay: f32,
    pub door_open_time: f32,
    pub door_reach: f32,
    pub keypad_processing_time: f32,
    pub keypad_penalty: f32,
    pub max_code_len: usize,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            steal_time: STEAL_TIME,
            sabotage_time: SABOTAGE_TIME,
            hold_release_decay: HOLD_RELEASE_DECAY,
            hold_away_decay: HOLD_AWAY_DECAY,
            door_open_time: DOOR_OPEN_TIME,
            door_reach: DOOR_REACH,
            keypad_processing_time: KEYPAD_PROCESSING_TIME,
            keypad_penalty: KEYPAD_PENALTY,
            max_code_len: KEYPAD_MAX_CODE_LEN,
        }
    }
}

// Every recognized tuning option, with the stock values as defaults. Missing
// fields in a JSON file fall back to those defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct TuningConfig {
    pub player: PlayerTuning,
    pub guard: GuardTuning,
    pub camera: CameraTuning,
    pub alarm: AlarmTuning,
    pub raycast: RaycastConfig,
    pub interaction: InteractionTuning,
}

impl TuningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("player speed", self.player.speed)?;
        ensure_positive("player width", self.player.width)?;
        ensure_positive("player height", self.player.height)?;
        ensure_positive("guard speed", self.guard.speed)?;
        ensure_positive("guard chase multiplier", self.guard.chase_multiplier)?;
        ensure_non_negative("guard pause", self.guard.pause)?;
        ensure_positive("guard size", self.guard.size)?;
        ensure_cone(self.guard.fov_deg, self.guard.range)?;
        ensure_positive("guard arrival epsilon", self.guard.arrival_epsilon)?;
        ensure_non_negative("guard chase stop distance", self.guard.chase_stop_distance)?;
        ensure_cone(self.camera.fov_deg, self.camera.range)?;
        ensure_non_negative("camera sweep speed", self.camera.sweep_speed)?;
        ensure_non_negative("alarm duration", self.alarm.duration)?;
        ensure_positive("raycast step spacing", self.raycast.step_spacing)?;
        ensure_non_negative("raycast probe size", self.raycast.probe_size)?;
        ensure_nonzero("raycast min steps", self.raycast.min_steps)?;
        ensure_positive("steal time", self.interaction.steal_time)?;
        ensure_positive("sabotage time", self.interaction.sabotage_time)?;
        ensure_non_negative("hold release decay", self.interaction.hold_release_decay)?;
        ensure_non_negative("hold away decay", self.interaction.hold_away_decay)?;
        ensure_positive("door open time", self.interaction.door_open_time)?;
        ensure_non_negative("door reach", self.interaction.door_reach)?;
        ensure_non_negative("keypad processing time", self.interaction.keypad_processing_time)?;
        ensure_non_negative("keypad penalty", self.interaction.keypad_penalty)?;
        ensure_nonzero("max code length", self.interaction.max_code_len)?;
        Ok(())
    }
}

// ============================================================================
// Sentry Configuration
// ============================================================================

// One patrolling guard. Unset fields take the level's guard tuning.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct GuardConfig {
    pub waypoints: Vec<Point>,
    pub speed: Option<f32>,
    pub pause: Option<f32>,
    pub fov_deg: Option<f32>,
    pub range: Option<f32>,
}

impl GuardConfig {
    #[must_use]
    pub fn patrol(waypoints: &[(f32, f32)]) -> Self {
        Self {
            waypoints: waypoints.iter().map(|&(x, y)| Point { x, y }).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    #[must_use]
    pub fn with_pause(mut self, pause: f32) -> Self {
        self.pause = Some(pause);
        self
    }
}

// Fully resolved guard parameters after merging per-guard overrides with tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardParams {
    pub speed: f32,
    pub chase_multiplier: f32,
    pub pause: f32,
    pub size: f32,
    pub cone: VisionCone,
    pub arrival_epsilon: f32,
    pub chase_stop_distance: f32,
}

impl GuardParams {
    pub fn resolve(config: &GuardConfig, tuning: &GuardTuning) -> Result<Self, ConfigError> {
        Ok(Self {
            speed: ensure_positive("guard speed", config.speed.unwrap_or(tuning.speed))?,
            chase_multiplier: ensure_positive("guard chase multiplier", tuning.chase_multiplier)?,
            pause: ensure_non_negative("guard pause", config.pause.unwrap_or(tuning.pause))?,
            size: ensure_positive("guard size", tuning.size)?,
            cone: ensure_cone(
                config.fov_deg.unwrap_or(tuning.fov_deg),
                config.range.unwrap_or(tuning.range),
            )?,
            arrival_epsilon: ensure_positive("guard arrival epsilon", tuning.arrival_epsilon)?,
            chase_stop_distance: ensure_non_negative("guard chase stop distance", tuning.chase_stop_distance)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct SweepConfig {
    pub min_deg: f32,
    pub max_deg: f32,
    pub speed: Option<f32>,
}

// One camera. Without a sweep it is static.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct CameraConfig {
    pub position: Point,
    pub angle_deg: f32,
    pub sweep: Option<SweepConfig>,
    pub fov_deg: Option<f32>,
    pub range: Option<f32>,
}

impl CameraConfig {
    #[must_use]
    pub const fn fixed(x: f32, y: f32, angle_deg: f32) -> Self {
        Self {
            position: Point { x, y },
            angle_deg,
            sweep: None,
            fov_deg: None,
            range: None,
        }
    }

    #[must_use]
    pub const fn sweeping(x: f32, y: f32, min_deg: f32, max_deg: f32, speed: f32) -> Self {
        Self {
            position: Point { x, y },
            angle_deg: min_deg,
            sweep: Some(SweepConfig {
                min_deg,
                max_deg,
                speed: Some(speed),
            }),
            fov_deg: None,
            range: None,
        }
    }
}
