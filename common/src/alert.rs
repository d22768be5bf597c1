//! Level-wide alarm state.
//!
//! The coordinator turns raw per-tick sightings into the timed alarm, keeps the
//! sticky "recorded" flag raised by cameras, and decides how an exit is
//! classified. Guards learn about alarm changes only through [`AlertCoordinator::broadcast`].

use bevy_ecs::prelude::Resource;
use tracing::info;

use crate::{
    config::{AlarmTuning, ConfigError, ensure_non_negative},
    protocol::{AlarmPhase, AlarmStatus, AlertEvent, EscapeKind, Outcome},
    sentries::Sentry,
};

/// Which kinds of sentry saw the player this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sighting {
    pub by_guard: bool,
    pub by_camera: bool,
}

impl Sighting {
    #[must_use]
    pub const fn any(self) -> bool {
        self.by_guard || self.by_camera
    }
}

#[derive(Resource, Debug, Clone)]
pub struct AlertCoordinator {
    phase: AlarmPhase,
    remaining: f32,
    recorded: bool,
    cameras_disabled: bool,
    alarm_duration: f32,
}

impl Default for AlertCoordinator {
    fn default() -> Self {
        Self {
            phase: AlarmPhase::Calm,
            remaining: 0.0,
            recorded: false,
            cameras_disabled: false,
            alarm_duration: AlarmTuning::default().duration,
        }
    }
}

impl AlertCoordinator {
    pub fn new(tuning: &AlarmTuning) -> Result<Self, ConfigError> {
        Ok(Self {
            alarm_duration: ensure_non_negative("alarm duration", tuning.duration)?,
            ..Self::default()
        })
    }

    /// Feed this tick's detections. Returns the events raised, in order.
    ///
    /// Camera sightings set the recorded flag. Any sighting while calm starts
    /// the alarm with the full duration; sightings during an alarm do not
    /// extend it.
    pub fn observe(&mut self, sighting: Sighting) -> Vec<AlertEvent> {
        let mut events = Vec::new();
        let sighting = Sighting {
            by_camera: sighting.by_camera && !self.cameras_disabled,
            ..sighting
        };

        if sighting.by_camera {
            events.extend(self.record());
        }

        if sighting.any() && self.phase == AlarmPhase::Calm {
            self.phase = AlarmPhase::Alarmed;
            self.remaining = self.alarm_duration;
            info!(
                "alarm raised for {:.1}s (guard: {}, camera: {})",
                self.alarm_duration, sighting.by_guard, sighting.by_camera
            );
            events.push(AlertEvent::AlarmRaised);
        }

        events
    }

    /// Count the alarm down. Yields `AlarmCleared` on the tick it runs out.
    pub fn tick(&mut self, delta: f32) -> Option<AlertEvent> {
        if self.phase != AlarmPhase::Alarmed {
            return None;
        }
        self.remaining -= delta;
        if self.remaining > 0.0 {
            return None;
        }
        self.phase = AlarmPhase::Calm;
        self.remaining = 0.0;
        info!("alarm cleared");
        Some(AlertEvent::AlarmCleared)
    }

    /// Mark the player as recorded without touching the alarm.
    pub fn record(&mut self) -> Option<AlertEvent> {
        if self.recorded {
            return None;
        }
        self.recorded = true;
        info!("player recorded");
        Some(AlertEvent::Recorded)
    }

    /// Sabotage: wipe the footage and take every camera offline.
    pub fn erase_recording(&mut self) -> Option<AlertEvent> {
        if self.cameras_disabled && !self.recorded {
            return None;
        }
        self.recorded = false;
        self.cameras_disabled = true;
        info!("recording erased, cameras disabled");
        Some(AlertEvent::RecordingErased)
    }

    /// Deliver an alarm transition to every guard. Returns how many changed phase.
    pub fn broadcast<'a>(&self, event: AlertEvent, sentries: impl IntoIterator<Item = &'a mut Sentry>) -> usize {
        sentries
            .into_iter()
            .map(|sentry| sentry.on_alert(event))
            .filter(|&changed| changed)
            .count()
    }

    #[must_use]
    pub const fn status(&self) -> AlarmStatus {
        AlarmStatus {
            phase: self.phase,
            remaining_secs: self.remaining,
            recorded: self.recorded,
        }
    }

    #[must_use]
    pub fn is_alarmed(&self) -> bool {
        self.phase == AlarmPhase::Alarmed
    }

    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        self.recorded
    }

    #[must_use]
    pub const fn cameras_disabled(&self) -> bool {
        self.cameras_disabled
    }

    #[must_use]
    pub fn classify_escape(&self) -> EscapeKind {
        if self.recorded {
            EscapeKind::Recorded
        } else if self.is_alarmed() {
            EscapeKind::Alarmed
        } else {
            EscapeKind::Clean
        }
    }

    // Levels where the neighbour's footage ends the heist treat a recorded
    // exit as a loss instead of a tainted escape.
    #[must_use]
    pub fn resolve_exit(&self, recording_is_fatal: bool) -> Outcome {
        if self.recorded && recording_is_fatal {
            Outcome::Recorded
        } else {
            Outcome::Escaped(self.classify_escape())
        }
    }
}
