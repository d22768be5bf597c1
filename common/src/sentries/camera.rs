use bevy_math::Vec2;

use super::{SentryBehavior, SentryContext};
use crate::{
    config::{CameraConfig, CameraTuning, ConfigError, ensure_cone, ensure_finite, ensure_non_negative},
    protocol::{Rect, SentryKind},
    vision::{RaycastConfig, VisionCone, can_see},
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sweep {
    min_deg: f32,
    max_deg: f32,
    speed: f32,
}

// Stationary camera that oscillates between two angles, or holds one.
#[derive(Debug, Clone)]
pub struct SweepCamera {
    position: Vec2,
    angle_deg: f32,
    sweep: Option<Sweep>,
    // +1 toward max_deg, -1 toward min_deg
    direction: f32,
    cone: VisionCone,
}

impl SweepCamera {
    pub fn new(config: &CameraConfig, tuning: &CameraTuning) -> Result<Self, ConfigError> {
        let position = ensure_finite("camera position", config.position.into())?;
        let angle_deg = config.angle_deg;
        if !angle_deg.is_finite() {
            return Err(ConfigError::NonFinite { field: "camera angle" });
        }

        let sweep = match config.sweep {
            None => None,
            Some(s) => {
                if !(s.min_deg.is_finite() && s.max_deg.is_finite()) {
                    return Err(ConfigError::NonFinite { field: "camera sweep bounds" });
                }
                if s.min_deg > s.max_deg {
                    return Err(ConfigError::InvertedSweep {
                        min: s.min_deg,
                        max: s.max_deg,
                    });
                }
                if angle_deg < s.min_deg || angle_deg > s.max_deg {
                    return Err(ConfigError::AngleOutsideSweep {
                        angle: angle_deg,
                        min: s.min_deg,
                        max: s.max_deg,
                    });
                }
                Some(Sweep {
                    min_deg: s.min_deg,
                    max_deg: s.max_deg,
                    speed: ensure_non_negative("camera sweep speed", s.speed.unwrap_or(tuning.sweep_speed))?,
                })
            }
        };

        let cone = ensure_cone(
            config.fov_deg.unwrap_or(tuning.fov_deg),
            config.range.unwrap_or(tuning.range),
        )?;

        Ok(Self {
            position,
            angle_deg,
            sweep,
            direction: 1.0,
            cone,
        })
    }

    #[must_use]
    pub const fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    #[must_use]
    pub const fn sweep_direction(&self) -> f32 {
        self.direction
    }

    #[must_use]
    pub const fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }
}

impl SentryBehavior for SweepCamera {
    fn update(&mut self, delta: f32, _ctx: &SentryContext) {
        let Some(sweep) = self.sweep else {
            return;
        };

        self.angle_deg += self.direction * sweep.speed * delta;
        if self.angle_deg >= sweep.max_deg {
            self.angle_deg = sweep.max_deg;
            self.direction = -1.0;
        } else if self.angle_deg <= sweep.min_deg {
            self.angle_deg = sweep.min_deg;
            self.direction = 1.0;
        }
    }

    fn can_see(&self, target: Vec2, obstacles: &[Rect], raycast: &RaycastConfig) -> bool {
        can_see(self.position, self.angle_deg, &self.cone, target, obstacles, raycast)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn facing_deg(&self) -> f32 {
        self.angle_deg
    }

    fn cone(&self) -> VisionCone {
        self.cone
    }

    fn kind(&self) -> SentryKind {
        SentryKind::Camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;

    const CTX: SentryContext<'static> = SentryContext {
        player_center: Vec2::ZERO,
        obstacles: &[],
    };

    fn camera(config: &CameraConfig) -> SweepCamera {
        SweepCamera::new(config, &CameraTuning::default()).unwrap()
    }

    #[test]
    fn static_camera_never_turns() {
        let mut cam = camera(&CameraConfig::fixed(10.0, 10.0, 135.0));
        for _ in 0..100 {
            cam.update(0.5, &CTX);
        }
        assert_eq!(cam.angle_deg(), 135.0);
        assert!(!cam.is_sweeping());
    }

    #[test]
    fn sweep_bounces_between_bounds() {
        let mut cam = camera(&CameraConfig::sweeping(0.0, 0.0, -30.0, 30.0, 40.0));
        let mut flips = Vec::new();
        let mut last_direction = cam.sweep_direction();
        for _ in 0..400 {
            cam.update(0.1, &CTX);
            assert!((-30.0..=30.0).contains(&cam.angle_deg()));
            if cam.sweep_direction() != last_direction {
                flips.push(cam.angle_deg());
                last_direction = cam.sweep_direction();
            }
        }
        // 40 s at 40 deg/s over a 60 deg arc
        assert!(flips.len() >= 20, "only {} flips", flips.len());
        for (i, angle) in flips.iter().enumerate() {
            let expected = if i % 2 == 0 { 30.0 } else { -30.0 };
            assert_eq!(*angle, expected);
        }
    }

    #[test]
    fn overshoot_is_clamped_on_the_same_tick() {
        let mut cam = camera(&CameraConfig::sweeping(0.0, 0.0, 0.0, 10.0, 40.0));
        cam.update(1.0, &CTX);
        assert_eq!(cam.angle_deg(), 10.0);
        assert_eq!(cam.sweep_direction(), -1.0);
        cam.update(0.125, &CTX);
        assert_eq!(cam.angle_deg(), 5.0);
    }

    #[test]
    fn invalid_sweeps_are_rejected() {
        let tuning = CameraTuning::default();

        let inverted = CameraConfig {
            angle_deg: 10.0,
            sweep: Some(SweepConfig {
                min_deg: 20.0,
                max_deg: -20.0,
                speed: None,
            }),
            ..CameraConfig::default()
        };
        assert_eq!(
            SweepCamera::new(&inverted, &tuning).unwrap_err(),
            ConfigError::InvertedSweep { min: 20.0, max: -20.0 }
        );

        let outside = CameraConfig {
            angle_deg: 45.0,
            ..CameraConfig::sweeping(0.0, 0.0, -20.0, 20.0, 10.0)
        };
        assert!(matches!(
            SweepCamera::new(&outside, &tuning),
            Err(ConfigError::AngleOutsideSweep { .. })
        ));

        let backwards = CameraConfig::sweeping(0.0, 0.0, -20.0, 20.0, -5.0);
        assert!(matches!(SweepCamera::new(&backwards, &tuning), Err(ConfigError::Negative { .. })));
    }

    #[test]
    fn sees_along_its_current_angle() {
        let cam = camera(&CameraConfig::fixed(0.0, 0.0, 90.0));
        let raycast = RaycastConfig::default();
        assert!(cam.can_see(Vec2::new(0.0, 100.0), &[], &raycast));
        assert!(!cam.can_see(Vec2::new(100.0, 0.0), &[], &raycast));
    }
}
