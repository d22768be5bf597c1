use std::collections::VecDeque;

use bevy_math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::resources::{KeypadInput, PlayerIntent};

// Distance at which a `move_to` step counts as reached.
const ARRIVE_DISTANCE: f32 = 3.0;

// ============================================================================
// Script Format
// ============================================================================

// One scripted player action. Positions refer to the player's center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    MoveTo { x: f32, y: f32 },
    Wait { secs: f32 },
    Hold { secs: f32 },
    Interact,
    // Without a code, types whatever the player found under the mat.
    EnterCode { code: Option<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

// ============================================================================
// Autopilot
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Active {
    MoveTo(Vec2),
    Wait(f32),
    Hold(f32),
}

// Plays a script back as per-tick player intents.
#[derive(Debug, Default)]
pub struct Autopilot {
    steps: VecDeque<Step>,
    active: Option<Active>,
}

impl Autopilot {
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self {
            steps: script.steps.into(),
            active: None,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.active.is_none() && self.steps.is_empty()
    }

    // Produce this tick's intent. `max_step` is how far the player can travel
    // this tick; `revealed_code` is the vault code the player has seen, if any.
    pub fn next_intent(
        &mut self,
        player_center: Vec2,
        max_step: f32,
        delta: f32,
        revealed_code: Option<&str>,
    ) -> PlayerIntent {
        let mut intent = PlayerIntent::default();

        loop {
            let active = match self.active {
                Some(active) => active,
                None => match self.steps.pop_front() {
                    None => return intent,
                    Some(Step::Interact) => {
                        intent.interact = true;
                        return intent;
                    }
                    Some(Step::EnterCode { code }) => {
                        match code.as_deref().or(revealed_code) {
                            Some(code) => {
                                intent.keypad.extend(code.chars().map(KeypadInput::Digit));
                                intent.keypad.push(KeypadInput::Submit);
                            }
                            None => warn!("enter_code step without a known code, skipping"),
                        }
                        return intent;
                    }
                    Some(Step::MoveTo { x, y }) => Active::MoveTo(Vec2::new(x, y)),
                    Some(Step::Wait { secs }) => Active::Wait(secs),
                    Some(Step::Hold { secs }) => Active::Hold(secs),
                },
            };

            match active {
                Active::MoveTo(target) => {
                    let to_target = target - player_center;
                    let distance = to_target.length();
                    if distance <= ARRIVE_DISTANCE {
                        debug!("autopilot reached {target}");
                        self.active = None;
                        continue;
                    }
                    // Ease into the target instead of overshooting it
                    intent.direction = to_target / distance.max(max_step);
                    self.active = Some(active);
                }
                Active::Wait(left) | Active::Hold(left) => {
                    if left <= 0.0 {
                        self.active = None;
                        continue;
                    }
                    intent.action_held = matches!(active, Active::Hold(_));
                    let left = left - delta;
                    self.active = Some(match active {
                        Active::Hold(_) => Active::Hold(left),
                        _ => Active::Wait(left),
                    });
                }
            }
            return intent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let script: Script = serde_json::from_str(
            r#"{ "steps": [
                { "action": "move_to", "x": 10, "y": 20 },
                { "action": "hold", "secs": 2.0 },
                { "action": "interact" },
                { "action": "enter_code" },
                { "action": "enter_code", "code": "1234" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(script.steps[0], Step::MoveTo { x: 10.0, y: 20.0 });
        assert_eq!(script.steps[3], Step::EnterCode { code: None });
        assert_eq!(script.steps.len(), 5);
    }

    #[test]
    fn move_then_hold_then_interact() {
        let mut pilot = Autopilot::new(Script {
            steps: vec![
                Step::MoveTo { x: 100.0, y: 0.0 },
                Step::Hold { secs: 0.5 },
                Step::Interact,
            ],
        });

        let intent = pilot.next_intent(Vec2::ZERO, 50.0, 0.25, None);
        assert_eq!(intent.direction, Vec2::new(1.0, 0.0));

        // close enough to slow down
        let intent = pilot.next_intent(Vec2::new(75.0, 0.0), 50.0, 0.25, None);
        assert_eq!(intent.direction, Vec2::new(0.5, 0.0));

        // arrived: moves straight on to the hold
        let intent = pilot.next_intent(Vec2::new(99.0, 0.0), 50.0, 0.25, None);
        assert!(intent.action_held);
        assert_eq!(intent.direction, Vec2::ZERO);
        assert!(pilot.next_intent(Vec2::new(99.0, 0.0), 50.0, 0.25, None).action_held);

        let intent = pilot.next_intent(Vec2::new(99.0, 0.0), 50.0, 0.25, None);
        assert!(intent.interact);
        assert!(!intent.action_held);
        assert!(pilot.is_finished());
        assert_eq!(pilot.next_intent(Vec2::ZERO, 50.0, 0.25, None), PlayerIntent::default());
    }

    #[test]
    fn enter_code_falls_back_to_revealed_code() {
        let mut pilot = Autopilot::new(Script {
            steps: vec![Step::EnterCode { code: None }, Step::EnterCode { code: None }],
        });
        let intent = pilot.next_intent(Vec2::ZERO, 20.0, 0.1, Some("42"));
        assert_eq!(
            intent.keypad,
            vec![KeypadInput::Digit('4'), KeypadInput::Digit('2'), KeypadInput::Submit]
        );
        assert!(pilot.next_intent(Vec2::ZERO, 20.0, 0.1, None).keypad.is_empty());
    }
}
