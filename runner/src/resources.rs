use bevy_ecs::prelude::*;
use bevy_math::Vec2;
use tracing::info;

use common::{
    config::TuningConfig,
    map::{DoorwayLayout, ObstacleSet},
    objectives::{Door, HoldInteraction},
    protocol::{AlertEvent, Outcome, Rect, TickSnapshot},
};

use crate::script::Autopilot;

// ============================================================================
// Level Resources
// ============================================================================

// Obstacle snapshot every system reads this tick. Replaced wholesale when the
// door panel changes.
#[derive(Resource, Debug, Clone, Default)]
pub struct ObstacleMap(pub ObstacleSet);

impl ObstacleMap {
    #[must_use]
    pub fn as_slice(&self) -> &[Rect] {
        self.0.as_slice()
    }
}

// Door state machine together with the walls it is cut into.
#[derive(Resource, Debug, Clone)]
pub struct Doorway {
    pub door: Door,
    pub layout: DoorwayLayout,
}

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Tunables(pub TuningConfig);

// What the player wants to do this tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlayerIntent {
    // Stick-style: a length of 1 or more is full speed, shorter is slower.
    pub direction: Vec2,
    // One-shot press: open doors, look under mats, start typing at the safe.
    pub interact: bool,
    // Held action for steal and sabotage.
    pub action_held: bool,
    pub keypad: Vec<KeypadInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadInput {
    Digit(char),
    Backspace,
    Submit,
    Cancel,
}

#[derive(Resource, Debug)]
pub struct Pilot(pub Autopilot);

// The item to steal and the progress bar for taking it.
#[derive(Resource, Debug, Clone)]
pub struct StealObjective {
    pub item: Rect,
    pub hold: HoldInteraction,
}

// Control panel that wipes the footage and takes the cameras offline.
#[derive(Resource, Debug, Clone)]
pub struct SabotageObjective {
    pub panel: Rect,
    pub hold: HoldInteraction,
}

// Static win/lose rules of the level.
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelRules {
    pub exit_zone: Option<Rect>,
    pub recording_zones: Vec<Rect>,
    pub recording_is_fatal: bool,
    pub requires_objective: bool,
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelOutcome(pub Option<Outcome>);

impl LevelOutcome {
    // The first outcome of a run sticks.
    pub fn settle(&mut self, outcome: Outcome) -> bool {
        if self.0.is_some() {
            return false;
        }
        info!(?outcome, "level finished");
        self.0 = Some(outcome);
        true
    }

    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.0.is_some()
    }
}

// Alert events raised during the current tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct AlertLog(pub Vec<AlertEvent>);

// Snapshots waiting to be handed to the writer task.
#[derive(Resource, Debug, Default)]
pub struct SnapshotOutbox(pub Vec<TickSnapshot>);

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct TickCounter {
    pub tick: u64,
    pub elapsed: f32,
}
