use bevy_ecs::prelude::Resource;
use tracing::{debug, info};

use crate::{
    config::{ConfigError, InteractionTuning, ensure_non_negative, ensure_positive, ensure_rect},
    constants::SAFE_REACH,
    protocol::Rect,
};

// ============================================================================
// Hold Interaction
// ============================================================================

// Progress bar that fills while an action is held in range and drains
// otherwise. Used for stealing the objective and sabotaging the cameras.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldInteraction {
    required: f32,
    progress: f32,
    release_decay: f32,
    away_decay: f32,
    completed: bool,
}

impl HoldInteraction {
    pub fn new(required: f32, release_decay: f32, away_decay: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            required: ensure_positive("hold duration", required)?,
            progress: 0.0,
            release_decay: ensure_non_negative("hold release decay", release_decay)?,
            away_decay: ensure_non_negative("hold away decay", away_decay)?,
            completed: false,
        })
    }

    pub fn steal(tuning: &InteractionTuning) -> Result<Self, ConfigError> {
        Self::new(tuning.steal_time, tuning.hold_release_decay, tuning.hold_away_decay)
    }

    pub fn sabotage(tuning: &InteractionTuning) -> Result<Self, ConfigError> {
        Self::new(tuning.sabotage_time, tuning.hold_release_decay, tuning.hold_away_decay)
    }

    // Returns true only on the tick the interaction completes.
    pub fn update(&mut self, delta: f32, in_range: bool, held: bool) -> bool {
        if self.completed {
            return false;
        }

        self.progress = match (in_range, held) {
            (true, true) => self.progress + delta,
            (true, false) => delta.mul_add(-self.release_decay, self.progress),
            (false, _) => delta.mul_add(-self.away_decay, self.progress),
        }
        .max(0.0);

        if self.progress >= self.required {
            self.progress = self.required;
            self.completed = true;
        }
        self.completed
    }

    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.progress / self.required
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed
    }
}

// ============================================================================
// Door
// ============================================================================

// Obstacle contributed by the door for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoorPanel {
    Solid(Rect),
    Gone,
}

impl DoorPanel {
    #[must_use]
    pub const fn rect(self) -> Option<Rect> {
        match self {
            Self::Solid(rect) => Some(rect),
            Self::Gone => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoorState {
    Closed,
    Opening(f32),
    Open,
}

#[derive(Resource, Debug, Clone)]
pub struct Door {
    frame: Rect,
    reach: f32,
    open_time: f32,
    state: DoorState,
    visible_height: f32,
}

impl Door {
    pub fn new(frame: Rect, tuning: &InteractionTuning) -> Result<Self, ConfigError> {
        let frame = ensure_rect("door", frame)?;
        Ok(Self {
            frame,
            reach: ensure_non_negative("door reach", tuning.door_reach)?,
            open_time: ensure_positive("door open time", tuning.door_open_time)?,
            state: DoorState::Closed,
            visible_height: frame.height,
        })
    }

    #[must_use]
    pub const fn state(&self) -> DoorState {
        self.state
    }

    // Starts the opening animation if the player stands close enough.
    pub fn request_open(&mut self, player_hitbox: &Rect) -> bool {
        if self.state != DoorState::Closed {
            return false;
        }
        if !player_hitbox.overlaps(&self.frame.inflate(self.reach, self.reach)) {
            return false;
        }
        info!("door opening");
        self.state = DoorState::Opening(0.0);
        true
    }

    // Advance the animation. Yields a panel whenever the blocking shape changes.
    pub fn update(&mut self, delta: f32) -> Option<DoorPanel> {
        let DoorState::Opening(progress) = self.state else {
            return None;
        };

        let progress = progress + delta / self.open_time;
        let height = (self.frame.height * (1.0 - progress)).floor();
        if progress >= 1.0 || height <= 0.0 {
            debug!("door fully open");
            self.state = DoorState::Open;
            self.visible_height = 0.0;
            return Some(DoorPanel::Gone);
        }

        self.state = DoorState::Opening(progress);
        if height == self.visible_height {
            return None;
        }
        self.visible_height = height;
        Some(self.panel())
    }

    // The panel slides down into the floor: its bottom edge stays put.
    #[must_use]
    pub fn panel(&self) -> DoorPanel {
        if self.visible_height <= 0.0 {
            return DoorPanel::Gone;
        }
        DoorPanel::Solid(Rect::new(
            self.frame.x,
            self.frame.bottom() - self.visible_height,
            self.frame.width,
            self.visible_height,
        ))
    }
}

// ============================================================================
// Level Countdown
// ============================================================================

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct LevelTimer {
    remaining: f32,
}

impl LevelTimer {
    pub fn new(seconds: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            remaining: ensure_positive("level time limit", seconds)?,
        })
    }

    // Returns true once time has run out.
    pub fn tick(&mut self, delta: f32) -> bool {
        self.remaining = (self.remaining - delta).max(0.0);
        self.is_expired()
    }

    pub fn penalize(&mut self, seconds: f32) {
        self.remaining = (self.remaining - seconds).max(0.0);
    }

    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

// ============================================================================
// Vault Keypad
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeypadState {
    Idle,
    Entering,
    Processing { elapsed: f32 },
    Unlocked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VaultEvent {
    CodeRevealed,
    EntryStarted,
    EntryCancelled,
    Submitted,
    Unlocked,
    Rejected { penalty: f32 },
}

// Hidden paper with the safe's code under one of several mats, and a keypad
// that takes a while to check what was typed.
#[derive(Resource, Debug, Clone)]
pub struct VaultPuzzle {
    hiding_spots: Vec<Rect>,
    paper_index: usize,
    code: String,
    safe: Rect,
    seen_code: bool,
    typed: String,
    state: KeypadState,
    processing_time: f32,
    penalty: f32,
    max_code_len: usize,
}

impl VaultPuzzle {
    pub fn new(
        hiding_spots: Vec<Rect>,
        paper_index: usize,
        safe: Rect,
        code: String,
        tuning: &InteractionTuning,
    ) -> Result<Self, ConfigError> {
        if paper_index >= hiding_spots.len() {
            return Err(ConfigError::HidingSpot {
                index: paper_index,
                count: hiding_spots.len(),
            });
        }
        for spot in &hiding_spots {
            ensure_rect("hiding spot", *spot)?;
        }
        let valid_code = !code.is_empty()
            && code.len() <= tuning.max_code_len
            && code.chars().all(|c| c.is_ascii_digit());
        if !valid_code {
            return Err(ConfigError::InvalidCode {
                code,
                max_len: tuning.max_code_len,
            });
        }

        Ok(Self {
            hiding_spots,
            paper_index,
            code,
            safe: ensure_rect("safe", safe)?,
            seen_code: false,
            typed: String::new(),
            state: KeypadState::Idle,
            processing_time: ensure_non_negative("keypad processing time", tuning.keypad_processing_time)?,
            penalty: ensure_non_negative("keypad penalty", tuning.keypad_penalty)?,
            max_code_len: tuning.max_code_len,
        })
    }

    #[must_use]
    pub fn hiding_spots(&self) -> &[Rect] {
        &self.hiding_spots
    }

    #[must_use]
    pub const fn safe(&self) -> Rect {
        self.safe
    }

    #[must_use]
    pub const fn state(&self) -> KeypadState {
        self.state
    }

    #[must_use]
    pub fn typed(&self) -> &str {
        &self.typed
    }

    // The code, once the player has found the paper.
    #[must_use]
    pub fn revealed_code(&self) -> Option<&str> {
        self.seen_code.then_some(self.code.as_str())
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.state == KeypadState::Unlocked
    }

    #[must_use]
    pub fn near_safe(&self, player_hitbox: &Rect) -> bool {
        player_hitbox.overlaps(&self.safe.inflate(SAFE_REACH, SAFE_REACH))
    }

    // Look under whatever mat the player stands on.
    pub fn search(&mut self, player_hitbox: &Rect) -> Option<VaultEvent> {
        if self.seen_code || !player_hitbox.overlaps(&self.hiding_spots[self.paper_index]) {
            return None;
        }
        info!("vault code found under mat {}", self.paper_index);
        self.seen_code = true;
        Some(VaultEvent::CodeRevealed)
    }

    pub fn begin_entry(&mut self, player_hitbox: &Rect) -> Option<VaultEvent> {
        if !self.seen_code || self.state != KeypadState::Idle || !self.near_safe(player_hitbox) {
            return None;
        }
        self.typed.clear();
        self.state = KeypadState::Entering;
        Some(VaultEvent::EntryStarted)
    }

    // Digits beyond the keypad's capacity are dropped.
    pub fn type_digit(&mut self, digit: char) -> bool {
        if self.state != KeypadState::Entering || !digit.is_ascii_digit() || self.typed.len() >= self.max_code_len {
            return false;
        }
        self.typed.push(digit);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.state == KeypadState::Entering && self.typed.pop().is_some()
    }

    pub fn cancel(&mut self) -> Option<VaultEvent> {
        if self.state != KeypadState::Entering {
            return None;
        }
        self.state = KeypadState::Idle;
        Some(VaultEvent::EntryCancelled)
    }

    pub fn submit(&mut self) -> Option<VaultEvent> {
        if self.state != KeypadState::Entering {
            return None;
        }
        debug!("keypad checking {} digits", self.typed.len());
        self.state = KeypadState::Processing { elapsed: 0.0 };
        Some(VaultEvent::Submitted)
    }

    pub fn update(&mut self, delta: f32) -> Option<VaultEvent> {
        let KeypadState::Processing { elapsed } = self.state else {
            return None;
        };
        let elapsed = elapsed + delta;
        if elapsed < self.processing_time {
            self.state = KeypadState::Processing { elapsed };
            return None;
        }

        if self.typed == self.code {
            info!("vault unlocked");
            self.state = KeypadState::Unlocked;
            Some(VaultEvent::Unlocked)
        } else {
            info!("wrong vault code, {}s penalty", self.penalty);
            self.typed.clear();
            self.state = KeypadState::Idle;
            Some(VaultEvent::Rejected { penalty: self.penalty })
        }
    }
}

// ============================================================================
// Recording Zones
// ============================================================================

// Static areas covered by someone else's camera. Entering one records the
// player without raising the alarm.
#[must_use]
pub fn in_recording_zone(player_hitbox: &Rect, zones: &[Rect]) -> bool {
    zones.iter().any(|zone| player_hitbox.overlaps(zone))
}
