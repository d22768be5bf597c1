// ============================================================================
// Floating-Point Comparisons
// ============================================================================

// Small value for floating-point comparisons (near-zero checks, division guards).
pub const PHYSICS_EPSILON: f32 = 1e-6;

// Slack on the field-of-view edge so a target exactly on the boundary stays visible.
pub const FOV_ANGLE_TOLERANCE_DEG: f32 = 1e-3;

// ============================================================================
// Arena
// ============================================================================

pub const ARENA_WIDTH: f32 = 1024.0;
pub const ARENA_HEIGHT: f32 = 640.0;
pub const BORDER_THICKNESS: f32 = 16.0;

// ============================================================================
// Player
// ============================================================================

pub const PLAYER_SPEED: f32 = 200.0; // units per second
pub const PLAYER_WIDTH: f32 = 28.0;
pub const PLAYER_HEIGHT: f32 = 36.0;

// Longest single displacement handed to the resolver before it is split into sub-steps.
pub const MAX_COLLISION_STEP: f32 = 8.0;

// ============================================================================
// Guards
// ============================================================================

pub const GUARD_SPEED: f32 = 90.0; // units per second
pub const GUARD_CHASE_MULTIPLIER: f32 = 1.2;
pub const GUARD_PAUSE: f32 = 0.6; // seconds at each waypoint
pub const GUARD_SIZE: f32 = 28.0; // square body
pub const GUARD_FOV_DEG: f32 = 60.0;
pub const GUARD_FOV_RANGE: f32 = 220.0;
pub const GUARD_ARRIVAL_EPSILON: f32 = 2.0;
pub const GUARD_CHASE_STOP_DISTANCE: f32 = 4.0;

// ============================================================================
// Cameras
// ============================================================================

pub const CAMERA_FOV_DEG: f32 = 70.0;
pub const CAMERA_FOV_RANGE: f32 = 260.0;
pub const CAMERA_SWEEP_SPEED: f32 = 40.0; // degrees per second

// ============================================================================
// Alarm
// ============================================================================

pub const ALARM_DURATION: f32 = 12.0; // seconds

// ============================================================================
// Raycast
// ============================================================================

pub const RAYCAST_MIN_STEPS: u32 = 6;
pub const RAYCAST_STEP_SPACING: f32 = 8.0; // one sample per this many units
pub const RAYCAST_PROBE_SIZE: f32 = 4.0; // side of the square probe

// ============================================================================
// Interactions
// ============================================================================

pub const STEAL_TIME: f32 = 2.0; // seconds of holding the action
pub const SABOTAGE_TIME: f32 = 3.0;
pub const HOLD_RELEASE_DECAY: f32 = 1.6; // progress lost per second when released in range
pub const HOLD_AWAY_DECAY: f32 = 0.8; // progress lost per second when out of range

pub const DOOR_OPEN_TIME: f32 = 0.4; // seconds
pub const DOOR_REACH: f32 = 40.0; // inflation of the door rect that counts as "at the door"

pub const KEYPAD_PROCESSING_TIME: f32 = 1.5;
pub const KEYPAD_PENALTY: f32 = 4.0; // seconds taken off the countdown on a wrong code
pub const KEYPAD_MAX_CODE_LEN: usize = 6;
pub const SAFE_REACH: f32 = 28.0;
