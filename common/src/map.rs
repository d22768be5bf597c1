use std::sync::Arc;

use crate::{
    constants::{ARENA_HEIGHT, ARENA_WIDTH, BORDER_THICKNESS},
    objectives::DoorPanel,
    protocol::Rect,
};

// Mansion footprint in the stock heist level
pub const MANSION_RECT: Rect = Rect::new(200.0, 120.0, 600.0, 200.0);
pub const MANSION_WALL: f32 = 16.0;
pub const MANSION_DOOR_WIDTH: f32 = 120.0;

// ============================================================================
// Obstacle Snapshots
// ============================================================================

// Immutable obstacle list for one tick. Cloning shares the same allocation, so
// the door animation can swap whole snapshots without touching readers.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleSet(Arc<[Rect]>);

impl ObstacleSet {
    #[must_use]
    pub fn new(obstacles: Vec<Rect>) -> Self {
        Self(obstacles.into())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Rect] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ObstacleSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

// Four walls framing a `width` x `height` arena.
#[must_use]
pub fn border_walls(width: f32, height: f32, thickness: f32) -> Vec<Rect> {
    vec![
        Rect::new(0.0, 0.0, width, thickness),
        Rect::new(0.0, 0.0, thickness, height),
        Rect::new(0.0, height - thickness, width, thickness),
        Rect::new(width - thickness, 0.0, thickness, height),
    ]
}

// ============================================================================
// Doorway Layout
// ============================================================================

// Walls that never move plus the door frame whose panel comes and goes.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorwayLayout {
    pub static_walls: Vec<Rect>,
    pub door: Rect,
}

impl DoorwayLayout {
    // Obstacle set for the given door panel.
    #[must_use]
    pub fn snapshot(&self, panel: DoorPanel) -> ObstacleSet {
        let mut walls = self.static_walls.clone();
        walls.extend(panel.rect());
        ObstacleSet::new(walls)
    }
}

// The mansion: bordered arena, a walled building with a door centered in its
// bottom wall, and a few pieces of furniture inside and out.
#[must_use]
pub fn mansion_layout() -> DoorwayLayout {
    let m = MANSION_RECT;
    let door = Rect::new(
        m.x + (m.width - MANSION_DOOR_WIDTH) / 2.0,
        m.bottom() - MANSION_WALL,
        MANSION_DOOR_WIDTH,
        MANSION_WALL,
    );

    let mut walls = border_walls(ARENA_WIDTH, ARENA_HEIGHT, BORDER_THICKNESS);
    walls.extend([
        Rect::new(m.x, m.y, m.width, MANSION_WALL),
        Rect::new(m.x, m.y, MANSION_WALL, m.height),
        Rect::new(m.right() - MANSION_WALL, m.y, MANSION_WALL, m.height),
        // bottom wall, split around the door
        Rect::new(m.x, door.y, door.x - m.x, MANSION_WALL),
        Rect::new(door.right(), door.y, m.right() - door.right(), MANSION_WALL),
        // furniture
        Rect::new(340.0, 180.0, 120.0, 20.0),
        Rect::new(520.0, 220.0, 160.0, 20.0),
        Rect::new(420.0, 360.0, 80.0, 120.0),
    ]);

    DoorwayLayout {
        static_walls: walls,
        door,
    }
}
