use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use common::{
    config::{CameraConfig, GuardConfig},
    constants::{ARENA_HEIGHT, ARENA_WIDTH, BORDER_THICKNESS},
    map::{border_walls, mansion_layout},
    protocol::{Point, Rect},
};

// ============================================================================
// Level Definition
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultDef {
    pub hiding_spots: Vec<Rect>,
    pub safe: Rect,
    // Fixed code and paper location; picked from the run seed when absent.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub paper_index: Option<usize>,
}

// Everything needed to set up one level. `walls` excludes the door panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDef {
    pub name: String,
    // Top-left corner of the player's hitbox.
    pub player_spawn: Point,
    pub walls: Vec<Rect>,
    pub door: Option<Rect>,
    pub guards: Vec<GuardConfig>,
    pub cameras: Vec<CameraConfig>,
    pub objective: Option<Rect>,
    pub sabotage_panel: Option<Rect>,
    pub exit_zone: Option<Rect>,
    pub recording_zones: Vec<Rect>,
    pub recording_is_fatal: bool,
    pub time_limit: Option<f32>,
    pub vault: Option<VaultDef>,
}

impl Default for LevelDef {
    fn default() -> Self {
        Self {
            name: "custom".to_string(),
            player_spawn: Point { x: 40.0, y: 40.0 },
            walls: border_walls(ARENA_WIDTH, ARENA_HEIGHT, BORDER_THICKNESS),
            door: None,
            guards: Vec::new(),
            cameras: Vec::new(),
            objective: None,
            sabotage_panel: None,
            exit_zone: None,
            recording_zones: Vec::new(),
            recording_is_fatal: false,
            time_limit: None,
            vault: None,
        }
    }
}

impl LevelDef {
    // A level is won by carrying something out when it has anything to carry.
    #[must_use]
    pub const fn requires_objective(&self) -> bool {
        self.objective.is_some() || self.vault.is_some()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("failed to read level file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse level file {}", path.display()))
    }

    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            "mansion" => Ok(mansion()),
            "gallery" => Ok(gallery()),
            "vault" => Ok(vault()),
            other => bail!("unknown level '{other}' (expected mansion, gallery or vault)"),
        }
    }
}

// ============================================================================
// Builtin Levels
// ============================================================================

// Steal the statue from the mansion and get back to the start. The neighbour's
// kid films the back garden; being filmed means getting arrested later.
#[must_use]
pub fn mansion() -> LevelDef {
    let layout = mansion_layout();
    LevelDef {
        name: "mansion".to_string(),
        player_spawn: Point { x: 100.0, y: 320.0 },
        walls: layout.static_walls,
        door: Some(layout.door),
        guards: vec![
            GuardConfig::patrol(&[(500.0, 60.0), (780.0, 60.0), (780.0, 300.0), (500.0, 300.0)]),
            GuardConfig::patrol(&[(260.0, 200.0), (420.0, 200.0), (420.0, 320.0), (260.0, 320.0)]).with_speed(75.0),
        ],
        objective: Some(Rect::new(600.0, 250.0, 34.0, 34.0)),
        exit_zone: Some(Rect::new(60.0, 60.0, 120.0, 120.0)),
        recording_zones: vec![Rect::new(120.0, 500.0, 160.0, 120.0)],
        recording_is_fatal: true,
        ..LevelDef::default()
    }
}

// Open hall watched by cameras. The control panel in the corner wipes the
// footage; a recorded exit still counts, but it taints the escape.
#[must_use]
pub fn gallery() -> LevelDef {
    let mut walls = border_walls(ARENA_WIDTH, ARENA_HEIGHT, BORDER_THICKNESS);
    walls.extend([
        Rect::new(300.0, 16.0, 20.0, 260.0),
        Rect::new(300.0, 380.0, 20.0, 244.0),
        Rect::new(620.0, 200.0, 20.0, 240.0),
    ]);
    LevelDef {
        name: "gallery".to_string(),
        player_spawn: Point { x: 60.0, y: 300.0 },
        walls,
        guards: vec![GuardConfig::patrol(&[(460.0, 120.0), (460.0, 520.0)]).with_pause(1.0)],
        cameras: vec![
            CameraConfig::sweeping(800.0, 40.0, 60.0, 150.0, 35.0),
            CameraConfig::fixed(990.0, 600.0, -135.0),
        ],
        objective: Some(Rect::new(900.0, 300.0, 34.0, 34.0)),
        sabotage_panel: Some(Rect::new(40.0, 560.0, 40.0, 40.0)),
        exit_zone: Some(Rect::new(16.0, 100.0, 80.0, 120.0)),
        ..LevelDef::default()
    }
}

// Find the code under one of the mats and open the safe before time runs out.
#[must_use]
pub fn vault() -> LevelDef {
    let mut walls = vec![Rect::new(300.0, 20.0, 20.0, 400.0), Rect::new(600.0, 200.0, 400.0, 20.0)];
    walls.extend(border_walls(ARENA_WIDTH, ARENA_HEIGHT, BORDER_THICKNESS));
    LevelDef {
        name: "vault".to_string(),
        player_spawn: Point { x: 50.0, y: 50.0 },
        walls,
        time_limit: Some(45.0),
        vault: Some(VaultDef {
            hiding_spots: vec![
                Rect::new(150.0, 420.0, 40.0, 24.0),
                Rect::new(260.0, 440.0, 40.0, 24.0),
                Rect::new(380.0, 410.0, 40.0, 24.0),
                Rect::new(520.0, 380.0, 40.0, 24.0),
                Rect::new(720.0, 430.0, 40.0, 24.0),
            ],
            safe: Rect::new(500.0, 500.0, 50.0, 50.0),
            code: None,
            paper_index: None,
        }),
        ..LevelDef::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::collision::helpers::overlaps_any;

    #[test]
    fn builtin_levels_resolve_by_name() {
        for name in ["mansion", "gallery", "vault"] {
            assert_eq!(LevelDef::builtin(name).unwrap().name, name);
        }
        assert!(LevelDef::builtin("attic").is_err());
    }

    #[test]
    fn spawns_are_clear_of_walls() {
        for level in [mansion(), gallery(), vault()] {
            let hitbox = Rect::new(level.player_spawn.x, level.player_spawn.y, 28.0, 36.0);
            assert!(!overlaps_any(&hitbox, &level.walls), "{} spawn is inside a wall", level.name);
        }
    }

    #[test]
    fn level_file_fields_are_optional() {
        let level: LevelDef = serde_json::from_str(
            r#"{ "name": "tiny", "guards": [ { "waypoints": [ { "x": 100, "y": 100 } ] } ] }"#,
        )
        .unwrap();
        assert_eq!(level.guards.len(), 1);
        assert_eq!(level.walls.len(), 4);
        assert!(!level.requires_objective());
    }
}
