pub mod config;
pub mod io;
pub mod levels;
pub mod resources;
pub mod script;
pub mod systems;

use std::{mem, time::Duration};

use anyhow::{Context, Result};
use bevy_ecs::{prelude::*, schedule::ExecutorKind};
use bevy_math::Vec2;
use bevy_time::Time;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;

use crate::{
    levels::{LevelDef, VaultDef},
    resources::{
        AlertLog, Doorway, LevelOutcome, LevelRules, ObstacleMap, Pilot, PlayerIntent, SabotageObjective,
        SnapshotOutbox, StealObjective, TickCounter, Tunables,
    },
    script::{Autopilot, Script},
    systems::{
        alarm_timer_system, alert_observe_system, capture_system, countdown_system, door_system, exit_system,
        players_input_system, players_movement_system, sabotage_system, sentries_movement_system, snapshot_system,
        steal_system, vault_system, visibility_system,
    },
};
use common::{
    alert::AlertCoordinator,
    components::{Detection, Inventory, PlayerBody},
    config::{InteractionTuning, TuningConfig},
    map::{DoorwayLayout, ObstacleSet},
    markers::{PlayerMarker, SentryMarker},
    objectives::{Door, HoldInteraction, LevelTimer, VaultPuzzle},
    protocol::{Outcome, SentryId, TickSnapshot},
    sentries::{PatrolGuard, Sentry, SweepCamera},
};

// ============================================================================
// Simulation
// ============================================================================

// One level loaded into a world, stepped with a fixed schedule.
pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    pub fn new(level: &LevelDef, tuning: TuningConfig, script: Script, seed: u64) -> Result<Self> {
        tuning.validate().context("invalid tuning")?;
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());

        // Obstacles, with the door panel when the level has one
        match level.door {
            Some(frame) => {
                let door = Door::new(frame, &tuning.interaction).context("invalid door")?;
                let layout = DoorwayLayout {
                    static_walls: level.walls.clone(),
                    door: frame,
                };
                world.insert_resource(ObstacleMap(layout.snapshot(door.panel())));
                world.insert_resource(Doorway { door, layout });
            }
            None => {
                world.insert_resource(ObstacleMap(ObstacleSet::new(level.walls.clone())));
            }
        }

        let body = PlayerBody::new(Vec2::from(level.player_spawn), &tuning.player).context("invalid player")?;
        world.spawn((PlayerMarker, body, Inventory::default()));

        let mut next_id = 0;
        for (i, config) in level.guards.iter().enumerate() {
            let guard = PatrolGuard::new(config, &tuning.guard).with_context(|| format!("invalid guard #{i}"))?;
            world.spawn((SentryMarker, SentryId(next_id), Sentry::Guard(guard), Detection::default()));
            next_id += 1;
        }
        for (i, config) in level.cameras.iter().enumerate() {
            let camera = SweepCamera::new(config, &tuning.camera).with_context(|| format!("invalid camera #{i}"))?;
            world.spawn((SentryMarker, SentryId(next_id), Sentry::Camera(camera), Detection::default()));
            next_id += 1;
        }

        world.insert_resource(AlertCoordinator::new(&tuning.alarm).context("invalid alarm tuning")?);

        if let Some(item) = level.objective {
            let hold = HoldInteraction::steal(&tuning.interaction).context("invalid steal tuning")?;
            world.insert_resource(StealObjective { item, hold });
        }
        if let Some(panel) = level.sabotage_panel {
            let hold = HoldInteraction::sabotage(&tuning.interaction).context("invalid sabotage tuning")?;
            world.insert_resource(SabotageObjective { panel, hold });
        }
        if let Some(limit) = level.time_limit {
            world.insert_resource(LevelTimer::new(limit).context("invalid time limit")?);
        }
        if let Some(vault) = &level.vault {
            world.insert_resource(build_vault(vault, &tuning.interaction, seed)?);
        }

        world.insert_resource(LevelRules {
            exit_zone: level.exit_zone,
            recording_zones: level.recording_zones.clone(),
            recording_is_fatal: level.recording_is_fatal,
            requires_objective: level.requires_objective(),
        });
        world.insert_resource(LevelOutcome::default());
        world.insert_resource(AlertLog::default());
        world.insert_resource(SnapshotOutbox::default());
        world.insert_resource(TickCounter::default());
        world.insert_resource(PlayerIntent::default());
        world.insert_resource(Pilot(Autopilot::new(script)));
        world.insert_resource(Tunables(tuning));

        info!(
            "level '{}' loaded: {} guards, {} cameras, {} obstacles",
            level.name,
            level.guards.len(),
            level.cameras.len(),
            world.resource::<ObstacleMap>().0.len()
        );

        Ok(Self {
            world,
            schedule: build_schedule(),
        })
    }

    // Advance one tick. Does nothing once the level has an outcome.
    pub fn step(&mut self, delta: Duration) -> Option<Outcome> {
        if let Some(outcome) = self.outcome() {
            return Some(outcome);
        }
        self.world.resource_mut::<Time>().advance_by(delta);
        self.schedule.run(&mut self.world);
        self.outcome()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.world.resource::<LevelOutcome>().0
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.world.resource::<TickCounter>().tick
    }

    pub fn drain_snapshots(&mut self) -> Vec<TickSnapshot> {
        mem::take(&mut self.world.resource_mut::<SnapshotOutbox>().0)
    }

    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    pub const fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

// Missing code or paper location are drawn from the seed, so a run is
// reproducible.
fn build_vault(vault: &VaultDef, tuning: &InteractionTuning, seed: u64) -> Result<VaultPuzzle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let code = match &vault.code {
        Some(code) => code.clone(),
        None => rng.gen_range(1000..=9999_u32).to_string(),
    };
    let paper_index = match vault.paper_index {
        Some(index) => index,
        None if vault.hiding_spots.is_empty() => 0,
        None => rng.gen_range(0..vault.hiding_spots.len()),
    };
    VaultPuzzle::new(vault.hiding_spots.clone(), paper_index, vault.safe, code, tuning).context("invalid vault")
}

// ============================================================================
// Schedule
// ============================================================================

// Systems run strictly in tick order on one thread. Chaining also flushes
// commands between steps, so sabotaged cameras are gone before sentries move.
#[must_use]
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            // 1. input, player movement and interactions
            (
                players_input_system,
                players_movement_system,
                door_system,
                steal_system,
                sabotage_system,
                vault_system,
            )
                .chain(),
            // 2. sentry motion
            sentries_movement_system,
            // 3. alarm decay and capture
            (alarm_timer_system, capture_system).chain(),
            // 4. visibility against the final player position
            visibility_system,
            // 5. detection, end conditions, snapshot
            (alert_observe_system, countdown_system, exit_system, snapshot_system).chain(),
        )
            .chain(),
    );
    schedule
}
