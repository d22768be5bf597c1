use bevy_ecs::prelude::*;
use bevy_time::Time;
use tracing::{debug, info};

use crate::resources::{AlertLog, Doorway, KeypadInput, ObstacleMap, PlayerIntent, SabotageObjective, StealObjective};
use common::{
    alert::AlertCoordinator,
    components::{Inventory, PlayerBody},
    markers::PlayerMarker,
    objectives::{LevelTimer, VaultEvent, VaultPuzzle},
    protocol::SentryKind,
    sentries::{Sentry, SentryBehavior},
};

// ============================================================================
// Door System
// ============================================================================

// Open the door on request and swap in a fresh obstacle snapshot whenever the
// panel changes shape.
pub fn door_system(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    doorway: Option<ResMut<Doorway>>,
    mut obstacles: ResMut<ObstacleMap>,
    query: Query<&PlayerBody, With<PlayerMarker>>,
) {
    let Some(mut doorway) = doorway else {
        return;
    };
    let Ok(body) = query.single() else {
        return;
    };

    if intent.interact {
        doorway.door.request_open(&body.hitbox);
    }
    if let Some(panel) = doorway.door.update(time.delta_secs()) {
        obstacles.0 = doorway.layout.snapshot(panel);
        debug!(?panel, obstacles = obstacles.0.len(), "door panel changed");
    }
}

// ============================================================================
// Steal System
// ============================================================================

pub fn steal_system(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    objective: Option<ResMut<StealObjective>>,
    mut query: Query<(&PlayerBody, &mut Inventory), With<PlayerMarker>>,
) {
    let Some(mut objective) = objective else {
        return;
    };
    let Ok((body, mut inventory)) = query.single_mut() else {
        return;
    };

    let in_range = body.hitbox.overlaps(&objective.item);
    if objective.hold.update(time.delta_secs(), in_range, intent.action_held) {
        info!("objective stolen");
        inventory.carrying_objective = true;
    }
}

// ============================================================================
// Sabotage System
// ============================================================================

// Completing the sabotage wipes the footage and takes every camera in the
// level offline.
pub fn sabotage_system(
    mut commands: Commands,
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    sabotage: Option<ResMut<SabotageObjective>>,
    mut alarm: ResMut<AlertCoordinator>,
    mut log: ResMut<AlertLog>,
    players: Query<&PlayerBody, With<PlayerMarker>>,
    sentries: Query<(Entity, &Sentry)>,
) {
    let Some(mut sabotage) = sabotage else {
        return;
    };
    let Ok(body) = players.single() else {
        return;
    };

    let in_range = body.hitbox.overlaps(&sabotage.panel);
    if !sabotage.hold.update(time.delta_secs(), in_range, intent.action_held) {
        return;
    }

    log.0.extend(alarm.erase_recording());
    let mut disabled = 0;
    for (entity, sentry) in &sentries {
        if sentry.kind() == SentryKind::Camera {
            commands.entity(entity).despawn();
            disabled += 1;
        }
    }
    info!("sabotage complete, {disabled} cameras offline");
}

// ============================================================================
// Vault System
// ============================================================================

pub fn vault_system(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    vault: Option<ResMut<VaultPuzzle>>,
    timer: Option<ResMut<LevelTimer>>,
    mut query: Query<(&PlayerBody, &mut Inventory), With<PlayerMarker>>,
) {
    let Some(mut vault) = vault else {
        return;
    };
    let Ok((body, mut inventory)) = query.single_mut() else {
        return;
    };

    if intent.interact {
        vault.search(&body.hitbox);
        vault.begin_entry(&body.hitbox);
    }

    for input in &intent.keypad {
        match *input {
            KeypadInput::Digit(digit) => {
                vault.type_digit(digit);
            }
            KeypadInput::Backspace => {
                vault.backspace();
            }
            KeypadInput::Submit => {
                vault.submit();
            }
            KeypadInput::Cancel => {
                vault.cancel();
            }
        }
    }

    match vault.update(time.delta_secs()) {
        Some(VaultEvent::Unlocked) => inventory.carrying_objective = true,
        Some(VaultEvent::Rejected { penalty }) => {
            if let Some(mut timer) = timer {
                timer.penalize(penalty);
            }
        }
        _ => {}
    }
}
