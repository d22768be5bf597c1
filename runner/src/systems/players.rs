use bevy_ecs::prelude::*;
use bevy_time::Time;

use crate::resources::{ObstacleMap, Pilot, PlayerIntent};
use common::{components::PlayerBody, markers::PlayerMarker, objectives::VaultPuzzle};

// ============================================================================
// Player Input System
// ============================================================================

// Turn the next scripted step into this tick's intent.
pub fn players_input_system(
    time: Res<Time>,
    mut pilot: ResMut<Pilot>,
    mut intent: ResMut<PlayerIntent>,
    vault: Option<Res<VaultPuzzle>>,
    query: Query<&PlayerBody, With<PlayerMarker>>,
) {
    let Ok(body) = query.single() else {
        return;
    };
    let delta = time.delta_secs();
    let revealed = vault.as_deref().and_then(VaultPuzzle::revealed_code);
    *intent = pilot.0.next_intent(body.center(), body.speed * delta, delta, revealed);
}

// ============================================================================
// Player Movement System
// ============================================================================

pub fn players_movement_system(
    time: Res<Time>,
    obstacles: Res<ObstacleMap>,
    intent: Res<PlayerIntent>,
    mut query: Query<&mut PlayerBody, With<PlayerMarker>>,
) {
    let Ok(mut body) = query.single_mut() else {
        return;
    };
    let throttle = intent.direction.length().min(1.0);
    body.step(intent.direction, obstacles.as_slice(), time.delta_secs() * throttle);
}
