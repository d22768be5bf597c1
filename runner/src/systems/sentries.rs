use bevy_ecs::prelude::*;
use bevy_time::Time;

use crate::resources::ObstacleMap;
use common::{
    components::PlayerBody,
    markers::PlayerMarker,
    sentries::{Sentry, SentryBehavior, SentryContext},
};

// ============================================================================
// Sentry Movement System
// ============================================================================

// Guards patrol or chase, cameras sweep.
pub fn sentries_movement_system(
    time: Res<Time>,
    obstacles: Res<ObstacleMap>,
    players: Query<&PlayerBody, With<PlayerMarker>>,
    mut sentries: Query<&mut Sentry>,
) {
    let Ok(body) = players.single() else {
        return;
    };
    let ctx = SentryContext {
        player_center: body.center(),
        obstacles: obstacles.as_slice(),
    };
    let delta = time.delta_secs();

    for mut sentry in &mut sentries {
        sentry.update(delta, &ctx);
    }
}
