use bevy_ecs::prelude::*;
use bevy_time::Time;
use tracing::info;

use crate::resources::{AlertLog, LevelOutcome, LevelRules, ObstacleMap, Tunables};
use common::{
    alert::{AlertCoordinator, Sighting},
    components::{Detection, Inventory, PlayerBody},
    markers::PlayerMarker,
    objectives::{LevelTimer, in_recording_zone},
    protocol::{Outcome, SentryKind},
    sentries::{Sentry, SentryBehavior, guard_captures},
};

// ============================================================================
// Alarm Timer System
// ============================================================================

pub fn alarm_timer_system(
    time: Res<Time>,
    mut alarm: ResMut<AlertCoordinator>,
    mut log: ResMut<AlertLog>,
    mut sentries: Query<&mut Sentry>,
) {
    let Some(event) = alarm.tick(time.delta_secs()) else {
        return;
    };
    log.0.push(event);
    let changed = alarm.broadcast(event, sentries.iter_mut().map(Mut::into_inner));
    info!("{changed} guards returning to patrol");
}

// ============================================================================
// Capture System
// ============================================================================

// Contact uses post-motion positions of both the player and the guards.
pub fn capture_system(
    players: Query<&PlayerBody, With<PlayerMarker>>,
    sentries: Query<&Sentry>,
    mut outcome: ResMut<LevelOutcome>,
) {
    let Ok(body) = players.single() else {
        return;
    };
    if sentries.iter().any(|sentry| guard_captures(sentry, &body.hitbox)) {
        outcome.settle(Outcome::Captured);
    }
}

// ============================================================================
// Visibility System
// ============================================================================

// Obstacles and the player box are read-only for the whole pass.
pub fn visibility_system(
    tunables: Res<Tunables>,
    obstacles: Res<ObstacleMap>,
    players: Query<&PlayerBody, With<PlayerMarker>>,
    mut sentries: Query<(&Sentry, &mut Detection)>,
) {
    let Ok(body) = players.single() else {
        return;
    };
    let target = body.center();
    let raycast = &tunables.0.raycast;

    for (sentry, mut detection) in &mut sentries {
        detection.sees_player = sentry.can_see(target, obstacles.as_slice(), raycast);
    }
}

// ============================================================================
// Alert Observe System
// ============================================================================

pub fn alert_observe_system(
    rules: Res<LevelRules>,
    mut alarm: ResMut<AlertCoordinator>,
    mut log: ResMut<AlertLog>,
    players: Query<&PlayerBody, With<PlayerMarker>>,
    mut sentries: Query<(&mut Sentry, &Detection)>,
) {
    let mut sighting = Sighting::default();
    for (sentry, detection) in &sentries {
        if !detection.sees_player {
            continue;
        }
        match sentry.kind() {
            SentryKind::Guard => sighting.by_guard = true,
            SentryKind::Camera => sighting.by_camera = true,
        }
    }

    let mut events = alarm.observe(sighting);
    let recorded_in_zone = players
        .single()
        .is_ok_and(|body| in_recording_zone(&body.hitbox, &rules.recording_zones));
    if recorded_in_zone {
        events.extend(alarm.record());
    }

    for &event in &events {
        alarm.broadcast(event, sentries.iter_mut().map(|(sentry, _)| sentry.into_inner()));
    }
    log.0.extend(events);
}

// ============================================================================
// Exit & Countdown Systems
// ============================================================================

pub fn countdown_system(
    time: Res<Time>,
    timer: Option<ResMut<LevelTimer>>,
    mut outcome: ResMut<LevelOutcome>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    if timer.tick(time.delta_secs()) {
        outcome.settle(Outcome::TimedOut);
    }
}

// Carrying the loot into the exit zone ends the level. Levels without an exit
// zone end as soon as the loot is in hand.
pub fn exit_system(
    rules: Res<LevelRules>,
    alarm: Res<AlertCoordinator>,
    players: Query<(&PlayerBody, &Inventory), With<PlayerMarker>>,
    mut outcome: ResMut<LevelOutcome>,
) {
    if outcome.is_settled() {
        return;
    }
    let Ok((body, inventory)) = players.single() else {
        return;
    };

    let has_loot = !rules.requires_objective || inventory.carrying_objective;
    let at_exit = match rules.exit_zone {
        Some(zone) => body.hitbox.overlaps(&zone),
        None => rules.requires_objective,
    };
    if has_loot && at_exit {
        outcome.settle(alarm.resolve_exit(rules.recording_is_fatal));
    }
}
