use std::mem;

use bevy_ecs::prelude::*;
use bevy_time::Time;

use crate::resources::{AlertLog, LevelOutcome, SabotageObjective, SnapshotOutbox, StealObjective, TickCounter};
use common::{
    alert::AlertCoordinator,
    components::{Detection, Inventory, PlayerBody},
    markers::PlayerMarker,
    objectives::{HoldInteraction, LevelTimer},
    protocol::{PlayerState, SentryId, TickSnapshot},
    sentries::Sentry,
};

// ============================================================================
// Snapshot System
// ============================================================================

// Hold bar shown to the player: whichever unfinished hold is furthest along.
fn hold_progress(steal: Option<&StealObjective>, sabotage: Option<&SabotageObjective>) -> f32 {
    [steal.map(|s| &s.hold), sabotage.map(|s| &s.hold)]
        .into_iter()
        .flatten()
        .filter(|hold| !hold.is_complete())
        .map(HoldInteraction::fraction)
        .fold(0.0, f32::max)
}

// Runs last so the snapshot carries this tick's final state.
pub fn snapshot_system(
    time: Res<Time>,
    alarm: Res<AlertCoordinator>,
    outcome: Res<LevelOutcome>,
    timer: Option<Res<LevelTimer>>,
    steal: Option<Res<StealObjective>>,
    sabotage: Option<Res<SabotageObjective>>,
    mut counter: ResMut<TickCounter>,
    mut log: ResMut<AlertLog>,
    mut outbox: ResMut<SnapshotOutbox>,
    players: Query<(&PlayerBody, &Inventory), With<PlayerMarker>>,
    sentries: Query<(&SentryId, &Sentry, &Detection)>,
) {
    let Ok((body, inventory)) = players.single() else {
        return;
    };

    counter.tick += 1;
    counter.elapsed += time.delta_secs();

    let mut states: Vec<_> = sentries
        .iter()
        .map(|(id, sentry, detection)| sentry.state(*id, detection.sees_player))
        .collect();
    states.sort_by_key(|state| state.id.0);

    outbox.0.push(TickSnapshot {
        tick: counter.tick,
        elapsed_secs: counter.elapsed,
        player: PlayerState {
            hitbox: body.hitbox,
            carrying_objective: inventory.carrying_objective,
            hold_progress: hold_progress(steal.as_deref(), sabotage.as_deref()),
        },
        sentries: states,
        alarm: alarm.status(),
        time_remaining: timer.map(|timer| timer.remaining()),
        events: mem::take(&mut log.0),
        outcome: outcome.0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{config::InteractionTuning, protocol::Rect};

    #[test]
    fn hold_progress_picks_the_unfinished_hold() {
        let tuning = InteractionTuning::default();
        let mut steal = StealObjective {
            item: Rect::new(0.0, 0.0, 10.0, 10.0),
            hold: HoldInteraction::steal(&tuning).unwrap(),
        };
        let mut sabotage = SabotageObjective {
            panel: Rect::new(0.0, 0.0, 10.0, 10.0),
            hold: HoldInteraction::sabotage(&tuning).unwrap(),
        };
        assert_eq!(hold_progress(None, None), 0.0);

        sabotage.hold.update(1.5, true, true);
        assert_eq!(hold_progress(Some(&steal), Some(&sabotage)), 0.5);

        // a finished hold no longer shows a bar
        steal.hold.update(2.0, true, true);
        assert!(steal.hold.is_complete());
        assert_eq!(hold_progress(Some(&steal), None), 0.0);
    }
}
