pub mod alert;
pub mod objectives;
pub mod players;
pub mod sentries;
pub mod snapshot;

pub use alert::{alarm_timer_system, alert_observe_system, capture_system, countdown_system, exit_system, visibility_system};
pub use objectives::{door_system, sabotage_system, steal_system, vault_system};
pub use players::{players_input_system, players_movement_system};
pub use sentries::sentries_movement_system;
pub use snapshot::snapshot_system;
