pub mod helpers;
pub mod obstacles;
pub mod sentries;

pub use obstacles::{move_box, resolve_axis};
pub use sentries::overlap_guard_vs_player;
