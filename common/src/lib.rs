pub mod alert;
pub mod collision;
pub mod components;
pub mod config;
pub mod constants;
pub mod map;
pub mod markers;
pub mod objectives;
pub mod protocol;
pub mod sentries;
pub mod vision;
