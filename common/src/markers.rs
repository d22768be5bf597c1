use bevy_ecs::prelude::*;

// Marker components to disambiguate entity archetypes in the level world.
#[derive(Component, Debug, Default)]
pub struct PlayerMarker;

#[derive(Component, Debug, Default)]
pub struct SentryMarker;
