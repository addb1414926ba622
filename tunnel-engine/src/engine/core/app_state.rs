use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Resource)]
pub enum AppState {
    /// Waiting for the tunnel manifest.
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;
