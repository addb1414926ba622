use bevy::prelude::*;

/// Follows the path pose every frame.
#[derive(Component)]
pub struct CameraRig;

/// Child of the rig carrying the pointer look offset and the tunnel camera.
#[derive(Component)]
pub struct LookPivot;

#[derive(Component)]
pub struct TunnelViewCamera;

#[derive(Component)]
pub struct CloseUpCamera;

#[derive(Component)]
pub struct TrackingLight;

#[derive(Component)]
pub struct TunnelSurface;

/// Per-frame Euler increments (x, y, z).
#[derive(Component, Debug, Clone, Copy)]
pub struct ParticleSpin(pub Vec3);

#[derive(Component)]
pub struct Starfield;

#[derive(Component)]
pub struct Planet;
