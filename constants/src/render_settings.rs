use bevy::prelude::*;

/// Render layer of the close-up ocean scene. The tunnel lives on layer 0.
pub const CLOSE_UP_LAYER: usize = 1;

pub const TUNNEL_FOV_DEGREES: f32 = 45.0;
pub const CLOSE_UP_FOV_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.001;
pub const CAMERA_FAR: f32 = 1200.0;

/// Range of the point light that rides just ahead of the camera.
pub const TRACKING_LIGHT_RANGE: f32 = 4.0;

pub const CLOSE_UP_ORBIT_RADIUS: f32 = 30.0;
pub const CLOSE_UP_ORBIT_HEIGHT: f32 = 15.0;
pub const CLOSE_UP_ORBIT_SPEED: f32 = 0.3;
pub const CLOSE_UP_FOG_COLOR: Color = Color::srgb(0.0, 0.051, 0.102);
pub const CLOSE_UP_FOG_START: f32 = 1.0;
pub const CLOSE_UP_FOG_END: f32 = 100.0;
pub const CLOSE_UP_PLANE_SIZE: f32 = 400.0;
pub const CLOSE_UP_MARKER_RADIUS: f32 = 10.0;
pub const CLOSE_UP_MARKER_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);

pub const STARFIELD_COUNT: usize = 5000;
pub const STARFIELD_INNER_RADIUS: f32 = 400.0;
pub const STARFIELD_OUTER_RADIUS: f32 = 1000.0;

/// Distance past the tunnel mouth at which the planet hangs.
pub const PLANET_DISTANCE: f32 = 40.0;
pub const PLANET_RADIUS: f32 = 4.0;
pub const PLANET_SPIN_PER_FRAME: f32 = 0.01;

/// Seed for particle and starfield placement, so every run looks the same.
pub const SCENE_SEED: u64 = 0x7475_6e6e_656c;

/// Samples used when sweeping the tube cross-section along the path.
pub const FRAME_SAMPLES: usize = 512;

pub const FPS_NOTIFY_INTERVAL_SECS: f32 = 0.5;

/// Cue overlay text size and the gap kept from the bottom of the window.
pub const CUE_FONT_SIZE: f32 = 28.0;
pub const CUE_BOTTOM_MARGIN_PX: f32 = 64.0;
