//! Shared tuning values for the tunnel flight engine.
//!
//! Defaults here back every optional field of a tunnel manifest, so a scene
//! file only has to spell out what differs from the reference tunnel.

/// Progress smoothing, camera path and cue defaults.
pub mod tunnel;

/// Camera, lighting, fog and scene-dressing settings.
pub mod render_settings;

/// Native scroll and pointer input steps.
pub mod input;

/// Asset locations and scene selection.
pub mod paths;
