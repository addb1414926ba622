//! Runtime systems that run once the tunnel is loaded.

/// Steps the tunnel rig each frame and applies the snapshot to the scene.
pub mod frame_driver;

/// FPS tracking: RPC notifications for the host page, text overlay natively.
pub mod fps_tracking;

/// Cue captions and the FPS counter for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub mod overlays;
