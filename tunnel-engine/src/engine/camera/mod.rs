//! Camera behaviour for the tunnel flight.
//!
//! The path camera is pure math driven by progress; systems in
//! `engine::systems::frame_driver` copy its output onto Bevy transforms.

/// Path-following camera: on-path sampling, exit flight and the scene switch.
pub mod tunnel_camera;

/// Pointer-driven yaw/pitch offset layered on top of the path camera.
pub mod look_offset;

/// Slow orbit used by the close-up scene camera.
pub mod orbit;

pub use look_offset::{LookOffset, LookOffsetSettings};
pub use orbit::{OrbitSettings, orbit_pose};
pub use tunnel_camera::{
    ActiveScene, CameraFrame, CameraPathSettings, CameraPose, PoseRegime, TunnelCamera,
};
