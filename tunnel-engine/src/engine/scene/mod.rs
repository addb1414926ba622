//! Scene assembly for the tunnel flight.
//!
//! Builds the tube mesh, particle fields, starfield, planet and the close-up
//! ocean scene once the manifest is ready.

/// Marker components tying spawned entities to the systems that animate them.
pub mod components;

/// Tube mesh swept along the path with parallel-transport frames.
pub mod tube;

/// Seeded point clouds: particle fields and the starfield shell.
pub mod particles;

/// Ocean plane, marker sphere, light and orbit camera on the close-up layer.
pub mod close_up;

/// `OnEnter(AppState::Running)` system spawning everything above.
pub mod setup;
