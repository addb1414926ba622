//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration and plugin
//! initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with materials, manifest loading, the frame driver
/// and platform-specific input sources.
pub mod app_setup;

/// Application state machine: loading the manifest, then running the flight.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
