//! Tunnel manifests: the JSON scene description and its built-in presets.

/// Control points, cues, camera tuning, visuals and audio for one tunnel.
///
/// Loaded from `scenes/<name>.tunnel.json` through `bevy_common_assets` and
/// validated before a rig is built from it.
pub mod tunnel_manifest;
