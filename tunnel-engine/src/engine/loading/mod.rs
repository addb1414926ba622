//! Scene loading: resolves which tunnel to fly and installs its runtime state.

/// Tunnel manifest loading with preset fallback.
///
/// Picks the scene name, loads `scenes/<name>.tunnel.json` and inserts the
/// validated manifest and rig before switching to the running state.
pub mod manifest_loader;
