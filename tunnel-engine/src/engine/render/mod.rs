//! Custom materials for the tunnel surface and the close-up ocean.

/// `TunnelMaterial` and `OceanMaterial` with their shader bindings.
pub mod materials;
