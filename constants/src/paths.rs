/// Directory under the asset root holding `<name>.tunnel.json` manifests.
pub const SCENE_DIRECTORY: &str = "scenes";

/// Manifest extension registered with the JSON asset loader.
pub const MANIFEST_EXTENSION: &str = "tunnel.json";

pub const DEFAULT_SCENE: &str = "exit_flight";

/// Environment variable selecting the scene on native builds.
pub const SCENE_ENV_VAR: &str = "TUNNEL_SCENE";

/// Query parameter selecting the scene on web builds.
pub const SCENE_QUERY_PARAM: &str = "scene";

pub const TUNNEL_SHADER_PATH: &str = "shaders/tunnel.wgsl";
pub const OCEAN_SHADER_PATH: &str = "shaders/ocean.wgsl";
