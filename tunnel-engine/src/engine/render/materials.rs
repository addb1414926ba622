use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};
use constants::paths::{OCEAN_SHADER_PATH, TUNNEL_SHADER_PATH};

/// Tube surface: repeating texture, vertex wobble along the normals and
/// distance fog.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct TunnelMaterial {
    /// x: elapsed seconds, y: displacement amplitude, zw: uv repeat.
    #[uniform(0)]
    pub params: Vec4,

    #[uniform(1)]
    pub tint: LinearRgba,

    #[uniform(2)]
    pub fog_color: LinearRgba,

    /// x: fog start, y: fog end.
    #[uniform(3)]
    pub fog_range: Vec4,

    #[texture(4)]
    #[sampler(5)]
    pub texture: Option<Handle<Image>>,
}

impl TunnelMaterial {
    pub fn set_elapsed(&mut self, elapsed: f32) {
        self.params.x = elapsed;
    }
}

impl Material for TunnelMaterial {
    fn vertex_shader() -> ShaderRef {
        TUNNEL_SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        TUNNEL_SHADER_PATH.into()
    }
}

/// Procedural ocean for the close-up scene.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Default)]
pub struct OceanMaterial {
    /// x: elapsed seconds, yz: viewport size in pixels.
    #[uniform(0)]
    pub params: Vec4,
}

impl OceanMaterial {
    pub fn update(&mut self, elapsed: f32, viewport: Vec2) {
        self.params = Vec4::new(elapsed, viewport.x, viewport.y, 0.0);
    }
}

impl Material for OceanMaterial {
    fn fragment_shader() -> ShaderRef {
        OCEAN_SHADER_PATH.into()
    }
}
