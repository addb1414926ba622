use bevy::core_pipeline::bloom::Bloom;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_settings::{
    CAMERA_FAR, CAMERA_NEAR, CLOSE_UP_FOG_COLOR, CLOSE_UP_FOG_END, CLOSE_UP_FOG_START,
    CLOSE_UP_FOV_DEGREES, CLOSE_UP_LAYER, CLOSE_UP_MARKER_COLOR, CLOSE_UP_MARKER_RADIUS,
    CLOSE_UP_PLANE_SIZE,
};

use super::components::CloseUpCamera;
use crate::engine::camera::{OrbitSettings, orbit_pose};
use crate::engine::render::materials::OceanMaterial;

/// Ocean scene shown once progress passes the switch threshold. Everything
/// lives on its own render layer so the tunnel camera never sees it.
pub fn spawn_close_up_scene(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    ocean_materials: &mut Assets<OceanMaterial>,
) {
    let layer = RenderLayers::layer(CLOSE_UP_LAYER);

    commands.spawn((
        Mesh3d(meshes.add(
            Plane3d::default()
                .mesh()
                .size(CLOSE_UP_PLANE_SIZE, CLOSE_UP_PLANE_SIZE)
                .subdivisions(40),
        )),
        MeshMaterial3d(ocean_materials.add(OceanMaterial::default())),
        Transform::default(),
        layer.clone(),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(CLOSE_UP_MARKER_RADIUS).mesh().uv(32, 32))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: CLOSE_UP_MARKER_COLOR,
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, 5.0, 0.0),
        layer.clone(),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        layer.clone(),
    ));

    let start = orbit_pose(&OrbitSettings::default(), 0.0);
    commands.spawn((
        Camera3d::default(),
        Camera {
            is_active: false,
            hdr: true,
            order: 1,
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: CLOSE_UP_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        start.transform(),
        DistanceFog {
            color: CLOSE_UP_FOG_COLOR,
            falloff: FogFalloff::Linear {
                start: CLOSE_UP_FOG_START,
                end: CLOSE_UP_FOG_END,
            },
            ..default()
        },
        Bloom::NATURAL,
        layer,
        CloseUpCamera,
    ));
}
