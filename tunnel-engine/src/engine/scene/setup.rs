use bevy::core_pipeline::bloom::Bloom;
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use constants::render_settings::{
    CAMERA_FAR, CAMERA_NEAR, FRAME_SAMPLES, PLANET_DISTANCE, PLANET_RADIUS, SCENE_SEED,
    STARFIELD_COUNT, STARFIELD_INNER_RADIUS, STARFIELD_OUTER_RADIUS, TRACKING_LIGHT_RANGE,
    TUNNEL_FOV_DEGREES,
};

use super::close_up::spawn_close_up_scene;
use super::components::{
    CameraRig, LookPivot, ParticleSpin, Planet, Starfield, TrackingLight, TunnelSurface,
    TunnelViewCamera,
};
use super::particles::{particle_field_positions, point_mesh, starfield_positions};
use super::tube::build_tube_mesh;
use crate::engine::assets::tunnel_manifest::TunnelManifest;
use crate::engine::path::PathFrames;
use crate::engine::render::materials::{OceanMaterial, TunnelMaterial};
use crate::engine::rig::TunnelRig;

/// Spawn the whole scene for the loaded manifest.
pub fn spawn_tunnel_scene(
    mut commands: Commands,
    manifest: Res<TunnelManifest>,
    rig: Res<TunnelRig>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut tunnel_materials: ResMut<Assets<TunnelMaterial>>,
    mut ocean_materials: ResMut<Assets<OceanMaterial>>,
) {
    let visuals = &manifest.visuals;
    let camera = rig.camera();
    let curve = camera.curve();

    let frames = PathFrames::build(curve, FRAME_SAMPLES, manifest.look_ahead_delta);
    let tube = build_tube_mesh(
        curve,
        &frames,
        visuals.tube_segments,
        visuals.radial_segments,
        visuals.tube_radius,
    );

    let texture = visuals
        .texture
        .as_ref()
        .map(|path| load_repeating_texture(&asset_server, path));

    commands.spawn((
        Mesh3d(meshes.add(tube)),
        MeshMaterial3d(tunnel_materials.add(TunnelMaterial {
            params: Vec4::new(
                0.0,
                visuals.displacement,
                visuals.uv_repeat[0],
                visuals.uv_repeat[1],
            ),
            tint: manifest.tube_color().to_linear(),
            fog_color: manifest.fog_color().to_linear(),
            fog_range: Vec4::new(visuals.fog_start, visuals.fog_end, 0.0, 0.0),
            texture,
        })),
        Transform::default(),
        TunnelSurface,
    ));

    commands.spawn((
        PointLight {
            color: manifest.light_color(),
            intensity: visuals.light_intensity,
            range: TRACKING_LIGHT_RANGE,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(curve.point_at(manifest.look_ahead_delta)),
        TrackingLight,
    ));

    spawn_particles(&mut commands, &manifest, &mut meshes, &mut materials);

    if visuals.starfield {
        commands.spawn((
            Mesh3d(meshes.add(point_mesh(starfield_positions(
                STARFIELD_COUNT,
                STARFIELD_INNER_RADIUS,
                STARFIELD_OUTER_RADIUS,
                SCENE_SEED ^ 0xff,
            )))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(1.0, 1.0, 1.0, 0.0),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                fog_enabled: false,
                ..default()
            })),
            Transform::from_translation(camera.end_point()),
            Starfield,
        ));
    }

    if visuals.planet {
        let planet_texture = visuals
            .planet_texture
            .as_ref()
            .map(|path| asset_server.load::<Image>(path));
        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(PLANET_RADIUS).mesh().uv(32, 32))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.55, 0.65, 0.9),
                base_color_texture: planet_texture,
                emissive: LinearRgba::rgb(0.05, 0.08, 0.15),
                ..default()
            })),
            Transform::from_translation(
                camera.end_point() + camera.end_direction() * PLANET_DISTANCE,
            ),
            Planet,
        ));
        commands.spawn((
            DirectionalLight {
                illuminance: 3_000.0,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(camera.end_point())
                .looking_to(camera.end_direction(), Vec3::Y),
        ));
    }

    spawn_camera_rig(&mut commands, &manifest, rig.as_ref());

    if manifest.has_close_up() {
        spawn_close_up_scene(
            &mut commands,
            &mut meshes,
            &mut materials,
            &mut ocean_materials,
        );
    }

    info!(
        "Spawned tunnel `{}` ({:.1} units long)",
        manifest.name,
        curve.arc_length()
    );
}

fn load_repeating_texture(asset_server: &AssetServer, path: &str) -> Handle<Image> {
    asset_server.load_with_settings(path.to_string(), |settings: &mut ImageLoaderSettings| {
        settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
            address_mode_u: ImageAddressMode::Repeat,
            address_mode_v: ImageAddressMode::Repeat,
            ..ImageSamplerDescriptor::linear()
        });
    })
}

fn spawn_particles(
    commands: &mut Commands,
    manifest: &TunnelManifest,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let visuals = &manifest.visuals;
    if visuals.particle_fields.is_empty() {
        return;
    }

    let material = materials.add(StandardMaterial {
        base_color: manifest.particle_color(),
        unlit: true,
        ..default()
    });

    for (index, field) in visuals.particle_fields.iter().enumerate() {
        let positions =
            particle_field_positions(field, visuals.particle_count, SCENE_SEED + index as u64);
        commands.spawn((
            Mesh3d(meshes.add(point_mesh(positions))),
            MeshMaterial3d(material.clone()),
            Transform::default(),
            ParticleSpin(Vec3::from_array(field.spin)),
        ));
    }
}

fn spawn_camera_rig(commands: &mut Commands, manifest: &TunnelManifest, rig: &TunnelRig) {
    let visuals = &manifest.visuals;
    let start = rig.camera().update(rig.progress().current);

    commands
        .spawn((start.pose.transform(), Visibility::default(), CameraRig))
        .with_children(|parent| {
            parent
                .spawn((Transform::default(), Visibility::default(), LookPivot))
                .with_children(|pivot| {
                    pivot.spawn((
                        Camera3d::default(),
                        Camera {
                            hdr: true,
                            order: 0,
                            ..default()
                        },
                        Projection::from(PerspectiveProjection {
                            fov: TUNNEL_FOV_DEGREES.to_radians(),
                            near: CAMERA_NEAR,
                            far: CAMERA_FAR,
                            ..default()
                        }),
                        DistanceFog {
                            color: manifest.fog_color(),
                            falloff: FogFalloff::Linear {
                                start: visuals.fog_start,
                                end: visuals.fog_end,
                            },
                            ..default()
                        },
                        Bloom {
                            intensity: visuals.bloom_intensity,
                            ..Bloom::NATURAL
                        },
                        TunnelViewCamera,
                    ));
                });
        });
}
