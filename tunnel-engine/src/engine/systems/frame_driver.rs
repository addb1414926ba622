//! One frame of the tunnel flight.
//!
//! `drive_rig` drains `TunnelInput`, steps the `TunnelRig` and publishes the
//! resulting `FrameSnapshot` plus cue and scene events. The `apply_*` systems
//! run after it and copy the snapshot onto transforms, cameras and materials.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::PLANET_SPIN_PER_FRAME;

use crate::engine::camera::{ActiveScene, OrbitSettings, orbit_pose};
use crate::engine::cues::CueEffect;
use crate::engine::render::materials::{OceanMaterial, TunnelMaterial};
use crate::engine::rig::{FrameSnapshot, TunnelInput, TunnelRig};
use crate::engine::scene::components::{
    CameraRig, CloseUpCamera, LookPivot, ParticleSpin, Planet, Starfield, TrackingLight,
    TunnelViewCamera,
};

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct CueChanged {
    pub id: String,
    pub visible: bool,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct CueEffectFired {
    pub id: String,
    pub effect: CueEffect,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSwitched {
    pub scene: ActiveScene,
}

/// Latest snapshot produced by `drive_rig`. Empty until the first running frame.
#[derive(Resource, Debug, Default)]
pub struct CurrentFrame(pub Option<FrameSnapshot>);

impl CurrentFrame {
    pub fn scene(&self) -> ActiveScene {
        self.0
            .as_ref()
            .map(|frame| frame.camera.scene)
            .unwrap_or_default()
    }
}

pub fn drive_rig(
    mut inputs: EventReader<TunnelInput>,
    rig: Option<ResMut<TunnelRig>>,
    time: Res<Time>,
    mut current: ResMut<CurrentFrame>,
    mut cue_events: EventWriter<CueChanged>,
    mut effect_events: EventWriter<CueEffectFired>,
    mut scene_events: EventWriter<SceneSwitched>,
) {
    let Some(mut rig) = rig else {
        inputs.clear();
        return;
    };

    for input in inputs.read() {
        rig.apply(input);
    }

    let snapshot = rig.step(time.elapsed_secs());

    for change in &snapshot.cue_changes {
        info!(
            "Cue `{}` {} at progress {:.3}",
            change.id,
            if change.visible { "shown" } else { "hidden" },
            snapshot.cue_progress
        );
        cue_events.write(CueChanged {
            id: change.id.clone(),
            visible: change.visible,
        });
    }
    for fired in &snapshot.effects {
        effect_events.write(CueEffectFired {
            id: fired.id.clone(),
            effect: fired.effect,
        });
    }
    if let Some(scene) = snapshot.scene_changed {
        info!("→ Switching to {} scene", scene.as_str());
        scene_events.write(SceneSwitched { scene });
    }

    current.0 = Some(snapshot);
}

pub fn apply_camera_rig(
    current: Res<CurrentFrame>,
    mut rigs: Query<&mut Transform, (With<CameraRig>, Without<LookPivot>)>,
    mut pivots: Query<&mut Transform, (With<LookPivot>, Without<CameraRig>)>,
) {
    let Some(frame) = current.0.as_ref() else {
        return;
    };
    for mut transform in &mut rigs {
        *transform = frame.camera.pose.transform();
    }
    for mut transform in &mut pivots {
        transform.rotation = frame.look_rotation;
    }
}

pub fn apply_tracking_light(
    current: Res<CurrentFrame>,
    mut lights: Query<&mut Transform, With<TrackingLight>>,
) {
    let Some(frame) = current.0.as_ref() else {
        return;
    };
    for mut transform in &mut lights {
        transform.translation = frame.camera.light_position;
    }
}

/// Exactly one of the two scene cameras renders at a time.
pub fn apply_scene_cameras(
    current: Res<CurrentFrame>,
    mut tunnel_cameras: Query<&mut Camera, (With<TunnelViewCamera>, Without<CloseUpCamera>)>,
    mut close_up_cameras: Query<&mut Camera, (With<CloseUpCamera>, Without<TunnelViewCamera>)>,
) {
    let close_up = current.scene() == ActiveScene::CloseUp && !close_up_cameras.is_empty();
    for mut camera in &mut tunnel_cameras {
        if camera.is_active == close_up {
            camera.is_active = !close_up;
        }
    }
    for mut camera in &mut close_up_cameras {
        if camera.is_active != close_up {
            camera.is_active = close_up;
        }
    }
}

pub fn orbit_close_up_camera(
    current: Res<CurrentFrame>,
    time: Res<Time>,
    mut cameras: Query<&mut Transform, With<CloseUpCamera>>,
) {
    if current.scene() != ActiveScene::CloseUp {
        return;
    }
    let pose = orbit_pose(&OrbitSettings::default(), time.elapsed_secs());
    for mut transform in &mut cameras {
        *transform = pose.transform();
    }
}

pub fn spin_particles(mut fields: Query<(&mut Transform, &ParticleSpin)>) {
    for (mut transform, spin) in &mut fields {
        let spin = spin.0;
        if spin != Vec3::ZERO {
            transform.rotation *= Quat::from_euler(EulerRot::XYZ, spin.x, spin.y, spin.z);
        }
    }
}

pub fn spin_planet(current: Res<CurrentFrame>, mut planets: Query<&mut Transform, With<Planet>>) {
    if current.scene() != ActiveScene::Tunnel {
        return;
    }
    for mut transform in &mut planets {
        transform.rotate_y(PLANET_SPIN_PER_FRAME);
    }
}

pub fn fade_starfield(
    current: Res<CurrentFrame>,
    starfields: Query<&MeshMaterial3d<StandardMaterial>, With<Starfield>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(frame) = current.0.as_ref() else {
        return;
    };
    for handle in &starfields {
        let Some(material) = materials.get(&handle.0) else {
            continue;
        };
        if (material.base_color.alpha() - frame.starfield_opacity).abs() > f32::EPSILON {
            if let Some(material) = materials.get_mut(&handle.0) {
                material.base_color.set_alpha(frame.starfield_opacity);
            }
        }
    }
}

pub fn update_material_uniforms(
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut tunnel_materials: ResMut<Assets<TunnelMaterial>>,
    mut ocean_materials: ResMut<Assets<OceanMaterial>>,
) {
    let elapsed = time.elapsed_secs();
    for (_, material) in tunnel_materials.iter_mut() {
        material.set_elapsed(elapsed);
    }

    let viewport = windows
        .single()
        .map(|window| Vec2::new(window.width(), window.height()))
        .unwrap_or(Vec2::ONE);
    for (_, material) in ocean_materials.iter_mut() {
        material.update(elapsed, viewport);
    }
}
