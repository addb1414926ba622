use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::paths::MANIFEST_EXTENSION;

use crate::engine::assets::tunnel_manifest::TunnelManifest;
use crate::engine::audio::{AudioGate, play_cue_effects, unlock_audio_on_gesture};
use crate::engine::core::app_state::AppState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::manifest_loader::{
    ManifestLoader, PendingInput, buffer_pending_input, load_manifest_system,
    replay_pending_gesture, start_loading,
};
use crate::engine::render::materials::{OceanMaterial, TunnelMaterial};
use crate::engine::rig::TunnelInput;
use crate::engine::scene::setup::spawn_tunnel_scene;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::frame_driver::{
    CueChanged, CueEffectFired, CurrentFrame, SceneSwitched, apply_camera_rig,
    apply_scene_cameras, apply_tracking_light, drive_rig, fade_starfield, orbit_close_up_camera,
    spin_particles, spin_planet, update_material_uniforms,
};
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::input::{ScrollCursor, emit_native_input};
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{
    fps_tracking::fps_text_update_system,
    overlays::{apply_cue_overlays, spawn_overlays},
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers TunnelManifest as a loadable asset type from `*.tunnel.json` files.
        .add_plugins(JsonAssetPlugin::<TunnelManifest>::new(&[MANIFEST_EXTENSION]))
        .add_plugins(MaterialPlugin::<TunnelMaterial>::default())
        .add_plugins(MaterialPlugin::<OceanMaterial>::default())
        .add_plugins(WebRpcPlugin);

    app.init_resource::<ManifestLoader>()
        .init_resource::<PendingInput>()
        .init_resource::<CurrentFrame>()
        .init_resource::<AudioGate>()
        .insert_resource(ClearColor(Color::BLACK))
        .add_event::<TunnelInput>()
        .add_event::<CueChanged>()
        .add_event::<CueEffectFired>()
        .add_event::<SceneSwitched>();

    app.add_systems(Startup, start_loading)
        .add_systems(
            Update,
            (buffer_pending_input, load_manifest_system)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            OnEnter(AppState::Running),
            (spawn_tunnel_scene, replay_pending_gesture),
        );

    let frame_systems = (
        drive_rig,
        (
            apply_camera_rig,
            apply_tracking_light,
            apply_scene_cameras,
            orbit_close_up_camera,
            spin_particles,
            spin_planet,
            fade_starfield,
            update_material_uniforms,
        ),
        (unlock_audio_on_gesture, play_cue_effects),
    )
        .chain();

    app.add_systems(Update, frame_systems.run_if(in_state(AppState::Running)))
        .add_systems(
            Update,
            fps_notification_system.run_if(in_state(AppState::Running)),
        );

    // Native builds own their input and draw captions themselves; on the web
    // both belong to the host page.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.init_resource::<ScrollCursor>()
            .add_systems(OnEnter(AppState::Running), spawn_overlays)
            .add_systems(
                Update,
                (
                    emit_native_input.before(drive_rig),
                    apply_cue_overlays.after(drive_rig),
                    fps_text_update_system,
                )
                    .run_if(in_state(AppState::Running)),
            );
    }

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
