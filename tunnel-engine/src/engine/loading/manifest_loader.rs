use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::paths::{DEFAULT_SCENE, MANIFEST_EXTENSION, SCENE_DIRECTORY};

use crate::engine::assets::tunnel_manifest::{self, ManifestError, TunnelManifest};
use crate::engine::core::app_state::AppState;
use crate::engine::rig::{TunnelInput, TunnelRig};

#[derive(Resource, Default)]
pub struct ManifestLoader {
    scene: String,
    handle: Option<Handle<TunnelManifest>>,
}

impl ManifestLoader {
    pub fn scene(&self) -> &str {
        &self.scene
    }
}

/// Input that arrived while the manifest was still loading. Only the latest
/// scroll and pointer values matter; a gesture is remembered as a flag.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PendingInput {
    scroll: Option<f32>,
    pointer: Option<TunnelInput>,
    gesture: bool,
}

impl PendingInput {
    pub fn record(&mut self, input: &TunnelInput) {
        match *input {
            TunnelInput::ScrollFraction(fraction) => self.scroll = Some(fraction),
            TunnelInput::PointerMoved { .. } => self.pointer = Some(*input),
            TunnelInput::UserGesture => self.gesture = true,
        }
    }

    /// Hand the buffered scroll and pointer to a freshly built rig.
    pub fn apply_to(&mut self, rig: &mut TunnelRig) {
        if let Some(fraction) = self.scroll.take() {
            rig.apply(&TunnelInput::ScrollFraction(fraction));
        }
        if let Some(pointer) = self.pointer.take() {
            rig.apply(&pointer);
        }
    }

    pub fn take_gesture(&mut self) -> bool {
        std::mem::take(&mut self.gesture)
    }
}

pub fn buffer_pending_input(
    mut inputs: EventReader<TunnelInput>,
    mut pending: ResMut<PendingInput>,
) {
    for input in inputs.read() {
        pending.record(input);
    }
}

/// Re-send a gesture seen during loading so the audio unlock still happens.
pub fn replay_pending_gesture(
    mut pending: ResMut<PendingInput>,
    mut inputs: EventWriter<TunnelInput>,
) {
    if pending.take_gesture() {
        info!("Replaying user gesture received while loading");
        inputs.write(TunnelInput::UserGesture);
    }
}

pub fn manifest_path(scene: &str) -> String {
    format!("{SCENE_DIRECTORY}/{scene}.{MANIFEST_EXTENSION}")
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    let scene = scene_name();
    let path = manifest_path(&scene);
    info!("Loading tunnel manifest from: {}", path);
    manifest_loader.handle = Some(asset_server.load(&path));
    manifest_loader.scene = scene;
}

// Wait for the manifest, then hand over to the running state
pub fn load_manifest_system(
    mut commands: Commands,
    manifest_loader: Res<ManifestLoader>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<TunnelManifest>>,
    mut pending: ResMut<PendingInput>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = manifest_loader.handle.as_ref() else {
        return;
    };

    let loaded = if let Some(manifest) = manifests.get(handle) {
        Some(manifest.clone())
    } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        warn!(
            "Tunnel manifest for `{}` failed to load ({}), using built-in preset",
            manifest_loader.scene, err
        );
        None
    } else {
        return;
    };

    match resolve_manifest(loaded, &manifest_loader.scene) {
        Ok((manifest, mut rig)) => {
            pending.apply_to(&mut rig);
            info!(
                "✓ Tunnel `{}` ready: {} control points, {} cues",
                manifest.name,
                manifest.control_points.len(),
                manifest.cues.len()
            );
            commands.insert_resource(rig);
            commands.insert_resource(manifest);
            next_state.set(AppState::Running);
        }
        Err(err) => error!("No usable tunnel manifest: {}", err),
    }
}

/// Validate the loaded manifest, falling back to the preset named `scene` (or
/// the default scene) when it is missing or invalid.
pub fn resolve_manifest(
    loaded: Option<TunnelManifest>,
    scene: &str,
) -> Result<(TunnelManifest, TunnelRig), ManifestError> {
    if let Some(manifest) = loaded {
        match TunnelRig::from_manifest(&manifest) {
            Ok(rig) => return Ok((manifest, rig)),
            Err(err) => error!("Invalid tunnel manifest `{}`: {}", scene, err),
        }
    }

    let mut fallback = tunnel_manifest::preset(scene).unwrap_or_else(tunnel_manifest::exit_flight);
    if fallback.name.is_empty() {
        fallback.name = DEFAULT_SCENE.to_string();
    }
    let rig = TunnelRig::from_manifest(&fallback)?;
    Ok((fallback, rig))
}

/// Scene requested by the environment: `TUNNEL_SCENE` natively, `?scene=` on the web.
pub fn scene_name() -> String {
    requested_scene()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SCENE.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_scene() -> Option<String> {
    std::env::var(constants::paths::SCENE_ENV_VAR).ok()
}

#[cfg(target_arch = "wasm32")]
fn requested_scene() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    scene_from_query(&search)
}

pub fn scene_from_query(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == constants::paths::SCENE_QUERY_PARAM)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_path_uses_scene_directory() {
        assert_eq!(manifest_path("orbit_loop"), "scenes/orbit_loop.tunnel.json");
    }

    #[test]
    fn scene_is_read_from_query_string() {
        assert_eq!(
            scene_from_query("?debug=1&scene=orbit_loop"),
            Some("orbit_loop".to_string())
        );
        assert_eq!(scene_from_query("?debug=1"), None);
        assert_eq!(scene_from_query(""), None);
    }

    #[test]
    fn invalid_manifest_falls_back_to_preset() {
        let mut broken = tunnel_manifest::orbit_loop();
        broken.look_ahead_delta = -1.0;
        let (manifest, _) = resolve_manifest(Some(broken), "orbit_loop").unwrap();
        assert_eq!(manifest.look_ahead_delta, 0.01);

        let (manifest, _) = resolve_manifest(None, "does_not_exist").unwrap();
        assert_eq!(manifest.name, "exit_flight");
    }

    #[test]
    fn input_sent_while_loading_survives_into_running() {
        use crate::engine::systems::frame_driver::{
            CueChanged, CueEffectFired, CurrentFrame, SceneSwitched, drive_rig,
        };
        use bevy::state::app::StatesPlugin;

        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<AppState>()
            .init_resource::<Time>()
            .init_resource::<PendingInput>()
            .init_resource::<CurrentFrame>()
            .add_event::<TunnelInput>()
            .add_event::<CueChanged>()
            .add_event::<CueEffectFired>()
            .add_event::<SceneSwitched>()
            .add_systems(
                Update,
                buffer_pending_input.run_if(in_state(AppState::Loading)),
            )
            .add_systems(OnEnter(AppState::Running), replay_pending_gesture)
            .add_systems(Update, drive_rig.run_if(in_state(AppState::Running)));

        app.world_mut().send_event(TunnelInput::UserGesture);
        app.world_mut().send_event(TunnelInput::ScrollFraction(0.2));
        app.world_mut().send_event(TunnelInput::ScrollFraction(0.5));
        for _ in 0..3 {
            app.update();
        }

        let mut pending = app.world().resource::<PendingInput>().clone();
        let (_, mut rig) = resolve_manifest(None, "exit_flight").unwrap();
        pending.apply_to(&mut rig);
        *app.world_mut().resource_mut::<PendingInput>() = pending;
        app.world_mut().insert_resource(rig);
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Running);
        app.update();

        let rig = app.world().resource::<TunnelRig>();
        assert!((rig.progress().target - 0.7).abs() < 1e-5);
        assert!((rig.progress().current - 0.7).abs() < 1e-5);

        let replayed: Vec<TunnelInput> = app
            .world()
            .resource::<Events<TunnelInput>>()
            .iter_current_update_events()
            .copied()
            .collect();
        assert_eq!(replayed, vec![TunnelInput::UserGesture]);
        assert_eq!(
            *app.world().resource::<PendingInput>(),
            PendingInput::default()
        );
    }

    #[test]
    fn pending_input_keeps_the_latest_values() {
        let mut pending = PendingInput::default();
        pending.record(&TunnelInput::ScrollFraction(0.1));
        pending.record(&TunnelInput::ScrollFraction(0.4));
        assert_eq!(pending.scroll, Some(0.4));
        assert!(!pending.take_gesture());
        pending.record(&TunnelInput::UserGesture);
        assert!(pending.take_gesture());
        assert!(!pending.take_gesture());
    }

    #[test]
    fn valid_manifest_is_kept() {
        let mut custom = tunnel_manifest::exit_flight();
        custom.name = "custom".to_string();
        let (manifest, _) = resolve_manifest(Some(custom), "custom").unwrap();
        assert_eq!(manifest.name, "custom");
    }
}
