//! Background track and cue sounds.
//!
//! Browsers refuse to start audio before the user interacts with the page, so
//! nothing plays until the first `TunnelInput::UserGesture`. Native builds go
//! through the same gate.

use bevy::prelude::*;

use crate::engine::assets::tunnel_manifest::TunnelManifest;
use crate::engine::cues::CueEffect;
use crate::engine::rig::TunnelInput;
use crate::engine::systems::frame_driver::CueEffectFired;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AudioGate {
    unlocked: bool,
}

impl AudioGate {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Returns true only for the gesture that unlocks audio.
    pub fn register_gesture(&mut self) -> bool {
        let first = !self.unlocked;
        self.unlocked = true;
        first
    }
}

#[derive(Component)]
pub struct BackgroundTrack;

pub fn unlock_audio_on_gesture(
    mut commands: Commands,
    mut inputs: EventReader<TunnelInput>,
    mut gate: ResMut<AudioGate>,
    manifest: Option<Res<TunnelManifest>>,
    asset_server: Res<AssetServer>,
) {
    let gestured = inputs
        .read()
        .any(|input| matches!(input, TunnelInput::UserGesture));
    if !gestured || !gate.register_gesture() {
        return;
    }

    info!("Audio unlocked by user gesture");
    let background = manifest
        .as_ref()
        .and_then(|manifest| manifest.audio.background.clone());
    match background {
        Some(path) => {
            commands.spawn((
                AudioPlayer::new(asset_server.load::<AudioSource>(path)),
                PlaybackSettings::LOOP,
                BackgroundTrack,
            ));
        }
        None => warn!("No background audio configured"),
    }
}

pub fn play_cue_effects(
    mut commands: Commands,
    mut effects: EventReader<CueEffectFired>,
    gate: Res<AudioGate>,
    manifest: Option<Res<TunnelManifest>>,
    asset_server: Res<AssetServer>,
) {
    for fired in effects.read() {
        match fired.effect {
            CueEffect::Sound => {
                if !gate.is_unlocked() {
                    warn!("Cue `{}` sound blocked until the user interacts", fired.id);
                    continue;
                }
                let Some(path) = manifest
                    .as_ref()
                    .and_then(|manifest| manifest.audio.cue_sound.clone())
                else {
                    warn!("Cue `{}` has a sound but no cue sound is configured", fired.id);
                    continue;
                };
                commands.spawn((
                    AudioPlayer::new(asset_server.load::<AudioSource>(path)),
                    PlaybackSettings::DESPAWN,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::tunnel_manifest::{AudioSettings, exit_flight};

    fn audio_app(audio: AudioSettings) -> App {
        let mut manifest = exit_flight();
        manifest.audio = audio;

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<AudioSource>()
            .init_resource::<AudioGate>()
            .insert_resource(manifest)
            .add_event::<TunnelInput>()
            .add_event::<CueEffectFired>()
            .add_systems(Update, (unlock_audio_on_gesture, play_cue_effects).chain());
        app
    }

    fn players(app: &mut App) -> usize {
        app.world_mut()
            .query::<&AudioPlayer>()
            .iter(app.world())
            .count()
    }

    fn background_tracks(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<(), With<BackgroundTrack>>()
            .iter(app.world())
            .count()
    }

    fn fire_cue(app: &mut App) {
        app.world_mut().send_event(CueEffectFired {
            id: "welcome".to_string(),
            effect: CueEffect::Sound,
        });
    }

    #[test]
    fn only_the_first_gesture_unlocks() {
        let mut gate = AudioGate::default();
        assert!(!gate.is_unlocked());
        assert!(gate.register_gesture());
        assert!(gate.is_unlocked());
        assert!(!gate.register_gesture());
    }

    #[test]
    fn background_track_starts_once() {
        let mut app = audio_app(AudioSettings {
            background: Some("audio/ambient.ogg".to_string()),
            cue_sound: None,
        });

        app.update();
        assert_eq!(background_tracks(&mut app), 0);

        for _ in 0..3 {
            app.world_mut().send_event(TunnelInput::UserGesture);
            app.update();
        }
        assert!(app.world().resource::<AudioGate>().is_unlocked());
        assert_eq!(background_tracks(&mut app), 1);
    }

    #[test]
    fn missing_background_still_unlocks() {
        let mut app = audio_app(AudioSettings::default());
        app.world_mut().send_event(TunnelInput::UserGesture);
        app.update();

        assert!(app.world().resource::<AudioGate>().is_unlocked());
        assert_eq!(players(&mut app), 0);
    }

    #[test]
    fn cue_sound_is_blocked_while_locked() {
        let mut app = audio_app(AudioSettings {
            background: None,
            cue_sound: Some("audio/cue.ogg".to_string()),
        });

        fire_cue(&mut app);
        app.update();
        assert_eq!(players(&mut app), 0);

        app.world_mut().send_event(TunnelInput::UserGesture);
        app.update();
        fire_cue(&mut app);
        app.update();
        assert_eq!(players(&mut app), 1);
    }

    #[test]
    fn cue_without_configured_sound_is_a_no_op() {
        let mut app = audio_app(AudioSettings::default());
        app.world_mut().send_event(TunnelInput::UserGesture);
        app.update();

        fire_cue(&mut app);
        app.update();
        assert_eq!(players(&mut app), 0);
    }
}
