//! The per-frame tunnel state machine.
//!
//! `TunnelRig` owns everything that changes while the user scrolls: the progress
//! mapper, the look offset, the cue activation set and the current scene. Input
//! arrives as `TunnelInput` messages; each `step` produces a `FrameSnapshot`
//! that render, overlay and audio systems read without touching the rig.

use bevy::prelude::*;
use constants::tunnel::STARFIELD_FADE_STEP;

use crate::engine::assets::tunnel_manifest::{ManifestError, TunnelManifest};
use crate::engine::camera::{
    ActiveScene, CameraFrame, LookOffset, PoseRegime, TunnelCamera,
};
use crate::engine::cues::{CueActivationSet, CueInterval, CueTransition, FiredEffect};
use crate::engine::progress::{ProgressMapper, ProgressState};

/// Input from whichever collaborator owns the page: native window events or
/// the web RPC bridge.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum TunnelInput {
    /// Normalised scroll position, 0 at the top of the scroll region.
    ScrollFraction(f32),
    /// Pointer position in window pixels and the viewport size it lives in.
    PointerMoved { position: Vec2, viewport: Vec2 },
    /// Click, tap or scroll: the first one unlocks audio.
    UserGesture,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub elapsed: f32,
    pub progress: ProgressState,
    /// Progress as seen by cue evaluation (wrapped or capped).
    pub cue_progress: f32,
    pub camera: CameraFrame,
    pub look_rotation: Quat,
    pub cue_changes: Vec<CueTransition>,
    pub effects: Vec<FiredEffect>,
    /// Set on the frame the active scene flips.
    pub scene_changed: Option<ActiveScene>,
    pub starfield_opacity: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct TunnelRig {
    mapper: ProgressMapper,
    camera: TunnelCamera,
    look: LookOffset,
    cues: CueActivationSet,
    intervals: Vec<CueInterval>,
    wraps_progress: bool,
    overshoot_cap: f32,
    scene: ActiveScene,
    starfield_opacity: f32,
    frame: u64,
}

impl TunnelRig {
    pub fn from_manifest(manifest: &TunnelManifest) -> Result<Self, ManifestError> {
        manifest.validate()?;
        let camera = TunnelCamera::new(manifest.curve()?, manifest.camera_settings());

        Ok(Self {
            mapper: ProgressMapper::new(manifest.progress_range, manifest.smoothing_factor),
            camera,
            look: LookOffset::new(manifest.look_offset),
            cues: CueActivationSet::new(manifest.cue_policy),
            intervals: manifest.cues.clone(),
            wraps_progress: manifest.wraps_progress(),
            overshoot_cap: manifest.overshoot_cap,
            scene: ActiveScene::Tunnel,
            starfield_opacity: 0.0,
            frame: 0,
        })
    }

    pub fn apply(&mut self, input: &TunnelInput) {
        match *input {
            TunnelInput::ScrollFraction(fraction) => self.mapper.set_scroll_fraction(fraction),
            TunnelInput::PointerMoved { position, viewport } => {
                self.look.aim_at_pointer(position, viewport)
            }
            TunnelInput::UserGesture => {}
        }
    }

    pub fn step(&mut self, elapsed: f32) -> FrameSnapshot {
        let current = self.mapper.step();
        let camera = self.camera.update(current);
        self.look.step();

        let cue_progress = if self.wraps_progress {
            current.rem_euclid(1.0)
        } else {
            current.min(self.overshoot_cap)
        };
        let cue_update = self.cues.update(cue_progress, &self.intervals);

        let scene_changed = (camera.scene != self.scene).then_some(camera.scene);
        self.scene = camera.scene;

        self.starfield_opacity = match camera.regime {
            PoseRegime::OnPath => 0.0,
            PoseRegime::Overshoot => (self.starfield_opacity + STARFIELD_FADE_STEP).min(1.0),
        };

        self.frame += 1;

        FrameSnapshot {
            frame: self.frame,
            elapsed,
            progress: self.mapper.state(),
            cue_progress,
            camera,
            look_rotation: self.look.rotation(),
            cue_changes: cue_update.transitions,
            effects: cue_update.effects,
            scene_changed,
            starfield_opacity: self.starfield_opacity,
        }
    }

    pub fn camera(&self) -> &TunnelCamera {
        &self.camera
    }

    pub fn progress(&self) -> ProgressState {
        self.mapper.state()
    }

    pub fn scene(&self) -> ActiveScene {
        self.scene
    }

    pub fn intervals(&self) -> &[CueInterval] {
        &self.intervals
    }

    pub fn active_cues(&self) -> Vec<&str> {
        self.cues.active_ids(&self.intervals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::tunnel_manifest::{exit_flight, orbit_loop};
    use crate::engine::cues::CueEffect;

    #[test]
    fn rejects_invalid_manifest() {
        let mut manifest = exit_flight();
        manifest.control_points.clear();
        assert!(TunnelRig::from_manifest(&manifest).is_err());
    }

    #[test]
    fn scroll_drives_progress_and_cues() {
        let mut rig = TunnelRig::from_manifest(&exit_flight()).unwrap();

        let first = rig.step(0.0);
        assert_eq!(first.progress.current, 0.0);
        assert!(first.cue_changes.is_empty());

        rig.apply(&TunnelInput::ScrollFraction(0.1 / 1.4));
        let snapshot = rig.step(0.016);
        assert!((snapshot.progress.current - 0.1).abs() < 1e-5);
        assert_eq!(
            snapshot.cue_changes,
            vec![CueTransition {
                id: "welcome".to_string(),
                visible: true
            }]
        );
        assert_eq!(
            snapshot.effects,
            vec![FiredEffect {
                id: "welcome".to_string(),
                effect: CueEffect::Sound
            }]
        );
        assert_eq!(rig.active_cues(), vec!["welcome"]);
    }

    #[test]
    fn overshoot_fades_in_the_starfield_and_switches_scene() {
        let mut rig = TunnelRig::from_manifest(&exit_flight()).unwrap();
        rig.apply(&TunnelInput::ScrollFraction(1.0));

        let snapshot = rig.step(0.0);
        assert_eq!(snapshot.camera.regime, PoseRegime::Overshoot);
        assert_eq!(snapshot.scene_changed, Some(ActiveScene::CloseUp));
        assert!((snapshot.starfield_opacity - 0.1).abs() < 1e-6);

        let mut opacity = 0.0;
        for _ in 0..20 {
            let snapshot = rig.step(0.0);
            assert_eq!(snapshot.scene_changed, None);
            opacity = snapshot.starfield_opacity;
        }
        assert_eq!(opacity, 1.0);

        rig.apply(&TunnelInput::ScrollFraction(0.0));
        let snapshot = rig.step(0.0);
        assert_eq!(snapshot.scene_changed, Some(ActiveScene::Tunnel));
        assert_eq!(snapshot.starfield_opacity, 0.0);
    }

    #[test]
    fn looped_rig_wraps_cue_progress() {
        let mut manifest = orbit_loop();
        manifest.smoothing_factor = 1.0;
        manifest.progress_range.max = 1.5;
        let mut rig = TunnelRig::from_manifest(&manifest).unwrap();

        rig.apply(&TunnelInput::ScrollFraction(1.0));
        let snapshot = rig.step(0.0);
        assert!((snapshot.cue_progress - 0.5).abs() < 1e-5);
        assert_eq!(rig.active_cues(), vec!["signal"]);
        assert_eq!(snapshot.camera.regime, PoseRegime::OnPath);
    }

    #[test]
    fn pointer_moves_the_look_offset() {
        let mut rig = TunnelRig::from_manifest(&exit_flight()).unwrap();
        rig.apply(&TunnelInput::PointerMoved {
            position: Vec2::ZERO,
            viewport: Vec2::new(1280.0, 720.0),
        });
        let snapshot = rig.step(0.0);
        assert_ne!(snapshot.look_rotation, Quat::IDENTITY);
    }
}
