use std::collections::HashSet;

use bevy::prelude::*;
use constants::tunnel::{
    DEFAULT_CAMERA_THRESHOLD, DEFAULT_EXIT_SPEED, DEFAULT_LOOK_AHEAD_DELTA, DEFAULT_OVERSHOOT_CAP,
    DEFAULT_SMOOTHING_FACTOR, DEFAULT_TENSION,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::camera::{CameraPathSettings, LookOffsetSettings};
use crate::engine::cues::{CueEffect, CueInterval, OneShotPolicy};
use crate::engine::path::{CurveError, PathCurve};
use crate::engine::progress::ProgressRange;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManifestError {
    #[error("{found} control points given, a {kind} path needs at least {required}")]
    TooFewPoints {
        found: usize,
        required: usize,
        kind: &'static str,
    },
    #[error("control point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("progress range [{min}, {max}] is empty or inverted")]
    InvalidRange { min: f32, max: f32 },
    #[error("look-ahead delta must be positive, got {0}")]
    InvalidLookAhead(f32),
    #[error("an open path must reach its end before the exit flight, camera threshold {0} is below 1")]
    InvalidCameraThreshold(f32),
    #[error("overshoot cap {cap} is below the camera threshold {threshold}")]
    InvalidOvershootCap { cap: f32, threshold: f32 },
    #[error("exit speed must be finite and non-negative, got {0}")]
    InvalidExitSpeed(f32),
    #[error("switch threshold must be finite, got {0}")]
    InvalidSwitchThreshold(f32),
    #[error("cue id `{0}` is used more than once")]
    DuplicateCue(String),
    #[error("cue `{id}` bounds [{start}, {end}) fall outside [{domain_min}, {domain_max}]")]
    CueOutOfRange {
        id: String,
        start: f32,
        end: f32,
        domain_min: f32,
        domain_max: f32,
    },
    #[error("`{field}` is not a hex colour: `{value}`")]
    InvalidColor { field: &'static str, value: String },
    #[error(transparent)]
    Curve(#[from] CurveError),
}

/// One point cloud orbiting with the scene, as a box of random points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleField {
    pub extent: [f32; 3],
    pub offset: [f32; 3],
    /// Euler increments (x, y, z) applied every frame.
    #[serde(default)]
    pub spin: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    pub tube_radius: f32,
    pub tube_segments: usize,
    pub radial_segments: usize,
    pub texture: Option<String>,
    pub uv_repeat: [f32; 2],
    pub tube_color: String,
    /// Amplitude of the time-driven wobble pushed along the tube normals.
    pub displacement: f32,
    pub fog_color: String,
    pub fog_start: f32,
    pub fog_end: f32,
    pub particle_color: String,
    pub particle_count: usize,
    pub particle_fields: Vec<ParticleField>,
    pub starfield: bool,
    pub planet: bool,
    pub planet_texture: Option<String>,
    pub light_color: String,
    pub light_intensity: f32,
    pub bloom_intensity: f32,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            tube_radius: 4.0,
            tube_segments: 300,
            radial_segments: 32,
            texture: None,
            uv_repeat: [30.0, 2.0],
            tube_color: "#4a78d8".to_string(),
            displacement: 0.0,
            fog_color: "#194794".to_string(),
            fog_start: 0.0,
            fog_end: 100.0,
            particle_color: "#ffffff".to_string(),
            particle_count: 6800,
            particle_fields: Vec::new(),
            starfield: false,
            planet: false,
            planet_texture: None,
            light_color: "#ffffff".to_string(),
            light_intensity: 20_000.0,
            bloom_intensity: 0.3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub background: Option<String>,
    pub cue_sound: Option<String>,
}

fn default_tension() -> f32 {
    DEFAULT_TENSION
}
fn default_look_ahead() -> f32 {
    DEFAULT_LOOK_AHEAD_DELTA
}
fn default_camera_threshold() -> f32 {
    DEFAULT_CAMERA_THRESHOLD
}
fn default_overshoot_cap() -> f32 {
    DEFAULT_OVERSHOOT_CAP
}
fn default_exit_speed() -> f32 {
    DEFAULT_EXIT_SPEED
}
fn default_smoothing() -> f32 {
    DEFAULT_SMOOTHING_FACTOR
}

/// A complete tunnel scene, loaded from `scenes/<name>.tunnel.json`.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath, Resource)]
pub struct TunnelManifest {
    #[serde(default)]
    pub name: String,
    pub control_points: Vec<[f32; 3]>,
    #[serde(default = "default_tension")]
    pub tension: f32,
    #[serde(default)]
    pub closed: bool,
    #[serde(default = "default_look_ahead")]
    pub look_ahead_delta: f32,
    #[serde(default = "default_camera_threshold")]
    pub camera_threshold: f32,
    #[serde(default = "default_overshoot_cap")]
    pub overshoot_cap: f32,
    #[serde(default = "default_exit_speed")]
    pub exit_speed: f32,
    #[serde(default)]
    pub switch_threshold: Option<f32>,
    #[serde(default)]
    pub progress_range: ProgressRange,
    #[serde(default = "default_smoothing")]
    pub smoothing_factor: f32,
    #[serde(default)]
    pub look_offset: LookOffsetSettings,
    #[serde(default)]
    pub cue_policy: OneShotPolicy,
    #[serde(default)]
    pub cues: Vec<CueInterval>,
    #[serde(default)]
    pub visuals: VisualSettings,
    #[serde(default)]
    pub audio: AudioSettings,
}

impl TunnelManifest {
    pub fn points(&self) -> Vec<Vec3> {
        self.control_points.iter().map(|&p| Vec3::from_array(p)).collect()
    }

    pub fn curve(&self) -> Result<PathCurve, ManifestError> {
        Ok(PathCurve::new(self.points(), self.tension, self.closed)?)
    }

    pub fn camera_settings(&self) -> CameraPathSettings {
        CameraPathSettings {
            look_ahead_delta: self.look_ahead_delta,
            camera_threshold: self.camera_threshold,
            overshoot_cap: self.overshoot_cap,
            exit_speed: self.exit_speed,
            switch_threshold: self.switch_threshold,
        }
    }

    /// Whether cue membership is evaluated on progress wrapped into `[0, 1)`.
    pub fn wraps_progress(&self) -> bool {
        self.closed || self.progress_range.looped
    }

    pub fn has_close_up(&self) -> bool {
        self.switch_threshold.is_some()
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        let (required, kind) = if self.closed { (3, "closed") } else { (2, "open") };
        if self.control_points.len() < required {
            return Err(ManifestError::TooFewPoints {
                found: self.control_points.len(),
                required,
                kind,
            });
        }
        if let Some(index) = self
            .control_points
            .iter()
            .position(|p| p.iter().any(|c| !c.is_finite()))
        {
            return Err(ManifestError::NonFinitePoint { index });
        }

        let range = self.progress_range;
        if !(range.min.is_finite() && range.max.is_finite() && range.max > range.min) {
            return Err(ManifestError::InvalidRange {
                min: range.min,
                max: range.max,
            });
        }

        if !(self.look_ahead_delta.is_finite() && self.look_ahead_delta > 0.0) {
            return Err(ManifestError::InvalidLookAhead(self.look_ahead_delta));
        }

        // The exit flight starts from the end point, so an open path has to be
        // finished by the time the threshold is crossed.
        if !self.closed {
            if !(self.camera_threshold.is_finite() && self.camera_threshold >= 1.0) {
                return Err(ManifestError::InvalidCameraThreshold(self.camera_threshold));
            }
            if !(self.overshoot_cap.is_finite() && self.overshoot_cap >= self.camera_threshold) {
                return Err(ManifestError::InvalidOvershootCap {
                    cap: self.overshoot_cap,
                    threshold: self.camera_threshold,
                });
            }
        }
        if !(self.exit_speed.is_finite() && self.exit_speed >= 0.0) {
            return Err(ManifestError::InvalidExitSpeed(self.exit_speed));
        }
        if let Some(threshold) = self.switch_threshold {
            if !threshold.is_finite() {
                return Err(ManifestError::InvalidSwitchThreshold(threshold));
            }
        }

        let (domain_min, domain_max) = if self.wraps_progress() {
            (0.0, 1.0)
        } else {
            (range.min.min(0.0), range.max.max(self.overshoot_cap))
        };
        let mut seen = HashSet::new();
        for cue in &self.cues {
            if !seen.insert(cue.id.as_str()) {
                return Err(ManifestError::DuplicateCue(cue.id.clone()));
            }
            let inside = |bound: f32| bound.is_finite() && bound >= domain_min && bound <= domain_max;
            if !inside(cue.start) || !inside(cue.end) {
                return Err(ManifestError::CueOutOfRange {
                    id: cue.id.clone(),
                    start: cue.start,
                    end: cue.end,
                    domain_min,
                    domain_max,
                });
            }
        }

        let visuals = &self.visuals;
        for (field, value) in [
            ("tube_color", &visuals.tube_color),
            ("fog_color", &visuals.fog_color),
            ("particle_color", &visuals.particle_color),
            ("light_color", &visuals.light_color),
        ] {
            parse_color(field, value)?;
        }

        Ok(())
    }

    pub fn tube_color(&self) -> Color {
        color_or_white(&self.visuals.tube_color)
    }

    pub fn fog_color(&self) -> Color {
        color_or_white(&self.visuals.fog_color)
    }

    pub fn particle_color(&self) -> Color {
        color_or_white(&self.visuals.particle_color)
    }

    pub fn light_color(&self) -> Color {
        color_or_white(&self.visuals.light_color)
    }
}

pub fn parse_color(field: &'static str, value: &str) -> Result<Color, ManifestError> {
    Srgba::hex(value)
        .map(Color::from)
        .map_err(|_| ManifestError::InvalidColor {
            field,
            value: value.to_string(),
        })
}

fn color_or_white(value: &str) -> Color {
    Srgba::hex(value).map(Color::from).unwrap_or(Color::WHITE)
}

/// Built-in scene by name.
pub fn preset(name: &str) -> Option<TunnelManifest> {
    match name {
        "exit_flight" => Some(exit_flight()),
        "orbit_loop" => Some(orbit_loop()),
        _ => None,
    }
}

/// Open tunnel that ends in a flight out toward a planet, then cuts to the
/// close-up ocean scene.
pub fn exit_flight() -> TunnelManifest {
    let field = ParticleField {
        extent: [500.0, 50.0, 500.0],
        offset: [-250.0, -25.0, -250.0],
        spin: [0.0; 3],
    };

    TunnelManifest {
        name: "exit_flight".to_string(),
        control_points: vec![
            [10.0, 0.0, 89.0],
            [50.0, 10.0, 88.0],
            [76.0, 20.0, 139.0],
            [126.0, 12.0, 141.0],
            [150.0, 8.0, 112.0],
            [157.0, 0.0, 73.0],
            [180.0, 5.0, 44.0],
            [207.0, 10.0, 35.0],
            [232.0, 0.0, 36.0],
        ],
        tension: 0.5,
        closed: false,
        look_ahead_delta: 0.03,
        camera_threshold: 1.0,
        overshoot_cap: 1.3,
        exit_speed: 150.0,
        switch_threshold: Some(1.22),
        progress_range: ProgressRange {
            min: 0.0,
            max: 1.4,
            looped: false,
        },
        smoothing_factor: 1.0,
        look_offset: LookOffsetSettings::default(),
        cue_policy: OneShotPolicy::OncePerSession,
        cues: vec![
            CueInterval {
                id: "welcome".to_string(),
                start: 0.02,
                end: 0.18,
                text: Some("Scroll to enter the tunnel".to_string()),
                on_enter_once: Some(CueEffect::Sound),
            },
            CueInterval {
                id: "deep".to_string(),
                start: 0.45,
                end: 0.6,
                text: Some("Halfway through".to_string()),
                on_enter_once: Some(CueEffect::Sound),
            },
            CueInterval {
                id: "exit".to_string(),
                start: 1.005,
                end: 1.1,
                text: Some("Into open space".to_string()),
                on_enter_once: Some(CueEffect::Sound),
            },
        ],
        visuals: VisualSettings {
            particle_count: 6800,
            particle_fields: vec![field; 3],
            starfield: true,
            planet: true,
            bloom_intensity: 0.35,
            ..default()
        },
        audio: AudioSettings::default(),
    }
}

/// Closed ring tunnel that loops forever with a wobbling shader surface.
pub fn orbit_loop() -> TunnelManifest {
    let segments = 20;
    let control_points = (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            [100.0 * angle.cos(), 0.0, 100.0 * angle.sin()]
        })
        .collect();

    TunnelManifest {
        name: "orbit_loop".to_string(),
        control_points,
        tension: 0.2,
        closed: true,
        look_ahead_delta: 0.01,
        camera_threshold: 1.0,
        overshoot_cap: 1.0,
        exit_speed: 0.0,
        switch_threshold: None,
        progress_range: ProgressRange {
            min: 0.0,
            max: 0.7,
            looped: true,
        },
        smoothing_factor: 0.05,
        look_offset: LookOffsetSettings {
            initial_pitch: 0.2,
            ..default()
        },
        cue_policy: OneShotPolicy::OncePerSession,
        cues: vec![
            CueInterval {
                id: "orbit".to_string(),
                start: 0.05,
                end: 0.25,
                text: Some("Keep scrolling, the ring never ends".to_string()),
                on_enter_once: Some(CueEffect::Sound),
            },
            CueInterval {
                id: "signal".to_string(),
                start: 0.4,
                end: 0.6,
                text: Some("Signal acquired".to_string()),
                on_enter_once: Some(CueEffect::Sound),
            },
            CueInterval {
                id: "seam".to_string(),
                start: 0.9,
                end: 0.03,
                text: Some("Full circle".to_string()),
                on_enter_once: None,
            },
        ],
        visuals: VisualSettings {
            tube_segments: 360,
            radial_segments: 64,
            uv_repeat: [15.0, 4.0],
            tube_color: "#2d8c3c".to_string(),
            displacement: 0.2,
            fog_start: 0.2,
            particle_color: "#a1ff14".to_string(),
            particle_count: 9900,
            particle_fields: vec![
                ParticleField {
                    extent: [500.0, 50.0, 500.0],
                    offset: [-250.0, -25.0, -250.0],
                    spin: [0.0, 0.00002, 0.0],
                },
                ParticleField {
                    extent: [500.0, 10.0, 500.0],
                    offset: [0.0, -5.0, 0.0],
                    spin: [0.00005, 0.0, 0.0],
                },
                ParticleField {
                    extent: [500.0, 10.0, 500.0],
                    offset: [0.0, -5.0, 0.0],
                    spin: [0.0, 0.0, 0.00001],
                },
            ],
            light_color: "#a1ff14".to_string(),
            bloom_intensity: 0.25,
            ..default()
        },
        audio: AudioSettings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for name in ["exit_flight", "orbit_loop"] {
            let manifest = preset(name).unwrap();
            assert_eq!(manifest.name, name);
            manifest.validate().unwrap();
            manifest.curve().unwrap();
        }
        assert!(preset("missing").is_none());
    }

    #[test]
    fn shipped_scene_files_match_presets() {
        let exit: TunnelManifest =
            serde_json::from_str(include_str!("../../../assets/scenes/exit_flight.tunnel.json"))
                .unwrap();
        let orbit: TunnelManifest =
            serde_json::from_str(include_str!("../../../assets/scenes/orbit_loop.tunnel.json"))
                .unwrap();
        exit.validate().unwrap();
        orbit.validate().unwrap();

        assert_eq!(exit.control_points, exit_flight().control_points);
        assert_eq!(exit.switch_threshold, Some(1.22));
        for (loaded, built_in) in exit.cues.iter().zip(exit_flight().cues.iter()) {
            assert_eq!(loaded.id, built_in.id);
            assert_eq!(loaded.on_enter_once, built_in.on_enter_once);
            assert!((loaded.start - built_in.start).abs() < 1e-6);
            assert!((loaded.end - built_in.end).abs() < 1e-6);
        }
        assert_eq!(exit.cues.len(), exit_flight().cues.len());
        assert!(orbit.closed);
        assert_eq!(orbit.control_points.len(), 20);
        assert!(orbit.progress_range.looped);
        assert_eq!(orbit.visuals.particle_fields.len(), 3);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let manifest: TunnelManifest =
            serde_json::from_str(r#"{ "control_points": [[0, 0, 0], [0, 0, -10]] }"#).unwrap();
        assert_eq!(manifest.tension, DEFAULT_TENSION);
        assert_eq!(manifest.smoothing_factor, DEFAULT_SMOOTHING_FACTOR);
        assert_eq!(manifest.cue_policy, OneShotPolicy::OncePerSession);
        assert_eq!(manifest.visuals, VisualSettings::default());
        manifest.validate().unwrap();
    }

    #[test]
    fn rejects_invalid_manifests() {
        let mut manifest = exit_flight();
        manifest.control_points.truncate(1);
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::TooFewPoints { found: 1, .. })
        ));

        let mut manifest = orbit_loop();
        manifest.control_points.truncate(2);
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::TooFewPoints { required: 3, .. })
        ));

        let mut manifest = exit_flight();
        manifest.control_points[3][1] = f32::NAN;
        assert_eq!(
            manifest.validate(),
            Err(ManifestError::NonFinitePoint { index: 3 })
        );

        let mut manifest = exit_flight();
        manifest.progress_range.max = manifest.progress_range.min;
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::InvalidRange { .. })
        ));

        let mut manifest = exit_flight();
        manifest.look_ahead_delta = 0.0;
        assert_eq!(
            manifest.validate(),
            Err(ManifestError::InvalidLookAhead(0.0))
        );

        let mut manifest = exit_flight();
        manifest.camera_threshold = 0.8;
        assert_eq!(
            manifest.validate(),
            Err(ManifestError::InvalidCameraThreshold(0.8))
        );

        let mut manifest = exit_flight();
        manifest.overshoot_cap = 0.9;
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::InvalidOvershootCap { .. })
        ));

        let mut manifest = exit_flight();
        manifest.exit_speed = -5.0;
        assert_eq!(
            manifest.validate(),
            Err(ManifestError::InvalidExitSpeed(-5.0))
        );
        manifest.exit_speed = f32::INFINITY;
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::InvalidExitSpeed(_))
        ));

        let mut manifest = exit_flight();
        manifest.switch_threshold = Some(f32::INFINITY);
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::InvalidSwitchThreshold(_))
        ));

        // Closed paths never leave the curve, so the exit settings are free.
        let mut manifest = orbit_loop();
        manifest.camera_threshold = 0.5;
        manifest.overshoot_cap = 0.2;
        manifest.validate().unwrap();

        let mut manifest = exit_flight();
        let copy = manifest.cues[0].clone();
        manifest.cues.push(copy);
        assert_eq!(
            manifest.validate(),
            Err(ManifestError::DuplicateCue("welcome".to_string()))
        );

        let mut manifest = orbit_loop();
        manifest.cues[0].end = 1.5;
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::CueOutOfRange { .. })
        ));

        let mut manifest = exit_flight();
        manifest.visuals.fog_color = "not-a-colour".to_string();
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::InvalidColor {
                field: "fog_color",
                ..
            })
        ));
    }
}
