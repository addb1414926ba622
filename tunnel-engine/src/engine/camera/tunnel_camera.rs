use bevy::prelude::*;
use constants::tunnel::{
    DEFAULT_CAMERA_THRESHOLD, DEFAULT_EXIT_SPEED, DEFAULT_LOOK_AHEAD_DELTA, DEFAULT_OVERSHOOT_CAP,
    END_DIRECTION_DELTA,
};
use serde::{Deserialize, Serialize};

use crate::engine::path::PathCurve;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl CameraPose {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_to(self.forward, Vec3::Y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveScene {
    #[default]
    Tunnel,
    CloseUp,
}

impl ActiveScene {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveScene::Tunnel => "tunnel",
            ActiveScene::CloseUp => "close_up",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PoseRegime {
    #[default]
    OnPath,
    /// Past the end of an open path, flying straight out of the tunnel mouth.
    Overshoot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub pose: CameraPose,
    pub light_position: Vec3,
    pub regime: PoseRegime,
    pub scene: ActiveScene,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPathSettings {
    pub look_ahead_delta: f32,
    /// Progress past which an open path switches to the exit flight.
    pub camera_threshold: f32,
    pub overshoot_cap: f32,
    pub exit_speed: f32,
    /// Progress at or above which the close-up scene takes over. `None` keeps
    /// the tunnel scene for the whole session.
    pub switch_threshold: Option<f32>,
}

impl Default for CameraPathSettings {
    fn default() -> Self {
        Self {
            look_ahead_delta: DEFAULT_LOOK_AHEAD_DELTA,
            camera_threshold: DEFAULT_CAMERA_THRESHOLD,
            overshoot_cap: DEFAULT_OVERSHOOT_CAP,
            exit_speed: DEFAULT_EXIT_SPEED,
            switch_threshold: None,
        }
    }
}

/// Derives the camera pose from path progress.
#[derive(Debug, Clone)]
pub struct TunnelCamera {
    curve: PathCurve,
    settings: CameraPathSettings,
    end_point: Vec3,
    end_direction: Vec3,
}

impl TunnelCamera {
    pub fn new(curve: PathCurve, settings: CameraPathSettings) -> Self {
        let end_point = curve.point_at(1.0);
        let end_direction = curve.end_direction(END_DIRECTION_DELTA);
        Self {
            curve,
            settings,
            end_point,
            end_direction,
        }
    }

    pub fn curve(&self) -> &PathCurve {
        &self.curve
    }

    pub fn settings(&self) -> &CameraPathSettings {
        &self.settings
    }

    pub fn end_point(&self) -> Vec3 {
        self.end_point
    }

    pub fn end_direction(&self) -> Vec3 {
        self.end_direction
    }

    /// Compares uncapped progress, so the close-up scene stays reachable even
    /// when the threshold sits above the overshoot cap.
    pub fn active_scene(&self, progress: f32) -> ActiveScene {
        match self.settings.switch_threshold {
            Some(threshold) if progress >= threshold => ActiveScene::CloseUp,
            _ => ActiveScene::Tunnel,
        }
    }

    pub fn update(&self, progress: f32) -> CameraFrame {
        let progress = if progress.is_finite() { progress } else { 0.0 };
        let scene = self.active_scene(progress);

        if self.curve.is_closed() {
            return self.on_path(progress.rem_euclid(1.0), scene);
        }

        let capped = progress.min(self.settings.overshoot_cap);
        if capped <= self.settings.camera_threshold {
            self.on_path(capped, scene)
        } else {
            self.overshoot(capped, scene)
        }
    }

    fn on_path(&self, progress: f32, scene: ActiveScene) -> CameraFrame {
        let delta = self.settings.look_ahead_delta;
        let position = self.curve.point_at(progress);
        let look_at = self.curve.point_at(progress + delta);
        let mut forward = (look_at - position).normalize_or_zero();
        if forward == Vec3::ZERO {
            forward = self.curve.tangent_at(progress, delta);
        }

        CameraFrame {
            pose: CameraPose { position, forward },
            light_position: look_at,
            regime: PoseRegime::OnPath,
            scene,
        }
    }

    fn overshoot(&self, progress: f32, scene: ActiveScene) -> CameraFrame {
        let travelled = (progress - self.settings.camera_threshold) * self.settings.exit_speed;
        let position = self.end_point + self.end_direction * travelled;

        CameraFrame {
            pose: CameraPose {
                position,
                forward: self.end_direction,
            },
            light_position: position + self.end_direction,
            regime: PoseRegime::Overshoot,
            scene,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit_curve() -> PathCurve {
        PathCurve::new(
            vec![
                Vec3::new(10.0, 0.0, 89.0),
                Vec3::new(50.0, 10.0, 88.0),
                Vec3::new(76.0, 20.0, 139.0),
                Vec3::new(126.0, 12.0, 141.0),
                Vec3::new(150.0, 8.0, 112.0),
            ],
            0.5,
            false,
        )
        .unwrap()
    }

    fn camera(switch_threshold: Option<f32>) -> TunnelCamera {
        TunnelCamera::new(
            exit_curve(),
            CameraPathSettings {
                switch_threshold,
                ..default()
            },
        )
    }

    #[test]
    fn on_path_looks_ahead_along_the_curve() {
        let camera = camera(None);
        let frame = camera.update(0.4);
        assert_eq!(frame.regime, PoseRegime::OnPath);
        assert_eq!(frame.pose.position, camera.curve().point_at(0.4));
        let expected = (camera.curve().point_at(0.43) - frame.pose.position).normalize();
        assert!(frame.pose.forward.dot(expected) > 0.9999);
        assert_eq!(frame.light_position, camera.curve().point_at(0.43));
    }

    #[test]
    fn end_of_path_still_has_a_direction() {
        let camera = camera(None);
        let frame = camera.update(1.0);
        assert_eq!(frame.regime, PoseRegime::OnPath);
        assert!((frame.pose.forward.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn overshoot_flies_out_along_the_end_tangent() {
        let camera = camera(None);
        let frame = camera.update(1.02);
        assert_eq!(frame.regime, PoseRegime::Overshoot);

        let offset = frame.pose.position - camera.end_point();
        assert!((offset.length() - 3.0).abs() < 1e-3, "offset {offset}");
        assert!(offset.normalize().dot(camera.end_direction()) > 0.9999);
        assert_eq!(frame.pose.forward, camera.end_direction());
        assert!(
            (frame.light_position - (frame.pose.position + camera.end_direction())).length()
                < 1e-4
        );
    }

    #[test]
    fn overshoot_distance_is_capped() {
        let camera = camera(None);
        let capped = camera.update(1.3);
        let beyond = camera.update(5.0);
        assert_eq!(capped.pose.position, beyond.pose.position);
    }

    #[test]
    fn scene_switch_has_no_hysteresis() {
        let camera = camera(Some(1.22));
        let sequence = [1.0, 1.21, 1.22, 1.3, 1.21, 0.5, 1.25];
        let scenes: Vec<ActiveScene> = sequence.iter().map(|&p| camera.update(p).scene).collect();
        assert_eq!(
            scenes,
            vec![
                ActiveScene::Tunnel,
                ActiveScene::Tunnel,
                ActiveScene::CloseUp,
                ActiveScene::CloseUp,
                ActiveScene::Tunnel,
                ActiveScene::Tunnel,
                ActiveScene::CloseUp,
            ]
        );
    }

    #[test]
    fn switch_uses_uncapped_progress() {
        let camera = camera(Some(1.5));
        assert_eq!(camera.update(1.6).scene, ActiveScene::CloseUp);
        assert_eq!(camera.update(1.6).regime, PoseRegime::Overshoot);
    }

    #[test]
    fn closed_path_wraps_instead_of_overshooting() {
        let ring: Vec<Vec3> = (0..20)
            .map(|i| {
                let angle = i as f32 / 20.0 * std::f32::consts::TAU;
                Vec3::new(100.0 * angle.cos(), 0.0, 100.0 * angle.sin())
            })
            .collect();
        let curve = PathCurve::new(ring, 0.2, true).unwrap();
        let camera = TunnelCamera::new(curve, CameraPathSettings::default());
        let frame = camera.update(1.25);
        assert_eq!(frame.regime, PoseRegime::OnPath);
        assert_eq!(frame.pose.position, camera.update(0.25).pose.position);
    }
}
