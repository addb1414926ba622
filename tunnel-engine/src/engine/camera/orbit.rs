use bevy::prelude::*;
use constants::render_settings::{
    CLOSE_UP_ORBIT_HEIGHT, CLOSE_UP_ORBIT_RADIUS, CLOSE_UP_ORBIT_SPEED,
};

use super::tunnel_camera::CameraPose;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    pub radius: f32,
    pub height: f32,
    /// Radians per second.
    pub angular_speed: f32,
    pub focus: Vec3,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            radius: CLOSE_UP_ORBIT_RADIUS,
            height: CLOSE_UP_ORBIT_HEIGHT,
            angular_speed: CLOSE_UP_ORBIT_SPEED,
            focus: Vec3::ZERO,
        }
    }
}

pub fn orbit_pose(settings: &OrbitSettings, elapsed_secs: f32) -> CameraPose {
    let angle = elapsed_secs * settings.angular_speed;
    let position = settings.focus
        + Vec3::new(
            angle.sin() * settings.radius,
            settings.height,
            angle.cos() * settings.radius,
        );
    CameraPose {
        position,
        forward: (settings.focus - position).normalize_or_zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_keeps_radius_and_height() {
        let settings = OrbitSettings::default();
        for elapsed in [0.0, 1.0, 7.5, 120.0] {
            let pose = orbit_pose(&settings, elapsed);
            let flat = Vec2::new(pose.position.x, pose.position.z);
            assert!((flat.length() - settings.radius).abs() < 1e-3);
            assert!((pose.position.y - settings.height).abs() < 1e-6);
            assert!(pose.forward.dot(-pose.position.normalize()) > 0.999);
        }
    }
}
