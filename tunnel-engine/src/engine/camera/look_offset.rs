use bevy::prelude::*;
use constants::tunnel::{LOOK_OFFSET_DIVISOR, LOOK_PITCH_RANGE, LOOK_YAW_RANGE};
use serde::{Deserialize, Serialize};

use crate::engine::math::map_clamped;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookOffsetSettings {
    /// Yaw at the left and right viewport edges.
    pub yaw_range: [f32; 2],
    /// Pitch at the top and bottom viewport edges.
    pub pitch_range: [f32; 2],
    pub divisor: f32,
    pub initial_yaw: f32,
    pub initial_pitch: f32,
}

impl Default for LookOffsetSettings {
    fn default() -> Self {
        Self {
            yaw_range: LOOK_YAW_RANGE,
            pitch_range: LOOK_PITCH_RANGE,
            divisor: LOOK_OFFSET_DIVISOR,
            initial_yaw: 0.0,
            initial_pitch: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookOffset {
    settings: LookOffsetSettings,
    pub yaw: f32,
    pub pitch: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
}

impl LookOffset {
    pub fn new(settings: LookOffsetSettings) -> Self {
        let divisor = if settings.divisor.is_finite() {
            settings.divisor.max(1.0)
        } else {
            LOOK_OFFSET_DIVISOR
        };
        let settings = LookOffsetSettings {
            divisor,
            ..settings
        };
        Self {
            settings,
            yaw: settings.initial_yaw,
            pitch: settings.initial_pitch,
            target_yaw: settings.initial_yaw,
            target_pitch: settings.initial_pitch,
        }
    }

    pub fn settings(&self) -> &LookOffsetSettings {
        &self.settings
    }

    /// Retarget from a pointer position in window pixels (origin top-left).
    pub fn aim_at_pointer(&mut self, position: Vec2, viewport: Vec2) {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        let [yaw_left, yaw_right] = self.settings.yaw_range;
        let [pitch_top, pitch_bottom] = self.settings.pitch_range;
        self.target_yaw = map_clamped(position.x, 0.0, viewport.x, yaw_left, yaw_right);
        self.target_pitch = map_clamped(position.y, 0.0, viewport.y, pitch_top, pitch_bottom);
    }

    pub fn step(&mut self) {
        self.yaw += (self.target_yaw - self.yaw) / self.settings.divisor;
        self.pitch += (self.target_pitch - self.pitch) / self.settings.divisor;
    }

    /// Local rotation applied under the path-following rig.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

impl Default for LookOffset {
    fn default() -> Self {
        Self::new(LookOffsetSettings::default())
    }
}
