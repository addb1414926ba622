/// Scroll fraction moved per wheel line.
pub const WHEEL_LINE_STEP: f32 = 0.02;

/// Scroll fraction moved per wheel pixel (trackpads).
pub const WHEEL_PIXEL_STEP: f32 = 0.0005;

/// Scroll fraction moved by PageUp/PageDown and the arrow keys.
pub const KEY_STEP: f32 = 0.05;
