/// Position of `value` within `[min, max]` as a 0..1 ratio (unclamped).
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span.abs() <= f32::EPSILON {
        return 0.0;
    }
    (value - min) / span
}

pub fn interpolate(ratio: f32, min: f32, max: f32) -> f32 {
    min + (max - min) * ratio
}

/// Clamp `value` into the input range, then map it linearly onto the output range.
/// Inverted output ranges are allowed and flip the mapping.
pub fn map_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let lo = in_min.min(in_max);
    let hi = in_min.max(in_max);
    let value = if value.is_finite() { value.clamp(lo, hi) } else { lo };
    interpolate(normalize(value, in_min, in_max), out_min, out_max)
}
