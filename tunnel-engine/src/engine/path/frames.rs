use bevy::prelude::*;

use super::curve::PathCurve;

/// Orthonormal basis sampled along the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathFrame {
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

/// Parallel-transport frames, so the tube cross-section never twists around
/// the path the way a Frenet frame does at inflection points.
#[derive(Debug, Clone)]
pub struct PathFrames {
    tangents: Vec<Vec3>,
    normals: Vec<Vec3>,
    binormals: Vec<Vec3>,
}

impl PathFrames {
    pub fn build(curve: &PathCurve, samples: usize, look_ahead_delta: f32) -> Self {
        let samples = samples.max(2);
        let tangents: Vec<Vec3> = (0..samples)
            .map(|i| {
                let t = i as f32 / (samples - 1) as f32;
                // The last closed sample sits on the seam; sample just before it.
                let t = if curve.is_closed() { t.min(0.9999) } else { t };
                curve.tangent_at(t, look_ahead_delta)
            })
            .collect();

        let mut normals = Vec::with_capacity(samples);
        let mut binormals = Vec::with_capacity(samples);

        let first = tangents[0];
        let mut seed = Vec3::Y;
        if seed.dot(first).abs() > 0.9 {
            seed = Vec3::X;
        }
        let n0 = (seed - first * seed.dot(first)).normalize_or_zero();
        normals.push(n0);
        binormals.push(first.cross(n0).normalize_or_zero());

        for i in 1..samples {
            let previous_tangent = tangents[i - 1];
            let tangent = tangents[i];

            let mut carried = normals[i - 1];
            let axis = previous_tangent.cross(tangent);
            let axis_length = axis.length();
            if axis_length > 1e-8 {
                let angle = previous_tangent.dot(tangent).clamp(-1.0, 1.0).acos();
                carried = Quat::from_axis_angle(axis / axis_length, angle) * carried;
            }

            let mut normal = (carried - tangent * carried.dot(tangent)).normalize_or_zero();
            if normal == Vec3::ZERO {
                let fallback = normals[i - 1];
                normal = (fallback - tangent * fallback.dot(tangent)).normalize_or_zero();
            }
            if normal.dot(normals[i - 1]) < 0.0 {
                normal = -normal;
            }

            binormals.push(tangent.cross(normal).normalize_or_zero());
            normals.push(normal);
        }

        Self {
            tangents,
            normals,
            binormals,
        }
    }

    pub fn len(&self) -> usize {
        self.tangents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tangents.is_empty()
    }

    /// Interpolated frame at `u` in `[0, 1]`.
    pub fn frame_at(&self, u: f32) -> PathFrame {
        let samples = self.len();
        let u = if u.is_finite() { u.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = u * (samples - 1) as f32;
        let index = (scaled.floor() as usize).min(samples - 2);
        let t = scaled - index as f32;

        PathFrame {
            tangent: self.tangents[index]
                .lerp(self.tangents[index + 1], t)
                .normalize_or_zero(),
            normal: self.normals[index]
                .lerp(self.normals[index + 1], t)
                .normalize_or_zero(),
            binormal: self.binormals[index]
                .lerp(self.binormals[index + 1], t)
                .normalize_or_zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_orthonormal() {
        let points = vec![
            Vec3::new(10.0, 0.0, 89.0),
            Vec3::new(50.0, 10.0, 88.0),
            Vec3::new(76.0, 20.0, 139.0),
            Vec3::new(126.0, 12.0, 141.0),
            Vec3::new(150.0, 8.0, 112.0),
        ];
        let curve = PathCurve::new(points, 0.5, false).unwrap();
        let frames = PathFrames::build(&curve, 128, 0.01);
        assert_eq!(frames.len(), 128);

        for i in 0..=20 {
            let frame = frames.frame_at(i as f32 / 20.0);
            assert!(frame.tangent.dot(frame.normal).abs() < 0.05);
            assert!(frame.tangent.dot(frame.binormal).abs() < 0.05);
            assert!((frame.normal.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn normals_do_not_flip_between_samples() {
        let points = (0..20)
            .map(|i| {
                let angle = i as f32 / 20.0 * std::f32::consts::TAU;
                Vec3::new(100.0 * angle.cos(), 0.0, 100.0 * angle.sin())
            })
            .collect();
        let curve = PathCurve::new(points, 0.2, true).unwrap();
        let frames = PathFrames::build(&curve, 256, 0.01);
        for i in 1..frames.len() {
            assert!(frames.normals[i].dot(frames.normals[i - 1]) > 0.9);
        }
    }
}
