use bevy::prelude::*;
use constants::tunnel::{ARC_LENGTH_DIVISIONS, END_DIRECTION_DELTA};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("path needs at least {required} control points, got {found}")]
    TooFewPoints { found: usize, required: usize },
}

/// Cardinal Catmull-Rom spline through fixed control points, sampled by arc length.
///
/// `point_at(t)` treats `t` as the fraction of the total length travelled, so the
/// camera moves at constant speed regardless of how unevenly the control points
/// are spaced. Open curves clamp `t` into `[0, 1]`; closed curves wrap it.
#[derive(Debug, Clone)]
pub struct PathCurve {
    points: Vec<Vec3>,
    tension: f32,
    closed: bool,
    /// Cumulative chord length at `divisions + 1` evenly spaced raw parameters.
    arc_lengths: Vec<f32>,
}

impl PathCurve {
    pub fn new(points: Vec<Vec3>, tension: f32, closed: bool) -> Result<Self, CurveError> {
        Self::with_divisions(points, tension, closed, ARC_LENGTH_DIVISIONS)
    }

    pub fn with_divisions(
        points: Vec<Vec3>,
        tension: f32,
        closed: bool,
        divisions: usize,
    ) -> Result<Self, CurveError> {
        let required = if closed { 3 } else { 2 };
        if points.len() < required {
            return Err(CurveError::TooFewPoints {
                found: points.len(),
                required,
            });
        }

        let mut curve = Self {
            points,
            tension,
            closed,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.measure(divisions.max(1));
        Ok(curve)
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn tension(&self) -> f32 {
        self.tension
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Total length of the curve in world units.
    pub fn arc_length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Bring any `t` into the curve's domain: wrap when closed, clamp when open.
    pub fn sanitize(&self, t: f32) -> f32 {
        if !t.is_finite() {
            return 0.0;
        }
        if self.closed {
            t.rem_euclid(1.0)
        } else {
            t.clamp(0.0, 1.0)
        }
    }

    /// Position at arc-length fraction `t`.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let u = self.raw_parameter(self.sanitize(t));
        self.point(u)
    }

    /// Unit direction from `point_at(t)` toward `point_at(t + look_ahead_delta)`.
    ///
    /// At the end of an open curve both samples collapse onto the last point; the
    /// direction of the final segment is returned instead.
    pub fn tangent_at(&self, t: f32, look_ahead_delta: f32) -> Vec3 {
        let t = self.sanitize(t);
        let here = self.point_at(t);
        let ahead = self.point_at(t + look_ahead_delta);
        let direction = (ahead - here).normalize_or_zero();
        if direction == Vec3::ZERO {
            self.end_direction(look_ahead_delta.abs().max(END_DIRECTION_DELTA))
        } else {
            direction
        }
    }

    /// Direction in which the curve leaves its final point.
    pub fn end_direction(&self, delta: f32) -> Vec3 {
        let delta = if delta.is_finite() {
            delta.clamp(1e-4, 1.0)
        } else {
            END_DIRECTION_DELTA
        };
        let end = self.raw_point_at_fraction(1.0);
        let before = self.raw_point_at_fraction(1.0 - delta);
        (end - before).normalize_or_zero()
    }

    /// Sample without wrapping, so `1.0` on a closed curve means "the end of the
    /// last segment" rather than "back to the start".
    fn raw_point_at_fraction(&self, t: f32) -> Vec3 {
        self.point(self.raw_parameter(t.clamp(0.0, 1.0)))
    }

    fn segment_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }

    /// Evaluate the spline at raw parameter `u` in `[0, 1]` (uniform per segment).
    fn point(&self, u: f32) -> Vec3 {
        let segments = self.segment_count();
        let scaled = u.clamp(0.0, 1.0) * segments as f32;
        let mut index = scaled.floor() as usize;
        let mut local = scaled - index as f32;
        if index >= segments {
            index = segments - 1;
            local = 1.0;
        }

        let n = self.points.len();
        let (p0, p1, p2, p3) = if self.closed {
            (
                self.points[(index + n - 1) % n],
                self.points[index % n],
                self.points[(index + 1) % n],
                self.points[(index + 2) % n],
            )
        } else {
            let p1 = self.points[index];
            let p2 = self.points[index + 1];
            // Mirror the end points to invent the missing neighbours.
            let p0 = if index > 0 {
                self.points[index - 1]
            } else {
                p1 * 2.0 - p2
            };
            let p3 = if index + 2 < n {
                self.points[index + 2]
            } else {
                p2 * 2.0 - p1
            };
            (p0, p1, p2, p3)
        };

        cardinal(p0, p1, p2, p3, local, self.tension)
    }

    fn measure(&self, divisions: usize) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(divisions + 1);
        lengths.push(0.0);
        let mut last = self.point(0.0);
        let mut total = 0.0;
        for step in 1..=divisions {
            let current = self.point(step as f32 / divisions as f32);
            total += current.distance(last);
            lengths.push(total);
            last = current;
        }
        lengths
    }

    /// Invert the arc-length table: fraction of length travelled -> raw parameter.
    fn raw_parameter(&self, t: f32) -> f32 {
        let total = self.arc_length();
        let intervals = self.arc_lengths.len() - 1;
        if total <= f32::EPSILON || intervals == 0 {
            return t;
        }

        let target = t * total;
        let upper = self.arc_lengths.partition_point(|&length| length <= target);
        let index = upper.saturating_sub(1).min(intervals - 1);

        let before = self.arc_lengths[index];
        let span = self.arc_lengths[index + 1] - before;
        let fraction = if span > f32::EPSILON {
            ((target - before) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        (index as f32 + fraction) / intervals as f32
    }
}

/// Cubic Hermite segment between `p1` and `p2` with tangents scaled by `tension`.
fn cardinal(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32, tension: f32) -> Vec3 {
    let v0 = (p2 - p0) * tension;
    let v1 = (p3 - p1) * tension;

    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    p1 * h00 + v0 * h10 + p2 * h01 + v1 * h11
}
