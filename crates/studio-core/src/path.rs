use crate::constants::{HERO_PATH, LOOK_AHEAD};
use crate::error::PathError;
use glam::Vec3;

const ARC_SAMPLES_PER_SEGMENT: usize = 200;
// Exponent applied to squared chord lengths: 0.25 gives centripetal knots.
const CENTRIPETAL_POW: f32 = 0.25;
const MIN_KNOT_SPACING: f32 = 1e-4;

/// Smooth camera curve through a fixed list of control points.
///
/// The curve is a centripetal Catmull-Rom spline whose missing end neighbours
/// are mirrored through the endpoints; [`CameraPath::point_at`] samples it by
/// arc length so equal progress steps cover equal distances.
#[derive(Clone, Debug)]
pub struct CameraPath {
    points: Vec<Vec3>,
    arc_lengths: Vec<f32>,
    total_length: f32,
}

impl CameraPath {
    pub fn new(points: Vec<Vec3>) -> Result<Self, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewPoints(points.len()));
        }
        let mut path = Self {
            points,
            arc_lengths: Vec::new(),
            total_length: 0.0,
        };
        let samples = path.sample_count();
        let mut lengths = Vec::with_capacity(samples + 1);
        lengths.push(0.0);
        let mut prev = path.point(0.0);
        let mut total = 0.0;
        for k in 1..=samples {
            let cur = path.point(k as f32 / samples as f32);
            total += cur.distance(prev);
            lengths.push(total);
            prev = cur;
        }
        if total <= f32::EPSILON {
            return Err(PathError::ZeroLength);
        }
        path.arc_lengths = lengths;
        path.total_length = total;
        Ok(path)
    }

    pub fn hero() -> Result<Self, PathError> {
        Self::new(HERO_PATH.iter().copied().map(Vec3::from_array).collect())
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn length(&self) -> f32 {
        self.total_length
    }

    /// Sample by curve parameter `t` in [0, 1]; control point `i` sits at
    /// `t = i / (n - 1)`.
    pub fn point(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
        let i1 = (scaled.floor() as usize).min(n - 2);
        let local = scaled - i1 as f32;
        let p1 = self.points[i1];
        let p2 = self.points[i1 + 1];
        let p0 = if i1 > 0 {
            self.points[i1 - 1]
        } else {
            2.0 * p1 - p2
        };
        let p3 = if i1 + 2 < n {
            self.points[i1 + 2]
        } else {
            2.0 * p2 - p1
        };
        centripetal_catmull_rom(p0, p1, p2, p3, local)
    }

    /// Sample by normalized arc length `u` in [0, 1].
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.arc_to_param(u))
    }

    /// Look-at target slightly ahead of `u` along the path.
    pub fn look_target(&self, u: f32) -> Vec3 {
        self.point_at((u + LOOK_AHEAD).min(1.0))
    }

    fn sample_count(&self) -> usize {
        (self.points.len() - 1) * ARC_SAMPLES_PER_SEGMENT
    }

    fn arc_to_param(&self, u: f32) -> f32 {
        let target = u.clamp(0.0, 1.0) * self.total_length;
        let idx = self.arc_lengths.partition_point(|&l| l < target);
        if idx == 0 {
            return 0.0;
        }
        if idx >= self.arc_lengths.len() {
            return 1.0;
        }
        let l0 = self.arc_lengths[idx - 1];
        let l1 = self.arc_lengths[idx];
        let frac = if l1 > l0 { (target - l0) / (l1 - l0) } else { 0.0 };
        ((idx - 1) as f32 + frac) / self.sample_count() as f32
    }
}

fn knot_spacing(a: Vec3, b: Vec3) -> f32 {
    a.distance_squared(b).powf(CENTRIPETAL_POW)
}

fn centripetal_catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let mut dt1 = knot_spacing(p1, p2);
    if dt1 < MIN_KNOT_SPACING {
        dt1 = 1.0;
    }
    let mut dt0 = knot_spacing(p0, p1);
    if dt0 < MIN_KNOT_SPACING {
        dt0 = dt1;
    }
    let mut dt2 = knot_spacing(p2, p3);
    if dt2 < MIN_KNOT_SPACING {
        dt2 = dt1;
    }

    // Non-uniform tangents, rescaled to the unit parameter of segment p1..p2.
    let m1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let m2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    p1 * h00 + m1 * h10 + p2 * h01 + m2 * h11
}
