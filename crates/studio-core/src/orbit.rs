use crate::constants::{
    ORBIT_DAMPING, ORBIT_MAX_RADIUS, ORBIT_MIN_RADIUS, ORBIT_POLAR_EPSILON, ORBIT_ZOOM_STEP,
};
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

/// Damped spherical orbit around a target point.
///
/// Pointer drags and wheel steps accumulate deltas; [`OrbitControls::update`]
/// applies a fraction of them each frame so motion eases out.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    radius: f32,
    azimuth: f32,
    polar: f32,
    delta_azimuth: f32,
    delta_polar: f32,
    zoom_scale: f32,
    pub damping: f32,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let mut controls = Self {
            target,
            radius: 1.0,
            azimuth: 0.0,
            polar: PI / 2.0,
            delta_azimuth: 0.0,
            delta_polar: 0.0,
            zoom_scale: 1.0,
            damping: ORBIT_DAMPING,
        };
        controls.set_eye(eye);
        controls
    }

    fn set_eye(&mut self, eye: Vec3) {
        let offset = eye - self.target;
        self.radius = offset.length().clamp(ORBIT_MIN_RADIUS, ORBIT_MAX_RADIUS);
        self.azimuth = offset.x.atan2(offset.z);
        let cos_polar = if offset.length() > 0.0 {
            (offset.y / offset.length()).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.polar = cos_polar
            .acos()
            .clamp(ORBIT_POLAR_EPSILON, PI - ORBIT_POLAR_EPSILON);
    }

    /// Reset to a new eye/target pair, dropping any pending motion.
    pub fn reset(&mut self, eye: Vec3, target: Vec3) {
        self.target = target;
        self.delta_azimuth = 0.0;
        self.delta_polar = 0.0;
        self.zoom_scale = 1.0;
        self.set_eye(eye);
    }

    /// Move the orbit centre while keeping the eye where it is.
    pub fn retarget(&mut self, target: Vec3) {
        let eye = self.eye();
        self.target = target;
        self.set_eye(eye);
    }

    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.delta_azimuth -= TAU * dx / h;
        self.delta_polar -= TAU * dy / h;
    }

    /// Positive `wheel_delta` (scrolling down) moves the eye away.
    pub fn zoom(&mut self, wheel_delta: f32) {
        if wheel_delta > 0.0 {
            self.zoom_scale /= ORBIT_ZOOM_STEP;
        } else if wheel_delta < 0.0 {
            self.zoom_scale *= ORBIT_ZOOM_STEP;
        }
    }

    pub fn update(&mut self) -> Vec3 {
        self.azimuth += self.delta_azimuth * self.damping;
        self.polar = (self.polar + self.delta_polar * self.damping)
            .clamp(ORBIT_POLAR_EPSILON, PI - ORBIT_POLAR_EPSILON);
        self.radius = (self.radius * self.zoom_scale).clamp(ORBIT_MIN_RADIUS, ORBIT_MAX_RADIUS);
        self.delta_azimuth *= 1.0 - self.damping;
        self.delta_polar *= 1.0 - self.damping;
        self.zoom_scale = 1.0;
        self.eye()
    }

    pub fn eye(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + Vec3::new(
                self.radius * sin_polar * self.azimuth.sin(),
                self.radius * self.polar.cos(),
                self.radius * sin_polar * self.azimuth.cos(),
            )
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }
}
