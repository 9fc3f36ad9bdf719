use crate::constants::CAMERA_SLERP_FACTOR;
use crate::path::CameraPath;
use glam::{Mat4, Quat, Vec3};

/// Camera that rides a [`CameraPath`] and eases its orientation toward the
/// look-ahead target instead of snapping to it.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl CameraRig {
    pub fn follow(&mut self, path: &CameraPath, progress: f32) {
        self.position = path.point_at(progress);
        let target = path.look_target(progress);
        if let Some(goal) = look_rotation(self.position, target) {
            self.orientation = self
                .orientation
                .slerp(goal, CAMERA_SLERP_FACTOR)
                .normalize();
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }
}

/// Orientation of a camera at `eye` whose -Z axis points at `target`.
/// `None` when the direction is degenerate.
pub fn look_rotation(eye: Vec3, target: Vec3) -> Option<Quat> {
    let forward = target - eye;
    if forward.length_squared() < 1e-10 || forward.normalize().cross(Vec3::Y).length_squared() < 1e-8
    {
        return None;
    }
    let view = Mat4::look_at_rh(eye, target, Vec3::Y);
    let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
    Some(rotation.normalize())
}
