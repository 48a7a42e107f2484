//! Poses of yawing, tilting bodies.

use glam::{Mat4, Quat, Vec3};

/// Position, rotation and scale of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// `T(position) * Ry(yaw) * Rx(tilt_x) * Rz(tilt_z) * S(scale)`.
    pub fn from_yaw_tilt(position: Vec3, yaw: f32, tilt_x: f32, tilt_z: f32, scale: Vec3) -> Self {
        let rotation = Quat::from_rotation_y(yaw)
            * Quat::from_rotation_x(tilt_x)
            * Quat::from_rotation_z(tilt_z);
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Nose direction (-Z in model space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }
}

/// Horizontal `(forward, right)` basis for a heading of `yaw` radians around +Y.
///
/// Same directions as [`Transform::forward`] / [`Transform::right`] of a pure yaw.
pub fn yaw_basis(yaw: f32) -> (Vec3, Vec3) {
    let (sin, cos) = yaw.sin_cos();
    (Vec3::new(-sin, 0.0, -cos), Vec3::new(cos, 0.0, -sin))
}
