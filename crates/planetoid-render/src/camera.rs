//! Perspective camera producing reverse-Z view-projection matrices.

use glam::{Mat3, Mat4, Quat, Vec3};

/// A perspective camera positioned in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation as a unit quaternion. Identity looks down -Z.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Build a camera from a vertical field of view in degrees.
    pub fn perspective(fov_deg: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_deg.to_radians(),
            aspect_ratio,
            near,
            far,
            ..Self::default()
        }
    }

    /// Inverse of the camera's world transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Projection with near and far swapped so depth runs 1.0 (near) to 0.0 (far).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Aspect ratio from a surface size. Zero heights are treated as 1.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height.max(1.0);
    }

    /// Orient the camera toward `target`. Leaves the rotation unchanged when
    /// the camera sits on the target or looks straight along `up`.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let back = self.position - target;
        if back.length_squared() < f32::EPSILON {
            return;
        }
        let back = back.normalize();
        let right = up.cross(back);
        if right.length_squared() < 1e-12 {
            return;
        }
        let right = right.normalize();
        let true_up = back.cross(right);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, true_up, back)).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: 60f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 1.0,
            far: 5000.0,
        }
    }
}
