use crate::{Mat4, Quat, Vec3};

/// Rigid transform sampled from the tracking session (translation + unit quaternion).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    #[inline]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    #[inline]
    pub fn from_translation(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Build from the tracking backend's raw layout `[qx, qy, qz, qw, tx, ty, tz]`.
    #[inline]
    pub fn from_raw(raw: [f32; 7]) -> Self {
        Self {
            position: Vec3::new(raw[4], raw[5], raw[6]),
            orientation: Quat::from_xyzw(raw[0], raw[1], raw[2], raw[3]),
        }
    }

    #[inline]
    pub fn to_raw(&self) -> [f32; 7] {
        let q = self.orientation;
        let t = self.position;
        [q.x, q.y, q.z, q.w, t.x, t.y, t.z]
    }

    /// Matrix = T * R (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    /// Local +Y axis expressed in world space.
    #[inline]
    pub fn y_axis(&self) -> Vec3 {
        self.matrix().transform_vector3(Vec3::Y)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
