use crate::{Mat4, Pose, ScopedPose, TrackingSession, Vec3};

/// 4x4 affine transform, 16 floats row-major: rotation in the upper-left 3x3
/// block, translation in the fourth row.
///
/// This is the same memory layout as glam's column-major `Mat4`, so conversion
/// is a plain copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformMatrix(pub [f32; 16]);

impl TransformMatrix {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    #[inline]
    pub fn from_pose(pose: &Pose) -> Self {
        Self(pose.matrix().to_cols_array())
    }

    #[inline]
    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    /// Row `r` (0..4) in storage order.
    #[inline]
    pub fn row(&self, r: usize) -> [f32; 4] {
        let i = r * 4;
        [self.0[i], self.0[i + 1], self.0[i + 2], self.0[i + 3]]
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.0[12], self.0[13], self.0[14])
    }

    #[inline]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array(&self.0)
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<TransformMatrix> for Mat4 {
    fn from(m: TransformMatrix) -> Self {
        m.to_mat4()
    }
}

/// Model matrix of `anchor` as currently tracked by `session`.
///
/// The anchor is not validated; an untracked anchor yields whatever pose the
/// session reports for it.
pub fn transform_from_anchor<S: TrackingSession + ?Sized>(
    session: &S,
    anchor: &S::Anchor,
) -> TransformMatrix {
    let pose = ScopedPose::from_anchor(session, anchor);
    TransformMatrix::from_pose(&pose.read())
}

/// Dump a 16-float buffer to the log, one row per line.
pub fn log_4x4_matrix(raw: &[f32; 16]) {
    for row in raw.chunks_exact(4) {
        log::info!(
            "{:.2} {:.2} {:.2} {:.2}",
            row[0],
            row[1],
            row[2],
            row[3]
        );
    }
}
