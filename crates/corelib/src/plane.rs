//! Normal distance between a camera and a detected plane.

use crate::{Pose, TrackingSession};

/// Signed distance from `camera_pose` to the plane through `plane_pose`.
///
/// `plane_pose` must have its local Y axis along the plane normal (plane
/// center or hit-test poses do). This is not checked; any other pose gives a
/// meaningless number. Positive means the camera is on the normal side.
pub fn distance_to_plane<S: TrackingSession + ?Sized>(
    session: &S,
    plane_pose: &S::PoseHandle,
    camera_pose: &S::PoseHandle,
) -> f32 {
    signed_distance(
        &session.read_pose(plane_pose),
        &session.read_pose(camera_pose),
    )
}

/// Same as [`distance_to_plane`] on poses already read from the session.
#[inline]
pub fn signed_distance(plane: &Pose, camera: &Pose) -> f32 {
    (camera.position - plane.position).dot(plane.y_axis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::mock::{MockPose, MockSession};
    use crate::{Quat, Vec3};
    use approx::assert_abs_diff_eq;

    #[test]
    fn camera_above_and_below_horizontal_plane() {
        let session = MockSession::default();
        let plane = MockPose(Pose::IDENTITY);
        let above = MockPose(Pose::from_translation(Vec3::new(0.0, 5.0, 0.0)));
        let below = MockPose(Pose::from_translation(Vec3::new(0.0, -3.0, 0.0)));

        assert_abs_diff_eq!(distance_to_plane(&session, &plane, &above), 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(distance_to_plane(&session, &plane, &below), -3.0, epsilon = 1e-6);
    }

    #[test]
    fn lateral_offset_does_not_count() {
        let plane = Pose::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let camera = Pose::from_translation(Vec3::new(3.0, 4.0, -2.0));
        assert_abs_diff_eq!(signed_distance(&plane, &camera), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn vertical_plane_uses_rotated_normal() {
        // Wall facing -X: local Y rotated onto world -X.
        let plane = Pose::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let camera = Pose::from_translation(Vec3::new(-1.0, 2.0, 0.5));
        assert_abs_diff_eq!(signed_distance(&plane, &camera), 2.0, epsilon = 1e-5);
    }
}
