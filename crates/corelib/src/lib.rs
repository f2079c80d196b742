//! Core types: math re-exports, tracked poses and the pose math built on them.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod plane;
pub mod pose;
pub mod tracking;
pub mod transform;

pub use plane::{distance_to_plane, signed_distance};
pub use pose::Pose;
pub use tracking::{ScopedPose, TrackingSession};
pub use transform::{TransformMatrix, log_4x4_matrix, transform_from_anchor};
