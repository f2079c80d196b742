//! Seam to the external tracking subsystem.
//!
//! Sessions and anchors are owned by the tracking backend. Nothing here creates
//! or destroys them; the only backend resource this crate manages is the
//! transient pose object, and only through [`ScopedPose`].

use crate::Pose;

/// Read-only view of a tracking session.
pub trait TrackingSession {
    /// Backend pose object. Every handle from `create_pose` goes back through
    /// `release_pose` exactly once.
    type PoseHandle;
    /// Anchor handle owned by the session.
    type Anchor: ?Sized;

    fn create_pose(&self) -> Self::PoseHandle;
    /// Write the anchor's current tracked pose into `out`.
    fn anchor_pose(&self, anchor: &Self::Anchor, out: &mut Self::PoseHandle);
    fn read_pose(&self, pose: &Self::PoseHandle) -> Pose;
    fn release_pose(&self, pose: Self::PoseHandle);
}

/// Pose object acquired from a session and released when dropped.
///
/// Borrows the session, so it cannot outlive it, and it is neither `Clone`
/// nor `Copy`.
pub struct ScopedPose<'s, S: TrackingSession + ?Sized> {
    session: &'s S,
    // Only `None` inside `drop`.
    handle: Option<S::PoseHandle>,
}

impl<'s, S: TrackingSession + ?Sized> ScopedPose<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self {
            session,
            handle: Some(session.create_pose()),
        }
    }

    /// Acquire a pose and fill it from `anchor`.
    pub fn from_anchor(session: &'s S, anchor: &S::Anchor) -> Self {
        let mut pose = Self::new(session);
        pose.set_from_anchor(anchor);
        pose
    }

    pub fn set_from_anchor(&mut self, anchor: &S::Anchor) {
        let session = self.session;
        session.anchor_pose(anchor, self.handle_mut());
    }

    pub fn read(&self) -> Pose {
        self.session.read_pose(self.handle())
    }

    pub fn handle(&self) -> &S::PoseHandle {
        self.handle.as_ref().expect("pose handle is only taken on drop")
    }

    pub fn handle_mut(&mut self) -> &mut S::PoseHandle {
        self.handle.as_mut().expect("pose handle is only taken on drop")
    }
}

impl<S: TrackingSession + ?Sized> Drop for ScopedPose<'_, S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.session.release_pose(handle);
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::Cell;

    use super::TrackingSession;
    use crate::Pose;

    /// Session replaying fixed anchor poses and counting pose objects.
    #[derive(Default)]
    pub struct MockSession {
        pub anchors: Vec<Pose>,
        pub created: Cell<usize>,
        pub released: Cell<usize>,
    }

    impl MockSession {
        pub fn with_anchors(anchors: Vec<Pose>) -> Self {
            Self {
                anchors,
                ..Self::default()
            }
        }

        pub fn live_poses(&self) -> usize {
            self.created.get() - self.released.get()
        }
    }

    pub struct MockPose(pub Pose);

    impl TrackingSession for MockSession {
        type PoseHandle = MockPose;
        type Anchor = usize;

        fn create_pose(&self) -> MockPose {
            self.created.set(self.created.get() + 1);
            MockPose(Pose::IDENTITY)
        }

        fn anchor_pose(&self, anchor: &usize, out: &mut MockPose) {
            out.0 = self.anchors[*anchor];
        }

        fn read_pose(&self, pose: &MockPose) -> Pose {
            pose.0
        }

        fn release_pose(&self, _pose: MockPose) {
            self.released.set(self.released.get() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockSession;
    use super::*;
    use crate::Vec3;

    #[test]
    fn scoped_pose_releases_on_drop() {
        let session = MockSession::default();
        {
            let pose = ScopedPose::new(&session);
            assert_eq!(session.live_poses(), 1);
            assert_eq!(pose.read(), Pose::IDENTITY);
        }
        assert_eq!(session.created.get(), 1);
        assert_eq!(session.live_poses(), 0);
    }

    #[test]
    fn scoped_pose_releases_on_unwind() {
        let session = MockSession::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> Pose {
            let pose = ScopedPose::new(&session);
            let _ = pose.read();
            panic!("reader failed");
        }));
        assert!(result.is_err());
        assert_eq!(session.live_poses(), 0);
    }

    #[test]
    fn from_anchor_reads_anchor_pose() {
        let anchor = Pose::from_translation(Vec3::new(0.5, 1.0, -2.0));
        let session = MockSession::with_anchors(vec![Pose::IDENTITY, anchor]);
        let pose = ScopedPose::from_anchor(&session, &1);
        assert_eq!(pose.read(), anchor);
    }
}
