//! Keypoint indices and connector topology for the hand and pose trackers.

/// Hand keypoints (21 per hand).
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;

/// Number of keypoints the hand tracker emits.
pub const HAND_LANDMARKS: usize = 21;

/// Hand connectors.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

/// Number of keypoints the pose tracker emits.
pub const POSE_LANDMARKS: usize = 33;

/// Pose keypoint the face mask is centered on.
pub const POSE_FACE_ANCHOR: usize = 4;

/// First pose keypoint below the face (shoulders onward).
pub const POSE_BODY_START: usize = 11;

/// Pose connectors.
pub const POSE_CONNECTIONS: [(usize, usize); 35] = [
    (0, 1), (1, 2), (2, 3), (3, 7), (0, 4), (4, 5), (5, 6), (6, 8),
    (9, 10), (11, 12), (11, 13), (13, 15), (15, 17), (15, 19), (15, 21),
    (17, 19), (12, 14), (14, 16), (16, 18), (16, 20), (16, 22), (18, 20),
    (11, 23), (12, 24), (23, 24), (23, 25), (24, 26), (25, 27), (26, 28),
    (27, 29), (28, 30), (29, 31), (30, 32), (27, 31), (28, 32),
];

/// Which connector table an overlay uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skeleton {
    Hand,
    Pose,
}

impl Skeleton {
    pub fn connections(self) -> &'static [(usize, usize)] {
        match self {
            Skeleton::Hand => &HAND_CONNECTIONS,
            Skeleton::Pose => &POSE_CONNECTIONS,
        }
    }

    /// Connectors whose endpoints are both at or after `first`.
    pub fn connections_from(self, first: usize) -> impl Iterator<Item = (usize, usize)> {
        self.connections()
            .iter()
            .copied()
            .filter(move |&(a, b)| a >= first && b >= first)
    }
}
