use serde::{Deserialize, Serialize};

/// Unique identifier for a falling target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// A single tracked keypoint in normalized detector space.
/// `x` and `y` are in [0, 1]; `z` is the optional relative depth some trackers report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }
}

/// One detected subject (a hand or a pose): its ordered keypoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Keypoint by anatomical index, if the tracker produced that many points.
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.points
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

/// Everything the detector reported for one invocation.
/// Produced and owned by the detector; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Detected subjects in detector order (0, 1 or 2 depending on the tracker).
    pub landmark_sets: Vec<LandmarkSet>,
    /// Monotonic timestamp the detection ran at, in milliseconds.
    pub timestamp_ms: f64,
}

impl DetectionResult {
    pub fn new(landmark_sets: Vec<LandmarkSet>, timestamp_ms: f64) -> Self {
        Self {
            landmark_sets,
            timestamp_ms,
        }
    }

    /// A result with no detections.
    pub fn empty(timestamp_ms: f64) -> Self {
        Self {
            landmark_sets: Vec::new(),
            timestamp_ms,
        }
    }

    pub fn subject_count(&self) -> usize {
        self.landmark_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmark_sets.is_empty()
    }

    /// Rebuild a result from a flat `[x0, y0, x1, y1, ...]` buffer split into
    /// subjects of `set_lengths[i]` points each. Trailing coordinates that do
    /// not fill a whole subject are ignored, as is everything from the first
    /// length that overruns the buffer.
    pub fn from_flat(coords: &[f32], set_lengths: &[u32], timestamp_ms: f64) -> Self {
        let mut landmark_sets = Vec::with_capacity(set_lengths.len());
        let mut cursor = 0usize;
        for &len in set_lengths {
            let end = (len as usize)
                .checked_mul(2)
                .and_then(|n| cursor.checked_add(n))
                .filter(|&end| end <= coords.len());
            let Some(end) = end else {
                break;
            };
            let points = coords[cursor..end]
                .chunks_exact(2)
                .map(|xy| Landmark::new(xy[0], xy[1]))
                .collect();
            landmark_sets.push(LandmarkSet::new(points));
            cursor = end;
        }
        Self {
            landmark_sets,
            timestamp_ms,
        }
    }
}
