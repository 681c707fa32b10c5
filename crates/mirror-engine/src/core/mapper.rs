//! Detector space → screen space.
//!
//! The camera image is drawn mirrored, so every landmark consumed by
//! collision tests or the overlay goes through [`to_screen`].

use glam::Vec2;

use crate::api::types::{DetectionResult, Landmark, LandmarkSet};
use crate::core::viewport::Viewport;

/// Map a normalized landmark to mirrored canvas pixels.
/// `x' = origin.x + (1 - x) * width`, `y' = origin.y + y * height`.
#[inline]
pub fn to_screen(landmark: &Landmark, viewport: &Viewport) -> Vec2 {
    Vec2::new(
        viewport.origin.x + (1.0 - landmark.x) * viewport.width,
        viewport.origin.y + landmark.y * viewport.height,
    )
}

/// Mirror a normalized x coordinate.
#[inline]
pub fn mirror_x(x: f32) -> f32 {
    1.0 - x
}

pub fn map_set(set: &LandmarkSet, viewport: &Viewport) -> Vec<Vec2> {
    set.iter().map(|lm| to_screen(lm, viewport)).collect()
}

/// All subjects of one detection result, already in screen space.
/// Computed once per frame and shared by collision and overlay drawing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenLandmarks {
    subjects: Vec<Vec<Vec2>>,
}

impl ScreenLandmarks {
    pub fn from_result(result: &DetectionResult, viewport: &Viewport) -> Self {
        Self {
            subjects: result
                .landmark_sets
                .iter()
                .map(|set| map_set(set, viewport))
                .collect(),
        }
    }

    pub fn subjects(&self) -> &[Vec<Vec2>] {
        &self.subjects
    }

    pub fn subject(&self, index: usize) -> Option<&[Vec2]> {
        self.subjects.get(index).map(Vec::as_slice)
    }

    pub fn point(&self, subject: usize, landmark: usize) -> Option<Vec2> {
        self.subjects.get(subject)?.get(landmark).copied()
    }

    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
