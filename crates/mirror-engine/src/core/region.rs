//! Two-hand region used to exempt an area from full-frame pixel effects.

use glam::Vec2;

use crate::core::geometry::{bounds, point_in_polygon};
use crate::core::mapper::ScreenLandmarks;
use crate::core::skeleton::{INDEX_TIP, THUMB_TIP};

/// Quadrilateral spanned by the thumb and index tips of two hands.
/// Vertex order: thumb(hand 0), index(hand 0), index(hand 1), thumb(hand 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionMask {
    pub corners: [Vec2; 4],
}

impl RegionMask {
    /// Build the region for this frame. Requires exactly two subjects, each
    /// with both fingertip landmarks present.
    pub fn from_landmarks(landmarks: &ScreenLandmarks) -> Option<Self> {
        if landmarks.subject_count() != 2 {
            return None;
        }
        let thumb_a = landmarks.point(0, THUMB_TIP)?;
        let index_a = landmarks.point(0, INDEX_TIP)?;
        let index_b = landmarks.point(1, INDEX_TIP)?;
        let thumb_b = landmarks.point(1, THUMB_TIP)?;
        Some(Self {
            corners: [thumb_a, index_a, index_b, thumb_b],
        })
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.corners)
    }

    /// Rasterize membership for a `width`×`height` pixel grid once.
    pub fn rasterize(&self, width: u32, height: u32) -> CoverageMask {
        let mut mask = CoverageMask::empty(width, height);
        let Some((lo, hi)) = bounds(&self.corners) else {
            return mask;
        };
        if width == 0 || height == 0 {
            return mask;
        }

        let x0 = lo.x.floor().max(0.0) as u32;
        let y0 = lo.y.floor().max(0.0) as u32;
        let x1 = (hi.x.ceil().max(0.0) as u32).min(width - 1);
        let y1 = (hi.y.ceil().max(0.0) as u32).min(height - 1);
        if x0 > x1 || y0 > y1 {
            return mask;
        }

        for y in y0..=y1 {
            let row = (y * width) as usize;
            for x in x0..=x1 {
                if self.contains(Vec2::new(x as f32, y as f32)) {
                    mask.cells[row + x as usize] = true;
                }
            }
        }
        mask
    }
}

/// Per-pixel region membership for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl CoverageMask {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn covers(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.cells[(y * self.width + x) as usize]
    }

    /// Membership by linear pixel index (row-major).
    #[inline]
    pub fn covers_index(&self, index: usize) -> bool {
        self.cells.get(index).copied().unwrap_or(false)
    }

    pub fn covered_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{DetectionResult, Landmark, LandmarkSet};
    use crate::core::viewport::Viewport;

    fn hand_with_tips(thumb: (f32, f32), index: (f32, f32)) -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5); 21];
        points[THUMB_TIP] = Landmark::new(thumb.0, thumb.1);
        points[INDEX_TIP] = Landmark::new(index.0, index.1);
        LandmarkSet::new(points)
    }

    fn screen(sets: Vec<LandmarkSet>) -> ScreenLandmarks {
        let vp = Viewport::new(100.0, 100.0).unwrap();
        ScreenLandmarks::from_result(&DetectionResult::new(sets, 0.0), &vp)
    }

    #[test]
    fn needs_exactly_two_hands() {
        let one = screen(vec![hand_with_tips((0.1, 0.1), (0.2, 0.2))]);
        assert!(RegionMask::from_landmarks(&one).is_none());
        assert!(RegionMask::from_landmarks(&screen(Vec::new())).is_none());
    }

    #[test]
    fn needs_fingertips() {
        let short = LandmarkSet::new(vec![Landmark::new(0.5, 0.5); 5]);
        let sets = vec![short.clone(), short];
        assert!(RegionMask::from_landmarks(&screen(sets)).is_none());
    }

    #[test]
    fn corners_follow_mirrored_fingertips() {
        // Mirrored: normalized x 0.75 maps to screen x 25.
        let sets = vec![
            hand_with_tips((0.75, 0.75), (0.75, 0.25)),
            hand_with_tips((0.25, 0.75), (0.25, 0.25)),
        ];
        let region = RegionMask::from_landmarks(&screen(sets)).unwrap();
        assert_eq!(region.corners[0], Vec2::new(25.0, 75.0));
        assert_eq!(region.corners[1], Vec2::new(25.0, 25.0));
        assert_eq!(region.corners[2], Vec2::new(75.0, 25.0));
        assert_eq!(region.corners[3], Vec2::new(75.0, 75.0));
        assert!(region.contains(Vec2::new(50.0, 50.0)));
        assert!(!region.contains(Vec2::new(5.0, 50.0)));
    }

    #[test]
    fn raster_matches_point_test() {
        let region = RegionMask {
            corners: [
                Vec2::new(2.0, 2.0),
                Vec2::new(6.0, 2.0),
                Vec2::new(6.0, 6.0),
                Vec2::new(2.0, 6.0),
            ],
        };
        let mask = region.rasterize(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                let expected = region.contains(Vec2::new(x as f32, y as f32));
                assert_eq!(mask.covers(x, y), expected, "pixel ({x},{y})");
            }
        }
        // Interior 3x3 only; edge pixels are outside.
        assert_eq!(mask.covered_count(), 9);
    }

    #[test]
    fn raster_clips_to_frame() {
        let region = RegionMask {
            corners: [
                Vec2::new(-50.0, -50.0),
                Vec2::new(50.0, -50.0),
                Vec2::new(50.0, 50.0),
                Vec2::new(-50.0, 50.0),
            ],
        };
        let mask = region.rasterize(4, 4);
        assert_eq!(mask.covered_count(), 16);
        assert!(!mask.covers(4, 0));
    }
}
