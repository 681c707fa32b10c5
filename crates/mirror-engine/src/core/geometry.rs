//! Pure 2D tests used by collision and region masking.

use glam::Vec2;

/// Perpendicular tolerance, in pixels, for treating a point as lying on an edge.
const EDGE_EPSILON: f32 = 1e-4;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True iff a tracked point with touch radius `tolerance` overlaps a circle.
/// Strict: touching exactly at `radius + tolerance` is a miss.
#[inline]
pub fn circle_hit(center: Vec2, radius: f32, point: Vec2, tolerance: f32) -> bool {
    distance(center, point) < radius + tolerance
}

/// True if `p` lies on the segment `a`–`b` (within [`EDGE_EPSILON`]).
pub fn point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    let ab = b - a;
    let len = ab.length();
    if len <= f32::EPSILON {
        return p.distance(a) <= EDGE_EPSILON;
    }
    let off_line = ab.perp_dot(p - a).abs() / len;
    if off_line > EDGE_EPSILON {
        return false;
    }
    let t = ab.dot(p - a) / (len * len);
    (-EDGE_EPSILON..=1.0 + EDGE_EPSILON).contains(&t)
}

/// Crossing-number point-in-polygon test.
///
/// Points on an edge or vertex are outside. Horizontal edges are skipped
/// so the crossing interpolation never divides by zero.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut j = n - 1;
    for i in 0..n {
        if point_on_segment(point, polygon[j], polygon[i]) {
            return false;
        }
        j = i;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if pi.y != pj.y && (pi.y > point.y) != (pj.y > point.y) {
            let cross_x = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Axis-aligned bounds of a point set as `(min, max)`, or `None` when empty.
pub fn bounds(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
    )
}
