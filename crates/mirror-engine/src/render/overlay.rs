use std::f32::consts::PI;

use glam::Vec2;

use crate::api::variant::{OverlayStyle, PinchArrow};
use crate::core::mapper::ScreenLandmarks;
use crate::core::region::RegionMask;
use crate::core::skeleton::{INDEX_TIP, POSE_FACE_ANCHOR, THUMB_TIP};
use crate::render::color::Color;
use crate::render::commands::DrawList;

// Face mask geometry, relative to the anchor landmark.
const FACE_RADIUS: f32 = 120.0;
const EYE_RADIUS: f32 = 15.0;
const EYE_OFFSET: Vec2 = Vec2::new(50.0, -20.0);
const MOUTH_OFFSET: Vec2 = Vec2::new(0.0, 40.0);
const MOUTH_RADII: Vec2 = Vec2::new(40.0, 15.0);

/// Draw every subject's landmarks, then the region outline if any.
pub fn draw_landmarks(
    list: &mut DrawList,
    landmarks: &ScreenLandmarks,
    style: &OverlayStyle,
    region: Option<&RegionMask>,
) {
    for (index, points) in landmarks.subjects().iter().enumerate() {
        if style.face_mask {
            if let Some(&anchor) = points.get(POSE_FACE_ANCHOR) {
                draw_face_mask(list, anchor);
            }
        }
        draw_subject(list, points, style, style.point_color(index));
    }

    if let (Some(stroke), Some(region)) = (style.region_outline, region) {
        list.stroke_polygon(region.corners.to_vec(), stroke);
    }
}

fn draw_subject(list: &mut DrawList, points: &[Vec2], style: &OverlayStyle, color: Color) {
    let visible = points.iter().skip(style.first_landmark);

    for &p in visible.clone() {
        list.fill_circle(p, style.point_radius, color);
    }

    if let Some(stroke) = style.connector {
        for (a, b) in style.skeleton.connections_from(style.first_landmark) {
            if let (Some(&pa), Some(&pb)) = (points.get(a), points.get(b)) {
                list.line(pa, pb, stroke);
            }
        }
    }

    if let Some(ring) = style.ring {
        for &p in visible {
            list.stroke_circle(p, ring.radius, ring.stroke);
        }
    }

    if let Some(arrow) = style.pinch_arrow {
        if let (Some(&thumb), Some(&index)) = (points.get(THUMB_TIP), points.get(INDEX_TIP)) {
            draw_pinch_arrow(list, thumb, index, arrow);
        }
    }
}

/// Dashed line from `from` to `to` with a filled arrowhead at `to`.
pub fn draw_pinch_arrow(list: &mut DrawList, from: Vec2, to: Vec2, arrow: PinchArrow) {
    list.line(from, to, arrow.stroke);
    list.fill_polygon(arrowhead(from, to, arrow.head_size).to_vec(), arrow.stroke.color);
}

/// Triangle with its tip at `to`, sides `size` long at ±30° from the shaft.
pub fn arrowhead(from: Vec2, to: Vec2, size: f32) -> [Vec2; 3] {
    let d = to - from;
    let angle = d.y.atan2(d.x);
    let side = |a: f32| to - size * Vec2::new(a.cos(), a.sin());
    [to, side(angle - PI / 6.0), side(angle + PI / 6.0)]
}

/// Black disc with white eyes and mouth centered on `anchor`.
pub fn draw_face_mask(list: &mut DrawList, anchor: Vec2) {
    list.fill_circle(anchor, FACE_RADIUS, Color::BLACK);
    list.fill_circle(
        anchor + Vec2::new(-EYE_OFFSET.x, EYE_OFFSET.y),
        EYE_RADIUS,
        Color::WHITE,
    );
    list.fill_circle(anchor + EYE_OFFSET, EYE_RADIUS, Color::WHITE);
    list.fill_ellipse(anchor + MOUTH_OFFSET, MOUTH_RADII, Color::WHITE);
}
