//! Per-frame draw order shared by every variant:
//! clear, mirrored video, processed pixels, targets, physics ball,
//! landmark overlay, HUD, end screen.

use glam::Vec2;

use crate::api::error::EngineError;
use crate::api::variant::{HudStyle, Stroke};
use crate::core::clock::GamePhase;
use crate::core::session::Session;
use crate::core::targets::{Target, TargetState};
use crate::render::color::Color;
use crate::render::commands::{DrawCommand, DrawList, TextAlign, TextBaseline};
use crate::render::overlay::draw_landmarks;
use crate::render::pixels::{apply_effect, PixelFrame};

const HUD_MARGIN: f32 = 20.0;
const TIMER_Y: f32 = 80.0;
const TARGET_LABEL_SIZE: f32 = 14.0;

const RESTART_SIZE: Vec2 = Vec2::new(300.0, 80.0);
const RESTART_TOP_OFFSET: f32 = 150.0;

/// Physics ball colors.
const BALL_FILL: Color = Color::HOT_PINK;
const BALL_STROKE: Stroke = Stroke::solid(Color::CYAN, 2.0);

/// Score and timer font sizes in pixels for a canvas `width` wide.
pub fn hud_fonts(style: HudStyle, width: f32) -> Option<(f32, f32)> {
    match style {
        HudStyle::Fixed => Some((48.0, 40.0)),
        HudStyle::Responsive => Some(((width / 15.0).clamp(20.0, 48.0), (width / 18.0).clamp(16.0, 40.0))),
        HudStyle::Hidden => None,
    }
}

/// Where the canvas element is laid out on the page, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Map a client-space point into canvas pixels for a canvas of `canvas`
    /// backing size. `None` if the element has no displayed area.
    pub fn to_canvas(&self, client: Vec2, canvas: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let scale = Vec2::new(canvas.x / self.width, canvas.y / self.height);
        Some((client - Vec2::new(self.left, self.top)) * scale)
    }
}

/// Bounds of the restart button in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestartControl {
    pub origin: Vec2,
    pub size: Vec2,
}

impl RestartControl {
    /// Centered horizontally, below the final score.
    pub fn for_canvas(canvas: Vec2) -> Self {
        Self {
            origin: Vec2::new(
                canvas.x / 2.0 - RESTART_SIZE.x / 2.0,
                canvas.y / 2.0 + RESTART_TOP_OFFSET,
            ),
            size: RESTART_SIZE,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.origin + self.size;
        p.x >= self.origin.x && p.x <= max.x && p.y >= self.origin.y && p.y <= max.y
    }

    /// Hit test a pointer given in client coordinates.
    pub fn contains_client(&self, client: Vec2, displayed: &DisplayRect, canvas: Vec2) -> bool {
        displayed
            .to_canvas(client, canvas)
            .is_some_and(|p| self.contains(p))
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }
}

/// Builds the draw list for one frame and remembers the restart bounds.
pub struct FrameCompositor {
    list: DrawList,
    restart: Option<RestartControl>,
}

impl FrameCompositor {
    pub fn new() -> Self {
        Self {
            list: DrawList::new(),
            restart: None,
        }
    }

    /// Apply the variant's pixel effect to the frame read back from the
    /// canvas. The region is rasterized once for the whole frame.
    /// Returns false when the variant has no pixel effect.
    pub fn process_pixels(
        &self,
        session: &Session,
        bytes: &mut [u8],
        width: u32,
        height: u32,
    ) -> Result<bool, EngineError> {
        let effect = session.profile().pixel_effect;
        let mut frame = PixelFrame::from_bytes(bytes, width, height)?;
        let mask = session.region().map(|r| r.rasterize(width, height));
        Ok(apply_effect(effect, &mut frame, mask.as_ref()))
    }

    /// Record this frame's draw list.
    pub fn compose(&mut self, session: &Session, pixels_processed: bool) -> &DrawList {
        self.list.reset();
        self.restart = None;

        let layout = session.layout();
        let canvas = layout.canvas;
        let camera = layout.camera;
        let profile = session.profile();

        self.list.clear_canvas(canvas);
        self.list.push(DrawCommand::VideoFrame {
            origin: camera.origin,
            size: camera.size(),
            mirrored: true,
        });
        if pixels_processed {
            self.list.push(DrawCommand::PixelBuffer {
                origin: Vec2::ZERO,
                width: canvas.x.round() as u32,
                height: canvas.y.round() as u32,
            });
        }

        let vanish_frames = session.targets().vanish_frames();
        for target in session.targets().iter() {
            draw_target(&mut self.list, target, vanish_frames);
        }

        if let Some((center, radius)) = session.ball() {
            self.list.fill_circle(center, radius, BALL_FILL);
            self.list.stroke_circle(center, radius, BALL_STROKE);
        }

        draw_landmarks(
            &mut self.list,
            session.landmarks(),
            &profile.overlay,
            session.region(),
        );

        if profile.targets {
            if let Some(fonts) = hud_fonts(profile.hud, canvas.x) {
                self.draw_hud(session, canvas, fonts);
                if session.state().phase == GamePhase::Ended {
                    self.restart = Some(self.draw_end_screen(session, canvas));
                }
            }
        }

        &self.list
    }

    fn draw_hud(&mut self, session: &Session, canvas: Vec2, (score_size, timer_size): (f32, f32)) {
        let x = canvas.x - HUD_MARGIN;
        self.list.text(
            format!("Score: {}", session.state().total_score),
            Vec2::new(x, HUD_MARGIN),
            score_size,
            Color::WHITE,
            TextAlign::Right,
            TextBaseline::Top,
        );
        self.list.text(
            format!("{:.1}s", session.remaining_secs()),
            Vec2::new(x, TIMER_Y),
            timer_size,
            Color::WHITE,
            TextAlign::Right,
            TextBaseline::Top,
        );
    }

    fn draw_end_screen(&mut self, session: &Session, canvas: Vec2) -> RestartControl {
        let center = canvas / 2.0;
        self.list
            .fill_rect(Vec2::ZERO, canvas, Color::BLACK.with_opacity(0.7));
        self.list.text(
            "GAME OVER",
            center - Vec2::new(0.0, 100.0),
            80.0,
            Color::WHITE,
            TextAlign::Center,
            TextBaseline::Middle,
        );
        self.list.text(
            format!("Final Score: {}", session.state().final_score),
            center + Vec2::new(0.0, 50.0),
            60.0,
            Color::WHITE,
            TextAlign::Center,
            TextBaseline::Middle,
        );

        let button = RestartControl::for_canvas(canvas);
        self.list.fill_rect(button.origin, button.size, Color::GREEN);
        self.list
            .stroke_rect(button.origin, button.size, Stroke::solid(Color::WHITE, 3.0));
        self.list.text(
            "RESTART",
            button.center(),
            48.0,
            Color::BLACK,
            TextAlign::Center,
            TextBaseline::Middle,
        );
        button
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }

    /// Restart bounds from the last composed frame; `None` unless it showed
    /// the end screen.
    pub fn restart_control(&self) -> Option<RestartControl> {
        self.restart
    }
}

impl Default for FrameCompositor {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_target(list: &mut DrawList, target: &Target, vanish_frames: u32) {
    match target.state {
        TargetState::Falling => {
            list.fill_circle(target.position, target.radius, target.color);
            list.text(
                target.points.to_string(),
                target.position,
                TARGET_LABEL_SIZE,
                Color::BLACK,
                TextAlign::Center,
                TextBaseline::Middle,
            );
        }
        TargetState::Vanishing { .. } => {
            let Some(visual) = target.vanish_visual(vanish_frames) else {
                return;
            };
            list.fill_circle(
                visual.center,
                visual.radius,
                target.color.with_opacity(visual.opacity),
            );
            let particle_color = target.color.with_opacity(visual.particle_opacity);
            for p in visual.particles {
                list.fill_circle(p, visual.particle_radius, particle_color);
            }
        }
        TargetState::Dead => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SessionConfig;
    use crate::api::types::{DetectionResult, Landmark, LandmarkSet};
    use crate::api::variant::VariantProfile;
    use crate::core::viewport::{Layout, Viewport};

    fn session(profile: VariantProfile, duration_ms: u32) -> Session {
        let camera = Viewport::new(640.0, 480.0).unwrap();
        let layout = Layout {
            canvas: camera.size(),
            camera,
        };
        let config = SessionConfig::default().with_duration_ms(duration_ms);
        Session::new(profile, config, layout).unwrap()
    }

    fn op(command: &DrawCommand) -> &'static str {
        match command {
            DrawCommand::Clear { .. } => "clear",
            DrawCommand::VideoFrame { .. } => "video",
            DrawCommand::PixelBuffer { .. } => "pixels",
            DrawCommand::Circle { .. } => "circle",
            DrawCommand::Ellipse { .. } => "ellipse",
            DrawCommand::Line { .. } => "line",
            DrawCommand::Polygon { .. } => "polygon",
            DrawCommand::Rect { .. } => "rect",
            DrawCommand::Text { .. } => "text",
        }
    }

    fn texts(list: &DrawList) -> Vec<String> {
        list.iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn draw_order_is_fixed() {
        let mut s = session(VariantProfile::hand_catch(), 10_000);
        let camera = s.layout().camera;
        s.targets_mut().spawn_at(50, 100.0, &camera);
        let hand = LandmarkSet::new(vec![Landmark::new(0.9, 0.9)]);
        s.step(&DetectionResult::new(vec![hand], 0.0), 0.0);

        let mut compositor = FrameCompositor::new();
        let ops: Vec<_> = compositor.compose(&s, false).iter().map(op).collect();
        assert_eq!(
            ops,
            vec!["clear", "video", "circle", "text", "circle", "text", "text"],
        );
        assert_eq!(texts(compositor.draw_list()), vec!["50", "Score: 0", "10.0s"]);
        assert!(compositor.restart_control().is_none());
    }

    #[test]
    fn pixel_blit_follows_video() {
        let s = session(VariantProfile::thermography(), 10_000);
        let mut compositor = FrameCompositor::new();
        let ops: Vec<_> = compositor.compose(&s, true).iter().map(op).collect();
        assert_eq!(ops, vec!["clear", "video", "pixels"]);
    }

    #[test]
    fn filter_variant_has_no_hud() {
        let s = session(VariantProfile::pixelation(), 10_000);
        let mut compositor = FrameCompositor::new();
        assert!(texts(compositor.compose(&s, false)).is_empty());
    }

    #[test]
    fn end_screen_records_restart_bounds() {
        let mut s = session(VariantProfile::pose_catch(), 1_000);
        s.step(&DetectionResult::empty(0.0), 0.0);
        s.step(&DetectionResult::empty(1_000.0), 1_000.0);

        let mut compositor = FrameCompositor::new();
        let list = compositor.compose(&s, false);
        let t = texts(list);
        assert!(t.contains(&"GAME OVER".to_string()));
        assert!(t.contains(&"Final Score: 0".to_string()));
        assert!(t.contains(&"0.0s".to_string()));

        let control = compositor.restart_control().unwrap();
        assert_eq!(control.origin, Vec2::new(170.0, 390.0));
        assert_eq!(control.size, Vec2::new(300.0, 80.0));
    }

    #[test]
    fn restart_hit_test_scales_client_coordinates() {
        let control = RestartControl::for_canvas(Vec2::new(640.0, 480.0));
        // Canvas shown at half size, offset on the page.
        let displayed = DisplayRect::new(100.0, 50.0, 320.0, 240.0);
        let canvas = Vec2::new(640.0, 480.0);
        let inside = Vec2::new(100.0 + 160.0, 50.0 + 215.0);
        let outside = Vec2::new(100.0 + 160.0, 50.0 + 100.0);
        assert!(control.contains_client(inside, &displayed, canvas));
        assert!(!control.contains_client(outside, &displayed, canvas));
        let hidden = DisplayRect::new(0.0, 0.0, 0.0, 0.0);
        assert!(!control.contains_client(inside, &hidden, canvas));
    }

    #[test]
    fn responsive_fonts_clamp() {
        assert_eq!(hud_fonts(HudStyle::Responsive, 200.0), Some((20.0, 16.0)));
        assert_eq!(hud_fonts(HudStyle::Responsive, 2000.0), Some((48.0, 40.0)));
        assert_eq!(hud_fonts(HudStyle::Responsive, 540.0), Some((36.0, 30.0)));
        assert_eq!(hud_fonts(HudStyle::Hidden, 540.0), None);
    }

    #[test]
    fn process_pixels_rejects_bad_buffer() {
        let s = session(VariantProfile::thermography(), 10_000);
        let compositor = FrameCompositor::new();
        let mut bytes = vec![0u8; 7];
        assert!(compositor.process_pixels(&s, &mut bytes, 2, 2).is_err());
    }

    #[test]
    fn process_pixels_applies_effect_without_region() {
        let s = session(VariantProfile::thermography(), 10_000);
        let compositor = FrameCompositor::new();
        let mut bytes = vec![0, 0, 0, 255, 0, 0, 0, 255];
        assert!(compositor.process_pixels(&s, &mut bytes, 2, 1).unwrap());
        assert_eq!(&bytes[..4], &[255, 0, 255, 255]);
    }
}
