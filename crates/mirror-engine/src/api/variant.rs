//! Per-variant strategy: which tracker feeds the session, who can catch
//! targets, how landmarks are drawn and which pixel effect runs.
//!
//! Every game mode shares one engine and one compositor; a
//! [`VariantProfile`] is the only thing that differs between them.

use crate::api::config::{ConfigOverrides, SessionConfig};
use crate::api::error::EngineError;
use crate::core::skeleton::{Skeleton, POSE_BODY_START};
use crate::core::viewport::{media_aspect, Layout};
use crate::render::color::Color;

/// Which landmark model the host should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    Hands { max_hands: u8 },
    Pose,
}

/// Which detected subjects take part in collision tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSubjects {
    /// Every detected subject, in detector order.
    All,
    /// Only the first subject, with all of its landmarks.
    FirstSubject,
    /// Landmarks are drawn but never collide.
    None,
}

/// Full-frame pixel transform applied outside the two-hand region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelEffect {
    None,
    Thermography,
    Pixelation,
}

/// Font sizing for score and timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudStyle {
    /// 48 px score, 40 px timer.
    Fixed,
    /// Scales with canvas width, clamped to 20..48 / 16..40 px.
    Responsive,
    /// No HUD and no end screen.
    Hidden,
}

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// `[on, off]` dash lengths; solid when `None`.
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub const fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub const fn dashed(mut self, on: f32, off: f32) -> Self {
        self.dash = Some([on, off]);
        self
    }
}

/// Outline ring drawn around each landmark point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub radius: f32,
    pub stroke: Stroke,
}

/// Thumb-to-index arrow drawn per hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchArrow {
    pub stroke: Stroke,
    /// Length of the arrowhead sides.
    pub head_size: f32,
}

/// How the landmark overlay is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub skeleton: Skeleton,
    /// Landmarks before this index are not drawn (pose face points).
    pub first_landmark: usize,
    /// Point color per subject; the last entry repeats for extra subjects.
    pub point_colors: Vec<Color>,
    pub point_radius: f32,
    pub ring: Option<Ring>,
    pub connector: Option<Stroke>,
    pub pinch_arrow: Option<PinchArrow>,
    /// Outline of the two-hand region when one exists.
    pub region_outline: Option<Stroke>,
    /// Cartoon mask over the first pose's face.
    pub face_mask: bool,
}

impl OverlayStyle {
    /// Plain points plus connectors.
    pub fn new(skeleton: Skeleton, point_color: Color) -> Self {
        Self {
            skeleton,
            first_landmark: 0,
            point_colors: vec![point_color],
            point_radius: 6.0,
            ring: None,
            connector: Some(Stroke::solid(Color::WHITE, 4.0)),
            pinch_arrow: None,
            region_outline: None,
            face_mask: false,
        }
    }

    pub fn with_point_colors(mut self, colors: Vec<Color>) -> Self {
        self.point_colors = colors;
        self
    }

    pub fn with_point_radius(mut self, radius: f32) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn with_connector(mut self, stroke: Option<Stroke>) -> Self {
        self.connector = stroke;
        self
    }

    pub fn with_ring(mut self, ring: Ring) -> Self {
        self.ring = Some(ring);
        self
    }

    pub fn with_first_landmark(mut self, index: usize) -> Self {
        self.first_landmark = index;
        self
    }

    pub fn with_pinch_arrow(mut self, arrow: PinchArrow) -> Self {
        self.pinch_arrow = Some(arrow);
        self
    }

    pub fn with_region_outline(mut self, stroke: Stroke) -> Self {
        self.region_outline = Some(stroke);
        self
    }

    pub fn with_face_mask(mut self) -> Self {
        self.face_mask = true;
        self
    }

    /// Point color for subject `index`.
    pub fn point_color(&self, index: usize) -> Color {
        self.point_colors
            .get(index)
            .or_else(|| self.point_colors.last())
            .copied()
            .unwrap_or(Color::WHITE)
    }
}

/// A complete game mode.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantProfile {
    pub name: &'static str,
    pub tracker: TrackerKind,
    pub collision: CollisionSubjects,
    pub overlay: OverlayStyle,
    pub pixel_effect: PixelEffect,
    /// Falling targets, scoring and the clock run.
    pub targets: bool,
    /// The elastic physics ball runs.
    pub physics_ball: bool,
    /// Camera drawn at this fraction of the fitted size, centered in a
    /// container-sized canvas. `None` makes canvas and camera coincide.
    pub camera_inset: Option<f32>,
    pub hud: HudStyle,
    pub base_config: SessionConfig,
}

impl VariantProfile {
    /// Names accepted by [`VariantProfile::by_name`].
    pub const NAMES: [&'static str; 6] = [
        "hand-catch",
        "pose-catch",
        "thermography",
        "pixelation",
        "physics-bounce",
        "hand-viewer",
    ];

    pub fn by_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "hand-catch" => Ok(Self::hand_catch()),
            "pose-catch" => Ok(Self::pose_catch()),
            "thermography" => Ok(Self::thermography()),
            "pixelation" => Ok(Self::pixelation()),
            "physics-bounce" => Ok(Self::physics_bounce()),
            "hand-viewer" => Ok(Self::hand_viewer()),
            other => Err(EngineError::UnknownVariant(other.to_string())),
        }
    }

    /// Two hands catch falling targets.
    pub fn hand_catch() -> Self {
        Self {
            name: "hand-catch",
            tracker: TrackerKind::Hands { max_hands: 2 },
            collision: CollisionSubjects::All,
            overlay: OverlayStyle::new(Skeleton::Hand, Color::GREEN)
                .with_point_colors(vec![Color::GREEN, Color::MAGENTA]),
            pixel_effect: PixelEffect::None,
            targets: true,
            physics_ball: false,
            camera_inset: None,
            hud: HudStyle::Responsive,
            base_config: SessionConfig::default()
                .with_detect_every(2)
                .with_resolution_scale(0.7),
        }
    }

    /// Catch with the body: any landmark of the first pose collides, and the
    /// face is hidden behind a mask.
    pub fn pose_catch() -> Self {
        Self {
            name: "pose-catch",
            tracker: TrackerKind::Pose,
            collision: CollisionSubjects::FirstSubject,
            overlay: OverlayStyle::new(Skeleton::Pose, Color::RED)
                .with_first_landmark(POSE_BODY_START)
                .with_face_mask(),
            pixel_effect: PixelEffect::None,
            targets: true,
            physics_ball: false,
            camera_inset: None,
            hud: HudStyle::Fixed,
            base_config: SessionConfig::default(),
        }
    }

    fn filter(name: &'static str, effect: PixelEffect) -> Self {
        let overlay = OverlayStyle::new(Skeleton::Hand, Color::WHITE)
            .with_connector(Some(Stroke::solid(Color::BLACK, 2.0)))
            .with_ring(Ring {
                radius: 5.0,
                stroke: Stroke::solid(Color::BLACK, 2.0),
            })
            .with_pinch_arrow(PinchArrow {
                stroke: Stroke::solid(Color::BLACK, 4.0).dashed(10.0, 5.0),
                head_size: 15.0,
            })
            .with_region_outline(Stroke::solid(Color::BLACK, 3.0));
        Self {
            name,
            tracker: TrackerKind::Hands { max_hands: 2 },
            collision: CollisionSubjects::None,
            overlay,
            pixel_effect: effect,
            targets: false,
            physics_ball: false,
            camera_inset: None,
            hud: HudStyle::Hidden,
            base_config: SessionConfig::default(),
        }
    }

    /// Heat-map colors everywhere except between the hands.
    pub fn thermography() -> Self {
        Self::filter("thermography", PixelEffect::Thermography)
    }

    /// Gray mosaic everywhere except between the hands.
    pub fn pixelation() -> Self {
        Self::filter("pixelation", PixelEffect::Pixelation)
    }

    /// An elastic ball bounces around a full-window canvas with the camera
    /// inset in the middle.
    pub fn physics_bounce() -> Self {
        Self {
            name: "physics-bounce",
            tracker: TrackerKind::Hands { max_hands: 2 },
            collision: CollisionSubjects::None,
            overlay: OverlayStyle::new(Skeleton::Hand, Color::HOT_PINK)
                .with_point_radius(3.0)
                .with_connector(Some(Stroke::solid(Color::GREEN, 1.0))),
            pixel_effect: PixelEffect::None,
            targets: false,
            physics_ball: true,
            camera_inset: Some(0.6),
            hud: HudStyle::Hidden,
            base_config: SessionConfig::default(),
        }
    }

    /// Landmarks only.
    pub fn hand_viewer() -> Self {
        Self {
            name: "hand-viewer",
            tracker: TrackerKind::Hands { max_hands: 2 },
            collision: CollisionSubjects::None,
            overlay: OverlayStyle::new(Skeleton::Hand, Color::DEEP_SKY_BLUE)
                .with_connector(Some(Stroke::solid(Color::ORANGE, 2.0))),
            pixel_effect: PixelEffect::None,
            targets: false,
            physics_ball: false,
            camera_inset: None,
            hud: HudStyle::Hidden,
            base_config: SessionConfig::default(),
        }
    }

    /// Base config with host overrides applied.
    pub fn config(&self, overrides: &ConfigOverrides) -> Result<SessionConfig, EngineError> {
        self.base_config.clone().apply(overrides)
    }

    /// Canvas and camera geometry for a source of `source_width`×`source_height`
    /// shown in a container of the given size.
    pub fn layout(
        &self,
        source_width: f32,
        source_height: f32,
        container_width: f32,
        container_height: f32,
        config: &SessionConfig,
    ) -> Result<Layout, EngineError> {
        let aspect = media_aspect(source_width, source_height)?;
        match self.camera_inset {
            Some(inset) => Layout::inset(aspect, container_width, container_height, inset),
            None => Layout::fitted(
                aspect,
                container_width,
                container_height,
                config.resolution_scale,
            ),
        }
    }
}
