pub mod api;
pub mod core;
pub mod render;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigOverrides, SessionConfig};
pub use api::detector::{Detector, DetectorHandle, Freshness, ThrottledDetector};
pub use api::error::EngineError;
pub use api::lifecycle::{FrameLoop, FrameScheduler, LoopState, NoStream, StreamHandle};
pub use api::types::{DetectionResult, Landmark, LandmarkSet, TargetId};
pub use api::variant::{
    CollisionSubjects, HudStyle, OverlayStyle, PixelEffect, Stroke, TrackerKind, VariantProfile,
};
pub use core::clock::{GameClock, GamePhase, GameState};
pub use core::geometry::{circle_hit, distance, point_in_polygon};
pub use core::mapper::{to_screen, ScreenLandmarks};
pub use core::region::{CoverageMask, RegionMask};
pub use core::session::{FrameReport, Session};
pub use core::targets::{Target, TargetField, TargetState};
pub use core::viewport::{fit, Layout, Viewport};
pub use input::queue::{InputEvent, InputQueue};
pub use render::color::Color;
pub use render::commands::{DrawCommand, DrawList};
pub use render::compositor::{DisplayRect, FrameCompositor, RestartControl};

#[cfg(feature = "physics")]
pub use core::physics::BounceArena;
