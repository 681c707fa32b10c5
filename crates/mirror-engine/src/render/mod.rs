pub mod color;
pub mod commands;
pub mod compositor;
pub mod overlay;
pub mod pixels;

pub use color::Color;
pub use commands::{DrawCommand, DrawList, TextAlign, TextBaseline};
pub use compositor::{DisplayRect, FrameCompositor, RestartControl};
