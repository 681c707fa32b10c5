//! Ordered 2D draw commands for the browser canvas.
//!
//! The compositor records a [`DrawList`] per frame; the host replays it
//! onto a 2D context in order. Coordinates are canvas pixels, colors are
//! CSS strings, points serialize as `[x, y]`.

use glam::Vec2;
use serde::Serialize;

use crate::api::variant::Stroke;
use crate::render::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
}

/// One canvas operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    /// Draw the current camera frame into a rectangle, optionally mirrored.
    VideoFrame {
        origin: Vec2,
        size: Vec2,
        mirrored: bool,
    },
    /// Put the processed pixel buffer back onto the canvas.
    PixelBuffer {
        origin: Vec2,
        width: u32,
        height: u32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<Color>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke: Option<Color>,
        line_width: f32,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        fill: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        dash: Option<[f32; 2]>,
    },
    Polygon {
        points: Vec<Vec2>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<Color>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke: Option<Color>,
        line_width: f32,
    },
    Rect {
        origin: Vec2,
        size: Vec2,
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<Color>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke: Option<Color>,
        line_width: f32,
    },
    Text {
        text: String,
        position: Vec2,
        size: f32,
        bold: bool,
        color: Color,
        align: TextAlign,
        baseline: TextBaseline,
    },
}

/// Per-frame command buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(256),
        }
    }

    /// Reset for a new frame, keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear_canvas(&mut self, size: Vec2) {
        self.push(DrawCommand::Clear {
            width: size.x,
            height: size.y,
        });
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            fill: Some(color),
            stroke: None,
            line_width: 0.0,
        });
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            fill: None,
            stroke: Some(stroke.color),
            line_width: stroke.width,
        });
    }

    pub fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.push(DrawCommand::Ellipse {
            center,
            radii,
            fill: color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.push(DrawCommand::Line {
            from,
            to,
            color: stroke.color,
            width: stroke.width,
            dash: stroke.dash,
        });
    }

    pub fn fill_polygon(&mut self, points: Vec<Vec2>, color: Color) {
        self.push(DrawCommand::Polygon {
            points,
            fill: Some(color),
            stroke: None,
            line_width: 0.0,
        });
    }

    /// Closed outline through `points`.
    pub fn stroke_polygon(&mut self, points: Vec<Vec2>, stroke: Stroke) {
        self.push(DrawCommand::Polygon {
            points,
            fill: None,
            stroke: Some(stroke.color),
            line_width: stroke.width,
        });
    }

    pub fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.push(DrawCommand::Rect {
            origin,
            size,
            fill: Some(color),
            stroke: None,
            line_width: 0.0,
        });
    }

    pub fn stroke_rect(&mut self, origin: Vec2, size: Vec2, stroke: Stroke) {
        self.push(DrawCommand::Rect {
            origin,
            size,
            fill: None,
            stroke: Some(stroke.color),
            line_width: stroke.width,
        });
    }

    /// Bold text, the only weight the games use.
    pub fn text(
        &mut self,
        text: impl Into<String>,
        position: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
        baseline: TextBaseline,
    ) {
        self.push(DrawCommand::Text {
            text: text.into(),
            position,
            size,
            bold: true,
            color,
            align,
            baseline,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// JSON array of commands for the host.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_tagged_array() {
        let mut list = DrawList::new();
        list.clear_canvas(Vec2::new(640.0, 480.0));
        list.fill_circle(Vec2::new(10.0, 20.0), 5.0, Color::RED);
        let json: serde_json::Value = serde_json::from_str(&list.to_json().unwrap()).unwrap();

        assert_eq!(json[0]["op"], "clear");
        assert_eq!(json[0]["width"], 640.0);
        assert_eq!(json[1]["op"], "circle");
        assert_eq!(json[1]["center"], serde_json::json!([10.0, 20.0]));
        assert_eq!(json[1]["fill"], "#FF0000");
        assert!(json[1].get("stroke").is_none());
    }

    #[test]
    fn dashed_line_keeps_pattern() {
        let mut list = DrawList::new();
        list.line(
            Vec2::ZERO,
            Vec2::ONE,
            Stroke::solid(Color::BLACK, 4.0).dashed(10.0, 5.0),
        );
        let json: serde_json::Value = serde_json::from_str(&list.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["dash"], serde_json::json!([10.0, 5.0]));
        assert_eq!(json[0]["width"], 4.0);
    }

    #[test]
    fn text_is_bold_with_css_enums() {
        let mut list = DrawList::new();
        list.text(
            "Score: 0",
            Vec2::new(620.0, 20.0),
            48.0,
            Color::WHITE,
            TextAlign::Right,
            TextBaseline::Top,
        );
        let json: serde_json::Value = serde_json::from_str(&list.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["align"], "right");
        assert_eq!(json[0]["baseline"], "top");
        assert_eq!(json[0]["bold"], true);
    }

    #[test]
    fn reset_empties_list() {
        let mut list = DrawList::new();
        list.fill_rect(Vec2::ZERO, Vec2::ONE, Color::GREEN);
        list.reset();
        assert!(list.is_empty());
    }
}
