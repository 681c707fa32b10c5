use glam::Vec2;
use serde::Serialize;

use crate::api::error::EngineError;

/// The on-screen rectangle the mirrored camera image is drawn into.
/// `origin` is the top-left corner in canvas pixels (zero unless the camera is inset).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub origin: Vec2,
}

impl Viewport {
    /// A viewport anchored at the canvas origin.
    pub fn new(width: f32, height: f32) -> Result<Self, EngineError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(EngineError::InvalidGeometry(format!(
                "viewport must have positive size, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            origin: Vec2::ZERO,
        })
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Uniformly scale the size, keeping the origin.
    pub fn scaled(self, factor: f32) -> Result<Self, EngineError> {
        Ok(Self::new(self.width * factor, self.height * factor)?.with_origin(self.origin))
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Aspect-preserving size for media of `source_aspect` inside a container.
///
/// Width-bound when the source is at least as wide as the container
/// (ties go width-bound), height-bound otherwise.
pub fn fit(
    source_aspect: f32,
    container_width: f32,
    container_height: f32,
) -> Result<Viewport, EngineError> {
    if !source_aspect.is_finite() || source_aspect <= 0.0 {
        return Err(EngineError::InvalidGeometry(format!(
            "source aspect ratio must be positive, got {source_aspect}"
        )));
    }
    if !(container_width.is_finite() && container_height.is_finite())
        || container_width <= 0.0
        || container_height <= 0.0
    {
        return Err(EngineError::InvalidGeometry(format!(
            "container must have positive size, got {container_width}x{container_height}"
        )));
    }

    let container_aspect = container_width / container_height;
    if source_aspect >= container_aspect {
        Viewport::new(container_width, container_width / source_aspect)
    } else {
        Viewport::new(container_height * source_aspect, container_height)
    }
}

/// Aspect ratio of source media given its pixel size.
pub fn media_aspect(media_width: f32, media_height: f32) -> Result<f32, EngineError> {
    if !(media_width.is_finite() && media_height.is_finite())
        || media_width <= 0.0
        || media_height <= 0.0
    {
        return Err(EngineError::InvalidGeometry(format!(
            "media must have positive size, got {media_width}x{media_height}"
        )));
    }
    Ok(media_width / media_height)
}

/// Canvas size plus the camera rectangle inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    pub canvas: Vec2,
    pub camera: Viewport,
}

impl Layout {
    /// Canvas and camera coincide: the fitted viewport scaled by `resolution_scale`.
    pub fn fitted(
        source_aspect: f32,
        container_width: f32,
        container_height: f32,
        resolution_scale: f32,
    ) -> Result<Self, EngineError> {
        let camera = fit(source_aspect, container_width, container_height)?.scaled(resolution_scale)?;
        Ok(Self {
            canvas: camera.size(),
            camera,
        })
    }

    /// Canvas fills the container; the camera is fitted, scaled by `inset`
    /// and centered inside it.
    pub fn inset(
        source_aspect: f32,
        container_width: f32,
        container_height: f32,
        inset: f32,
    ) -> Result<Self, EngineError> {
        let fitted = fit(source_aspect, container_width, container_height)?.scaled(inset)?;
        let canvas = Vec2::new(container_width, container_height);
        let origin = (canvas - fitted.size()) / 2.0;
        Ok(Self {
            canvas,
            camera: fitted.with_origin(origin),
        })
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas.x
    }

    pub fn canvas_height(&self) -> f32 {
        self.canvas.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "expected {b}, got {a}");
    }

    #[test]
    fn wide_source_is_width_bound() {
        let vp = fit(16.0 / 9.0, 1000.0, 1000.0).unwrap();
        assert_close(vp.width, 1000.0);
        assert_close(vp.height, 562.5);
    }

    #[test]
    fn tall_source_is_height_bound() {
        let vp = fit(4.0 / 3.0, 1920.0, 1080.0).unwrap();
        assert_close(vp.height, 1080.0);
        assert_close(vp.width, 1440.0);
    }

    #[test]
    fn equal_aspect_fills_container() {
        let vp = fit(2.0, 800.0, 400.0).unwrap();
        assert_close(vp.width, 800.0);
        assert_close(vp.height, 400.0);
    }

    #[test]
    fn result_preserves_aspect_and_fits() {
        for &(aspect, w, h) in &[(1.5, 640.0, 480.0), (0.5, 300.0, 900.0), (3.0, 1200.0, 200.0)] {
            let vp = fit(aspect, w, h).unwrap();
            assert!((vp.aspect() - aspect).abs() < 1e-3, "aspect {} != {}", vp.aspect(), aspect);
            assert!(vp.width <= w + 1e-3 && vp.height <= h + 1e-3);
        }
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert!(matches!(fit(0.0, 100.0, 100.0), Err(EngineError::InvalidGeometry(_))));
        assert!(matches!(fit(f32::NAN, 100.0, 100.0), Err(EngineError::InvalidGeometry(_))));
        assert!(matches!(fit(1.0, 0.0, 100.0), Err(EngineError::InvalidGeometry(_))));
        assert!(matches!(media_aspect(640.0, 0.0), Err(EngineError::InvalidGeometry(_))));
    }

    #[test]
    fn inset_layout_centers_camera() {
        let layout = Layout::inset(1.0, 1000.0, 500.0, 0.6).unwrap();
        assert_close(layout.camera.width, 300.0);
        assert_close(layout.camera.height, 300.0);
        assert_close(layout.camera.origin.x, 350.0);
        assert_close(layout.camera.origin.y, 100.0);
        assert_eq!(layout.canvas, Vec2::new(1000.0, 500.0));
    }

    #[test]
    fn fitted_layout_applies_resolution_scale() {
        let layout = Layout::fitted(4.0 / 3.0, 800.0, 600.0, 0.5).unwrap();
        assert_close(layout.canvas_width(), 400.0);
        assert_close(layout.canvas_height(), 300.0);
        assert_eq!(layout.camera.origin, Vec2::ZERO);
    }
}
