//! Full-frame pixel effects over an RGBA buffer read back from the canvas.
//!
//! Pixels covered by the two-hand [`CoverageMask`] pass through untouched;
//! everything else is remapped. Without a mask the whole frame is remapped.

use bytemuck::{Pod, Zeroable};

use crate::api::error::EngineError;
use crate::api::variant::PixelEffect;
use crate::core::region::CoverageMask;

/// Edge length of a pixelation block.
pub const BLOCK_SIZE: u32 = 8;

/// One canvas pixel as laid out in `ImageData`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn luminance(&self) -> f32 {
        luminance(self.r, self.g, self.b)
    }
}

/// Rec. 601 luma in 0..=255.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    r as f32 * 0.299 + g as f32 * 0.587 + b as f32 * 0.114
}

/// Heat-map color for a luminance value: violet, blue, green, yellow,
/// orange, red from dark to bright.
pub fn thermography_color(gray: f32) -> [u8; 3] {
    let n = gray / 255.0;
    let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    if n < 0.2 {
        let t = n / 0.2;
        [channel(128.0 + 127.0 * (1.0 - t)), 0, 255]
    } else if n < 0.4 {
        let t = (n - 0.2) / 0.2;
        [0, channel(255.0 * t), channel(255.0 * (1.0 - t))]
    } else if n < 0.6 {
        let t = (n - 0.4) / 0.2;
        [channel(255.0 * t), 255, 0]
    } else if n < 0.8 {
        let t = (n - 0.6) / 0.2;
        [255, channel(255.0 * (1.0 - t * 0.5)), 0]
    } else {
        let t = (n - 0.8) / 0.2;
        [255, channel(100.0 * (1.0 - t)), 0]
    }
}

/// A mutable view of an RGBA frame.
pub struct PixelFrame<'a> {
    width: u32,
    height: u32,
    pixels: &'a mut [Rgba8],
}

impl<'a> PixelFrame<'a> {
    /// View `bytes` as `width`×`height` RGBA pixels without copying.
    pub fn from_bytes(bytes: &'a mut [u8], width: u32, height: u32) -> Result<Self, EngineError> {
        let len = bytes.len();
        let expected = width as usize * height as usize * 4;
        if len != expected {
            return Err(EngineError::InvalidPixelBuffer { len, width, height });
        }
        let pixels = bytemuck::try_cast_slice_mut::<u8, Rgba8>(bytes)
            .map_err(|_| EngineError::InvalidPixelBuffer { len, width, height })?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub fn pixels(&self) -> &[Rgba8] {
        self.pixels
    }
}

/// Mask usable for this frame: present and of matching size.
fn usable<'m>(mask: Option<&'m CoverageMask>, frame: &PixelFrame) -> Option<&'m CoverageMask> {
    mask.filter(|m| m.width() == frame.width && m.height() == frame.height)
}

/// Remap every uncovered pixel to its heat-map color. Alpha is kept.
pub fn apply_thermography(frame: &mut PixelFrame, mask: Option<&CoverageMask>) {
    let mask = usable(mask, frame);
    for (i, px) in frame.pixels.iter_mut().enumerate() {
        if mask.is_some_and(|m| m.covers_index(i)) {
            continue;
        }
        let [r, g, b] = thermography_color(px.luminance());
        px.r = r;
        px.g = g;
        px.b = b;
    }
}

/// Replace each uncovered pixel with the gray of its 8×8 block's mean color.
pub fn apply_pixelation(frame: &mut PixelFrame, mask: Option<&CoverageMask>) {
    let mask = usable(mask, frame);
    let (w, h) = (frame.width, frame.height);

    for by in (0..h).step_by(BLOCK_SIZE as usize) {
        for bx in (0..w).step_by(BLOCK_SIZE as usize) {
            let x_end = (bx + BLOCK_SIZE).min(w);
            let y_end = (by + BLOCK_SIZE).min(h);

            let (mut sr, mut sg, mut sb, mut count) = (0u32, 0u32, 0u32, 0u32);
            for y in by..y_end {
                for x in bx..x_end {
                    let px = frame.pixels[(y * w + x) as usize];
                    sr += px.r as u32;
                    sg += px.g as u32;
                    sb += px.b as u32;
                    count += 1;
                }
            }
            if count == 0 {
                continue;
            }
            let mean = |sum: u32| (sum as f32 / count as f32).round() as u8;
            let gray = luminance(mean(sr), mean(sg), mean(sb)).round().clamp(0.0, 255.0) as u8;

            for y in by..y_end {
                for x in bx..x_end {
                    let i = (y * w + x) as usize;
                    if mask.is_some_and(|m| m.covers_index(i)) {
                        continue;
                    }
                    let px = &mut frame.pixels[i];
                    px.r = gray;
                    px.g = gray;
                    px.b = gray;
                }
            }
        }
    }
}

/// Run the variant's effect. Returns false for [`PixelEffect::None`].
pub fn apply_effect(effect: PixelEffect, frame: &mut PixelFrame, mask: Option<&CoverageMask>) -> bool {
    match effect {
        PixelEffect::None => false,
        PixelEffect::Thermography => {
            apply_thermography(frame, mask);
            true
        }
        PixelEffect::Pixelation => {
            apply_pixelation(frame, mask);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::region::RegionMask;
    use glam::Vec2;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        px.iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect()
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let mut bytes = vec![0u8; 10];
        let err = PixelFrame::from_bytes(&mut bytes, 2, 2).err().unwrap();
        assert!(matches!(
            err,
            EngineError::InvalidPixelBuffer { len: 10, width: 2, height: 2 }
        ));
    }

    #[test]
    fn thermography_band_endpoints() {
        assert_eq!(thermography_color(0.0), [255, 0, 255]);
        assert_eq!(thermography_color(255.0), [255, 0, 0]);
        // A quarter into the blue→green band.
        assert_eq!(thermography_color(0.25 * 255.0), [0, 64, 191]);
        // Start of the green→yellow band.
        assert_eq!(thermography_color(0.4 * 255.0 + 0.01), [0, 255, 0]);
        // Middle of the yellow→orange band.
        assert_eq!(thermography_color(0.7 * 255.0), [255, 191, 0]);
    }

    #[test]
    fn thermography_keeps_alpha() {
        let mut bytes = solid(2, 1, [0, 0, 0, 77]);
        let mut frame = PixelFrame::from_bytes(&mut bytes, 2, 1).unwrap();
        apply_thermography(&mut frame, None);
        assert_eq!(frame.pixel(0, 0), Some(Rgba8::new(255, 0, 255, 77)));
    }

    #[test]
    fn region_pixels_pass_through() {
        let original = [10, 200, 30, 255];
        let mut bytes = solid(8, 8, original);
        let region = RegionMask {
            corners: [
                Vec2::new(1.0, 1.0),
                Vec2::new(5.0, 1.0),
                Vec2::new(5.0, 5.0),
                Vec2::new(1.0, 5.0),
            ],
        };
        let mask = region.rasterize(8, 8);
        let mut frame = PixelFrame::from_bytes(&mut bytes, 8, 8).unwrap();
        apply_thermography(&mut frame, Some(&mask));

        let inside = frame.pixel(3, 3).unwrap();
        let outside = frame.pixel(7, 7).unwrap();
        assert_eq!(inside, Rgba8::new(10, 200, 30, 255));
        assert_ne!(outside, inside);
    }

    #[test]
    fn pixelation_grays_each_block_by_mean() {
        // Left block black, right block white.
        let (w, h) = (16u32, 8u32);
        let mut bytes = Vec::with_capacity((w * h * 4) as usize);
        for _y in 0..h {
            for x in 0..w {
                let v = if x < 8 { 0 } else { 255 };
                bytes.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let mut frame = PixelFrame::from_bytes(&mut bytes, w, h).unwrap();
        apply_pixelation(&mut frame, None);
        assert_eq!(frame.pixel(3, 3), Some(Rgba8::new(0, 0, 0, 255)));
        assert_eq!(frame.pixel(12, 5), Some(Rgba8::new(255, 255, 255, 255)));
    }

    #[test]
    fn pixelation_averages_mixed_block() {
        // One 2x1 frame: red and blue average to (128, 0, 128).
        let mut bytes = vec![255, 0, 0, 255, 0, 0, 255, 255];
        let mut frame = PixelFrame::from_bytes(&mut bytes, 2, 1).unwrap();
        apply_pixelation(&mut frame, None);
        let gray = luminance(128, 0, 128).round() as u8;
        assert_eq!(frame.pixel(0, 0), frame.pixel(1, 0));
        assert_eq!(frame.pixel(0, 0).unwrap().r, gray);
    }

    #[test]
    fn none_effect_leaves_frame() {
        let mut bytes = solid(2, 2, [1, 2, 3, 4]);
        let before = bytes.clone();
        let mut frame = PixelFrame::from_bytes(&mut bytes, 2, 2).unwrap();
        assert!(!apply_effect(PixelEffect::None, &mut frame, None));
        assert_eq!(bytes, before);
    }
}
