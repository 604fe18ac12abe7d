//! Horizon geometry in logical window pixels.

use crate::types::Attitude;

/// Side of the square the horizon is painted into: the window diagonal
/// scaled by `oversize`.
#[must_use]
pub fn bounding_size(width: f32, height: f32, oversize: f32) -> f32 {
    width.hypot(height) * oversize
}

/// Framebuffer pixels per logical pixel.
///
/// A window with no logical width yields `1.0`.
// Window sizes are far below f32's exact integer range.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn pixel_ratio(win_width: i32, fb_width: i32) -> f32 {
    if win_width == 0 {
        1.0
    } else {
        fb_width as f32 / win_width as f32
    }
}

/// Distance from the top of the bounding square to the horizon line.
///
/// Pitch 0 splits the square in half; +90° puts the line at the top (all
/// ground) and -90° at the bottom (all sky).
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn horizon_offset(size: f32, pitch_degrees: f64) -> f32 {
    let pitch = pitch_degrees.to_radians();
    (f64::from(size) * 0.5 * (1.0 - pitch.sin())) as f32
}

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

/// Everything the pre-draw pass derives from the window and the attitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HorizonLayout {
    /// Window center, the origin of both drawing passes.
    pub center: [f32; 2],
    /// Side of the oversized horizon square.
    pub size: f32,
    /// Horizon line position measured from the top of the square.
    pub offset: f32,
    /// Bank rotation applied to the horizon, in radians.
    pub bank_radians: f32,
}

impl HorizonLayout {
    /// Lay out the horizon for a `[width, height]` window.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn new([width, height]: [f32; 2], attitude: Attitude, oversize: f32) -> Self {
        let size = bounding_size(width, height, oversize);
        Self {
            center: [width * 0.5, height * 0.5],
            size,
            offset: horizon_offset(size, attitude.pitch_degrees),
            bank_radians: attitude.bank_degrees.to_radians() as f32,
        }
    }

    /// Sky region, relative to the rotated window center.
    #[must_use]
    pub fn sky_rect(&self) -> Rect {
        let half = self.size * 0.5;
        Rect {
            x: -half,
            y: -half,
            w: self.size,
            h: self.offset,
        }
    }

    /// Ground region, relative to the rotated window center.
    #[must_use]
    pub fn ground_rect(&self) -> Rect {
        let half = self.size * 0.5;
        Rect {
            x: -half,
            y: -half + self.offset,
            w: self.size,
            h: self.size - self.offset,
        }
    }
}
