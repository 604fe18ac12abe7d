//! The 2D vector-rendering seam.
//!
//! [`Canvas`] mirrors the subset of NanoVG the gauge draws with: a frame
//! lifecycle, a current affine transform, sub-path construction, and solid
//! fill/stroke. Transforms apply to path points at the time they are added,
//! as in NanoVG.

use crate::error::Result;
use crate::types::{Color, FontId, HostContext};

/// Sweep direction of an arc. Angles grow clockwise because Y points down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum Winding {
    /// Counter-clockwise, NanoVG's `NVG_CCW`.
    CounterClockwise = 1,
    /// Clockwise, NanoVG's `NVG_CW`.
    Clockwise = 2,
}

/// A live rendering backend instance.
///
/// Dropping the canvas releases the backend instance.
pub trait Canvas {
    /// Start a frame over a `width` × `height` logical window.
    fn begin_frame(&mut self, width: f32, height: f32, pixel_ratio: f32);

    /// Submit everything drawn since [`begin_frame`](Self::begin_frame).
    fn end_frame(&mut self);

    /// Translate the current coordinate system.
    fn translate(&mut self, x: f32, y: f32);

    /// Rotate the current coordinate system by `angle` radians.
    fn rotate(&mut self, angle: f32);

    /// Reset the current transform to identity.
    fn reset_transform(&mut self);

    /// Clear the current path and start a new one.
    fn begin_path(&mut self);

    /// Start a new sub-path at the given point.
    fn move_to(&mut self, x: f32, y: f32);

    /// Add a line segment from the last point to the given point.
    fn line_to(&mut self, x: f32, y: f32);

    /// Add a circular arc around (`cx`, `cy`) from angle `a0` to `a1`.
    #[allow(clippy::too_many_arguments)]
    fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: Winding);

    /// Add a closed rectangle sub-path.
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    /// Add a closed circle sub-path.
    fn circle(&mut self, cx: f32, cy: f32, r: f32);

    /// Set the colour used by [`fill`](Self::fill).
    fn fill_color(&mut self, color: Color);

    /// Set the colour used by [`stroke`](Self::stroke).
    fn stroke_color(&mut self, color: Color);

    /// Set the stroke width in pixels.
    fn stroke_width(&mut self, width: f32);

    /// Fill the current path.
    fn fill(&mut self);

    /// Stroke the current path.
    fn stroke(&mut self);

    /// Load a font file and register it under `name`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be loaded.
    fn create_font(&mut self, name: &str, path: &str) -> Result<FontId>;
}

/// Creates canvases bound to a host context.
pub trait Backend {
    /// The canvas type this backend produces.
    type Canvas: Canvas;

    /// Create a rendering backend instance for the given host context.
    ///
    /// # Errors
    ///
    /// Fails when the backend cannot allocate its resources.
    fn create_canvas(&mut self, ctx: HostContext) -> Result<Self::Canvas>;
}
