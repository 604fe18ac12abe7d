//! [`Canvas`] over the NanoVG renderer built into the simulator.
//!
//! The `nvg*` symbols are imported from the host at load time, so this
//! module only exists on `wasm32`.

use std::ffi::{c_void, CString};
use std::os::raw::{c_char, c_int};

use crate::canvas::{Backend, Canvas, Winding};
use crate::error::{Error, Result};
use crate::types::{Color, FontId, HostContext};

/// Opaque NanoVG context owned by the host renderer.
#[repr(C)]
pub struct NvgContext {
    _private: [u8; 0],
}

/// `NVGparams`: the host fills in the render callbacks itself.
#[repr(C)]
struct NvgParams {
    user_ptr: *mut c_void,
    edge_anti_alias: c_int,
    callbacks: [Option<unsafe extern "C" fn()>; 12],
}

// The wasm32 C ABI passes aggregates indirectly, so colours go by pointer.
extern "C" {
    fn nvgCreateInternal(params: *mut NvgParams) -> *mut NvgContext;
    fn nvgDeleteInternal(ctx: *mut NvgContext);

    fn nvgBeginFrame(ctx: *mut NvgContext, width: f32, height: f32, pixel_ratio: f32);
    fn nvgEndFrame(ctx: *mut NvgContext);

    fn nvgResetTransform(ctx: *mut NvgContext);
    fn nvgTranslate(ctx: *mut NvgContext, x: f32, y: f32);
    fn nvgRotate(ctx: *mut NvgContext, angle: f32);

    fn nvgBeginPath(ctx: *mut NvgContext);
    fn nvgMoveTo(ctx: *mut NvgContext, x: f32, y: f32);
    fn nvgLineTo(ctx: *mut NvgContext, x: f32, y: f32);
    fn nvgArc(ctx: *mut NvgContext, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: c_int);
    fn nvgRect(ctx: *mut NvgContext, x: f32, y: f32, w: f32, h: f32);
    fn nvgCircle(ctx: *mut NvgContext, cx: f32, cy: f32, r: f32);

    fn nvgFillColor(ctx: *mut NvgContext, color: *const Color);
    fn nvgStrokeColor(ctx: *mut NvgContext, color: *const Color);
    fn nvgStrokeWidth(ctx: *mut NvgContext, size: f32);
    fn nvgFill(ctx: *mut NvgContext);
    fn nvgStroke(ctx: *mut NvgContext);

    fn nvgCreateFont(ctx: *mut NvgContext, name: *const c_char, filename: *const c_char) -> c_int;
}

/// A NanoVG render context, deleted on drop.
pub struct NanoVgCanvas {
    ctx: *mut NvgContext,
}

impl NanoVgCanvas {
    /// Create a NanoVG render context bound to the host gauge context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] if the host returns no context.
    pub fn create(ctx: HostContext) -> Result<Self> {
        let mut params = NvgParams {
            user_ptr: ctx.as_ptr(),
            edge_anti_alias: 1,
            callbacks: [None; 12],
        };
        // SAFETY: `params` is a fully initialised NVGparams.
        let ctx = unsafe { nvgCreateInternal(&mut params) };
        if ctx.is_null() {
            Err(Error::BackendUnavailable)
        } else {
            Ok(Self { ctx })
        }
    }
}

// SAFETY (all methods below): `ctx` is non-null and stays valid until drop.
impl Canvas for NanoVgCanvas {
    fn begin_frame(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        unsafe { nvgBeginFrame(self.ctx, width, height, pixel_ratio) }
    }

    fn end_frame(&mut self) {
        unsafe { nvgEndFrame(self.ctx) }
    }

    fn translate(&mut self, x: f32, y: f32) {
        unsafe { nvgTranslate(self.ctx, x, y) }
    }

    fn rotate(&mut self, angle: f32) {
        unsafe { nvgRotate(self.ctx, angle) }
    }

    fn reset_transform(&mut self) {
        unsafe { nvgResetTransform(self.ctx) }
    }

    fn begin_path(&mut self) {
        unsafe { nvgBeginPath(self.ctx) }
    }

    fn move_to(&mut self, x: f32, y: f32) {
        unsafe { nvgMoveTo(self.ctx, x, y) }
    }

    fn line_to(&mut self, x: f32, y: f32) {
        unsafe { nvgLineTo(self.ctx, x, y) }
    }

    fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: Winding) {
        unsafe { nvgArc(self.ctx, cx, cy, r, a0, a1, dir as c_int) }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        unsafe { nvgRect(self.ctx, x, y, w, h) }
    }

    fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        unsafe { nvgCircle(self.ctx, cx, cy, r) }
    }

    fn fill_color(&mut self, color: Color) {
        unsafe { nvgFillColor(self.ctx, &color) }
    }

    fn stroke_color(&mut self, color: Color) {
        unsafe { nvgStrokeColor(self.ctx, &color) }
    }

    fn stroke_width(&mut self, width: f32) {
        unsafe { nvgStrokeWidth(self.ctx, width) }
    }

    fn fill(&mut self) {
        unsafe { nvgFill(self.ctx) }
    }

    fn stroke(&mut self) {
        unsafe { nvgStroke(self.ctx) }
    }

    fn create_font(&mut self, name: &str, path: &str) -> Result<FontId> {
        let c_name = CString::new(name)?;
        let c_path = CString::new(path)?;
        let handle = unsafe { nvgCreateFont(self.ctx, c_name.as_ptr(), c_path.as_ptr()) };
        match handle {
            -1 => Err(Error::FontLoad {
                name: name.to_owned(),
                path: path.to_owned(),
            }),
            handle => Ok(FontId(handle)),
        }
    }
}

impl Drop for NanoVgCanvas {
    fn drop(&mut self) {
        // SAFETY: `ctx` came from `nvgCreateInternal` and is deleted once.
        unsafe { nvgDeleteInternal(self.ctx) }
    }
}

/// Creates [`NanoVgCanvas`] instances from host gauge contexts.
#[derive(Debug, Default)]
pub struct NanoVgBackend;

impl Backend for NanoVgBackend {
    type Canvas = NanoVgCanvas;

    fn create_canvas(&mut self, ctx: HostContext) -> Result<NanoVgCanvas> {
        NanoVgCanvas::create(ctx)
    }
}
