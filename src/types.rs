//! Value types shared between the gauge, its backends and the host.
//!
//! The `Raw*` structs mirror the payloads the host passes through the gauge
//! callback and must keep their C layout.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};

use bytemuck::{Pod, Zeroable};

/// Opaque gauge context handed over by the host on every callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostContext(*mut c_void);

impl HostContext {
    /// Wrap the raw host pointer.
    #[must_use]
    pub const fn from_raw(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// A context that points nowhere, for backends that ignore it.
    #[must_use]
    pub const fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// The raw host pointer.
    #[must_use]
    pub const fn as_ptr(self) -> *mut c_void {
        self.0
    }
}

/// Host enum value identifying a unit of measure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitsId(pub i32);

/// Host enum value identifying an aircraft simulation variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarId(pub i32);

/// The value the host returns for names it does not know.
pub const UNKNOWN_ID: i32 = -1;

impl UnitsId {
    /// Whether the host recognised the unit name.
    #[must_use]
    pub const fn is_known(self) -> bool {
        self.0 != UNKNOWN_ID
    }
}

impl VarId {
    /// Whether the host recognised the variable name.
    #[must_use]
    pub const fn is_known(self) -> bool {
        self.0 != UNKNOWN_ID
    }
}

/// Handle of a font registered with a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontId(pub i32);

/// A straight RGBA colour with `f32` components in `0.0..=1.0`.
///
/// Laid out like NanoVG's `NVGcolor` so it can cross the C boundary as is.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// An opaque colour from 8-bit channels.
    #[must_use]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// A colour from 8-bit channels.
    #[must_use]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// The colour with its RGB channels multiplied by alpha.
    #[must_use]
    pub fn premultiplied(self) -> [f32; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }
}

/// Install payload as laid out by the host.
#[repr(C)]
pub struct RawInstallData {
    /// Gauge width in pixels.
    pub size_x: c_int,
    /// Gauge height in pixels.
    pub size_y: c_int,
    /// Parameter string from the panel configuration, may be null.
    pub parameters: *const c_char,
}

/// Draw payload as laid out by the host.
#[repr(C)]
pub struct RawDrawData {
    /// Mouse x position.
    pub mx: f64,
    /// Mouse y position.
    pub my: f64,
    /// Simulation time in seconds.
    pub t: f64,
    /// Seconds since the previous frame.
    pub dt: f64,
    /// Logical window width.
    pub win_width: c_int,
    /// Logical window height.
    pub win_height: c_int,
    /// Framebuffer width.
    pub fb_width: c_int,
    /// Framebuffer height.
    pub fb_height: c_int,
}

/// Gauge dimensions known at install time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InstallData {
    /// Gauge width in pixels.
    pub size_x: i32,
    /// Gauge height in pixels.
    pub size_y: i32,
}

impl From<&RawInstallData> for InstallData {
    fn from(raw: &RawInstallData) -> Self {
        Self {
            size_x: raw.size_x,
            size_y: raw.size_y,
        }
    }
}

/// Per-frame window information.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawData {
    /// Mouse x position.
    pub mouse_x: f64,
    /// Mouse y position.
    pub mouse_y: f64,
    /// Simulation time in seconds.
    pub time: f64,
    /// Seconds since the previous frame.
    pub delta_time: f64,
    /// Logical window width.
    pub win_width: i32,
    /// Logical window height.
    pub win_height: i32,
    /// Framebuffer width.
    pub fb_width: i32,
    /// Framebuffer height.
    pub fb_height: i32,
}

impl DrawData {
    /// Frame data for a window whose framebuffer matches its logical size.
    #[must_use]
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            win_width: width,
            win_height: height,
            fb_width: width,
            fb_height: height,
            ..Self::default()
        }
    }

    /// Logical window size as floats.
    // Window sizes are far below f32's exact integer range.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn window_size(&self) -> [f32; 2] {
        [self.win_width as f32, self.win_height as f32]
    }
}

impl From<&RawDrawData> for DrawData {
    fn from(raw: &RawDrawData) -> Self {
        Self {
            mouse_x: raw.mx,
            mouse_y: raw.my,
            time: raw.t,
            delta_time: raw.dt,
            win_width: raw.win_width,
            win_height: raw.win_height,
            fb_width: raw.fb_width,
            fb_height: raw.fb_height,
        }
    }
}

/// Aircraft attitude read from the simulation, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Attitude {
    /// Nose up/down angle.
    pub pitch_degrees: f64,
    /// Roll angle.
    pub bank_degrees: f64,
}

/// A vertex in a tessellated path, ready for the GPU.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Position in logical window pixels.
    pub position: [f32; 2],
}

/// A tessellated path stored as indexed triangle data.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Triangle vertices.
    pub vertices: Vec<Vertex>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Min/max of one axis across all vertices (0 = X, 1 = Y).
    ///
    /// Returns `[0.0, 0.0]` for an empty mesh.
    #[must_use]
    pub fn bounds(&self, axis: usize) -> [f32; 2] {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for v in &self.vertices {
            let val = v.position[axis];
            min = min.min(val);
            max = max.max(val);
        }
        if max < min {
            [0.0, 0.0]
        } else {
            [min, max]
        }
    }
}
