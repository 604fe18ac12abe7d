//! An attitude indicator (artificial horizon) gauge for flight simulator
//! panels.
//!
//! The host drives the gauge through a single lifecycle callback. At
//! pre-install the gauge resolves the pitch and bank simulation variables;
//! at post-install it creates a 2D vector canvas; at every pre-draw it paints
//! a sky/ground split rotated by the bank angle and offset by the pitch, then
//! a fixed aircraft reference symbol; at pre-kill it releases the canvas.
//!
//! # Backends
//!
//! - On `wasm32`, the gauge draws through the simulator's built-in NanoVG
//!   renderer and exports `Attitude_gauge_callback` for the host.
//! - With the `glow` feature (on by default), [`GlowCanvas`] renders the
//!   same composition through OpenGL via [glow]. Paths are tessellated via
//!   [lyon], which makes it possible to preview the gauge outside the
//!   simulator.
//!
//! Any other renderer can be plugged in by implementing [`Canvas`] and
//! [`Backend`]; any variable source by implementing [`SimVars`].
//!
//! # Example
//!
//! ```
//! use attitude_gauge::{
//!     draw_attitude, Attitude, Canvas, Color, DrawData, FontId, GaugeConfig, Result, Winding,
//! };
//!
//! /// Counts fills, ignores everything else.
//! #[derive(Default)]
//! struct Counter(usize);
//!
//! impl Canvas for Counter {
//!     fn begin_frame(&mut self, _: f32, _: f32, _: f32) {}
//!     fn end_frame(&mut self) {}
//!     fn translate(&mut self, _: f32, _: f32) {}
//!     fn rotate(&mut self, _: f32) {}
//!     fn reset_transform(&mut self) {}
//!     fn begin_path(&mut self) {}
//!     fn move_to(&mut self, _: f32, _: f32) {}
//!     fn line_to(&mut self, _: f32, _: f32) {}
//!     fn arc(&mut self, _: f32, _: f32, _: f32, _: f32, _: f32, _: Winding) {}
//!     fn rect(&mut self, _: f32, _: f32, _: f32, _: f32) {}
//!     fn circle(&mut self, _: f32, _: f32, _: f32) {}
//!     fn fill_color(&mut self, _: Color) {}
//!     fn stroke_color(&mut self, _: Color) {}
//!     fn stroke_width(&mut self, _: f32) {}
//!     fn fill(&mut self) {
//!         self.0 += 1;
//!     }
//!     fn stroke(&mut self) {}
//!     fn create_font(&mut self, _: &str, _: &str) -> Result<FontId> {
//!         Ok(FontId(0))
//!     }
//! }
//!
//! let mut canvas = Counter::default();
//! let attitude = Attitude { pitch_degrees: 5.0, bank_degrees: -10.0 };
//! draw_attitude(
//!     &mut canvas,
//!     &GaugeConfig::default(),
//!     &DrawData::with_size(800, 600),
//!     attitude,
//! );
//! // Sky, ground, and the center dot.
//! assert_eq!(canvas.0, 3);
//! ```
//!
//! [glow]: https://docs.rs/glow
//! [lyon]: https://docs.rs/lyon

mod canvas;
mod config;
mod error;
mod gauge;
pub mod geometry;
pub mod path;
mod simvars;
mod types;

#[cfg(feature = "glow")]
mod render;
#[cfg(feature = "glow")]
mod shaders;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod nanovg;

pub use canvas::{Backend, Canvas, Winding};
pub use config::{GaugeConfig, DEGREES, PLANE_BANK_DEGREES, PLANE_PITCH_DEGREES};
pub use error::{Error, Result};
pub use gauge::{
    draw_attitude, AttitudeGauge, GaugeState, Phase, ResolvedVars, PANEL_SERVICE_POST_INSTALL,
    PANEL_SERVICE_PRE_DRAW, PANEL_SERVICE_PRE_INSTALL, PANEL_SERVICE_PRE_KILL,
};
pub use simvars::SimVars;
pub use types::{
    Attitude, Color, DrawData, FontId, HostContext, InstallData, Mesh, RawDrawData,
    RawInstallData, UnitsId, VarId, Vertex, UNKNOWN_ID,
};

#[cfg(feature = "glow")]
pub use render::{GlowBackend, GlowCanvas};

#[cfg(target_arch = "wasm32")]
pub use host::{Attitude_gauge_callback, LegacySimVars};
#[cfg(target_arch = "wasm32")]
pub use nanovg::{NanoVgBackend, NanoVgCanvas};
