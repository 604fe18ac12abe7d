//! The attitude gauge: lifecycle dispatch and the per-frame composition.
//!
//! The host drives a gauge through numbered panel services. Four of them
//! matter here and must arrive in order: pre-install resolves the variables,
//! post-install creates the canvas, pre-draw paints a frame, pre-kill drops
//! the canvas. Anything else is reported back as unhandled.

use std::f32::consts::PI;
use std::ffi::c_void;
use std::os::raw::c_int;

use crate::canvas::{Backend, Canvas, Winding};
use crate::config::GaugeConfig;
use crate::geometry::{pixel_ratio, HorizonLayout, Rect};
use crate::simvars::SimVars;
use crate::types::{
    Attitude, Color, DrawData, FontId, HostContext, InstallData, RawDrawData, RawInstallData,
    UnitsId, VarId,
};

/// Host service id sent before the gauge is installed.
pub const PANEL_SERVICE_PRE_INSTALL: c_int = 2;
/// Host service id sent once the gauge window exists.
pub const PANEL_SERVICE_POST_INSTALL: c_int = 3;
/// Host service id sent before every frame.
pub const PANEL_SERVICE_PRE_DRAW: c_int = 10;
/// Host service id sent before the gauge is torn down.
pub const PANEL_SERVICE_PRE_KILL: c_int = 12;

/// Index the attitude variables are read at.
const VAR_INDEX: i32 = 0;

/// A decoded host callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Resolve simulation variables.
    PreInstall(InstallData),
    /// Create the rendering backend and load the font.
    PostInstall(InstallData),
    /// Paint one frame.
    PreDraw(DrawData),
    /// Release the rendering backend.
    PreKill,
    /// A service this gauge leaves to the host's default handling.
    Other(c_int),
}

impl Phase {
    /// Decode a raw service id and its payload.
    ///
    /// Install services with a null payload carry zero sizes, since the
    /// sizes are only logged. A pre-draw with a null payload decodes as
    /// [`Phase::Other`].
    ///
    /// # Safety
    ///
    /// `data` must be null or point to the payload the host documents for
    /// `service_id`: a `RawInstallData` for the install services and a
    /// `RawDrawData` for pre-draw.
    #[must_use]
    pub unsafe fn from_raw(service_id: c_int, data: *const c_void) -> Self {
        match service_id {
            PANEL_SERVICE_PRE_INSTALL | PANEL_SERVICE_POST_INSTALL => {
                // SAFETY: caller guarantees the pointer is null or an install payload.
                let install = unsafe { data.cast::<RawInstallData>().as_ref() }
                    .map(InstallData::from)
                    .unwrap_or_default();
                if service_id == PANEL_SERVICE_PRE_INSTALL {
                    Self::PreInstall(install)
                } else {
                    Self::PostInstall(install)
                }
            }
            PANEL_SERVICE_PRE_DRAW => {
                // SAFETY: caller guarantees the pointer is null or a draw payload.
                match unsafe { data.cast::<RawDrawData>().as_ref() } {
                    Some(raw) => Self::PreDraw(raw.into()),
                    None => Self::Other(service_id),
                }
            }
            PANEL_SERVICE_PRE_KILL => Self::PreKill,
            other => Self::Other(other),
        }
    }
}

/// Identifiers resolved at pre-install and read through every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedVars {
    /// The unit both variables are read in.
    pub units: UnitsId,
    /// Aircraft pitch.
    pub pitch: VarId,
    /// Aircraft bank.
    pub bank: VarId,
}

/// Where a gauge is in its host-driven lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GaugeState {
    /// Nothing resolved yet.
    Uninstalled,
    /// Variables resolved, no canvas.
    Installed,
    /// Canvas live, frames can be drawn.
    Active,
    /// Canvas released.
    Killed,
}

enum Lifecycle<C> {
    Uninstalled,
    Installed {
        vars: ResolvedVars,
    },
    Active {
        vars: ResolvedVars,
        canvas: C,
        font: Option<FontId>,
    },
    Killed,
}

/// An attitude indicator driven by host lifecycle callbacks.
///
/// The canvas only exists while the gauge is [`GaugeState::Active`], so
/// nothing can be drawn before post-install or after pre-kill.
pub struct AttitudeGauge<S, B: Backend> {
    sim: S,
    backend: B,
    config: GaugeConfig,
    lifecycle: Lifecycle<B::Canvas>,
}

impl<S: SimVars, B: Backend> AttitudeGauge<S, B> {
    /// A gauge with the default configuration.
    #[must_use]
    pub fn new(sim: S, backend: B) -> Self {
        Self::with_config(sim, backend, GaugeConfig::default())
    }

    /// A gauge with a custom configuration.
    #[must_use]
    pub fn with_config(sim: S, backend: B, config: GaugeConfig) -> Self {
        Self {
            sim,
            backend,
            config,
            lifecycle: Lifecycle::Uninstalled,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GaugeState {
        match self.lifecycle {
            Lifecycle::Uninstalled => GaugeState::Uninstalled,
            Lifecycle::Installed { .. } => GaugeState::Installed,
            Lifecycle::Active { .. } => GaugeState::Active,
            Lifecycle::Killed => GaugeState::Killed,
        }
    }

    /// The identifiers resolved at pre-install, until the gauge is killed.
    #[must_use]
    pub fn vars(&self) -> Option<ResolvedVars> {
        match self.lifecycle {
            Lifecycle::Installed { vars } | Lifecycle::Active { vars, .. } => Some(vars),
            Lifecycle::Uninstalled | Lifecycle::Killed => None,
        }
    }

    /// The live canvas, if the gauge is active.
    #[must_use]
    pub fn canvas(&self) -> Option<&B::Canvas> {
        match &self.lifecycle {
            Lifecycle::Active { canvas, .. } => Some(canvas),
            _ => None,
        }
    }

    /// The font loaded at post-install, if loading succeeded.
    #[must_use]
    pub fn font(&self) -> Option<FontId> {
        match self.lifecycle {
            Lifecycle::Active { font, .. } => font,
            _ => None,
        }
    }

    /// The simulation variable source.
    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    /// The gauge configuration.
    #[must_use]
    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    /// Handle one host callback. Returns whether the phase was handled.
    pub fn dispatch(&mut self, ctx: HostContext, phase: Phase) -> bool {
        match phase {
            Phase::PreInstall(install) => self.pre_install(install),
            Phase::PostInstall(install) => self.post_install(ctx, install),
            Phase::PreDraw(draw) => self.pre_draw(&draw),
            Phase::PreKill => self.pre_kill(),
            Phase::Other(_) => false,
        }
    }

    fn pre_install(&mut self, install: InstallData) -> bool {
        if !matches!(self.lifecycle, Lifecycle::Uninstalled | Lifecycle::Killed) {
            tracing::warn!(state = ?self.state(), "pre-install on an installed gauge");
            return false;
        }

        let vars = ResolvedVars {
            units: self.sim.units_id(&self.config.units),
            pitch: self.sim.aircraft_var_id(&self.config.pitch_variable),
            bank: self.sim.aircraft_var_id(&self.config.bank_variable),
        };
        if !vars.units.is_known() {
            tracing::warn!("unit {} not recognised by the host", self.config.units);
        }
        for (name, id) in [
            (&self.config.pitch_variable, vars.pitch),
            (&self.config.bank_variable, vars.bank),
        ] {
            if !id.is_known() {
                tracing::warn!("simulation variable {name} not recognised by the host");
            }
        }

        tracing::debug!(
            width = install.size_x,
            height = install.size_y,
            ?vars,
            "attitude gauge installed"
        );
        self.lifecycle = Lifecycle::Installed { vars };
        true
    }

    fn post_install(&mut self, ctx: HostContext, install: InstallData) -> bool {
        let Lifecycle::Installed { vars } = self.lifecycle else {
            tracing::warn!(state = ?self.state(), "post-install before pre-install");
            return false;
        };

        let mut canvas = match self.backend.create_canvas(ctx) {
            Ok(canvas) => canvas,
            Err(e) => {
                tracing::error!("failed to create rendering backend: {e}");
                return false;
            }
        };

        let font = match canvas.create_font(&self.config.font_name, &self.config.font_path) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };

        tracing::info!(
            width = install.size_x,
            height = install.size_y,
            "attitude gauge rendering backend ready"
        );
        self.lifecycle = Lifecycle::Active { vars, canvas, font };
        true
    }

    fn pre_draw(&mut self, draw: &DrawData) -> bool {
        let Lifecycle::Active { vars, canvas, .. } = &mut self.lifecycle else {
            tracing::warn!("pre-draw without a rendering backend");
            return false;
        };

        let attitude = read_attitude(&self.sim, *vars);
        draw_attitude(canvas, &self.config, draw, attitude);
        true
    }

    fn pre_kill(&mut self) -> bool {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Killed) {
            Lifecycle::Active { canvas, .. } => {
                drop(canvas);
                tracing::info!("attitude gauge rendering backend released");
                true
            }
            other => {
                self.lifecycle = other;
                tracing::warn!(state = ?self.state(), "pre-kill without a rendering backend");
                false
            }
        }
    }
}

fn read_attitude<S: SimVars>(sim: &S, vars: ResolvedVars) -> Attitude {
    Attitude {
        pitch_degrees: sim.aircraft_var(vars.pitch, vars.units, VAR_INDEX),
        bank_degrees: sim.aircraft_var(vars.bank, vars.units, VAR_INDEX),
    }
}

/// Paint one attitude indicator frame.
///
/// The horizon is drawn under a rotation by the bank angle; the transform is
/// then reset so the aircraft reference symbol stays level.
pub fn draw_attitude<C: Canvas + ?Sized>(
    canvas: &mut C,
    config: &GaugeConfig,
    draw: &DrawData,
    attitude: Attitude,
) {
    let [width, height] = draw.window_size();
    let layout = HorizonLayout::new([width, height], attitude, config.oversize);
    let [cx, cy] = layout.center;

    canvas.begin_frame(width, height, pixel_ratio(draw.win_width, draw.fb_width));

    canvas.translate(cx, cy);
    canvas.rotate(layout.bank_radians);
    fill_rect(canvas, layout.sky_rect(), config.sky_color);
    fill_rect(canvas, layout.ground_rect(), config.ground_color);

    canvas.reset_transform();
    canvas.translate(cx, cy);

    let span = width * config.reference_span;
    let radius = width * config.reference_arc_radius;
    canvas.stroke_color(config.reference_color);
    canvas.stroke_width(config.reference_stroke_width);
    canvas.begin_path();
    canvas.move_to(-span, 0.0);
    canvas.line_to(-radius, 0.0);
    // Left to right through the bottom of the circle.
    canvas.arc(0.0, 0.0, radius, PI, 0.0, Winding::CounterClockwise);
    canvas.line_to(span, 0.0);
    canvas.stroke();

    canvas.begin_path();
    canvas.circle(0.0, 0.0, width * config.reference_dot_radius);
    canvas.fill_color(config.reference_color);
    canvas.fill();

    canvas.end_frame();
}

fn fill_rect<C: Canvas + ?Sized>(canvas: &mut C, rect: Rect, color: Color) {
    canvas.begin_path();
    canvas.rect(rect.x, rect.y, rect.w, rect.h);
    canvas.fill_color(color);
    canvas.fill();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::types::UNKNOWN_ID;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const UNITS: UnitsId = UnitsId(1);
    const PITCH: VarId = VarId(10);
    const BANK: VarId = VarId(11);

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}",
        );
    }

    #[derive(Default)]
    struct FakeSim {
        pitch: f64,
        bank: f64,
        known: bool,
        read_indices: RefCell<Vec<i32>>,
    }

    impl FakeSim {
        fn level() -> Self {
            Self {
                known: true,
                ..Self::default()
            }
        }

        fn at(pitch: f64, bank: f64) -> Self {
            Self {
                pitch,
                bank,
                ..Self::level()
            }
        }
    }

    impl SimVars for FakeSim {
        fn units_id(&mut self, name: &str) -> UnitsId {
            if self.known && name == "DEGREES" {
                UNITS
            } else {
                UnitsId(UNKNOWN_ID)
            }
        }

        fn aircraft_var_id(&mut self, name: &str) -> VarId {
            match name {
                "PLANE PITCH DEGREES" if self.known => PITCH,
                "PLANE BANK DEGREES" if self.known => BANK,
                _ => VarId(UNKNOWN_ID),
            }
        }

        fn aircraft_var(&self, var: VarId, units: UnitsId, index: i32) -> f64 {
            self.read_indices.borrow_mut().push(index);
            match (var, units) {
                (PITCH, UNITS) => self.pitch,
                (BANK, UNITS) => self.bank,
                _ => 0.0,
            }
        }
    }

    /// One recorded canvas call. Path points carry the rotation in effect.
    #[derive(Clone, Debug, PartialEq)]
    enum Op {
        BeginFrame { width: f32, height: f32, ratio: f32 },
        EndFrame,
        Translate(f32, f32),
        Rotate(f32),
        ResetTransform,
        BeginPath,
        MoveTo { x: f32, y: f32, rotation: f32 },
        LineTo { x: f32, y: f32, rotation: f32 },
        Arc { r: f32, a0: f32, a1: f32, dir: Winding, rotation: f32 },
        Rect { rect: Rect, rotation: f32 },
        Circle { r: f32, rotation: f32 },
        FillColor(Color),
        StrokeColor(Color),
        StrokeWidth(f32),
        Fill,
        Stroke,
    }

    struct RecordingCanvas {
        ops: Vec<Op>,
        rotation: f32,
        drops: Rc<Cell<u32>>,
        font_fails: bool,
    }

    impl Drop for RecordingCanvas {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    impl Canvas for RecordingCanvas {
        fn begin_frame(&mut self, width: f32, height: f32, pixel_ratio: f32) {
            self.ops.push(Op::BeginFrame {
                width,
                height,
                ratio: pixel_ratio,
            });
        }

        fn end_frame(&mut self) {
            self.ops.push(Op::EndFrame);
        }

        fn translate(&mut self, x: f32, y: f32) {
            self.ops.push(Op::Translate(x, y));
        }

        fn rotate(&mut self, angle: f32) {
            self.rotation += angle;
            self.ops.push(Op::Rotate(angle));
        }

        fn reset_transform(&mut self) {
            self.rotation = 0.0;
            self.ops.push(Op::ResetTransform);
        }

        fn begin_path(&mut self) {
            self.ops.push(Op::BeginPath);
        }

        fn move_to(&mut self, x: f32, y: f32) {
            let rotation = self.rotation;
            self.ops.push(Op::MoveTo { x, y, rotation });
        }

        fn line_to(&mut self, x: f32, y: f32) {
            let rotation = self.rotation;
            self.ops.push(Op::LineTo { x, y, rotation });
        }

        fn arc(&mut self, _cx: f32, _cy: f32, r: f32, a0: f32, a1: f32, dir: Winding) {
            let rotation = self.rotation;
            self.ops.push(Op::Arc {
                r,
                a0,
                a1,
                dir,
                rotation,
            });
        }

        fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
            let rotation = self.rotation;
            self.ops.push(Op::Rect {
                rect: Rect { x, y, w, h },
                rotation,
            });
        }

        fn circle(&mut self, _cx: f32, _cy: f32, r: f32) {
            let rotation = self.rotation;
            self.ops.push(Op::Circle { r, rotation });
        }

        fn fill_color(&mut self, color: Color) {
            self.ops.push(Op::FillColor(color));
        }

        fn stroke_color(&mut self, color: Color) {
            self.ops.push(Op::StrokeColor(color));
        }

        fn stroke_width(&mut self, width: f32) {
            self.ops.push(Op::StrokeWidth(width));
        }

        fn fill(&mut self) {
            self.ops.push(Op::Fill);
        }

        fn stroke(&mut self) {
            self.ops.push(Op::Stroke);
        }

        fn create_font(&mut self, name: &str, path: &str) -> Result<FontId> {
            if self.font_fails {
                Err(Error::FontLoad {
                    name: name.to_owned(),
                    path: path.to_owned(),
                })
            } else {
                Ok(FontId(3))
            }
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        created: u32,
        drops: Rc<Cell<u32>>,
        unavailable: bool,
        font_fails: bool,
    }

    impl Backend for FakeBackend {
        type Canvas = RecordingCanvas;

        fn create_canvas(&mut self, _ctx: HostContext) -> Result<RecordingCanvas> {
            if self.unavailable {
                return Err(Error::BackendUnavailable);
            }
            self.created += 1;
            Ok(RecordingCanvas {
                ops: Vec::new(),
                rotation: 0.0,
                drops: Rc::clone(&self.drops),
                font_fails: self.font_fails,
            })
        }
    }

    type TestGauge = AttitudeGauge<FakeSim, FakeBackend>;

    fn install(gauge: &mut TestGauge) {
        let data = InstallData {
            size_x: 800,
            size_y: 600,
        };
        assert!(gauge.dispatch(HostContext::null(), Phase::PreInstall(data)));
        assert!(gauge.dispatch(HostContext::null(), Phase::PostInstall(data)));
    }

    fn draw_once(sim: FakeSim, draw: DrawData) -> Vec<Op> {
        let mut gauge = TestGauge::new(sim, FakeBackend::default());
        install(&mut gauge);
        assert!(gauge.dispatch(HostContext::null(), Phase::PreDraw(draw)));
        gauge.canvas().unwrap().ops.clone()
    }

    fn rects(ops: &[Op]) -> Vec<(Rect, f32)> {
        ops.iter()
            .filter_map(|op| match op {
                Op::Rect { rect, rotation } => Some((*rect, *rotation)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn full_lifecycle() {
        let drops = Rc::new(Cell::new(0));
        let backend = FakeBackend {
            drops: Rc::clone(&drops),
            ..FakeBackend::default()
        };
        let mut gauge = TestGauge::new(FakeSim::level(), backend);
        assert_eq!(gauge.state(), GaugeState::Uninstalled);

        let data = InstallData::default();
        assert!(gauge.dispatch(HostContext::null(), Phase::PreInstall(data)));
        assert_eq!(gauge.state(), GaugeState::Installed);
        assert_eq!(
            gauge.vars(),
            Some(ResolvedVars {
                units: UNITS,
                pitch: PITCH,
                bank: BANK,
            })
        );
        assert!(gauge.canvas().is_none());

        assert!(gauge.dispatch(HostContext::null(), Phase::PostInstall(data)));
        assert_eq!(gauge.state(), GaugeState::Active);
        assert_eq!(gauge.font(), Some(FontId(3)));

        let draw = DrawData::with_size(800, 600);
        assert!(gauge.dispatch(HostContext::null(), Phase::PreDraw(draw)));
        assert_eq!(gauge.canvas().unwrap().ops.last(), Some(&Op::EndFrame));

        assert!(gauge.dispatch(HostContext::null(), Phase::PreKill));
        assert_eq!(gauge.state(), GaugeState::Killed);
        assert_eq!(drops.get(), 1);
        assert!(gauge.canvas().is_none());
    }

    #[test]
    fn pre_kill_without_post_install_destroys_nothing() {
        let drops = Rc::new(Cell::new(0));
        let backend = FakeBackend {
            drops: Rc::clone(&drops),
            ..FakeBackend::default()
        };
        let mut gauge = TestGauge::new(FakeSim::level(), backend);

        assert!(!gauge.dispatch(HostContext::null(), Phase::PreKill));
        assert_eq!(gauge.state(), GaugeState::Uninstalled);

        let data = InstallData::default();
        assert!(gauge.dispatch(HostContext::null(), Phase::PreInstall(data)));
        assert!(!gauge.dispatch(HostContext::null(), Phase::PreKill));
        assert_eq!(gauge.state(), GaugeState::Installed);
        assert_eq!(drops.get(), 0);
    }

    #[test]
    fn second_pre_kill_is_unhandled() {
        let drops = Rc::new(Cell::new(0));
        let backend = FakeBackend {
            drops: Rc::clone(&drops),
            ..FakeBackend::default()
        };
        let mut gauge = TestGauge::new(FakeSim::level(), backend);
        install(&mut gauge);

        assert!(gauge.dispatch(HostContext::null(), Phase::PreKill));
        assert!(!gauge.dispatch(HostContext::null(), Phase::PreKill));
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn draw_before_install_is_unhandled() {
        let mut gauge = TestGauge::new(FakeSim::level(), FakeBackend::default());
        let draw = DrawData::with_size(800, 600);
        assert!(!gauge.dispatch(HostContext::null(), Phase::PreDraw(draw)));

        let data = InstallData::default();
        assert!(gauge.dispatch(HostContext::null(), Phase::PreInstall(data)));
        assert!(!gauge.dispatch(HostContext::null(), Phase::PreDraw(draw)));
        assert!(gauge.sim_mut().read_indices.borrow().is_empty());
    }

    #[test]
    fn post_install_requires_pre_install() {
        let mut gauge = TestGauge::new(FakeSim::level(), FakeBackend::default());
        let data = InstallData::default();
        assert!(!gauge.dispatch(HostContext::null(), Phase::PostInstall(data)));
        assert_eq!(gauge.state(), GaugeState::Uninstalled);
    }

    #[test]
    fn unhandled_phases_return_false() {
        let mut gauge = TestGauge::new(FakeSim::level(), FakeBackend::default());
        install(&mut gauge);
        for id in [0, 1, 4, 5, 6, 7, 8, 9, 11, 13, 99] {
            assert!(!gauge.dispatch(HostContext::null(), Phase::Other(id)));
        }
        assert_eq!(gauge.state(), GaugeState::Active);
    }

    #[test]
    fn backend_failure_leaves_gauge_installed() {
        let backend = FakeBackend {
            unavailable: true,
            ..FakeBackend::default()
        };
        let mut gauge = TestGauge::new(FakeSim::level(), backend);
        let data = InstallData::default();
        assert!(gauge.dispatch(HostContext::null(), Phase::PreInstall(data)));
        assert!(!gauge.dispatch(HostContext::null(), Phase::PostInstall(data)));
        assert_eq!(gauge.state(), GaugeState::Installed);

        let draw = DrawData::with_size(800, 600);
        assert!(!gauge.dispatch(HostContext::null(), Phase::PreDraw(draw)));
    }

    #[test]
    fn font_failure_still_activates() {
        let backend = FakeBackend {
            font_fails: true,
            ..FakeBackend::default()
        };
        let mut gauge = TestGauge::new(FakeSim::level(), backend);
        install(&mut gauge);
        assert_eq!(gauge.state(), GaugeState::Active);
        assert_eq!(gauge.font(), None);
    }

    #[test]
    fn unknown_variables_are_kept_and_read_as_level() {
        let sim = FakeSim {
            pitch: 45.0,
            bank: 45.0,
            known: false,
            ..FakeSim::default()
        };
        let mut gauge = TestGauge::new(sim, FakeBackend::default());
        install(&mut gauge);
        assert_eq!(gauge.vars().unwrap().pitch, VarId(UNKNOWN_ID));

        let draw = DrawData::with_size(800, 600);
        assert!(gauge.dispatch(HostContext::null(), Phase::PreDraw(draw)));
        let ops = &gauge.canvas().unwrap().ops;
        let (sky, rotation) = rects(ops)[0];
        assert_close(sky.h, 550.0);
        assert_close(rotation, 0.0);
    }

    #[test]
    fn reinstall_after_kill() {
        let mut gauge = TestGauge::new(FakeSim::level(), FakeBackend::default());
        install(&mut gauge);
        assert!(gauge.dispatch(HostContext::null(), Phase::PreKill));
        install(&mut gauge);
        assert_eq!(gauge.state(), GaugeState::Active);
        assert_eq!(gauge.backend.created, 2);
    }

    #[test]
    fn pre_install_twice_is_unhandled() {
        let mut gauge = TestGauge::new(FakeSim::level(), FakeBackend::default());
        install(&mut gauge);
        let data = InstallData::default();
        assert!(!gauge.dispatch(HostContext::null(), Phase::PreInstall(data)));
        assert_eq!(gauge.state(), GaugeState::Active);
    }

    #[test]
    fn variables_are_read_at_index_zero() {
        let mut gauge = TestGauge::new(FakeSim::at(5.0, 5.0), FakeBackend::default());
        install(&mut gauge);
        let draw = DrawData::with_size(800, 600);
        assert!(gauge.dispatch(HostContext::null(), Phase::PreDraw(draw)));
        assert_eq!(*gauge.sim_mut().read_indices.borrow(), vec![0, 0]);
    }

    #[test]
    fn level_frame_splits_at_half_size() {
        let ops = draw_once(FakeSim::level(), DrawData::with_size(800, 600));
        let rects = rects(&ops);
        assert_eq!(rects.len(), 2);

        let (sky, _) = rects[0];
        let (ground, _) = rects[1];
        assert_close(sky.x, -550.0);
        assert_close(sky.y, -550.0);
        assert_close(sky.w, 1100.0);
        assert_close(sky.h, 550.0);
        assert_close(ground.y, 0.0);
        assert_close(ground.h, 550.0);
    }

    #[test]
    fn full_nose_up_paints_only_ground() {
        let ops = draw_once(FakeSim::at(90.0, 0.0), DrawData::with_size(800, 600));
        let rects = rects(&ops);
        assert_close(rects[0].0.h, 0.0);
        assert_close(rects[1].0.h, 1100.0);
    }

    #[test]
    fn full_nose_down_paints_only_sky() {
        let ops = draw_once(FakeSim::at(-90.0, 0.0), DrawData::with_size(800, 600));
        let rects = rects(&ops);
        assert_close(rects[0].0.h, 1100.0);
        assert_close(rects[1].0.h, 0.0);
    }

    #[test]
    fn horizon_rotates_with_bank_and_reference_stays_level() {
        let ops = draw_once(FakeSim::at(0.0, 30.0), DrawData::with_size(800, 600));
        let bank = 30f32.to_radians();

        for (_, rotation) in rects(&ops) {
            assert_close(rotation, bank);
        }

        let reset = ops.iter().position(|op| *op == Op::ResetTransform).unwrap();
        let last_rect = ops
            .iter()
            .rposition(|op| matches!(op, Op::Rect { .. }))
            .unwrap();
        assert!(last_rect < reset);

        let reference = &ops[reset..];
        assert_eq!(reference[1], Op::Translate(400.0, 300.0));
        let mut checked = 0;
        for op in reference {
            match op {
                Op::MoveTo { rotation, .. }
                | Op::LineTo { rotation, .. }
                | Op::Arc { rotation, .. }
                | Op::Circle { rotation, .. } => {
                    assert_close(*rotation, 0.0);
                    checked += 1;
                }
                Op::Rotate(_) | Op::Rect { .. } => panic!("unexpected {op:?} after reset"),
                _ => {}
            }
        }
        assert_eq!(checked, 5);
    }

    #[test]
    fn frame_opens_with_center_translation_and_rotation() {
        let ops = draw_once(FakeSim::at(0.0, -45.0), DrawData::with_size(800, 600));
        assert_eq!(
            ops[0],
            Op::BeginFrame {
                width: 800.0,
                height: 600.0,
                ratio: 1.0,
            }
        );
        assert_eq!(ops[1], Op::Translate(400.0, 300.0));
        match ops[2] {
            Op::Rotate(angle) => assert_close(angle, (-45f32).to_radians()),
            ref other => panic!("expected rotation, got {other:?}"),
        }
        assert_eq!(ops.last(), Some(&Op::EndFrame));
    }

    #[test]
    fn frame_is_scaled_by_device_pixel_ratio() {
        let draw = DrawData {
            fb_width: 1600,
            fb_height: 1200,
            ..DrawData::with_size(800, 600)
        };
        let ops = draw_once(FakeSim::level(), draw);
        assert_eq!(
            ops[0],
            Op::BeginFrame {
                width: 800.0,
                height: 600.0,
                ratio: 2.0,
            }
        );
    }

    #[test]
    fn reference_symbol_scales_with_width() {
        let config = GaugeConfig::default();
        let ops = draw_once(FakeSim::at(10.0, 20.0), DrawData::with_size(800, 600));

        let span = 800.0 * config.reference_span;
        let radius = 800.0 * config.reference_arc_radius;
        assert!(ops.contains(&Op::MoveTo {
            x: -span,
            y: 0.0,
            rotation: 0.0,
        }));
        assert!(ops.contains(&Op::LineTo {
            x: span,
            y: 0.0,
            rotation: 0.0,
        }));
        assert!(ops.contains(&Op::Arc {
            r: radius,
            a0: PI,
            a1: 0.0,
            dir: Winding::CounterClockwise,
            rotation: 0.0,
        }));
        assert!(ops.contains(&Op::Circle {
            r: 800.0 * config.reference_dot_radius,
            rotation: 0.0,
        }));
        assert!(ops.contains(&Op::StrokeColor(config.reference_color)));
        assert!(ops.contains(&Op::Stroke));
    }

    #[test]
    fn phase_from_raw_decodes_payloads() {
        let install = RawInstallData {
            size_x: 320,
            size_y: 240,
            parameters: std::ptr::null(),
        };
        let install_ptr = std::ptr::from_ref(&install).cast::<c_void>();
        let decoded = unsafe { Phase::from_raw(PANEL_SERVICE_PRE_INSTALL, install_ptr) };
        assert_eq!(
            decoded,
            Phase::PreInstall(InstallData {
                size_x: 320,
                size_y: 240,
            })
        );
        let decoded = unsafe { Phase::from_raw(PANEL_SERVICE_POST_INSTALL, install_ptr) };
        assert!(matches!(decoded, Phase::PostInstall(d) if d.size_x == 320));

        let draw = RawDrawData {
            mx: 0.0,
            my: 0.0,
            t: 12.5,
            dt: 0.02,
            win_width: 400,
            win_height: 300,
            fb_width: 800,
            fb_height: 600,
        };
        let draw_ptr = std::ptr::from_ref(&draw).cast::<c_void>();
        match unsafe { Phase::from_raw(PANEL_SERVICE_PRE_DRAW, draw_ptr) } {
            Phase::PreDraw(data) => {
                assert_eq!(data.win_width, 400);
                assert_eq!(data.fb_width, 800);
                assert!((data.time - 12.5).abs() < f64::EPSILON);
            }
            other => panic!("expected pre-draw, got {other:?}"),
        }
    }

    #[test]
    fn phase_from_raw_without_payload() {
        let null = std::ptr::null();
        assert_eq!(
            unsafe { Phase::from_raw(PANEL_SERVICE_PRE_KILL, null) },
            Phase::PreKill
        );
        assert_eq!(
            unsafe { Phase::from_raw(PANEL_SERVICE_PRE_DRAW, null) },
            Phase::Other(PANEL_SERVICE_PRE_DRAW)
        );
        assert_eq!(
            unsafe { Phase::from_raw(PANEL_SERVICE_PRE_INSTALL, null) },
            Phase::PreInstall(InstallData::default())
        );
        assert_eq!(
            unsafe { Phase::from_raw(PANEL_SERVICE_POST_INSTALL, null) },
            Phase::PostInstall(InstallData::default())
        );
        assert_eq!(unsafe { Phase::from_raw(13, null) }, Phase::Other(13));
    }

    #[test]
    fn install_without_payload_still_activates() {
        let mut gauge = TestGauge::new(FakeSim::level(), FakeBackend::default());
        let null = std::ptr::null();

        let pre_install = unsafe { Phase::from_raw(PANEL_SERVICE_PRE_INSTALL, null) };
        assert!(gauge.dispatch(HostContext::null(), pre_install));
        assert_eq!(gauge.state(), GaugeState::Installed);

        let post_install = unsafe { Phase::from_raw(PANEL_SERVICE_POST_INSTALL, null) };
        assert!(gauge.dispatch(HostContext::null(), post_install));
        assert_eq!(gauge.state(), GaugeState::Active);

        let draw = DrawData::with_size(800, 600);
        assert!(gauge.dispatch(HostContext::null(), Phase::PreDraw(draw)));
    }
}
