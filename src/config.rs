//! Gauge configuration: what to read from the simulation and how to paint it.

use crate::types::Color;

/// Unit the attitude variables are read in.
pub const DEGREES: &str = "DEGREES";
/// Simulation variable holding the aircraft pitch.
pub const PLANE_PITCH_DEGREES: &str = "PLANE PITCH DEGREES";
/// Simulation variable holding the aircraft bank.
pub const PLANE_BANK_DEGREES: &str = "PLANE BANK DEGREES";

/// Everything the attitude gauge needs to know besides live simulation data.
///
/// Reference symbol sizes are fractions of the window width so the symbol
/// scales with the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeConfig {
    /// Unit name resolved at pre-install.
    pub units: String,
    /// Pitch variable name resolved at pre-install.
    pub pitch_variable: String,
    /// Bank variable name resolved at pre-install.
    pub bank_variable: String,
    /// Face name the font is registered under.
    pub font_name: String,
    /// Font file, relative to the gauge package.
    pub font_path: String,
    /// Factor applied to the window diagonal so the rotated horizon never
    /// exposes empty corners.
    pub oversize: f32,
    /// Fill above the horizon line.
    pub sky_color: Color,
    /// Fill below the horizon line.
    pub ground_color: Color,
    /// Stroke and fill of the aircraft reference symbol.
    pub reference_color: Color,
    /// Reference symbol stroke width in pixels.
    pub reference_stroke_width: f32,
    /// Distance from center to the outer end of each horizontal segment.
    pub reference_span: f32,
    /// Radius of the arc between the two segments.
    pub reference_arc_radius: f32,
    /// Radius of the center dot.
    pub reference_dot_radius: f32,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            units: DEGREES.to_owned(),
            pitch_variable: PLANE_PITCH_DEGREES.to_owned(),
            bank_variable: PLANE_BANK_DEGREES.to_owned(),
            font_name: "sans".to_owned(),
            font_path: "./data/Roboto-Regular.ttf".to_owned(),
            oversize: 1.1,
            sky_color: Color::rgb(0, 119, 190),
            ground_color: Color::rgb(134, 84, 47),
            reference_color: Color::rgb(255, 255, 0),
            reference_stroke_width: 4.0,
            reference_span: 0.35,
            reference_arc_radius: 0.12,
            reference_dot_radius: 0.015,
        }
    }
}
