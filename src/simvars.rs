//! Read access to simulation variables.

use crate::types::{UnitsId, VarId};

/// The host's simulation variable interface.
///
/// Resolution happens once per lifecycle; reads happen every frame. Neither
/// reports failure: unknown names resolve to [`UNKNOWN_ID`] and reads through
/// such ids return whatever the host returns, typically `0.0`.
///
/// [`UNKNOWN_ID`]: crate::types::UNKNOWN_ID
pub trait SimVars {
    /// Resolve a unit name such as `"DEGREES"`.
    fn units_id(&mut self, name: &str) -> UnitsId;

    /// Resolve an aircraft variable name such as `"PLANE PITCH DEGREES"`.
    fn aircraft_var_id(&mut self, name: &str) -> VarId;

    /// Read the current value of `var` expressed in `units`.
    fn aircraft_var(&self, var: VarId, units: UnitsId, index: i32) -> f64;
}
