//! The exported gauge callback and the host's legacy variable API.

use std::cell::RefCell;
use std::ffi::{c_void, CString};
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::Error;
use crate::gauge::{AttitudeGauge, Phase};
use crate::nanovg::NanoVgBackend;
use crate::simvars::SimVars;
use crate::types::{HostContext, UnitsId, VarId, UNKNOWN_ID};

extern "C" {
    fn get_units_enum(name: *const c_char) -> c_int;
    fn get_aircraft_var_enum(name: *const c_char) -> c_int;
    fn aircraft_varget(simvar: c_int, units: c_int, index: c_int) -> f64;
}

/// [`SimVars`] over the host's `gauges.h` functions.
#[derive(Debug, Default)]
pub struct LegacySimVars;

fn resolve(name: &str, lookup: unsafe extern "C" fn(*const c_char) -> c_int) -> i32 {
    match CString::new(name) {
        // SAFETY: the host only reads the NUL-terminated name.
        Ok(name) => unsafe { lookup(name.as_ptr()) },
        Err(e) => {
            tracing::warn!("{}", Error::from(e));
            UNKNOWN_ID
        }
    }
}

impl SimVars for LegacySimVars {
    fn units_id(&mut self, name: &str) -> UnitsId {
        UnitsId(resolve(name, get_units_enum))
    }

    fn aircraft_var_id(&mut self, name: &str) -> VarId {
        VarId(resolve(name, get_aircraft_var_enum))
    }

    fn aircraft_var(&self, var: VarId, units: UnitsId, index: i32) -> f64 {
        // SAFETY: plain value call; unknown ids make the host return 0.
        unsafe { aircraft_varget(var.0, units.0, index) }
    }
}

thread_local! {
    static GAUGE: RefCell<AttitudeGauge<LegacySimVars, NanoVgBackend>> =
        RefCell::new(AttitudeGauge::new(LegacySimVars, NanoVgBackend));
}

/// Panel service callback for the `Attitude` gauge.
///
/// # Safety
///
/// Called by the host only. `data` must be null or point to the payload the
/// host documents for `service_id`.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn Attitude_gauge_callback(
    ctx: *mut c_void,
    service_id: c_int,
    data: *mut c_void,
) -> bool {
    // SAFETY: forwarded from this function's contract.
    let phase = unsafe { Phase::from_raw(service_id, data) };
    let ctx = HostContext::from_raw(ctx);

    let result = catch_unwind(AssertUnwindSafe(|| {
        GAUGE.with_borrow_mut(|gauge| gauge.dispatch(ctx, phase))
    }));
    result.unwrap_or_else(|_| {
        tracing::error!(service_id, "attitude gauge callback panicked");
        false
    })
}
