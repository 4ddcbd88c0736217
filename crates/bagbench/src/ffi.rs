//! C ABI for benchmark entry points exported by compiled workloads.
//!
//! Workloads export functions taking the thread count followed by up to
//! three `int` parameters and returning [`CBenchResult`] by value.

use crate::measure::Measure;
use crate::plan::SweepValue;
use crate::sample::Measurement;
use anyhow::bail;
use std::os::raw::{c_float, c_int};

/// Largest parameter tuple an entry point may take after the sweep value
pub const MAX_FOREIGN_PARAMETERS: usize = 3;

/// Result record returned by a benchmark entry point.
///
/// Mirrors `struct bench_result { float time; int num_items; int num_CASSuc;
/// int num_CASFail; int num_Steal; }`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CBenchResult {
    pub time: c_float,
    pub num_items: c_int,
    pub num_cas_success: c_int,
    pub num_cas_fail: c_int,
    pub num_steal: c_int,
}

impl From<CBenchResult> for Measurement {
    fn from(r: CBenchResult) -> Self {
        Self {
            elapsed: f64::from(r.time),
            num_items: i64::from(r.num_items),
            num_cas_success: i64::from(r.num_cas_success),
            num_cas_fail: i64::from(r.num_cas_fail),
            num_steal: i64::from(r.num_steal),
        }
    }
}

/// Entry point taking only the thread count
pub type EntryPoint0 = extern "C" fn(c_int) -> CBenchResult;
pub type EntryPoint1 = extern "C" fn(c_int, c_int) -> CBenchResult;
pub type EntryPoint2 = extern "C" fn(c_int, c_int, c_int) -> CBenchResult;
pub type EntryPoint3 = extern "C" fn(c_int, c_int, c_int, c_int) -> CBenchResult;

#[derive(Clone, Copy)]
enum EntryPoint {
    Params0(EntryPoint0),
    Params1(EntryPoint1),
    Params2(EntryPoint2),
    Params3(EntryPoint3),
}

/// A benchmark entry point resolved from a compiled artifact.
///
/// The code behind the pointer must stay loaded for as long as the value
/// (or a copy of it) is called.
#[derive(Clone, Copy)]
pub struct ForeignFn {
    entry: EntryPoint,
}

impl From<EntryPoint0> for ForeignFn {
    fn from(f: EntryPoint0) -> Self {
        Self {
            entry: EntryPoint::Params0(f),
        }
    }
}

impl From<EntryPoint1> for ForeignFn {
    fn from(f: EntryPoint1) -> Self {
        Self {
            entry: EntryPoint::Params1(f),
        }
    }
}

impl From<EntryPoint2> for ForeignFn {
    fn from(f: EntryPoint2) -> Self {
        Self {
            entry: EntryPoint::Params2(f),
        }
    }
}

impl From<EntryPoint3> for ForeignFn {
    fn from(f: EntryPoint3) -> Self {
        Self {
            entry: EntryPoint::Params3(f),
        }
    }
}

impl ForeignFn {
    pub fn parameter_count(&self) -> usize {
        match self.entry {
            EntryPoint::Params0(_) => 0,
            EntryPoint::Params1(_) => 1,
            EntryPoint::Params2(_) => 2,
            EntryPoint::Params3(_) => 3,
        }
    }
}

impl Measure for ForeignFn {
    fn measure(
        &mut self,
        sweep_value: SweepValue,
        parameters: &[i32],
    ) -> anyhow::Result<Measurement> {
        if parameters.len() != self.parameter_count() {
            bail!(
                "entry point takes {} parameters, plan supplies {}",
                self.parameter_count(),
                parameters.len()
            );
        }
        let x = sweep_value.0;
        let result = match self.entry {
            EntryPoint::Params0(f) => f(x),
            EntryPoint::Params1(f) => f(x, parameters[0]),
            EntryPoint::Params2(f) => f(x, parameters[0], parameters[1]),
            EntryPoint::Params3(f) => f(x, parameters[0], parameters[1], parameters[2]),
        };
        Ok(result.into())
    }

    fn label(&self) -> &str {
        "foreign"
    }
}
