//! Stable constants shared across the pipeline.

pub const SCHEMA_NAME: &str = "STG_Trace";
pub const SCHEMA_VERSION: &str = "1.0";

pub const ARBITER_NAME: &str = "ArbiterSTG";
pub const ARBITER_VERSION: &str = "1.0";

pub const DEFAULT_TRACE_FILE: &str = "trace.json";
pub const DEFAULT_REPORT_FILE: &str = "arbiter_report.json";

// Default classification cutoffs. Every comparison in the arbiter is strict:
// a value exactly at its cutoff does not cross it.
pub const DEFAULT_TAU_DRIFT: f64 = 0.35;
pub const DEFAULT_TAU_STABLE: f64 = 0.45;
pub const DEFAULT_TAU_RESIDUE: f64 = 0.5;
pub const DEFAULT_TAU_ECHO_DECAY: f64 = 0.25;
pub const DEFAULT_MARGIN_EPSILON: f64 = 1e-9;
