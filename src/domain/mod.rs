//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep report/threshold/output structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — report, thresholds, guardrail verdict, output structs.
//! - `constants.rs` — schema names/versions and default threshold values.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect the serialized artifacts and `--json`
//! outputs. Keep schema-impacting changes synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;
