//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `guardrail.rs` — content-safety prefilter: verdict + redaction.
//! - `arbiter.rs` — trace classification + threshold config loading.
//! - `storage.rs` — input loading, atomic artifact writes, audit log.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod arbiter;
pub mod guardrail;
pub mod output;
pub mod storage;
