use crate::domain::constants::{
    DEFAULT_MARGIN_EPSILON, DEFAULT_TAU_DRIFT, DEFAULT_TAU_ECHO_DECAY, DEFAULT_TAU_RESIDUE,
    DEFAULT_TAU_STABLE,
};
use crate::trace::Aggregates;
use serde::{Deserialize, Serialize};

fn default_tau_drift() -> f64 {
    DEFAULT_TAU_DRIFT
}

fn default_tau_stable() -> f64 {
    DEFAULT_TAU_STABLE
}

fn default_tau_residue() -> f64 {
    DEFAULT_TAU_RESIDUE
}

fn default_tau_echo_decay() -> f64 {
    DEFAULT_TAU_ECHO_DECAY
}

fn default_margin_epsilon() -> f64 {
    DEFAULT_MARGIN_EPSILON
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Classification cutoffs, enumerated once. Loadable from
/// `~/.config/stg/thresholds.toml`; any missing field falls back to its
/// default, a missing file means all defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_tau_drift")]
    pub tau_drift: f64,
    #[serde(default = "default_tau_stable")]
    pub tau_stable: f64,
    #[serde(default = "default_tau_residue")]
    pub tau_residue: f64,
    #[serde(default = "default_tau_echo_decay")]
    pub tau_echo_decay: f64,
    #[serde(default = "default_margin_epsilon")]
    pub margin_epsilon: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            tau_drift: DEFAULT_TAU_DRIFT,
            tau_stable: DEFAULT_TAU_STABLE,
            tau_residue: DEFAULT_TAU_RESIDUE,
            tau_echo_decay: DEFAULT_TAU_ECHO_DECAY,
            margin_epsilon: DEFAULT_MARGIN_EPSILON,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Label {
    Stable,
    Drifting,
    Ambiguous,
    HighResidue,
    Dissipating,
    EchoDecay,
    Inert,
    InsufficientData,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Stable => "stable",
            Label::Drifting => "drifting",
            Label::Ambiguous => "ambiguous",
            Label::HighResidue => "high-residue",
            Label::Dissipating => "dissipating",
            Label::EchoDecay => "echo-decay",
            Label::Inert => "inert",
            Label::InsufficientData => "insufficient-data",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbiterInfo {
    pub name: String,
    pub version: String,
    pub non_governing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRef {
    pub content_id: String,
    pub trace_id: String,
    pub segment_count: usize,
}

/// Derived classification for one trace. Created exactly once per trace and
/// fully explainable from `scores` plus `thresholds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub arbiter: ArbiterInfo,
    pub input: InputRef,
    pub labels: Vec<Label>,
    pub scores: Option<Aggregates>,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardrailStatus {
    Allow,
    Redact,
    Reject,
}

impl GuardrailStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GuardrailStatus::Allow => "allow",
            GuardrailStatus::Redact => "redact",
            GuardrailStatus::Reject => "reject",
        }
    }
}

/// Content-safety verdict. The core pipeline only ever sees
/// `sanitized_text`; `Reject` short-circuits before the core runs.
#[derive(Debug, Clone, Serialize)]
pub struct GuardrailVerdict {
    pub status: GuardrailStatus,
    #[serde(skip)]
    pub sanitized_text: String,
    pub reasons: Vec<String>,
    pub confidence: f64,
}

#[derive(Serialize)]
pub struct RunSummary {
    pub guardrail: GuardrailStatus,
    pub segment_count: usize,
    pub labels: Vec<Label>,
    pub trace_path: String,
    pub report_path: String,
}
