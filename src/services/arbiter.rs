use crate::domain::constants::{ARBITER_NAME, ARBITER_VERSION};
use crate::domain::models::{ArbiterInfo, InputRef, Label, Report, Thresholds};
use crate::trace::{Trace, Trend};
use std::path::{Path, PathBuf};

/// Load classification cutoffs. An explicit path must exist and parse; the
/// default `~/.config/stg/thresholds.toml` falls back to built-in defaults
/// when absent.
pub fn load_thresholds(explicit: Option<&Path>) -> anyhow::Result<Thresholds> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let home = std::env::var("HOME")?;
            let p = PathBuf::from(home).join(".config/stg/thresholds.toml");
            if !p.exists() {
                return Ok(Thresholds::default());
            }
            p
        }
    };
    let raw = std::fs::read_to_string(&path)?;
    Ok(toml::from_str(&raw)?)
}

/// Reduce a trace to labels via the enumerated cutoffs. Read-then-derive
/// only: no segmentation or base-metric recomputation, and the trace is never
/// mutated. Every comparison is strict, so a value exactly at its cutoff does
/// not produce the label.
pub fn classify(trace: &Trace, thresholds: &Thresholds) -> Report {
    let arbiter = ArbiterInfo {
        name: ARBITER_NAME.to_string(),
        version: ARBITER_VERSION.to_string(),
        non_governing: true,
    };
    let input = InputRef {
        content_id: trace.ids.content_id.clone(),
        trace_id: trace.ids.trace_id.clone(),
        segment_count: trace.aggregates.segment_count,
    };

    let agg = &trace.aggregates;
    if agg.segment_count == 0 {
        return Report {
            arbiter,
            input,
            labels: vec![Label::InsufficientData],
            scores: None,
            thresholds: thresholds.clone(),
        };
    }

    let mut labels = Vec::new();

    // stable/drifting are mutually exclusive: when both rules fire, the
    // larger threshold margin wins; margins within epsilon of each other are
    // ambiguous and suppress both.
    let stable_fires =
        agg.mean_echo_score > thresholds.tau_stable && agg.trend_echo_score != Trend::Falling;
    let drifting_fires = agg.mean_drift_potential > thresholds.tau_drift;
    match (stable_fires, drifting_fires) {
        (true, true) => {
            let stable_margin = agg.mean_echo_score - thresholds.tau_stable;
            let drift_margin = agg.mean_drift_potential - thresholds.tau_drift;
            if (stable_margin - drift_margin).abs() <= thresholds.margin_epsilon {
                labels.push(Label::Ambiguous);
            } else if stable_margin > drift_margin {
                labels.push(Label::Stable);
            } else {
                labels.push(Label::Drifting);
            }
        }
        (true, false) => labels.push(Label::Stable),
        (false, true) => labels.push(Label::Drifting),
        (false, false) => {}
    }

    if agg.mean_residue > thresholds.tau_residue {
        labels.push(Label::HighResidue);
    }
    if agg.mean_residue < -thresholds.tau_residue {
        labels.push(Label::Dissipating);
    }
    if agg.trend_echo_score == Trend::Falling && agg.mean_echo_score < thresholds.tau_echo_decay {
        labels.push(Label::EchoDecay);
    }
    if labels.is_empty() {
        labels.push(Label::Inert);
    }

    Report {
        arbiter,
        input,
        labels,
        scores: Some(agg.clone()),
        thresholds: thresholds.clone(),
    }
}
