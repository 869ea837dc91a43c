use crate::cli::{Cli, Commands};
use crate::domain::models::{GuardrailStatus, RunSummary};
use crate::services::arbiter;
use crate::services::guardrail;
use crate::services::output::print_one;
use crate::services::storage;
use crate::trace::{build_trace, StgError};

pub fn handle_runtime_commands(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Tracegen {
            infile,
            out,
            include_text,
        } => {
            let raw = storage::load_input(infile)?;
            let verdict = guardrail::evaluate(&raw);
            if verdict.status == GuardrailStatus::Reject {
                return Err(StgError::GuardrailRejection {
                    reasons: verdict.reasons,
                }
                .into());
            }
            let trace = build_trace(&verdict.sanitized_text, *include_text);
            storage::write_artifact(out, &trace)?;
            storage::audit(
                "tracegen",
                serde_json::json!({
                    "infile": infile.display().to_string(),
                    "out": out.display().to_string(),
                    "guardrail": verdict.status,
                    "segments": trace.aggregates.segment_count,
                }),
            );
            print_one(
                cli.json,
                serde_json::json!({
                    "content_id": &trace.ids.content_id,
                    "trace_id": &trace.ids.trace_id,
                    "segments": trace.aggregates.segment_count,
                    "guardrail": verdict.status,
                    "out": out.display().to_string(),
                }),
                |_| {
                    format!(
                        "trace written: {} ({} segments)",
                        out.display(),
                        trace.aggregates.segment_count
                    )
                },
            )?;
        }
        Commands::Arbiter {
            infile,
            out,
            thresholds,
        } => {
            let trace = storage::load_trace(infile)?;
            let cutoffs = arbiter::load_thresholds(thresholds.as_deref())?;
            let report = arbiter::classify(&trace, &cutoffs);
            storage::write_artifact(out, &report)?;
            storage::audit(
                "arbiter",
                serde_json::json!({
                    "infile": infile.display().to_string(),
                    "out": out.display().to_string(),
                    "labels": &report.labels,
                }),
            );
            let labels: Vec<&str> = report.labels.iter().map(|l| l.as_str()).collect();
            print_one(cli.json, &report, |_| {
                format!("report written: {} [{}]", out.display(), labels.join(", "))
            })?;
        }
        Commands::Run {
            infile,
            trace_out,
            report_out,
            include_text,
            thresholds,
        } => {
            let raw = storage::load_input(infile)?;
            let verdict = guardrail::evaluate(&raw);
            if verdict.status == GuardrailStatus::Reject {
                return Err(StgError::GuardrailRejection {
                    reasons: verdict.reasons,
                }
                .into());
            }
            let trace = build_trace(&verdict.sanitized_text, *include_text);
            let cutoffs = arbiter::load_thresholds(thresholds.as_deref())?;
            let report = arbiter::classify(&trace, &cutoffs);
            storage::write_pipeline_artifacts(trace_out, &trace, report_out, &report)?;
            storage::audit(
                "run",
                serde_json::json!({
                    "infile": infile.display().to_string(),
                    "trace_out": trace_out.display().to_string(),
                    "report_out": report_out.display().to_string(),
                    "guardrail": verdict.status,
                    "labels": &report.labels,
                }),
            );
            let summary = RunSummary {
                guardrail: verdict.status,
                segment_count: trace.aggregates.segment_count,
                labels: report.labels.clone(),
                trace_path: trace_out.display().to_string(),
                report_path: report_out.display().to_string(),
            };
            print_one(cli.json, &summary, |s| {
                let labels: Vec<&str> = s.labels.iter().map(|l| l.as_str()).collect();
                format!(
                    "trace: {}\nreport: {} [{}]",
                    s.trace_path,
                    s.report_path,
                    labels.join(", ")
                )
            })?;
        }
        Commands::Guard { infile } => {
            let raw = storage::load_input(infile)?;
            let verdict = guardrail::evaluate(&raw);
            print_one(cli.json, &verdict, |v| {
                let mut lines = vec![format!(
                    "guardrail: {} (confidence {:.2})",
                    v.status.as_str(),
                    v.confidence
                )];
                for r in &v.reasons {
                    lines.push(format!("- {}", r));
                }
                lines.join("\n")
            })?;
            // The verdict is still printed above; a rejection is a failure
            // exit so callers can gate on it.
            if verdict.status == GuardrailStatus::Reject {
                return Err(StgError::GuardrailRejection {
                    reasons: verdict.reasons,
                }
                .into());
            }
        }
    }
    Ok(())
}
