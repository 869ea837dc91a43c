use crate::trace::{StgError, Trace};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub fn audit(action: &str, data: serde_json::Value) {
    let home = match std::env::var("HOME") {
        Ok(h) => h,
        Err(_) => return,
    };
    let path = PathBuf::from(home).join(".config/stg/audit.jsonl");
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": epoch_now(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn epoch_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    ts.to_string()
}

/// Read the source document. Any I/O or decoding failure is fatal and names
/// the offending path.
pub fn load_input(path: &Path) -> Result<String, StgError> {
    std::fs::read_to_string(path).map_err(|source| StgError::Input {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_trace(path: &Path) -> Result<Trace, StgError> {
    let raw = std::fs::read_to_string(path).map_err(|source| StgError::Input {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StgError::InvalidTrace {
        path: path.display().to_string(),
        source,
    })
}

/// Write an artifact via a sibling temp file plus rename, so a failed write
/// never leaves a half-written artifact behind.
pub fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<(), StgError> {
    let shown = path.display().to_string();
    let body = serde_json::to_string_pretty(value).map_err(|e| StgError::Serialization {
        path: shown.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| StgError::Serialization {
                path: shown.clone(),
                source,
            })?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body).map_err(|source| StgError::Serialization {
        path: shown.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        StgError::Serialization {
            path: shown.clone(),
            source,
        }
    })
}

/// Pipeline atomicity: both artifacts land or neither does. The report is
/// written second; on failure the already-written trace is removed.
pub fn write_pipeline_artifacts<T: Serialize, R: Serialize>(
    trace_path: &Path,
    trace: &T,
    report_path: &Path,
    report: &R,
) -> Result<(), StgError> {
    write_artifact(trace_path, trace)?;
    if let Err(e) = write_artifact(report_path, report) {
        let _ = std::fs::remove_file(trace_path);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::build_trace;

    #[test]
    fn load_input_names_the_missing_path() {
        let err = load_input(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn artifact_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let trace = build_trace("One sentence. Two sentences.", false);
        write_artifact(&path, &trace).unwrap();
        let loaded = load_trace(&path).unwrap();
        assert_eq!(loaded.ids.content_id, trace.ids.content_id);
        assert_eq!(loaded.segments.len(), 2);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn invalid_trace_file_is_reported_as_such() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"not\": \"a trace\"}").unwrap();
        let err = load_trace(&path).unwrap_err();
        assert!(matches!(err, StgError::InvalidTrace { .. }));
    }

    #[test]
    fn failed_report_write_removes_the_trace() {
        let dir = tempfile::tempdir().unwrap();
        let trace_path = dir.path().join("trace.json");
        // A directory at the report path makes the rename fail.
        let report_path = dir.path().join("report.json");
        std::fs::create_dir_all(&report_path).unwrap();
        let trace = build_trace("One. Two.", false);
        let err = write_pipeline_artifacts(&trace_path, &trace, &report_path, &trace);
        assert!(err.is_err());
        assert!(!trace_path.exists());
    }
}
