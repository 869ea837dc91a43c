use crate::domain::constants::{SCHEMA_NAME, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

const DENSITY_WEIGHT_TTR: f64 = 0.5;
const DENSITY_WEIGHT_PUNCT: f64 = 0.3;
const DENSITY_WEIGHT_LENGTH: f64 = 0.2;
const RESIDUE_DECAY: f64 = 0.25;
const ECHO_WINDOW: usize = 3;
const DRIFT_WEIGHT_ECHO: f64 = 0.6;
const DRIFT_WEIGHT_RESIDUE: f64 = 0.4;
const TREND_EPSILON: f64 = 0.05;

#[derive(thiserror::Error, Debug)]
pub enum StgError {
    #[error("cannot read input {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("guardrail rejected input: {}", reasons.join("; "))]
    GuardrailRejection { reasons: Vec<String> },
    #[error("cannot write {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid trace file {path}: {source}")]
    InvalidTrace {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Half-open byte range into the sanitized text. UTF-8 byte offsets, not
/// character counts; always on character boundaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    pub start_char: usize,
    pub end_char: usize,
}

/// Contiguous unit of analysis. Immutable once built; `index` is document
/// order, and document order is load-bearing for the residue/echo fold.
#[derive(Debug, Clone)]
pub struct Segment {
    pub index: usize,
    pub span: Span,
    pub text: String,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentTrace {
    pub index: usize,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub density_load: f64,
    pub residue: f64,
    pub echo_score: f64,
    pub drift_potential: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregates {
    pub segment_count: usize,
    pub mean_density_load: f64,
    pub max_density_load: f64,
    pub trend_density_load: Trend,
    pub mean_residue: f64,
    pub max_residue: f64,
    pub trend_residue: Trend,
    pub mean_echo_score: f64,
    pub max_echo_score: f64,
    pub trend_echo_score: Trend,
    pub mean_drift_potential: f64,
    pub max_drift_potential: f64,
    pub trend_drift_potential: Trend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaTag {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ids {
    pub content_id: String,
    pub trace_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    pub schema: SchemaTag,
    pub ids: Ids,
    pub non_governing: bool,
    pub segments: Vec<SegmentTrace>,
    pub aggregates: Aggregates,
}

/// Short content-derived identifier (sha256 prefix). No timestamps anywhere
/// in an artifact: the same text must serialize byte-identically every run.
pub fn make_id(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(digest)[..12].to_string()
}

fn tokenize(raw: &str) -> Vec<String> {
    let normalized: Vec<String> = raw
        .split_whitespace()
        .map(|w| {
            w.to_lowercase()
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_string()
        })
        .filter(|w| !w.is_empty())
        .collect();
    if !normalized.is_empty() {
        return normalized;
    }
    // Punctuation-only candidates keep their raw words so every span still
    // carries at least one token.
    raw.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// Deterministic sentence segmentation: a segment ends at a run of terminal
/// punctuation followed by whitespace/EOF, or at a blank line. Spans are
/// trimmed of surrounding whitespace, never overlap, and together cover every
/// non-whitespace character exactly once.
pub fn segment_text(text: &str) -> Vec<Segment> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0usize;
    let mut terminal_run = false;
    let mut newline_seen = false;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if start.is_some() {
                if terminal_run || (newline_seen && c == '\n') {
                    if let Some(s) = start.take() {
                        spans.push((s, end));
                    }
                    terminal_run = false;
                    newline_seen = false;
                } else if c == '\n' {
                    newline_seen = true;
                }
            }
            continue;
        }
        if start.is_none() {
            start = Some(i);
        }
        newline_seen = false;
        end = i + c.len_utf8();
        terminal_run = matches!(c, '.' | '!' | '?');
    }
    if let Some(s) = start {
        spans.push((s, end));
    }

    spans
        .into_iter()
        .enumerate()
        .map(|(index, (s, e))| {
            let raw = &text[s..e];
            Segment {
                index,
                span: Span {
                    start_char: s,
                    end_char: e,
                },
                text: raw.to_string(),
                tokens: tokenize(raw),
            }
        })
        .collect()
}

fn jaccard(a: &Segment, b: &Segment) -> f64 {
    let sa: HashSet<&str> = a.tokens.iter().map(String::as_str).collect();
    let sb: HashSet<&str> = b.tokens.iter().map(String::as_str).collect();
    let union = sa.union(&sb).count();
    if union == 0 {
        return 0.0;
    }
    sa.intersection(&sb).count() as f64 / union as f64
}

fn density_load(seg: &Segment, max_tokens: usize) -> f64 {
    let count = seg.tokens.len();
    if count == 0 || max_tokens == 0 {
        return 0.0;
    }
    let unique: HashSet<&str> = seg.tokens.iter().map(String::as_str).collect();
    let ttr = unique.len() as f64 / count as f64;
    let punct = seg.text.chars().filter(|c| c.is_ascii_punctuation()).count();
    let punct_density = (punct as f64 / count as f64).min(1.0);
    let length_norm = count as f64 / max_tokens as f64;
    DENSITY_WEIGHT_TTR * ttr
        + DENSITY_WEIGHT_PUNCT * punct_density
        + DENSITY_WEIGHT_LENGTH * length_norm
}

fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::MIN, f64::max).max(0.0)
}

/// Coarse trend: mean of the second half against the first half.
fn trend_of(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Flat;
    }
    let mid = values.len() / 2;
    let early = mean(&values[..mid]);
    let late = mean(&values[mid..]);
    if late - early > TREND_EPSILON {
        Trend::Rising
    } else if early - late > TREND_EPSILON {
        Trend::Falling
    } else {
        Trend::Flat
    }
}

/// Build the full trace for one document. Pure function of the sanitized
/// text: no clock, no randomness, no external state.
pub fn build_trace(text: &str, include_text: bool) -> Trace {
    let segments = segment_text(text);
    let max_tokens = segments.iter().map(|s| s.tokens.len()).max().unwrap_or(0);

    let mut density = Vec::with_capacity(segments.len());
    let mut residue = Vec::with_capacity(segments.len());
    let mut echo = Vec::with_capacity(segments.len());
    let mut drift = Vec::with_capacity(segments.len());

    // Residue is a strict left-to-right fold: residue[i] depends only on
    // residue[i-1] and the overlap between segments i and i-1.
    for (i, seg) in segments.iter().enumerate() {
        density.push(round6(density_load(seg, max_tokens)));

        let r = if i == 0 {
            0.0
        } else {
            let carry = jaccard(seg, &segments[i - 1]);
            clamp(residue[i - 1] + carry - RESIDUE_DECAY, -1.0, 1.0)
        };
        residue.push(round6(r));

        let window_start = i.saturating_sub(ECHO_WINDOW);
        let overlaps: Vec<f64> = segments[window_start..i]
            .iter()
            .map(|prev| jaccard(seg, prev))
            .collect();
        echo.push(round6(mean(&overlaps)));

        let d = if i == 0 {
            0.0
        } else {
            let echo_delta = echo[i] - echo[i - 1];
            let residue_delta = residue[i] - residue[i - 1];
            clamp(
                DRIFT_WEIGHT_ECHO * (-echo_delta).max(0.0)
                    + DRIFT_WEIGHT_RESIDUE * (-residue_delta).max(0.0),
                0.0,
                1.0,
            )
        };
        drift.push(round6(d));
    }

    let aggregates = Aggregates {
        segment_count: segments.len(),
        mean_density_load: round6(mean(&density)),
        max_density_load: round6(max_of(&density)),
        trend_density_load: trend_of(&density),
        mean_residue: round6(mean(&residue)),
        max_residue: round6(if residue.is_empty() {
            0.0
        } else {
            residue.iter().copied().fold(f64::MIN, f64::max)
        }),
        trend_residue: trend_of(&residue),
        mean_echo_score: round6(mean(&echo)),
        max_echo_score: round6(max_of(&echo)),
        trend_echo_score: trend_of(&echo),
        mean_drift_potential: round6(mean(&drift)),
        max_drift_potential: round6(max_of(&drift)),
        trend_drift_potential: trend_of(&drift),
    };

    let content_id = make_id(text);
    let trace_id = make_id(&format!("{}{}", content_id, SCHEMA_VERSION));

    Trace {
        schema: SchemaTag {
            name: SCHEMA_NAME.to_string(),
            version: SCHEMA_VERSION.to_string(),
        },
        ids: Ids {
            content_id,
            trace_id,
        },
        non_governing: true,
        segments: segments
            .iter()
            .map(|seg| SegmentTrace {
                index: seg.index,
                span: seg.span.clone(),
                text: include_text.then(|| seg.text.clone()),
                density_load: density[seg.index],
                residue: residue[seg.index],
                echo_score: echo[seg.index],
                drift_potential: drift[seg.index],
            })
            .collect(),
        aggregates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_SENTENCES: &str = "alpha beta gamma. alpha beta delta. omega psi chi.";

    #[test]
    fn segmentation_splits_on_terminal_punctuation() {
        let segs = segment_text("First one. Second one! Third?");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].text, "First one.");
        assert_eq!(segs[2].text, "Third?");
    }

    #[test]
    fn segmentation_splits_on_blank_lines() {
        let segs = segment_text("no punctuation here\n\nsecond paragraph");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].text, "no punctuation here");
        assert_eq!(segs[1].text, "second paragraph");
    }

    #[test]
    fn segmentation_keeps_punctuation_runs_together() {
        let segs = segment_text("Really?! Yes... fine.");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].text, "Really?!");
        assert_eq!(segs[1].text, "Yes...");
    }

    #[test]
    fn spans_cover_all_non_whitespace_characters() {
        let text = "One sentence here. Another, with commas!\n\nA final paragraph\twith tabs";
        let segs = segment_text(text);
        let rebuilt: String = segs
            .iter()
            .map(|s| &text[s.span.start_char..s.span.end_char])
            .collect::<Vec<_>>()
            .join("");
        let original_non_ws: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let rebuilt_non_ws: String = rebuilt.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(original_non_ws, rebuilt_non_ws);
        for pair in segs.windows(2) {
            assert!(pair[0].span.end_char <= pair[1].span.start_char);
        }
    }

    #[test]
    fn empty_and_whitespace_input_yield_empty_trace() {
        for text in ["", "   \n\t  \n\n"] {
            let trace = build_trace(text, false);
            assert!(trace.segments.is_empty());
            assert_eq!(trace.aggregates.segment_count, 0);
        }
    }

    #[test]
    fn residue_follows_hand_computed_recurrence() {
        // s0 {alpha,beta,gamma}, s1 {alpha,beta,delta}: jaccard 2/4 = 0.5
        // s2 {omega,psi,chi}: jaccard with s1 = 0
        // r0 = 0; r1 = 0 + 0.5 - 0.25 = 0.25; r2 = 0.25 + 0 - 0.25 = 0.
        let trace = build_trace(THREE_SENTENCES, false);
        let r: Vec<f64> = trace.segments.iter().map(|s| s.residue).collect();
        assert_eq!(r, vec![0.0, 0.25, 0.0]);
    }

    #[test]
    fn echo_and_drift_follow_hand_computed_values() {
        let trace = build_trace(THREE_SENTENCES, false);
        let echo: Vec<f64> = trace.segments.iter().map(|s| s.echo_score).collect();
        assert_eq!(echo, vec![0.0, 0.5, 0.0]);
        // drift2 = 0.6 * 0.5 (echo fell) + 0.4 * 0.25 (residue fell) = 0.4
        let drift: Vec<f64> = trace.segments.iter().map(|s| s.drift_potential).collect();
        assert_eq!(drift, vec![0.0, 0.0, 0.4]);
    }

    #[test]
    fn metrics_stay_within_declared_bounds() {
        let text = "a a a a a! b?? c-c c,c;c. wild *** punctuation !!! everywhere. \
                    the quick brown fox jumps over the lazy dog. the quick brown fox again.";
        let trace = build_trace(text, false);
        assert!(!trace.segments.is_empty());
        for seg in &trace.segments {
            assert!((0.0..=1.0).contains(&seg.density_load), "{seg:?}");
            assert!((0.0..=1.0).contains(&seg.echo_score), "{seg:?}");
            assert!((-1.0..=1.0).contains(&seg.residue), "{seg:?}");
            assert!((0.0..=1.0).contains(&seg.drift_potential), "{seg:?}");
        }
    }

    #[test]
    fn trace_is_deterministic() {
        let text = "Repeated structure here. Repeated structure here. Something new at last.";
        let a = serde_json::to_string(&build_trace(text, true)).unwrap();
        let b = serde_json::to_string(&build_trace(text, true)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn include_text_is_off_by_default_shape() {
        let trace = build_trace("One. Two.", false);
        assert!(trace.segments.iter().all(|s| s.text.is_none()));
        let trace = build_trace("One. Two.", true);
        assert_eq!(trace.segments[0].text.as_deref(), Some("One."));
    }

    #[test]
    fn ids_are_content_derived() {
        let a = build_trace("same text.", false);
        let b = build_trace("same text.", false);
        assert_eq!(a.ids.content_id, b.ids.content_id);
        assert_eq!(a.ids.trace_id, b.ids.trace_id);
        let c = build_trace("other text.", false);
        assert_ne!(a.ids.content_id, c.ids.content_id);
    }

    #[test]
    fn repetition_raises_echo_trend() {
        let repeated = "the same tokens repeat here. the same tokens repeat here. \
                        the same tokens repeat here. the same tokens repeat here.";
        let trace = build_trace(repeated, false);
        assert_eq!(trace.aggregates.trend_echo_score, Trend::Rising);
        assert!(trace.aggregates.mean_echo_score > 0.5);
    }
}
