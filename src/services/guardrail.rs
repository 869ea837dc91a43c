use crate::domain::models::{GuardrailStatus, GuardrailVerdict};
use regex::Regex;
use std::sync::LazyLock;

// Kept small and narrow on purpose: structural pattern matching only, no
// interpretation of meaning or intent.

const HIGH_RISK_PAIRS: &[(&str, &str)] = &[(
    r"(?i)\b(minor|child|underage)\b",
    r"(?i)\b(sexual|pornographic|explicit)\b",
)];

const SENSITIVE_TRIGGERS: &[&str] = &[
    r"(?i)\b(rape|sexual\s+assault|molest(ed|ation)|incest)\b",
    r"(?i)\b(abuse|abused|abuser|assault|violence|violent)\b",
];

const DOC_CONTEXT_CUES: &[&str] = &[
    r"(?i)\b(case\s+no\.|docket|plaintiff|defendant|court|affidavit|indictment|testimony)\b",
    r"(?i)\b(judge|jury|prosecutor|defense\s+counsel|sentencing|probation)\b",
    r"(?i)\b(reporting|investigation|journalism|according\s+to|witness)\b",
    r"(?i)\b(study|paper|research|methodology|dataset|ethics\s+approval)\b",
    r"(?i)\b(therapy|counsel(or|ing)|clinical|diagnos(is|ed)|patient)\b",
];

static HIGH_RISK: LazyLock<Vec<(Regex, Regex)>> = LazyLock::new(|| {
    HIGH_RISK_PAIRS
        .iter()
        .map(|(a, b)| {
            (
                Regex::new(a).expect("valid high-risk pattern"),
                Regex::new(b).expect("valid high-risk pattern"),
            )
        })
        .collect()
});

static SENSITIVE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SENSITIVE_TRIGGERS
        .iter()
        .map(|p| Regex::new(p).expect("valid sensitive pattern"))
        .collect()
});

static CONTEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DOC_CONTEXT_CUES
        .iter()
        .map(|p| Regex::new(p).expect("valid context pattern"))
        .collect()
});

fn redact(text: &str) -> String {
    let mut out = text.to_string();
    for re in SENSITIVE.iter() {
        out = re.replace_all(&out, "[REDACTED]").into_owned();
    }
    out
}

/// Evaluate raw input before any trace work. Rejection is terminal; redaction
/// replaces matched triggers so the core only ever sees sanitized text.
pub fn evaluate(text: &str) -> GuardrailVerdict {
    for (a, b) in HIGH_RISK.iter() {
        if a.is_match(text) && b.is_match(text) {
            return GuardrailVerdict {
                status: GuardrailStatus::Reject,
                sanitized_text: String::new(),
                reasons: vec![
                    "high-risk combination detected (minor/underage + explicit sexual framing)"
                        .to_string(),
                ],
                confidence: 0.95,
            };
        }
    }

    let has_sensitive = SENSITIVE.iter().any(|re| re.is_match(text));
    if has_sensitive {
        let has_context = CONTEXT.iter().any(|re| re.is_match(text));
        let (reason, confidence) = if has_context {
            (
                "sensitive terms in documentary/legal/clinical context; redacted",
                0.70,
            )
        } else {
            (
                "sensitive terms without documentary/legal/clinical context; redacted",
                0.60,
            )
        };
        return GuardrailVerdict {
            status: GuardrailStatus::Redact,
            sanitized_text: redact(text),
            reasons: vec![reason.to_string()],
            confidence,
        };
    }

    GuardrailVerdict {
        status: GuardrailStatus::Allow,
        sanitized_text: text.to_string(),
        reasons: vec!["no guardrail triggers".to_string()],
        confidence: 0.10,
    }
}
