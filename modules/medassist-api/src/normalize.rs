//! Coercing model output into [`AnalysisFindings`].
//!
//! Structured output is parsed leniently: missing keys become empty values.
//! Output that is not a JSON object never fails the request; it is turned into
//! a degraded result that points the reader at a professional review.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use ai_client::{extract_json_payload, extract_json_payload_to_last_fence, truncate_chars};
use medassist_common::{AnalysisFindings, AnalysisResult, Language, MedAssistError, Result};

pub const FALLBACK_SUMMARY_CHARS: usize = 500;
pub const FALLBACK_KEY_FINDING: &str =
    "The analysis could not be structured automatically; the summary contains the raw model output.";
pub const FALLBACK_RECOMMENDATION: &str =
    "Have a qualified healthcare professional review this material manually.";
pub const FALLBACK_NEXT_STEP: &str =
    "Consult a healthcare professional for a manual review before acting on this analysis.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedAnalysis {
    Structured(AnalysisFindings),
    Fallback(AnalysisFindings),
}

impl NormalizedAnalysis {
    pub fn is_fallback(&self) -> bool {
        matches!(self, NormalizedAnalysis::Fallback(_))
    }

    pub fn findings(&self) -> &AnalysisFindings {
        match self {
            NormalizedAnalysis::Structured(f) | NormalizedAnalysis::Fallback(f) => f,
        }
    }

    pub fn into_findings(self) -> AnalysisFindings {
        match self {
            NormalizedAnalysis::Structured(f) | NormalizedAnalysis::Fallback(f) => f,
        }
    }

    /// Attach the server-assigned disclaimer, language and timestamp.
    pub fn into_result(self, language: Language, timestamp: DateTime<Utc>) -> AnalysisResult {
        AnalysisResult::from_findings(self.into_findings(), language, timestamp)
    }
}

/// Normalize raw model text. Never fails.
pub fn normalize_analysis(raw: &str) -> NormalizedAnalysis {
    match parse_findings(raw) {
        Ok(findings) => {
            debug!(
                key_findings = findings.key_findings.len(),
                recommendations = findings.recommendations.len(),
                next_steps = findings.next_steps.len(),
                "Parsed structured analysis"
            );
            NormalizedAnalysis::Structured(findings)
        }
        Err(e) => {
            warn!(
                error = %e,
                chars = raw.chars().count(),
                "Model output is not structured, using fallback"
            );
            NormalizedAnalysis::Fallback(fallback_findings(raw))
        }
    }
}

/// Strictly parse the JSON payload, then fill every field leniently.
///
/// The block ends at the first closing fence; if that does not parse, the last
/// closing fence is tried instead.
pub fn parse_findings(raw: &str) -> Result<AnalysisFindings> {
    let value = match serde_json::from_str::<Value>(extract_json_payload(raw)) {
        Ok(value) => value,
        Err(first) => {
            let wider = extract_json_payload_to_last_fence(raw);
            serde_json::from_str(wider).map_err(|_| MedAssistError::Parse(first.to_string()))?
        }
    };

    let Value::Object(map) = value else {
        return Err(MedAssistError::Parse(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    Ok(AnalysisFindings {
        summary: text_field(&map, "summary"),
        key_findings: list_field(&map, "key_findings"),
        recommendations: list_field(&map, "recommendations"),
        next_steps: list_field(&map, "next_steps"),
    })
}

pub fn fallback_findings(raw: &str) -> AnalysisFindings {
    AnalysisFindings {
        summary: truncate_chars(raw, FALLBACK_SUMMARY_CHARS).to_string(),
        key_findings: vec![FALLBACK_KEY_FINDING.to_string()],
        recommendations: vec![FALLBACK_RECOMMENDATION.to_string()],
        next_steps: vec![FALLBACK_NEXT_STEP.to_string()],
    }
}

fn text_field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

fn list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
