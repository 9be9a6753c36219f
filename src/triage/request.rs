//! Triage request shape checks, applied before symptoms reach the engine.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Severity;

use super::types::TriageError;

/// Maximum symptoms accepted per request.
pub const MAX_SYMPTOMS: usize = 32;
/// Maximum characters accepted per symptom.
pub const MAX_SYMPTOM_LENGTH: usize = 200;
/// Maximum characters kept of the free-text duration.
pub const MAX_DURATION_LENGTH: usize = 200;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Symptoms and context submitted for triage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageRequest {
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub duration: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_age: Option<u32>,
}

impl TriageRequest {
    pub fn new(symptoms: Vec<String>, duration: &str, severity: Severity) -> Self {
        Self {
            symptoms,
            duration: duration.to_string(),
            severity,
            patient_age: None,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.patient_age = Some(age);
        self
    }

    /// Clean every symptom and drop blanks and duplicates.
    ///
    /// Oversized requests are rejected rather than cut down, so a phrase
    /// late in the list or late in a long symptom still reaches the
    /// red-flag check. Fails when nothing usable is left.
    pub fn sanitize(&self) -> Result<TriageRequest, TriageError> {
        let mut symptoms: Vec<String> = Vec::with_capacity(self.symptoms.len());

        for raw in &self.symptoms {
            let cleaned = clean_text(raw);
            if cleaned.is_empty() {
                continue;
            }
            let length = cleaned.chars().count();
            if length > MAX_SYMPTOM_LENGTH {
                tracing::warn!(length, max = MAX_SYMPTOM_LENGTH, "Rejecting oversized symptom");
                return Err(TriageError::SymptomTooLong {
                    index: symptoms.len(),
                    length,
                    max: MAX_SYMPTOM_LENGTH,
                });
            }
            if symptoms.iter().any(|s| s.eq_ignore_ascii_case(&cleaned)) {
                continue;
            }
            symptoms.push(cleaned);
        }

        if symptoms.is_empty() {
            return Err(TriageError::EmptySymptoms);
        }

        if symptoms.len() > MAX_SYMPTOMS {
            tracing::warn!(
                count = symptoms.len(),
                max = MAX_SYMPTOMS,
                "Rejecting oversized symptom list"
            );
            return Err(TriageError::TooManySymptoms {
                count: symptoms.len(),
                max: MAX_SYMPTOMS,
            });
        }

        Ok(TriageRequest {
            symptoms,
            duration: clean_text(&self.duration)
                .chars()
                .take(MAX_DURATION_LENGTH)
                .collect::<String>()
                .trim_end()
                .to_string(),
            severity: self.severity,
            patient_age: self.patient_age,
        })
    }
}

/// Strip invisible and control characters and collapse whitespace.
fn clean_text(raw: &str) -> String {
    let visible: String = raw
        .chars()
        .filter(|c| !is_invisible(*c) && (!c.is_control() || c.is_whitespace()))
        .collect();
    WHITESPACE_RE.replace_all(visible.trim(), " ").into_owned()
}

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{FEFF}'
            | '\u{00AD}'
    )
}
