use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::DiagnosisResponse;

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// Outcome of sanitising an externally sourced diagnosis response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// False only when the response carries no diagnoses at all.
    pub is_valid: bool,
    /// One entry per field that was filled in or downgraded.
    pub warnings: Vec<String>,
    /// The response with defaults applied and confidences capped.
    pub enhanced_response: DiagnosisResponse,
}

// ---------------------------------------------------------------------------
// DiagnosisOutcome
// ---------------------------------------------------------------------------

/// Where the served diagnosis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisSource {
    AiProvider,
    SymptomTriage,
}

impl DiagnosisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiProvider => "ai_provider",
            Self::SymptomTriage => "symptom_triage",
        }
    }
}

/// A validated diagnosis ready to hand to the API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisOutcome {
    pub id: Uuid,
    pub source: DiagnosisSource,
    pub generated_at: NaiveDateTime,
    pub response: DiagnosisResponse,
    /// Validator warnings for the served response.
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// TriageError
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Reference data load failed ({0}): {1}")]
    ReferenceDataLoad(String, String),

    #[error("Reference data parse failed ({0}): {1}")]
    ReferenceDataParse(String, String),

    #[error("Invalid rule in {table} #{index}: {reason}")]
    InvalidRule {
        table: &'static str,
        index: usize,
        reason: String,
    },

    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("No symptoms provided")]
    EmptySymptoms,

    #[error("Too many symptoms: {count} (max {max})")]
    TooManySymptoms { count: usize, max: usize },

    #[error("Symptom #{index} too long: {length} characters (max {max})")]
    SymptomTooLong {
        index: usize,
        length: usize,
        max: usize,
    },

    #[error("Diagnosis provider failed: {0}")]
    Provider(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
