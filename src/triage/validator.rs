//! Sanitisation of externally sourced diagnosis responses.
//!
//! Enriches incomplete responses and caps overconfident diagnoses. Only a
//! response without diagnoses is reported invalid.

use crate::models::{DiagnosisResponse, EmergencyLevel};

use super::types::ValidationResult;

/// Confidences above this are treated as unsafe.
pub const SAFETY_CONFIDENCE_THRESHOLD: f32 = 95.0;
/// Value an unsafe confidence is reduced to.
pub const SAFETY_CONFIDENCE_CAP: f32 = 85.0;

pub const NO_DIAGNOSES_WARNING: &str = "No diagnoses provided";

pub const DEFAULT_WARNING_SIGNS: [&str; 3] = [
    "Symptoms significantly worsen or new symptoms develop",
    "High fever, difficulty breathing or severe pain",
    "No improvement within the expected timeframe",
];

pub const DEFAULT_PATIENT_EDUCATION: &str =
    "Follow your healthcare provider's advice, take medications as directed and monitor your \
     symptoms. Seek medical attention if symptoms worsen or you have concerns.";

/// Check a provider response for completeness and safety.
pub fn validate_ai_diagnosis_response(response: &DiagnosisResponse) -> ValidationResult {
    let mut warnings = Vec::new();
    let mut enhanced = response.clone();

    if response.diagnoses.is_empty() {
        warnings.push(NO_DIAGNOSES_WARNING.to_string());
        log_warnings(false, &warnings);
        return ValidationResult {
            is_valid: false,
            warnings,
            enhanced_response: enhanced,
        };
    }

    if enhanced.emergency_level.is_none() {
        enhanced.emergency_level = Some(EmergencyLevel::Routine);
        warnings.push("Emergency level not specified, defaulted to routine".to_string());
    }

    if enhanced.warning_signs.as_ref().map_or(true, |w| w.is_empty()) {
        enhanced.warning_signs = Some(DEFAULT_WARNING_SIGNS.iter().map(|s| s.to_string()).collect());
        warnings.push("Warning signs missing, added generic warning signs".to_string());
    }

    if enhanced
        .patient_education
        .as_deref()
        .map_or(true, |text| text.trim().is_empty())
    {
        enhanced.patient_education = Some(DEFAULT_PATIENT_EDUCATION.to_string());
        warnings.push("Patient education missing, added generic guidance".to_string());
    }

    for diagnosis in &mut enhanced.diagnoses {
        if diagnosis.confidence > SAFETY_CONFIDENCE_THRESHOLD {
            diagnosis.confidence = SAFETY_CONFIDENCE_CAP;
            warnings.push(format!("High confidence reduced for safety: {}", diagnosis.name));
        }
    }

    log_warnings(true, &warnings);

    ValidationResult {
        is_valid: true,
        warnings,
        enhanced_response: enhanced,
    }
}

/// Log validator findings. Warning text only names fields and diagnoses.
fn log_warnings(is_valid: bool, warnings: &[String]) {
    if warnings.is_empty() {
        tracing::debug!("Diagnosis response passed validation unchanged");
        return;
    }
    tracing::warn!(
        is_valid,
        warning_count = warnings.len(),
        warnings = ?warnings,
        "Diagnosis response required sanitisation"
    );
}
