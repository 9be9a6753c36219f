//! Provider-first diagnosis with symptom triage as the fallback.
//!
//! The provider answer is served when it validates. Provider errors and
//! responses without diagnoses fall back to the rule engine. Red flags are
//! checked against the symptoms regardless of source; the provider is not
//! trusted to rate emergencies lower than the rule table does.

use chrono::Local;
use uuid::Uuid;

use crate::models::{DiagnosisResponse, EmergencyLevel, FollowupType};

use super::engine::{immediate_care_followup, TriageEngine};
use super::request::TriageRequest;
use super::types::{DiagnosisOutcome, DiagnosisSource, TriageError};
use super::validator::validate_ai_diagnosis_response;

/// External diagnosis source, e.g. a hosted LLM.
pub trait DiagnosisProvider {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    fn diagnose(&self, request: &TriageRequest) -> Result<DiagnosisResponse, TriageError>;
}

/// Diagnose a request, preferring the provider when one is configured.
///
/// Errors when the request has no usable symptoms or exceeds the request
/// limits.
pub fn diagnose_with_fallback(
    provider: Option<&dyn DiagnosisProvider>,
    engine: &TriageEngine<'_>,
    request: &TriageRequest,
) -> Result<DiagnosisOutcome, TriageError> {
    let request = request.sanitize()?;

    if let Some(provider) = provider {
        match provider.diagnose(&request) {
            Ok(response) => {
                let validation = validate_ai_diagnosis_response(&response);
                if validation.is_valid {
                    let mut warnings = validation.warnings;
                    let mut response = validation.enhanced_response;
                    escalate_red_flags(engine, &request, &mut response, &mut warnings);
                    return Ok(outcome(DiagnosisSource::AiProvider, response, warnings));
                }
                tracing::warn!(
                    provider = provider.name(),
                    warnings = ?validation.warnings,
                    "Provider response invalid, falling back to symptom triage"
                );
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %e,
                    "Provider failed, falling back to symptom triage"
                );
            }
        }
    }

    let response = engine.generate_symptom_based_triage(
        &request.symptoms,
        &request.duration,
        request.severity,
        request.patient_age,
    );
    let validation = validate_ai_diagnosis_response(&response);
    Ok(outcome(
        DiagnosisSource::SymptomTriage,
        validation.enhanced_response,
        validation.warnings,
    ))
}

/// Raise a provider response to the red-flag level when it rates the
/// symptoms as less urgent, and make sure it tells the patient what to do.
fn escalate_red_flags(
    engine: &TriageEngine<'_>,
    request: &TriageRequest,
    response: &mut DiagnosisResponse,
    warnings: &mut Vec<String>,
) {
    let flags = engine.check_red_flag_symptoms(&request.symptoms);
    let Some(first) = flags.first() else {
        return;
    };

    let flagged_level = EmergencyLevel::from(first.urgency);
    let current = response.emergency_level.unwrap_or(EmergencyLevel::Routine);
    if urgency_rank(flagged_level) > urgency_rank(current) {
        response.emergency_level = Some(flagged_level);
        warnings.push(format!("Emergency level raised for red flag: {}", first.condition));
        tracing::warn!(
            condition = %first.condition,
            from = current.as_str(),
            to = flagged_level.as_str(),
            "Provider emergency level escalated"
        );
    }

    if !response
        .followups
        .iter()
        .any(|f| f.kind == FollowupType::ImmediateCare)
    {
        response.followups.insert(0, immediate_care_followup(first));
        warnings.push(format!("Immediate care step added for red flag: {}", first.condition));
    }

    let red_flags = response.red_flags.get_or_insert_with(Vec::new);
    for flag in &flags {
        if !red_flags.contains(&flag.condition) {
            red_flags.push(flag.condition.clone());
        }
    }
}

fn urgency_rank(level: EmergencyLevel) -> u8 {
    match level {
        EmergencyLevel::Routine => 0,
        EmergencyLevel::Urgent => 1,
        EmergencyLevel::Immediate => 2,
    }
}

fn outcome(
    source: DiagnosisSource,
    response: DiagnosisResponse,
    warnings: Vec<String>,
) -> DiagnosisOutcome {
    tracing::info!(
        source = source.as_str(),
        diagnoses = response.diagnoses.len(),
        warnings = warnings.len(),
        "Diagnosis ready"
    );
    DiagnosisOutcome {
        id: Uuid::new_v4(),
        source,
        generated_at: Local::now().naive_local(),
        response,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::models::{DiagnosisEntry, Followup, FollowupUrgency, Severity};
    use crate::triage::request::MAX_SYMPTOMS;

    struct StubProvider {
        result: Result<DiagnosisResponse, String>,
        calls: Cell<usize>,
    }

    impl StubProvider {
        fn ok(response: DiagnosisResponse) -> Self {
            Self { result: Ok(response), calls: Cell::new(0) }
        }

        fn failing() -> Self {
            Self { result: Err("timeout".into()), calls: Cell::new(0) }
        }
    }

    impl DiagnosisProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn diagnose(&self, _request: &TriageRequest) -> Result<DiagnosisResponse, TriageError> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone().map_err(TriageError::Provider)
        }
    }

    fn provider_response(name: &str, confidence: f32) -> DiagnosisResponse {
        DiagnosisResponse {
            diagnoses: vec![DiagnosisEntry {
                name: name.into(),
                confidence,
                reasoning: "model reasoning".into(),
                category: None,
            }],
            ..Default::default()
        }
    }

    fn cold_request() -> TriageRequest {
        TriageRequest::new(
            vec!["cough".into(), "runny nose".into(), "sore throat".into()],
            "3 days",
            Severity::Moderate,
        )
    }

    #[test]
    fn valid_provider_response_is_served() {
        let provider = StubProvider::ok(provider_response("Viral URI", 98.0));
        let engine = TriageEngine::builtin();
        let outcome = diagnose_with_fallback(Some(&provider), &engine, &cold_request()).unwrap();

        assert_eq!(outcome.source, DiagnosisSource::AiProvider);
        assert_eq!(outcome.response.diagnoses[0].name, "Viral URI");
        assert_eq!(outcome.response.diagnoses[0].confidence, 85.0);
        assert!(outcome.warnings.iter().any(|w| w.contains("Viral URI")));
        assert_eq!(provider.calls.get(), 1);
    }

    #[test]
    fn provider_error_falls_back_to_triage() {
        let provider = StubProvider::failing();
        let engine = TriageEngine::builtin();
        let outcome = diagnose_with_fallback(Some(&provider), &engine, &cold_request()).unwrap();

        assert_eq!(outcome.source, DiagnosisSource::SymptomTriage);
        assert!(outcome.response.diagnoses[0].name.contains("Upper Respiratory"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn provider_without_diagnoses_falls_back() {
        let provider = StubProvider::ok(DiagnosisResponse::default());
        let engine = TriageEngine::builtin();
        let outcome = diagnose_with_fallback(Some(&provider), &engine, &cold_request()).unwrap();
        assert_eq!(outcome.source, DiagnosisSource::SymptomTriage);
    }

    #[test]
    fn no_provider_uses_triage() {
        let engine = TriageEngine::builtin();
        let outcome = diagnose_with_fallback(None, &engine, &cold_request()).unwrap();
        assert_eq!(outcome.source, DiagnosisSource::SymptomTriage);
    }

    #[test]
    fn empty_request_errors_before_provider_call() {
        let provider = StubProvider::ok(provider_response("X", 50.0));
        let engine = TriageEngine::builtin();
        let request = TriageRequest::new(vec!["  ".into()], "", Severity::Mild);
        let err = diagnose_with_fallback(Some(&provider), &engine, &request).unwrap_err();
        assert!(matches!(err, TriageError::EmptySymptoms));
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn red_flags_escalate_provider_response() {
        let provider = StubProvider::ok(provider_response("Heartburn", 60.0));
        let engine = TriageEngine::builtin();
        let request = TriageRequest::new(vec!["chest pain".into()], "1 hour", Severity::Severe);
        let outcome = diagnose_with_fallback(Some(&provider), &engine, &request).unwrap();

        assert_eq!(outcome.source, DiagnosisSource::AiProvider);
        assert_eq!(outcome.response.emergency_level, Some(EmergencyLevel::Immediate));
        assert_eq!(outcome.response.red_flags.as_ref().unwrap().len(), 1);
        assert!(outcome.warnings.iter().any(|w| w.starts_with("Emergency level raised")));
    }

    #[test]
    fn red_flags_prepend_immediate_care_step() {
        let mut response = provider_response("Heartburn", 60.0);
        response.followups.push(Followup {
            kind: FollowupType::Followup,
            detail: "See your GP".into(),
            urgency: FollowupUrgency::Low,
            timeframe: "1 week".into(),
            rationale: String::new(),
        });
        let provider = StubProvider::ok(response);
        let engine = TriageEngine::builtin();
        let request = TriageRequest::new(vec!["chest pain".into()], "1 hour", Severity::Severe);
        let outcome = diagnose_with_fallback(Some(&provider), &engine, &request).unwrap();

        let followups = &outcome.response.followups;
        assert_eq!(followups.len(), 2);
        assert_eq!(followups[0].kind, FollowupType::ImmediateCare);
        assert_eq!(followups[0].urgency, FollowupUrgency::Immediate);
        assert!(followups[0].detail.contains("911"));
        assert_eq!(followups[1].detail, "See your GP");
    }

    #[test]
    fn existing_immediate_care_step_is_kept() {
        let mut response = provider_response("Acute MI", 90.0);
        response.followups.push(Followup {
            kind: FollowupType::ImmediateCare,
            detail: "Go to the emergency department".into(),
            urgency: FollowupUrgency::Immediate,
            timeframe: "Now".into(),
            rationale: String::new(),
        });
        let provider = StubProvider::ok(response);
        let engine = TriageEngine::builtin();
        let request = TriageRequest::new(vec!["chest pain".into()], "1 hour", Severity::Severe);
        let outcome = diagnose_with_fallback(Some(&provider), &engine, &request).unwrap();

        assert_eq!(outcome.response.followups.len(), 1);
        assert_eq!(outcome.response.followups[0].detail, "Go to the emergency department");
    }

    #[test]
    fn red_flag_past_symptom_limit_is_never_served_as_routine() {
        let mut symptoms: Vec<String> = (0..MAX_SYMPTOMS).map(|i| format!("filler {i}")).collect();
        symptoms.push("chest pain".into());
        let request = TriageRequest::new(symptoms, "1 hour", Severity::Severe);
        let provider = StubProvider::ok(provider_response("X", 50.0));
        let engine = TriageEngine::builtin();

        let err = diagnose_with_fallback(Some(&provider), &engine, &request).unwrap_err();
        assert!(matches!(err, TriageError::TooManySymptoms { .. }));
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn red_flag_past_length_limit_is_never_served_as_routine() {
        let long = format!("{} then chest pain", "x".repeat(200));
        let request = TriageRequest::new(vec![long], "1 hour", Severity::Severe);
        let engine = TriageEngine::builtin();

        let err = diagnose_with_fallback(None, &engine, &request).unwrap_err();
        assert!(matches!(err, TriageError::SymptomTooLong { .. }));
    }

    #[test]
    fn provider_already_immediate_is_not_downgraded() {
        let mut response = provider_response("Acute MI", 90.0);
        response.emergency_level = Some(EmergencyLevel::Immediate);
        let provider = StubProvider::ok(response);
        let engine = TriageEngine::builtin();
        let request = TriageRequest::new(vec!["vomiting blood".into()], "1 hour", Severity::Severe);
        let outcome = diagnose_with_fallback(Some(&provider), &engine, &request).unwrap();

        assert_eq!(outcome.response.emergency_level, Some(EmergencyLevel::Immediate));
        assert!(!outcome.warnings.iter().any(|w| w.starts_with("Emergency level raised")));
    }
}
