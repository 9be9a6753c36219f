use crate::models::{
    DiagnosisEntry, DiagnosisResponse, EmergencyLevel, Followup, FollowupType, FollowupUrgency,
    RedFlagUrgency, Severity,
};

use super::recommendations::{
    generate_patient_education, generate_test_recommendations,
    generate_warning_signs_for_category, EMERGENCY_EDUCATION, NON_SPECIFIC_EDUCATION,
};
use super::red_flags::{check_red_flag_symptoms, normalize_symptoms};
use super::rules::{RedFlagSymptom, TriageRules};
use super::scoring::{rank_patterns, PatternScore, MIN_CONFIDENCE};
use super::validator::validate_ai_diagnosis_response;
use super::types::ValidationResult;

/// Confidence reported for red-flag emergencies.
pub const EMERGENCY_CONFIDENCE: f32 = 95.0;

const NON_SPECIFIC_DIAGNOSIS: &str = "Non-specific symptoms requiring clinical evaluation";

/// Rule-based triage over a set of rule tables.
#[derive(Debug, Clone, Copy)]
pub struct TriageEngine<'r> {
    rules: &'r TriageRules,
}

impl TriageEngine<'static> {
    /// Engine over the bundled tables.
    pub fn builtin() -> Self {
        Self::new(TriageRules::builtin())
    }
}

impl<'r> TriageEngine<'r> {
    pub fn new(rules: &'r TriageRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'r TriageRules {
        self.rules
    }

    pub fn check_red_flag_symptoms<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<&'r RedFlagSymptom> {
        check_red_flag_symptoms(symptoms, &self.rules.red_flags)
    }

    pub fn validate_ai_diagnosis_response(&self, response: &DiagnosisResponse) -> ValidationResult {
        validate_ai_diagnosis_response(response)
    }

    /// Produce a provisional diagnosis from symptoms alone.
    ///
    /// Red flags win outright. Otherwise the best-scoring pattern is used,
    /// or a low-confidence non-specific response when nothing qualifies.
    pub fn generate_symptom_based_triage<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        duration: &str,
        severity: Severity,
        patient_age: Option<u32>,
    ) -> DiagnosisResponse {
        let flags = self.check_red_flag_symptoms(symptoms);
        if let Some(first) = flags.first() {
            return emergency_response(first, &flags);
        }

        let normalized = normalize_symptoms(symptoms);
        let ranked = rank_patterns(&self.rules.patterns, &normalized);

        match ranked.first() {
            Some(top) => {
                tracing::debug!(
                    diagnosis = %top.pattern.diagnosis,
                    category = %top.pattern.category,
                    final_score = top.final_score,
                    candidates = ranked.len(),
                    "Symptom pattern selected"
                );
                pattern_response(top, &normalized, duration, severity, patient_age)
            }
            None => {
                tracing::info!(
                    symptom_count = normalized.len(),
                    "No symptom pattern qualified, returning non-specific triage"
                );
                non_specific_response(duration, severity)
            }
        }
    }
}

/// Red-flag emergency from the first flag in table order.
fn emergency_response(first: &RedFlagSymptom, flags: &[&RedFlagSymptom]) -> DiagnosisResponse {
    DiagnosisResponse {
        emergency_level: Some(EmergencyLevel::from(first.urgency)),
        red_flags: Some(flags.iter().map(|f| f.condition.clone()).collect()),
        diagnoses: vec![DiagnosisEntry {
            name: first.condition.clone(),
            confidence: EMERGENCY_CONFIDENCE,
            reasoning: format!(
                "Red flag symptoms detected that may indicate {}. Emergency evaluation is required.",
                first.condition.to_lowercase()
            ),
            category: Some("emergency".into()),
        }],
        followups: vec![immediate_care_followup(first)],
        warning_signs: Some(vec![
            "Any worsening of current symptoms".into(),
            "Loss of consciousness or inability to stay awake".into(),
        ]),
        patient_education: Some(EMERGENCY_EDUCATION.into()),
    }
}

/// `immediate_care` step carrying the flag's action text.
pub(crate) fn immediate_care_followup(flag: &RedFlagSymptom) -> Followup {
    let urgency = match flag.urgency {
        RedFlagUrgency::Immediate => FollowupUrgency::Immediate,
        RedFlagUrgency::Urgent => FollowupUrgency::High,
    };
    Followup {
        kind: FollowupType::ImmediateCare,
        detail: flag.action.clone(),
        urgency,
        timeframe: "Immediately".into(),
        rationale: "Potentially life-threatening condition requires immediate evaluation".into(),
    }
}

fn pattern_response(
    top: &PatternScore<'_>,
    normalized: &[String],
    duration: &str,
    severity: Severity,
    patient_age: Option<u32>,
) -> DiagnosisResponse {
    let pattern = top.pattern;
    let urgency = FollowupUrgency::from(severity);

    let emergency_level = if pattern.category == "orthopedic"
        && normalized.iter().any(|s| s.contains("fracture"))
    {
        EmergencyLevel::Urgent
    } else {
        EmergencyLevel::Routine
    };

    DiagnosisResponse {
        emergency_level: Some(emergency_level),
        red_flags: None,
        diagnoses: vec![DiagnosisEntry {
            name: pattern.diagnosis.clone(),
            confidence: top.confidence(),
            reasoning: pattern.reasoning.clone(),
            category: Some(pattern.category.clone()),
        }],
        followups: vec![
            Followup {
                kind: FollowupType::Followup,
                detail: format!("Follow up with your doctor about {}", pattern.diagnosis),
                urgency,
                timeframe: pattern.followup_timeframe.clone(),
                rationale: format!(
                    "Monitor {} severity symptoms reported over {}",
                    severity,
                    duration_or_unknown(duration)
                ),
            },
            Followup {
                kind: FollowupType::Test,
                detail: generate_test_recommendations(pattern, severity, patient_age),
                urgency,
                timeframe: "At follow-up visit".into(),
                rationale: "Confirm the provisional diagnosis and rule out alternatives".into(),
            },
        ],
        warning_signs: Some(generate_warning_signs_for_category(&pattern.category)),
        patient_education: Some(generate_patient_education(pattern, patient_age)),
    }
}

fn non_specific_response(duration: &str, severity: Severity) -> DiagnosisResponse {
    DiagnosisResponse {
        emergency_level: Some(EmergencyLevel::Routine),
        red_flags: None,
        diagnoses: vec![DiagnosisEntry {
            name: NON_SPECIFIC_DIAGNOSIS.into(),
            confidence: MIN_CONFIDENCE,
            reasoning: "The reported symptoms do not match a recognised pattern closely enough \
                        for a provisional diagnosis."
                .into(),
            category: Some("general".into()),
        }],
        followups: vec![Followup {
            kind: FollowupType::Followup,
            detail: "Schedule an appointment for a clinical evaluation".into(),
            urgency: FollowupUrgency::Low,
            timeframe: "1-2 weeks".into(),
            rationale: format!(
                "{} symptoms reported over {} need an in-person assessment",
                severity,
                duration_or_unknown(duration)
            ),
        }],
        warning_signs: Some(generate_warning_signs_for_category("general")),
        patient_education: Some(NON_SPECIFIC_EDUCATION.into()),
    }
}

fn duration_or_unknown(duration: &str) -> &str {
    let trimmed = duration.trim();
    if trimmed.is_empty() {
        "an unspecified period"
    } else {
        trimmed
    }
}

/// Triage with the bundled rule tables.
pub fn generate_symptom_based_triage<S: AsRef<str>>(
    symptoms: &[S],
    duration: &str,
    severity: Severity,
    patient_age: Option<u32>,
) -> DiagnosisResponse {
    TriageEngine::builtin().generate_symptom_based_triage(symptoms, duration, severity, patient_age)
}
