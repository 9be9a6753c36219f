use serde::{Deserialize, Serialize};

use super::enums::{EmergencyLevel, FollowupType, FollowupUrgency};

/// Diagnosis-and-followup payload shared by the triage engine and the
/// external AI provider.
///
/// Optional fields stay optional on the wire: a provider may omit them and
/// the validator fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DiagnosisResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_level: Option<EmergencyLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_flags: Option<Vec<String>>,
    #[serde(default)]
    pub diagnoses: Vec<DiagnosisEntry>,
    #[serde(default)]
    pub followups: Vec<Followup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_signs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_education: Option<String>,
}

impl DiagnosisResponse {
    /// Highest-ranked diagnosis, if any.
    pub fn primary(&self) -> Option<&DiagnosisEntry> {
        self.diagnoses.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisEntry {
    pub name: String,
    /// Percentage, 0–100.
    pub confidence: f32,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Followup {
    #[serde(rename = "type")]
    pub kind: FollowupType,
    pub detail: String,
    pub urgency: FollowupUrgency,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub rationale: String,
}
