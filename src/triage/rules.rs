use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::types::TriageError;
use crate::models::RedFlagUrgency;

pub const RED_FLAGS_FILE: &str = "red_flags.json";
pub const SYMPTOM_PATTERNS_FILE: &str = "symptom_patterns.json";

static BUNDLED_RED_FLAGS: &str = include_str!("../../resources/red_flags.json");
static BUNDLED_SYMPTOM_PATTERNS: &str = include_str!("../../resources/symptom_patterns.json");

/// An emergency symptom phrase group (loaded from red_flags.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlagSymptom {
    /// Alternate phrasings of the same emergency symptom.
    pub symptom: Vec<String>,
    pub condition: String,
    pub urgency: RedFlagUrgency,
    pub action: String,
}

/// Keyword-tagged candidate diagnosis (loaded from symptom_patterns.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomPattern {
    pub keywords: Vec<String>,
    pub diagnosis: String,
    /// Base score, 0–100.
    pub confidence: u8,
    pub category: String,
    pub reasoning: String,
    pub common_tests: Vec<String>,
    pub followup_timeframe: String,
}

/// Immutable rule tables for the triage engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TriageRules {
    pub red_flags: Vec<RedFlagSymptom>,
    pub patterns: Vec<SymptomPattern>,
}

static BUILTIN_RULES: LazyLock<TriageRules> = LazyLock::new(|| {
    TriageRules::from_json(BUNDLED_RED_FLAGS, BUNDLED_SYMPTOM_PATTERNS)
        .expect("bundled triage rules are valid")
});

impl TriageRules {
    /// Process-wide tables compiled into the binary.
    pub fn builtin() -> &'static TriageRules {
        &BUILTIN_RULES
    }

    /// Tables from `dir` when given, else the bundled ones.
    pub fn resolve(dir: Option<&Path>) -> Result<Cow<'static, TriageRules>, TriageError> {
        match dir {
            Some(dir) => Self::load(dir).map(Cow::Owned),
            None => Ok(Cow::Borrowed(Self::builtin())),
        }
    }

    /// Load rule tables from a directory holding red_flags.json and
    /// symptom_patterns.json.
    pub fn load(resources_dir: &Path) -> Result<Self, TriageError> {
        let flags_path = resources_dir.join(RED_FLAGS_FILE);
        let patterns_path = resources_dir.join(SYMPTOM_PATTERNS_FILE);

        let flags_json = std::fs::read_to_string(&flags_path).map_err(|e| {
            TriageError::ReferenceDataLoad(flags_path.display().to_string(), e.to_string())
        })?;
        let patterns_json = std::fs::read_to_string(&patterns_path).map_err(|e| {
            TriageError::ReferenceDataLoad(patterns_path.display().to_string(), e.to_string())
        })?;

        let rules = Self::from_json(&flags_json, &patterns_json)?;
        tracing::info!(
            red_flags = rules.red_flags.len(),
            patterns = rules.patterns.len(),
            dir = %resources_dir.display(),
            "Loaded triage rules"
        );
        Ok(rules)
    }

    /// Parse and validate both tables from JSON text.
    pub fn from_json(red_flags_json: &str, patterns_json: &str) -> Result<Self, TriageError> {
        let red_flags: Vec<RedFlagSymptom> = serde_json::from_str(red_flags_json)
            .map_err(|e| TriageError::ReferenceDataParse(RED_FLAGS_FILE.into(), e.to_string()))?;
        let patterns: Vec<SymptomPattern> = serde_json::from_str(patterns_json).map_err(|e| {
            TriageError::ReferenceDataParse(SYMPTOM_PATTERNS_FILE.into(), e.to_string())
        })?;

        Self::new(red_flags, patterns)
    }

    /// Build tables from already-parsed rules, rejecting unusable entries.
    pub fn new(
        red_flags: Vec<RedFlagSymptom>,
        patterns: Vec<SymptomPattern>,
    ) -> Result<Self, TriageError> {
        for (index, flag) in red_flags.iter().enumerate() {
            if flag.symptom.is_empty() {
                return Err(invalid("red_flags", index, "no symptom phrases"));
            }
            if flag.symptom.iter().any(|s| s.trim().is_empty()) {
                return Err(invalid("red_flags", index, "blank symptom phrase"));
            }
            if flag.condition.trim().is_empty() {
                return Err(invalid("red_flags", index, "blank condition"));
            }
        }

        for (index, pattern) in patterns.iter().enumerate() {
            if pattern.keywords.is_empty() {
                return Err(invalid("symptom_patterns", index, "no keywords"));
            }
            if pattern.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(invalid("symptom_patterns", index, "blank keyword"));
            }
            if pattern.confidence > 100 {
                return Err(invalid(
                    "symptom_patterns",
                    index,
                    &format!("confidence {} outside 0-100", pattern.confidence),
                ));
            }
        }

        Ok(Self {
            red_flags,
            patterns,
        })
    }
}

fn invalid(table: &'static str, index: usize, reason: &str) -> TriageError {
    TriageError::InvalidRule {
        table,
        index,
        reason: reason.to_string(),
    }
}
