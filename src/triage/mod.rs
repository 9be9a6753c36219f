pub mod engine;
pub mod fallback;
pub mod recommendations;
pub mod red_flags;
pub mod request;
pub mod rules;
pub mod scoring;
pub mod types;
pub mod validator;

pub use engine::{generate_symptom_based_triage, TriageEngine};
pub use fallback::{diagnose_with_fallback, DiagnosisProvider};
pub use red_flags::check_red_flag_symptoms;
pub use request::TriageRequest;
pub use rules::{RedFlagSymptom, SymptomPattern, TriageRules};
pub use types::{DiagnosisOutcome, DiagnosisSource, TriageError, ValidationResult};
pub use validator::validate_ai_diagnosis_response;
