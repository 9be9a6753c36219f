pub mod diagnosis;
pub mod enums;

pub use diagnosis::{DiagnosisEntry, DiagnosisResponse, Followup};
pub use enums::{EmergencyLevel, FollowupType, FollowupUrgency, RedFlagUrgency, Severity};
