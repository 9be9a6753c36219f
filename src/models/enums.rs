use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::triage::types::TriageError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Wire names are the `as_str` values.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = TriageError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(TriageError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Severity {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

str_enum!(EmergencyLevel {
    Immediate => "immediate",
    Urgent => "urgent",
    Routine => "routine",
});

str_enum!(RedFlagUrgency {
    Immediate => "immediate",
    Urgent => "urgent",
});

str_enum!(FollowupUrgency {
    Immediate => "immediate",
    High => "high",
    Medium => "medium",
    Low => "low",
});

impl From<RedFlagUrgency> for EmergencyLevel {
    fn from(urgency: RedFlagUrgency) -> Self {
        match urgency {
            RedFlagUrgency::Immediate => Self::Immediate,
            RedFlagUrgency::Urgent => Self::Urgent,
        }
    }
}

impl From<Severity> for FollowupUrgency {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Severe => Self::High,
            Severity::Mild => Self::Low,
            Severity::Moderate => Self::Medium,
        }
    }
}

/// Kind of recommended next step. Provider responses may carry kinds this
/// crate does not know; those land in `Other` with the raw wire name kept,
/// so re-serializing a provider response does not rewrite it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FollowupType {
    Followup,
    Test,
    ImmediateCare,
    Referral,
    Other(String),
}

impl FollowupType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Followup => "followup",
            Self::Test => "test",
            Self::ImmediateCare => "immediate_care",
            Self::Referral => "referral",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for FollowupType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "followup" => Self::Followup,
            "test" => Self::Test,
            "immediate_care" => Self::ImmediateCare,
            "referral" => Self::Referral,
            _ => Self::Other(raw),
        }
    }
}

impl Serialize for FollowupType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FollowupType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_round_trip() {
        for (variant, s) in [
            (Severity::Mild, "mild"),
            (Severity::Moderate, "moderate"),
            (Severity::Severe, "severe"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Severity::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn severity_parse_is_case_insensitive() {
        assert_eq!(Severity::from_str(" Severe ").unwrap(), Severity::Severe);
    }

    #[test]
    fn invalid_enum_value_errors() {
        let err = EmergencyLevel::from_str("whenever").unwrap_err();
        assert!(err.to_string().contains("whenever"));
    }

    #[test]
    fn emergency_level_serializes_lowercase() {
        let json = serde_json::to_string(&EmergencyLevel::Immediate).unwrap();
        assert_eq!(json, "\"immediate\"");
    }

    #[test]
    fn red_flag_urgency_maps_to_emergency_level() {
        assert_eq!(EmergencyLevel::from(RedFlagUrgency::Immediate), EmergencyLevel::Immediate);
        assert_eq!(EmergencyLevel::from(RedFlagUrgency::Urgent), EmergencyLevel::Urgent);
    }

    #[test]
    fn severity_maps_to_followup_urgency() {
        assert_eq!(FollowupUrgency::from(Severity::Severe), FollowupUrgency::High);
        assert_eq!(FollowupUrgency::from(Severity::Moderate), FollowupUrgency::Medium);
        assert_eq!(FollowupUrgency::from(Severity::Mild), FollowupUrgency::Low);
    }

    #[test]
    fn followup_type_wire_names() {
        let json = serde_json::to_string(&FollowupType::ImmediateCare).unwrap();
        assert_eq!(json, "\"immediate_care\"");
        assert_eq!(FollowupType::ImmediateCare.as_str(), "immediate_care");
    }

    #[test]
    fn unknown_followup_type_keeps_raw_name() {
        let parsed: FollowupType = serde_json::from_str("\"lifestyle\"").unwrap();
        assert_eq!(parsed, FollowupType::Other("lifestyle".into()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"lifestyle\"");
    }

    #[test]
    fn known_followup_types_parse_to_variants() {
        let parsed: FollowupType = serde_json::from_str("\"referral\"").unwrap();
        assert_eq!(parsed, FollowupType::Referral);
    }
}
