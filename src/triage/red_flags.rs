//! Emergency red-flag detection.
//!
//! Scans reported symptoms against the red-flag table. Results follow
//! table order, one hit per entry.

use super::rules::RedFlagSymptom;

/// Phrases this short only match a symptom exactly.
const MIN_CONTAINED_PHRASE_LEN: usize = 3;

/// Lower-case and trim every symptom.
pub fn normalize_symptoms<S: AsRef<str>>(symptoms: &[S]) -> Vec<String> {
    symptoms
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .collect()
}

/// Return every red-flag entry triggered by the symptoms, in table order.
pub fn check_red_flag_symptoms<'a, S: AsRef<str>>(
    symptoms: &[S],
    table: &'a [RedFlagSymptom],
) -> Vec<&'a RedFlagSymptom> {
    if symptoms.is_empty() {
        return Vec::new();
    }

    let normalized = normalize_symptoms(symptoms);
    let joined = normalized.join(" ");

    let flags: Vec<&RedFlagSymptom> = table
        .iter()
        .filter(|flag| {
            flag.symptom
                .iter()
                .any(|phrase| phrase_matches(&phrase.to_lowercase(), &normalized, &joined))
        })
        .collect();

    if !flags.is_empty() {
        tracing::warn!(
            count = flags.len(),
            conditions = ?flags.iter().map(|f| f.condition.as_str()).collect::<Vec<_>>(),
            "Red flag symptoms detected"
        );
    }

    flags
}

fn phrase_matches(phrase: &str, normalized: &[String], joined: &str) -> bool {
    let in_single_symptom = normalized.iter().any(|symptom| {
        symptom == phrase || (phrase.len() > MIN_CONTAINED_PHRASE_LEN && symptom.contains(phrase))
    });

    // Multi-word phrases may span symptom boundaries.
    in_single_symptom || (phrase.contains(' ') && joined.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RedFlagUrgency;
    use crate::triage::rules::TriageRules;

    fn table() -> &'static [RedFlagSymptom] {
        &TriageRules::builtin().red_flags
    }

    fn flag(phrases: &[&str], condition: &str, urgency: RedFlagUrgency) -> RedFlagSymptom {
        RedFlagSymptom {
            symptom: phrases.iter().map(|s| s.to_string()).collect(),
            condition: condition.into(),
            urgency,
            action: "act".into(),
        }
    }

    #[test]
    fn exact_phrase_is_flagged() {
        let flags = check_red_flag_symptoms(&["chest pain"], table());
        assert_eq!(flags.len(), 1);
        assert!(flags[0].condition.contains("coronary"));
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let flags = check_red_flag_symptoms(&["  Slurred Speech "], table());
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].condition, "Possible stroke");
    }

    #[test]
    fn phrase_contained_in_longer_symptom() {
        let flags = check_red_flag_symptoms(&["sharp chest pain since morning"], table());
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn benign_symptoms_are_not_flagged() {
        let flags = check_red_flag_symptoms(&["mild headache", "runny nose", "cough"], table());
        assert!(flags.is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        let empty: [&str; 0] = [];
        assert!(check_red_flag_symptoms(&empty, table()).is_empty());
    }

    #[test]
    fn multi_word_phrase_spans_symptoms() {
        let table = vec![flag(&["fever and stiff neck"], "Meningitis", RedFlagUrgency::Urgent)];
        let flags = check_red_flag_symptoms(&["fever and", "stiff neck"], &table);
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn short_phrase_needs_exact_match() {
        let table = vec![flag(&["flu"], "Short", RedFlagUrgency::Urgent)];
        assert!(check_red_flag_symptoms(&["influenza"], &table).is_empty());
        assert_eq!(check_red_flag_symptoms(&["FLU"], &table).len(), 1);
    }

    #[test]
    fn multiple_flags_follow_table_order() {
        let flags = check_red_flag_symptoms(&["passed out", "chest pain"], table());
        assert_eq!(flags.len(), 2);
        assert!(flags[0].condition.contains("coronary"));
        assert_eq!(flags[1].condition, "Loss of consciousness or seizure");
    }

    #[test]
    fn one_hit_per_entry() {
        let flags = check_red_flag_symptoms(&["chest pain", "chest pressure", "crushing pressure"], table());
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn every_table_phrase_flags_its_entry() {
        for entry in table() {
            for phrase in &entry.symptom {
                let flags = check_red_flag_symptoms(&[phrase.as_str()], table());
                assert!(
                    flags.iter().any(|f| f.condition == entry.condition),
                    "phrase {phrase} did not flag {}",
                    entry.condition
                );
            }
        }
    }
}
