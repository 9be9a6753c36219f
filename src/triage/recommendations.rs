//! Category-specific test recommendations, warning signs and patient
//! education text.

use super::rules::SymptomPattern;
use crate::models::Severity;

/// Appended to every category's warning signs.
pub const GENERIC_WARNING_SIGNS: [&str; 3] = [
    "Symptoms significantly worsen",
    "New symptoms develop",
    "No improvement within the expected timeframe",
];

/// Age at or above which extra screening is suggested.
const OLDER_ADULT_AGE: u32 = 65;
/// Age below which infant guidance is added.
const INFANT_AGE: u32 = 2;

/// Build the detail line for the `test` followup.
pub fn generate_test_recommendations(
    pattern: &SymptomPattern,
    severity: Severity,
    patient_age: Option<u32>,
) -> String {
    let mut tests: Vec<String> = pattern.common_tests.clone();

    if severity == Severity::Severe {
        match pattern.category.as_str() {
            "respiratory" | "infectious" => tests.push("Pulse oximetry".into()),
            "cardiovascular" => tests.push("Electrocardiogram (ECG)".into()),
            "gastrointestinal" => tests.push("Complete blood count (CBC)".into()),
            "neurological" => tests.push("Neuroimaging if headache pattern changes".into()),
            "orthopedic" => tests.push("X-ray of affected area".into()),
            _ => {}
        }
    }

    if patient_age.is_some_and(|age| age >= OLDER_ADULT_AGE) && pattern.category != "orthopedic" {
        tests.push("Basic metabolic panel".into());
    }

    let mut unique: Vec<String> = Vec::with_capacity(tests.len());
    for test in tests {
        if !unique.iter().any(|t| t.eq_ignore_ascii_case(&test)) {
            unique.push(test);
        }
    }

    if unique.is_empty() {
        "Clinical examination; no routine tests required".to_string()
    } else {
        format!("Recommended tests: {}", unique.join(", "))
    }
}

/// Category-specific warning signs followed by the generic ones.
pub fn generate_warning_signs_for_category(category: &str) -> Vec<String> {
    let specific: &[&str] = match category {
        "infectious" => &[
            "Fever above 103°F (39.4°C) or lasting more than 3 days",
            "Difficulty breathing or swallowing",
        ],
        "respiratory" => &[
            "Shortness of breath at rest",
            "Bluish lips or fingertips",
        ],
        "neurological" => &[
            "Sudden severe headache",
            "Weakness, numbness or difficulty speaking",
            "Confusion or loss of consciousness",
        ],
        "gastrointestinal" => &[
            "Blood in vomit or stool",
            "Signs of dehydration such as very little urine",
            "Severe or constant abdominal pain",
        ],
        "orthopedic" => &[
            "Numbness, tingling or coldness below the injury",
            "Visible deformity or bone through the skin",
        ],
        "musculoskeletal" => &[
            "Loss of bladder or bowel control",
            "Numbness or weakness in the legs",
        ],
        "cardiovascular" => &[
            "Chest pain or pressure",
            "Fainting or near-fainting",
        ],
        "urological" => &[
            "Fever with back or flank pain",
            "Blood in urine",
        ],
        "dermatological" => &[
            "Rash spreading rapidly",
            "Signs of infection such as warmth, pus or red streaks",
        ],
        "allergic" => &[
            "Swelling of the lips, tongue or throat",
            "Wheezing or difficulty breathing",
        ],
        "mental_health" => &[
            "Thoughts of self-harm or suicide",
            "Unable to perform daily activities",
        ],
        _ => &[],
    };

    specific
        .iter()
        .chain(GENERIC_WARNING_SIGNS.iter())
        .map(|s| s.to_string())
        .collect()
}

/// Self-care guidance for the pattern's category, with an age note when
/// relevant.
pub fn generate_patient_education(pattern: &SymptomPattern, patient_age: Option<u32>) -> String {
    let mut text = match pattern.category.as_str() {
        "infectious" => "Rest, drink plenty of fluids and wash your hands often to avoid spreading infection. Over-the-counter remedies can ease symptoms; antibiotics do not help viral infections.",
        "respiratory" => "Rest, stay hydrated and avoid smoke or other airway irritants. Use prescribed inhalers as directed and sleep with your head slightly raised.",
        "neurological" => "Rest in a quiet, dark room, stay hydrated and keep regular sleep and meal times. Keep a diary of headaches and possible triggers.",
        "gastrointestinal" => "Take small sips of clear fluids or oral rehydration solution and return to bland food gradually. Avoid alcohol, caffeine and fatty or spicy food.",
        "orthopedic" => "Rest and protect the injured area, apply ice for 15-20 minutes at a time, compress and elevate it. Avoid putting weight on it until assessed.",
        "musculoskeletal" => "Stay gently active, apply heat or ice, and avoid heavy lifting. Gradual stretching helps as pain settles.",
        "cardiovascular" => "Avoid caffeine, alcohol and strenuous exercise until assessed. Note when symptoms occur and how long they last.",
        "urological" => "Drink plenty of water and do not delay urination. Complete any prescribed antibiotic course.",
        "dermatological" => "Avoid the suspected trigger, keep the skin clean and moisturised, and avoid scratching. Cool compresses can relieve itching.",
        "allergic" => "Limit exposure to known allergens, keep windows closed on high-pollen days and consider saline nasal rinses.",
        "mental_health" => "Regular sleep, physical activity and limiting caffeine can help. Talking to someone you trust or a counsellor is a good first step.",
        _ => "Rest, stay hydrated and monitor your symptoms. Seek care if they change or worsen.",
    }
    .to_string();

    match patient_age {
        Some(age) if age < INFANT_AGE => text.push_str(
            " Infants can become unwell quickly; contact your pediatrician early if feeding, breathing or alertness change.",
        ),
        Some(age) if age >= OLDER_ADULT_AGE => text.push_str(
            " Older adults are more prone to complications; review your regular medications with your doctor and seek care sooner if symptoms change.",
        ),
        _ => {}
    }

    text
}

/// Education text when no pattern matches.
pub const NON_SPECIFIC_EDUCATION: &str =
    "Keep a record of your symptoms, when they occur and what makes them better or worse. \
     Rest, stay hydrated and see your doctor if symptoms persist or worsen.";

/// Education text for red-flag emergencies.
pub const EMERGENCY_EDUCATION: &str =
    "These symptoms can indicate a serious condition that needs immediate medical assessment. \
     Do not wait to see whether they improve.";
