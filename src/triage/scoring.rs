//! Keyword scoring of symptom patterns.
//!
//! Weights and length thresholds are a fixed rubric; changing them changes
//! which diagnosis wins.

use super::rules::SymptomPattern;

const EXACT_MATCH_SCORE: u32 = 3;
const EXACT_SPECIFICITY: u32 = 3;
const CONTAINS_MATCH_SCORE: u32 = 2;
const CONTAINS_SPECIFICITY: u32 = 1;
const REVERSE_MATCH_SCORE: u32 = 1;
const MULTI_WORD_SPECIFICITY: u32 = 2;

/// Keyword must be longer than this to match inside a symptom.
const MIN_CONTAINED_KEYWORD_LEN: usize = 4;
/// Keyword must be longer than this to contain a symptom.
const MIN_REVERSE_KEYWORD_LEN: usize = 6;

const MIN_MATCH_PERCENTAGE: f64 = 0.2;
const MIN_SPECIFICITY: u32 = 3;

pub const MIN_CONFIDENCE: f32 = 30.0;
pub const MAX_CONFIDENCE: f32 = 85.0;

/// How a single keyword matched the reported symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeywordMatch {
    Exact,
    Contains,
    Reverse,
}

/// Score of one pattern against a symptom list.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternScore<'a> {
    pub pattern: &'a SymptomPattern,
    pub match_score: u32,
    pub specificity_score: u32,
    /// match_score over the best possible score for this pattern.
    pub match_percentage: f64,
    pub final_score: f64,
}

impl PatternScore<'_> {
    pub fn qualifies(&self) -> bool {
        self.match_score > 0
            && (self.match_percentage > MIN_MATCH_PERCENTAGE
                || self.specificity_score > MIN_SPECIFICITY)
    }

    /// Scale the pattern's base confidence by match quality, clamped to
    /// [MIN_CONFIDENCE, MAX_CONFIDENCE].
    pub fn confidence(&self) -> f32 {
        let match_quality = (self.final_score / 20.0).min(1.0);
        let specificity_bonus = (self.specificity_score as f64 / 10.0).min(0.2);
        let raw = (f64::from(self.pattern.confidence)
            * (0.7 + match_quality * 0.3 + specificity_bonus))
            .floor() as f32;
        raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    }
}

/// Score one pattern. Symptoms must already be normalised.
pub fn score_pattern<'a>(pattern: &'a SymptomPattern, symptoms: &[String]) -> PatternScore<'a> {
    let mut match_score = 0;
    let mut specificity_score = 0;

    for keyword in &pattern.keywords {
        let keyword = keyword.to_lowercase();
        let Some(kind) = best_match(&keyword, symptoms) else {
            continue;
        };

        match kind {
            KeywordMatch::Exact => {
                match_score += EXACT_MATCH_SCORE;
                specificity_score += EXACT_SPECIFICITY;
            }
            KeywordMatch::Contains => {
                match_score += CONTAINS_MATCH_SCORE;
                specificity_score += CONTAINS_SPECIFICITY;
            }
            KeywordMatch::Reverse => {
                match_score += REVERSE_MATCH_SCORE;
            }
        }

        if keyword.contains(' ') {
            specificity_score += MULTI_WORD_SPECIFICITY;
        }
    }

    let max_score = pattern.keywords.len() as f64 * f64::from(EXACT_MATCH_SCORE);
    let match_percentage = if max_score > 0.0 {
        f64::from(match_score) / max_score
    } else {
        0.0
    };
    let final_score =
        f64::from(match_score) + f64::from(specificity_score) + match_percentage * 5.0;

    PatternScore {
        pattern,
        match_score,
        specificity_score,
        match_percentage,
        final_score,
    }
}

/// Best tier any symptom reaches for this keyword.
fn best_match(keyword: &str, symptoms: &[String]) -> Option<KeywordMatch> {
    if symptoms.iter().any(|s| s == keyword) {
        return Some(KeywordMatch::Exact);
    }
    if keyword.len() > MIN_CONTAINED_KEYWORD_LEN && symptoms.iter().any(|s| s.contains(keyword)) {
        return Some(KeywordMatch::Contains);
    }
    if keyword.len() > MIN_REVERSE_KEYWORD_LEN
        && symptoms
            .iter()
            .any(|s| is_short_symptom(s) && keyword.contains(s.as_str()))
    {
        return Some(KeywordMatch::Reverse);
    }
    None
}

/// A single word, e.g. "cough".
fn is_short_symptom(symptom: &str) -> bool {
    !symptom.is_empty() && !symptom.contains(char::is_whitespace)
}

/// Score every pattern and return those that qualify, best first.
/// Ties keep table order.
pub fn rank_patterns<'a>(
    patterns: &'a [SymptomPattern],
    symptoms: &[String],
) -> Vec<PatternScore<'a>> {
    let mut ranked: Vec<PatternScore<'a>> = patterns
        .iter()
        .map(|p| score_pattern(p, symptoms))
        .filter(PatternScore::qualifies)
        .collect();

    // Vec::sort_by is stable.
    ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    ranked
}
