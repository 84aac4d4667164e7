// Rule-based backend: the local fallback that never fails.
//
// Composes the lexicon scorer, pattern detector, and sentiment classifier.
// No I/O and no randomness: identical input yields an identical result.

use async_trait::async_trait;
use tracing::debug;

use super::error::AnalysisError;
use super::normalize::{build_suggestions, CategoryKind};
use super::traits::{Severity, ToxicityBackend, ToxicityResult, RULE_BASED_BANDS};
use crate::output::truncate_chars;
use crate::rules::lexicon::{score_categories, Lexicon};
use crate::rules::patterns::detect_patterns;
use crate::rules::sentiment::classify_sentiment;

/// Overall score at or above which rule-based results are flagged.
pub const FLAG_THRESHOLD: f64 = 30.0;

/// Texts shorter than this many words get the short-text discount.
const SHORT_TEXT_WORDS: usize = 3;
/// The discount only applies above this pre-discount score.
const SHORT_TEXT_MIN_SCORE: f64 = 50.0;
const SHORT_TEXT_FACTOR: f64 = 0.8;

const BASE_CONFIDENCE: f64 = 0.6;
const CONFIDENCE_PER_WORD: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;

pub const BACKEND_NAME: &str = "rule-based";

/// Local lexicon and pattern scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedBackend;

impl RuleBasedBackend {
    pub fn new() -> Self {
        Self
    }

    /// Score `content` synchronously.
    pub fn analyze_text(&self, content: &str) -> ToxicityResult {
        let scores = score_categories(content);
        let patterns = detect_patterns(content);

        let weighted: f64 = Lexicon::ALL
            .iter()
            .map(|l| scores.score(*l) * l.overall_weight())
            .sum();
        let mut total = weighted + patterns.penalty();

        let word_count = content.split_whitespace().count();
        if word_count < SHORT_TEXT_WORDS && total > SHORT_TEXT_MIN_SCORE {
            total *= SHORT_TEXT_FACTOR;
        }
        let total = total.clamp(0.0, 100.0);

        let categories: Vec<_> = Lexicon::ALL
            .iter()
            .map(|l| category_kind(*l).category(scores.score(*l), 0.0))
            .collect();
        let detected: Vec<CategoryKind> = Lexicon::ALL
            .iter()
            .filter(|l| scores.hits(**l) > 0)
            .map(|l| category_kind(*l))
            .collect();

        let is_flagged = total >= FLAG_THRESHOLD;
        let toxic_words = scores.toxic_words();
        let confidence =
            (BASE_CONFIDENCE + toxic_words.len() as f64 * CONFIDENCE_PER_WORD).min(MAX_CONFIDENCE);

        debug!(
            score = total,
            weighted = weighted,
            pattern_penalty = patterns.penalty(),
            words = word_count,
            flagged = is_flagged,
            text_preview = %truncate_chars(content, 50),
            "Rule-based analysis"
        );

        ToxicityResult {
            score: total,
            is_flagged,
            // Banded on the overall score only; no threat override locally
            severity: Severity::from_score(total, &RULE_BASED_BANDS),
            sentiment: classify_sentiment(content),
            confidence,
            categories,
            toxic_words,
            suggestions: build_suggestions(&detected, is_flagged),
        }
    }
}

#[async_trait]
impl ToxicityBackend for RuleBasedBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn analyze(&self, content: &str) -> Result<ToxicityResult, AnalysisError> {
        Ok(self.analyze_text(content))
    }
}

fn category_kind(lexicon: Lexicon) -> CategoryKind {
    match lexicon {
        Lexicon::Profanity => CategoryKind::Profanity,
        Lexicon::Insult => CategoryKind::Insult,
        Lexicon::Threat => CategoryKind::Threat,
        Lexicon::HateSpeech => CategoryKind::HateSpeech,
    }
}
