// Result normalizer: maps backend-specific sub-scores onto ToxicityResult.
//
// Remote models report sub-scores in the 0-1 domain under their own field
// names. Adapters translate those into a RawScores value; everything after
// that (rescaling, category naming, flagging, severity, sentiment,
// suggestions) happens here so every backend produces the same shape.
// The rule-based backend reuses the suggestion helper.

use std::collections::BTreeMap;

use tracing::debug;

use super::traits::{
    Sentiment, Severity, SeverityBands, ToxicityCategory, ToxicityResult, REMOTE_BANDS,
};
use crate::output::truncate_chars;

/// Category score (0-100 domain) above which a threat forces `Critical`.
pub const THREAT_OVERRIDE: f64 = 50.0;

pub const THREAT_SUGGESTION: &str =
    "Threatening content detected. This violates our safety policy.";
pub const HATE_SUGGESTION: &str = "Hate speech is not tolerated on this platform.";
pub const INSULT_SUGGESTION: &str =
    "Insulting language detected. Please communicate respectfully.";
pub const SEXUAL_SUGGESTION: &str = "Sexually explicit content is not allowed.";
pub const PROFANITY_SUGGESTION: &str = "Profane language detected. Consider rephrasing.";
pub const FLAGGED_FOR_REVIEW: &str =
    "This content has been flagged for review by our moderation team.";

/// Every category name a backend can report with a fixed description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Toxicity,
    SevereToxicity,
    Obscene,
    Profanity,
    Insult,
    Threat,
    IdentityAttack,
    HateSpeech,
    SexualExplicit,
}

impl CategoryKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryKind::Toxicity => "Toxicity",
            CategoryKind::SevereToxicity => "Severe Toxicity",
            CategoryKind::Obscene => "Obscene",
            CategoryKind::Profanity => "Profanity",
            CategoryKind::Insult => "Insult",
            CategoryKind::Threat => "Threat",
            CategoryKind::IdentityAttack => "Identity Attack",
            CategoryKind::HateSpeech => "Hate Speech",
            CategoryKind::SexualExplicit => "Sexually Explicit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CategoryKind::Toxicity => "General toxic content",
            CategoryKind::SevereToxicity => "Extremely toxic content",
            CategoryKind::Obscene => "Obscene or vulgar language",
            CategoryKind::Profanity => "Profane language",
            CategoryKind::Insult => "Insulting language",
            CategoryKind::Threat => "Threatening content",
            CategoryKind::IdentityAttack => "Attacks based on identity",
            CategoryKind::HateSpeech => "Hate speech",
            CategoryKind::SexualExplicit => "Sexually explicit content",
        }
    }

    /// Build the display category from a 0-100 score.
    pub fn category(&self, score: f64, detection_threshold: f64) -> ToxicityCategory {
        ToxicityCategory {
            name: self.display_name().to_string(),
            score,
            detected: score > detection_threshold,
            description: self.description().to_string(),
        }
    }
}

/// Specific suggestions in the order they are emitted.
const SUGGESTION_ORDER: &[(&[CategoryKind], &str)] = &[
    (&[CategoryKind::Threat], THREAT_SUGGESTION),
    (
        &[CategoryKind::HateSpeech, CategoryKind::IdentityAttack],
        HATE_SUGGESTION,
    ),
    (&[CategoryKind::Insult], INSULT_SUGGESTION),
    (&[CategoryKind::SexualExplicit], SEXUAL_SUGGESTION),
    (
        &[CategoryKind::Profanity, CategoryKind::Obscene],
        PROFANITY_SUGGESTION,
    ),
];

/// Suggestions for a set of detected categories.
///
/// Specific messages follow `SUGGESTION_ORDER`; the generic review notice
/// is appended last whenever the content is flagged.
pub fn build_suggestions(detected: &[CategoryKind], is_flagged: bool) -> Vec<String> {
    let mut suggestions: Vec<String> = SUGGESTION_ORDER
        .iter()
        .filter(|(kinds, _)| kinds.iter().any(|k| detected.contains(k)))
        .map(|(_, message)| message.to_string())
        .collect();

    if is_flagged {
        suggestions.push(FLAGGED_FOR_REVIEW.to_string());
    }
    suggestions
}

/// Band the score, then force `Critical` when the threat category is high.
pub fn assess_severity(score: f64, threat_score: f64, bands: &SeverityBands) -> Severity {
    if threat_score > THREAT_OVERRIDE {
        return Severity::Critical;
    }
    Severity::from_score(score, bands)
}

/// Where a remote backend's sentiment comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SentimentSignal {
    /// A compound polarity in [-1, 1] reported by the model.
    Compound(f64),
    /// No polarity available; derive it from the toxicity sub-scores.
    FromScores,
}

/// Backend-agnostic view of a remote reply, all values in the 0-1 domain.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScores {
    /// Primary toxicity score
    pub toxicity: f64,
    /// Known sub-scores in display order
    pub categories: Vec<(CategoryKind, f64)>,
    /// Dynamically named sub-scores, appended after the known ones
    pub extra: BTreeMap<String, f64>,
    pub sentiment: SentimentSignal,
    pub confidence: f64,
}

impl RawScores {
    fn sub_score(&self, kind: CategoryKind) -> f64 {
        self.categories
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| unit(*v))
            .unwrap_or(0.0)
    }
}

/// Per-backend normalization thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeProfile {
    /// Raw (0-1) value a category must exceed to count as detected
    pub detection_threshold: f64,
    /// Raw (0-1) toxicity or threat value that flags the content
    pub flag_threshold: f64,
    pub bands: SeverityBands,
}

pub const ML_SERVICE_PROFILE: NormalizeProfile = NormalizeProfile {
    detection_threshold: 0.3,
    flag_threshold: 0.5,
    bands: REMOTE_BANDS,
};

pub const MAX_MODEL_PROFILE: NormalizeProfile = NormalizeProfile {
    detection_threshold: 0.5,
    flag_threshold: 0.5,
    bands: REMOTE_BANDS,
};

/// Convert a remote backend's sub-scores into the canonical result.
pub fn normalize(raw: &RawScores, content: &str, profile: &NormalizeProfile) -> ToxicityResult {
    let toxicity = unit(raw.toxicity);
    let threat = raw.sub_score(CategoryKind::Threat);
    let detection = profile.detection_threshold * 100.0;

    let mut categories: Vec<ToxicityCategory> = raw
        .categories
        .iter()
        .map(|(kind, value)| kind.category(rescale(*value), detection))
        .collect();
    categories.extend(raw.extra.iter().map(|(name, value)| {
        let score = rescale(*value);
        ToxicityCategory {
            name: name.clone(),
            score,
            detected: score > detection,
            description: String::new(),
        }
    }));

    let detected: Vec<CategoryKind> = raw
        .categories
        .iter()
        .filter(|(_, value)| rescale(*value) > detection)
        .map(|(kind, _)| *kind)
        .collect();

    // Flagging is evaluated on the raw 0-1 values
    let is_flagged = toxicity > profile.flag_threshold || threat > profile.flag_threshold;
    let score = rescale(toxicity);
    let severity = assess_severity(score, rescale(threat), &profile.bands);

    let sentiment = match raw.sentiment {
        SentimentSignal::Compound(compound) => sentiment_from_compound(compound),
        SentimentSignal::FromScores => sentiment_from_scores(
            toxicity,
            raw.sub_score(CategoryKind::Insult),
            threat,
        ),
    };

    debug!(
        score = score,
        flagged = is_flagged,
        severity = %severity,
        text_preview = %truncate_chars(content, 50),
        "Normalized remote scores"
    );

    ToxicityResult {
        score,
        is_flagged,
        severity,
        sentiment,
        confidence: unit(raw.confidence),
        categories,
        toxic_words: Vec::new(),
        suggestions: build_suggestions(&detected, is_flagged),
    }
}

/// Map a compound polarity in [-1, 1] onto the five-way label.
pub fn sentiment_from_compound(compound: f64) -> Sentiment {
    match compound {
        c if c > 0.6 => Sentiment::VeryPositive,
        c if c > 0.2 => Sentiment::Positive,
        c if c < -0.6 => Sentiment::VeryNegative,
        c if c < -0.2 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// Sentiment for models that report no polarity: benign text reads as
/// positive, clearly toxic text as negative.
pub fn sentiment_from_scores(toxicity: f64, insult: f64, threat: f64) -> Sentiment {
    if toxicity < 0.2 && insult < 0.2 && threat < 0.2 {
        Sentiment::Positive
    } else if toxicity < 0.4 {
        Sentiment::Neutral
    } else {
        Sentiment::Negative
    }
}

/// Clamp to [0, 1]; non-finite values count as zero.
fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// 0-1 domain to 0-100 display domain.
fn rescale(value: f64) -> f64 {
    unit(value) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(toxicity: f64, categories: Vec<(CategoryKind, f64)>) -> RawScores {
        RawScores {
            toxicity,
            categories,
            extra: BTreeMap::new(),
            sentiment: SentimentSignal::FromScores,
            confidence: 0.9,
        }
    }

    #[test]
    fn rescales_to_display_domain() {
        let result = normalize(
            &raw(0.42, vec![(CategoryKind::Insult, 0.25)]),
            "text",
            &ML_SERVICE_PROFILE,
        );
        assert!((result.score - 42.0).abs() < 1e-9);
        assert!((result.categories[0].score - 25.0).abs() < 1e-9);
        assert!(!result.categories[0].detected);
    }

    #[test]
    fn threat_alone_flags_and_is_critical() {
        let result = normalize(
            &raw(0.1, vec![(CategoryKind::Threat, 0.6)]),
            "text",
            &MAX_MODEL_PROFILE,
        );
        assert!(result.is_flagged);
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.suggestions, vec![THREAT_SUGGESTION, FLAGGED_FOR_REVIEW]);
    }

    #[test]
    fn exactly_half_does_not_flag() {
        let result = normalize(&raw(0.5, vec![]), "text", &MAX_MODEL_PROFILE);
        assert!(!result.is_flagged);
        assert_eq!(result.severity, Severity::Medium);
    }

    #[test]
    fn flagged_without_specific_category_gets_generic_only() {
        let result = normalize(&raw(0.8, vec![]), "text", &MAX_MODEL_PROFILE);
        assert_eq!(result.suggestions, vec![FLAGGED_FOR_REVIEW]);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn suggestion_order_is_fixed() {
        let detected = [
            CategoryKind::Profanity,
            CategoryKind::Insult,
            CategoryKind::IdentityAttack,
        ];
        assert_eq!(
            build_suggestions(&detected, true),
            vec![
                HATE_SUGGESTION,
                INSULT_SUGGESTION,
                PROFANITY_SUGGESTION,
                FLAGGED_FOR_REVIEW
            ]
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut scores = raw(1.7, vec![(CategoryKind::Insult, f64::NAN)]);
        scores.confidence = -3.0;
        let result = normalize(&scores, "text", &ML_SERVICE_PROFILE);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.categories[0].score, 0.0);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn compound_sentiment_bands() {
        assert_eq!(sentiment_from_compound(0.9), Sentiment::VeryPositive);
        assert_eq!(sentiment_from_compound(0.3), Sentiment::Positive);
        assert_eq!(sentiment_from_compound(0.2), Sentiment::Neutral);
        assert_eq!(sentiment_from_compound(-0.3), Sentiment::Negative);
        assert_eq!(sentiment_from_compound(-0.61), Sentiment::VeryNegative);
    }

    #[test]
    fn derived_sentiment() {
        assert_eq!(sentiment_from_scores(0.1, 0.1, 0.1), Sentiment::Positive);
        assert_eq!(sentiment_from_scores(0.3, 0.1, 0.1), Sentiment::Neutral);
        assert_eq!(sentiment_from_scores(0.1, 0.5, 0.1), Sentiment::Neutral);
        assert_eq!(sentiment_from_scores(0.7, 0.1, 0.1), Sentiment::Negative);
    }
}
