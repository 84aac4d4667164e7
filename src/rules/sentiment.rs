// Lexicon sentiment classifier.
//
// Counts exact-word hits against small positive and negative word lists,
// with a crude negation correction. Short or lexicon-free text comes out
// neutral; that is expected, not a misclassification.

use crate::toxicity::traits::Sentiment;

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "awesome",
    "excellent",
    "love",
    "thanks",
    "perfect",
    "beautiful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "hate", "awful", "terrible", "worst", "horrible", "dislike",
];

/// Negated praise; each phrase present adds `NEGATION_WEIGHT` negative hits.
const NEGATED_PHRASES: &[&str] = &["not good", "not great"];

const NEGATION_WEIGHT: usize = 2;

/// Raw counts behind a sentiment decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
}

impl SentimentCounts {
    /// Decision rule, evaluated in order: dominant positive, dominant
    /// negative, nothing at all, otherwise mixed.
    pub fn label(&self) -> Sentiment {
        if self.positive > self.negative * 2 {
            Sentiment::Positive
        } else if self.negative > self.positive * 2 {
            Sentiment::Negative
        } else if self.positive == 0 && self.negative == 0 {
            Sentiment::Neutral
        } else {
            Sentiment::Mixed
        }
    }
}

pub fn count_sentiment(text: &str) -> SentimentCounts {
    let lowered = text.to_lowercase();
    let mut counts = SentimentCounts::default();

    for token in lowered.split_whitespace() {
        if POSITIVE_WORDS.contains(&token) {
            counts.positive += 1;
        }
        if NEGATIVE_WORDS.contains(&token) {
            counts.negative += 1;
        }
    }

    if NEGATED_PHRASES.iter().any(|p| lowered.contains(p)) {
        counts.negative += NEGATION_WEIGHT;
    }

    counts
}

pub fn classify_sentiment(text: &str) -> Sentiment {
    count_sentiment(text).label()
}
