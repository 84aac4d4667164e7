// Lexicon category scorer.
//
// Each whitespace token is checked against four fixed stem lists. A token
// counts at most once per lexicon (first matching stem wins) but may count
// against several lexicons. Multi-word threat phrases are matched against
// the full text and weigh double.

use std::collections::BTreeMap;

/// The four rule-based toxicity dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lexicon {
    Profanity,
    Insult,
    Threat,
    HateSpeech,
}

const PROFANITY_STEMS: &[&str] = &["fuck", "shit", "damn", "hell", "ass", "bitch"];

const INSULT_STEMS: &[&str] = &[
    "stupid",
    "idiot",
    "dumb",
    "moron",
    "loser",
    "dummy",
    "worthless",
    "trash",
    "garbage",
];

const THREAT_STEMS: &[&str] = &["kill", "die", "hurt", "attack", "destroy", "beat"];

const HATE_SPEECH_STEMS: &[&str] = &["hate", "racist", "sexist", "nazi", "discriminate"];

/// Phrases matched against the whole lowercased text. Each match adds
/// `THREAT_PHRASE_HITS` to the threat count.
pub const THREAT_PHRASES: &[&str] = &["kill you", "hurt you", "going to get you", "beat you up"];

const THREAT_PHRASE_HITS: u32 = 2;

impl Lexicon {
    /// Scoring order, also the order categories appear in results.
    pub const ALL: [Lexicon; 4] = [
        Lexicon::Profanity,
        Lexicon::Insult,
        Lexicon::Threat,
        Lexicon::HateSpeech,
    ];

    pub fn stems(&self) -> &'static [&'static str] {
        match self {
            Lexicon::Profanity => PROFANITY_STEMS,
            Lexicon::Insult => INSULT_STEMS,
            Lexicon::Threat => THREAT_STEMS,
            Lexicon::HateSpeech => HATE_SPEECH_STEMS,
        }
    }

    /// Score contributed by each hit before the 100 cap.
    pub fn per_hit_weight(&self) -> f64 {
        match self {
            Lexicon::Profanity => 20.0,
            Lexicon::Insult => 20.0,
            Lexicon::Threat => 25.0,
            Lexicon::HateSpeech => 30.0,
        }
    }

    /// Weight of this category in the overall rule-based score.
    pub fn overall_weight(&self) -> f64 {
        match self {
            Lexicon::Profanity => 0.2,
            Lexicon::Insult => 0.25,
            Lexicon::Threat => 0.3,
            Lexicon::HateSpeech => 0.25,
        }
    }

    fn matching_stem(&self, token: &str) -> Option<&'static str> {
        self.stems().iter().copied().find(|stem| token.contains(stem))
    }
}

/// Hit counts and triggering strings for one text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScores {
    hits: BTreeMap<Lexicon, u32>,
    /// (lexicon, trigger) in detection order, unique per lexicon
    triggers: Vec<(Lexicon, String)>,
}

impl CategoryScores {
    fn record(&mut self, lexicon: Lexicon, hits: u32, trigger: &str) {
        *self.hits.entry(lexicon).or_insert(0) += hits;
        let seen = self
            .triggers
            .iter()
            .any(|(l, t)| *l == lexicon && t == trigger);
        if !seen {
            self.triggers.push((lexicon, trigger.to_string()));
        }
    }

    pub fn hits(&self, lexicon: Lexicon) -> u32 {
        self.hits.get(&lexicon).copied().unwrap_or(0)
    }

    /// Category score in the 0-100 domain: `min(100, hits * weight)`.
    pub fn score(&self, lexicon: Lexicon) -> f64 {
        (self.hits(lexicon) as f64 * lexicon.per_hit_weight()).min(100.0)
    }

    /// Every category score keyed by lexicon.
    pub fn scores(&self) -> BTreeMap<Lexicon, f64> {
        Lexicon::ALL.iter().map(|l| (*l, self.score(*l))).collect()
    }

    /// Strings that triggered one lexicon, in detection order.
    pub fn triggered_by(&self, lexicon: Lexicon) -> Vec<&str> {
        self.triggers
            .iter()
            .filter(|(l, _)| *l == lexicon)
            .map(|(_, t)| t.as_str())
            .collect()
    }

    /// All triggering strings in detection order. A string appears twice
    /// only when two different lexicons matched it.
    pub fn toxic_words(&self) -> Vec<String> {
        self.triggers.iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn total_hits(&self) -> u32 {
        self.hits.values().sum()
    }
}

/// Score `text` against the four lexicons and the threat phrase list.
pub fn score_categories(text: &str) -> CategoryScores {
    let lowered = text.to_lowercase();
    let mut scores = CategoryScores::default();

    for token in lowered.split_whitespace() {
        for lexicon in Lexicon::ALL {
            if lexicon.matching_stem(token).is_some() {
                scores.record(lexicon, 1, token);
            }
        }
    }

    for phrase in THREAT_PHRASES {
        if lowered.contains(phrase) {
            scores.record(Lexicon::Threat, THREAT_PHRASE_HITS, phrase);
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_counts_once_per_lexicon() {
        // "dumbass" matches profanity ("ass") and insult ("dumb")
        let scores = score_categories("dumbass");
        assert_eq!(scores.hits(Lexicon::Profanity), 1);
        assert_eq!(scores.hits(Lexicon::Insult), 1);
        assert_eq!(scores.toxic_words(), vec!["dumbass", "dumbass"]);
    }

    #[test]
    fn repeated_token_counts_each_occurrence() {
        let scores = score_categories("idiot idiot idiot");
        assert_eq!(scores.hits(Lexicon::Insult), 3);
        assert_eq!(scores.score(Lexicon::Insult), 60.0);
        // Same trigger under the same lexicon is recorded once
        assert_eq!(scores.triggered_by(Lexicon::Insult), vec!["idiot"]);
    }

    #[test]
    fn category_score_caps_at_100() {
        let scores = score_categories("hate hate hate hate");
        assert_eq!(scores.score(Lexicon::HateSpeech), 100.0);
    }

    #[test]
    fn threat_phrase_adds_two_hits() {
        let scores = score_categories("I will kill you");
        // "kill" token (1) + "kill you" phrase (2)
        assert_eq!(scores.hits(Lexicon::Threat), 3);
        assert_eq!(scores.score(Lexicon::Threat), 75.0);
        assert_eq!(scores.triggered_by(Lexicon::Threat), vec!["kill", "kill you"]);
    }

    #[test]
    fn clean_text_scores_zero() {
        let scores = score_categories("What a lovely afternoon in the park");
        assert_eq!(scores.total_hits(), 0);
        assert!(scores.scores().values().all(|s| *s == 0.0));
        assert!(scores.toxic_words().is_empty());
    }
}
