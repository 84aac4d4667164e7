// Unit tests for the local rule engine.
//
// Exercises the lexicon scorer, pattern detector, and sentiment classifier
// through their public API, plus the composed rule-based backend on the
// reference inputs. No network access.

use cinder::rules::lexicon::{score_categories, Lexicon};
use cinder::rules::patterns::{detect_patterns, pattern_penalty};
use cinder::rules::sentiment::{classify_sentiment, count_sentiment};
use cinder::toxicity::normalize::{FLAGGED_FOR_REVIEW, INSULT_SUGGESTION, THREAT_SUGGESTION};
use cinder::toxicity::rule_based::RuleBasedBackend;
use cinder::toxicity::traits::{Sentiment, Severity};

// ============================================================
// Lexicon scorer
// ============================================================

#[test]
fn per_hit_weights() {
    let scores = score_categories("damn idiot hurt racist");
    assert_eq!(scores.score(Lexicon::Profanity), 20.0);
    assert_eq!(scores.score(Lexicon::Insult), 20.0);
    assert_eq!(scores.score(Lexicon::Threat), 25.0);
    assert_eq!(scores.score(Lexicon::HateSpeech), 30.0);
}

#[test]
fn matching_is_case_insensitive_substring() {
    let scores = score_categories("IDIOTS everywhere");
    assert_eq!(scores.hits(Lexicon::Insult), 1);
    assert_eq!(scores.triggered_by(Lexicon::Insult), vec!["idiots"]);
}

#[test]
fn every_threat_phrase_counts_double() {
    let scores = score_categories("I am going to get you");
    assert_eq!(scores.hits(Lexicon::Threat), 2);
    assert_eq!(scores.triggered_by(Lexicon::Threat), vec!["going to get you"]);
}

#[test]
fn threat_phrase_and_token_both_recorded() {
    let scores = score_categories("we will beat you up");
    // "beat" token + "beat you up" phrase
    assert_eq!(scores.hits(Lexicon::Threat), 3);
    assert_eq!(scores.toxic_words(), vec!["beat", "beat you up"]);
}

#[test]
fn empty_text_has_no_hits() {
    let scores = score_categories("");
    assert_eq!(scores.total_hits(), 0);
    assert!(scores.scores().values().all(|s| *s == 0.0));
}

// ============================================================
// Pattern detector
// ============================================================

#[test]
fn mixed_case_is_not_shouting() {
    assert!(!detect_patterns("Hello There Friend").shouting);
}

#[test]
fn penalty_is_additive_and_uncapped_here() {
    assert_eq!(pattern_penalty("WHY?!?!"), 15.0);
    assert_eq!(pattern_penalty("calm words."), 0.0);
}

#[test]
fn unicode_letters_count_toward_caps_ratio() {
    assert!(detect_patterns("ÉCOLE FERMÉE").shouting);
}

// ============================================================
// Sentiment classifier
// ============================================================

#[test]
fn positive_dominates() {
    assert_eq!(classify_sentiment("thanks, this is great and perfect"), Sentiment::Positive);
}

#[test]
fn punctuation_attached_words_do_not_match() {
    // Exact-word matching only: "great!" is not "great"
    assert_eq!(count_sentiment("great!").positive, 0);
}

#[test]
fn lexicon_free_text_is_neutral() {
    assert_eq!(classify_sentiment("the meeting is at noon"), Sentiment::Neutral);
}

// ============================================================
// Rule-based backend on reference inputs
// ============================================================

#[test]
fn insult_and_hate_below_flag_threshold() {
    let result = RuleBasedBackend.analyze_text("You are so stupid and I hate you");
    assert!((result.score - 12.5).abs() < 1e-9);
    assert!(!result.is_flagged);
    assert_eq!(result.severity, Severity::None);
    assert_eq!(result.category("Insult").unwrap().score, 20.0);
    assert_eq!(result.category("Hate Speech").unwrap().score, 30.0);
    assert_eq!(result.category("Threat").unwrap().score, 0.0);
    assert_eq!(result.category("Profanity").unwrap().score, 0.0);
}

#[test]
fn threat_with_insults_is_flagged() {
    let result = RuleBasedBackend.analyze_text("I will kill you, you worthless trash");
    assert!(result.score >= 30.0);
    assert!(result.is_flagged);
    assert_eq!(result.severity, Severity::Low);
    assert_eq!(
        result.suggestions,
        vec![THREAT_SUGGESTION, INSULT_SUGGESTION, FLAGGED_FOR_REVIEW]
    );
    assert_eq!(result.category("Threat").unwrap().score, 75.0);
    assert_eq!(
        result.toxic_words,
        vec!["kill", "worthless", "trash", "kill you"]
    );
}

#[test]
fn empty_input() {
    let result = RuleBasedBackend.analyze_text("");
    assert_eq!(result.score, 0.0);
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert!(!result.is_flagged);
    assert!(result.suggestions.is_empty());
    assert!(result.toxic_words.is_empty());
}

#[test]
fn shouting_without_lexicon_hits() {
    let result = RuleBasedBackend.analyze_text("HAVE A GREAT DAY");
    assert_eq!(result.score, 10.0);
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert!(!result.is_flagged);
    assert_eq!(result.severity, Severity::None);
}

#[test]
fn categories_are_always_listed_in_fixed_order() {
    let result = RuleBasedBackend.analyze_text("nothing to see");
    let names: Vec<&str> = result.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Profanity", "Insult", "Threat", "Hate Speech"]);
    assert!(result.categories.iter().all(|c| !c.detected));
}

#[test]
fn detected_matches_nonzero_score() {
    let result = RuleBasedBackend.analyze_text("shit happens");
    let profanity = result.category("Profanity").unwrap();
    assert!(profanity.detected);
    assert_eq!(profanity.description, "Profane language");
}

// ============================================================
// Properties
// ============================================================

const CORPUS: &[&str] = &[
    "",
    "   ",
    "hello there",
    "KILL KILL KILL KILL KILL KILL!!!!!!!!",
    "fuck shit damn hell ass bitch stupid idiot dumb moron loser dummy",
    "kill you hurt you going to get you beat you up kill die hurt attack destroy beat",
    "hate racist sexist nazi discriminate hate hate hate",
    "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
    "?!?!?!?!?!?!?!?!?!?!",
    "🔥🔥🔥🔥 emoji only 🔥🔥🔥🔥",
    "MiXeD CaSe TeXt WiTh NoThInG",
    "not good, not great, terrible, awful, worst",
];

#[test]
fn score_and_confidence_stay_in_bounds() {
    for text in CORPUS {
        let result = RuleBasedBackend.analyze_text(text);
        assert!(
            (0.0..=100.0).contains(&result.score),
            "score {} out of range for {text:?}",
            result.score
        );
        assert!(
            (0.0..=1.0).contains(&result.confidence),
            "confidence {} out of range for {text:?}",
            result.confidence
        );
        for category in &result.categories {
            assert!((0.0..=100.0).contains(&category.score));
        }
    }
}

#[test]
fn repeated_analysis_is_identical() {
    for text in CORPUS {
        let first = RuleBasedBackend.analyze_text(text);
        let second = RuleBasedBackend.analyze_text(text);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn clean_text_scores_zero_and_is_not_flagged() {
    for text in ["good morning", "the meeting is at noon", "see you soon."] {
        let result = RuleBasedBackend.analyze_text(text);
        assert_eq!(result.score, 0.0, "{text:?}");
        assert!(!result.is_flagged);
    }
}

#[test]
fn flag_matches_threshold() {
    for text in CORPUS {
        let result = RuleBasedBackend.analyze_text(text);
        assert_eq!(result.is_flagged, result.score >= 30.0, "{text:?}");
    }
}

#[test]
fn severity_never_drops_as_score_rises() {
    let mut texts: Vec<&str> = CORPUS.to_vec();
    texts.extend([
        "I will kill you",
        "stupid idiot moron hate hate",
        "I will kill you, you worthless trash",
        "HATEKILL YOU NOW!!!!",
    ]);
    let mut results: Vec<_> = texts
        .iter()
        .map(|t| RuleBasedBackend.analyze_text(t))
        .collect();
    results.sort_by(|a, b| a.score.total_cmp(&b.score));

    for pair in results.windows(2) {
        assert!(
            pair[0].severity <= pair[1].severity,
            "score {} is {} but score {} is {}",
            pair[0].score,
            pair[0].severity,
            pair[1].score,
            pair[1].severity
        );
    }
}

#[test]
fn lone_threat_below_flag_threshold_is_low() {
    let threat = RuleBasedBackend.analyze_text("I will kill you");
    assert!((threat.score - 22.5).abs() < 1e-9);
    assert!(!threat.is_flagged);
    assert_eq!(threat.severity, Severity::Low);

    let insults = RuleBasedBackend.analyze_text("stupid idiot moron hate hate");
    assert!((insults.score - 30.0).abs() < 1e-9);
    assert!(insults.is_flagged);
    assert_eq!(insults.severity, Severity::Low);
}
