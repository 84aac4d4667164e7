// Post gating: what the post-creation handler does with a verdict.
//
// The persisted post keeps an integer toxicity score and a flag. Flagged
// posts go to the moderation queue instead of being published directly.

use serde::{Deserialize, Serialize};

use crate::toxicity::traits::ToxicityResult;

/// Where a new post goes after analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationRoute {
    Publish,
    Queue,
}

/// The fields a caller persists on the post record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostVerdict {
    /// Overall score rounded to the nearest integer, 0-100
    pub toxicity_score: i32,
    pub is_flagged: bool,
    pub route: ModerationRoute,
}

/// Map an analysis result onto the persisted post fields.
pub fn gate(result: &ToxicityResult) -> PostVerdict {
    let toxicity_score = if result.score.is_finite() {
        result.score.clamp(0.0, 100.0).round() as i32
    } else {
        0
    };

    PostVerdict {
        toxicity_score,
        is_flagged: result.is_flagged,
        route: if result.is_flagged {
            ModerationRoute::Queue
        } else {
            ModerationRoute::Publish
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toxicity::rule_based::RuleBasedBackend;

    #[test]
    fn unflagged_post_is_published() {
        let result = RuleBasedBackend.analyze_text("You are so stupid and I hate you");
        let verdict = gate(&result);
        // 12.5 rounds away from zero
        assert_eq!(verdict.toxicity_score, 13);
        assert!(!verdict.is_flagged);
        assert_eq!(verdict.route, ModerationRoute::Publish);
    }

    #[test]
    fn flagged_post_is_queued() {
        let result = RuleBasedBackend.analyze_text("I will kill you, you worthless trash");
        let verdict = gate(&result);
        assert_eq!(verdict.toxicity_score, 33);
        assert!(verdict.is_flagged);
        assert_eq!(verdict.route, ModerationRoute::Queue);
    }
}
