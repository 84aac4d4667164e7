// Surface-pattern detector: shouting, stretched characters, punctuation bursts.
//
// Produces an additive penalty that is independent of lexicon scoring. The
// penalty is not capped here; the rule-based backend caps the overall score.

/// Uppercase share of letters above which text counts as shouting.
const SHOUTING_RATIO: f64 = 0.5;
/// A character repeated this many times in a row is a stretched run.
const REPEAT_RUN: usize = 4;
/// More than this many `!` and `?` combined is a punctuation burst.
const PUNCTUATION_LIMIT: usize = 3;

const SHOUTING_PENALTY: f64 = 10.0;
const REPEAT_PENALTY: f64 = 10.0;
const PUNCTUATION_PENALTY: f64 = 5.0;

/// Which surface patterns fired for a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternSignals {
    pub shouting: bool,
    pub repeated_run: bool,
    pub punctuation_burst: bool,
}

impl PatternSignals {
    pub fn penalty(&self) -> f64 {
        let mut penalty = 0.0;
        if self.shouting {
            penalty += SHOUTING_PENALTY;
        }
        if self.repeated_run {
            penalty += REPEAT_PENALTY;
        }
        if self.punctuation_burst {
            penalty += PUNCTUATION_PENALTY;
        }
        penalty
    }
}

pub fn detect_patterns(text: &str) -> PatternSignals {
    PatternSignals {
        shouting: is_shouting(text),
        repeated_run: has_repeated_run(text),
        punctuation_burst: text.chars().filter(|c| matches!(c, '!' | '?')).count()
            > PUNCTUATION_LIMIT,
    }
}

/// Convenience wrapper returning only the summed penalty.
pub fn pattern_penalty(text: &str) -> f64 {
    detect_patterns(text).penalty()
}

fn is_shouting(text: &str) -> bool {
    let (upper, letters) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(upper, letters), c| {
            (upper + usize::from(c.is_uppercase()), letters + 1)
        });
    // Exactly half is not shouting
    letters > 0 && upper as f64 / letters as f64 > SHOUTING_RATIO
}

fn has_repeated_run(text: &str) -> bool {
    let mut previous: Option<char> = None;
    let mut run = 0usize;
    for c in text.chars() {
        if c == '\n' {
            previous = None;
            run = 0;
            continue;
        }
        if previous == Some(c) {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }
        if run >= REPEAT_RUN {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_caps_is_shouting() {
        let signals = detect_patterns("HAVE A GREAT DAY");
        assert!(signals.shouting);
        assert_eq!(signals.penalty(), 10.0);
    }

    #[test]
    fn exactly_half_caps_is_not_shouting() {
        assert!(!detect_patterns("ABcd").shouting);
        assert!(detect_patterns("ABCd").shouting);
    }

    #[test]
    fn no_letters_is_not_shouting() {
        assert!(!detect_patterns("1234 ...").shouting);
        assert_eq!(pattern_penalty(""), 0.0);
    }

    #[test]
    fn four_repeats_is_a_run() {
        assert!(detect_patterns("nooooo").repeated_run);
        assert!(!detect_patterns("nooo").repeated_run);
    }

    #[test]
    fn newline_breaks_a_run() {
        assert!(!detect_patterns("aa\naa").repeated_run);
    }

    #[test]
    fn punctuation_burst_needs_more_than_three() {
        assert!(!detect_patterns("what?! why?").punctuation_burst);
        assert!(detect_patterns("what?! why?!").punctuation_burst);
    }

    #[test]
    fn penalties_are_summed() {
        // Shouting + "!!!!" run + burst
        assert_eq!(pattern_penalty("STOP IT!!!!"), 25.0);
    }
}
