// Local rule engine: pure text heuristics with no I/O.
//
// Three independent signals feed the rule-based backend: lexicon category
// scores, surface-pattern penalties, and a coarse sentiment label.

pub mod lexicon;
pub mod patterns;
pub mod sentiment;
