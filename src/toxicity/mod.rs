// Toxicity analysis: one contract, three interchangeable backends.
//
// The ToxicityBackend trait defines the interface. RuleBasedBackend scores
// locally with no I/O. MlServiceBackend and MaxModelBackend call remote
// scoring services and hand their replies to the normalizer. The selector
// probes the preferred remote on every call and the analyzer falls back to
// the rule engine whenever the remote is down or answers with garbage.

pub mod analyzer;
pub mod error;
pub mod max_model;
pub mod ml_service;
pub mod normalize;
pub mod rule_based;
pub mod selector;
pub mod traits;
