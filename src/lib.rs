// Cinder: toxicity scoring for user-submitted posts.
//
// This is the library root. Each module corresponds to a major subsystem
// of the moderation pipeline.

pub mod config;
pub mod moderation;
pub mod output;
pub mod pipeline;
pub mod rules;
pub mod toxicity;
