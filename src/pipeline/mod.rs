// Pipelines: multi-text workflows built on the analyzer.

pub mod batch;
