//! Chunked LLM risk analysis for unified diffs.
//!
//! Provides the full analysis pipeline: the completion client and its
//! error classification, prompt construction with strict response
//! validation, the recursive budget-shrinking [`engine::AnalysisEngine`],
//! the conservative [`combine`] rules, and the [`fallback`] synthesizer
//! that guarantees an assessment is always produced.

pub mod combine;
pub mod engine;
pub mod fallback;
pub mod llm;
pub mod prompt;
