use augur_core::{AnalysisConfig, AugurError};

/// Outcome of sizing a diff against the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeDecision {
    /// The diff fits in one completion request.
    Direct,
    /// The diff must be split before analysis.
    Chunk,
}

/// Classify a diff as "send directly" or "must chunk".
///
/// A pure comparison against the configured thresholds; no scanning. With
/// chunking disabled, diffs under the hard maximum are still sent directly
/// and only diffs past it are rejected.
///
/// # Errors
///
/// Returns [`AugurError::SizeLimit`] when chunking is disabled and the
/// diff exceeds `max_diff_bytes`.
///
/// # Examples
///
/// ```
/// use augur_chunk::budget::{evaluate, SizeDecision};
/// use augur_core::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(evaluate("+small change", &config).unwrap(), SizeDecision::Direct);
///
/// let large = "x".repeat(config.chunk_budget_bytes + 1);
/// assert_eq!(evaluate(&large, &config).unwrap(), SizeDecision::Chunk);
/// ```
pub fn evaluate(diff: &str, config: &AnalysisConfig) -> Result<SizeDecision, AugurError> {
    if diff.len() <= config.chunk_budget_bytes {
        return Ok(SizeDecision::Direct);
    }
    if config.chunking {
        return Ok(SizeDecision::Chunk);
    }
    if diff.len() <= config.max_diff_bytes {
        return Ok(SizeDecision::Direct);
    }
    Err(AugurError::SizeLimit(format!(
        "diff is {} bytes, over the {}-byte maximum, and chunking is disabled",
        diff.len(),
        config.max_diff_bytes
    )))
}
