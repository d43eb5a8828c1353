use std::fmt;
use std::future::Future;
use std::pin::Pin;

use augur_chunk::budget::{evaluate, SizeDecision};
use augur_chunk::splitter::{file_summary, split_diff};
use augur_core::{AnalysisConfig, AugurError, RiskAssessment};
use serde::Serialize;

use crate::combine::combine_assessments;
use crate::fallback::fallback_assessment;
use crate::llm::{ChatMessage, Completion, Role};
use crate::prompt;

/// Fixed fraction by which the chunk budget shrinks at each recursion
/// level. Together with the configured floor this bounds recursion depth
/// at `log4(chunk_budget / min_chunk) + 1` levels.
const SHRINK_DIVISOR: usize = 4;

/// One unit of recursive analysis work: a chunk of the diff, its position
/// in the split tree (`"2.3"` = third sub-chunk of the second chunk), and
/// the byte budget it was produced under.
#[derive(Debug, Clone)]
pub struct ChunkJob {
    /// Chunk text.
    pub diff: String,
    /// Dotted path label for logs and prompts.
    pub label: String,
    /// Budget this chunk was split under; shrinks on re-splits.
    pub budget: usize,
}

/// Statistics about an analysis run.
///
/// # Examples
///
/// ```
/// use augur_analysis::engine::AnalysisStats;
///
/// let stats = AnalysisStats {
///     llm_calls: 7,
///     chunks_analyzed: 5,
///     chunks_skipped: 1,
///     fallback_used: false,
///     model_used: "gpt-4o".into(),
/// };
/// assert!(stats.llm_calls >= stats.chunks_analyzed);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    /// Completion calls made, including failed attempts.
    pub llm_calls: usize,
    /// Chunks (or the whole diff) that produced a valid assessment.
    pub chunks_analyzed: usize,
    /// Chunks abandoned as unanalyzable.
    pub chunks_skipped: usize,
    /// Whether the result is the synthesized fallback.
    pub fallback_used: bool,
    /// Model identifier used for the run.
    pub model_used: String,
}

/// Result of a completed analysis: the combined assessment plus run stats.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The final risk assessment.
    pub assessment: RiskAssessment,
    /// Statistics about the run.
    pub stats: AnalysisStats,
}

/// Chunked risk-analysis engine.
///
/// Drives the full pipeline: size evaluation, boundary-aware splitting,
/// recursive retry-with-subdivision on size/rate-limit failures, partial
/// result combination, and fallback synthesis. Generic over the
/// [`Completion`] seam so the retry policy is testable without a network.
///
/// Chunks are processed sequentially; the interaction with a shared
/// provider quota stays predictable, and every combine operation is
/// order-independent anyway. Cancellation is dropping the returned
/// future: no partial combination runs.
pub struct AnalysisEngine<C> {
    client: C,
    config: AnalysisConfig,
}

impl<C: Completion> AnalysisEngine<C> {
    /// Create an engine from a completion client and analysis config.
    pub fn new(client: C, config: AnalysisConfig) -> Self {
        Self { client, config }
    }

    /// Analyze a diff and always produce an assessment unless the input
    /// itself is unusable or the provider fails in a non-recoverable way.
    ///
    /// # Errors
    ///
    /// - [`AugurError::Input`] for an empty or whitespace-only diff.
    /// - [`AugurError::SizeLimit`] only when chunking is disabled and the
    ///   diff exceeds the hard maximum.
    /// - [`AugurError::Schema`] when a direct (unchunked) response fails
    ///   validation.
    /// - [`AugurError::Transport`] for network/auth failures, always.
    pub async fn analyze(&self, diff: &str) -> Result<AnalysisResult, AugurError> {
        if diff.trim().is_empty() {
            return Err(AugurError::Input(
                "diff is empty or whitespace-only".into(),
            ));
        }

        let mut stats = AnalysisStats {
            llm_calls: 0,
            chunks_analyzed: 0,
            chunks_skipped: 0,
            fallback_used: false,
            model_used: self.client.model().to_string(),
        };

        let assessment = match evaluate(diff, &self.config)? {
            SizeDecision::Direct => {
                match self.request_assessment(diff, None, &mut stats).await {
                    Ok(assessment) => assessment,
                    Err(err) if err.is_size_limit() && self.config.chunking => {
                        // The provider's limits disagreed with our sizing;
                        // treat the whole diff as one failed chunk.
                        let job = ChunkJob {
                            diff: diff.to_string(),
                            label: "1".into(),
                            budget: self.config.chunk_budget_bytes,
                        };
                        let collected = match self.shrink_and_recurse(job, &mut stats).await {
                            Ok(collected) => collected,
                            Err(AugurError::Schema(reason)) => {
                                eprintln!("warning: skipping chunk 1: {reason}");
                                stats.chunks_skipped += 1;
                                Vec::new()
                            }
                            Err(other) => return Err(other),
                        };
                        self.finish(diff.len(), collected, &mut stats)
                    }
                    Err(other) => return Err(other),
                }
            }
            SizeDecision::Chunk => {
                let chunks = split_diff(diff, self.config.chunk_budget_bytes)?;
                let mut collected = Vec::new();
                for (index, chunk) in chunks.into_iter().enumerate() {
                    let job = ChunkJob {
                        diff: chunk,
                        label: format!("{}", index + 1),
                        budget: self.config.chunk_budget_bytes,
                    };
                    let label = job.label.clone();
                    match self.analyze_chunk(job, &mut stats).await {
                        Ok(assessments) => collected.extend(assessments),
                        Err(AugurError::Schema(reason)) => {
                            eprintln!("warning: skipping chunk {label}: {reason}");
                            stats.chunks_skipped += 1;
                        }
                        Err(other) => return Err(other),
                    }
                }
                self.finish(diff.len(), collected, &mut stats)
            }
        };

        Ok(AnalysisResult { assessment, stats })
    }

    /// Combine whatever survived, or synthesize the fallback when nothing
    /// did.
    fn finish(
        &self,
        diff_bytes: usize,
        collected: Vec<RiskAssessment>,
        stats: &mut AnalysisStats,
    ) -> RiskAssessment {
        combine_assessments(collected).unwrap_or_else(|| {
            stats.fallback_used = true;
            fallback_assessment(diff_bytes)
        })
    }

    /// Recursively analyze one chunk, shrinking the budget on size/rate
    /// failures. Returns the flat list of assessments this chunk's subtree
    /// produced; an empty list means every piece was skipped.
    fn analyze_chunk<'a>(
        &'a self,
        job: ChunkJob,
        stats: &'a mut AnalysisStats,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RiskAssessment>, AugurError>> + 'a>> {
        Box::pin(async move {
            let context = format!("chunk {} ({})", job.label, file_summary(&job.diff));
            match self
                .request_assessment(&job.diff, Some(&context), &mut *stats)
                .await
            {
                Ok(assessment) => Ok(vec![assessment]),
                Err(err) if err.is_size_limit() => {
                    self.shrink_and_recurse(job, &mut *stats).await
                }
                Err(other) => Err(other),
            }
        })
    }

    /// Re-split a chunk that failed for size at a quarter of its budget,
    /// floored at the configured minimum, and recurse into the pieces.
    /// When the budget can no longer strictly decrease, the chunk is
    /// skipped: partial coverage beats total failure.
    async fn shrink_and_recurse(
        &self,
        job: ChunkJob,
        stats: &mut AnalysisStats,
    ) -> Result<Vec<RiskAssessment>, AugurError> {
        let next_budget = (job.budget / SHRINK_DIVISOR).max(self.config.min_chunk_bytes);
        if next_budget >= job.budget {
            eprintln!(
                "warning: chunk {} still over provider limits at the {}-byte floor, skipping",
                job.label, job.budget
            );
            stats.chunks_skipped += 1;
            return Ok(Vec::new());
        }

        let sub_chunks = split_diff(&job.diff, next_budget)?;
        let mut collected = Vec::new();
        for (index, sub) in sub_chunks.into_iter().enumerate() {
            let sub_job = ChunkJob {
                diff: sub,
                label: format!("{}.{}", job.label, index + 1),
                budget: next_budget,
            };
            collected.extend(self.analyze_chunk(sub_job, &mut *stats).await?);
        }
        Ok(collected)
    }

    /// One completion round-trip: prompt, call, strict validation.
    async fn request_assessment(
        &self,
        diff: &str,
        chunk_context: Option<&str>,
        stats: &mut AnalysisStats,
    ) -> Result<RiskAssessment, AugurError> {
        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: prompt::build_system_prompt(),
            },
            ChatMessage {
                role: Role::User,
                content: prompt::build_analysis_prompt(diff, chunk_context),
            },
        ];

        stats.llm_calls += 1;
        let response = self.client.chat(messages).await?;
        let assessment = prompt::parse_assessment_response(&response)?;
        stats.chunks_analyzed += 1;
        Ok(assessment)
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Risk Assessment")?;
        writeln!(f, "===============")?;
        writeln!(
            f,
            "Model: {} | Risk: {} | Migration risk: {} | Missing tests: {}\n",
            self.stats.model_used,
            self.assessment.risk_level,
            self.assessment.migration_risk,
            if self.assessment.missing_tests {
                "yes"
            } else {
                "no"
            },
        )?;
        writeln!(f, "{}\n", self.assessment.summary)?;

        if !self.assessment.risk_factors.is_empty() {
            writeln!(f, "Risk factors:")?;
            for factor in &self.assessment.risk_factors {
                writeln!(f, "  - {factor}")?;
            }
        }
        if !self.assessment.reviewer_focus_areas.is_empty() {
            writeln!(f, "Reviewer focus areas:")?;
            for area in &self.assessment.reviewer_focus_areas {
                writeln!(f, "  - {area}")?;
            }
        }

        Ok(())
    }
}

impl AnalysisResult {
    /// Render the analysis result as markdown.
    ///
    /// # Examples
    ///
    /// ```
    /// use augur_analysis::engine::{AnalysisResult, AnalysisStats};
    /// use augur_analysis::fallback::fallback_assessment;
    ///
    /// let result = AnalysisResult {
    ///     assessment: fallback_assessment(100),
    ///     stats: AnalysisStats {
    ///         llm_calls: 0,
    ///         chunks_analyzed: 0,
    ///         chunks_skipped: 0,
    ///         fallback_used: true,
    ///         model_used: "gpt-4o".into(),
    ///     },
    /// };
    /// assert!(result.to_markdown().contains("# Risk Assessment"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let emoji = match self.assessment.risk_level {
            augur_core::RiskLevel::Low => "\u{1f7e2}",
            augur_core::RiskLevel::Medium => "\u{1f7e1}",
            augur_core::RiskLevel::High => "\u{1f534}",
        };

        let mut out = String::new();
        out.push_str("# Risk Assessment\n\n");
        out.push_str(&format!(
            "**Model:** {} | **Risk:** {emoji} {} | **Migration risk:** {} | **Missing tests:** {}\n\n",
            self.stats.model_used,
            self.assessment.risk_level,
            self.assessment.migration_risk,
            if self.assessment.missing_tests {
                "yes"
            } else {
                "no"
            },
        ));
        out.push_str(&format!("{}\n\n", self.assessment.summary));

        if !self.assessment.risk_factors.is_empty() {
            out.push_str("## Risk factors\n\n");
            for factor in &self.assessment.risk_factors {
                out.push_str(&format!("- {factor}\n"));
            }
            out.push('\n');
        }
        if !self.assessment.reviewer_focus_areas.is_empty() {
            out.push_str("## Reviewer focus areas\n\n");
            for area in &self.assessment.reviewer_focus_areas {
                out.push_str(&format!("- {area}\n"));
            }
        }
        out
    }
}
