use augur_core::{AugurError, RiskAssessment};

const SYSTEM_PROMPT: &str = "\
You are Augur, an expert release engineer. Your job is to assess the risk \
of a code change from its unified diff.

Rules:
- Judge only what the diff shows; do not speculate about code you cannot see
- Weigh blast radius: config, auth, data, and migration changes outrank cosmetics
- Name concrete risk factors, not generic advice
- Report missing test coverage honestly

Respond with a single JSON object and nothing else:
{
  \"risk_level\": \"LOW\" | \"MEDIUM\" | \"HIGH\",
  \"risk_summary\": \"One-paragraph summary of the change and its risk\",
  \"risk_factors\": [\"specific risk\", ...],
  \"reviewer_focus_areas\": [\"where a reviewer should look\", ...],
  \"missing_tests\": true | false,
  \"migration_risk\": \"NONE\" | \"LOW\" | \"HIGH\"
}

Do not wrap the JSON in markdown code fences.";

/// Build the system prompt for the risk-assessment LLM.
///
/// # Examples
///
/// ```
/// use augur_analysis::prompt::build_system_prompt;
///
/// let prompt = build_system_prompt();
/// assert!(prompt.contains("Augur"));
/// assert!(prompt.contains("risk_level"));
/// ```
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

/// Build the user prompt containing the diff to assess.
///
/// When the diff is a chunk of a larger change, `chunk_context` carries a
/// label and file summary so the model knows it is seeing a part, not the
/// whole.
///
/// # Examples
///
/// ```
/// use augur_analysis::prompt::build_analysis_prompt;
///
/// let prompt = build_analysis_prompt("+new line", None);
/// assert!(prompt.contains("+new line"));
///
/// let prompt = build_analysis_prompt("+new line", Some("chunk 2 of 5 (src/db.rs)"));
/// assert!(prompt.contains("chunk 2 of 5"));
/// ```
pub fn build_analysis_prompt(diff: &str, chunk_context: Option<&str>) -> String {
    let mut prompt = String::new();
    if let Some(ctx) = chunk_context {
        prompt.push_str(&format!(
            "You are seeing one piece of a larger change: {ctx}. \
             Assess the risk of this piece on its own.\n\n"
        ));
    }
    prompt.push_str(&format!(
        "Assess the risk of the following code changes:\n\n```diff\n{diff}\n```\n"
    ));
    prompt
}

/// Parse and validate a completion response as a [`RiskAssessment`].
///
/// Validation is strict: malformed JSON, a missing field, an unknown enum
/// value, a wrongly-typed field, markdown code fences around the payload,
/// or an empty summary are all rejected as [`AugurError::Schema`], never
/// coerced. Splitting a chunk cannot fix a malformed response, so this
/// error class does not trigger re-splitting.
///
/// # Errors
///
/// Returns [`AugurError::Schema`] on any deviation from the wire shape.
///
/// # Examples
///
/// ```
/// use augur_analysis::prompt::parse_assessment_response;
///
/// let json = r#"{
///     "risk_level": "LOW",
///     "risk_summary": "Comment-only change",
///     "risk_factors": [],
///     "reviewer_focus_areas": [],
///     "missing_tests": false,
///     "migration_risk": "NONE"
/// }"#;
/// let assessment = parse_assessment_response(json).unwrap();
/// assert_eq!(assessment.summary, "Comment-only change");
/// ```
pub fn parse_assessment_response(response: &str) -> Result<RiskAssessment, AugurError> {
    let assessment: RiskAssessment = serde_json::from_str(response.trim())
        .map_err(|e| AugurError::Schema(format!("completion response failed validation: {e}")))?;
    assessment.validate()?;
    Ok(assessment)
}
