use augur_core::{MigrationRisk, RiskAssessment, RiskLevel};

/// Build the degraded assessment returned when no chunk could be analyzed.
///
/// Deliberately non-extreme: `Medium` risk so the result is neither falsely
/// reassuring nor alarmist, `missing_tests = true` so a human is pulled in.
/// The output satisfies the same schema as any LLM-derived assessment, so
/// callers never special-case it.
///
/// # Examples
///
/// ```
/// use augur_analysis::fallback::fallback_assessment;
/// use augur_core::RiskLevel;
///
/// let assessment = fallback_assessment(52_000);
/// assert_eq!(assessment.risk_level, RiskLevel::Medium);
/// assert!(assessment.missing_tests);
/// assert!(assessment.summary.contains("52000"));
/// assert!(assessment.validate().is_ok());
/// ```
pub fn fallback_assessment(diff_bytes: usize) -> RiskAssessment {
    RiskAssessment {
        risk_level: RiskLevel::Medium,
        summary: format!(
            "Automated risk analysis could not be completed for this \
             {diff_bytes}-byte diff; every attempted chunk failed. \
             Manual review is required."
        ),
        risk_factors: vec![
            "Automated analysis did not complete; risk is unquantified".into(),
            "Diff exceeded the completion API's size limits even after splitting".into(),
        ],
        reviewer_focus_areas: vec![
            "Review the full change manually".into(),
            "Consider splitting the change into smaller reviewable units".into(),
        ],
        missing_tests: true,
        migration_risk: MigrationRisk::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_schema_valid() {
        let assessment = fallback_assessment(1_024);
        assert!(assessment.validate().is_ok());
        assert!(!assessment.risk_factors.is_empty());
        assert!(!assessment.reviewer_focus_areas.is_empty());
    }

    #[test]
    fn fallback_defaults_are_conservative_not_extreme() {
        let assessment = fallback_assessment(10);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert!(assessment.missing_tests);
        assert_eq!(assessment.migration_risk, MigrationRisk::None);
    }

    #[test]
    fn fallback_names_the_diff_size() {
        let assessment = fallback_assessment(98_765);
        assert!(assessment.summary.contains("98765"));
    }

    #[test]
    fn fallback_roundtrips_through_the_wire_shape() {
        let assessment = fallback_assessment(2_048);
        let json = serde_json::to_string(&assessment).unwrap();
        let parsed: RiskAssessment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, assessment);
    }
}
