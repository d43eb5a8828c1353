use augur_core::RiskAssessment;

/// Merge per-chunk assessments into one, conservatively.
///
/// Precedence rules, all order-independent:
/// - `risk_level` is the maximum across inputs; one high-risk chunk makes
///   the whole diff high-risk, never diluted by low-risk siblings.
/// - `risk_factors` and `reviewer_focus_areas` are deduplicated unions,
///   first occurrence kept.
/// - `missing_tests` is the logical OR.
/// - `migration_risk` is the maximum.
/// - `summary` comes from the first input that attains the maximum risk
///   level, annotated with the number of chunks combined.
///
/// A single input is returned unchanged, and an empty input yields `None`
/// so the caller can fall back.
///
/// # Examples
///
/// ```
/// use augur_analysis::combine::combine_assessments;
/// use augur_core::{MigrationRisk, RiskAssessment, RiskLevel};
///
/// let low = RiskAssessment {
///     risk_level: RiskLevel::Low,
///     summary: "Doc tweaks".into(),
///     risk_factors: vec!["drift".into()],
///     reviewer_focus_areas: vec![],
///     missing_tests: false,
///     migration_risk: MigrationRisk::None,
/// };
/// let high = RiskAssessment {
///     risk_level: RiskLevel::High,
///     summary: "Schema change".into(),
///     risk_factors: vec!["drift".into(), "data loss".into()],
///     reviewer_focus_areas: vec![],
///     missing_tests: true,
///     migration_risk: MigrationRisk::High,
/// };
///
/// let combined = combine_assessments(vec![low, high]).unwrap();
/// assert_eq!(combined.risk_level, RiskLevel::High);
/// assert_eq!(combined.risk_factors, vec!["drift".to_string(), "data loss".to_string()]);
/// assert!(combined.missing_tests);
/// assert!(combined.summary.starts_with("Schema change"));
/// ```
pub fn combine_assessments(mut inputs: Vec<RiskAssessment>) -> Option<RiskAssessment> {
    if inputs.len() <= 1 {
        return inputs.pop();
    }

    let count = inputs.len();
    let risk_level = inputs.iter().map(|a| a.risk_level).max()?;
    let migration_risk = inputs.iter().map(|a| a.migration_risk).max()?;
    let missing_tests = inputs.iter().any(|a| a.missing_tests);

    // First input at the maximum level wins the summary
    let lead = inputs.iter().find(|a| a.risk_level == risk_level)?;
    let summary = format!("{} (across {count} analyzed chunks)", lead.summary);

    let mut risk_factors: Vec<String> = Vec::new();
    let mut reviewer_focus_areas: Vec<String> = Vec::new();
    for assessment in &inputs {
        for factor in &assessment.risk_factors {
            if !risk_factors.contains(factor) {
                risk_factors.push(factor.clone());
            }
        }
        for area in &assessment.reviewer_focus_areas {
            if !reviewer_focus_areas.contains(area) {
                reviewer_focus_areas.push(area.clone());
            }
        }
    }

    Some(RiskAssessment {
        risk_level,
        summary,
        risk_factors,
        reviewer_focus_areas,
        missing_tests,
        migration_risk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use augur_core::{MigrationRisk, RiskLevel};

    fn assessment(level: RiskLevel, summary: &str) -> RiskAssessment {
        RiskAssessment {
            risk_level: level,
            summary: summary.into(),
            risk_factors: vec![],
            reviewer_focus_areas: vec![],
            missing_tests: false,
            migration_risk: MigrationRisk::None,
        }
    }

    #[test]
    fn empty_input_yields_none() {
        assert!(combine_assessments(vec![]).is_none());
    }

    #[test]
    fn single_input_is_returned_unchanged() {
        let mut single = assessment(RiskLevel::Medium, "one chunk");
        single.risk_factors = vec!["a".into(), "a".into()]; // even dupes survive
        let combined = combine_assessments(vec![single.clone()]).unwrap();
        assert_eq!(combined, single);
    }

    #[test]
    fn risk_level_is_never_diluted() {
        let combined = combine_assessments(vec![
            assessment(RiskLevel::Low, "l"),
            assessment(RiskLevel::High, "h"),
            assessment(RiskLevel::Medium, "m"),
        ])
        .unwrap();
        assert_eq!(combined.risk_level, RiskLevel::High);
    }

    #[test]
    fn summary_comes_from_first_max_level_input() {
        let combined = combine_assessments(vec![
            assessment(RiskLevel::Medium, "first medium"),
            assessment(RiskLevel::High, "first high"),
            assessment(RiskLevel::High, "second high"),
        ])
        .unwrap();
        assert!(combined.summary.starts_with("first high"));
        assert!(combined.summary.contains("3 analyzed chunks"));
    }

    #[test]
    fn shared_risk_factors_are_deduplicated() {
        let mut a = assessment(RiskLevel::Low, "a");
        a.risk_factors = vec!["unbounded retry".into(), "lock contention".into()];
        let mut b = assessment(RiskLevel::Low, "b");
        b.risk_factors = vec!["unbounded retry".into(), "cache stampede".into()];

        let combined = combine_assessments(vec![a, b]).unwrap();
        let hits = combined
            .risk_factors
            .iter()
            .filter(|f| *f == "unbounded retry")
            .count();
        assert_eq!(hits, 1);
        assert_eq!(combined.risk_factors.len(), 3);
    }

    #[test]
    fn focus_areas_union_preserves_first_seen_order() {
        let mut a = assessment(RiskLevel::Low, "a");
        a.reviewer_focus_areas = vec!["auth".into()];
        let mut b = assessment(RiskLevel::Low, "b");
        b.reviewer_focus_areas = vec!["db".into(), "auth".into()];

        let combined = combine_assessments(vec![a, b]).unwrap();
        assert_eq!(
            combined.reviewer_focus_areas,
            vec!["auth".to_string(), "db".to_string()]
        );
    }

    #[test]
    fn missing_tests_is_or_across_inputs() {
        let mut a = assessment(RiskLevel::Low, "a");
        let b = assessment(RiskLevel::Low, "b");
        assert!(!combine_assessments(vec![a.clone(), b.clone()])
            .unwrap()
            .missing_tests);

        a.missing_tests = true;
        assert!(combine_assessments(vec![a, b]).unwrap().missing_tests);
    }

    #[test]
    fn migration_risk_is_max_across_inputs() {
        let mut a = assessment(RiskLevel::Low, "a");
        a.migration_risk = MigrationRisk::Low;
        let mut b = assessment(RiskLevel::Low, "b");
        b.migration_risk = MigrationRisk::High;
        let c = assessment(RiskLevel::Low, "c");

        let combined = combine_assessments(vec![a, b, c]).unwrap();
        assert_eq!(combined.migration_risk, MigrationRisk::High);
    }

    #[test]
    fn all_none_migration_risk_stays_none() {
        let combined = combine_assessments(vec![
            assessment(RiskLevel::Low, "a"),
            assessment(RiskLevel::Low, "b"),
        ])
        .unwrap();
        assert_eq!(combined.migration_risk, MigrationRisk::None);
    }

    #[test]
    fn combination_is_order_independent_apart_from_summary_choice() {
        let mut a = assessment(RiskLevel::Medium, "a");
        a.risk_factors = vec!["x".into()];
        let mut b = assessment(RiskLevel::High, "b");
        b.risk_factors = vec!["y".into()];

        let fwd = combine_assessments(vec![a.clone(), b.clone()]).unwrap();
        let rev = combine_assessments(vec![b, a]).unwrap();
        assert_eq!(fwd.risk_level, rev.risk_level);
        assert_eq!(fwd.missing_tests, rev.missing_tests);
        assert_eq!(fwd.migration_risk, rev.migration_risk);
        let mut f = fwd.risk_factors.clone();
        let mut r = rev.risk_factors.clone();
        f.sort();
        r.sort();
        assert_eq!(f, r);
    }
}
