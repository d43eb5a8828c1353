use augur_core::RiskLevel;

#[test]
fn fail_on_passes_when_assessed_risk_is_below_threshold() {
    // Simulate: LOW assessment, threshold is HIGH
    let assessed = RiskLevel::Low;
    let threshold = RiskLevel::High;

    assert!(
        !assessed.meets_threshold(threshold),
        "should not fail below the threshold"
    );
}

#[test]
fn fail_on_trips_when_assessed_risk_meets_threshold() {
    // Simulate: HIGH assessment, threshold is MEDIUM
    let assessed = RiskLevel::High;
    let threshold = RiskLevel::Medium;

    assert!(
        assessed.meets_threshold(threshold),
        "should fail when high risk meets a medium threshold"
    );
}

#[test]
fn fail_on_medium_catches_medium_and_high() {
    let threshold = RiskLevel::Medium;

    assert!(RiskLevel::High.meets_threshold(threshold));
    assert!(RiskLevel::Medium.meets_threshold(threshold));
    assert!(!RiskLevel::Low.meets_threshold(threshold));
}
