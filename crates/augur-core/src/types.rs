use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AugurError;

/// Overall risk level of a change.
///
/// Totally ordered: `Low < Medium < High`. Serialized in the uppercase
/// wire form the completion API is instructed to produce.
///
/// # Examples
///
/// ```
/// use augur_core::RiskLevel;
///
/// assert!(RiskLevel::Low < RiskLevel::High);
/// assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"MEDIUM\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Routine change, unlikely to need special attention.
    Low,
    /// Change that warrants a careful look.
    Medium,
    /// Change with real potential to break things.
    High,
}

impl RiskLevel {
    /// Returns `true` if `self` is at least as risky as `threshold`.
    ///
    /// Used by the CLI `--fail-on` flag to turn an assessment into an
    /// exit code.
    ///
    /// # Examples
    ///
    /// ```
    /// use augur_core::RiskLevel;
    ///
    /// assert!(RiskLevel::High.meets_threshold(RiskLevel::Medium));
    /// assert!(RiskLevel::Medium.meets_threshold(RiskLevel::Medium));
    /// assert!(!RiskLevel::Low.meets_threshold(RiskLevel::Medium));
    /// ```
    pub fn meets_threshold(self, threshold: RiskLevel) -> bool {
        self >= threshold
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}

/// Schema or data migration risk carried by a change.
///
/// Totally ordered: `None < Low < High`.
///
/// # Examples
///
/// ```
/// use augur_core::MigrationRisk;
///
/// assert!(MigrationRisk::None < MigrationRisk::High);
/// let r: MigrationRisk = serde_json::from_str("\"NONE\"").unwrap();
/// assert_eq!(r, MigrationRisk::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MigrationRisk {
    /// No migration implications.
    None,
    /// Migration present but routine.
    Low,
    /// Migration that can lose or corrupt data if mishandled.
    High,
}

impl fmt::Display for MigrationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationRisk::None => write!(f, "NONE"),
            MigrationRisk::Low => write!(f, "LOW"),
            MigrationRisk::High => write!(f, "HIGH"),
        }
    }
}

/// A structured risk assessment for one diff or diff chunk.
///
/// The serde field names are the wire shape the completion API is asked to
/// produce, so the same type deserializes API payloads and serializes CLI
/// output. Every field is always present; the combiner builds a new value
/// rather than mutating its inputs.
///
/// # Examples
///
/// ```
/// use augur_core::{MigrationRisk, RiskAssessment, RiskLevel};
///
/// let json = r#"{
///     "risk_level": "MEDIUM",
///     "risk_summary": "Touches the session cache",
///     "risk_factors": ["cache invalidation"],
///     "reviewer_focus_areas": ["expiry handling"],
///     "missing_tests": true,
///     "migration_risk": "NONE"
/// }"#;
/// let assessment: RiskAssessment = serde_json::from_str(json).unwrap();
/// assert_eq!(assessment.risk_level, RiskLevel::Medium);
/// assert_eq!(assessment.migration_risk, MigrationRisk::None);
/// assert!(assessment.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Overall risk level; a combined assessment carries the maximum of
    /// its inputs.
    pub risk_level: RiskLevel,
    /// Human-readable summary. Non-empty in every well-formed assessment.
    #[serde(rename = "risk_summary")]
    pub summary: String,
    /// Distinct risk factors. Semantically a set; duplicates are removed
    /// on merge.
    pub risk_factors: Vec<String>,
    /// Areas a human reviewer should concentrate on. Same shape as
    /// `risk_factors`.
    pub reviewer_focus_areas: Vec<String>,
    /// Whether the change lacks test coverage.
    pub missing_tests: bool,
    /// Migration risk carried by the change.
    pub migration_risk: MigrationRisk,
}

impl RiskAssessment {
    /// Check the well-formedness invariant beyond what serde enforces.
    ///
    /// # Errors
    ///
    /// Returns [`AugurError::Schema`] if the summary is empty or
    /// whitespace-only.
    ///
    /// # Examples
    ///
    /// ```
    /// use augur_core::{MigrationRisk, RiskAssessment, RiskLevel};
    ///
    /// let assessment = RiskAssessment {
    ///     risk_level: RiskLevel::Low,
    ///     summary: "  ".into(),
    ///     risk_factors: vec![],
    ///     reviewer_focus_areas: vec![],
    ///     missing_tests: false,
    ///     migration_risk: MigrationRisk::None,
    /// };
    /// assert!(assessment.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), AugurError> {
        if self.summary.trim().is_empty() {
            return Err(AugurError::Schema("risk_summary must be non-empty".into()));
        }
        Ok(())
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use augur_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary (default).
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
