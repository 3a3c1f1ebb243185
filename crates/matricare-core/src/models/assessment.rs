//! Risk classification types.

use serde::{Deserialize, Serialize};

/// Severity tier derived from a numeric risk score.
///
/// Ordered so that `Stable < Moderate < Severe`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    /// Score below the moderate threshold
    Stable,
    /// Score at or above the moderate threshold
    Moderate,
    /// Score at or above the severe threshold
    Severe,
}

impl RiskLevel {
    /// Uppercase label used in alert titles and descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Stable => "STABLE",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::Severe => "SEVERE",
        }
    }
}

/// Outcome of scoring one observation against a patient's context.
///
/// Immutable: the factor list is fixed at construction and exposed
/// read-only, in rule-evaluation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    score: u32,
    level: RiskLevel,
    factors: Vec<String>,
}

impl RiskAssessment {
    /// Create an assessment from a computed score, its classification,
    /// and the ordered factor descriptions.
    pub fn new(score: u32, level: RiskLevel, factors: Vec<String>) -> Self {
        Self {
            score,
            level,
            factors,
        }
    }

    /// Total numeric score (sum of all rule contributions).
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Severity tier for the score.
    pub fn level(&self) -> RiskLevel {
        self.level
    }

    /// Triggered risk factors, in rule-evaluation order.
    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    /// Factors flattened into the single string stored on observations
    /// and embedded in alert payloads.
    pub fn joined_factors(&self) -> String {
        self.factors.join("; ")
    }
}
