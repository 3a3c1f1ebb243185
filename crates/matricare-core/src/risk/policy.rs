//! Threshold classification and escalation decisions.

use crate::models::{Observation, Patient, RiskAssessment, RiskLevel};

use super::scorer;

/// Tunable thresholds for classification and auto follow-up timing.
///
/// Defaults match the clinical protocol: score 7 and above is severe,
/// 4 and above is moderate, with follow-up calls due in 2 and 5 days
/// respectively.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationConfig {
    pub severe_threshold: u32,
    pub moderate_threshold: u32,
    pub severe_follow_up_days: i64,
    pub moderate_follow_up_days: i64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        EscalationConfig {
            severe_threshold: 7,
            moderate_threshold: 4,
            severe_follow_up_days: 2,
            moderate_follow_up_days: 5,
        }
    }
}

/// What the engine must do after an observation is scored.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationDecision {
    /// Raise an alert for the care team.
    pub raise_alert: bool,
    /// Schedule an automatic follow-up this many days out, if any.
    pub follow_up_in_days: Option<i64>,
}

/// Maps scores to risk levels and levels to escalation actions.
#[derive(Debug, Clone, Default)]
pub struct EscalationPolicy {
    config: EscalationConfig,
}

impl EscalationPolicy {
    pub fn new() -> Self {
        EscalationPolicy::default()
    }

    pub fn with_config(config: EscalationConfig) -> Self {
        EscalationPolicy { config }
    }

    pub fn config(&self) -> &EscalationConfig {
        &self.config
    }

    /// Classify a total score against the configured thresholds.
    pub fn classify(&self, score: u32) -> RiskLevel {
        if score >= self.config.severe_threshold {
            RiskLevel::Severe
        } else if score >= self.config.moderate_threshold {
            RiskLevel::Moderate
        } else {
            RiskLevel::Stable
        }
    }

    /// Score an observation and classify the result in one step.
    pub fn assess(&self, observation: &Observation, patient: &Patient) -> RiskAssessment {
        let (score, factors) = scorer::score(observation, patient);
        RiskAssessment::new(score, self.classify(score), factors)
    }

    /// Decide alert and follow-up actions for a classified level.
    ///
    /// Alerts fire for moderate and above. A manual follow-up request
    /// from staff suppresses the automatic one, and automatic
    /// scheduling can be switched off entirely per observation.
    pub fn decide(
        &self,
        level: RiskLevel,
        manual_follow_up_requested: bool,
        auto_follow_up_enabled: bool,
    ) -> EscalationDecision {
        let raise_alert = level >= RiskLevel::Moderate;

        let follow_up_in_days = if manual_follow_up_requested || !auto_follow_up_enabled {
            None
        } else {
            match level {
                RiskLevel::Severe => Some(self.config.severe_follow_up_days),
                RiskLevel::Moderate => Some(self.config.moderate_follow_up_days),
                RiskLevel::Stable => None,
            }
        };

        EscalationDecision { raise_alert, follow_up_in_days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_thresholds() {
        let policy = EscalationPolicy::new();
        assert_eq!(policy.classify(0), RiskLevel::Stable);
        assert_eq!(policy.classify(3), RiskLevel::Stable);
        assert_eq!(policy.classify(4), RiskLevel::Moderate);
        assert_eq!(policy.classify(6), RiskLevel::Moderate);
        assert_eq!(policy.classify(7), RiskLevel::Severe);
        assert_eq!(policy.classify(25), RiskLevel::Severe);
    }

    #[test]
    fn test_custom_thresholds() {
        let policy = EscalationPolicy::with_config(EscalationConfig {
            severe_threshold: 10,
            moderate_threshold: 5,
            ..EscalationConfig::default()
        });
        assert_eq!(policy.classify(7), RiskLevel::Moderate);
        assert_eq!(policy.classify(10), RiskLevel::Severe);
    }

    #[test]
    fn test_assess_bundles_score_level_and_factors() {
        let patient = Patient::new("MR-9".into(), "Sunita".into(), 42);
        let mut obs = Observation::new(patient.id.clone(), "user-1".into());
        obs.bp_systolic = Some(165);
        obs.bp_diastolic = Some(105);
        obs.bleeding_reported = Some(true);

        let assessment = EscalationPolicy::new().assess(&obs, &patient);
        assert_eq!(assessment.score(), 4 + 3 + 4);
        assert_eq!(assessment.level(), RiskLevel::Severe);
        assert_eq!(assessment.factors().len(), 3);
    }

    #[test]
    fn test_decide_alert_fires_for_moderate_and_above() {
        let policy = EscalationPolicy::new();
        assert!(!policy.decide(RiskLevel::Stable, false, true).raise_alert);
        assert!(policy.decide(RiskLevel::Moderate, false, true).raise_alert);
        assert!(policy.decide(RiskLevel::Severe, false, true).raise_alert);
    }

    #[test]
    fn test_decide_follow_up_windows() {
        let policy = EscalationPolicy::new();
        assert_eq!(policy.decide(RiskLevel::Stable, false, true).follow_up_in_days, None);
        assert_eq!(policy.decide(RiskLevel::Moderate, false, true).follow_up_in_days, Some(5));
        assert_eq!(policy.decide(RiskLevel::Severe, false, true).follow_up_in_days, Some(2));
    }

    #[test]
    fn test_manual_request_suppresses_auto_follow_up() {
        let policy = EscalationPolicy::new();
        let decision = policy.decide(RiskLevel::Severe, true, true);
        assert!(decision.raise_alert);
        assert_eq!(decision.follow_up_in_days, None);
    }

    #[test]
    fn test_auto_follow_up_can_be_disabled() {
        let policy = EscalationPolicy::new();
        let decision = policy.decide(RiskLevel::Severe, false, false);
        assert!(decision.raise_alert);
        assert_eq!(decision.follow_up_in_days, None);
    }

    proptest! {
        #[test]
        fn prop_classification_is_monotone(a in 0u32..40, b in 0u32..40) {
            let policy = EscalationPolicy::new();
            if a <= b {
                prop_assert!(policy.classify(a) <= policy.classify(b));
            } else {
                prop_assert!(policy.classify(a) >= policy.classify(b));
            }
        }

        #[test]
        fn prop_classification_respects_config(
            score in 0u32..40,
            moderate in 1u32..10,
            extra in 1u32..10,
        ) {
            let severe = moderate + extra;
            let policy = EscalationPolicy::with_config(EscalationConfig {
                severe_threshold: severe,
                moderate_threshold: moderate,
                ..EscalationConfig::default()
            });
            let level = policy.classify(score);
            prop_assert_eq!(level == RiskLevel::Severe, score >= severe);
            prop_assert_eq!(level == RiskLevel::Stable, score < moderate);
        }

        #[test]
        fn prop_manual_always_wins(level in 0u32..3, auto in proptest::bool::ANY) {
            let level = match level {
                0 => RiskLevel::Stable,
                1 => RiskLevel::Moderate,
                _ => RiskLevel::Severe,
            };
            let decision = EscalationPolicy::new().decide(level, true, auto);
            prop_assert_eq!(decision.follow_up_in_days, None);
        }
    }
}
