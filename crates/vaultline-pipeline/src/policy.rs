//! The age threshold that ends pagination.

use vaultline_config::{Comparison, RetentionSection};

/// Decides when an event is old enough to end the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgePolicy {
    older_days: i64,
    comparison: Comparison,
}

impl AgePolicy {
    /// Create a policy.
    #[must_use]
    pub fn new(older_days: u32, comparison: Comparison) -> Self {
        Self {
            older_days: i64::from(older_days),
            comparison,
        }
    }

    /// Build a policy from the `[retention]` section.
    #[must_use]
    pub fn from_section(section: &RetentionSection) -> Self {
        Self::new(section.older_days, section.comparison)
    }

    /// Threshold in days.
    #[must_use]
    pub fn older_days(&self) -> i64 {
        self.older_days
    }

    /// Whether an event `age_days` old ends the run.
    #[must_use]
    pub fn is_exceeded(&self, age_days: i64) -> bool {
        match self.comparison {
            Comparison::Strict => age_days > self.older_days,
            Comparison::Inclusive => age_days >= self.older_days,
        }
    }
}

impl Default for AgePolicy {
    fn default() -> Self {
        Self::from_section(&RetentionSection::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_boundary() {
        let policy = AgePolicy::new(3, Comparison::Strict);
        assert!(!policy.is_exceeded(2));
        assert!(!policy.is_exceeded(3));
        assert!(policy.is_exceeded(4));
    }

    #[test]
    fn test_inclusive_boundary() {
        let policy = AgePolicy::new(3, Comparison::Inclusive);
        assert!(!policy.is_exceeded(2));
        assert!(policy.is_exceeded(3));
        assert!(policy.is_exceeded(4));
    }

    #[test]
    fn test_future_events_never_exceed() {
        let policy = AgePolicy::new(0, Comparison::Strict);
        assert!(!policy.is_exceeded(-1));
        assert!(!policy.is_exceeded(0));
    }

    #[test]
    fn test_default_matches_config_default() {
        let policy = AgePolicy::default();
        assert_eq!(policy.older_days(), 1);
        assert!(!policy.is_exceeded(1));
        assert!(policy.is_exceeded(2));
    }
}
