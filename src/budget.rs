//! Real-time budget rule engine
//!
//! Checks a prospective purchase against fixed per-category ceilings.
//! Deterministic, no error conditions.

use crate::models::SpendingDecision;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Default per-category ceilings
const CATEGORY_LIMITS: &[(&str, i64)] = &[
    ("Food", 500),
    ("Shopping", 300),
    ("Transport", 200),
];

const GENERIC_LIMIT: i64 = 1000;

const DEFERRAL_SUGGESTION: &str =
    "Consider deferring this purchase or finding a cheaper alternative.";

#[derive(Debug, Clone)]
pub struct BudgetRules {
    limits: HashMap<String, Decimal>,
    default_limit: Decimal,
}

impl BudgetRules {
    pub fn new(default_limit: Decimal) -> Self {
        Self {
            limits: HashMap::new(),
            default_limit,
        }
    }

    pub fn with_limit(mut self, category: impl Into<String>, limit: Decimal) -> Self {
        self.limits.insert(category.into(), limit);
        self
    }

    pub fn set_default_limit(&mut self, limit: Decimal) {
        self.default_limit = limit;
    }

    /// Ceiling for a category; unlisted categories fall back to the default.
    /// Lookup is case-sensitive.
    pub fn limit_for(&self, category: &str) -> Decimal {
        self.limits
            .get(category)
            .copied()
            .unwrap_or(self.default_limit)
    }

    pub fn check(&self, amount: Decimal, category: &str) -> SpendingDecision {
        let limit = self.limit_for(category);

        // strictly greater: spending exactly the ceiling is allowed
        if amount > limit {
            return SpendingDecision {
                allowed: false,
                alert: Some(format!(
                    "Alert: This purchase exceeds your {} limit of ${}.",
                    category, limit
                )),
                suggestion: Some(DEFERRAL_SUGGESTION.to_string()),
            };
        }

        SpendingDecision::allow()
    }
}

impl Default for BudgetRules {
    fn default() -> Self {
        CATEGORY_LIMITS.iter().fold(
            BudgetRules::new(Decimal::from(GENERIC_LIMIT)),
            |rules, (category, limit)| rules.with_limit(*category, Decimal::from(*limit)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_limit_is_denied() {
        let rules = BudgetRules::default();
        let decision = rules.check(Decimal::from(600), "Food");

        assert!(!decision.allowed);
        let alert = decision.alert.unwrap();
        assert!(alert.contains("500"));
        assert!(alert.contains("Food"));
        assert!(decision.suggestion.is_some());
    }

    #[test]
    fn test_exact_limit_is_allowed() {
        let rules = BudgetRules::default();

        for (category, limit) in CATEGORY_LIMITS {
            let decision = rules.check(Decimal::from(*limit), category);
            assert!(decision.allowed, "{} at its ceiling should pass", category);
            assert_eq!(decision.alert, None);
        }
    }

    #[test]
    fn test_unlisted_category_uses_generic_limit() {
        let rules = BudgetRules::default();

        assert!(rules.check(Decimal::from(999), "Travel").allowed);
        assert!(rules.check(Decimal::from(1000), "Travel").allowed);

        let decision = rules.check(Decimal::new(100001, 2), "Travel");
        assert!(!decision.allowed);
        assert!(decision.alert.unwrap().contains("1000"));
    }

    #[test]
    fn test_category_lookup_is_case_sensitive() {
        let rules = BudgetRules::default();
        // "food" is not the listed "Food", so the generic ceiling applies
        assert!(rules.check(Decimal::from(600), "food").allowed);
    }

    #[test]
    fn test_check_is_repeatable() {
        let rules = BudgetRules::default();
        let first = rules.check(Decimal::from(250), "Transport");
        let second = rules.check(Decimal::from(250), "Transport");
        assert_eq!(first, second);
        assert!(!first.allowed);
    }
}
