//! Intent Classifier
//!
//! Maps a chat message onto one of the agent intents:
//! - RiskAssessment: "is this risky?", "risk of buying a house"
//! - ScenarioSimulation: "simulate a 10% raise", "what if I retire at 55"
//! - GeneralAdvice: everything else
//!
//! Rules are evaluated in order and the first hit wins.

use crate::models::Intent;

/// Pluggable classification strategy
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, message: &str) -> Intent;
}

/// Static keyword lists — zero allocation
const RISK_KEYWORDS: &[&str] = &["risk"];

const SIMULATION_KEYWORDS: &[&str] = &["simulate", "what if"];

/// One ordered rule: any keyword present in the lower-cased message selects
/// the intent
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

impl IntentRule {
    pub fn new(intent: Intent, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|kw| kw.to_lowercase()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw.as_str()))
    }
}

/// Substring heuristic classifier
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<IntentRule>,
    fallback: Intent,
}

impl KeywordClassifier {
    pub fn new(rules: Vec<IntentRule>, fallback: Intent) -> Self {
        Self { rules, fallback }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(
            vec![
                IntentRule::new(Intent::RiskAssessment, RISK_KEYWORDS),
                IntentRule::new(Intent::ScenarioSimulation, SIMULATION_KEYWORDS),
            ],
            Intent::GeneralAdvice,
        )
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, message: &str) -> Intent {
        let lowered = message.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.intent)
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_messages() {
        let classifier = KeywordClassifier::default();
        let cases = vec![
            "Is buying a car right now a RISK?",
            "what's my risk exposure",
            "these investments look risky",
        ];

        for c in cases {
            assert_eq!(classifier.classify(c), Intent::RiskAssessment, "{}", c);
        }
    }

    #[test]
    fn test_simulation_messages() {
        let classifier = KeywordClassifier::default();
        let cases = vec![
            "Simulate saving $200 a month",
            "what if I lose my job?",
            "WHAT IF rent goes up",
        ];

        for c in cases {
            assert_eq!(classifier.classify(c), Intent::ScenarioSimulation, "{}", c);
        }
    }

    #[test]
    fn test_risk_takes_precedence_over_simulation() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify("what if the risk of a recession doubles?"),
            Intent::RiskAssessment
        );
        assert_eq!(
            classifier.classify("simulate a risk-free portfolio"),
            Intent::RiskAssessment
        );
    }

    #[test]
    fn test_everything_else_is_general_advice() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify("how do I save more?"), Intent::GeneralAdvice);
        assert_eq!(classifier.classify(""), Intent::GeneralAdvice);
        // "what" alone is not "what if"
        assert_eq!(classifier.classify("what is inflation"), Intent::GeneralAdvice);
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let classifier = KeywordClassifier::new(
            vec![IntentRule::new(Intent::ScenarioSimulation, &["Forecast"])],
            Intent::GeneralAdvice,
        );

        assert_eq!(classifier.classify("forecast my savings"), Intent::ScenarioSimulation);
        assert_eq!(classifier.classify("risk check"), Intent::GeneralAdvice);
    }
}
