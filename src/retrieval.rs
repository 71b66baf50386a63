//! Keyword context retrieval over a small fixed knowledge base
//!
//! Recall-oriented: every fact containing any query token is returned in
//! knowledge-base order. No scoring.

const KNOWLEDGE_BASE: &[&str] = &[
    "Tax Rule 2024: Capital gains tax is 15% for long-term investments.",
    "Economic Indicator: Inflation is currently at 3.2%.",
    "Interest Rates: Average savings account APY is 4.5%.",
    "Housing Market: Prices are trending up in your region.",
];

const FALLBACK_FACT: &str = "General Financial Principles: Spend less than you earn.";

/// Immutable set of facts shared by all requests
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    facts: Vec<String>,
    fallback: String,
}

impl KnowledgeBase {
    pub fn new(facts: Vec<String>, fallback: String) -> Self {
        Self { facts, fallback }
    }

    pub fn retrieve(&self, query: &str) -> Vec<String> {
        let lowered = query.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();

        let results: Vec<String> = self
            .facts
            .iter()
            .filter(|fact| {
                let fact = fact.to_lowercase();
                tokens.iter().any(|token| fact.contains(token))
            })
            .cloned()
            .collect();

        if results.is_empty() {
            return vec![self.fallback.clone()];
        }

        results
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new(
            KNOWLEDGE_BASE.iter().map(|f| f.to_string()).collect(),
            FALLBACK_FACT.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inflation_query_finds_inflation_fact() {
        let kb = KnowledgeBase::default();
        let context = kb.retrieve("inflation rate");

        assert!(context.iter().any(|f| f.contains("Inflation is currently at 3.2%")));
        assert!(!context.iter().any(|f| f.starts_with("General Financial Principles")));
    }

    #[test]
    fn test_unknown_query_returns_fallback_only() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.retrieve("xyz"), vec![FALLBACK_FACT.to_string()]);
    }

    #[test]
    fn test_empty_query_returns_fallback() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.retrieve("   "), vec![FALLBACK_FACT.to_string()]);
    }

    #[test]
    fn test_results_keep_knowledge_base_order() {
        let kb = KnowledgeBase::default();
        // "housing" hits the last fact, "tax" the first
        let context = kb.retrieve("HOUSING tax");

        assert_eq!(context.len(), 2);
        assert!(context[0].starts_with("Tax Rule 2024"));
        assert!(context[1].starts_with("Housing Market"));
    }

    #[test]
    fn test_tokens_match_as_substrings() {
        let kb = KnowledgeBase::default();
        // "sav" is a substring of "savings"
        let context = kb.retrieve("sav");
        assert_eq!(context, vec![KNOWLEDGE_BASE[2].to_string()]);
    }

    #[test]
    fn test_retrieve_is_repeatable() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.retrieve("interest"), kb.retrieve("interest"));
    }
}
