//! Conversational request pipeline
//!
//! EXTRACT → (no match) RETRIEVE → CLASSIFY → ROUTE
//!
//! Extraction always runs first. A matched message is never routed to the
//! agents, and every message gets a displayable response.

use crate::agents::AgentRouter;
use crate::budget::BudgetRules;
use crate::classifier::{IntentClassifier, KeywordClassifier};
use crate::config::AppConfig;
use crate::extractor::{Extraction, TransactionService};
use crate::generative::{GeminiClient, TextGenerator};
use crate::models::{
    ChatOutcome, ChatReply, SpendingDecision, SpendingRiskAnalysis, TransactionRecord,
};
use crate::retrieval::KnowledgeBase;
use crate::store::{self, TransactionStore};
use crate::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct AssistantPipeline {
    transactions: TransactionService,
    knowledge: Arc<KnowledgeBase>,
    classifier: Arc<dyn IntentClassifier>,
    router: AgentRouter,
    budget: Arc<BudgetRules>,
}

impl AssistantPipeline {
    pub fn new(store: Arc<dyn TransactionStore>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            transactions: TransactionService::new(store),
            knowledge: Arc::new(KnowledgeBase::default()),
            classifier: Arc::new(KeywordClassifier::default()),
            router: AgentRouter::new(generator),
            budget: Arc::new(BudgetRules::default()),
        }
    }

    /// Wire the production collaborators from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let generator = Arc::new(GeminiClient::new(&config.gemini)?);
        let store = store::build_store(config.database_url.as_deref());

        let mut pipeline = Self::new(store, generator);
        if let Some(limit) = config.budget_default_limit {
            let mut rules = BudgetRules::default();
            rules.set_default_limit(limit);
            pipeline = pipeline.with_budget_rules(rules);
        }

        Ok(pipeline)
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_knowledge_base(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = Arc::new(knowledge);
        self
    }

    pub fn with_budget_rules(mut self, rules: BudgetRules) -> Self {
        self.budget = Arc::new(rules);
        self
    }

    pub fn transactions(&self) -> &TransactionService {
        &self.transactions
    }

    pub async fn handle_chat(&self, message: &str) -> ChatReply {
        let span = info_span!("chat", request_id = %Uuid::new_v4());
        self.resolve(message).instrument(span).await
    }

    async fn resolve(&self, message: &str) -> ChatReply {
        match self.transactions.extract_from_message(message).await {
            Extraction::Recorded(record) => ChatReply {
                response: confirmation(&record),
                context: Vec::new(),
                outcome: ChatOutcome::Recorded(record),
            },
            Extraction::NotSaved(record) => ChatReply {
                response: not_saved_notice(&record),
                context: Vec::new(),
                outcome: ChatOutcome::NotSaved(record),
            },
            Extraction::NoMatch => {
                let context = self.knowledge.retrieve(message);
                let intent = self.classifier.classify(message);

                info!(%intent, context_facts = context.len(), "Advisory path");

                let reply = self.router.route(intent, message, &context).await;
                ChatReply {
                    response: reply.text,
                    context,
                    outcome: ChatOutcome::Advised {
                        intent,
                        status: reply.status,
                    },
                }
            }
        }
    }

    pub fn check_budget(&self, amount: Decimal, category: &str) -> SpendingDecision {
        let decision = self.budget.check(amount, category);
        info!(%amount, category, allowed = decision.allowed, "Budget check");
        decision
    }

    /// Risk verdict over every stored transaction. Only a failing store is
    /// an error; backend trouble comes back inside the analysis.
    pub async fn analyze_spending_risk(&self) -> Result<SpendingRiskAnalysis> {
        let records = self.transactions.store().list_all().await?;
        Ok(self.router.analyze_spending_risk(&records).await)
    }
}

fn confirmation(record: &TransactionRecord) -> String {
    format!(
        "✅ Recorded transaction: ${} for {} at {}.",
        record.amount, record.category, record.merchant
    )
}

fn not_saved_notice(record: &TransactionRecord) -> String {
    format!(
        "⚠️ Understood a ${} {} purchase at {}, but it could not be saved. Please try again.",
        record.amount, record.category, record.merchant
    )
}
