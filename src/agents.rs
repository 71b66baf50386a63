//! Agents and the intent router
//!
//! Each agent only composes a task-specific prompt. Generation is delegated
//! to the shared `TextGenerator`, and backend failures come back as tagged
//! `AgentReply` values instead of errors.

use crate::error::AssistantError;
use crate::generative::TextGenerator;
use crate::models::{AgentReply, Intent, ReplyStatus, SpendingRiskAnalysis, TransactionRecord};
use std::sync::Arc;
use tracing::{info, warn};

/// A named prompt-construction behavior
pub trait Agent: Send + Sync {
    fn name(&self) -> &'static str;
    fn intent(&self) -> Intent;
    fn compose_prompt(&self, message: &str, context: &[String]) -> String;
}

pub struct RiskAgent;

impl Agent for RiskAgent {
    fn name(&self) -> &'static str {
        "risk"
    }

    fn intent(&self) -> Intent {
        Intent::RiskAssessment
    }

    fn compose_prompt(&self, message: &str, _context: &[String]) -> String {
        format!("Analyze risk for request: {}", message)
    }
}

pub struct SimulationAgent;

impl Agent for SimulationAgent {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn intent(&self) -> Intent {
        Intent::ScenarioSimulation
    }

    fn compose_prompt(&self, message: &str, _context: &[String]) -> String {
        format!("Simulate scenario: {}. Provide a concise outcome.", message)
    }
}

pub struct AdvisorAgent;

impl Agent for AdvisorAgent {
    fn name(&self) -> &'static str {
        "advisor"
    }

    fn intent(&self) -> Intent {
        Intent::GeneralAdvice
    }

    fn compose_prompt(&self, message: &str, context: &[String]) -> String {
        format!(
            "Context: {}. User Query: {}. Provide helpful financial advice.",
            context.join(" "),
            message
        )
    }
}

/// Dispatches an intent to its agent and runs the generation
#[derive(Clone)]
pub struct AgentRouter {
    generator: Arc<dyn TextGenerator>,
}

impl AgentRouter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn agent_for(intent: Intent) -> &'static dyn Agent {
        match intent {
            Intent::RiskAssessment => &RiskAgent,
            Intent::ScenarioSimulation => &SimulationAgent,
            Intent::GeneralAdvice => &AdvisorAgent,
        }
    }

    /// Never fails: backend problems become displayable reply text
    pub async fn route(&self, intent: Intent, message: &str, context: &[String]) -> AgentReply {
        let agent = Self::agent_for(intent);
        let prompt = agent.compose_prompt(message, context);

        info!(agent = agent.name(), %intent, "Routing to agent");

        match self.generator.generate(&prompt).await {
            Ok(text) => AgentReply::answered(text),
            Err(error) => {
                warn!(agent = agent.name(), "Generative backend failed: {}", error);
                failure_reply(error)
            }
        }
    }

    /// Ask the backend to rate the risk of recent spending. Anything that
    /// is not the expected JSON comes back as an "Unknown" verdict carrying
    /// the raw text.
    pub async fn analyze_spending_risk(
        &self,
        records: &[TransactionRecord],
    ) -> SpendingRiskAnalysis {
        let prompt = spending_risk_prompt(records);
        info!(records = records.len(), "Running spending risk analysis");

        match self.generator.generate(&prompt).await {
            Ok(text) => parse_risk_analysis(&text),
            Err(error) => {
                warn!("Spending risk analysis failed: {}", error);
                SpendingRiskAnalysis::unparsed(failure_reply(error).text)
            }
        }
    }
}

fn spending_risk_prompt(records: &[TransactionRecord]) -> String {
    let spending = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a financial risk analyst. Analyze the following recent spending data and \
         assess the risk level (High, Medium, Low).\n\
         Provide a short reasoning.\n\n\
         Spending Data: {}\n\n\
         Output format: JSON with keys \"risk_level\" and \"reasoning\". Do not output markdown.",
        spending
    )
}

fn parse_risk_analysis(text: &str) -> SpendingRiskAnalysis {
    let cleaned = text.replace("```json", "").replace("```", "");

    match serde_json::from_str::<SpendingRiskAnalysis>(cleaned.trim()) {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("Risk analysis response was not valid JSON: {}", e);
            SpendingRiskAnalysis::unparsed(text.to_string())
        }
    }
}

fn failure_reply(error: AssistantError) -> AgentReply {
    match error {
        AssistantError::MalformedResponse(detail) => AgentReply {
            status: ReplyStatus::MalformedResponse,
            text: format!(
                "The generative backend returned an unusable response: {}",
                detail
            ),
        },
        AssistantError::BackendUnavailable(detail) => AgentReply {
            status: ReplyStatus::BackendUnavailable,
            text: format!("Error connecting to the generative backend: {}", detail),
        },
        other => AgentReply {
            status: ReplyStatus::BackendUnavailable,
            text: format!("Error connecting to the generative backend: {}", other),
        },
    }
}
