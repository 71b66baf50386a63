//! Core data models for the financial assistant

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Transactions =================
//

/// A single spending record. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: i64,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub merchant: String,
}

/// Raw fields pulled out of a chat message before a record is assigned
/// an id and date.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch {
    pub amount: Decimal,
    pub category: String,
    pub merchant: String,
}

//
// ================= Intent =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RiskAssessment,
    ScenarioSimulation,
    GeneralAdvice,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::RiskAssessment => "risk_assessment",
            Intent::ScenarioSimulation => "scenario_simulation",
            Intent::GeneralAdvice => "general_advice",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//
// ================= Budget =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpendingDecision {
    pub allowed: bool,
    pub alert: Option<String>,
    pub suggestion: Option<String>,
}

impl SpendingDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            alert: None,
            suggestion: None,
        }
    }
}

//
// ================= Agent Replies =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    Answered,
    BackendUnavailable,
    MalformedResponse,
}

/// Text produced by an agent, tagged with how it was obtained.
/// Failure replies still carry display text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentReply {
    pub status: ReplyStatus,
    pub text: String,
}

impl AgentReply {
    pub fn answered(text: String) -> Self {
        Self {
            status: ReplyStatus::Answered,
            text,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.status == ReplyStatus::Answered
    }
}

/// LLM verdict over the stored spending list. `raw` is only set when the
/// backend answer could not be parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpendingRiskAnalysis {
    pub risk_level: String,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl SpendingRiskAnalysis {
    pub fn unparsed(raw: String) -> Self {
        Self {
            risk_level: "Unknown".to_string(),
            reasoning: "Could not parse AI response".to_string(),
            raw: Some(raw),
        }
    }
}

//
// ================= Chat =================
//

/// How a chat request was resolved
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Recorded(TransactionRecord),
    NotSaved(TransactionRecord),
    Advised { intent: Intent, status: ReplyStatus },
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub context: Vec<String>,
    #[serde(skip)]
    pub outcome: ChatOutcome,
}
