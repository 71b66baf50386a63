//! Financial Digital Twin Assistant
//!
//! Turns a free-text chat message into one of three outcomes:
//! - a recorded transaction ("spent $50 on food at walmart")
//! - a retrieval-grounded answer from one of the advisory agents
//! - a budget alert from the real-time rule engine
//!
//! CHAT LOOP:
//! MESSAGE → EXTRACT → (miss) RETRIEVE → CLASSIFY → ROUTE → REPLY

pub mod agents;
pub mod api;
pub mod budget;
pub mod classifier;
pub mod config;
pub mod data_prep;
pub mod error;
pub mod extractor;
pub mod generative;
pub mod models;
pub mod pipeline;
pub mod retrieval;
pub mod store;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use classifier::{IntentClassifier, KeywordClassifier};
pub use pipeline::AssistantPipeline;
