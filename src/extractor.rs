//! Natural-language transaction extraction
//!
//! Recognises messages such as:
//! - "Spent $50 on Food at Walmart"
//! - "Paid $20 for Taxi via Uber"
//!
//! Matching is case-insensitive and unanchored, so the clause may appear
//! anywhere in the message. A miss is a normal outcome, not an error.

use crate::error::AssistantError;
use crate::models::{ExtractionMatch, TransactionRecord};
use crate::store::TransactionStore;
use crate::Result;
use chrono::{Local, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

lazy_static! {
    static ref TRANSACTION_PATTERN: Regex = Regex::new(
        r"(?i)(?:spent|paid)\s+\$?(?P<amount>\d+(?:\.\d{2})?)\s+(?:on|for)\s+(?P<category>[\w\s]+?)\s+(?:at|via|to)\s+(?P<merchant>.+)"
    )
    .expect("transaction pattern is valid");
}

/// Result of running extraction over a message
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    NoMatch,
    Recorded(TransactionRecord),
    /// The message matched but the store rejected the write
    NotSaved(TransactionRecord),
}

/// Match a message against the transaction pattern without side effects
pub fn parse_message(message: &str) -> Option<ExtractionMatch> {
    let captures = TRANSACTION_PATTERN.captures(message)?;

    let amount = Decimal::from_str(&captures["amount"]).ok()?;
    if amount.is_sign_negative() {
        return None;
    }

    Some(ExtractionMatch {
        amount,
        category: title_case(&captures["category"]),
        merchant: title_case(&captures["merchant"]),
    })
}

/// Trim the ends, then capitalise the first letter of every run of letters
/// and lower-case the rest. Any non-letter starts a new word, so
/// "7-eleven" becomes "7-Eleven".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;

    for c in input.trim().chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Time-derived record ids, bumped when two records share a millisecond
#[derive(Debug, Default)]
pub struct IdClock {
    last: AtomicI64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut previous = self.last.load(Ordering::Relaxed);

        loop {
            let candidate = now.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => previous = actual,
            }
        }
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Record creation and message extraction over a transaction store
#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
    clock: Arc<IdClock>,
}

impl TransactionService {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self {
            store,
            clock: Arc::new(IdClock::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn TransactionStore> {
        &self.store
    }

    /// Build a record with a fresh id (and today's date when none is
    /// supplied).
    pub fn new_record(
        &self,
        amount: Decimal,
        category: String,
        merchant: String,
        date: Option<NaiveDate>,
    ) -> TransactionRecord {
        TransactionRecord {
            id: self.clock.next_id(),
            category,
            amount,
            date: date.unwrap_or_else(|| self.clock.today()),
            merchant,
        }
    }

    /// Create and persist a record
    pub async fn add_transaction(
        &self,
        amount: Decimal,
        category: String,
        merchant: String,
        date: Option<NaiveDate>,
    ) -> Result<TransactionRecord> {
        if amount.is_sign_negative() {
            return Err(AssistantError::InvalidInput(format!(
                "amount must not be negative, got {}",
                amount
            )));
        }

        let record = self.new_record(amount, category, merchant, date);
        self.store.append(&record).await?;

        info!(
            id = record.id,
            amount = %record.amount,
            category = %record.category,
            "Transaction recorded"
        );
        Ok(record)
    }

    /// Try to turn a chat message into a stored transaction
    pub async fn extract_from_message(&self, message: &str) -> Extraction {
        let Some(matched) = parse_message(message) else {
            debug!("No transaction pattern in message");
            return Extraction::NoMatch;
        };

        let record = self.new_record(matched.amount, matched.category, matched.merchant, None);

        match self.store.append(&record).await {
            Ok(()) => {
                info!(
                    id = record.id,
                    amount = %record.amount,
                    category = %record.category,
                    merchant = %record.merchant,
                    "Transaction extracted from message"
                );
                Extraction::Recorded(record)
            }
            Err(error) => {
                warn!(id = record.id, "Extracted transaction was not saved: {}", error);
                Extraction::NotSaved(record)
            }
        }
    }
}
