//! Merchant and category normalisation for listed transactions

use crate::models::TransactionRecord;

pub fn normalize(record: &TransactionRecord) -> TransactionRecord {
    let mut cleaned = record.clone();
    let merchant = record.merchant.to_lowercase();

    if merchant.contains("uber") {
        cleaned.merchant = "Uber".to_string();
        cleaned.category = "Transport".to_string();
    } else if merchant.contains("whole foods") || merchant.contains("burger") {
        cleaned.category = "Food".to_string();
    } else if merchant.contains("amazon") || merchant.contains("amzn") {
        cleaned.category = "Shopping".to_string();
    }

    cleaned
}

pub fn clean_data(records: &[TransactionRecord]) -> Vec<TransactionRecord> {
    records.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn raw(category: &str, merchant: &str) -> TransactionRecord {
        TransactionRecord {
            id: 1,
            category: category.to_string(),
            amount: Decimal::from(12),
            date: NaiveDate::from_ymd_opt(2023, 10, 26).unwrap(),
            merchant: merchant.to_string(),
        }
    }

    #[test]
    fn test_known_merchants() {
        let cleaned = clean_data(&[
            raw("Uncategorized", "UBER *TRIP"),
            raw("Uncategorized", "Burger King #123"),
            raw("Groceries", "Whole Foods Market"),
            raw("Retail", "AMZN Mktp US"),
        ]);

        assert_eq!(cleaned[0].merchant, "Uber");
        assert_eq!(cleaned[0].category, "Transport");
        assert_eq!(cleaned[1].category, "Food");
        assert_eq!(cleaned[1].merchant, "Burger King #123");
        assert_eq!(cleaned[2].category, "Food");
        assert_eq!(cleaned[3].category, "Shopping");
    }

    #[test]
    fn test_unknown_merchant_untouched() {
        let record = raw("Uncategorized", "City Electric Co");
        assert_eq!(normalize(&record), record);
    }
}
