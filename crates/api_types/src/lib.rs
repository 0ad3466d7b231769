//! Wire types of the gateway.
//!
//! Request bodies keep the field names browser clients send (`bankName`,
//! `paymentMode`, ...). Unknown fields are rejected. Numeric fields take a
//! JSON number or a string; anything unparsable reads as zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Permissive numeric fields.
pub mod lenient {
    use engine::Money;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Raw>, D::Error> {
        Option::<Raw>::deserialize(deserializer)
    }

    /// Amount from `12.5`, `"12.50"` or `"12,5"`.
    pub fn money<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        Ok(match raw(deserializer)? {
            Some(Raw::Number(value)) => Money::from_major_f64(value),
            Some(Raw::Text(text)) => Money::parse_lenient(&text),
            None => Money::ZERO,
        })
    }

    pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = match raw(deserializer)? {
            Some(Raw::Number(value)) => value,
            Some(Raw::Text(text)) => text.trim().replace(',', ".").parse().unwrap_or(0.0),
            None => 0.0,
        };
        Ok(if value.is_finite() { value } else { 0.0 })
    }

    /// Record id; fractional input is truncated.
    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = match raw(deserializer)? {
            Some(Raw::Number(value)) => value,
            Some(Raw::Text(text)) => text.trim().parse().unwrap_or(0.0),
            None => 0.0,
        };
        Ok(if value.is_finite() { value as i64 } else { 0 })
    }
}

/// Query strings of the GET routes.
pub mod query {
    use super::*;

    /// `?date=YYYY-MM-DD`, today when absent.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DateQuery {
        pub date: Option<NaiveDate>,
    }

    /// History range. Missing bounds default to the month of `date`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RangeQuery {
        pub date: Option<NaiveDate>,
        pub start: Option<NaiveDate>,
        pub end: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SuggestionQuery {
        #[serde(default)]
        pub category: String,
        #[serde(default)]
        pub query: String,
    }

    /// `?type=csv|pdf&screen=daily|acc|hist`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExportQuery {
        #[serde(rename = "type")]
        pub format: Option<String>,
        pub screen: Option<String>,
        pub date: Option<NaiveDate>,
        pub start: Option<NaiveDate>,
        pub end: Option<NaiveDate>,
    }
}

pub mod expense {
    use engine::{LedgerEntry, Money};

    use super::*;

    fn unknown_source() -> String {
        "Unknown".to_string()
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ExpenseNew {
        #[serde(default)]
        pub date: Option<NaiveDate>,
        #[serde(rename = "bankName", default = "unknown_source")]
        pub bank_name: String,
        #[serde(rename = "personName", default)]
        pub person_name: String,
        #[serde(rename = "additionalInfo", default)]
        pub additional_info: String,
        #[serde(default)]
        pub category: String,
        #[serde(rename = "itemName", default)]
        pub item_name: String,
        #[serde(default, deserialize_with = "lenient::float")]
        pub quantity: f64,
        #[serde(default)]
        pub unit: String,
        #[serde(default, deserialize_with = "lenient::money")]
        pub price: Money,
        #[serde(rename = "type")]
        pub direction: String,
        #[serde(rename = "paymentMode")]
        pub payment_mode: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: i64,
        pub date: NaiveDate,
        pub day: String,
        pub bank_name: String,
        pub person_name: String,
        pub additional_info: String,
        pub category: String,
        pub item_name: String,
        pub quantity: f64,
        pub unit: String,
        pub price_per_unit: Money,
        pub total_price: Money,
        #[serde(rename = "type")]
        pub direction: String,
        pub payment_mode: String,
    }

    impl From<&LedgerEntry> for ExpenseView {
        fn from(entry: &LedgerEntry) -> Self {
            Self {
                id: entry.id,
                date: entry.date,
                day: entry.date.format("%A").to_string(),
                bank_name: entry.source_name.clone(),
                person_name: entry.person_name.clone(),
                additional_info: entry.note.clone(),
                category: entry.category.clone(),
                item_name: entry.item_name.clone(),
                quantity: entry.quantity,
                unit: entry.unit.as_str().to_string(),
                price_per_unit: entry.unit_price,
                total_price: entry.total_amount,
                direction: entry.direction.as_str().to_string(),
                payment_mode: entry.channel.as_str().to_string(),
            }
        }
    }
}

pub mod account {
    use engine::{Money, TransferEntry};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct AccountNew {
        #[serde(default)]
        pub date: Option<NaiveDate>,
        #[serde(default)]
        pub holder: String,
        #[serde(default)]
        pub bank: String,
        #[serde(rename = "accNum", default)]
        pub acc_num: String,
        #[serde(rename = "benName", default)]
        pub ben_name: String,
        #[serde(rename = "toBank", default)]
        pub to_bank: String,
        #[serde(rename = "toAccNum", default)]
        pub to_acc_num: String,
        #[serde(default, deserialize_with = "lenient::money")]
        pub amount: Money,
        #[serde(rename = "type")]
        pub direction: String,
        #[serde(rename = "paymentMode")]
        pub payment_mode: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountView {
        pub id: i64,
        pub date: NaiveDate,
        pub day: String,
        pub account_holder: String,
        pub bank_name: String,
        pub account_number: String,
        pub beneficiary_name: String,
        pub to_bank_name: String,
        pub to_account_number: String,
        pub amount: Money,
        #[serde(rename = "type")]
        pub direction: String,
        pub payment_mode: String,
    }

    impl From<&TransferEntry> for AccountView {
        fn from(t: &TransferEntry) -> Self {
            Self {
                id: t.id,
                date: t.date,
                day: t.date.format("%A").to_string(),
                account_holder: t.from_holder.clone(),
                bank_name: t.from_source.clone(),
                account_number: t.from_account_ref.clone(),
                beneficiary_name: t.to_holder.clone(),
                to_bank_name: t.to_source.clone(),
                to_account_number: t.to_account_ref.clone(),
                amount: t.amount,
                direction: t.direction.as_str().to_string(),
                payment_mode: t.channel.as_str().to_string(),
            }
        }
    }
}

pub mod bank {
    use engine::{BankSource, Money};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct BankNew {
        #[serde(default)]
        pub date: Option<NaiveDate>,
        #[serde(rename = "bankName")]
        pub bank_name: String,
        #[serde(rename = "opCash", default, deserialize_with = "lenient::money")]
        pub op_cash: Money,
        #[serde(rename = "opCheque", default, deserialize_with = "lenient::money")]
        pub op_cheque: Money,
        #[serde(rename = "opCard", default, deserialize_with = "lenient::money")]
        pub op_card: Money,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct BankDelete {
        #[serde(default)]
        pub date: Option<NaiveDate>,
        #[serde(rename = "bankName")]
        pub bank_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BankView {
        pub date: NaiveDate,
        pub bank_name: String,
        pub opening_cash: Money,
        pub opening_cheque: Money,
        pub opening_card: Money,
    }

    impl From<&BankSource> for BankView {
        fn from(source: &BankSource) -> Self {
            Self {
                date: source.date,
                bank_name: source.source_name.clone(),
                opening_cash: source.opening_cash,
                opening_cheque: source.opening_cheque,
                opening_card: source.opening_card,
            }
        }
    }
}

pub mod record {
    use super::*;

    /// Body of the delete-by-id routes.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct RecordId {
        #[serde(deserialize_with = "lenient::id")]
        pub id: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Created {
        pub id: i64,
    }

    /// `deleted` is `false` when nothing matched; that is still a success.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Deleted {
        pub deleted: bool,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct HistoryClear {
        pub start: Option<NaiveDate>,
        pub end: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Cleared {
        pub deleted: usize,
    }
}

pub mod summary {
    use engine::{Conversion, GrandTotal, HistoryItem, Money, SourceSummary};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DaySummary {
        pub date: NaiveDate,
        pub summaries: Vec<SourceSummary>,
        pub grand_total: GrandTotal,
        pub conversion: Conversion,
        pub converted_total: Money,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryPage {
        pub start: NaiveDate,
        pub end: NaiveDate,
        pub items: Vec<HistoryItem>,
        pub credit: Money,
        pub debit: Money,
        pub net: Money,
    }
}

pub mod currency {
    use engine::CurrencySettings;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct CurrencySet {
        pub base: String,
        pub target: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ConversionSet {
        pub enabled: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrencyView {
        #[serde(flatten)]
        pub settings: CurrencySettings,
        pub available: Vec<String>,
    }
}

#[cfg(test)]
mod tests {
    use engine::Money;
    use serde_json::json;

    use super::{bank::BankNew, expense::ExpenseNew, record::RecordId};

    #[test]
    fn numbers_may_arrive_as_strings() {
        let body: BankNew = serde_json::from_value(json!({
            "bankName": "City Bank",
            "opCash": "100.5",
            "opCheque": 20,
            "opCard": "n/a",
        }))
        .unwrap();
        assert_eq!(body.op_cash, Money::new(10_050));
        assert_eq!(body.op_cheque, Money::new(2_000));
        assert_eq!(body.op_card, Money::ZERO);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_value::<BankNew>(json!({
            "bankName": "City Bank",
            "opPaypal": 3,
        }))
        .unwrap_err();
        assert!(err.to_string().contains("opPaypal"));
    }

    #[test]
    fn expense_defaults_follow_the_web_form() {
        let body: ExpenseNew = serde_json::from_value(json!({
            "category": "Rent",
            "itemName": "March",
            "quantity": "",
            "price": "1,5",
            "type": "DEBIT",
            "paymentMode": "Card/UPI",
        }))
        .unwrap();
        assert_eq!(body.bank_name, "Unknown");
        assert_eq!(body.quantity, 0.0);
        assert_eq!(body.price, Money::new(150));
        assert!(body.date.is_none());
    }

    #[test]
    fn ids_are_truncated() {
        let body: RecordId = serde_json::from_value(json!({ "id": 7.0 })).unwrap();
        assert_eq!(body.id, 7);
        let body: RecordId = serde_json::from_value(json!({ "id": "12" })).unwrap();
        assert_eq!(body.id, 12);
    }
}
