//! Ledger entries: one dated expense or income attributed to a source and a
//! payment channel.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Channel, Direction, EngineError, Money, ResultEngine};

/// Unit of the informational quantity of an entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    #[default]
    #[serde(rename = "NOT APPLICABLE")]
    NotApplicable,
    #[serde(rename = "NOT AVAILABLE")]
    NotAvailable,
    #[serde(rename = "PIECE")]
    Piece,
    #[serde(rename = "KG")]
    Kg,
    #[serde(rename = "GRAM")]
    Gram,
    #[serde(rename = "LITER")]
    Liter,
    #[serde(rename = "ML")]
    Ml,
}

impl UnitType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotApplicable => "NOT APPLICABLE",
            Self::NotAvailable => "NOT AVAILABLE",
            Self::Piece => "PIECE",
            Self::Kg => "KG",
            Self::Gram => "GRAM",
            Self::Liter => "LITER",
            Self::Ml => "ML",
        }
    }
}

impl TryFrom<&str> for UnitType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().replace('_', " ").as_str() {
            "NOT APPLICABLE" | "" => Ok(Self::NotApplicable),
            "NOT AVAILABLE" => Ok(Self::NotAvailable),
            "PIECE" => Ok(Self::Piece),
            "KG" => Ok(Self::Kg),
            "GRAM" => Ok(Self::Gram),
            "LITER" => Ok(Self::Liter),
            "ML" => Ok(Self::Ml),
            _ => Err(EngineError::InvalidValue(format!("invalid unit '{value}'"))),
        }
    }
}

/// A persisted ledger entry.
///
/// Entries are immutable: a correction is a delete followed by a new insert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Store assigned, increasing with insertion order.
    pub id: i64,
    pub date: NaiveDate,
    pub source_name: String,
    pub person_name: String,
    pub category: String,
    pub item_name: String,
    pub note: String,
    pub quantity: f64,
    pub unit: UnitType,
    pub unit_price: Money,
    pub total_amount: Money,
    pub direction: Direction,
    pub channel: Channel,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Signed contribution of the entry to its channel balance.
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            Direction::Credit => self.total_amount,
            Direction::Debit => -self.total_amount,
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

/// Input for a new ledger entry.
#[derive(Clone, Debug, PartialEq)]
pub struct NewLedgerEntry {
    pub date: NaiveDate,
    pub source_name: String,
    pub person_name: String,
    pub category: String,
    pub item_name: String,
    pub note: String,
    pub quantity: f64,
    pub unit: UnitType,
    pub unit_price: Money,
    pub total_amount: Money,
    pub direction: Direction,
    pub channel: Channel,
}

impl NewLedgerEntry {
    /// Creates an entry whose total equals its unit price, the way entries
    /// are captured by clients.
    pub fn new(
        date: NaiveDate,
        source_name: impl Into<String>,
        category: impl Into<String>,
        item_name: impl Into<String>,
        amount: Money,
        direction: Direction,
        channel: Channel,
    ) -> Self {
        Self {
            date,
            source_name: source_name.into(),
            person_name: String::new(),
            category: category.into(),
            item_name: item_name.into(),
            note: String::new(),
            quantity: 0.0,
            unit: UnitType::NotApplicable,
            unit_price: amount,
            total_amount: amount,
            direction,
            channel,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub source_name: String,
    pub person_name: String,
    pub category: String,
    pub item_name: String,
    pub note: String,
    #[sea_orm(column_type = "Double")]
    pub quantity: f64,
    pub unit: String,
    pub unit_price_minor: i64,
    pub total_amount_minor: i64,
    pub direction: String,
    pub channel: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&NewLedgerEntry> for ActiveModel {
    fn from(value: &NewLedgerEntry) -> Self {
        Self {
            id: ActiveValue::NotSet,
            date: ActiveValue::Set(value.date),
            source_name: ActiveValue::Set(value.source_name.clone()),
            person_name: ActiveValue::Set(value.person_name.clone()),
            category: ActiveValue::Set(value.category.clone()),
            item_name: ActiveValue::Set(value.item_name.clone()),
            note: ActiveValue::Set(value.note.clone()),
            quantity: ActiveValue::Set(value.quantity),
            unit: ActiveValue::Set(value.unit.as_str().to_string()),
            unit_price_minor: ActiveValue::Set(value.unit_price.cents()),
            total_amount_minor: ActiveValue::Set(value.total_amount.cents()),
            direction: ActiveValue::Set(value.direction.as_str().to_string()),
            channel: ActiveValue::Set(Some(value.channel.as_str().to_string())),
            created_at: ActiveValue::Set(Utc::now()),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            date: model.date,
            source_name: model.source_name,
            person_name: model.person_name,
            category: model.category,
            item_name: model.item_name,
            note: model.note,
            quantity: model.quantity,
            unit: UnitType::try_from(model.unit.as_str()).unwrap_or(UnitType::NotAvailable),
            unit_price: Money::new(model.unit_price_minor),
            total_amount: Money::new(model.total_amount_minor),
            direction: Direction::try_from(model.direction.as_str())?,
            channel: Channel::from_stored(model.channel.as_deref()),
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(channel: Option<&str>) -> Model {
        Model {
            id: 7,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            source_name: "Cash-Wallet".to_string(),
            person_name: "Asha".to_string(),
            category: "Rent".to_string(),
            item_name: "March".to_string(),
            note: String::new(),
            quantity: 1.0,
            unit: "PIECE".to_string(),
            unit_price_minor: 5000,
            total_amount_minor: 5000,
            direction: "DEBIT".to_string(),
            channel: channel.map(ToString::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn unknown_stored_channel_reads_as_cash() {
        let entry = LedgerEntry::try_from(model(Some("CRYPTO"))).unwrap();
        assert_eq!(entry.channel, Channel::Cash);
        let entry = LedgerEntry::try_from(model(None)).unwrap();
        assert_eq!(entry.channel, Channel::Cash);
    }

    #[test]
    fn debit_is_negative_contribution() {
        let entry = LedgerEntry::try_from(model(Some("CARD"))).unwrap();
        assert_eq!(entry.signed_amount(), Money::new(-5000));
        assert_eq!(entry.weekday(), Weekday::Fri);
    }

    #[test]
    fn unit_accepts_both_spellings() {
        assert_eq!(UnitType::try_from("NOT_AVAILABLE").unwrap(), UnitType::NotAvailable);
        assert_eq!(UnitType::try_from("kg").unwrap(), UnitType::Kg);
        assert!(UnitType::try_from("furlong").is_err());
    }
}
