//! Bank sources: a named money pool with a per-date opening snapshot across
//! the three payment channels.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Channel, Money};

/// Opening-balance snapshot of a source on a given date.
///
/// Identified by `(date, source_name)`; writing the same key again replaces
/// the previous snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSource {
    pub date: NaiveDate,
    pub source_name: String,
    pub opening_cash: Money,
    pub opening_cheque: Money,
    pub opening_card: Money,
}

impl BankSource {
    pub fn new(
        date: NaiveDate,
        source_name: impl Into<String>,
        opening_cash: Money,
        opening_cheque: Money,
        opening_card: Money,
    ) -> Self {
        Self {
            date,
            source_name: source_name.into(),
            opening_cash,
            opening_cheque,
            opening_card,
        }
    }

    /// The implicit snapshot used for sources that entries reference but that
    /// have no opening record.
    pub fn zero(date: NaiveDate, source_name: impl Into<String>) -> Self {
        Self::new(date, source_name, Money::ZERO, Money::ZERO, Money::ZERO)
    }

    pub fn opening(&self, channel: Channel) -> Money {
        match channel {
            Channel::Cash => self.opening_cash,
            Channel::Cheque => self.opening_cheque,
            Channel::Card => self.opening_card,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    #[sea_orm(primary_key, auto_increment = false)]
    pub source_name: String,
    pub opening_cash_minor: i64,
    pub opening_cheque_minor: i64,
    pub opening_card_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BankSource> for ActiveModel {
    fn from(value: &BankSource) -> Self {
        Self {
            date: ActiveValue::Set(value.date),
            source_name: ActiveValue::Set(value.source_name.clone()),
            opening_cash_minor: ActiveValue::Set(value.opening_cash.cents()),
            opening_cheque_minor: ActiveValue::Set(value.opening_cheque.cents()),
            opening_card_minor: ActiveValue::Set(value.opening_card.cents()),
        }
    }
}

impl From<Model> for BankSource {
    fn from(model: Model) -> Self {
        Self {
            date: model.date,
            source_name: model.source_name,
            opening_cash: Money::new(model.opening_cash_minor),
            opening_cheque: Money::new(model.opening_cheque_minor),
            opening_card: Money::new(model.opening_card_minor),
        }
    }
}
