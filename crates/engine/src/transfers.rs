//! Transfer entries: money moved from one account to another.
//!
//! Transfers live in their own ledger. They never touch source closing
//! balances; they show up in history feeds and in their own totals.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Channel, Direction, EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub from_holder: String,
    pub from_source: String,
    pub from_account_ref: String,
    pub to_holder: String,
    pub to_source: String,
    pub to_account_ref: String,
    pub amount: Money,
    pub direction: Direction,
    pub channel: Channel,
    pub created_at: DateTime<Utc>,
}

impl TransferEntry {
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            Direction::Credit => self.amount,
            Direction::Debit => -self.amount,
        }
    }
}

/// Input for a new transfer.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTransfer {
    pub date: NaiveDate,
    pub from_holder: String,
    pub from_source: String,
    pub from_account_ref: String,
    pub to_holder: String,
    pub to_source: String,
    pub to_account_ref: String,
    pub amount: Money,
    pub direction: Direction,
    pub channel: Channel,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub from_holder: String,
    pub from_source: String,
    pub from_account_ref: String,
    pub to_holder: String,
    pub to_source: String,
    pub to_account_ref: String,
    pub amount_minor: i64,
    pub direction: String,
    pub channel: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&NewTransfer> for ActiveModel {
    fn from(value: &NewTransfer) -> Self {
        Self {
            id: ActiveValue::NotSet,
            date: ActiveValue::Set(value.date),
            from_holder: ActiveValue::Set(value.from_holder.clone()),
            from_source: ActiveValue::Set(value.from_source.clone()),
            from_account_ref: ActiveValue::Set(value.from_account_ref.clone()),
            to_holder: ActiveValue::Set(value.to_holder.clone()),
            to_source: ActiveValue::Set(value.to_source.clone()),
            to_account_ref: ActiveValue::Set(value.to_account_ref.clone()),
            amount_minor: ActiveValue::Set(value.amount.cents()),
            direction: ActiveValue::Set(value.direction.as_str().to_string()),
            channel: ActiveValue::Set(Some(value.channel.as_str().to_string())),
            created_at: ActiveValue::Set(Utc::now()),
        }
    }
}

impl TryFrom<Model> for TransferEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            date: model.date,
            from_holder: model.from_holder,
            from_source: model.from_source,
            from_account_ref: model.from_account_ref,
            to_holder: model.to_holder,
            to_source: model.to_source,
            to_account_ref: model.to_account_ref,
            amount: Money::new(model.amount_minor),
            direction: Direction::try_from(model.direction.as_str())?,
            channel: Channel::from_stored(model.channel.as_deref()),
            created_at: model.created_at,
        })
    }
}
