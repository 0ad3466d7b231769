//! History merge layer types.
//!
//! A history item is either a ledger entry or a transfer; both kinds are
//! merged into one feed ordered newest first. The store-backed feed lives in
//! [`crate::HistoryFeed`].

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Channel, Direction, EngineError, LedgerEntry, Money, ResultEngine, TransferEntry};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryItem {
    Expense(LedgerEntry),
    Transfer(TransferEntry),
}

impl HistoryItem {
    pub fn id(&self) -> i64 {
        match self {
            Self::Expense(e) => e.id,
            Self::Transfer(t) => t.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Expense(e) => e.date,
            Self::Transfer(t) => t.date,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Expense(e) => e.created_at,
            Self::Transfer(t) => t.created_at,
        }
    }

    pub fn amount(&self) -> Money {
        match self {
            Self::Expense(e) => e.total_amount,
            Self::Transfer(t) => t.amount,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Expense(e) => e.direction,
            Self::Transfer(t) => t.direction,
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Self::Expense(e) => e.channel,
            Self::Transfer(t) => t.channel,
        }
    }

    /// Short human label: the item name for expenses, `from → to` for
    /// transfers.
    pub fn label(&self) -> String {
        match self {
            Self::Expense(e) => e.item_name.clone(),
            Self::Transfer(t) => format!("{} -> {}", t.from_holder, t.to_holder),
        }
    }

    /// Newest first: date, then creation time, then id, all descending.
    pub fn newest_first(a: &HistoryItem, b: &HistoryItem) -> Ordering {
        b.date()
            .cmp(&a.date())
            .then_with(|| b.created_at().cmp(&a.created_at()))
            .then_with(|| b.id().cmp(&a.id()))
    }
}

/// Merges one day's entries and transfers into feed order.
pub fn merge_day(entries: Vec<LedgerEntry>, transfers: Vec<TransferEntry>) -> Vec<HistoryItem> {
    let mut items: Vec<HistoryItem> = entries
        .into_iter()
        .map(HistoryItem::Expense)
        .chain(transfers.into_iter().map(HistoryItem::Transfer))
        .collect();
    items.sort_by(HistoryItem::newest_first);
    items
}

/// First and last day of a month, both inclusive.
pub fn month_range(year: i32, month: u32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidDate(format!("{year}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EngineError::InvalidDate(format!("{year}-{month:02}")))?;
    let last = next
        .pred_opt()
        .ok_or_else(|| EngineError::InvalidDate(format!("{year}-{month:02}")))?;
    Ok((first, last))
}

/// Month containing `date`.
pub fn month_of(date: NaiveDate) -> ResultEngine<(NaiveDate, NaiveDate)> {
    month_range(date.year(), date.month())
}

/// Longest range, in days, a history request may cover.
pub const MAX_HISTORY_DAYS: i64 = 366;

/// Validates a client supplied `[start, end]` history range.
pub fn check_range(start: NaiveDate, end: NaiveDate) -> ResultEngine<()> {
    if start > end {
        return Err(EngineError::InvalidDate(format!(
            "range start {start} is after end {end}"
        )));
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_HISTORY_DAYS {
        return Err(EngineError::InvalidDate(format!(
            "range {start}..{end} spans {days} days, at most {MAX_HISTORY_DAYS} allowed"
        )));
    }
    Ok(())
}

/// Credit, debit and net totals of a set of history items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTotals {
    pub credit: Money,
    pub debit: Money,
}

impl FlowTotals {
    pub fn net(&self) -> Money {
        self.credit - self.debit
    }

    pub fn push(&mut self, direction: Direction, amount: Money) {
        match direction {
            Direction::Credit => self.credit += amount,
            Direction::Debit => self.debit += amount,
        }
    }
}
