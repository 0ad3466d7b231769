use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    BankSource, DaySubscription, EngineError, GrandTotal, LedgerEntry, ResultEngine,
    SourceSummary, TransferEntry, balances,
};

use super::Ledger;

/// Every record stored for one date, read under a single lock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayRecords {
    pub date: NaiveDate,
    pub entries: Vec<LedgerEntry>,
    pub transfers: Vec<TransferEntry>,
    pub sources: Vec<BankSource>,
}

impl DayRecords {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.transfers.is_empty() && self.sources.is_empty()
    }
}

/// Computed view of a date: the raw records plus per-source summaries and the
/// grand total across sources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyView {
    pub date: NaiveDate,
    pub entries: Vec<LedgerEntry>,
    pub sources: Vec<BankSource>,
    pub summaries: Vec<SourceSummary>,
    pub grand_total: GrandTotal,
}

impl DailyView {
    pub fn compute(date: NaiveDate, entries: Vec<LedgerEntry>, sources: Vec<BankSource>) -> Self {
        let summaries = balances::summarize_day(&sources, &entries);
        let grand_total = balances::grand_total(&summaries);
        Self {
            date,
            entries,
            sources,
            summaries,
            grand_total,
        }
    }
}

impl Ledger {
    /// All records of a date. Reads share the date lock, so they never see
    /// a write to the same date half applied.
    pub async fn query(&self, date: NaiveDate) -> ResultEngine<DayRecords> {
        let _guard = self.locks.read(date).await;
        Ok(DayRecords {
            date,
            entries: self.entries_unlocked(date).await?,
            transfers: self.transfers_unlocked(date).await?,
            sources: self.sources_unlocked(date).await?,
        })
    }

    /// One-shot read of a date, for callers that do not subscribe.
    pub async fn query_one_shot(&self, date: NaiveDate) -> ResultEngine<DayRecords> {
        self.query(date).await
    }

    /// Records of every day in `[start, end]`, oldest first. Each day is read
    /// under its own lock.
    pub async fn query_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<DayRecords>> {
        if start > end {
            return Err(EngineError::InvalidDate(format!(
                "range start {start} is after end {end}"
            )));
        }
        let mut days = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            days.push(self.query(date).await?);
        }
        Ok(days)
    }

    /// Entries, snapshots and computed balances of a date.
    pub async fn daily_view(&self, date: NaiveDate) -> ResultEngine<DailyView> {
        let (entries, sources) = {
            let _guard = self.locks.read(date).await;
            (
                self.entries_unlocked(date).await?,
                self.sources_unlocked(date).await?,
            )
        };
        Ok(DailyView::compute(date, entries, sources))
    }

    /// Continuous query over a date. See [`DaySubscription`].
    pub fn subscribe(&self, date: NaiveDate) -> DaySubscription {
        DaySubscription::new(self.clone(), date, self.changes.subscribe())
    }
}
