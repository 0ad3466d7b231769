use std::collections::VecDeque;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{HistoryItem, ResultEngine, history::merge_day};

use super::Ledger;

/// Entries and transfers of `[start, end]`, newest first.
///
/// The feed holds no records; every [`cursor`](HistoryFeed::cursor) walks
/// the store again one day at a time, so a feed can be restarted at will.
#[derive(Clone, Debug)]
pub struct HistoryFeed {
    ledger: Ledger,
    start: NaiveDate,
    end: NaiveDate,
}

impl HistoryFeed {
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn cursor(&self) -> HistoryCursor {
        HistoryCursor {
            ledger: self.ledger.clone(),
            start: self.start,
            next_day: (self.start <= self.end).then_some(self.end),
            buffer: VecDeque::new(),
        }
    }

    /// Drains a fresh cursor.
    pub async fn collect(&self) -> ResultEngine<Vec<HistoryItem>> {
        let mut cursor = self.cursor();
        let mut items = Vec::new();
        while let Some(item) = cursor.next().await? {
            items.push(item);
        }
        Ok(items)
    }
}

/// Lazy walk over a [`HistoryFeed`].
#[derive(Debug)]
pub struct HistoryCursor {
    ledger: Ledger,
    start: NaiveDate,
    /// Next day to load, walking backwards; `None` once `start` was loaded.
    next_day: Option<NaiveDate>,
    buffer: VecDeque<HistoryItem>,
}

impl HistoryCursor {
    pub async fn next(&mut self) -> ResultEngine<Option<HistoryItem>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            let Some(day) = self.next_day else {
                return Ok(None);
            };
            self.next_day = if day > self.start { day.pred_opt() } else { None };

            let (entries, transfers) = {
                let _guard = self.ledger.locks.read(day).await;
                (
                    self.ledger.entries_unlocked(day).await?,
                    self.ledger.transfers_unlocked(day).await?,
                )
            };
            self.buffer.extend(merge_day(entries, transfers));
        }
    }
}

impl Ledger {
    /// Merged history of `[start, end]`, both inclusive. A range with
    /// `start > end` is empty.
    pub fn merge_range(&self, start: NaiveDate, end: NaiveDate) -> HistoryFeed {
        HistoryFeed {
            ledger: self.clone(),
            start,
            end,
        }
    }

    /// Deletes every record of a feed, one at a time.
    ///
    /// Not atomic as a whole: on error the records deleted so far stay
    /// deleted and the error is returned. Returns how many rows were removed.
    pub async fn delete_all(&self, feed: &HistoryFeed) -> ResultEngine<usize> {
        let items = feed.collect().await?;
        let mut removed = 0;
        for item in &items {
            let deleted = match item {
                HistoryItem::Expense(entry) => self.delete_entry(entry.id).await,
                HistoryItem::Transfer(transfer) => self.delete_transfer(transfer.id).await,
            };
            match deleted {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!("history clear stopped after {removed} of {} records", items.len());
                    return Err(err);
                }
            }
        }
        debug!(
            "cleared {removed} records between {} and {}",
            feed.start, feed.end
        );
        Ok(removed)
    }
}
