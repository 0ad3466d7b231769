//! Change notification for continuous queries.

use chrono::NaiveDate;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

use crate::{DailyView, Ledger, ResultEngine};

/// What a committed mutation touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Entry,
    Transfer,
    Source,
}

/// Published after every committed mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerChange {
    pub date: NaiveDate,
    pub kind: ChangeKind,
}

/// A continuous query over one date.
///
/// The first [`next`](DaySubscription::next) returns the current view; every
/// later call waits for a change to the date and returns the recomputed view.
pub struct DaySubscription {
    ledger: Ledger,
    date: NaiveDate,
    changes: broadcast::Receiver<LedgerChange>,
    primed: bool,
}

impl DaySubscription {
    pub(crate) fn new(
        ledger: Ledger,
        date: NaiveDate,
        changes: broadcast::Receiver<LedgerChange>,
    ) -> Self {
        Self {
            ledger,
            date,
            changes,
            primed: false,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Next fresh view.
    pub async fn next(&mut self) -> ResultEngine<DailyView> {
        if !self.primed {
            self.primed = true;
            return self.ledger.daily_view(self.date).await;
        }
        loop {
            match self.changes.recv().await {
                Ok(change) if change.date == self.date => break,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    debug!("subscription for {} lagged by {skipped}", self.date);
                    break;
                }
                // The subscription keeps a sender alive through its ledger.
                Err(RecvError::Closed) => break,
            }
        }
        self.ledger.daily_view(self.date).await
    }
}
