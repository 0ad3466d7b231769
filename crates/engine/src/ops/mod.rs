use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::broadcast;

use crate::{EngineError, LedgerChange, ResultEngine, locks::KeyLocks};

mod entries;
mod history;
mod records;
mod sources;
mod transfers;
mod views;

pub use history::{HistoryCursor, HistoryFeed};
pub use records::{NewRecord, Record, RecordRef};
pub use views::{DailyView, DayRecords};

/// Capacity of the change channel. Slow subscribers that fall further behind
/// recompute from the store instead of replaying events.
const CHANGE_BUFFER: usize = 64;

/// Entry point to the ledger store shared by every client.
///
/// Cloning is cheap; clones share the same connection, locks and change
/// channel.
#[derive(Clone, Debug)]
pub struct Ledger {
    database: DatabaseConnection,
    locks: Arc<KeyLocks>,
    changes: broadcast::Sender<LedgerChange>,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    fn notify(&self, change: LedgerChange) {
        // No receivers is not an error.
        let _ = self.changes.send(change);
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidValue(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`
    pub async fn build(self) -> ResultEngine<Ledger> {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Ok(Ledger {
            database: self.database,
            locks: Arc::new(KeyLocks::new()),
            changes,
        })
    }
}
