//! Kind-generic store operations, dispatching to the typed ones.

use chrono::NaiveDate;

use crate::{BankSource, LedgerEntry, NewLedgerEntry, NewTransfer, ResultEngine, TransferEntry};

use super::Ledger;

#[derive(Clone, Debug, PartialEq)]
pub enum NewRecord {
    Entry(NewLedgerEntry),
    Transfer(NewTransfer),
    Source(BankSource),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Entry(LedgerEntry),
    Transfer(TransferEntry),
    Source(BankSource),
}

/// Identity of a stored record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordRef {
    Entry(i64),
    Transfer(i64),
    Source { date: NaiveDate, source_name: String },
}

impl Ledger {
    /// Inserts any record kind. Sources are upserted on `(date, source_name)`.
    pub async fn insert(&self, record: NewRecord) -> ResultEngine<Record> {
        Ok(match record {
            NewRecord::Entry(entry) => Record::Entry(self.add_entry(entry).await?),
            NewRecord::Transfer(transfer) => Record::Transfer(self.add_transfer(transfer).await?),
            NewRecord::Source(source) => Record::Source(self.upsert_source(source).await?),
        })
    }

    /// Deletes any record kind. Missing records are a no-op.
    pub async fn delete(&self, record: RecordRef) -> ResultEngine<bool> {
        match record {
            RecordRef::Entry(id) => self.delete_entry(id).await,
            RecordRef::Transfer(id) => self.delete_transfer(id).await,
            RecordRef::Source { date, source_name } => {
                self.delete_source(date, &source_name).await
            }
        }
    }
}
