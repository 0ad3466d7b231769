use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use tracing::debug;

use crate::{ChangeKind, LedgerChange, LedgerEntry, NewLedgerEntry, ResultEngine, entries};

use super::{Ledger, normalize_required_name};

impl Ledger {
    /// Inserts a ledger entry. The date lock is held for the whole write, so
    /// concurrent inserts on the same date are applied one after the other.
    pub async fn add_entry(&self, entry: NewLedgerEntry) -> ResultEngine<LedgerEntry> {
        let mut entry = entry;
        entry.source_name = normalize_required_name(&entry.source_name, "source name")?;
        entry.category = entry.category.trim().to_string();
        entry.item_name = entry.item_name.trim().to_string();

        let stored = {
            let _guard = self.locks.write(entry.date).await;
            let db_tx = self.database.begin().await?;
            let model = entries::ActiveModel::from(&entry).insert(&db_tx).await?;
            db_tx.commit().await?;
            LedgerEntry::try_from(model)?
        };
        debug!(
            "entry {} added on {} for {}",
            stored.id, stored.date, stored.source_name
        );
        self.notify(LedgerChange {
            date: stored.date,
            kind: ChangeKind::Entry,
        });
        Ok(stored)
    }

    /// Deletes an entry by id. Unknown ids are a no-op; the return value says
    /// whether a row was removed.
    pub async fn delete_entry(&self, id: i64) -> ResultEngine<bool> {
        let Some(model) = entries::Entity::find_by_id(id).one(&self.database).await? else {
            return Ok(false);
        };
        let date = model.date;
        let removed = {
            let _guard = self.locks.write(date).await;
            entries::Entity::delete_by_id(id)
                .exec(&self.database)
                .await?
                .rows_affected
                > 0
        };
        if removed {
            debug!("entry {id} deleted from {date}");
            self.notify(LedgerChange {
                date,
                kind: ChangeKind::Entry,
            });
        }
        Ok(removed)
    }

    /// Entries of one date in insertion order.
    pub async fn entries(&self, date: NaiveDate) -> ResultEngine<Vec<LedgerEntry>> {
        let _guard = self.locks.read(date).await;
        self.entries_unlocked(date).await
    }

    pub(super) async fn entries_unlocked(&self, date: NaiveDate) -> ResultEngine<Vec<LedgerEntry>> {
        entries::Entity::find()
            .filter(entries::Column::Date.eq(date))
            .order_by_asc(entries::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(LedgerEntry::try_from)
            .collect()
    }

    /// Distinct item names already used in `category` that contain `query`
    /// (case-insensitive). An empty query yields nothing.
    pub async fn suggestions(&self, category: &str, query: &str) -> ResultEngine<Vec<String>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let names: Vec<String> = entries::Entity::find()
            .select_only()
            .column(entries::Column::ItemName)
            .distinct()
            .filter(entries::Column::Category.eq(category.trim()))
            .order_by_asc(entries::Column::ItemName)
            .into_tuple()
            .all(&self.database)
            .await?;
        Ok(names
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .collect())
    }

    /// Stored categories merged with [`DEFAULT_CATEGORIES`], sorted and
    /// de-duplicated.
    ///
    /// [`DEFAULT_CATEGORIES`]: crate::DEFAULT_CATEGORIES
    pub async fn categories(&self) -> ResultEngine<Vec<String>> {
        let stored: Vec<String> = entries::Entity::find()
            .select_only()
            .column(entries::Column::Category)
            .distinct()
            .into_tuple()
            .all(&self.database)
            .await?;
        let mut all: Vec<String> = crate::DEFAULT_CATEGORIES
            .iter()
            .map(ToString::to_string)
            .chain(stored.into_iter().filter(|c| !c.trim().is_empty()))
            .collect();
        all.sort();
        all.dedup();
        Ok(all)
    }
}
