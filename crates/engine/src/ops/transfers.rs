use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use tracing::debug;

use crate::{ChangeKind, LedgerChange, NewTransfer, ResultEngine, TransferEntry, transfers};

use super::{Ledger, normalize_required_name};

impl Ledger {
    pub async fn add_transfer(&self, transfer: NewTransfer) -> ResultEngine<TransferEntry> {
        let mut transfer = transfer;
        transfer.from_holder = normalize_required_name(&transfer.from_holder, "account holder")?;
        transfer.to_holder = normalize_required_name(&transfer.to_holder, "beneficiary")?;

        let stored = {
            let _guard = self.locks.write(transfer.date).await;
            let db_tx = self.database.begin().await?;
            let model = transfers::ActiveModel::from(&transfer)
                .insert(&db_tx)
                .await?;
            db_tx.commit().await?;
            TransferEntry::try_from(model)?
        };
        debug!("transfer {} added on {}", stored.id, stored.date);
        self.notify(LedgerChange {
            date: stored.date,
            kind: ChangeKind::Transfer,
        });
        Ok(stored)
    }

    /// Deletes a transfer by id; unknown ids are a no-op.
    pub async fn delete_transfer(&self, id: i64) -> ResultEngine<bool> {
        let Some(model) = transfers::Entity::find_by_id(id)
            .one(&self.database)
            .await?
        else {
            return Ok(false);
        };
        let date = model.date;
        let removed = {
            let _guard = self.locks.write(date).await;
            transfers::Entity::delete_by_id(id)
                .exec(&self.database)
                .await?
                .rows_affected
                > 0
        };
        if removed {
            debug!("transfer {id} deleted from {date}");
            self.notify(LedgerChange {
                date,
                kind: ChangeKind::Transfer,
            });
        }
        Ok(removed)
    }

    pub async fn transfers(&self, date: NaiveDate) -> ResultEngine<Vec<TransferEntry>> {
        let _guard = self.locks.read(date).await;
        self.transfers_unlocked(date).await
    }

    pub(super) async fn transfers_unlocked(
        &self,
        date: NaiveDate,
    ) -> ResultEngine<Vec<TransferEntry>> {
        transfers::Entity::find()
            .filter(transfers::Column::Date.eq(date))
            .order_by_asc(transfers::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(TransferEntry::try_from)
            .collect()
    }
}
