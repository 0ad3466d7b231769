use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, prelude::*, sea_query::OnConflict};
use tracing::debug;

use crate::{BankSource, ChangeKind, LedgerChange, ResultEngine, sources};

use super::{Ledger, normalize_required_name};

impl Ledger {
    /// Creates or replaces the opening snapshot of `(date, source_name)`.
    pub async fn upsert_source(&self, source: BankSource) -> ResultEngine<BankSource> {
        let mut source = source;
        source.source_name = normalize_required_name(&source.source_name, "source name")?;
        {
            let _guard = self.locks.write(source.date).await;
            sources::Entity::insert(sources::ActiveModel::from(&source))
                .on_conflict(
                    OnConflict::columns([sources::Column::Date, sources::Column::SourceName])
                        .update_columns([
                            sources::Column::OpeningCashMinor,
                            sources::Column::OpeningChequeMinor,
                            sources::Column::OpeningCardMinor,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&self.database)
                .await?;
        }
        debug!("source '{}' saved for {}", source.source_name, source.date);
        self.notify(LedgerChange {
            date: source.date,
            kind: ChangeKind::Source,
        });
        Ok(source)
    }

    /// Deletes a snapshot. Entries that reference the source are kept and
    /// from then on balance against a zero opening.
    pub async fn delete_source(&self, date: NaiveDate, source_name: &str) -> ResultEngine<bool> {
        let removed = {
            let _guard = self.locks.write(date).await;
            sources::Entity::delete_many()
                .filter(sources::Column::Date.eq(date))
                .filter(sources::Column::SourceName.eq(source_name.trim()))
                .exec(&self.database)
                .await?
                .rows_affected
                > 0
        };
        if removed {
            debug!("source '{source_name}' deleted from {date}");
            self.notify(LedgerChange {
                date,
                kind: ChangeKind::Source,
            });
        }
        Ok(removed)
    }

    /// Snapshots of one date ordered by source name.
    pub async fn sources(&self, date: NaiveDate) -> ResultEngine<Vec<BankSource>> {
        let _guard = self.locks.read(date).await;
        self.sources_unlocked(date).await
    }

    pub(super) async fn sources_unlocked(&self, date: NaiveDate) -> ResultEngine<Vec<BankSource>> {
        Ok(sources::Entity::find()
            .filter(sources::Column::Date.eq(date))
            .order_by_asc(sources::Column::SourceName)
            .all(&self.database)
            .await?
            .into_iter()
            .map(BankSource::from)
            .collect())
    }
}
