//! Merged history endpoints

use api_types::{
    query::RangeQuery,
    record::{Cleared, HistoryClear},
    summary::HistoryPage,
};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use chrono::NaiveDate;
use engine::{FlowTotals, check_range, month_of};

use crate::{
    ServerError,
    server::{AppState, day_or_today},
};

/// `[start, end]` with missing bounds taken from the month of `anchor`,
/// capped at [`engine::MAX_HISTORY_DAYS`].
pub(crate) fn resolve_range(
    anchor: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate), ServerError> {
    let (first, last) = month_of(day_or_today(anchor))?;
    let (start, end) = (start.unwrap_or(first), end.unwrap_or(last));
    check_range(start, end)?;
    Ok((start, end))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<HistoryPage>, ServerError> {
    let Query(query) = query?;
    let (start, end) = resolve_range(query.date, query.start, query.end)?;
    let items = state.ledger.merge_range(start, end).collect().await?;

    let mut totals = FlowTotals::default();
    for item in &items {
        totals.push(item.direction(), item.amount());
    }
    Ok(Json(HistoryPage {
        start,
        end,
        items,
        credit: totals.credit,
        debit: totals.debit,
        net: totals.net(),
    }))
}

pub async fn clear(
    State(state): State<AppState>,
    payload: Result<Json<HistoryClear>, JsonRejection>,
) -> Result<Json<Cleared>, ServerError> {
    let Json(payload) = payload?;
    let (start, end) = resolve_range(None, payload.start, payload.end)?;
    let feed = state.ledger.merge_range(start, end);
    let deleted = state.ledger.delete_all(&feed).await?;
    tracing::info!("history cleared between {start} and {end}: {deleted} records");
    Ok(Json(Cleared { deleted }))
}
