//! Ledger entry endpoints

use api_types::{
    expense::{ExpenseNew, ExpenseView},
    query::{DateQuery, SuggestionQuery},
    record::{Created, Deleted, RecordId},
};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use engine::{Channel, Direction, NewLedgerEntry, UnitType};

use crate::{
    ServerError,
    server::{AppState, day_or_today},
};

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let Query(query) = query?;
    let entries = state.ledger.entries(day_or_today(query.date)).await?;
    Ok(Json(entries.iter().map(ExpenseView::from).collect()))
}

pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<Json<Created>, ServerError> {
    let Json(payload) = payload?;
    let entry = NewLedgerEntry {
        date: day_or_today(payload.date),
        direction: Direction::try_from(payload.direction.as_str())?,
        channel: Channel::try_from(payload.payment_mode.as_str())?,
        unit: UnitType::try_from(payload.unit.as_str())?,
        source_name: payload.bank_name,
        person_name: payload.person_name,
        category: payload.category,
        item_name: payload.item_name,
        note: payload.additional_info,
        quantity: payload.quantity,
        unit_price: payload.price,
        total_amount: payload.price,
    };

    let entry = state.ledger.add_entry(entry).await?;
    Ok(Json(Created { id: entry.id }))
}

pub async fn delete(
    State(state): State<AppState>,
    payload: Result<Json<RecordId>, JsonRejection>,
) -> Result<Json<Deleted>, ServerError> {
    let Json(payload) = payload?;
    let deleted = state.ledger.delete_entry(payload.id).await?;
    Ok(Json(Deleted { deleted }))
}

pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ServerError> {
    Ok(Json(state.ledger.categories().await?))
}

pub async fn suggestions(
    State(state): State<AppState>,
    query: Result<Query<SuggestionQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, ServerError> {
    let Query(query) = query?;
    Ok(Json(
        state
            .ledger
            .suggestions(&query.category, &query.query)
            .await?,
    ))
}
