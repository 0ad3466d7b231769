//! Transfer endpoints

use api_types::{
    account::{AccountNew, AccountView},
    query::DateQuery,
    record::{Created, Deleted, RecordId},
};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use engine::{Channel, Direction, NewTransfer};

use crate::{
    ServerError,
    server::{AppState, day_or_today},
};

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let Query(query) = query?;
    let transfers = state.ledger.transfers(day_or_today(query.date)).await?;
    Ok(Json(transfers.iter().map(AccountView::from).collect()))
}

pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<AccountNew>, JsonRejection>,
) -> Result<Json<Created>, ServerError> {
    let Json(payload) = payload?;
    let transfer = NewTransfer {
        date: day_or_today(payload.date),
        direction: Direction::try_from(payload.direction.as_str())?,
        channel: Channel::try_from(payload.payment_mode.as_str())?,
        from_holder: payload.holder,
        from_source: payload.bank,
        from_account_ref: payload.acc_num,
        to_holder: payload.ben_name,
        to_source: payload.to_bank,
        to_account_ref: payload.to_acc_num,
        amount: payload.amount,
    };

    let transfer = state.ledger.add_transfer(transfer).await?;
    Ok(Json(Created { id: transfer.id }))
}

pub async fn delete(
    State(state): State<AppState>,
    payload: Result<Json<RecordId>, JsonRejection>,
) -> Result<Json<Deleted>, ServerError> {
    let Json(payload) = payload?;
    let deleted = state.ledger.delete_transfer(payload.id).await?;
    Ok(Json(Deleted { deleted }))
}
