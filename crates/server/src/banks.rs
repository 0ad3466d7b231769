//! Opening snapshot and balance summary endpoints

use api_types::{
    bank::{BankDelete, BankNew, BankView},
    query::DateQuery,
    record::Deleted,
    summary::DaySummary,
};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use engine::BankSource;

use crate::{
    ServerError,
    server::{AppState, day_or_today},
};

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<Vec<BankView>>, ServerError> {
    let Query(query) = query?;
    let sources = state.ledger.sources(day_or_today(query.date)).await?;
    Ok(Json(sources.iter().map(BankView::from).collect()))
}

/// Inserts or replaces the snapshot of `(date, bankName)`.
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<BankNew>, JsonRejection>,
) -> Result<Json<BankView>, ServerError> {
    let Json(payload) = payload?;
    let source = BankSource::new(
        day_or_today(payload.date),
        payload.bank_name,
        payload.op_cash,
        payload.op_cheque,
        payload.op_card,
    );
    let source = state.ledger.upsert_source(source).await?;
    Ok(Json(BankView::from(&source)))
}

pub async fn delete(
    State(state): State<AppState>,
    payload: Result<Json<BankDelete>, JsonRejection>,
) -> Result<Json<Deleted>, ServerError> {
    let Json(payload) = payload?;
    let deleted = state
        .ledger
        .delete_source(day_or_today(payload.date), &payload.bank_name)
        .await?;
    Ok(Json(Deleted { deleted }))
}

pub async fn summary(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<DaySummary>, ServerError> {
    let Query(query) = query?;
    let view = state.ledger.daily_view(day_or_today(query.date)).await?;
    let conversion = state.currency.conversion().await;
    Ok(Json(DaySummary {
        date: view.date,
        converted_total: conversion.convert(view.grand_total.total),
        summaries: view.summaries,
        grand_total: view.grand_total,
        conversion,
    }))
}
