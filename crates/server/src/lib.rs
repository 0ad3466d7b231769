//! Local HTTP gateway over a [`engine::Ledger`].

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;
use reports::ReportError;
use serde::Serialize;

pub use server::{AppState, Gateway, router};

mod accounts;
mod banks;
mod currency;
mod expenses;
mod export;
mod history;
mod page;
mod server;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Report(ReportError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidValue(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidDate(_)
        | EngineError::Currency(_) => StatusCode::BAD_REQUEST,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Report(err) => {
                tracing::error!("report rendering failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "report rendering failed".to_string(),
                )
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<ReportError> for ServerError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}
