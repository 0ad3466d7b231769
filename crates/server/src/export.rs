//! Report download endpoint

use api_types::query::ExportQuery;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use reports::{Format, ReportSnapshot};

use crate::{
    ServerError,
    history::resolve_range,
    server::{AppState, day_or_today},
};

fn format_of(value: Option<&str>) -> Result<Format, ServerError> {
    match value.map(str::trim) {
        None | Some("csv") => Ok(Format::Csv),
        Some("pdf") => Ok(Format::Pdf),
        Some(other) => Err(ServerError::Generic(format!(
            "invalid export type '{other}': expected csv or pdf"
        ))),
    }
}

async fn snapshot(state: &AppState, query: &ExportQuery) -> Result<ReportSnapshot, ServerError> {
    let date = day_or_today(query.date);
    match query.screen.as_deref().map(str::trim) {
        None | Some("daily") => {
            let day = state.ledger.query(date).await?;
            Ok(ReportSnapshot::Daily {
                date,
                entries: day.entries,
                sources: day.sources,
            })
        }
        Some("acc") | Some("accounts") => Ok(ReportSnapshot::Accounts {
            date,
            transfers: state.ledger.transfers(date).await?,
        }),
        Some("hist") | Some("history") => {
            let (start, end) = resolve_range(query.date, query.start, query.end)?;
            let items = state.ledger.merge_range(start, end).collect().await?;
            Ok(ReportSnapshot::History { start, end, items })
        }
        Some(other) => Err(ServerError::Generic(format!(
            "invalid screen '{other}': expected daily, acc or hist"
        ))),
    }
}

/// Renders the requested screen. Nothing to export answers `204 No Content`.
pub async fn export(
    State(state): State<AppState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    let Query(query) = query?;
    let format = format_of(query.format.as_deref())?;
    let snapshot = snapshot(&state, &query).await?;
    if snapshot.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let conversion = state.currency.conversion().await;
    let artifact = reports::render(&snapshot, &conversion, format)?;
    tracing::debug!("exporting {}", artifact.filename);
    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}
