//! Display currency endpoints

use api_types::currency::{ConversionSet, CurrencySet, CurrencyView};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use engine::{AVAILABLE_CURRENCIES, CurrencyCode, CurrencySettings};

use crate::{ServerError, server::AppState};

fn view(settings: CurrencySettings) -> CurrencyView {
    CurrencyView {
        settings,
        available: AVAILABLE_CURRENCIES.iter().map(ToString::to_string).collect(),
    }
}

pub async fn get(State(state): State<AppState>) -> Json<CurrencyView> {
    Json(view(state.currency.settings().await))
}

/// Switches the active pair; today's rate is looked up in the background.
pub async fn set_pair(
    State(state): State<AppState>,
    payload: Result<Json<CurrencySet>, JsonRejection>,
) -> Result<Json<CurrencyView>, ServerError> {
    let Json(payload) = payload?;
    let base = CurrencyCode::try_from(payload.base.as_str())?;
    let target = CurrencyCode::try_from(payload.target.as_str())?;
    let settings = state.currency.set_pair(base, target).await?;
    Ok(Json(view(settings)))
}

pub async fn set_enabled(
    State(state): State<AppState>,
    payload: Result<Json<ConversionSet>, JsonRejection>,
) -> Result<Json<CurrencyView>, ServerError> {
    let Json(payload) = payload?;
    Ok(Json(view(state.currency.set_enabled(payload.enabled).await)))
}
