//! Exchange rates over HTTP.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use engine::{CurrencyCode, EngineError, RateSource, ResultEngine};
use serde::Deserialize;

/// Body of `GET {endpoint}/{BASE}`.
#[derive(Debug, Deserialize)]
struct LatestRates {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

fn pick_rate(body: LatestRates, base: &CurrencyCode, target: &CurrencyCode) -> ResultEngine<f64> {
    if let Some(result) = body.result.as_deref()
        && result != "success"
    {
        return Err(EngineError::Currency(format!(
            "rate lookup for {base} answered '{result}'"
        )));
    }
    body.rates
        .get(target.code())
        .copied()
        .ok_or_else(|| EngineError::Currency(format!("no {target} rate quoted for {base}")))
}

#[derive(Debug, Clone)]
pub struct HttpRateSource {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpRateSource {
    pub fn new(endpoint: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> ResultEngine<f64> {
        let url = format!("{}/{}", self.endpoint, base.code());
        let lookup_failed = |err: reqwest::Error| EngineError::Currency(format!("rate lookup failed: {err}"));

        let res = self.http.get(&url).send().await.map_err(lookup_failed)?;
        if !res.status().is_success() {
            return Err(EngineError::Currency(format!(
                "rate lookup returned {}",
                res.status()
            )));
        }
        let body = res.json::<LatestRates>().await.map_err(lookup_failed)?;
        pick_rate(body, base, target)
    }
}
