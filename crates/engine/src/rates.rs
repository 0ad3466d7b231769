//! Display currency and exchange-rate cache.
//!
//! Rates come from an external [`RateSource`] and are fetched at most once per
//! `(base, target, day)`. Balance computations never wait on a lookup: they
//! read whatever rate is current, falling back to `1.0`.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{Conversion, CurrencyCode, EngineError, ResultEngine};

/// External exchange-rate lookup.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Value of one unit of `base` expressed in `target`.
    async fn fetch_rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> ResultEngine<f64>;
}

/// A source that always answers with the same rate. Useful offline.
#[derive(Clone, Copy, Debug)]
pub struct FixedRate(pub f64);

#[async_trait]
impl RateSource for FixedRate {
    async fn fetch_rate(&self, _base: &CurrencyCode, _target: &CurrencyCode) -> ResultEngine<f64> {
        Ok(self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub day: NaiveDate,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Quote {
    Pending,
    Ready(f64),
    Failed,
}

/// Daily quote cache. A key is claimed once; later claims on the same day are
/// refused whether the first lookup succeeded or failed.
#[derive(Debug, Default)]
pub struct QuoteCache {
    quotes: Mutex<HashMap<QuoteKey, Quote>>,
}

impl QuoteCache {
    fn quotes(&self) -> std::sync::MutexGuard<'_, HashMap<QuoteKey, Quote>> {
        self.quotes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns `true` when the caller should perform the lookup.
    fn claim(&self, key: &QuoteKey) -> bool {
        let mut quotes = self.quotes();
        if quotes.contains_key(key) {
            return false;
        }
        quotes.insert(key.clone(), Quote::Pending);
        true
    }

    fn settle(&self, key: QuoteKey, rate: Option<f64>) {
        let quote = rate.map_or(Quote::Failed, Quote::Ready);
        self.quotes().insert(key, quote);
    }

    fn is_claimed(&self, key: &QuoteKey) -> bool {
        self.quotes().contains_key(key)
    }

    pub fn get(&self, key: &QuoteKey) -> Option<f64> {
        match self.quotes().get(key) {
            Some(Quote::Ready(rate)) => Some(*rate),
            _ => None,
        }
    }

    /// Most recent successful rate for a pair, on any day.
    pub fn latest(&self, base: &CurrencyCode, target: &CurrencyCode) -> Option<f64> {
        self.quotes()
            .iter()
            .filter(|(k, _)| &k.base == base && &k.target == target)
            .filter_map(|(k, q)| match q {
                Quote::Ready(rate) => Some((k.day, *rate)),
                _ => None,
            })
            .max_by_key(|(day, _)| *day)
            .map(|(_, rate)| rate)
    }
}

/// Current display-currency state as exposed to clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub rate: f64,
    pub enabled: bool,
    /// `true` while the rate is a default or a previous day's value.
    pub rate_stale: bool,
}

pub struct CurrencyService {
    state: RwLock<CurrencySettings>,
    cache: QuoteCache,
    source: Arc<dyn RateSource>,
}

impl std::fmt::Debug for CurrencyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyService")
            .field("state", &self.state)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl CurrencyService {
    pub fn new(
        base: CurrencyCode,
        target: CurrencyCode,
        enabled: bool,
        source: Arc<dyn RateSource>,
    ) -> Self {
        let rate_stale = base != target;
        Self {
            state: RwLock::new(CurrencySettings {
                base,
                target,
                rate: 1.0,
                enabled,
                rate_stale,
            }),
            cache: QuoteCache::default(),
            source,
        }
    }

    pub async fn settings(self: &Arc<Self>) -> CurrencySettings {
        self.roll_over(Local::now().date_naive()).await;
        self.state.read().await.clone()
    }

    /// The conversion every view is rendered with. With conversion disabled
    /// amounts pass through unchanged.
    pub async fn conversion(self: &Arc<Self>) -> Conversion {
        self.roll_over(Local::now().date_naive()).await;
        let state = self.state.read().await;
        if !state.enabled {
            return Conversion::identity(state.base.clone());
        }
        Conversion::new(state.base.clone(), state.target.clone(), state.rate)
    }

    /// Switches the active pair. The rate becomes `1.0` for identical codes,
    /// otherwise the last known rate for the pair (or `1.0`) until today's
    /// lookup completes in the background.
    pub async fn set_pair(
        self: &Arc<Self>,
        base: CurrencyCode,
        target: CurrencyCode,
    ) -> ResultEngine<CurrencySettings> {
        let settings = {
            let mut state = self.state.write().await;
            let today = Local::now().date_naive();
            let key = QuoteKey {
                base: base.clone(),
                target: target.clone(),
                day: today,
            };
            let (rate, stale) = if base == target {
                (1.0, false)
            } else if let Some(rate) = self.cache.get(&key) {
                (rate, false)
            } else {
                (self.cache.latest(&base, &target).unwrap_or(1.0), true)
            };
            state.base = base;
            state.target = target;
            state.rate = rate;
            state.rate_stale = stale;
            info!("currency pair set to {} -> {}", state.base, state.target);
            state.clone()
        };
        self.spawn_refresh();
        Ok(settings)
    }

    pub async fn set_enabled(&self, enabled: bool) -> CurrencySettings {
        let mut state = self.state.write().await;
        state.enabled = enabled;
        state.clone()
    }

    /// Once `today` has no settled quote for the active pair, the current rate
    /// belongs to an earlier day: it is flagged stale and today's lookup is
    /// started in the background.
    pub async fn roll_over(self: &Arc<Self>, today: NaiveDate) {
        let key = {
            let state = self.state.read().await;
            if state.base == state.target {
                return;
            }
            QuoteKey {
                base: state.base.clone(),
                target: state.target.clone(),
                day: today,
            }
        };
        if self.cache.get(&key).is_some() {
            return;
        }
        {
            let mut state = self.state.write().await;
            let same_pair = state.base == key.base && state.target == key.target;
            if same_pair && self.cache.get(&key).is_none() {
                state.rate_stale = true;
            }
        }
        if !self.cache.is_claimed(&key) {
            debug!("rate {}->{} not looked up for {today} yet", key.base, key.target);
            let this = Arc::clone(self);
            tokio::spawn(async move {
                this.refresh_on(today).await;
            });
        }
    }

    /// Starts today's lookup for the active pair without waiting on it.
    pub fn spawn_refresh(self: &Arc<Self>) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.refresh_on(Local::now().date_naive()).await;
        });
    }

    /// Looks the active pair up for `day` unless that key was already tried.
    /// Failures keep the current rate and are logged.
    pub async fn refresh_on(&self, day: NaiveDate) {
        let (base, target) = {
            let state = self.state.read().await;
            (state.base.clone(), state.target.clone())
        };
        if base == target {
            return;
        }
        let key = QuoteKey {
            base: base.clone(),
            target: target.clone(),
            day,
        };
        if !self.cache.claim(&key) {
            debug!("rate {base}->{target} already looked up for {day}");
            return;
        }

        let fetched = match self.source.fetch_rate(&base, &target).await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
            Ok(rate) => Err(EngineError::Currency(format!("unusable rate {rate}"))),
            Err(err) => Err(err),
        };

        match fetched {
            Ok(rate) => {
                self.cache.settle(key, Some(rate));
                let mut state = self.state.write().await;
                if state.base == base && state.target == target {
                    state.rate = rate;
                    state.rate_stale = false;
                }
                info!("rate {base}->{target} for {day}: {rate}");
            }
            Err(err) => {
                self.cache.settle(key, None);
                let mut state = self.state.write().await;
                if state.base == base && state.target == target {
                    state.rate_stale = true;
                }
                warn!(
                    "rate lookup {base}->{target} failed, keeping {}: {err}",
                    state.rate
                );
            }
        }
    }
}
