use axum::{
    Router,
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use engine::{CurrencyService, Ledger};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use std::{net::SocketAddr, sync::Arc};

use crate::{accounts, banks, currency, expenses, export, history, page};

#[derive(Clone, Debug)]
pub struct AppState {
    pub ledger: Ledger,
    pub currency: Arc<CurrencyService>,
}

/// Date a request applies to: the explicit one, else today.
pub(crate) fn day_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/api/expenses", get(expenses::list))
        .route("/api/addExpense", post(expenses::add))
        .route("/api/deleteExpense", post(expenses::delete))
        .route("/api/categories", get(expenses::categories))
        .route("/api/suggestions", get(expenses::suggestions))
        .route("/api/accounts", get(accounts::list))
        .route("/api/addAccount", post(accounts::add))
        .route("/api/deleteAccount", post(accounts::delete))
        .route("/api/banks", get(banks::list))
        .route("/api/addBank", post(banks::add))
        .route("/api/deleteBank", post(banks::delete))
        .route("/api/summary", get(banks::summary))
        .route("/api/history", get(history::list))
        .route("/api/history/clear", post(history::clear))
        .route("/api/currency", get(currency::get))
        .route("/api/setCurrency", post(currency::set_pair))
        .route("/api/conversion", post(currency::set_enabled))
        .route("/api/export", get(export::export))
        .with_state(state)
}

/// A running gateway. Each accepted connection is served on its own task.
#[derive(Debug)]
pub struct Gateway {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl Gateway {
    /// Starts serving `state` on `listener`.
    pub async fn start(state: AppState, listener: TcpListener) -> Result<Self, std::io::Error> {
        let addr = listener.local_addr()?;
        let (shutdown, signal) = oneshot::channel::<()>();
        tracing::info!("Gateway listening on {}", addr);

        let task = tokio::spawn(async move {
            axum::serve(listener, router(state))
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
        });

        Ok(Self {
            addr,
            shutdown,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn stop(self) -> Result<(), std::io::Error> {
        let _ = self.shutdown.send(());
        let served = self.task.await.map_err(std::io::Error::other)?;
        tracing::info!("Gateway on {} stopped", self.addr);
        served
    }
}
