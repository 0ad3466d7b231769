use std::sync::Arc;

use engine::{CurrencyCode, CurrencyService, Ledger};
use migration::{Migrator, MigratorTrait};
use server::{AppState, Gateway};
use settings::Database;

mod rates;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "daybook={level},server={level},engine={level},reports={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;
    let ledger = Ledger::builder().database(db).build().await?;

    let source = rates::HttpRateSource::new(&settings.currency.endpoint)?;
    let currency = Arc::new(CurrencyService::new(
        CurrencyCode::try_from(settings.currency.base.as_str())?,
        CurrencyCode::try_from(settings.currency.target.as_str())?,
        settings.currency.enabled,
        Arc::new(source),
    ));
    currency.spawn_refresh();

    let addr = format!("{}:{}", settings.gateway.bind, settings.gateway.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let gateway = Gateway::start(AppState { ledger, currency }, listener).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    gateway.stop().await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    tracing::info!("Opening database {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
