//! Schema maintenance for a daybook store.
//!
//! `migration [up|status|reset] [PATH]`; the store defaults to the one the
//! `daybook` binary opens (`DAYBOOK__DATABASE__SQLITE`, else `daybook.db`).

use sea_orm::Database;
use sea_orm_migration::prelude::*;

const USAGE: &str = "usage: migration [up|status|reset] [PATH]";

fn store_url(path: Option<String>) -> String {
    let path = path
        .or_else(|| std::env::var("DAYBOOK__DATABASE__SQLITE").ok())
        .unwrap_or_else(|| "daybook.db".to_string());
    format!("sqlite:{path}?mode=rwc")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "up".to_string());
    let db = Database::connect(store_url(args.next())).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, None).await?,
        "status" => migration::Migrator::status(&db).await?,
        // Drops every ledger table, then recreates them empty.
        "reset" => migration::Migrator::fresh(&db).await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
