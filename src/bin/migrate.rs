//! Ad hoc schema migration for an existing database file.
//!
//! Adds the later-revision columns to `requests` and `comments` one ALTER
//! TABLE at a time. Columns that already exist are skipped; any other failure
//! is logged and the remaining columns are still attempted. Safe to run
//! repeatedly.

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use giftdesk::core::config::DatabaseConfig;

const REQUEST_COLUMNS: &[(&str, &str)] = &[
    ("requestor_contact", "TEXT"),
    ("client_contact", "TEXT"),
    ("due_date", "TIMESTAMP"),
    ("organization_name", "TEXT"),
    ("request_date", "TIMESTAMP"),
    ("receipt_id", "TEXT"),
    ("pickup_date", "TIMESTAMP"),
    ("computer_model", "TEXT"),
    ("computer_type", "TEXT"),
    ("computer_price", "TEXT"),
];

const COMMENT_COLUMNS: &[(&str, &str)] = &[("author", "TEXT")];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Never create the file here; migrating a database that does not exist
    // yet is a no-op
    if !config.path.exists() {
        tracing::error!("Database not found at {}", config.path.display());
        return Ok(());
    }

    let options = SqliteConnectOptions::new().filename(&config.path);
    let mut conn = SqliteConnection::connect_with(&options).await?;

    add_columns(&mut conn, "requests", REQUEST_COLUMNS).await;
    add_columns(&mut conn, "comments", COMMENT_COLUMNS).await;

    tracing::info!("Migration complete");
    Ok(())
}

async fn add_columns(conn: &mut SqliteConnection, table: &str, columns: &[(&str, &str)]) {
    for (name, column_type) in columns {
        let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, name, column_type);
        match sqlx::query(&sql).execute(&mut *conn).await {
            Ok(_) => tracing::info!("Added column {}.{}", table, name),
            Err(e) if e.to_string().contains("duplicate column name") => {
                tracing::info!("Column {}.{} already exists, skipping", table, name);
            }
            Err(e) => tracing::warn!("Failed to add column {}.{}: {}", table, name, e),
        }
    }
}
