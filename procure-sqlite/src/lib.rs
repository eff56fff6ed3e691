#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use procure_core::models::CatalogConfig;
use sqlx::sqlite;
use std::{str::FromStr, time::Duration};
use tokio::try_join;
use tracing::{Level, event};

pub mod config;
mod r#impl;
pub mod types;

use config::SqliteConfig;

/// SQLite catalog store.
///
/// This struct provides separate reader and writer connection pools to a SQLite database.
/// The catalog is only ever read by the optimizer; the writer exists so that migrations
/// (and tests or external loaders) have a serialized connection, following SQLite
/// practice for Write-Ahead Logging (WAL) mode.
///
/// # Connection Management
///
/// - `reader`: A connection pool for read operations, allowing concurrent reads
/// - `writer`: A single-connection pool for write operations, ensuring serialized writes
///
/// # Example
///
/// ```no_run
/// # use procure_sqlite::{Db, config::SqliteConfig};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Db::open(&SqliteConfig::default(), Default::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Db {
    /// Connection pool for read operations
    pub reader: sqlx::Pool<sqlx::Sqlite>,
    /// Connection pool for write operations (limited to 1 connection)
    pub writer: sqlx::Pool<sqlx::Sqlite>,
    /// How offers are filtered for freshness
    pub catalog: CatalogConfig,
}

impl Db {
    /// Open a connection to the specified SQLite database.
    ///
    /// Creates a new database if one doesn't exist (when `create_if_missing` is true)
    /// and applies all pending migrations.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration specifying database path and creation options
    /// * `catalog` - Freshness policy applied to every offer load
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if:
    /// - Database connection fails
    /// - Migrations fail to apply
    pub async fn open(config: &SqliteConfig, catalog: CatalogConfig) -> Result<Self, sqlx::Error> {
        let db_path = config
            .database_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let options =
            sqlite::SqliteConnectOptions::from_str(db_path.as_deref().unwrap_or(":memory:"))?
                .busy_timeout(Duration::from_secs(5))
                .foreign_keys(true)
                .journal_mode(sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlite::SqliteSynchronous::Normal)
                .pragma("journal_size_limit", "27103364")
                .pragma("mmap_size", "134217728")
                .pragma("temp_store", "memory")
                .create_if_missing(config.create_if_missing);

        let reader = sqlite::SqlitePoolOptions::new().connect_with(options.clone());
        let writer = sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options);

        let (reader, writer) = try_join!(reader, writer)?;

        // Run any pending migrations before returning
        sqlx::migrate!("./schema").run(&writer).await?;

        event!(
            Level::DEBUG,
            path = db_path.as_deref().unwrap_or(":memory:"),
            "catalog database opened"
        );

        Ok(Self {
            reader,
            writer,
            catalog,
        })
    }
}
