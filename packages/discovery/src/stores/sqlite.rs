//! SQLite storage implementation.
//!
//! The on-disk layout is the `foodie_memory.db` file the sentinel has always
//! used: `restaurants`, `watchlist` and `sources`. Opening an older database
//! adds whatever the current schema needs (the unique name index and the
//! `created_at` column) without touching existing rows.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::debug;

use crate::error::{DiscoveryError, Result};
use crate::traits::store::{CandidateStore, SourceRegistry, WatchlistStore};
use crate::types::{
    restaurant::{InsertOutcome, NewRestaurant, PersistedRestaurant},
    source::Source,
    target::WatchlistEntry,
};

/// SQLite-backed store for restaurants, watchlist and sources.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://foodie_memory.db?mode=rwc` - Create if not exists
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_pool_size(database_url, 5).await
    }

    /// Open (or create) a database file.
    pub async fn open(path: &str) -> Result<Self> {
        Self::new(&format!("sqlite://{}?mode=rwc", path)).await
    }

    /// Create an in-memory SQLite store (for testing).
    ///
    /// Every pooled connection to `:memory:` is its own database, so the
    /// pool is pinned to a single connection.
    pub async fn in_memory() -> Result<Self> {
        Self::with_pool_size("sqlite::memory:", 1).await
    }

    async fn with_pool_size(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(DiscoveryError::storage)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS restaurants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                neighborhood TEXT,
                taste_rating INTEGER,
                notes TEXT,
                created_at TEXT
            );

            CREATE TABLE IF NOT EXISTS watchlist (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                food_item TEXT NOT NULL UNIQUE,
                location TEXT NOT NULL,
                last_checked TEXT
            );

            CREATE TABLE IF NOT EXISTS sources (
                domain TEXT PRIMARY KEY,
                notes TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(DiscoveryError::storage)?;

        // Older files were created without these.
        let created_at_columns: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pragma_table_info('restaurants') WHERE name = 'created_at'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(DiscoveryError::storage)?;

        if created_at_columns == 0 {
            debug!("Adding restaurants.created_at");
            sqlx::query("ALTER TABLE restaurants ADD COLUMN created_at TEXT")
                .execute(&self.pool)
                .await
                .map_err(DiscoveryError::storage)?;
        }

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_restaurants_name ON restaurants(name)")
            .execute(&self.pool)
            .await
            .map_err(DiscoveryError::storage)?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    // SQLite CURRENT_TIMESTAMP format
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DiscoveryError::Storage(format!("Invalid date {:?}: {}", raw, e).into()))
}

// Row types for sqlx queries
#[derive(Debug, FromRow)]
struct RestaurantRow {
    id: i64,
    name: String,
    neighborhood: Option<String>,
    taste_rating: Option<i64>,
    notes: Option<String>,
    created_at: Option<String>,
}

impl RestaurantRow {
    fn into_restaurant(self) -> Result<PersistedRestaurant> {
        let created_at = match self.created_at.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => DateTime::<Utc>::UNIX_EPOCH,
        };

        Ok(PersistedRestaurant {
            id: self.id,
            name: self.name,
            neighborhood: self.neighborhood.unwrap_or_default(),
            taste_rating: self.taste_rating.unwrap_or_default() as i32,
            notes: self.notes.unwrap_or_default(),
            created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct WatchlistRow {
    id: i64,
    food_item: String,
    location: Option<String>,
    last_checked: Option<String>,
}

impl WatchlistRow {
    fn into_entry(self) -> Result<WatchlistEntry> {
        let last_checked = self
            .last_checked
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(WatchlistEntry {
            id: self.id,
            subject: self.food_item,
            locality: self.location.unwrap_or_default(),
            last_checked,
        })
    }
}

#[async_trait]
impl CandidateStore for SqliteStore {
    async fn insert_if_absent(
        &self,
        record: &NewRestaurant,
    ) -> Result<InsertOutcome<PersistedRestaurant>> {
        if record.name.is_empty() {
            return Err(DiscoveryError::InvalidInput {
                reason: "restaurant name is empty".into(),
            });
        }

        let row = sqlx::query_as::<_, RestaurantRow>(
            r#"
            INSERT INTO restaurants (name, neighborhood, taste_rating, notes, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(name) DO NOTHING
            RETURNING id, name, neighborhood, taste_rating, notes, created_at
            "#,
        )
        .bind(&record.name)
        .bind(&record.neighborhood)
        .bind(record.taste_rating as i64)
        .bind(&record.notes)
        .bind(Utc::now().to_rfc3339())
        .fetch_optional(&self.pool)
        .await
        .map_err(DiscoveryError::storage)?;

        match row {
            Some(r) => Ok(InsertOutcome::Inserted(r.into_restaurant()?)),
            None => Ok(InsertOutcome::Duplicate),
        }
    }

    async fn list_all(&self) -> Result<Vec<PersistedRestaurant>> {
        let rows = sqlx::query_as::<_, RestaurantRow>(
            "SELECT id, name, neighborhood, taste_rating, notes, created_at FROM restaurants ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DiscoveryError::storage)?;

        rows.into_iter().map(RestaurantRow::into_restaurant).collect()
    }
}

#[async_trait]
impl WatchlistStore for SqliteStore {
    async fn list_targets(&self) -> Result<Vec<WatchlistEntry>> {
        let rows = sqlx::query_as::<_, WatchlistRow>(
            "SELECT id, food_item, location, last_checked FROM watchlist ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DiscoveryError::storage)?;

        rows.into_iter().map(WatchlistRow::into_entry).collect()
    }

    async fn add_target(&self, subject: &str, locality: &str) -> Result<InsertOutcome> {
        let result = sqlx::query(
            "INSERT INTO watchlist (food_item, location) VALUES (?, ?) ON CONFLICT(food_item) DO NOTHING",
        )
        .bind(subject)
        .bind(locality)
        .execute(&self.pool)
        .await
        .map_err(DiscoveryError::storage)?;

        Ok(if result.rows_affected() > 0 {
            InsertOutcome::Inserted(())
        } else {
            InsertOutcome::Duplicate
        })
    }

    async fn mark_checked(&self, subject: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE watchlist SET last_checked = ? WHERE food_item = ?")
            .bind(at.to_rfc3339())
            .bind(subject)
            .execute(&self.pool)
            .await
            .map_err(DiscoveryError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl SourceRegistry for SqliteStore {
    async fn list_sources(&self) -> Result<Vec<Source>> {
        let rows: Vec<(String, Option<String>)> =
            sqlx::query_as("SELECT domain, notes FROM sources ORDER BY rowid")
                .fetch_all(&self.pool)
                .await
                .map_err(DiscoveryError::storage)?;

        Ok(rows
            .into_iter()
            .map(|(domain, notes)| Source { domain, notes })
            .collect())
    }

    async fn add_source(&self, source: &Source) -> Result<InsertOutcome> {
        let result = sqlx::query(
            "INSERT INTO sources (domain, notes) VALUES (?, ?) ON CONFLICT(domain) DO NOTHING",
        )
        .bind(&source.domain)
        .bind(&source.notes)
        .execute(&self.pool)
        .await
        .map_err(DiscoveryError::storage)?;

        Ok(if result.rows_affected() > 0 {
            InsertOutcome::Inserted(())
        } else {
            InsertOutcome::Duplicate
        })
    }
}
