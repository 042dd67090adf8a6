//! SQLite price store.

use crate::config::DatabaseConfig;
use async_trait::async_trait;
use pricewatch_core::error::StoreError;
use pricewatch_core::traits::PriceStore;
use pricewatch_core::types::{Candle, CurrentPrice, Timeframe};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

/// Rows per upsert statement.
const UPSERT_BATCH_SIZE: usize = 25;

type CandleRow = (String, i64, i64, f64, f64, f64, f64, f64);

/// `SQLite`-backed price store.
///
/// Holds one current-price table keyed on symbol and one candle table per
/// timeframe keyed on (symbol, open time). Tables are created on connect.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and create the schema.
    ///
    /// The database file and its parent directory are created if missing.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid, the connection fails or the
    /// schema cannot be created.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Connection(e.to_string()))?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.create_schema().await?;
        info!(url = %config.url, "Connected to price store");
        Ok(store)
    }

    /// Private in-memory database on a single connection.
    ///
    /// # Errors
    ///
    /// Returns error if connection fails.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS price_now (
                symbol TEXT PRIMARY KEY,
                time INTEGER NOT NULL,
                price REAL NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Migration(e.to_string()))?;

        for timeframe in Timeframe::all() {
            let table = timeframe.candle_table();
            let create_table = format!(
                r"
                CREATE TABLE IF NOT EXISTS {table} (
                    symbol TEXT NOT NULL,
                    open_time INTEGER NOT NULL,
                    close_time INTEGER NOT NULL,
                    volume REAL NOT NULL,
                    open_price REAL NOT NULL,
                    high_price REAL NOT NULL,
                    low_price REAL NOT NULL,
                    close_price REAL NOT NULL
                )
                "
            );
            let create_index = format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_symbol_open_time ON {table} (symbol, open_time)"
            );

            for statement in [create_table, create_index] {
                sqlx::query(&statement)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| StoreError::Migration(e.to_string()))?;
            }
        }

        debug!("Price store schema ready");
        Ok(())
    }
}

#[async_trait]
impl PriceStore for SqliteStore {
    async fn tracked_symbols(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query_as::<_, (String,)>("SELECT DISTINCT symbol FROM price_now ORDER BY symbol ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(|(symbol,)| symbol).collect())
    }

    async fn current_price(&self, symbol: &str) -> Result<Option<CurrentPrice>, StoreError> {
        let row = sqlx::query_as::<_, (String, i64, f64)>(
            "SELECT symbol, time, price FROM price_now WHERE symbol = ?1",
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(row.map(|(symbol, time, price)| CurrentPrice { symbol, time, price }))
    }

    async fn recent_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, StoreError> {
        let sql = format!(
            r"
            SELECT symbol, open_time, close_time, open_price, high_price, low_price, close_price, volume
            FROM {}
            WHERE symbol = ?1
            ORDER BY open_time DESC
            LIMIT ?2
            ",
            timeframe.candle_table()
        );

        let rows = sqlx::query_as::<_, CandleRow>(&sql)
            .bind(symbol)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(symbol, open_time, close_time, open, high, low, close, volume)| {
                Candle::new(symbol, open_time, close_time, open, high, low, close, volume)
            })
            .collect())
    }

    async fn upsert_current_prices(&self, prices: &[CurrentPrice]) -> Result<(), StoreError> {
        for batch in prices.chunks(UPSERT_BATCH_SIZE) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("INSERT INTO price_now (symbol, time, price) ");
            builder.push_values(batch, |mut row, price| {
                row.push_bind(price.symbol.clone())
                    .push_bind(price.time)
                    .push_bind(price.price);
            });
            builder.push(" ON CONFLICT(symbol) DO UPDATE SET time = excluded.time, price = excluded.price");

            builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        debug!(rows = prices.len(), "Upserted current prices");
        Ok(())
    }

    async fn upsert_candles(&self, timeframe: Timeframe, candles: &[Candle]) -> Result<(), StoreError> {
        let table = timeframe.candle_table();

        for batch in candles.chunks(UPSERT_BATCH_SIZE) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
                "INSERT INTO {table} (symbol, open_time, close_time, volume, open_price, high_price, low_price, close_price) "
            ));
            builder.push_values(batch, |mut row, candle| {
                row.push_bind(candle.symbol.clone())
                    .push_bind(candle.open_time)
                    .push_bind(candle.close_time)
                    .push_bind(candle.volume)
                    .push_bind(candle.open)
                    .push_bind(candle.high)
                    .push_bind(candle.low)
                    .push_bind(candle.close);
            });
            builder.push(
                r" ON CONFLICT(symbol, open_time) DO UPDATE SET
                    close_time = excluded.close_time,
                    volume = excluded.volume,
                    open_price = excluded.open_price,
                    high_price = excluded.high_price,
                    low_price = excluded.low_price,
                    close_price = excluded.close_price",
            );

            builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        debug!(table = %table, rows = candles.len(), "Upserted candles");
        Ok(())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
