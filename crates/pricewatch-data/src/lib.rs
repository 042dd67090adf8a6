//! Price stores and candle import.
//!
//! Two [`PriceStore`] implementations are provided: [`SqliteStore`] for the
//! persisted current-price and candle tables, and [`MemoryStore`] for tests
//! and dry runs. [`CsvCandleSource`] reads candle files for bulk import.

mod config;
mod csv_source;
mod memory;
mod sqlite;

pub use config::DatabaseConfig;
pub use csv_source::CsvCandleSource;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use pricewatch_core::error::StoreError;
use pricewatch_core::traits::PriceStore;
use pricewatch_core::types::Timeframe;
use tracing::info;

/// Import a CSV candle file for one symbol into a store.
///
/// # Returns
/// Number of candles upserted
pub async fn import_csv(
    store: &dyn PriceStore,
    path: &str,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<usize, StoreError> {
    let source = CsvCandleSource::new(path)?;
    let candles = source.load(symbol, timeframe)?;
    store.upsert_candles(timeframe, &candles).await?;
    info!(path, symbol, %timeframe, candles = candles.len(), "Imported candles");
    Ok(candles.len())
}
