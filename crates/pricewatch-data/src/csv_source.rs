//! CSV candle source.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use pricewatch_core::error::StoreError;
use pricewatch_core::types::{Candle, Timeframe};
use serde::Deserialize;
use std::path::Path;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    open_time: String,
    #[serde(alias = "CloseTime", default)]
    close_time: Option<String>,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Candle file for a single symbol and timeframe.
pub struct CsvCandleSource {
    path: String,
}

impl CsvCandleSource {
    pub fn new(path: &str) -> Result<Self, StoreError> {
        if !Path::new(path).exists() {
            return Err(StoreError::NoData(path.to_string()));
        }
        Ok(Self {
            path: path.to_string(),
        })
    }

    /// Load every candle, oldest first.
    ///
    /// A missing close time is derived from the open time and timeframe.
    pub fn load(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>, StoreError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        let mut candles = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| StoreError::Parse(e.to_string()))?;

            let open_time = parse_timestamp(&record.open_time)?;
            let close_time = match record.close_time.as_deref().filter(|s| !s.is_empty()) {
                Some(raw) => parse_timestamp(raw)?,
                None => open_time + timeframe.as_millis() - 1,
            };

            candles.push(Candle::new(
                symbol,
                open_time,
                close_time,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        candles.sort_by_key(|c| c.open_time);
        Ok(candles)
    }
}

/// Parse a timestamp into Unix milliseconds.
///
/// Accepts RFC 3339, common date and date-time layouts, and Unix seconds or
/// milliseconds (more than 10 digits).
fn parse_timestamp(raw: &str) -> Result<i64, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp_millis());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    if let Ok(ts) = raw.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(StoreError::Parse(format!("Could not parse timestamp: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2024-01-15").unwrap(), 1_705_276_800_000);
        assert_eq!(parse_timestamp("2024-01-15 10:30:00").unwrap(), 1_705_314_600_000);
        assert_eq!(parse_timestamp("2024-01-15T10:30:00Z").unwrap(), 1_705_314_600_000);
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_load_sorts_and_derives_close_time() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        writeln!(file, "1705313700000,101,103,100,102,12.5").unwrap();
        writeln!(file, "1705312800000,100,102,99,101,10").unwrap();
        file.flush().unwrap();

        let source = CsvCandleSource::new(file.path().to_str().unwrap()).unwrap();
        let candles = source.load("BTCUSDT", Timeframe::Minute15).unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].open_time, 1_705_312_800_000);
        assert_eq!(candles[0].close_time, 1_705_312_800_000 + 900_000 - 1);
        assert_eq!(candles[1].close, 102.0);
        assert_eq!(candles[1].volume, 12.5);
        assert_eq!(candles[1].symbol, "BTCUSDT");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvCandleSource::new("/nonexistent/candles.csv"),
            Err(StoreError::NoData(_))
        ));
    }
}
