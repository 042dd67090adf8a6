//! Candle timeframes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interval of a stored candle series.
///
/// Each timeframe has its own candle table; the label doubles as the table
/// suffix and the config/CLI spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "15m")]
    #[default]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "1d")]
    Day1,
}

const ALL: [Timeframe; 4] = [
    Timeframe::Minute1,
    Timeframe::Minute15,
    Timeframe::Hour1,
    Timeframe::Day1,
];

impl Timeframe {
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute15 => "15m",
            Timeframe::Hour1 => "1h",
            Timeframe::Day1 => "1d",
        }
    }

    /// Candle length in milliseconds.
    pub fn as_millis(&self) -> i64 {
        const MINUTE: i64 = 60_000;
        match self {
            Timeframe::Minute1 => MINUTE,
            Timeframe::Minute15 => 15 * MINUTE,
            Timeframe::Hour1 => 60 * MINUTE,
            Timeframe::Day1 => 24 * 60 * MINUTE,
        }
    }

    /// Name of the candle table holding this timeframe.
    pub fn candle_table(&self) -> String {
        format!("price_kline_{}", self.label())
    }

    pub fn all() -> &'static [Timeframe] {
        &ALL
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL.iter()
            .copied()
            .find(|tf| tf.label() == wanted)
            .ok_or_else(|| format!("Invalid timeframe: {} (expected one of 1m, 15m, 1h, 1d)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parse() {
        assert_eq!("15m".parse::<Timeframe>().unwrap(), Timeframe::Minute15);
        assert_eq!(" 1D ".parse::<Timeframe>().unwrap(), Timeframe::Day1);
        assert!("7m".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_candle_table_names_are_distinct() {
        let mut tables: Vec<String> = Timeframe::all().iter().map(|t| t.candle_table()).collect();
        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), Timeframe::all().len());
        assert_eq!(Timeframe::Hour1.candle_table(), "price_kline_1h");
        assert_eq!(Timeframe::Day1.as_millis(), 86_400_000);
    }

    #[test]
    fn test_timeframe_serde_names() {
        let tf: Timeframe = serde_json::from_str("\"1h\"").unwrap();
        assert_eq!(tf, Timeframe::Hour1);
        assert_eq!(serde_json::to_string(&Timeframe::Minute15).unwrap(), "\"15m\"");
    }
}
