//! Ranking of tracked symbols.

use crate::statistic::SymbolStatistics;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Value symbols are ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankKey {
    /// Newest committed velocity; symbols without momentum do not qualify
    #[default]
    Velocity,
    /// Newest committed RSI value
    #[serde(alias = "rsi")]
    Oscillator,
}

impl RankKey {
    /// Sort value of a symbol, `None` when it does not qualify.
    pub fn value_of(&self, stats: &SymbolStatistics) -> Option<f64> {
        let newest = stats.newest()?;
        match self {
            RankKey::Velocity => newest.velocity.filter(|v| *v != 0.0),
            RankKey::Oscillator => Some(newest.oscillator),
        }
    }
}

impl fmt::Display for RankKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankKey::Velocity => write!(f, "velocity"),
            RankKey::Oscillator => write!(f, "oscillator"),
        }
    }
}

impl FromStr for RankKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "velocity" => Ok(RankKey::Velocity),
            "oscillator" | "rsi" => Ok(RankKey::Oscillator),
            _ => Err(format!("Unknown rank key: {}", s)),
        }
    }
}

/// Sort direction of the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    #[default]
    Descending,
    Ascending,
}

impl fmt::Display for RankOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankOrder::Descending => write!(f, "descending"),
            RankOrder::Ascending => write!(f, "ascending"),
        }
    }
}

impl FromStr for RankOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "descending" | "desc" => Ok(RankOrder::Descending),
            "ascending" | "asc" => Ok(RankOrder::Ascending),
            _ => Err(format!("Unknown rank order: {}", s)),
        }
    }
}

impl RankOrder {
    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            RankOrder::Descending => ordering.reverse(),
            RankOrder::Ascending => ordering,
        }
    }
}

/// Read-only projection of one symbol's statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopToken {
    pub symbol: String,
    pub latest_price: f64,
    pub latest_oscillator: f64,
    /// Newest first
    pub recent_prices: Vec<f64>,
    pub recent_velocities: Vec<f64>,
    pub recent_accelerations: Vec<f64>,
    pub recent_oscillator_values: Vec<f64>,
}

impl From<&SymbolStatistics> for TopToken {
    fn from(stats: &SymbolStatistics) -> Self {
        let window = stats.window();
        Self {
            symbol: stats.symbol().to_string(),
            latest_price: stats
                .latest_price()
                .or_else(|| stats.newest().map(|s| s.price))
                .unwrap_or_default(),
            latest_oscillator: stats.latest_oscillator(),
            recent_prices: window.iter().map(|s| s.price).collect(),
            recent_velocities: window.iter().map(|s| s.velocity()).collect(),
            recent_accelerations: window.iter().map(|s| s.acceleration()).collect(),
            recent_oscillator_values: window.iter().map(|s| s.oscillator).collect(),
        }
    }
}

/// Order qualifying symbols by `key` and keep the first `limit`.
///
/// Ties keep the order in which symbols were first seen.
pub(crate) fn rank<'a, I>(symbols: I, key: RankKey, order: RankOrder, limit: usize) -> Vec<TopToken>
where
    I: IntoIterator<Item = &'a SymbolStatistics>,
{
    let mut candidates: Vec<(f64, u64, &SymbolStatistics)> = symbols
        .into_iter()
        .filter_map(|stats| key.value_of(stats).map(|v| (v, stats.first_seen(), stats)))
        .collect();

    candidates.sort_by(|a, b| {
        order
            .apply(a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
            .then(a.1.cmp(&b.1))
    });

    candidates
        .into_iter()
        .take(limit)
        .map(|(_, _, stats)| TopToken::from(stats))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricewatch_core::types::PriceEvent;

    fn stats_with_prices(symbol: &str, seen: u64, prices: &[f64]) -> SymbolStatistics {
        let mut stats = SymbolStatistics::new(symbol, 10, seen);
        for (i, price) in prices.iter().enumerate() {
            stats.push_price_event(PriceEvent {
                symbol: symbol.to_string(),
                price: *price,
                event_time: i as i64 * 1_000,
                receipt_time: i as i64 * 1_000,
            });
            stats.index();
        }
        stats
    }

    #[test]
    fn test_rank_by_velocity_descending() {
        let slow = stats_with_prices("SLOWUSDT", 0, &[100.0, 100.1]);
        let fast = stats_with_prices("FASTUSDT", 1, &[100.0, 105.0]);
        let falling = stats_with_prices("DOWNUSDT", 2, &[100.0, 95.0]);
        let flat = stats_with_prices("FLATUSDT", 3, &[100.0, 100.0]);
        let fresh = stats_with_prices("NEWUSDT", 4, &[100.0]);

        let ranked = rank(
            [&slow, &fast, &falling, &flat, &fresh],
            RankKey::Velocity,
            RankOrder::Descending,
            10,
        );
        let symbols: Vec<&str> = ranked.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["FASTUSDT", "SLOWUSDT", "DOWNUSDT"]);
    }

    #[test]
    fn test_rank_ascending_with_limit() {
        let a = stats_with_prices("AUSDT", 0, &[100.0, 101.0]);
        let b = stats_with_prices("BUSDT", 1, &[100.0, 99.0]);
        let c = stats_with_prices("CUSDT", 2, &[100.0, 102.0]);

        let ranked = rank([&a, &b, &c], RankKey::Velocity, RankOrder::Ascending, 2);
        let symbols: Vec<&str> = ranked.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BUSDT", "AUSDT"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let late = stats_with_prices("LATEUSDT", 5, &[10.0, 11.0]);
        let early = stats_with_prices("EARLYUSDT", 1, &[10.0, 11.0]);

        let ranked = rank([&late, &early], RankKey::Oscillator, RankOrder::Descending, 10);
        assert_eq!(ranked[0].symbol, "EARLYUSDT");
        assert_eq!(ranked[1].symbol, "LATEUSDT");
    }

    #[test]
    fn test_projection_is_newest_first() {
        let stats = stats_with_prices("XUSDT", 0, &[1.0, 2.0, 3.0]);
        let token = TopToken::from(&stats);
        assert_eq!(token.recent_prices, vec![3.0, 2.0, 1.0]);
        assert_eq!(token.latest_price, 3.0);
        assert_eq!(token.recent_velocities.len(), 3);
        assert_eq!(token.recent_velocities[2], 0.0);

        let json = serde_json::to_value(&token).unwrap();
        assert!(json.get("recentOscillatorValues").is_some());
        assert!(json.get("latestPrice").is_some());
    }

    #[test]
    fn test_rank_key_parsing() {
        assert_eq!("RSI".parse::<RankKey>().unwrap(), RankKey::Oscillator);
        assert_eq!("velocity".parse::<RankKey>().unwrap(), RankKey::Velocity);
        assert!("volume".parse::<RankKey>().is_err());

        let key: RankKey = serde_json::from_str("\"rsi\"").unwrap();
        assert_eq!(key, RankKey::Oscillator);

        assert_eq!("ASC".parse::<RankOrder>().unwrap(), RankOrder::Ascending);
        assert_eq!("descending".parse::<RankOrder>().unwrap(), RankOrder::Descending);
        assert!("sideways".parse::<RankOrder>().is_err());
    }
}
