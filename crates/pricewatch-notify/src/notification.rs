//! Notification records and alert message formatting.

use chrono::{DateTime, Utc};
use pricewatch_core::types::EvaluationCandidate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Characters with markup meaning in Telegram MarkdownV2.
const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

const SEPARATOR_LINE: &str = "`================================`";

/// One queued alert message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique id, 32 hex characters
    pub id: String,
    /// Ready-to-send MarkdownV2 text
    pub message: String,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an undelivered notification from preformatted text.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            message: message.into(),
            delivered: false,
            created_at: Utc::now(),
        }
    }

    /// Batch separator sent ahead of every non-empty dispatch pass.
    pub fn separator() -> Self {
        Self::new(format!("{SEPARATOR_LINE}\n{SEPARATOR_LINE}"))
    }

    /// Format an alert for a classified candidate.
    ///
    /// `quote_suffix` is stripped from the symbol for the header.
    pub fn from_candidate(candidate: &EvaluationCandidate, quote_suffix: &str, at: DateTime<Utc>) -> Self {
        let base = candidate
            .symbol
            .strip_suffix(quote_suffix)
            .filter(|base| !base.is_empty())
            .unwrap_or(&candidate.symbol);

        let sign = if candidate.oscillator_delta > 0.0 { "+" } else { "" };
        let values = candidate
            .recent_oscillator_series
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let lines = [
            format!(
                "*{} \\- {}*",
                escape_markdown(base),
                escape_markdown(candidate.alert_case.as_str())
            ),
            String::new(),
            format!("Price: *{}*", escape_markdown(&format_price(candidate.latest_price))),
            format!(
                "RSI change: *{}*",
                escape_markdown(&format!("{sign}{}", candidate.oscillator_delta))
            ),
            format!("RSI values: *{}*", escape_markdown(&values)),
            String::new(),
            format!(
                "_Time: {}_",
                escape_markdown(&at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            ),
        ];

        let mut notification = Self::new(lines.join("\n"));
        notification.created_at = at;
        notification
    }
}

/// Backslash-escape MarkdownV2 reserved characters.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `$` amount with thousands separators, keeping every significant digit.
fn format_price(price: f64) -> String {
    let raw = price.abs().to_string();
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pricewatch_core::types::AlertCase;

    fn candidate(alert_case: AlertCase, delta: f64) -> EvaluationCandidate {
        EvaluationCandidate {
            symbol: "SOLUSDT".to_string(),
            alert_case,
            oscillator_delta: delta,
            latest_price: 1234.5,
            recent_oscillator_series: vec![41.0, 47.5, 53.5],
        }
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a-b+c.d"), "a\\-b\\+c\\.d");
        assert_eq!(escape_markdown("JUMP_FROM_WEAK"), "JUMP\\_FROM\\_WEAK");
        assert_eq!(escape_markdown("plain"), "plain");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1234.5), "$1,234.5");
        assert_eq!(format_price(0.6487), "$0.6487");
        assert_eq!(format_price(1_000_000.0), "$1,000,000");
        assert_eq!(format_price(12.0), "$12");
    }

    #[test]
    fn test_jump_message_layout() {
        let at = Utc.with_ymd_and_hms(2024, 7, 31, 8, 24, 49).unwrap();
        let notification = Notification::from_candidate(&candidate(AlertCase::Jump, 12.5), "USDT", at);

        let expected = [
            "*SOL \\- JUMP*",
            "",
            "Price: *$1,234\\.5*",
            "RSI change: *\\+12\\.5*",
            "RSI values: *41, 47\\.5, 53\\.5*",
            "",
            "_Time: 2024\\-07\\-31 08:24:49 UTC_",
        ]
        .join("\n");
        assert_eq!(notification.message, expected);
        assert!(!notification.delivered);
        assert_eq!(notification.id.len(), 32);
        assert_eq!(notification.created_at, at);
    }

    #[test]
    fn test_drop_message_has_no_plus_sign() {
        let at = Utc.with_ymd_and_hms(2024, 7, 31, 8, 24, 49).unwrap();
        let notification =
            Notification::from_candidate(&candidate(AlertCase::DropToWeak, -16.25), "USDT", at);
        assert!(notification.message.starts_with("*SOL \\- DROP\\_TO\\_WEAK*"));
        assert!(notification.message.contains("RSI change: *\\-16\\.25*"));
    }

    #[test]
    fn test_unique_ids_and_separator() {
        let a = Notification::new("a");
        let b = Notification::new("b");
        assert_ne!(a.id, b.id);

        let separator = Notification::separator();
        assert_eq!(separator.message.lines().count(), 2);
        assert!(separator.message.lines().all(|l| l == SEPARATOR_LINE));
    }
}
