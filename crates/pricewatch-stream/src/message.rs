//! Wire messages of the market stream.

use pricewatch_core::error::DecodeError;
use pricewatch_core::types::PriceEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Subscription handshake sent right after the socket opens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscribeRequest {
    pub method: String,
    pub params: Vec<String>,
    pub id: u64,
}

impl SubscribeRequest {
    pub fn subscribe(channel: &str, id: u64) -> Self {
        Self {
            method: "SUBSCRIBE".to_string(),
            params: vec![channel.to_string()],
            id,
        }
    }

    pub fn unsubscribe(channel: &str, id: u64) -> Self {
        Self {
            method: "UNSUBSCRIBE".to_string(),
            params: vec![channel.to_string()],
            id,
        }
    }
}

/// One inbound data frame carrying a batch of ticker events.
///
/// Events are kept raw so that a single malformed entry can be dropped
/// without losing the rest of the batch.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamFrame {
    /// Combined-stream name, absent on raw streams
    #[serde(default)]
    pub stream: Option<String>,
    /// Ticker events
    pub data: Vec<Value>,
    /// Local receipt time, Unix milliseconds
    #[serde(skip)]
    pub received_at: i64,
}

impl StreamFrame {
    /// Decode every event of the frame.
    pub fn price_events(&self) -> impl Iterator<Item = Result<PriceEvent, DecodeError>> + '_ {
        self.data
            .iter()
            .map(move |raw| decode_price_event(raw, self.received_at))
    }
}

/// Ticker event as sent by the exchange.
///
/// JSON format:
/// ```json
/// {
///   "e": "1hTicker",
///   "E": 1722414290379,
///   "s": "XRPUSDT",
///   "c": "0.64870000",
///   "C": 1722414289196
/// }
/// ```
#[derive(Debug, Deserialize)]
struct RawTicker {
    #[serde(rename = "E")]
    event_time: Option<i64>,
    #[serde(rename = "s")]
    symbol: Option<String>,
    #[serde(rename = "c")]
    close: Option<String>,
    #[serde(rename = "C")]
    close_time: Option<i64>,
}

/// Decode a text message into a data frame.
///
/// Returns `Ok(None)` for control responses (subscription acknowledgements)
/// that carry an `id` but no data.
pub fn decode_frame(text: &str, received_at: i64) -> Result<Option<StreamFrame>, DecodeError> {
    let value: Value = serde_json::from_str(text)?;

    if value.get("data").is_none() {
        if value.get("id").is_some() {
            return Ok(None);
        }
        let preview: String = text.chars().take(80).collect();
        return Err(DecodeError::UnsupportedFrame(preview));
    }

    let mut frame: StreamFrame = serde_json::from_value(value)?;
    frame.received_at = received_at;
    Ok(Some(frame))
}

/// Decode one raw ticker event.
pub fn decode_price_event(raw: &Value, received_at: i64) -> Result<PriceEvent, DecodeError> {
    let ticker: RawTicker = serde_json::from_value(raw.clone())?;

    ticker.event_time.ok_or(DecodeError::MissingField("E"))?;
    let symbol = ticker.symbol.ok_or(DecodeError::MissingField("s"))?;
    let close = ticker.close.ok_or(DecodeError::MissingField("c"))?;
    let close_time = ticker.close_time.ok_or(DecodeError::MissingField("C"))?;

    let price: f64 = close
        .parse()
        .map_err(|_| DecodeError::InvalidPrice(close.clone()))?;
    if !price.is_finite() || price <= 0.0 {
        return Err(DecodeError::InvalidPrice(close));
    }

    Ok(PriceEvent {
        symbol,
        price,
        event_time: close_time,
        receipt_time: received_at,
    })
}
