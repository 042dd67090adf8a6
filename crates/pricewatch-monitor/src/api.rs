//! Read-only HTTP API over the live tracker.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pricewatch_core::error::WatchResult;
use pricewatch_stream::StreamConnection;
use pricewatch_tracker::{PriceTracker, RankKey, RankOrder, TopToken, TrackerConfig};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Clone)]
struct ApiState {
    tracker: Arc<PriceTracker>,
    connection: Option<Arc<StreamConnection>>,
}

/// Optional overrides of the configured ranking.
///
/// Values are kept raw and parsed leniently: anything unparseable falls
/// back to the configured setting instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
struct RankQuery {
    rank_by: Option<String>,
    order: Option<String>,
    limit: Option<String>,
}

impl RankQuery {
    fn or_configured<T: FromStr>(raw: Option<&str>, configured: T) -> T {
        match raw.map(|value| value.trim().parse::<T>()) {
            Some(Ok(value)) => value,
            Some(Err(_)) => {
                debug!(value = raw.unwrap_or_default(), "Ignoring invalid ranking parameter");
                configured
            }
            None => configured,
        }
    }

    fn resolve(&self, config: &TrackerConfig) -> (RankKey, RankOrder, usize) {
        (
            Self::or_configured(self.rank_by.as_deref(), config.rank_by),
            Self::or_configured(self.order.as_deref(), config.rank_order),
            Self::or_configured(self.limit.as_deref(), config.top_tokens_size),
        )
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// `None` when no stream connection is attached
    pub stream_alive: Option<bool>,
    pub stream_state: Option<String>,
    pub tracked_symbols: usize,
}

pub struct ApiServer {
    state: ApiState,
}

impl ApiServer {
    pub fn new(tracker: Arc<PriceTracker>, connection: Option<Arc<StreamConnection>>) -> Self {
        Self {
            state: ApiState { tracker, connection },
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/toptokens", get(top_tokens))
            .route("/toptokens/:symbol", get(symbol_snapshot))
            .route("/health", get(health))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound.
    pub async fn serve(self, addr: &str) -> WatchResult<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(addr = %addr, "API listening");
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn top_tokens(State(state): State<ApiState>, Query(query): Query<RankQuery>) -> Json<Vec<TopToken>> {
    let (key, order, limit) = query.resolve(state.tracker.config());
    Json(state.tracker.rank(key, order, limit))
}

async fn symbol_snapshot(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
) -> Result<Json<TopToken>, StatusCode> {
    state
        .tracker
        .snapshot(&symbol.to_ascii_uppercase())
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let connection = state.connection.as_ref();
    Json(HealthResponse {
        status: "ok".to_string(),
        stream_alive: connection.map(|c| c.is_alive()),
        stream_state: connection.map(|c| format!("{:?}", c.state()).to_lowercase()),
        tracked_symbols: state.tracker.symbol_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use pricewatch_core::types::PriceEvent;
    use pricewatch_stream::StreamConfig;
    use tower::ServiceExt;

    fn event(symbol: &str, price: f64, event_time: i64) -> PriceEvent {
        PriceEvent {
            symbol: symbol.to_string(),
            price,
            event_time,
            receipt_time: event_time,
        }
    }

    /// AUSDT gains 10% and BUSDT 5% between two index passes.
    fn tracker() -> Arc<PriceTracker> {
        let tracker = Arc::new(PriceTracker::new(TrackerConfig::default()));
        tracker.ingest_event(event("AUSDT", 100.0, 0));
        tracker.ingest_event(event("BUSDT", 100.0, 0));
        tracker.index_all();
        tracker.ingest_event(event("AUSDT", 110.0, 60_000));
        tracker.ingest_event(event("BUSDT", 105.0, 60_000));
        tracker.index_all();
        tracker
    }

    async fn get_json<T: serde::de::DeserializeOwned>(router: Router, uri: &str) -> (StatusCode, Option<T>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).ok())
    }

    #[tokio::test]
    async fn test_top_tokens_ranked_by_velocity() {
        let router = ApiServer::new(tracker(), None).router();
        let (status, body) = get_json::<Vec<TopToken>>(router, "/toptokens").await;

        assert_eq!(status, StatusCode::OK);
        let symbols: Vec<String> = body.unwrap().into_iter().map(|t| t.symbol).collect();
        assert_eq!(symbols, vec!["AUSDT", "BUSDT"]);
    }

    #[tokio::test]
    async fn test_top_tokens_query_overrides() {
        let router = ApiServer::new(tracker(), None).router();
        let (_, body) = get_json::<Vec<TopToken>>(router.clone(), "/toptokens?order=ascending&limit=1").await;
        let body = body.unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].symbol, "BUSDT");

        let response = router
            .oneshot(Request::builder().uri("/toptokens").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let raw = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(raw.contains("\"latestPrice\":110.0"));
        assert!(raw.contains("\"recentOscillatorValues\""));
    }

    #[tokio::test]
    async fn test_rsi_alias_and_bad_parameters_still_rank() {
        let router = ApiServer::new(tracker(), None).router();

        let (status, body) = get_json::<Vec<TopToken>>(router.clone(), "/toptokens?rank_by=rsi").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap().len(), 2);

        for uri in [
            "/toptokens?limit=-1",
            "/toptokens?limit=lots",
            "/toptokens?rank_by=volume&order=sideways",
        ] {
            let (status, body) = get_json::<Vec<TopToken>>(router.clone(), uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            let symbols: Vec<String> = body.unwrap().into_iter().map(|t| t.symbol).collect();
            assert_eq!(symbols, vec!["AUSDT", "BUSDT"], "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_symbol_snapshot() {
        let router = ApiServer::new(tracker(), None).router();
        let (status, body) = get_json::<TopToken>(router.clone(), "/toptokens/ausdt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap().recent_prices, vec![110.0, 100.0]);

        let (status, _) = get_json::<TopToken>(router, "/toptokens/NONEUSDT").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_reports_connection() {
        let router = ApiServer::new(tracker(), None).router();
        let (_, body) = get_json::<HealthResponse>(router, "/health").await;
        let body = body.unwrap();
        assert_eq!(body.tracked_symbols, 2);
        assert_eq!(body.stream_alive, None);

        let connection = StreamConnection::new(StreamConfig::default());
        let router = ApiServer::new(tracker(), Some(connection)).router();
        let (_, body) = get_json::<HealthResponse>(router, "/health").await;
        let body = body.unwrap();
        assert_eq!(body.stream_alive, Some(false));
        assert_eq!(body.stream_state.as_deref(), Some("disconnected"));
    }
}
