//! Stream connection lifecycle.

use crate::config::StreamConfig;
use crate::message::{decode_frame, StreamFrame, SubscribeRequest};
use chrono::Utc;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use pricewatch_core::error::StreamError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Subscribed,
}

/// One live market-stream socket plus its inbound message queue.
///
/// The queue is unbounded: the consumer may fall behind without any frame
/// being dropped. Only a new connection cycle clears it.
pub struct StreamConnection {
    config: StreamConfig,
    state: Mutex<ConnectionState>,
    alive: AtomicBool,
    next_request_id: AtomicU64,
    generation: AtomicU64,
    queue: Mutex<VecDeque<StreamFrame>>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    connect_lock: tokio::sync::Mutex<()>,
}

impl StreamConnection {
    /// Create a disconnected stream connection.
    pub fn new(config: StreamConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            state: Mutex::new(ConnectionState::Disconnected),
            alive: AtomicBool::new(false),
            next_request_id: AtomicU64::new(1),
            generation: AtomicU64::new(0),
            queue: Mutex::new(VecDeque::new()),
            shutdown: Mutex::new(None),
            connect_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Number of frames waiting to be consumed.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Pop the oldest buffered frame.
    pub fn pop_frame(&self) -> Option<StreamFrame> {
        self.queue.lock().pop_front()
    }

    /// Open the socket, send the subscription handshake and start reading.
    ///
    /// # Errors
    /// Returns an error if a connection is already alive, the socket cannot
    /// be opened, or the handshake cannot be sent. The state is
    /// `Disconnected` after any error.
    pub async fn connect(self: &Arc<Self>) -> Result<(), StreamError> {
        let _guard = self.connect_lock.lock().await;
        if self.is_alive() {
            return Err(StreamError::AlreadyConnected);
        }

        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let request = SubscribeRequest::subscribe(&self.config.channel, request_id);
        let handshake = serde_json::to_string(&request)
            .map_err(|e| StreamError::Handshake(e.to_string()))?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.lock() = ConnectionState::Connecting;
        self.queue.lock().clear();

        info!(endpoint = %self.config.endpoint, "Connecting to market stream");
        let ws = match connect_async(self.config.endpoint.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(e) => {
                *self.state.lock() = ConnectionState::Disconnected;
                return Err(StreamError::Connection(e.to_string()));
            }
        };
        let (mut sink, stream) = ws.split();

        if let Err(e) = sink.send(Message::Text(handshake)).await {
            *self.state.lock() = ConnectionState::Disconnected;
            return Err(StreamError::Handshake(e.to_string()));
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        *self.shutdown.lock() = Some(shutdown_tx);
        {
            let mut state = self.state.lock();
            *state = ConnectionState::Subscribed;
            self.alive.store(true, Ordering::SeqCst);
        }
        info!(
            request_id,
            channel = %self.config.channel,
            "Market stream connected, subscribed to price events"
        );

        tokio::spawn(self.clone().read_loop(generation, sink, stream, shutdown_rx));
        Ok(())
    }

    /// Force the socket closed and wait until the connection is no longer alive.
    pub async fn terminate(&self) {
        if let Some(shutdown) = self.shutdown.lock().take() {
            let _ = shutdown.send(());
        }
        while self.is_alive() {
            tokio::task::yield_now().await;
        }
    }

    async fn read_loop(
        self: Arc<Self>,
        generation: u64,
        mut sink: SplitSink<WsStream, Message>,
        mut stream: SplitStream<WsStream>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Closing market stream on request");
                    let _ = sink.send(Message::Close(None)).await;
                    let _ = sink.close().await;
                    break;
                }
                message = stream.next() => match message {
                    Some(Ok(Message::Text(text))) => self.on_text(&text),
                    Some(Ok(Message::Close(frame))) => {
                        info!(?frame, "Market stream closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Market stream transport error");
                        break;
                    }
                    None => break,
                },
            }
        }

        self.mark_disconnected(generation);
    }

    fn on_text(&self, text: &str) {
        if self.state() != ConnectionState::Subscribed {
            debug!("Ignoring message received before subscription");
            return;
        }

        match decode_frame(text, Utc::now().timestamp_millis()) {
            Ok(Some(frame)) => self.queue.lock().push_back(frame),
            Ok(None) => debug!("Control response from market stream"),
            Err(e) => warn!(error = %e, "Dropping malformed stream message"),
        }
    }

    fn mark_disconnected(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        let mut state = self.state.lock();
        *state = ConnectionState::Disconnected;
        self.alive.store(false, Ordering::SeqCst);
        self.shutdown.lock().take();
        info!("Market stream disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{spawn_scripted_server, Session};
    use std::time::Duration;
    use tokio::net::TcpListener;

    fn test_config(endpoint: String) -> StreamConfig {
        StreamConfig {
            endpoint,
            channel: "!ticker_1h@arr".to_string(),
            probe_interval_secs: 1,
            refresh_interval_secs: 0,
        }
    }

    async fn wait_for_pending(connection: &StreamConnection, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while connection.pending() < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("frames were not queued in time");
    }

    #[tokio::test]
    async fn test_connect_subscribes_and_queues_fifo() {
        let (endpoint, mut handshakes) = spawn_scripted_server(vec![Session::ticks(2)]).await;
        let connection = StreamConnection::new(test_config(endpoint));

        connection.connect().await.unwrap();
        assert!(connection.is_alive());
        assert_eq!(connection.state(), ConnectionState::Subscribed);

        let handshake: SubscribeRequest =
            serde_json::from_str(&handshakes.recv().await.unwrap()).unwrap();
        assert_eq!(handshake, SubscribeRequest::subscribe("!ticker_1h@arr", 1));

        wait_for_pending(&connection, 2).await;
        let first = connection.pop_frame().unwrap();
        let second = connection.pop_frame().unwrap();
        assert_eq!(first.data[0]["s"], "BTCUSDT");
        assert_eq!(second.data[0]["s"], "ETHUSDT");
        assert!(connection.pop_frame().is_none());

        assert!(matches!(
            connection.connect().await,
            Err(StreamError::AlreadyConnected)
        ));
    }

    #[tokio::test]
    async fn test_terminate_then_reconnect_uses_next_request_id() {
        let (endpoint, mut handshakes) = spawn_scripted_server(vec![Session::ticks(2)]).await;
        let connection = StreamConnection::new(test_config(endpoint));

        connection.connect().await.unwrap();
        handshakes.recv().await.unwrap();

        connection.terminate().await;
        assert!(!connection.is_alive());
        assert_eq!(connection.state(), ConnectionState::Disconnected);

        connection.connect().await.unwrap();
        let handshake: SubscribeRequest =
            serde_json::from_str(&handshakes.recv().await.unwrap()).unwrap();
        assert_eq!(handshake.id, 2);
        assert!(connection.is_alive());
    }

    #[tokio::test]
    async fn test_reconnect_starts_with_empty_queue() {
        let (endpoint, _handshakes) =
            spawn_scripted_server(vec![Session::ticks(2), Session::default()]).await;
        let connection = StreamConnection::new(test_config(endpoint));

        connection.connect().await.unwrap();
        wait_for_pending(&connection, 2).await;

        connection.terminate().await;
        assert_eq!(connection.pending(), 2);

        connection.connect().await.unwrap();
        assert_eq!(connection.pending(), 0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(connection.pending(), 0);
        assert!(connection.pop_frame().is_none());
    }

    #[tokio::test]
    async fn test_connect_failure_leaves_disconnected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let connection = StreamConnection::new(test_config(format!("ws://{}", addr)));
        assert!(connection.connect().await.is_err());
        assert!(!connection.is_alive());
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }
}
