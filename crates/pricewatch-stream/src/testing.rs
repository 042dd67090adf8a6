//! Scripted websocket server for connection tests.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

pub(crate) const TICKS: [&str; 2] = [
    r#"{"data":[{"E":1,"s":"BTCUSDT","c":"64000.5","C":1000}]}"#,
    r#"{"data":[{"E":2,"s":"ETHUSDT","c":"3100.25","C":2000}]}"#,
];

/// What the server does with one accepted client.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Session {
    /// Ticker frames sent after the ack, cycling through [`TICKS`]
    pub ticks: usize,
    /// Close the socket from the server side once the ticks are out
    pub hang_up: bool,
}

impl Session {
    pub(crate) fn ticks(ticks: usize) -> Self {
        Self { ticks, hang_up: false }
    }

    pub(crate) fn hang_up() -> Self {
        Self { ticks: 0, hang_up: true }
    }
}

/// Accepts clients forever, playing `sessions` in accept order; clients past
/// the end of the script get a silent session. Each client's first message
/// is forwarded on the returned channel.
pub(crate) async fn spawn_scripted_server(
    sessions: Vec<Session>,
) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut sessions = sessions.into_iter();
        while let Ok((socket, _)) = listener.accept().await {
            let session = sessions.next().unwrap_or_default();
            let tx = tx.clone();
            tokio::spawn(async move {
                let Ok(mut ws) = accept_async(socket).await else {
                    return;
                };
                if let Some(Ok(Message::Text(text))) = ws.next().await {
                    let _ = tx.send(text);
                }
                let _ = ws.send(Message::Text(r#"{"result":null,"id":1}"#.to_string())).await;
                for tick in TICKS.iter().cycle().take(session.ticks) {
                    let _ = ws.send(Message::Text(tick.to_string())).await;
                }
                if session.hang_up {
                    let _ = ws.send(Message::Close(None)).await;
                }
                while let Some(Ok(message)) = ws.next().await {
                    if message.is_close() {
                        break;
                    }
                }
            });
        }
    });

    (format!("ws://{}", addr), rx)
}
