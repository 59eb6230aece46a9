//! WebSocket session
//!
//! Drives one connected socket: a spawned task forwards queued outbound
//! frames to the sink while the caller's task reads inbound frames and hands
//! text to `on_text`. The session ends when the peer closes, the socket
//! errors, or `shutdown` flips to `true`.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::spawn;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::utils::DashboardError;

const CLOSE_GRACE: Duration = Duration::from_millis(500);

pub type FeedStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    PeerClosed,
    Shutdown,
    Failed(DashboardError),
}

pub async fn run_session<F>(
    ws_stream: FeedStream,
    mut rx: mpsc::UnboundedReceiver<WsMessage>,
    mut shutdown: watch::Receiver<bool>,
    mut on_text: F,
) -> SessionEnd
where
    F: FnMut(&str),
{
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let mut send_loop = spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, WsMessage::Close(_));
            if let Err(e) = ws_sender.send(msg).await {
                warn!("failed to send frame: {e}");
                break;
            }
            if closing {
                break;
            }
        }
        debug!("send loop closed");
    });

    let end = loop {
        if *shutdown.borrow() {
            break SessionEnd::Shutdown;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break SessionEnd::Shutdown;
                }
            }
            frame = ws_receiver.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => on_text(text.as_str()),
                Some(Ok(WsMessage::Close(_))) | None => break SessionEnd::PeerClosed,
                Some(Ok(_)) => {}
                Some(Err(e)) => break SessionEnd::Failed(e.into()),
            }
        }
    };

    match end {
        // let a queued close frame reach the peer
        SessionEnd::Shutdown => {
            if tokio::time::timeout(CLOSE_GRACE, &mut send_loop).await.is_err() {
                send_loop.abort();
            }
        }
        _ => send_loop.abort(),
    }
    end
}
