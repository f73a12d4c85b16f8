//! WebSocket push channel client.
//!
//! [`WebSocketClient::connect`] opens the socket and spawns a single
//! connection task that owns both halves of it:
//! 1. Outbound [`ClientMessage`]s queued by [`PushChannel::emit`] are encoded
//!    and written as text frames.
//! 2. Inbound text frames are decoded; transaction status updates are
//!    forwarded to the returned receiver, anything else is dropped.
//! 3. When the server closes the socket (or a read/write fails) the task
//!    clears the `connected` flag and exits. Reconnecting is the caller's job.

use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use txwatch_types::TransactionUpdate;

use crate::channel::PushChannel;
use crate::error::ChannelError;
use crate::messages::{ClientMessage, ServerEvent};

/// Default capacity of the inbound update channel.
pub const DEFAULT_UPDATE_BUFFER: usize = 256;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client half of the real-time channel.
pub struct WebSocketClient {
    connected: Arc<AtomicBool>,
    outbound: mpsc::UnboundedSender<ClientMessage>,
    task: JoinHandle<()>,
}

impl WebSocketClient {
    /// Connect to `url` and start the connection task.
    ///
    /// Returns the client and the receiver on which inbound status updates
    /// are delivered. The receiver yields `None` once the connection is gone.
    pub async fn connect(
        url: &str,
        update_buffer: usize,
    ) -> Result<(Self, mpsc::Receiver<TransactionUpdate>), ChannelError> {
        let (socket, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        info!("push channel connected to {}", url);

        let connected = Arc::new(AtomicBool::new(true));
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = mpsc::channel(update_buffer.max(1));

        let task = tokio::spawn(run_connection(
            socket,
            outbound_rx,
            updates_tx,
            connected.clone(),
        ));

        Ok((
            Self {
                connected,
                outbound: outbound_tx,
                task,
            },
            updates_rx,
        ))
    }

    /// Close the connection and wait for the connection task to exit.
    pub async fn close(self) {
        let Self { outbound, task, .. } = self;
        // Dropping the last sender tells the task to send a close frame.
        drop(outbound);
        if let Err(e) = task.await {
            warn!("push channel task ended abnormally: {}", e);
        }
    }
}

impl PushChannel for WebSocketClient {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn emit(&self, message: ClientMessage) {
        debug!(
            event = message.event_name(),
            topics = message.topics().len(),
            "emitting push channel message"
        );
        if self.outbound.send(message).is_err() {
            warn!("push channel task is gone, dropping outbound message");
        }
    }
}

/// Connection task: multiplexes outbound messages and inbound frames.
async fn run_connection(
    socket: Socket,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientMessage>,
    updates_tx: mpsc::Sender<TransactionUpdate>,
    connected: Arc<AtomicBool>,
) {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                let Some(message) = outbound else {
                    debug!("push channel client dropped, closing socket");
                    let _ = sink.close().await;
                    break;
                };
                let text = match message.encode() {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("{}", e);
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::text(text)).await {
                    warn!("push channel write failed: {}", e);
                    break;
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if !forward_text(&text, &updates_tx).await {
                            debug!("update receiver dropped, stopping push channel");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("push channel closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("push channel read failed: {}", e);
                        break;
                    }
                }
            }
        }
    }

    connected.store(false, Ordering::Release);
    info!("push channel disconnected");
}

/// Decode one text frame and forward it if it is a status update.
///
/// Returns `false` when the update receiver has been dropped.
async fn forward_text(text: &str, updates_tx: &mpsc::Sender<TransactionUpdate>) -> bool {
    match ServerEvent::decode(text) {
        Ok(Some(ServerEvent::TransactionStatusUpdated(update))) => {
            updates_tx.send(update).await.is_ok()
        }
        Ok(None) => true,
        Err(e) => {
            warn!("ignoring push channel frame: {}", e);
            true
        }
    }
}
