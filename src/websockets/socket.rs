use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the server
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next text message from the server (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Handler for incoming text frames
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle one inbound frame; the next frame is not read until this returns
    async fn handle_message(&self, message: String);
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("connection closed")]
    ConnectionClosed,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Client side of a tungstenite connection
#[async_trait]
impl SocketWrapper for WebSocketStream<MaybeTlsStream<TcpStream>> {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message.into()))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                // Handed on so a non-envelope frame still surfaces as malformed
                Some(Ok(Message::Binary(bytes))) => {
                    return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
                }
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong are answered by tungstenite
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
                None => return Ok(None),
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        WebSocketStream::close(self, None)
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// Work queued for the connection task by the transport
#[derive(Debug)]
pub enum Outbound {
    Text(String),
    Close,
}

/// Connection owns the socket for its whole life.
/// Outbound text arrives over the channel fed by `Transport::send`; inbound
/// frames are handed to the message handler one at a time.
pub struct Connection {
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<Outbound>,
    message_handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<Outbound>,
        message_handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            socket,
            outbound_receiver,
            message_handler,
        }
    }

    /// Run the connection - handles both sending and receiving until disconnect
    pub async fn run(mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                // Handle outbound messages (from our app to server)
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(Outbound::Text(message)) => {
                            self.socket.send_message(message).await?
                        }
                        Some(Outbound::Close) | None => {
                            debug!("Outbound side closed, disconnecting");
                            break;
                        }
                    }
                }

                // Handle inbound messages (from server to our app)
                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(message)) => {
                            // Awaited in place: delivery is strictly sequential
                            self.message_handler.handle_message(message).await;
                        }
                        Ok(None) => break, // Server disconnected
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        // Clean disconnect
        let _ = self.socket.close().await;
        Ok(())
    }
}
