use futures_util::{SinkExt, StreamExt};
use hyper::upgrade::Upgraded;
use kestrel_core::AnyResult;
use serde_json::Value;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::WebSocketStream;

/// Bidirectional channel over an upgraded connection, handed to WebSocket
/// responders and, on failure, to WebSocket error handlers.
pub struct WsChannel {
    stream: WebSocketStream<Upgraded>,
}

impl WsChannel {
    pub(crate) fn new(stream: WebSocketStream<Upgraded>) -> Self {
        Self { stream }
    }

    pub async fn send_text(&mut self, text: impl Into<String>) -> AnyResult<()> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Sends an in-memory value as a JSON text frame.
    pub async fn send_media(&mut self, media: &Value) -> AnyResult<()> {
        self.send_text(serde_json::to_string(media)?).await
    }

    /// Next raw frame, `None` once the peer is gone.
    pub async fn receive(&mut self) -> Option<AnyResult<Message>> {
        self.stream
            .next()
            .await
            .map(|result| result.map_err(Into::into))
    }

    /// Next text frame, skipping control and binary frames. `None` once the
    /// peer closed the channel.
    pub async fn receive_text(&mut self) -> AnyResult<Option<String>> {
        loop {
            match self.receive().await {
                None => return Ok(None),
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(error)) => return Err(error),
            }
        }
    }

    pub async fn close(&mut self) -> AnyResult<()> {
        match self.stream.close(None).await {
            Ok(()) => Ok(()),
            // The peer may already be gone by the time we close.
            Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
