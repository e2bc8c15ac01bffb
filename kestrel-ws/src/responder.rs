use crate::channel::WsChannel;
use crate::handshake::try_handshake;
use async_trait::async_trait;
use hyper::header::{CONNECTION, SEC_WEBSOCKET_ACCEPT, UPGRADE};
use hyper::http::request::Parts;
use hyper::http::Extensions;
use hyper::{Body, StatusCode};
use kestrel_core::errors::HttpError;
use kestrel_core::responder::Responder;
use kestrel_core::routing::PathParams;
use kestrel_core::{AnyError, AnyResult, Request, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::protocol::{Role, WebSocketConfig};
use tokio_tungstenite::WebSocketStream;

/// Request data available to a WebSocket responder after the upgrade. The
/// body is gone by then; only the head survives.
pub struct WsContext {
    pub http_parts: Parts,
    pub remote_addr: SocketAddr,
    pub extensions: Arc<Extensions>,
    pub params: PathParams,
}

/// WebSocket member of the tasked responder family: owns the conversation on
/// an upgraded channel.
#[async_trait]
pub trait WsResponder: Send + Sync + 'static {
    async fn respond(&self, ctx: &WsContext, channel: &mut WsChannel) -> AnyResult<()>;
}

/// WebSocket member of the tasked error-handler family. The channel is
/// passed when the upgrade already happened, `None` otherwise.
#[async_trait]
pub trait WsErrorHandler: Send + Sync + 'static {
    async fn handle(
        &self,
        ctx: &WsContext,
        channel: Option<&mut WsChannel>,
        error: &AnyError,
    ) -> AnyResult<bool>;
}

/// Adapter mounting a `WsResponder` on an HTTP route: validates the
/// handshake, answers 101 and runs the conversation on a spawned task.
pub struct WsEndpoint<R: WsResponder> {
    responder: Arc<R>,
    error_handlers: Vec<Arc<dyn WsErrorHandler>>,
    config: Option<WebSocketConfig>,
}

impl<R: WsResponder> WsEndpoint<R> {
    pub fn new(responder: R) -> Self {
        Self {
            responder: Arc::new(responder),
            error_handlers: Vec::new(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: WebSocketConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Registers an error handler for the conversation task. Later
    /// registrations are tried first.
    pub fn error_handler(mut self, handler: impl WsErrorHandler) -> Self {
        self.error_handlers.insert(0, Arc::new(handler));
        self
    }
}

#[async_trait]
impl<R: WsResponder> Responder for WsEndpoint<R> {
    async fn respond(
        &self,
        req: &mut Request,
        resp: &mut Response,
        params: &PathParams,
    ) -> AnyResult<()> {
        let handshake = try_handshake(&mut req.http).map_err(|error| match error {
            ProtocolError::WrongHttpMethod => HttpError::method_not_allowed("GET"),
            other => HttpError::bad_request(&other.to_string()),
        })?;

        let http = std::mem::replace(&mut req.http, hyper::Request::new(Body::empty()));
        let (http_parts, _) = http.into_parts();
        let ctx = WsContext {
            http_parts,
            remote_addr: req.remote_addr,
            extensions: req.extensions.clone(),
            params: params.clone(),
        };

        let responder = self.responder.clone();
        let error_handlers = self.error_handlers.clone();
        let config = self.config;
        let on_upgrade = handshake.on_upgrade;

        tokio::task::spawn(async move {
            let upgraded = match on_upgrade.await {
                Ok(upgraded) => upgraded,
                Err(error) => {
                    tracing::warn!(error = %error, "websocket upgrade failed");
                    return;
                }
            };
            let stream = WebSocketStream::from_raw_socket(upgraded, Role::Server, config).await;
            let mut channel = WsChannel::new(stream);

            if let Err(error) = responder.respond(&ctx, &mut channel).await {
                tracing::warn!(error = %error, "websocket responder failed");
                let mut claimed = false;
                for handler in &error_handlers {
                    match handler.handle(&ctx, Some(&mut channel), &error).await {
                        Ok(true) => {
                            claimed = true;
                            break;
                        }
                        Ok(false) => continue,
                        Err(handler_error) => {
                            tracing::warn!(error = %handler_error, "websocket error handler failed");
                            break;
                        }
                    }
                }
                if !claimed {
                    tracing::error!(error = %error, "unhandled websocket error");
                }
            }
            let _ = channel.close().await;
        });

        resp.status = StatusCode::SWITCHING_PROTOCOLS;
        resp.set_header(CONNECTION, "Upgrade")?;
        resp.set_header(UPGRADE, "websocket")?;
        resp.set_header(SEC_WEBSOCKET_ACCEPT, &handshake.accept_key)?;
        Ok(())
    }
}
