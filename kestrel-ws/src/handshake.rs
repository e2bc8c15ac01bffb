use hyper::header::HeaderValue;
use hyper::{upgrade, Body, Method, Version};
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::handshake::derive_accept_key;

fn is_get_method(request: &hyper::Request<Body>) -> bool {
    request.method() == Method::GET
}

fn is_http_version_11_or_larger(request: &hyper::Request<Body>) -> bool {
    request.version() >= Version::HTTP_11
}

fn is_connection_header_upgrade(request: &hyper::Request<Body>) -> bool {
    request
        .headers()
        .get("Connection")
        .and_then(|h| h.to_str().ok())
        .map(|h| {
            h.split(|c| c == ' ' || c == ',')
                .any(|p| p.eq_ignore_ascii_case("Upgrade"))
        })
        .unwrap_or(false)
}

fn is_upgrade_header_web_socket(request: &hyper::Request<Body>) -> bool {
    request
        .headers()
        .get("Upgrade")
        .and_then(|h| h.to_str().ok())
        .map(|h| h.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false)
}

fn is_web_socket_version_header_13(request: &hyper::Request<Body>) -> bool {
    request
        .headers()
        .get("Sec-WebSocket-Version")
        .map(|h| h == "13")
        .unwrap_or(false)
}

fn web_socket_key_header(request: &hyper::Request<Body>) -> Option<&HeaderValue> {
    request.headers().get("Sec-WebSocket-Key")
}

/// Whether the request asks for a protocol upgrade to WebSocket at all.
pub fn is_upgrade_request(request: &hyper::Request<Body>) -> bool {
    is_connection_header_upgrade(request) && is_upgrade_header_web_socket(request)
}

pub(crate) struct Handshake {
    pub(crate) on_upgrade: upgrade::OnUpgrade,
    pub(crate) accept_key: String,
}

/// Validates the upgrade preconditions and claims the connection upgrade.
pub(crate) fn try_handshake(
    request: &mut hyper::Request<Body>,
) -> Result<Handshake, ProtocolError> {
    if !is_get_method(request) {
        return Err(ProtocolError::WrongHttpMethod);
    }

    if !is_http_version_11_or_larger(request) {
        return Err(ProtocolError::WrongHttpVersion);
    }

    if !is_connection_header_upgrade(request) {
        return Err(ProtocolError::MissingConnectionUpgradeHeader);
    }

    if !is_upgrade_header_web_socket(request) {
        return Err(ProtocolError::MissingUpgradeWebSocketHeader);
    }

    if !is_web_socket_version_header_13(request) {
        return Err(ProtocolError::MissingSecWebSocketVersionHeader);
    }

    let accept_key = derive_accept_key(
        web_socket_key_header(request)
            .ok_or(ProtocolError::MissingSecWebSocketKey)?
            .as_bytes(),
    );

    let on_upgrade = upgrade::on(request);

    Ok(Handshake {
        on_upgrade,
        accept_key,
    })
}
