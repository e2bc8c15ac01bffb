use hyper::http::Extensions;
use hyper::{header, Body, Method, Uri};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

/// Incoming request as seen by responders, sinks, middleware and error
/// handlers. Wraps the raw hyper request together with connection data.
pub struct Request {
    pub remote_addr: SocketAddr,
    pub extensions: Arc<Extensions>,
    pub http: hyper::Request<Body>,
}

impl Request {
    pub fn method(&self) -> &Method {
        self.http.method()
    }

    pub fn uri(&self) -> &Uri {
        self.http.uri()
    }

    pub fn path(&self) -> &str {
        self.http.uri().path()
    }

    /// Decoded query parameters. Repeated keys keep the last value.
    pub fn query_params(&self) -> HashMap<String, String> {
        query_params(self.http.uri())
    }

    /// The `Content-Type` header, if present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.http
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Takes the request body, leaving an empty one behind. The body can be
    /// consumed once; subsequent takes yield an empty body.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(self.http.body_mut())
    }
}

impl AsRef<hyper::Request<Body>> for Request {
    fn as_ref(&self) -> &hyper::Request<Body> {
        &self.http
    }
}

pub fn query_params(uri: &Uri) -> HashMap<String, String> {
    uri.query()
        .map(|v| {
            url::form_urlencoded::parse(v.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_else(HashMap::new)
}
