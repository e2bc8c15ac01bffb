use crate::routing::PathParams;
use crate::{AnyError, AnyResult, Request, Response};
use async_trait::async_trait;
use hyper::header::{HeaderName, ALLOW};
use hyper::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// Error carrying an HTTP status, raised by responders and sinks to short
/// circuit dispatch with a well-formed error response.
#[derive(Debug, Error)]
#[error("{status} {title}")]
pub struct HttpError {
    pub status: StatusCode,
    pub title: String,
    pub description: Option<String>,
    /// Extra headers the error response must carry, e.g. `Allow` on a 405.
    pub headers: Vec<(HeaderName, String)>,
}

impl HttpError {
    pub fn new(status: StatusCode, title: &str) -> Self {
        Self {
            status,
            title: title.to_string(),
            description: None,
            headers: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn bad_request(description: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request").with_description(description)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn method_not_allowed(allow: &str) -> Self {
        let mut error = Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        error.headers.push((ALLOW, allow.to_string()));
        error
    }

    pub fn unsupported_media_type(content_type: &str) -> Self {
        Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type")
            .with_description(&format!("no handler for {}", content_type))
    }

    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }

    /// Media representation of the error, rendered through the registry like
    /// any other media body.
    pub fn to_media(&self) -> Value {
        match &self.description {
            Some(description) => json!({"title": self.title, "description": description}),
            None => json!({"title": self.title}),
        }
    }
}

/// Writes an `HttpError` representation into the response.
pub trait ErrorSerializer: Send + Sync {
    fn serialize(&self, req: &Request, resp: &mut Response, error: &HttpError);
}

/// Emits the error media body with the error's status and extra headers.
pub struct DefaultErrorSerializer;

impl ErrorSerializer for DefaultErrorSerializer {
    fn serialize(&self, _req: &Request, resp: &mut Response, error: &HttpError) {
        resp.status = error.status;
        for (name, value) in &error.headers {
            // A header value an error constructor produced is always valid.
            let _ = resp.set_header(name.clone(), value);
        }
        resp.set_media(error.to_media());
    }
}

/// Member of the error-handler chain. Handlers are tried in order; a handler
/// either claims the error (fills the response, returns `Ok(true)`), declines
/// it (`Ok(false)`), or fails itself, which aborts the chain.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(
        &self,
        req: &mut Request,
        resp: &mut Response,
        error: &AnyError,
        params: &PathParams,
    ) -> AnyResult<bool>;
}

/// Terminal handler for `HttpError`: serializes the error and claims it.
/// Other error types are declined.
pub struct HttpErrorHandler {
    pub serializer: Arc<dyn ErrorSerializer>,
}

impl HttpErrorHandler {
    pub fn new() -> Self {
        Self {
            serializer: Arc::new(DefaultErrorSerializer),
        }
    }
}

impl Default for HttpErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ErrorHandler for HttpErrorHandler {
    async fn handle(
        &self,
        req: &mut Request,
        resp: &mut Response,
        error: &AnyError,
        _params: &PathParams,
    ) -> AnyResult<bool> {
        match error.downcast_ref::<HttpError>() {
            Some(http_error) => {
                self.serializer.serialize(req, resp, http_error);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
