use crate::media::MediaRegistry;
use crate::unset::UnsetOr;
use crate::AnyResult;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{Body, StatusCode};
use kestrel_components::dyn_fn::DynFnOnce;
use serde_json::Value;

pub enum ResponseBody {
    Empty,
    Bytes(Bytes),
    /// In-memory value rendered through the media registry when the response
    /// is converted to wire form.
    Media(Value),
}

/// Callback scheduled to run after the response has been rendered. The tasked
/// variant is awaited on the dispatch task, the blocking variant is expected
/// to return quickly.
pub enum ResponseCallback {
    Blocking(Box<dyn FnOnce() + Send + 'static>),
    Tasked(DynFnOnce<(), ()>),
}

/// Outgoing response mutated by responders, sinks, middleware and error
/// handlers. Starts out as an empty 200.
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Unset means "let the media registry pick the content type"; a set
    /// value is emitted verbatim.
    pub content_type: UnsetOr<String>,
    pub body: ResponseBody,
    callbacks: Vec<ResponseCallback>,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            content_type: UnsetOr::Unset,
            body: ResponseBody::Empty,
            callbacks: Vec::new(),
        }
    }

    pub fn set_media(&mut self, media: Value) {
        self.body = ResponseBody::Media(media);
    }

    pub fn set_bytes(&mut self, bytes: impl Into<Bytes>) {
        self.body = ResponseBody::Bytes(bytes.into());
    }

    pub fn set_header(&mut self, name: HeaderName, value: &str) -> AnyResult<()> {
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(())
    }

    /// Schedules an async callback to run once the response has been rendered.
    pub fn schedule(&mut self, callback: DynFnOnce<(), ()>) {
        self.callbacks.push(ResponseCallback::Tasked(callback));
    }

    /// Schedules a plain callback to run once the response has been rendered.
    pub fn schedule_blocking(&mut self, callback: impl FnOnce() + Send + 'static) {
        self.callbacks
            .push(ResponseCallback::Blocking(Box::new(callback)));
    }

    pub fn take_callbacks(&mut self) -> Vec<ResponseCallback> {
        std::mem::take(&mut self.callbacks)
    }

    /// Converts the response to wire form. Media bodies are serialized by the
    /// handler matching the effective content type.
    pub fn render(self, media: &MediaRegistry) -> AnyResult<hyper::Response<Body>> {
        let mut builder = hyper::Response::builder().status(self.status);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers);
        }

        let response = match self.body {
            ResponseBody::Empty => {
                let builder = match self.content_type.into_option() {
                    Some(content_type) => builder.header(CONTENT_TYPE, content_type),
                    None => builder,
                };
                builder.body(Body::empty())?
            }
            ResponseBody::Bytes(bytes) => {
                let builder = match self.content_type.into_option() {
                    Some(content_type) => builder.header(CONTENT_TYPE, content_type),
                    None => builder,
                };
                builder.body(Body::from(bytes))?
            }
            ResponseBody::Media(value) => {
                let content_type = self
                    .content_type
                    .unwrap_or_else(|| media.default_content_type().to_string());
                let handler = media.resolve(Some(content_type.as_str()))?;
                let bytes = handler.serialize(&value, Some(content_type.as_str()))?;
                builder
                    .header(CONTENT_TYPE, content_type)
                    .body(Body::from(bytes))?
            }
        };

        Ok(response)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaDeserialize, MediaSerialize};

    struct PlainJson;

    impl MediaSerialize for PlainJson {
        fn serialize(&self, media: &Value, _content_type: Option<&str>) -> AnyResult<Bytes> {
            Ok(Bytes::from(serde_json::to_vec(media)?))
        }
    }

    impl MediaDeserialize for PlainJson {
        fn deserialize(&self, data: &[u8]) -> AnyResult<Value> {
            Ok(serde_json::from_slice(data)?)
        }
    }

    fn registry() -> MediaRegistry {
        MediaRegistry::new("application/json", PlainJson)
    }

    #[tokio::test]
    async fn empty_response_renders_as_200() {
        let response = Response::new();
        let http = response.render(&registry()).unwrap();
        assert_eq!(http.status(), StatusCode::OK);
        let bytes = hyper::body::to_bytes(http.into_body()).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn media_body_uses_default_content_type_when_unset() {
        let mut response = Response::new();
        response.set_media(serde_json::json!({"ready": true}));
        let http = response.render(&registry()).unwrap();
        assert_eq!(
            http.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let bytes = hyper::body::to_bytes(http.into_body()).await.unwrap();
        assert_eq!(&bytes[..], br#"{"ready":true}"#);
    }

    #[test]
    fn explicit_content_type_is_kept() {
        let mut response = Response::new();
        response.content_type.set("text/plain".to_string());
        response.set_bytes("ok");
        let http = response.render(&registry()).unwrap();
        assert_eq!(http.headers().get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn callbacks_are_drained_once() {
        let mut response = Response::new();
        response.schedule_blocking(|| {});
        assert_eq!(response.take_callbacks().len(), 1);
        assert!(response.take_callbacks().is_empty());
    }
}
