use crate::errors::HttpError;
use crate::AnyResult;
use hyper::body::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Serializes an in-memory value to wire bytes for a given content type.
pub trait MediaSerialize: Send + Sync {
    fn serialize(&self, media: &Value, content_type: Option<&str>) -> AnyResult<Bytes>;
}

/// Deserializes wire bytes into an in-memory value.
pub trait MediaDeserialize: Send + Sync {
    fn deserialize(&self, data: &[u8]) -> AnyResult<Value>;
}

pub trait MediaHandler: MediaSerialize + MediaDeserialize {}

impl<T: MediaSerialize + MediaDeserialize> MediaHandler for T {}

impl std::fmt::Debug for dyn MediaHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MediaHandler")
    }
}

/// Content-type keyed lookup of media handlers. Keys are matched with header
/// parameters stripped, so `application/json; charset=utf-8` resolves the
/// `application/json` handler.
pub struct MediaRegistry {
    handlers: HashMap<String, Arc<dyn MediaHandler>>,
    default_content_type: String,
}

impl MediaRegistry {
    pub fn new(default_content_type: &str, default_handler: impl MediaHandler + 'static) -> Self {
        let mut handlers: HashMap<String, Arc<dyn MediaHandler>> = HashMap::new();
        handlers.insert(normalize(default_content_type), Arc::new(default_handler));
        Self {
            handlers,
            default_content_type: normalize(default_content_type),
        }
    }

    pub fn insert(&mut self, content_type: &str, handler: impl MediaHandler + 'static) {
        self.handlers.insert(normalize(content_type), Arc::new(handler));
    }

    pub fn default_content_type(&self) -> &str {
        &self.default_content_type
    }

    /// Finds the handler for the given content type. A missing content type
    /// resolves to the default handler, an unknown one is a 415.
    pub fn resolve(&self, content_type: Option<&str>) -> AnyResult<Arc<dyn MediaHandler>> {
        let key = match content_type {
            Some(value) if !value.trim().is_empty() => normalize(value),
            _ => self.default_content_type.clone(),
        };
        match self.handlers.get(&key) {
            Some(handler) => Ok(handler.clone()),
            None => Err(HttpError::unsupported_media_type(&key).into()),
        }
    }
}

fn normalize(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubHandler(&'static str);

    impl MediaSerialize for StubHandler {
        fn serialize(&self, _media: &Value, _content_type: Option<&str>) -> AnyResult<Bytes> {
            Ok(Bytes::from_static(self.0.as_bytes()))
        }
    }

    impl MediaDeserialize for StubHandler {
        fn deserialize(&self, _data: &[u8]) -> AnyResult<Value> {
            Ok(Value::String(self.0.to_string()))
        }
    }

    fn registry() -> MediaRegistry {
        let mut registry = MediaRegistry::new("application/json", StubHandler("json"));
        registry.insert("application/x-www-form-urlencoded", StubHandler("form"));
        registry
    }

    #[test]
    fn missing_content_type_resolves_default() {
        let handler = registry().resolve(None).unwrap();
        let media = handler.deserialize(b"").unwrap();
        assert_eq!(media, Value::String("json".to_string()));
    }

    #[test]
    fn parameters_are_stripped() {
        let handler = registry()
            .resolve(Some("Application/JSON; charset=utf-8"))
            .unwrap();
        let media = handler.deserialize(b"").unwrap();
        assert_eq!(media, Value::String("json".to_string()));
    }

    #[test]
    fn unknown_content_type_is_a_415() {
        let error = registry().resolve(Some("application/msgpack")).unwrap_err();
        let http_error = error.downcast_ref::<HttpError>().unwrap();
        assert_eq!(http_error.status, hyper::StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
