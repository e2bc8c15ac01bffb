use hyper::body::Bytes;
use kestrel_core::errors::HttpError;
use kestrel_core::media::{MediaDeserialize, MediaSerialize};
use kestrel_core::AnyResult;
use serde_json::Value;

/// JSON media handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonHandler {
    pub pretty_printed: bool,
}

impl MediaSerialize for JsonHandler {
    fn serialize(&self, media: &Value, _content_type: Option<&str>) -> AnyResult<Bytes> {
        let bytes = if self.pretty_printed {
            serde_json::to_vec_pretty(media)
        } else {
            serde_json::to_vec(media)
        }?;
        Ok(Bytes::from(bytes))
    }
}

impl MediaDeserialize for JsonHandler {
    fn deserialize(&self, data: &[u8]) -> AnyResult<Value> {
        if data.is_empty() {
            return Err(HttpError::bad_request("empty JSON body").into());
        }
        let media = serde_json::from_slice(data)
            .map_err(|e| HttpError::bad_request(&format!("malformed JSON: {}", e)))?;
        Ok(media)
    }
}
