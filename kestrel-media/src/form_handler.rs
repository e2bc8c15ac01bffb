use hyper::body::Bytes;
use kestrel_core::errors::HttpError;
use kestrel_core::media::{MediaDeserialize, MediaSerialize};
use kestrel_core::AnyResult;
use serde_json::{Map, Value};

/// URL-encoded form media handler. Forms are flat string maps; repeated keys
/// keep the last value.
#[derive(Clone, Copy, Debug)]
pub struct FormHandler;

impl MediaSerialize for FormHandler {
    fn serialize(&self, media: &Value, _content_type: Option<&str>) -> AnyResult<Bytes> {
        let object = media
            .as_object()
            .ok_or_else(|| HttpError::internal_server_error())?;

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in object {
            match value {
                Value::String(text) => serializer.append_pair(key, text),
                Value::Number(number) => serializer.append_pair(key, &number.to_string()),
                Value::Bool(flag) => serializer.append_pair(key, if *flag { "true" } else { "false" }),
                Value::Null => serializer.append_pair(key, ""),
                _ => return Err(HttpError::internal_server_error().into()),
            };
        }
        Ok(Bytes::from(serializer.finish()))
    }
}

impl MediaDeserialize for FormHandler {
    fn deserialize(&self, data: &[u8]) -> AnyResult<Value> {
        let mut object = Map::new();
        for (key, value) in url::form_urlencoded::parse(data) {
            object.insert(key.into_owned(), Value::String(value.into_owned()));
        }
        Ok(Value::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_percent_encoded_pairs() {
        let media = FormHandler.deserialize(b"name=first%20one&count=3").unwrap();
        assert_eq!(media["name"], "first one");
        assert_eq!(media["count"], "3");
    }

    #[test]
    fn serializes_scalar_fields() {
        let bytes = FormHandler
            .serialize(&json!({"count": 3, "name": "a b"}), None)
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("count=3"));
        assert!(text.contains("name=a+b"));
    }

    #[test]
    fn nested_values_are_rejected() {
        assert!(FormHandler
            .serialize(&json!({"nested": {"a": 1}}), None)
            .is_err());
        assert!(FormHandler.serialize(&json!(["not", "a", "map"]), None).is_err());
    }

    #[test]
    fn empty_body_is_an_empty_map() {
        assert_eq!(FormHandler.deserialize(b"").unwrap(), json!({}));
    }
}
