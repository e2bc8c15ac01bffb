use crate::routing::PathParams;
use crate::{AnyResult, Request, Response};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

/// Catch-all handler for URI prefixes no route claims.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn handle(
        &self,
        req: &mut Request,
        resp: &mut Response,
        captures: &PathParams,
    ) -> AnyResult<()>;
}

/// What a sink is mounted on: a literal path prefix or a regex matched
/// against the full path.
pub enum SinkPrefix {
    Literal(String),
    Pattern(Regex),
}

impl From<&str> for SinkPrefix {
    fn from(prefix: &str) -> Self {
        SinkPrefix::Literal(prefix.to_string())
    }
}

impl From<String> for SinkPrefix {
    fn from(prefix: String) -> Self {
        SinkPrefix::Literal(prefix)
    }
}

impl From<Regex> for SinkPrefix {
    fn from(pattern: Regex) -> Self {
        SinkPrefix::Pattern(pattern)
    }
}

/// Ordered sink table. Later additions are tried first, so a more specific
/// sink can be mounted over a broad one after the fact.
#[derive(Default)]
pub struct SinkRegistry {
    entries: Vec<(SinkPrefix, Arc<dyn Sink>)>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, prefix: impl Into<SinkPrefix>, sink: impl Sink + 'static) {
        self.entries.insert(0, (prefix.into(), Arc::new(sink)));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First matching sink for the path. Literal prefixes capture the rest of
    /// the path under `remainder`, regex prefixes contribute their named
    /// groups.
    pub fn find(&self, uri_path: &str) -> Option<(Arc<dyn Sink>, PathParams)> {
        for (prefix, sink) in &self.entries {
            match prefix {
                SinkPrefix::Literal(literal) => {
                    if let Some(rest) = uri_path.strip_prefix(literal.as_str()) {
                        let mut captures = PathParams::new();
                        captures.insert("remainder", rest.to_string());
                        return Some((sink.clone(), captures));
                    }
                }
                SinkPrefix::Pattern(pattern) => {
                    if let Some(found) = pattern.captures(uri_path) {
                        let mut captures = PathParams::new();
                        for name in pattern.capture_names().flatten() {
                            if let Some(value) = found.name(name) {
                                captures.insert(name, value.as_str().to_string());
                            }
                        }
                        return Some((sink.clone(), captures));
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    struct StatusSink(StatusCode);

    #[async_trait]
    impl Sink for StatusSink {
        async fn handle(
            &self,
            _req: &mut Request,
            resp: &mut Response,
            _captures: &PathParams,
        ) -> AnyResult<()> {
            resp.status = self.0;
            Ok(())
        }
    }

    #[test]
    fn literal_prefix_captures_remainder() {
        let mut sinks = SinkRegistry::new();
        sinks.add("/static/", StatusSink(StatusCode::OK));

        let (_, captures) = sinks.find("/static/css/site.css").unwrap();
        assert_eq!(captures.get("remainder"), Some("css/site.css"));
        assert!(sinks.find("/api/things").is_none());
    }

    #[test]
    fn pattern_contributes_named_groups() {
        let mut sinks = SinkRegistry::new();
        sinks.add(
            Regex::new(r"^/legacy/(?P<version>v\d+)/").unwrap(),
            StatusSink(StatusCode::GONE),
        );

        let (_, captures) = sinks.find("/legacy/v2/report").unwrap();
        assert_eq!(captures.get("version"), Some("v2"));
    }

    #[tokio::test]
    async fn later_additions_win() {
        let mut sinks = SinkRegistry::new();
        sinks.add("/", StatusSink(StatusCode::IM_A_TEAPOT));
        sinks.add("/special/", StatusSink(StatusCode::ACCEPTED));

        let (sink, captures) = sinks.find("/special/thing").unwrap();
        let mut req = Request {
            remote_addr: "127.0.0.1:0".parse().unwrap(),
            extensions: Arc::new(hyper::http::Extensions::new()),
            http: hyper::Request::get("/special/thing")
                .body(hyper::Body::empty())
                .unwrap(),
        };
        let mut resp = Response::new();
        sink.handle(&mut req, &mut resp, &captures).await.unwrap();
        assert_eq!(resp.status, StatusCode::ACCEPTED);
    }
}
