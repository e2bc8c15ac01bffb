use crate::responder::MethodTable;
use crate::routing::{PathParams, ResourceHandle, RouteFinder, RouteMatch};
use crate::Request;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterBuildError {
    #[error("empty field name in template {0}")]
    EmptyFieldName(String),
    #[error("wildcard segment must be last in template {0}")]
    WildcardNotLast(String),
    #[error("template {0} collides with an already registered one")]
    CollidingTemplate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `{name}` — captures exactly one path segment.
    Field(String),
    /// `{name..}` — captures the rest of the path, may be empty.
    Wildcard(String),
}

impl Segment {
    fn parse(raw: &str, template: &str) -> Result<Self, RouterBuildError> {
        if let Some(inner) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            let (name, wildcard) = match inner.strip_suffix("..") {
                Some(name) => (name, true),
                None => (inner, false),
            };
            if name.is_empty() {
                return Err(RouterBuildError::EmptyFieldName(template.to_string()));
            }
            if wildcard {
                Ok(Segment::Wildcard(name.to_string()))
            } else {
                Ok(Segment::Field(name.to_string()))
            }
        } else {
            Ok(Segment::Literal(raw.to_string()))
        }
    }

    /// Two segments collide when they can match the same path segment,
    /// regardless of field naming.
    fn same_shape(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            (Segment::Field(_), Segment::Field(_)) => true,
            (Segment::Wildcard(_), Segment::Wildcard(_)) => true,
            _ => false,
        }
    }
}

struct CompiledRoute {
    segments: Vec<Segment>,
    resource: ResourceHandle,
    responders: Arc<MethodTable>,
}

impl CompiledRoute {
    /// Matches the route against split path segments. The score counts
    /// literal segments so that literal routes win over field routes.
    fn match_segments(&self, segments: &[&str]) -> Option<(usize, PathParams, Option<String>)> {
        let mut params = PathParams::new();
        let mut score = 0usize;
        let mut at = 0usize;

        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => {
                    if segments.get(at) != Some(&literal.as_str()) {
                        return None;
                    }
                    score += 1;
                    at += 1;
                }
                Segment::Field(name) => {
                    let value = segments.get(at)?;
                    params.insert(name, (*value).to_string());
                    at += 1;
                }
                Segment::Wildcard(name) => {
                    let rest = segments[at..].join("/");
                    params.insert(name, rest.clone());
                    return Some((score, params, Some(rest)));
                }
            }
        }

        if at == segments.len() {
            Some((score, params, None))
        } else {
            None
        }
    }
}

/// Default `RouteFinder`: URI templates with literal segments, `{name}`
/// fields and a trailing `{name..}` wildcard. Trailing and duplicate slashes
/// are insignificant. The most literal match wins.
pub struct TemplateRouter {
    routes: Vec<CompiledRoute>,
}

impl TemplateRouter {
    pub fn builder() -> TemplateRouterBuilder {
        TemplateRouterBuilder { routes: Vec::new() }
    }
}

impl RouteFinder for TemplateRouter {
    fn find(&self, uri_path: &str, _req: Option<&Request>) -> Option<RouteMatch> {
        let segments: Vec<&str> = uri_path.split('/').filter(|s| !s.is_empty()).collect();

        let mut best: Option<(usize, RouteMatch)> = None;
        for route in &self.routes {
            if let Some((score, params, remainder)) = route.match_segments(&segments) {
                let better = best.as_ref().map_or(true, |(best_score, _)| score > *best_score);
                if better {
                    best = Some((
                        score,
                        RouteMatch {
                            resource: route.resource.clone(),
                            responders: route.responders.clone(),
                            params,
                            remainder,
                        },
                    ));
                }
            }
        }
        best.map(|(_, matched)| matched)
    }
}

pub struct TemplateRouterBuilder {
    routes: Vec<CompiledRoute>,
}

impl TemplateRouterBuilder {
    pub fn route(
        mut self,
        template: &str,
        resource: ResourceHandle,
        responders: MethodTable,
    ) -> Result<Self, RouterBuildError> {
        let mut segments = Vec::new();
        let raw_segments: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();
        for (at, raw) in raw_segments.iter().enumerate() {
            let segment = Segment::parse(raw, template)?;
            if matches!(segment, Segment::Wildcard(_)) && at != raw_segments.len() - 1 {
                return Err(RouterBuildError::WildcardNotLast(template.to_string()));
            }
            segments.push(segment);
        }

        let collides = self.routes.iter().any(|route| {
            route.segments.len() == segments.len()
                && route
                    .segments
                    .iter()
                    .zip(&segments)
                    .all(|(a, b)| a.same_shape(b))
        });
        if collides {
            return Err(RouterBuildError::CollidingTemplate(template.to_string()));
        }

        self.routes.push(CompiledRoute {
            segments,
            resource,
            responders: Arc::new(responders),
        });
        Ok(self)
    }

    pub fn build(self) -> TemplateRouter {
        TemplateRouter {
            routes: self.routes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::Responder;
    use crate::{AnyResult, Response};
    use async_trait::async_trait;
    use hyper::StatusCode;

    struct Ok200;

    #[async_trait]
    impl Responder for Ok200 {
        async fn respond(
            &self,
            _req: &mut Request,
            resp: &mut Response,
            _params: &PathParams,
        ) -> AnyResult<()> {
            resp.status = StatusCode::OK;
            Ok(())
        }
    }

    fn resource() -> ResourceHandle {
        Arc::new(())
    }

    fn router() -> TemplateRouter {
        TemplateRouter::builder()
            .route("/", resource(), MethodTable::new().get(Ok200))
            .unwrap()
            .route("/things", resource(), MethodTable::new().get(Ok200))
            .unwrap()
            .route("/things/{id}", resource(), MethodTable::new().get(Ok200))
            .unwrap()
            .route("/things/latest", resource(), MethodTable::new().get(Ok200))
            .unwrap()
            .route("/files/{path..}", resource(), MethodTable::new().get(Ok200))
            .unwrap()
            .build()
    }

    #[test]
    fn literal_match() {
        let matched = router().find("/things", None).unwrap();
        assert!(matched.params.is_empty());
        assert_eq!(matched.remainder, None);
    }

    #[test]
    fn trailing_and_duplicate_slashes_are_insignificant() {
        let router = router();
        assert!(router.find("/things/", None).is_some());
        assert!(router.find("//things//", None).is_some());
        assert!(router.find("/", None).is_some());
    }

    #[test]
    fn field_segment_captures_value() {
        let matched = router().find("/things/42", None).unwrap();
        assert_eq!(matched.params.get("id"), Some("42"));
        assert_eq!(matched.params.get_as::<u64>("id"), Some(42));
    }

    #[test]
    fn literal_beats_field_on_same_path() {
        let matched = router().find("/things/latest", None).unwrap();
        // The literal /things/latest route has no captures; the field route
        // would have captured "latest" under "id".
        assert!(matched.params.is_empty());
    }

    #[test]
    fn wildcard_captures_remainder() {
        let matched = router().find("/files/reports/2026/q3.pdf", None).unwrap();
        assert_eq!(matched.remainder.as_deref(), Some("reports/2026/q3.pdf"));
        assert_eq!(matched.params.get("path"), Some("reports/2026/q3.pdf"));
    }

    #[test]
    fn wildcard_may_capture_nothing() {
        let matched = router().find("/files", None).unwrap();
        assert_eq!(matched.remainder.as_deref(), Some(""));
    }

    #[test]
    fn unrouted_path_is_none() {
        assert!(router().find("/nothing/here", None).is_none());
    }

    #[test]
    fn colliding_templates_are_rejected() {
        let result = TemplateRouter::builder()
            .route("/things/{id}", resource(), MethodTable::new().get(Ok200))
            .unwrap()
            .route("/things/{name}", resource(), MethodTable::new().get(Ok200));
        assert!(matches!(
            result,
            Err(RouterBuildError::CollidingTemplate(_))
        ));
    }

    #[test]
    fn wildcard_must_be_last() {
        let result = TemplateRouter::builder().route(
            "/files/{path..}/meta",
            resource(),
            MethodTable::new().get(Ok200),
        );
        assert!(matches!(result, Err(RouterBuildError::WildcardNotLast(_))));
    }
}
