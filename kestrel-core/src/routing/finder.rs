use crate::responder::MethodTable;
use crate::routing::PathParams;
use crate::Request;
use std::any::Any;
use std::sync::Arc;

/// Opaque handle to the application object a route was registered with.
/// Middleware receives it during resource processing.
pub type ResourceHandle = Arc<dyn Any + Send + Sync>;

/// Outcome of a successful route lookup.
pub struct RouteMatch {
    pub resource: ResourceHandle,
    pub responders: Arc<MethodTable>,
    pub params: PathParams,
    /// Trailing path left over by a wildcard template, `None` for exact
    /// matches.
    pub remainder: Option<String>,
}

/// Routing lookup contract: maps a URI path (and optionally the request it
/// came from) to a matched route, or `None` when nothing matches.
pub trait RouteFinder: Send + Sync {
    fn find(&self, uri_path: &str, req: Option<&Request>) -> Option<RouteMatch>;
}
