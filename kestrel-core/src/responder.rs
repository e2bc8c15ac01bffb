use crate::routing::PathParams;
use crate::{AnyResult, Request, Response};
use async_trait::async_trait;
use hyper::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler bound to one HTTP method of a matched route. Mutates the response
/// in place; an error is passed to the error-handler chain.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(
        &self,
        req: &mut Request,
        resp: &mut Response,
        params: &PathParams,
    ) -> AnyResult<()>;
}

/// HTTP method to responder table of a single route.
#[derive(Default)]
pub struct MethodTable {
    responders: HashMap<Method, Arc<dyn Responder>>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, method: Method, responder: impl Responder + 'static) -> Self {
        self.responders.insert(method, Arc::new(responder));
        self
    }

    pub fn get(self, responder: impl Responder + 'static) -> Self {
        self.on(Method::GET, responder)
    }

    pub fn post(self, responder: impl Responder + 'static) -> Self {
        self.on(Method::POST, responder)
    }

    pub fn put(self, responder: impl Responder + 'static) -> Self {
        self.on(Method::PUT, responder)
    }

    pub fn delete(self, responder: impl Responder + 'static) -> Self {
        self.on(Method::DELETE, responder)
    }

    pub fn responder(&self, method: &Method) -> Option<Arc<dyn Responder>> {
        self.responders.get(method).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }

    /// `Allow` header value listing the supported methods, sorted for stable
    /// output.
    pub fn allow_header(&self) -> String {
        let mut methods: Vec<&str> = self.responders.keys().map(Method::as_str).collect();
        methods.sort_unstable();
        methods.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    struct NoContent;

    #[async_trait]
    impl Responder for NoContent {
        async fn respond(
            &self,
            _req: &mut Request,
            resp: &mut Response,
            _params: &PathParams,
        ) -> AnyResult<()> {
            resp.status = StatusCode::NO_CONTENT;
            Ok(())
        }
    }

    #[test]
    fn allow_header_lists_methods_sorted() {
        let table = MethodTable::new()
            .post(NoContent)
            .get(NoContent)
            .delete(NoContent);
        assert_eq!(table.allow_header(), "DELETE, GET, POST");
    }

    #[test]
    fn lookup_by_method() {
        let table = MethodTable::new().get(NoContent);
        assert!(table.responder(&Method::GET).is_some());
        assert!(table.responder(&Method::POST).is_none());
    }
}
