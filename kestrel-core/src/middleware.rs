use crate::routing::{PathParams, ResourceHandle};
use crate::{AnyResult, Request, Response};
use async_trait::async_trait;

/// Component hooked into the dispatch pipeline. Request and resource hooks
/// run in registration order, response hooks in reverse order. Every hook is
/// optional.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Runs before routing.
    async fn process_request(&self, _req: &mut Request, _resp: &mut Response) -> AnyResult<()> {
        Ok(())
    }

    /// Runs after routing, before the responder, with the matched resource
    /// and captured parameters.
    async fn process_resource(
        &self,
        _req: &mut Request,
        _resp: &mut Response,
        _resource: &ResourceHandle,
        _params: &PathParams,
    ) -> AnyResult<()> {
        Ok(())
    }

    /// Runs after the responder (or the error-handler chain). `succeeded` is
    /// false when the responder failed, whether or not the error was handled.
    async fn process_response(
        &self,
        _req: &mut Request,
        _resp: &mut Response,
        _resource: Option<&ResourceHandle>,
        _succeeded: bool,
    ) -> AnyResult<()> {
        Ok(())
    }
}
