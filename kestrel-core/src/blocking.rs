//! Blocking counterparts of the tasked contract family, for handlers with no
//! suspension points. The `Tasked` adapter lifts any of them onto the async
//! gateway, where they run inline on the dispatch task; work that blocks for
//! long belongs on its own threads, not behind this adapter.

use crate::errors::ErrorHandler;
use crate::middleware::Middleware;
use crate::responder::Responder;
use crate::routing::{PathParams, ResourceHandle, Sink};
use crate::{AnyError, AnyResult, Request, Response};
use async_trait::async_trait;

pub trait BlockingResponder: Send + Sync {
    fn respond(&self, req: &mut Request, resp: &mut Response, params: &PathParams)
        -> AnyResult<()>;
}

pub trait BlockingSink: Send + Sync {
    fn handle(&self, req: &mut Request, resp: &mut Response, captures: &PathParams)
        -> AnyResult<()>;
}

pub trait BlockingErrorHandler: Send + Sync {
    fn handle(
        &self,
        req: &mut Request,
        resp: &mut Response,
        error: &AnyError,
        params: &PathParams,
    ) -> AnyResult<bool>;
}

pub trait BlockingMiddleware: Send + Sync {
    fn process_request(&self, _req: &mut Request, _resp: &mut Response) -> AnyResult<()> {
        Ok(())
    }

    fn process_resource(
        &self,
        _req: &mut Request,
        _resp: &mut Response,
        _resource: &ResourceHandle,
        _params: &PathParams,
    ) -> AnyResult<()> {
        Ok(())
    }

    fn process_response(
        &self,
        _req: &mut Request,
        _resp: &mut Response,
        _resource: Option<&ResourceHandle>,
        _succeeded: bool,
    ) -> AnyResult<()> {
        Ok(())
    }
}

/// Adapter lifting a blocking contract into the tasked family.
pub struct Tasked<T>(pub T);

#[async_trait]
impl<T: BlockingResponder> Responder for Tasked<T> {
    async fn respond(
        &self,
        req: &mut Request,
        resp: &mut Response,
        params: &PathParams,
    ) -> AnyResult<()> {
        self.0.respond(req, resp, params)
    }
}

#[async_trait]
impl<T: BlockingSink> Sink for Tasked<T> {
    async fn handle(
        &self,
        req: &mut Request,
        resp: &mut Response,
        captures: &PathParams,
    ) -> AnyResult<()> {
        self.0.handle(req, resp, captures)
    }
}

#[async_trait]
impl<T: BlockingErrorHandler> ErrorHandler for Tasked<T> {
    async fn handle(
        &self,
        req: &mut Request,
        resp: &mut Response,
        error: &AnyError,
        params: &PathParams,
    ) -> AnyResult<bool> {
        self.0.handle(req, resp, error, params)
    }
}

#[async_trait]
impl<T: BlockingMiddleware> Middleware for Tasked<T> {
    async fn process_request(&self, req: &mut Request, resp: &mut Response) -> AnyResult<()> {
        self.0.process_request(req, resp)
    }

    async fn process_resource(
        &self,
        req: &mut Request,
        resp: &mut Response,
        resource: &ResourceHandle,
        params: &PathParams,
    ) -> AnyResult<()> {
        self.0.process_resource(req, resp, resource, params)
    }

    async fn process_response(
        &self,
        req: &mut Request,
        resp: &mut Response,
        resource: Option<&ResourceHandle>,
        succeeded: bool,
    ) -> AnyResult<()> {
        self.0.process_response(req, resp, resource, succeeded)
    }
}
