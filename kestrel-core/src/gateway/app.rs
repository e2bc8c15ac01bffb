use crate::errors::{DefaultErrorSerializer, ErrorHandler, ErrorSerializer, HttpError, HttpErrorHandler};
use crate::media::MediaRegistry;
use crate::middleware::Middleware;
use crate::routing::{PathParams, ResourceHandle, RouteFinder, Sink, SinkPrefix, SinkRegistry, TemplateRouter};
use crate::{AnyError, AnyResult, Request, Response, ResponseCallback};
use hyper::{Body, StatusCode};
use std::sync::Arc;

/// The dispatcher tying the contract seams together: middleware hooks,
/// route/sink lookup, method-table dispatch, the error-handler chain and
/// media rendering.
pub struct App {
    router: Arc<dyn RouteFinder>,
    sinks: SinkRegistry,
    middleware: Vec<Arc<dyn Middleware>>,
    error_handlers: Vec<Arc<dyn ErrorHandler>>,
    media: Arc<MediaRegistry>,
}

impl App {
    pub fn builder(media: MediaRegistry) -> AppBuilder {
        AppBuilder {
            router: None,
            sinks: SinkRegistry::new(),
            middleware: Vec::new(),
            error_handlers: Vec::new(),
            media,
        }
    }

    pub async fn dispatch(&self, mut req: Request) -> hyper::Response<Body> {
        let method = req.method().clone();
        let path = req.path().to_string();
        tracing::debug!(%method, %path, "dispatching request");

        let mut resp = Response::new();
        let mut params = PathParams::new();
        let mut resource: Option<ResourceHandle> = None;

        let outcome = self
            .run_pipeline(&mut req, &mut resp, &mut params, &mut resource, &path)
            .await;

        let succeeded = outcome.is_ok();
        if let Err(error) = outcome {
            self.handle_error(&mut req, &mut resp, error, &params).await;
        }

        for middleware in self.middleware.iter().rev() {
            if let Err(error) = middleware
                .process_response(&mut req, &mut resp, resource.as_ref(), succeeded)
                .await
            {
                tracing::warn!(error = %error, "response middleware failed");
                resp = Response::new();
                resp.status = StatusCode::INTERNAL_SERVER_ERROR;
                break;
            }
        }

        let callbacks = resp.take_callbacks();
        let http = match resp.render(&self.media) {
            Ok(http) => http,
            Err(error) => {
                tracing::error!(error = %error, "response rendering failed");
                hyper::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::empty())
                    .unwrap()
            }
        };

        for callback in callbacks {
            match callback {
                ResponseCallback::Tasked(callback) => callback(()).await,
                ResponseCallback::Blocking(callback) => callback(),
            }
        }

        http
    }

    async fn run_pipeline(
        &self,
        req: &mut Request,
        resp: &mut Response,
        params: &mut PathParams,
        resource: &mut Option<ResourceHandle>,
        path: &str,
    ) -> AnyResult<()> {
        for middleware in &self.middleware {
            middleware.process_request(req, resp).await?;
        }

        match self.router.find(path, Some(&*req)) {
            Some(matched) => {
                *resource = Some(matched.resource.clone());
                *params = matched.params;
                for middleware in &self.middleware {
                    middleware
                        .process_resource(req, resp, &matched.resource, params)
                        .await?;
                }
                match matched.responders.responder(req.method()) {
                    Some(responder) => responder.respond(req, resp, params).await,
                    None => {
                        Err(HttpError::method_not_allowed(&matched.responders.allow_header())
                            .into())
                    }
                }
            }
            None => match self.sinks.find(path) {
                Some((sink, captures)) => {
                    tracing::debug!(%path, "no route matched, falling through to sink");
                    *params = captures;
                    sink.handle(req, resp, params).await
                }
                None => Err(HttpError::not_found().into()),
            },
        }
    }

    async fn handle_error(
        &self,
        req: &mut Request,
        resp: &mut Response,
        error: AnyError,
        params: &PathParams,
    ) {
        for handler in &self.error_handlers {
            match handler.handle(req, resp, &error, params).await {
                Ok(true) => return,
                Ok(false) => continue,
                Err(handler_error) => {
                    tracing::warn!(error = %handler_error, "error handler failed");
                    break;
                }
            }
        }

        tracing::error!(error = %error, "unhandled error");
        *resp = Response::new();
        DefaultErrorSerializer.serialize(req, resp, &HttpError::internal_server_error());
    }
}

pub struct AppBuilder {
    router: Option<Arc<dyn RouteFinder>>,
    sinks: SinkRegistry,
    middleware: Vec<Arc<dyn Middleware>>,
    error_handlers: Vec<Arc<dyn ErrorHandler>>,
    media: MediaRegistry,
}

impl AppBuilder {
    pub fn router(mut self, router: impl RouteFinder + 'static) -> Self {
        self.router = Some(Arc::new(router));
        self
    }

    pub fn sink(mut self, prefix: impl Into<SinkPrefix>, sink: impl Sink + 'static) -> Self {
        self.sinks.add(prefix, sink);
        self
    }

    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Registers an error handler. Later registrations are tried first; the
    /// built-in `HttpErrorHandler` always terminates the chain.
    pub fn error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handlers.insert(0, Arc::new(handler));
        self
    }

    pub fn build(mut self) -> App {
        self.error_handlers.push(Arc::new(HttpErrorHandler::new()));
        App {
            router: self
                .router
                .unwrap_or_else(|| Arc::new(TemplateRouter::builder().build())),
            sinks: self.sinks,
            middleware: self.middleware,
            error_handlers: self.error_handlers,
            media: Arc::new(self.media),
        }
    }
}
