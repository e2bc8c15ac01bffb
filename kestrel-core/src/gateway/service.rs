use crate::gateway::App;
use crate::Request;
use hyper::http::Extensions;
use hyper::server::conn::AddrStream;
use hyper::service::Service;
use hyper::Body;
use std::convert::Infallible;
use std::future::{ready, Future, Ready};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Connection-level hyper service: hands each accepted connection a
/// request-level service bound to the peer address.
pub struct GatewayService {
    app: Arc<App>,
    extensions: Arc<Extensions>,
}

impl GatewayService {
    pub fn new(app: App, extensions: Extensions) -> Self {
        Self {
            app: Arc::new(app),
            extensions: Arc::new(extensions),
        }
    }
}

impl Service<&AddrStream> for GatewayService {
    type Response = ConnectionService;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, addr_stream: &AddrStream) -> Self::Future {
        ready(Ok(ConnectionService {
            app: self.app.clone(),
            extensions: self.extensions.clone(),
            remote_addr: addr_stream.remote_addr(),
        }))
    }
}

/// Request-level hyper service for one connection: wraps each raw request
/// into the framework request and runs it through the dispatcher.
pub struct ConnectionService {
    app: Arc<App>,
    extensions: Arc<Extensions>,
    remote_addr: SocketAddr,
}

impl ConnectionService {
    pub fn new(app: Arc<App>, extensions: Arc<Extensions>, remote_addr: SocketAddr) -> Self {
        Self {
            app,
            extensions,
            remote_addr,
        }
    }
}

impl Service<hyper::Request<Body>> for ConnectionService {
    type Response = hyper::Response<Body>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, http: hyper::Request<Body>) -> Self::Future {
        let app = self.app.clone();
        let request = Request {
            remote_addr: self.remote_addr,
            extensions: self.extensions.clone(),
            http,
        };

        Box::pin(async move {
            let response = app.dispatch(request).await;
            Ok(response)
        })
    }
}
