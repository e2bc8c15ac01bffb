pub mod blocking;
pub mod errors;
pub mod gateway;
pub mod media;
pub mod middleware;
pub mod responder;
pub mod routing;
pub mod unset;

mod request;
mod response;

pub use request::*;
pub use response::*;

pub use kestrel_components::dyn_fn::{DynFn, DynFnOnce, DynFuture};
pub use kestrel_components::dyn_result::{AnyError, AnyResult};
