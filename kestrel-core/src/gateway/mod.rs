mod app;
mod service;

pub use app::*;
pub use service::*;
