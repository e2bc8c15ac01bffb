mod form_handler;
mod json_handler;

pub use form_handler::*;
pub use json_handler::*;

use kestrel_core::media::MediaRegistry;

/// Registry with JSON as the default handler and URL-encoded forms mounted
/// alongside it.
pub fn default_registry() -> MediaRegistry {
    let mut registry = MediaRegistry::new("application/json", JsonHandler::default());
    registry.insert("application/x-www-form-urlencoded", FormHandler);
    registry
}
