mod channel;
mod handshake;
mod responder;

pub use channel::*;
pub use handshake::*;
pub use responder::*;
