mod finder;
mod params;
mod router;
mod sink;

pub use finder::*;
pub use params::*;
pub use router::*;
pub use sink::*;
