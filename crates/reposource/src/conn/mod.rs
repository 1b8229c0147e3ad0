//! Code-host connections: raw configuration records, their compiled form,
//! and the host matcher.

pub mod host;
pub mod load;
pub mod types;

pub use host::*;
pub use load::*;
pub use types::*;
