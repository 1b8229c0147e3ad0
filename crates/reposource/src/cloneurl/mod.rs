//! Clone URL descriptors: SSH shorthand and `scheme://` URLs, with optional
//! embedded credentials.

pub mod parse;
pub mod types;

pub use parse::*;
pub use types::*;
