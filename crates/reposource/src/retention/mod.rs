//! Periodic retention-job enqueuer.
//!
//! Every interval the enqueuer fetches the stored data series and enqueues one
//! retention job per series. A failing enqueue never stops the batch: every
//! series is attempted and all failures are reported together.

pub mod enqueuer;
pub mod memory;
pub mod store;
pub mod types;

pub use enqueuer::*;
pub use memory::*;
pub use store::*;
pub use types::*;
