//! Resource clients for the platform's REST surfaces.
//!
//! Each client is a thin handle over a [`crate::Client`]: it builds URLs and payloads, then
//! runs the call through the client's current [`crate::executor::RequestExecutor`]. List
//! endpoints expose a single-page primitive plus an exhaustive `get_all_pages` built on
//! [`crate::page::PageCursor`].

pub mod formations;
pub mod locks;
pub mod metadata;
pub mod restrict;

mod shared;

pub use formations::*;
pub use locks::*;
pub use metadata::*;
pub use restrict::*;
