//! Core data model: the decoded cloud, progress protocol and recency cache.

mod cache;
mod cloud;
mod progress;

pub use cache::*;
pub use cloud::*;
pub use progress::*;
