//! # services
//!
//! Domain orchestration for Clutch Takes: the submission pipeline
//! (validate → moderate → persist) and the session-scoped feed controller
//! that holds the in-memory take list.

pub mod lifecycle;
pub mod feed;

pub use feed::TakeFeed;
pub use lifecycle::TakeLifecycleService;
