//! Core layer - concurrency and caching primitives.
//!
//! This module provides:
//! - [`TriangleCache`] - Populate-once / read-many scene triangle cache
//! - [`CancelToken`] - Cooperative cancellation for worker jobs
//! - [`WorkerPool`] - Blocking rayon pool for per-mesh extraction

mod cache;
mod cancel;
mod pool;

pub use cache::{TriangleCache, TriangleList};
pub use cancel::CancelToken;
pub use pool::WorkerPool;
