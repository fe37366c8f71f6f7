//! Triangle cache with populate-once / read-many semantics.
//!
//! Readers take a cheap `Arc` clone of the cached soup. Computation is
//! serialized on a single in-flight job per cache; the result is published
//! in one write, so readers see either nothing or the complete list.
//! Invalidation during a computation cancels it and discards its result.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::CancelToken;
use crate::geom::Triangle;
use crate::util::{Error, Result};

/// Shared, immutable triangle soup.
pub type TriangleList = Arc<Vec<Triangle>>;

/// Thread-safe cache for the extracted scene triangles.
///
/// `None` in the slot means "not computed yet or invalidated". An empty scene
/// is cached as an empty list and is not recomputed.
#[derive(Default)]
pub struct TriangleCache {
    /// Published triangles.
    slot: RwLock<Option<TriangleList>>,
    /// Serializes computations.
    compute: Mutex<()>,
    /// Bumped by every invalidation.
    generation: AtomicU64,
    /// Token of the computation currently running, if any.
    in_flight: Mutex<Option<CancelToken>>,
    /// Number of successfully published computations.
    computations: AtomicUsize,
}

impl TriangleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached triangles, if populated.
    #[inline]
    pub fn get(&self) -> Option<TriangleList> {
        self.slot.read().as_ref().map(Arc::clone)
    }

    /// True when a valid list is cached.
    #[inline]
    pub fn is_populated(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Number of times the cache was populated since creation.
    #[inline]
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    /// Return the cached list, or run `compute` and publish its result.
    ///
    /// Concurrent callers wait for the in-flight computation and then share
    /// its result. If `compute` fails, or the cache is invalidated while it
    /// runs, the cache is left empty and the error (or `Cancelled`) is returned.
    pub fn get_or_compute<F>(&self, compute: F) -> Result<TriangleList>
    where
        F: FnOnce(&CancelToken) -> Result<Vec<Triangle>>,
    {
        if let Some(tris) = self.get() {
            return Ok(tris);
        }

        let _guard = self.compute.lock();
        // Another caller may have finished while we waited
        if let Some(tris) = self.get() {
            return Ok(tris);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let token = CancelToken::new();
        *self.in_flight.lock() = Some(token.clone());

        let result = compute(&token);
        *self.in_flight.lock() = None;
        let tris = result?;

        let mut slot = self.slot.write();
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!("triangle cache invalidated during computation, discarding result");
            return Err(Error::Cancelled);
        }
        let tris = Arc::new(tris);
        *slot = Some(Arc::clone(&tris));
        self.computations.fetch_add(1, Ordering::Relaxed);
        Ok(tris)
    }

    /// Drop the cached list and cancel any computation in progress.
    pub fn invalidate(&self) {
        let mut slot = self.slot.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(token) = self.in_flight.lock().as_ref() {
            token.cancel();
        }
        *slot = None;
    }

    /// Cancel the computation in progress without touching the cached list.
    pub fn cancel_in_flight(&self) {
        if let Some(token) = self.in_flight.lock().as_ref() {
            token.cancel();
        }
    }
}

impl std::fmt::Debug for TriangleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriangleCache")
            .field("triangles", &self.get().map(|t| t.len()))
            .field("computations", &self.computations())
            .finish()
    }
}
