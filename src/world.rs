//! Scene wrapper: mesh provider + triangle cache + extraction pool.

use crate::core::{TriangleCache, TriangleList, WorkerPool};
use crate::geom::{extract_scene, MeshProvider};
use crate::util::Result;

/// A scene whose triangles are extracted once and reused until invalidated.
///
/// `World` is `Sync`: many threads may call [`triangles`](Self::triangles);
/// only one extraction runs at a time and readers never see a partial list.
pub struct World {
    provider: Box<dyn MeshProvider>,
    cache: TriangleCache,
    pool: WorkerPool,
}

impl World {
    /// World extracting on rayon's global pool.
    pub fn new(provider: impl MeshProvider + 'static) -> Self {
        Self::with_pool(provider, WorkerPool::global())
    }

    pub fn with_pool(provider: impl MeshProvider + 'static, pool: WorkerPool) -> Self {
        Self {
            provider: Box::new(provider),
            cache: TriangleCache::new(),
            pool,
        }
    }

    /// Scene triangles, extracted on first use.
    pub fn triangles(&self) -> Result<TriangleList> {
        tracing::debug!("Fetching world tris");
        self.cache.get_or_compute(|cancel| {
            tracing::info!("No cached tris, calculating...");
            let tris = extract_scene(self.provider.as_ref(), &self.pool, cancel)?;
            tracing::info!("Extraction finished: {} triangles", tris.len());
            Ok(tris)
        })
    }

    /// Forget the cached triangles (geometry changed). Cancels a running extraction.
    pub fn invalidate(&self) {
        tracing::debug!("Invalidating world tris");
        self.cache.invalidate();
    }

    /// Abandon a running extraction; the cache stays as it was.
    pub fn cancel(&self) {
        self.cache.cancel_in_flight();
    }

    pub fn cache(&self) -> &TriangleCache {
        &self.cache
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("cache", &self.cache)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
