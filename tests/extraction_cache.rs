//! Triangle extraction through the world cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use photon::core::{CancelToken, TriangleCache, WorkerPool};
use photon::geom::{extract_scene, MeshBuffers, MeshHandle, MeshProvider, StaticMeshes};
use photon::{Error, World};

/// Provider that counts how often the scene is enumerated.
struct CountingProvider {
    meshes: Vec<MeshHandle>,
    calls: Arc<AtomicUsize>,
}

impl MeshProvider for CountingProvider {
    fn meshes(&self) -> Vec<MeshHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.meshes.clone()
    }
}

/// Fan of `n` triangles around the origin, position-only stride with normal tail.
fn fan(name: &str, n: u16) -> MeshBuffers {
    let mut data = vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    for i in 0..=n {
        let a = i as f32 * 0.1;
        data.extend_from_slice(&[a.cos(), 0.0, a.sin(), 0.0, 1.0, 0.0]);
    }
    let indices = (0..n).flat_map(|i| [0, i + 1, i + 2]).collect();
    MeshBuffers::from_floats(name, &data, 6, 0, 3, indices)
}

/// Provider whose first enumeration pauses until the test lets it continue.
struct GatedProvider {
    meshes: Vec<MeshHandle>,
    calls: Arc<AtomicUsize>,
    started: Arc<Barrier>,
    resume: Arc<Barrier>,
}

impl MeshProvider for GatedProvider {
    fn meshes(&self) -> Vec<MeshHandle> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.started.wait();
            self.resume.wait();
        }
        self.meshes.clone()
    }
}

fn counting_world(meshes: Vec<MeshHandle>) -> (World, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = CountingProvider { meshes, calls: Arc::clone(&calls) };
    (World::new(provider), calls)
}

#[test]
fn test_triangles_are_cached() {
    let (world, calls) = counting_world(vec![Arc::new(fan("fan", 5))]);

    let first = world.triangles().unwrap();
    let second = world.triangles().unwrap();
    assert_eq!(first.len(), 5);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(world.cache().computations(), 1);
}

#[test]
fn test_invalidate_forces_recompute() {
    let (world, calls) = counting_world(vec![Arc::new(fan("fan", 3))]);

    let before = world.triangles().unwrap();
    world.invalidate();
    assert!(!world.cache().is_populated());

    let after = world.triangles().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(*before, *after);
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn test_concurrent_callers_share_one_extraction() {
    let meshes = (0..8).map(|i| Arc::new(fan(&format!("fan{i}"), 40))).collect();
    let (world, calls) = counting_world(meshes);
    let world = Arc::new(world);

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let world = Arc::clone(&world);
            thread::spawn(move || world.triangles().unwrap())
        })
        .collect();
    let lists: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for list in &lists {
        assert_eq!(list.len(), 8 * 40);
        assert!(Arc::ptr_eq(list, &lists[0]));
    }
}

#[test]
fn test_index_count_gives_triangle_count() {
    for n in [1u16, 7, 64] {
        let world = World::new(StaticMeshes::new(vec![Arc::new(fan("fan", n))]));
        let tris = world.triangles().unwrap();
        assert_eq!(tris.len(), n as usize);
    }
}

#[test]
fn test_shared_mesh_extracted_once() {
    let mesh = Arc::new(fan("shared", 4));
    let other = Arc::new(fan("other", 2));
    let world = World::new(StaticMeshes::new(vec![
        Arc::clone(&mesh),
        Arc::clone(&other),
        Arc::clone(&mesh),
    ]));
    assert_eq!(world.triangles().unwrap().len(), 6);
}

#[test]
fn test_malformed_mesh_fails_whole_extraction() {
    let mut broken = fan("broken", 2);
    broken.indices.push(0);
    let (world, _) = counting_world(vec![Arc::new(fan("good", 3)), Arc::new(broken)]);

    let err = world.triangles().unwrap_err();
    match &err {
        Error::MalformedMesh { mesh, .. } => assert_eq!(mesh, "broken"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("broken"));
    assert!(!world.cache().is_populated());
}

#[test]
fn test_out_of_range_index_rejected() {
    let mut broken = fan("far", 1);
    broken.indices[2] = 500;
    let world = World::new(StaticMeshes::new(vec![Arc::new(broken)]));
    let err = world.triangles().unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[test]
fn test_cancelled_extraction_leaves_cache_empty() {
    let cache = TriangleCache::new();
    let provider = StaticMeshes::new(vec![Arc::new(fan("fan", 10))]);
    let pool = WorkerPool::global();

    let err = cache
        .get_or_compute(|cancel| {
            cancel.cancel();
            extract_scene(&provider, &pool, cancel)
        })
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(cache.get().is_none());

    // Next request starts afresh
    let tris = cache.get_or_compute(|cancel| extract_scene(&provider, &pool, cancel)).unwrap();
    assert_eq!(tris.len(), 10);
}

#[test]
fn test_world_cancel_discards_running_extraction() {
    let calls = Arc::new(AtomicUsize::new(0));
    let started = Arc::new(Barrier::new(2));
    let resume = Arc::new(Barrier::new(2));
    let provider = GatedProvider {
        meshes: vec![Arc::new(fan("fan", 6))],
        calls: Arc::clone(&calls),
        started: Arc::clone(&started),
        resume: Arc::clone(&resume),
    };
    let world = Arc::new(World::new(provider));

    let worker = {
        let world = Arc::clone(&world);
        thread::spawn(move || world.triangles())
    };
    // Extraction is running and parked inside the provider
    started.wait();
    world.cancel();
    resume.wait();

    let err = worker.join().unwrap().unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(!world.cache().is_populated());
    assert_eq!(world.cache().computations(), 0);

    // Next request extracts again
    let tris = world.triangles().unwrap();
    assert_eq!(tris.len(), 6);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(world.cache().computations(), 1);
}

#[test]
fn test_dedicated_pool_matches_global() {
    let meshes: Vec<MeshHandle> = (0..5).map(|i| Arc::new(fan(&format!("m{i}"), 9))).collect();
    let pool = WorkerPool::new(2).unwrap();
    let cancel = CancelToken::new();

    let dedicated = extract_scene(&StaticMeshes::new(meshes.clone()), &pool, &cancel).unwrap();
    let global = World::new(StaticMeshes::new(meshes)).triangles().unwrap();
    assert_eq!(dedicated, *global);
}

#[test]
fn test_empty_scene() {
    let world = World::new(StaticMeshes::default());
    let tris = world.triangles().unwrap();
    assert!(tris.is_empty());
    assert!(world.cache().is_populated());
}
