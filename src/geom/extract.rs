//! Flatten mesh buffers into a triangle soup.
//!
//! Each mesh is deinterleaved and triangulated independently on the worker
//! pool; the caller blocks until every job is done. Any malformed mesh fails
//! the whole extraction, so occlusion never runs against a partial scene.

use std::collections::HashSet;

use glam::Vec3;
use rayon::prelude::*;

use super::mesh::{MeshBuffers, MeshHandle, MeshProvider, VEC3_SIZE};
use super::triangle::{Triangle, Vertex};
use crate::core::{CancelToken, WorkerPool};
use crate::util::Result;

/// Read a packed `[f32; 3]` at `offset` bytes into one vertex record.
#[inline]
fn read_vec3(vertex: &[u8], offset: usize) -> Vec3 {
    let raw: [f32; 3] = bytemuck::pod_read_unaligned(&vertex[offset..offset + VEC3_SIZE]);
    Vec3::from_array(raw)
}

/// Deinterleave position and normal of every vertex. Assumes a validated mesh.
pub fn deinterleave(mesh: &MeshBuffers) -> Vec<Vertex> {
    mesh.vertices
        .chunks_exact(mesh.stride)
        .map(|v| Vertex::new(read_vec3(v, mesh.position_offset), read_vec3(v, mesh.normal_offset)))
        .collect()
}

/// Triangles of one mesh. Indices are local to the mesh's own vertex array.
#[tracing::instrument(skip_all, fields(mesh = %mesh.name))]
pub fn triangles_from_mesh(mesh: &MeshBuffers, cancel: &CancelToken) -> Result<Vec<Triangle>> {
    tracing::debug!("Calculating tris from mesh: {}", mesh.name);
    mesh.validate()?;
    cancel.check()?;

    let vertices = deinterleave(mesh);
    cancel.check()?;

    let tris = mesh
        .indices
        .chunks_exact(3)
        .map(|idx| {
            Triangle::new(
                vertices[idx[0] as usize],
                vertices[idx[1] as usize],
                vertices[idx[2] as usize],
            )
        })
        .collect();
    Ok(tris)
}

/// Keep the first occurrence of each mesh handle (by identity), in order.
pub fn distinct_meshes(meshes: Vec<MeshHandle>) -> Vec<MeshHandle> {
    let mut seen = HashSet::new();
    meshes
        .into_iter()
        .filter(|m| seen.insert(std::sync::Arc::as_ptr(m)))
        .collect()
}

/// Extract all meshes on the pool and concatenate the results in mesh order.
///
/// Blocks until every job finished. Fails with the first error encountered
/// (malformed mesh or cancellation); results of sibling jobs are dropped.
#[tracing::instrument(skip_all, fields(meshes = meshes.len()))]
pub fn extract_triangles(
    meshes: &[MeshHandle],
    pool: &WorkerPool,
    cancel: &CancelToken,
) -> Result<Vec<Triangle>> {
    let per_mesh: Vec<Vec<Triangle>> = pool.install(|| {
        meshes
            .par_iter()
            .map(|mesh| {
                cancel.check()?;
                triangles_from_mesh(mesh, cancel)
            })
            .collect::<Result<_>>()
    })?;

    let tris = per_mesh.concat();
    tracing::debug!("Extracted {} triangles from {} meshes", tris.len(), meshes.len());
    Ok(tris)
}

/// Enumerate the provider's meshes, deduplicate and extract them.
pub fn extract_scene(
    provider: &dyn MeshProvider,
    pool: &WorkerPool,
    cancel: &CancelToken,
) -> Result<Vec<Triangle>> {
    let meshes = distinct_meshes(provider.meshes());
    extract_triangles(&meshes, pool, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Error;
    use std::sync::Arc;

    /// Floor quad at `y` with an extra uv attribute between position and normal.
    fn quad(name: &str, y: f32) -> MeshBuffers {
        #[rustfmt::skip]
        let data = [
            -1.0, y, -1.0,  0.0, 0.0,  0.0, 1.0, 0.0,
             1.0, y, -1.0,  1.0, 0.0,  0.0, 1.0, 0.0,
             1.0, y,  1.0,  1.0, 1.0,  0.0, 1.0, 0.0,
            -1.0, y,  1.0,  0.0, 1.0,  0.0, 1.0, 0.0,
        ];
        MeshBuffers::from_floats(name, &data, 8, 0, 5, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn test_deinterleave_offsets() {
        let verts = deinterleave(&quad("q", 2.0));
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[2].position, Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(verts[2].normal, Vec3::Y);
    }

    #[test]
    fn test_triangle_count() {
        let tris = triangles_from_mesh(&quad("q", 0.0), &CancelToken::new()).unwrap();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[1].a.position, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(tris[1].c.position, Vec3::new(-1.0, 0.0, 1.0));
    }

    #[test]
    fn test_source_buffers_untouched() {
        let mesh = quad("q", 0.0);
        let before = mesh.clone();
        triangles_from_mesh(&mesh, &CancelToken::new()).unwrap();
        assert_eq!(mesh, before);
        // Can be read again with the same result
        assert_eq!(triangles_from_mesh(&mesh, &CancelToken::new()).unwrap().len(), 2);
    }

    #[test]
    fn test_distinct_by_identity() {
        let a = Arc::new(quad("a", 0.0));
        let b = Arc::new(quad("a", 0.0));
        let list = distinct_meshes(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(list.len(), 2);
        assert!(Arc::ptr_eq(&list[0], &a));
        assert!(Arc::ptr_eq(&list[1], &b));
    }

    #[test]
    fn test_extract_concatenates_in_order() {
        let meshes = vec![Arc::new(quad("low", 0.0)), Arc::new(quad("high", 5.0))];
        let pool = WorkerPool::new(2).unwrap();
        let tris = extract_triangles(&meshes, &pool, &CancelToken::new()).unwrap();
        assert_eq!(tris.len(), 4);
        assert_eq!(tris[0].a.position.y, 0.0);
        assert_eq!(tris[3].a.position.y, 5.0);
    }

    #[test]
    fn test_malformed_mesh_fails_whole_extraction() {
        let mut broken = quad("broken", 1.0);
        broken.indices.push(0);
        let meshes = vec![Arc::new(quad("ok", 0.0)), Arc::new(broken)];
        let err = extract_triangles(&meshes, &WorkerPool::global(), &CancelToken::new()).unwrap_err();
        match err {
            Error::MalformedMesh { mesh, .. } => assert_eq!(mesh, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cancelled_extraction() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let meshes = vec![Arc::new(quad("q", 0.0))];
        let err = extract_triangles(&meshes, &WorkerPool::global(), &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn test_no_meshes() {
        let tris = extract_triangles(&[], &WorkerPool::global(), &CancelToken::new()).unwrap();
        assert!(tris.is_empty());
    }
}
