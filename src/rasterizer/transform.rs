//! Vertex transform and primitive assembly
//!
//! Per frame: every mesh vertex goes through the combined MVP transform and
//! perspective divide, then index triples are assembled into on-grid
//! triangles. Anything that fails a visibility test is dropped whole - there
//! is no partial clipping, so geometry pops at the viewport edges.

use glam::{Mat4, Vec3, Vec4};

use super::types::{Mesh, ScreenPoint, Triangle};

/// Homogeneous w below this is a degenerate projection
const W_EPSILON: f32 = 1e-6;

/// Map an NDC coordinate in [-1, 1] to a grid index in [0, max_index).
///
/// No clamping: -1 maps to 0 and +1 maps to max_index itself, so callers
/// must validate the result against the grid.
pub fn map_to_grid(coord: f32, max_index: usize) -> i32 {
    ((coord + 1.0) * 0.5 * max_index as f32) as i32
}

/// Transform every vertex by the MVP matrix and perspective-divide to NDC.
///
/// Returns one entry per source vertex; `None` marks a vertex that failed a
/// visibility test (degenerate w, outside the near/far planes, or outside
/// the canonical z range). Near/far bounds are exclusive on both sides.
pub fn transform_vertices(mesh: &Mesh, mvp: Mat4, near: f32, far: f32) -> Vec<Option<Vec3>> {
    mesh.vertices
        .iter()
        .map(|&v| {
            let clip = mvp * Vec4::new(v.x, v.y, v.z, 1.0);
            if clip.w.abs() <= W_EPSILON {
                return None;
            }

            let ndc = Vec3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
            if ndc.z <= near || ndc.z >= far {
                return None;
            }
            if ndc.z < -1.0 || ndc.z > 1.0 {
                return None;
            }

            Some(ndc)
        })
        .collect()
}

/// Assemble index triples into on-grid triangles.
///
/// A triangle is dropped whole when any index is out of bounds, any
/// referenced vertex was rejected by the transform stage, or any mapped
/// corner lands outside the grid.
pub fn assemble_triangles(
    transformed: &[Option<Vec3>],
    indices: &[u32],
    width: usize,
    height: usize,
) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(indices.len() / 3);

    for tri in indices.chunks_exact(3) {
        let corners: Option<[Vec3; 3]> = tri
            .iter()
            .map(|&i| transformed.get(i as usize).copied().flatten())
            .collect::<Option<Vec<_>>>()
            .and_then(|v| v.try_into().ok());

        let Some(corners) = corners else {
            continue;
        };

        let points = corners.map(|v| {
            ScreenPoint::new(map_to_grid(v.x, width), map_to_grid(v.y, height), v.z)
        });

        let on_grid = points.iter().all(|p| {
            p.x >= 0 && (p.x as usize) < width && p.y >= 0 && (p.y as usize) < height
        });
        if !on_grid {
            continue;
        }

        triangles.push(Triangle::new(points[0], points[1], points[2]));
    }

    triangles
}
