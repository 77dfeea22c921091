//! Filling in attributes the file did not provide.

use crate::geometry::GeometryBuilder;

/// Light gray used for vertices without color data.
pub const DEFAULT_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

pub(crate) fn synthesize_colors(builder: &mut GeometryBuilder, color: [f32; 3]) {
    tracing::debug!("no vertex colors, filling with {color:?}");
    builder.colors = color.repeat(builder.decoded_vertices());
    builder.colors_synthesized = true;
}

pub(crate) fn synthesize_normals(builder: &mut GeometryBuilder) {
    tracing::debug!(
        triangles = builder.indices.len() / 3,
        "no vertex normals, accumulating face normals"
    );
    builder.normals = vertex_normals(&builder.positions, &builder.indices);
    builder.normals_synthesized = true;
}

/// Smooth per-vertex normals for a triangle list.
///
/// Each triangle adds its unnormalized face normal `(p1 - p0) x (p2 - p0)` to
/// its three vertices, so larger triangles weigh more. Sums are then scaled
/// to unit length. Vertices no triangle touches keep a zero normal, and
/// triangles with an out-of-range index are skipped.
pub fn vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let mut normals = vec![0.0f32; positions.len()];
    let vertex_count = positions.len() / 3;
    let point = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
            continue;
        }

        let (p0, p1, p2) = (point(i0), point(i1), point(i2));
        let face = cross(sub(p1, p0), sub(p2, p0));

        for i in [i0, i1, i2] {
            for axis in 0..3 {
                normals[i * 3 + axis] += face[axis];
            }
        }
    }

    for normal in normals.chunks_exact_mut(3) {
        let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        if len > 0.0 {
            normal.iter_mut().for_each(|c| *c /= len);
        }
    }

    normals
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
