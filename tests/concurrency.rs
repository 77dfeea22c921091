//! Parsing off the calling thread and handing the result back.

use ply_geometry::{Geometry, GeometryBuffers, PlyFormat};

fn grid_ply(size: u32, format: PlyFormat) -> Vec<u8> {
    let mut positions = Vec::new();
    for y in 0..size {
        for x in 0..size {
            positions.extend_from_slice(&[x as f32, y as f32, ((x * y) % 7) as f32 * 0.1]);
        }
    }
    let mut indices = Vec::new();
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let i = y * size + x;
            indices.extend_from_slice(&[i, i + 1, i + size, i + 1, i + size + 1, i + size]);
        }
    }

    let geometry = Geometry::from_buffers(GeometryBuffers {
        positions,
        indices,
        ..Default::default()
    })
    .unwrap();
    ply_geometry::to_bytes(&geometry, format, &[]).unwrap()
}

#[tokio::test]
async fn test_parse_on_blocking_pool() {
    let data = grid_ply(32, PlyFormat::BinaryLittleEndian);

    let geometry = tokio::task::spawn_blocking(move || ply_geometry::from_bytes(&data))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(geometry.vertex_count(), 32 * 32);
    assert_eq!(geometry.triangle_count(), 31 * 31 * 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_parses_run_concurrently() {
    let formats = [
        PlyFormat::Ascii,
        PlyFormat::BinaryLittleEndian,
        PlyFormat::BinaryBigEndian,
    ];

    let handles: Vec<_> = formats
        .into_iter()
        .map(|format| {
            let data = grid_ply(16, format);
            tokio::task::spawn_blocking(move || ply_geometry::from_bytes(&data))
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    for geometry in &results[1..] {
        assert_eq!(geometry.positions(), results[0].positions());
        assert_eq!(geometry.normals(), results[0].normals());
        assert_eq!(geometry.indices(), results[0].indices());
    }
}
