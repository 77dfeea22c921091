//! Writing geometry back out as PLY and reading it again.

use ply_geometry::{Geometry, GeometryBuffers, PlyFormat};
use proptest::prelude::*;

fn tetrahedron() -> Geometry {
    Geometry::from_buffers(GeometryBuffers {
        positions: vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0, //
        ],
        colors: vec![
            0.1, 0.2, 0.3, //
            0.4, 0.5, 0.6, //
            0.7, 0.8, 0.9, //
            1.0, 0.0, 0.5, //
        ],
        normals: vec![
            -0.57735, -0.57735, -0.57735, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0, //
        ],
        indices: vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
    })
    .unwrap()
}

#[test]
fn test_roundtrip_all_formats() {
    let original = tetrahedron();

    for format in [
        PlyFormat::Ascii,
        PlyFormat::BinaryLittleEndian,
        PlyFormat::BinaryBigEndian,
    ] {
        let bytes = ply_geometry::to_bytes(&original, format, &[]).unwrap();
        let parsed = ply_geometry::from_bytes(&bytes).unwrap();

        assert_eq!(parsed.positions(), original.positions(), "{format}");
        assert_eq!(parsed.colors(), original.colors(), "{format}");
        assert_eq!(parsed.normals(), original.normals(), "{format}");
        assert_eq!(parsed.indices(), original.indices(), "{format}");
        assert!(parsed.has_colors());
        assert!(parsed.has_normals());
    }
}

#[test]
fn test_roundtrip_point_cloud() {
    let original = Geometry::from_buffers(GeometryBuffers {
        positions: vec![0.5, -1.25, 3.0e-7, 1.0e6, 2.0, -0.0],
        ..Default::default()
    })
    .unwrap();

    let text = ply_geometry::to_string(&original, &[]).unwrap();
    assert!(!text.contains("element face"));

    let parsed = ply_geometry::from_str(&text).unwrap();
    assert_eq!(parsed.positions(), original.positions());
    assert!(parsed.indices().is_empty());
    // Nothing to accumulate, so the synthesized normals stay zero.
    assert!(parsed.normals().iter().all(|&n| n == 0.0));
}

fn mesh_strategy() -> impl Strategy<Value = (Vec<f32>, Vec<u32>)> {
    (1usize..40).prop_flat_map(|vertex_count| {
        let positions = prop::collection::vec(-1.0e4f32..1.0e4, vertex_count * 3);
        let indices = prop::collection::vec(0..vertex_count as u32, 0..20)
            .prop_map(|mut v| {
                v.truncate(v.len() / 3 * 3);
                v
            });
        (positions, indices)
    })
}

proptest! {
    #[test]
    fn prop_ascii_roundtrip_preserves_buffers((positions, indices) in mesh_strategy()) {
        let original = Geometry::from_buffers(GeometryBuffers {
            positions,
            indices,
            ..Default::default()
        })
        .unwrap();

        let text = ply_geometry::to_string(&original, &[]).unwrap();
        let parsed = ply_geometry::from_str(&text).unwrap();

        prop_assert_eq!(parsed.positions(), original.positions());
        prop_assert_eq!(parsed.indices(), original.indices());
    }

    #[test]
    fn prop_parsed_geometry_upholds_invariants((positions, indices) in mesh_strategy()) {
        let vertex_count = positions.len() / 3;
        let original = Geometry::from_buffers(GeometryBuffers {
            positions,
            indices,
            ..Default::default()
        })
        .unwrap();

        let bytes = ply_geometry::to_bytes(&original, PlyFormat::BinaryLittleEndian, &[]).unwrap();
        let parsed = ply_geometry::from_bytes(&bytes).unwrap();

        prop_assert_eq!(parsed.positions().len(), 3 * vertex_count);
        prop_assert_eq!(parsed.colors().len(), 3 * vertex_count);
        prop_assert_eq!(parsed.normals().len(), 3 * vertex_count);
        prop_assert!(parsed.indices().iter().all(|&i| (i as usize) < vertex_count));
        prop_assert!(parsed.normalized().positions().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn prop_truncated_binary_never_fails(cut in 0usize..200) {
        let bytes = ply_geometry::to_bytes(&tetrahedron(), PlyFormat::BinaryBigEndian, &[]).unwrap();
        let header_len = bytes
            .windows(b"end_header\n".len())
            .position(|w| w == b"end_header\n")
            .unwrap()
            + b"end_header\n".len();
        let end = (header_len + cut).min(bytes.len());

        let parsed = ply_geometry::from_bytes(&bytes[..end]).unwrap();
        let vertices = parsed.vertex_count();
        prop_assert!(vertices <= 4);
        prop_assert_eq!(parsed.positions().len(), 3 * vertices);
        prop_assert_eq!(parsed.colors().len(), 3 * vertices);
        prop_assert!(parsed.indices().iter().all(|&i| (i as usize) < vertices));
        prop_assert_eq!(parsed.is_truncated(), end < bytes.len());
    }
}
