//! Decode PLY (Polygon File Format) meshes and point clouds into flat,
//! renderer-ready geometry buffers.
//!
//! The header is parsed first and drives decoding of the vertex and face
//! blocks, in ASCII or binary of either endianness. Vertex properties are
//! matched by name, including the `f_dc_*` channels written by Gaussian
//! splatting tools. Colors and normals missing from the file are
//! synthesized.
//!
//! # Example
//!
//! ```rust
//! let ply_data = r#"ply
//! format ascii 1.0
//! element vertex 3
//! property float x
//! property float y
//! property float z
//! element face 1
//! property list uchar int vertex_indices
//! end_header
//! 0 0 0
//! 1 0 0
//! 0 1 0
//! 3 0 1 2
//! "#;
//!
//! let geometry = ply_geometry::from_str(ply_data).unwrap();
//! assert_eq!(geometry.vertex_count(), 3);
//! assert_eq!(geometry.indices(), &[0, 1, 2]);
//! // No normals in the file, so they were computed from the face.
//! assert_eq!(&geometry.normals()[0..3], &[0.0, 0.0, 1.0]);
//!
//! // Fit into the [-1, 1] cube before uploading.
//! let view = geometry.normalized();
//! assert_eq!(&view.positions()[3..6], &[1.0, -1.0, 0.0]);
//! ```

mod bounds;
mod error;
mod geometry;
mod header;
mod options;

pub mod de;
pub mod layout;
pub mod ser;
pub mod synth;

pub use bounds::{BoundingBox, FitTransform, CANONICAL_EXTENT};
pub use de::{from_bytes, from_reader, from_reader_with_options, from_str};
pub use error::PlyError;
pub use geometry::{Geometry, GeometryBuffers};
pub use header::{FaceListDef, PlyFormat, PlyHeader, PropertyDef, ScalarType};
pub use options::LoadOptions;
pub use ser::{to_bytes, to_string, to_writer};
