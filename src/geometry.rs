use serde::Serialize;

use crate::bounds::{BoundingBox, CANONICAL_EXTENT};
use crate::de::VertexRecord;
use crate::{PlyError, PlyHeader};

/// Renderer-ready buffers decoded from a PLY file.
///
/// Positions, colors and normals are parallel flat arrays with three floats
/// per vertex. `indices` is a triangle list. Every index is smaller than
/// [`Geometry::vertex_count`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    positions: Vec<f32>,
    colors: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
    has_colors: bool,
    has_normals: bool,
    colors_synthesized: bool,
    normals_synthesized: bool,
    truncated: bool,
}

/// The owned buffers of a [`Geometry`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Build geometry from existing buffers, e.g. to write it out as PLY.
    ///
    /// `colors` and `normals` may be empty; when present they count as
    /// decoded attributes. Fails if any buffer length disagrees with the
    /// vertex count or an index is out of range.
    pub fn from_buffers(buffers: GeometryBuffers) -> Result<Self, PlyError> {
        let GeometryBuffers {
            positions,
            colors,
            normals,
            indices,
        } = buffers;

        if positions.len() % 3 != 0 {
            return Err(PlyError::InvalidGeometry(format!(
                "{} position values is not a multiple of 3",
                positions.len()
            )));
        }
        for (name, buffer) in [("colors", &colors), ("normals", &normals)] {
            if !buffer.is_empty() && buffer.len() != positions.len() {
                return Err(PlyError::InvalidGeometry(format!(
                    "{name} has {} values, expected {}",
                    buffer.len(),
                    positions.len()
                )));
            }
        }
        if indices.len() % 3 != 0 {
            return Err(PlyError::InvalidGeometry(format!(
                "{} indices is not a whole number of triangles",
                indices.len()
            )));
        }
        let vertex_count = positions.len() / 3;
        if let Some(index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(PlyError::InvalidGeometry(format!(
                "index {index} out of range for {vertex_count} vertices"
            )));
        }

        Ok(Self {
            has_colors: !colors.is_empty(),
            has_normals: !normals.is_empty(),
            positions,
            colors,
            normals,
            indices,
            colors_synthesized: false,
            normals_synthesized: false,
            truncated: false,
        })
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Per-vertex RGB in `[0, 1]`. Empty only when colors were neither in
    /// the file nor synthesized.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Whether colors were decoded from the source data.
    pub fn has_colors(&self) -> bool {
        self.has_colors
    }

    /// Whether normals were decoded from the source data.
    pub fn has_normals(&self) -> bool {
        self.has_normals
    }

    pub fn colors_synthesized(&self) -> bool {
        self.colors_synthesized
    }

    pub fn normals_synthesized(&self) -> bool {
        self.normals_synthesized
    }

    /// Whether the input ended before all declared elements were read.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_positions(&self.positions)
    }

    /// A copy with positions centered on the origin and scaled to fit the
    /// canonical cube of side 2.
    ///
    /// When all positions coincide the copy is only recentered, so the
    /// result never contains NaN or infinity from the fit itself.
    pub fn normalized(&self) -> Geometry {
        let mut out = self.clone();
        if let Some(bounds) = self.bounding_box() {
            bounds
                .fit_transform_or_recenter(CANONICAL_EXTENT)
                .apply(&mut out.positions);
        }
        out
    }

    pub fn into_buffers(self) -> GeometryBuffers {
        GeometryBuffers {
            positions: self.positions,
            colors: self.colors,
            normals: self.normals,
            indices: self.indices,
        }
    }
}

/// Mutable state for one parse. Turned into an immutable [`Geometry`] by
/// [`GeometryBuilder::finish`].
#[derive(Debug)]
pub(crate) struct GeometryBuilder {
    pub vertex_count: usize,
    pub face_count: usize,
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    pub has_colors: bool,
    pub has_normals: bool,
    pub colors_synthesized: bool,
    pub normals_synthesized: bool,
    pub truncated: bool,
}

impl GeometryBuilder {
    /// Buffers start empty and grow as vertices are decoded, so a header
    /// claiming more vertices than the body holds costs nothing. Color and
    /// normal buffers are only filled when the header declares them.
    pub fn new(header: &PlyHeader) -> Self {
        Self {
            vertex_count: header.vertex_count as usize,
            face_count: header.face_count as usize,
            positions: Vec::new(),
            colors: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            has_colors: header.has_colors,
            has_normals: header.has_normals,
            colors_synthesized: false,
            normals_synthesized: false,
            truncated: false,
        }
    }

    /// Vertices committed so far.
    pub fn decoded_vertices(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn reserve_vertices(&mut self, count: usize) {
        self.positions.reserve(count * 3);
        if self.has_normals {
            self.normals.reserve(count * 3);
        }
        if self.has_colors {
            self.colors.reserve(count * 3);
        }
    }

    pub fn push_vertex(&mut self, record: &VertexRecord) {
        self.positions.extend_from_slice(&record.position);
        if self.has_normals {
            self.normals.extend_from_slice(&record.normal);
        }
        if self.has_colors {
            self.colors.extend_from_slice(&record.color);
        }
    }

    pub fn push_triangle(&mut self, triangle: [u32; 3]) {
        self.indices.extend_from_slice(&triangle);
    }

    pub fn finish(self) -> Geometry {
        Geometry {
            positions: self.positions,
            colors: self.colors,
            normals: self.normals,
            indices: self.indices,
            has_colors: self.has_colors,
            has_normals: self.has_normals,
            colors_synthesized: self.colors_synthesized,
            normals_synthesized: self.normals_synthesized,
            truncated: self.truncated,
        }
    }
}
