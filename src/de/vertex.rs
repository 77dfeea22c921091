use crate::de::val_reader::ScalarReader;
use crate::de::{decode_scalar, BlockStatus};
use crate::geometry::GeometryBuilder;
use crate::layout::{Slot, VertexLayout};
use crate::PlyError;

/// One decoded vertex, committed to the builder only once complete.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct VertexRecord {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

pub(crate) fn decode_vertices<S: ScalarReader>(
    reader: &mut S,
    layout: &VertexLayout,
    builder: &mut GeometryBuilder,
) -> Result<BlockStatus, PlyError> {
    for index in 0..builder.vertex_count {
        if !reader.begin_row()? {
            return Ok(BlockStatus::Truncated { decoded: index });
        }

        match decode_vertex(reader, layout) {
            Ok(record) => builder.push_vertex(&record),
            Err(e) if e.is_truncation() => return Ok(BlockStatus::Truncated { decoded: index }),
            Err(e) => return Err(e),
        }
    }

    Ok(BlockStatus::Complete)
}

fn decode_vertex<S: ScalarReader>(
    reader: &mut S,
    layout: &VertexLayout,
) -> Result<VertexRecord, PlyError> {
    let mut record = VertexRecord::default();

    for entry in &layout.entries {
        // Short ASCII rows leave the remaining attributes at zero.
        if !reader.row_has_values() {
            break;
        }

        let Some(value) = decode_scalar(reader, entry)? else {
            continue;
        };

        match entry.slot {
            Slot::Position(axis) => record.position[axis] = value,
            Slot::Normal(axis) => record.normal[axis] = value,
            Slot::Color(channel) => record.color[channel] = value,
            Slot::Ignored => {}
        }
    }

    Ok(record)
}
