use crate::de::val_reader::ScalarReader;
use crate::de::BlockStatus;
use crate::geometry::GeometryBuilder;
use crate::{FaceListDef, PlyError};

pub(crate) fn decode_faces<S: ScalarReader>(
    reader: &mut S,
    list: &FaceListDef,
    builder: &mut GeometryBuilder,
) -> Result<BlockStatus, PlyError> {
    let mut polygon = Vec::new();
    let mut unsupported = 0usize;
    let mut out_of_range = 0usize;
    let mut status = BlockStatus::Complete;

    for face in 0..builder.face_count {
        if !reader.begin_row()? {
            status = BlockStatus::Truncated { decoded: face };
            break;
        }

        match read_polygon(reader, list, &mut polygon) {
            Ok(()) => {}
            Err(e) if e.is_truncation() => {
                status = BlockStatus::Truncated { decoded: face };
                break;
            }
            Err(e) => return Err(e),
        }

        let Some(indices) = resolve_indices(&polygon, builder.vertex_count) else {
            out_of_range += 1;
            continue;
        };

        match indices.as_slice() {
            &[a, b, c] => builder.push_triangle([a, b, c]),
            &[a, b, c, d] => {
                builder.push_triangle([a, b, c]);
                builder.push_triangle([a, c, d]);
            }
            _ => unsupported += 1,
        }
    }

    if unsupported > 0 {
        tracing::warn!("skipped {unsupported} faces that are neither triangles nor quads");
    }
    if out_of_range > 0 {
        tracing::warn!("dropped {out_of_range} faces with out-of-range vertex indices");
    }

    Ok(status)
}

/// Read a count followed by that many indices. Every index is consumed even
/// for polygons that won't be triangulated, so the next face stays aligned.
fn read_polygon<S: ScalarReader>(
    reader: &mut S,
    list: &FaceListDef,
    polygon: &mut Vec<i64>,
) -> Result<(), PlyError> {
    polygon.clear();
    let count = reader.read_int(list.count_type)?;
    let count = usize::try_from(count).unwrap_or(0);
    for _ in 0..count {
        polygon.push(reader.read_int(list.index_type)?);
    }
    Ok(())
}

fn resolve_indices(polygon: &[i64], vertex_count: usize) -> Option<Vec<u32>> {
    polygon
        .iter()
        .map(|&i| {
            u32::try_from(i)
                .ok()
                .filter(|&i| (i as usize) < vertex_count)
        })
        .collect()
}
