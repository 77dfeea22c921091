mod face;
mod vertex;

pub(crate) use vertex::VertexRecord;

pub mod val_reader;

use std::io::{BufReader, Read};

use byteorder::{BigEndian, LittleEndian};

use crate::geometry::{Geometry, GeometryBuilder};
use crate::layout::{LayoutEntry, VertexLayout};
use crate::{synth, LoadOptions, PlyError, PlyFormat, PlyHeader};
use val_reader::{AsciiValReader, BinValReader, ScalarReader};

/// How far an element block got before its input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockStatus {
    Complete,
    Truncated { decoded: usize },
}

/// Decode one property value. Values that are not imported are still read
/// so that the reader stays aligned.
pub(crate) fn decode_scalar<S: ScalarReader>(
    reader: &mut S,
    entry: &LayoutEntry,
) -> Result<Option<f32>, PlyError> {
    match entry.data_type {
        Some(ty) => {
            let raw = reader.read_scalar(ty)?;
            Ok(entry.conversion.apply(raw))
        }
        None => {
            reader.skip_unknown()?;
            Ok(None)
        }
    }
}

/// Parse a complete PLY stream into geometry with the default options.
pub fn from_reader<R: Read>(reader: R) -> Result<Geometry, PlyError> {
    from_reader_with_options(reader, &LoadOptions::default())
}

pub fn from_reader_with_options<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> Result<Geometry, PlyError> {
    let mut reader = BufReader::new(reader);
    let header = PlyHeader::parse(&mut reader)?;
    tracing::debug!(
        vertices = header.vertex_count,
        faces = header.face_count,
        format = %header.format,
        "parsed PLY header"
    );

    let layout = VertexLayout::new(&header)?;
    let mut builder = GeometryBuilder::new(&header);

    match header.format {
        PlyFormat::Ascii => {
            let mut values = AsciiValReader::new(reader, header.line_count + 1);
            decode_elements(&mut values, &header, &layout, &mut builder)?;
        }
        PlyFormat::BinaryLittleEndian => {
            let data = read_body(reader, &header, &mut builder)?;
            let mut values = BinValReader::<LittleEndian>::new(&data);
            decode_elements(&mut values, &header, &layout, &mut builder)?;
        }
        PlyFormat::BinaryBigEndian => {
            let data = read_body(reader, &header, &mut builder)?;
            let mut values = BinValReader::<BigEndian>::new(&data);
            decode_elements(&mut values, &header, &layout, &mut builder)?;
        }
    }

    if !builder.has_colors && options.synthesize_colors {
        synth::synthesize_colors(&mut builder, options.default_color);
    }
    if !builder.has_normals && options.synthesize_normals {
        synth::synthesize_normals(&mut builder);
    }

    Ok(builder.finish())
}

pub fn from_bytes(data: &[u8]) -> Result<Geometry, PlyError> {
    from_reader(data)
}

pub fn from_str(ply: &str) -> Result<Geometry, PlyError> {
    from_reader(ply.as_bytes())
}

/// Read the whole binary body and size the vertex buffers to what it can
/// hold, which may be far less than the header claims.
fn read_body<R: Read>(
    mut reader: R,
    header: &PlyHeader,
    builder: &mut GeometryBuilder,
) -> Result<Vec<u8>, PlyError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    if let Some(stride) = header.vertex_stride().filter(|&s| s > 0) {
        builder.reserve_vertices(builder.vertex_count.min(data.len() / stride));
    }
    Ok(data)
}

fn decode_elements<S: ScalarReader>(
    reader: &mut S,
    header: &PlyHeader,
    layout: &VertexLayout,
    builder: &mut GeometryBuilder,
) -> Result<(), PlyError> {
    if let BlockStatus::Truncated { decoded } = vertex::decode_vertices(reader, layout, builder)? {
        tracing::warn!(
            "vertex data ended after {decoded} of {} vertices, faces skipped",
            builder.vertex_count
        );
        builder.truncated = true;
        return Ok(());
    }

    if let BlockStatus::Truncated { decoded } =
        face::decode_faces(reader, &header.face_list, builder)?
    {
        tracing::warn!(
            "face data ended after {decoded} of {} faces",
            builder.face_count
        );
        builder.truncated = true;
    }

    Ok(())
}
