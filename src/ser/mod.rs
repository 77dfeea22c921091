use std::io::Write;

use byteorder::{BigEndian, LittleEndian};

use crate::{Geometry, PlyError, PlyFormat};
use val_writer::{AsciiValWriter, BinValWriter, ScalarWriter};

pub mod val_writer;

/// Write `geometry` as a PLY file.
///
/// Positions are always written as `float x y z`. Normals and colors are
/// written as floats only when they were decoded from a source file, so a
/// re-parse sees the same attributes as present or missing. Triangles go
/// into a `face` element with `list uchar int vertex_indices`.
pub fn to_writer(
    geometry: &Geometry,
    format: PlyFormat,
    mut writer: impl Write,
    comments: &[String],
) -> Result<(), PlyError> {
    write_header(&mut writer, geometry, format, comments)?;
    match format {
        PlyFormat::Ascii => write_elements(&mut AsciiValWriter::new(&mut writer), geometry)?,
        PlyFormat::BinaryLittleEndian => write_elements(
            &mut BinValWriter::<_, LittleEndian>::new(&mut writer),
            geometry,
        )?,
        PlyFormat::BinaryBigEndian => write_elements(
            &mut BinValWriter::<_, BigEndian>::new(&mut writer),
            geometry,
        )?,
    }
    writer.flush()?;
    Ok(())
}

pub fn to_bytes(
    geometry: &Geometry,
    format: PlyFormat,
    comments: &[String],
) -> Result<Vec<u8>, PlyError> {
    let mut buf = vec![];
    to_writer(geometry, format, &mut buf, comments)?;
    Ok(buf)
}

/// ASCII PLY text for `geometry`.
pub fn to_string(geometry: &Geometry, comments: &[String]) -> Result<String, PlyError> {
    let bytes = to_bytes(geometry, PlyFormat::Ascii, comments)?;
    String::from_utf8(bytes)
        .map_err(|e| PlyError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn write_header(
    writer: &mut impl Write,
    geometry: &Geometry,
    format: PlyFormat,
    comments: &[String],
) -> Result<(), PlyError> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format {format} 1.0")?;
    for comment in comments {
        writeln!(writer, "comment {comment}")?;
    }

    writeln!(writer, "element vertex {}", geometry.vertex_count())?;
    let mut names = vec!["x", "y", "z"];
    if geometry.has_normals() {
        names.extend(["nx", "ny", "nz"]);
    }
    if geometry.has_colors() {
        names.extend(["red", "green", "blue"]);
    }
    for name in names {
        writeln!(writer, "property float {name}")?;
    }

    if geometry.triangle_count() > 0 {
        writeln!(writer, "element face {}", geometry.triangle_count())?;
        writeln!(writer, "property list uchar int vertex_indices")?;
    }
    writeln!(writer, "end_header")?;
    Ok(())
}

fn write_elements<S: ScalarWriter>(out: &mut S, geometry: &Geometry) -> Result<(), PlyError> {
    for vertex in 0..geometry.vertex_count() {
        let range = vertex * 3..vertex * 3 + 3;
        let mut attributes = vec![&geometry.positions()[range.clone()]];
        if geometry.has_normals() {
            attributes.push(&geometry.normals()[range.clone()]);
        }
        if geometry.has_colors() {
            attributes.push(&geometry.colors()[range]);
        }
        for value in attributes.into_iter().flatten() {
            out.write_f32(*value)?;
        }
        out.write_row_end()?;
    }

    for triangle in geometry.indices().chunks_exact(3) {
        out.write_u8(3)?;
        for &index in triangle {
            let index = i32::try_from(index).map_err(|_| {
                PlyError::InvalidGeometry(format!("index {index} does not fit a PLY int"))
            })?;
            out.write_i32(index)?;
        }
        out.write_row_end()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeometryBuffers;

    fn triangle() -> Geometry {
        Geometry::from_buffers(GeometryBuffers {
            positions: vec![0.0, 0.0, 0.0, 1.5, 0.0, 0.0, 0.0, 1.0, -0.25],
            colors: vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            indices: vec![0, 1, 2],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_ascii_output() {
        let text = to_string(&triangle(), &["written by a test".to_string()]).unwrap();
        let expected = "ply
format ascii 1.0
comment written by a test
element vertex 3
property float x
property float y
property float z
property float red
property float green
property float blue
element face 1
property list uchar int vertex_indices
end_header
0 0 0 1 0 0
1.5 0 0 0 1 0
0 1 -0.25 0 0 1
3 0 1 2
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_binary_output_size() {
        let bytes = to_bytes(&triangle(), PlyFormat::BinaryBigEndian, &[]).unwrap();
        let header_end = b"end_header\n";
        let pos = bytes
            .windows(header_end.len())
            .position(|w| w == header_end)
            .unwrap();
        let body = &bytes[pos + header_end.len()..];
        // 3 vertices * 6 floats + one face of 1 + 3 * 4 bytes
        assert_eq!(body.len(), 3 * 6 * 4 + 13);
        assert_eq!(&body[24..28], &1.5f32.to_be_bytes());
    }
}
