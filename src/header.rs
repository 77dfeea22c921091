use std::fmt;
use std::io::Read;

use serde::Serialize;

use crate::PlyError;

/// PLY file format (ascii or binary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlyFormat {
    #[default]
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl PlyFormat {
    pub fn is_binary(&self) -> bool {
        !matches!(self, PlyFormat::Ascii)
    }
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlyFormat::Ascii => write!(f, "ascii"),
            PlyFormat::BinaryLittleEndian => write!(f, "binary_little_endian"),
            PlyFormat::BinaryBigEndian => write!(f, "binary_big_endian"),
        }
    }
}

/// PLY scalar data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    /// Resolve a header type name, accepting both the classic and the
    /// sized spellings (`uchar` / `uint8`).
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "char" | "int8" => Some(ScalarType::Char),
            "uchar" | "uint8" => Some(ScalarType::UChar),
            "short" | "int16" => Some(ScalarType::Short),
            "ushort" | "uint16" => Some(ScalarType::UShort),
            "int" | "int32" => Some(ScalarType::Int),
            "uint" | "uint32" => Some(ScalarType::UInt),
            "float" | "float32" => Some(ScalarType::Float),
            "double" | "float64" => Some(ScalarType::Double),
            _ => None,
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            ScalarType::Char | ScalarType::UChar => 1,
            ScalarType::Short | ScalarType::UShort => 2,
            ScalarType::Int | ScalarType::UInt | ScalarType::Float => 4,
            ScalarType::Double => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarType::Float | ScalarType::Double)
    }
}

/// A `property` line of the vertex element, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDef {
    /// Type name exactly as written in the header.
    pub type_name: String,
    pub name: String,
    /// `None` for list properties and type names this crate doesn't know.
    pub data_type: Option<ScalarType>,
}

/// Layout of the face index list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceListDef {
    pub count_type: ScalarType,
    pub index_type: ScalarType,
}

impl Default for FaceListDef {
    fn default() -> Self {
        Self {
            count_type: ScalarType::UChar,
            index_type: ScalarType::Int,
        }
    }
}

/// The parts of a PLY header that drive geometry decoding.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub version: Option<String>,
    pub vertex_count: u32,
    pub face_count: u32,
    pub vertex_properties: Vec<PropertyDef>,
    pub face_list: FaceListDef,
    pub has_normals: bool,
    pub has_colors: bool,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
    /// Number of text lines the header occupied, `end_header` included.
    pub line_count: usize,
}

impl PlyHeader {
    /// Parse a PLY header from a reader.
    ///
    /// Reads one byte at a time and stops right after the `end_header` line,
    /// so the reader is left positioned on the first byte of element data.
    /// Wrap slow readers in a `BufReader` and keep using that same reader
    /// for the body.
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self, PlyError> {
        let mut header = PlyHeader::default();

        match read_header_line(reader)? {
            Some(line) if line.trim() == "ply" => header.line_count = 1,
            _ => return Err(PlyError::NotPly),
        }

        let mut current_element: Option<String> = None;
        let mut face_list_seen = false;
        let mut ended = false;

        while let Some(line) = read_header_line(reader)? {
            header.line_count += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix("comment") {
                header.comments.push(comment.trim().to_string());
                continue;
            }
            if line == "end_header" {
                ended = true;
                break;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                continue;
            }

            match parts[0] {
                "format" => {
                    match parts[1] {
                        "ascii" => header.format = PlyFormat::Ascii,
                        "binary_little_endian" => header.format = PlyFormat::BinaryLittleEndian,
                        "binary_big_endian" => header.format = PlyFormat::BinaryBigEndian,
                        other => tracing::warn!("ignoring unknown PLY format '{other}'"),
                    }
                    header.version = parts.get(2).map(|v| v.to_string());
                }
                "obj_info" => {
                    header.obj_info.push(parts[1..].join(" "));
                }
                "element" => {
                    let name = parts[1];
                    let count = parts
                        .get(2)
                        .ok_or_else(|| {
                            PlyError::InvalidHeader(format!("Element '{name}' has no count"))
                        })?
                        .parse::<u32>()
                        .map_err(|_| {
                            PlyError::InvalidHeader(format!("Invalid element count: {}", parts[2]))
                        })?;

                    match name {
                        "vertex" => header.vertex_count = count,
                        "face" => header.face_count = count,
                        _ => {}
                    }
                    current_element = Some(name.to_string());
                }
                "property" => match current_element.as_deref() {
                    Some("vertex") => header.push_vertex_property(&parts)?,
                    Some("face") if parts[1] == "list" && !face_list_seen => {
                        face_list_seen = true;
                        header.face_list = parse_face_list(&parts);
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        if !ended {
            tracing::warn!("PLY header ended without 'end_header'");
        }

        if header.vertex_count == 0 {
            return Err(PlyError::MissingVertexElement);
        }

        Ok(header)
    }

    fn push_vertex_property(&mut self, parts: &[&str]) -> Result<(), PlyError> {
        let (type_name, name) = match parts {
            [_, "list", _, _, name, ..] => ("list", *name),
            [_, type_name, name, ..] => (*type_name, *name),
            _ => {
                return Err(PlyError::InvalidHeader(format!(
                    "Invalid property line: {}",
                    parts.join(" ")
                )))
            }
        };

        let data_type = if type_name == "list" {
            None
        } else {
            ScalarType::from_name(type_name)
        };

        if matches!(name, "nx" | "normal_x") {
            self.has_normals = true;
        }
        if matches!(name, "red" | "r" | "f_dc_0") {
            self.has_colors = true;
        }

        self.vertex_properties.push(PropertyDef {
            type_name: type_name.to_string(),
            name: name.to_string(),
            data_type,
        });
        Ok(())
    }

    /// Bytes occupied by one vertex record, when every property has a
    /// fixed width.
    pub fn vertex_stride(&self) -> Option<usize> {
        self.vertex_properties
            .iter()
            .map(|p| p.data_type.map(|t| t.size_bytes()))
            .sum()
    }
}

/// `property list <count_type> <index_type> <name>`; unknown types keep the
/// `uchar`/`int` default for that slot.
fn parse_face_list(parts: &[&str]) -> FaceListDef {
    let default = FaceListDef::default();
    let resolve = |idx: usize, fallback: ScalarType| {
        match parts.get(idx).and_then(|t| ScalarType::from_name(t)) {
            Some(t) if !t.is_float() => t,
            _ => {
                tracing::warn!(
                    "unusable face list type '{}', assuming {fallback:?}",
                    parts.get(idx).unwrap_or(&"")
                );
                fallback
            }
        }
    };
    FaceListDef {
        count_type: resolve(2, default.count_type),
        index_type: resolve(3, default.index_type),
    }
}

/// Read one `\n`-terminated line without reading past it. Returns `None` at
/// end of input when nothing was read.
fn read_header_line<R: Read>(reader: &mut R) -> Result<Option<String>, PlyError> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                if byte[0] == b'\n' {
                    break;
                }
                bytes.push(byte[0]);
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PlyError::Io(e)),
        }
    }

    if bytes.is_empty() && byte[0] != b'\n' {
        return Ok(None);
    }

    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| PlyError::InvalidHeader(format!("Header is not valid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn test_parse_simple_header() {
        let header_text = r#"ply
format ascii 1.0
comment A simple PLY file
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
"#;

        let mut cursor = Cursor::new(header_text);
        let header = PlyHeader::parse(&mut cursor).unwrap();

        assert_eq!(header.format, PlyFormat::Ascii);
        assert_eq!(header.version.as_deref(), Some("1.0"));
        assert_eq!(header.vertex_count, 3);
        assert_eq!(header.face_count, 1);
        assert_eq!(header.vertex_properties.len(), 3);
        assert_eq!(header.comments, vec!["A simple PLY file".to_string()]);
        assert_eq!(header.face_list, FaceListDef::default());
        assert_eq!(header.line_count, 10);
        assert!(!header.has_normals);
        assert!(!header.has_colors);
    }

    #[test]
    fn test_header_stops_at_end_header() {
        let mut data = b"ply\nformat binary_little_endian 1.0\nelement vertex 1\nproperty float x\nend_header\n".to_vec();
        data.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        let mut cursor = Cursor::new(data);
        let header = PlyHeader::parse(&mut cursor).unwrap();
        assert_eq!(header.format, PlyFormat::BinaryLittleEndian);

        let mut rest = Vec::new();
        cursor.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_not_ply() {
        let mut cursor = Cursor::new("plx\nformat ascii 1.0\nend_header\n");
        assert!(matches!(
            PlyHeader::parse(&mut cursor),
            Err(PlyError::NotPly)
        ));

        let mut empty = Cursor::new("");
        assert!(matches!(PlyHeader::parse(&mut empty), Err(PlyError::NotPly)));
    }

    #[test]
    fn test_missing_vertex_element() {
        let mut cursor = Cursor::new("ply\nformat ascii 1.0\nelement face 2\nend_header\n");
        assert!(matches!(
            PlyHeader::parse(&mut cursor),
            Err(PlyError::MissingVertexElement)
        ));

        let mut zero = Cursor::new("ply\nformat ascii 1.0\nelement vertex 0\nend_header\n");
        assert!(matches!(
            PlyHeader::parse(&mut zero),
            Err(PlyError::MissingVertexElement)
        ));
    }

    #[test]
    fn test_attribute_flags_and_aliases() {
        let text = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float normal_x\nproperty float f_dc_0\nend_header\n";
        let header = PlyHeader::parse(&mut Cursor::new(text)).unwrap();
        assert!(header.has_normals);
        assert!(header.has_colors);
    }

    #[test]
    fn test_unknown_format_is_ignored() {
        let text = "ply\nformat binary_middle_endian 1.0\nelement vertex 1\nproperty float x\nend_header\n";
        let header = PlyHeader::parse(&mut Cursor::new(text)).unwrap();
        assert_eq!(header.format, PlyFormat::Ascii);
    }

    #[test]
    fn test_other_element_properties_dropped() {
        let text = "ply\nformat ascii 1.0\nelement camera 1\nproperty float view_px\nelement vertex 2\nproperty float x\nproperty uchar red\nproperty foo weird\nend_header\n";
        let header = PlyHeader::parse(&mut Cursor::new(text)).unwrap();
        let names: Vec<_> = header
            .vertex_properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["x", "red", "weird"]);
        assert_eq!(header.vertex_properties[1].data_type, Some(ScalarType::UChar));
        assert_eq!(header.vertex_properties[2].data_type, None);
        assert_eq!(header.vertex_stride(), None);
    }

    #[test]
    fn test_face_list_types() {
        let text = "ply\r\nformat binary_big_endian 1.0\r\nelement vertex 3\r\nproperty float x\r\nelement face 1\r\nproperty list int uint vertex_indices\r\nend_header\r\n";
        let header = PlyHeader::parse(&mut Cursor::new(text)).unwrap();
        assert_eq!(header.format, PlyFormat::BinaryBigEndian);
        assert_eq!(
            header.face_list,
            FaceListDef {
                count_type: ScalarType::Int,
                index_type: ScalarType::UInt,
            }
        );
    }

    #[test]
    fn test_invalid_element_count() {
        let text = "ply\nformat ascii 1.0\nelement vertex many\nend_header\n";
        assert!(matches!(
            PlyHeader::parse(&mut Cursor::new(text)),
            Err(PlyError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_scalar_type_names() {
        assert_eq!(ScalarType::from_name("float"), Some(ScalarType::Float));
        assert_eq!(ScalarType::from_name("float32"), Some(ScalarType::Float));
        assert_eq!(ScalarType::from_name("uint8"), Some(ScalarType::UChar));
        assert_eq!(ScalarType::from_name("int16"), Some(ScalarType::Short));
        assert_eq!(ScalarType::from_name("double"), Some(ScalarType::Double));
        assert_eq!(ScalarType::from_name("invalid_type"), None);
        assert_eq!(ScalarType::Double.size_bytes(), 8);
    }
}
