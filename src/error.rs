use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a PLY file: first line must be 'ply'")]
    NotPly,

    #[error("PLY header declares no vertices")]
    MissingVertexElement,

    #[error("Invalid PLY header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported type '{name}' for property '{property}' in binary data")]
    UnsupportedType { name: String, property: String },

    #[error("Binary data truncated at byte {offset}: needed {needed}, {available} available")]
    TruncatedBinaryData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Malformed ASCII token '{token}' on line {line}")]
    MalformedAsciiToken { token: String, line: usize },

    #[error("Missing ASCII value on line {line}")]
    UnexpectedEndOfRow { line: usize },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Bounding box has zero extent")]
    DegenerateBoundingBox,
}

impl PlyError {
    /// Whether the error only means the input ended early, so that whatever
    /// was decoded so far is still usable.
    pub fn is_truncation(&self) -> bool {
        matches!(self, PlyError::TruncatedBinaryData { .. })
    }
}
