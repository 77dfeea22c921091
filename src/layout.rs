//! Resolution of vertex property names onto geometry slots.
//!
//! Property names are matched once per parse, when the header is turned into
//! a [`VertexLayout`]. The decode loop then walks the resolved entries in
//! header order without comparing any strings.

use crate::{PlyError, PlyFormat, PlyHeader, ScalarType};

/// Destination of one decoded vertex property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Position(usize),
    Normal(usize),
    Color(usize),
    /// Decoded to keep the cursor aligned, then dropped.
    Ignored,
}

const SLOT_ALIASES: &[(&str, Slot)] = &[
    ("x", Slot::Position(0)),
    ("y", Slot::Position(1)),
    ("z", Slot::Position(2)),
    ("nx", Slot::Normal(0)),
    ("ny", Slot::Normal(1)),
    ("nz", Slot::Normal(2)),
    ("normal_x", Slot::Normal(0)),
    ("normal_y", Slot::Normal(1)),
    ("normal_z", Slot::Normal(2)),
    ("red", Slot::Color(0)),
    ("r", Slot::Color(0)),
    ("f_dc_0", Slot::Color(0)),
    ("green", Slot::Color(1)),
    ("g", Slot::Color(1)),
    ("f_dc_1", Slot::Color(1)),
    ("blue", Slot::Color(2)),
    ("b", Slot::Color(2)),
    ("f_dc_2", Slot::Color(2)),
];

impl Slot {
    pub fn for_name(name: &str) -> Slot {
        SLOT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, slot)| *slot)
            .unwrap_or(Slot::Ignored)
    }
}

/// How a raw property value becomes the value stored in a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// Stored as read.
    Raw,
    /// Divided by the type's unsigned maximum.
    Scaled(f32),
    /// Read to keep the reader aligned, never stored.
    Dropped,
}

impl Conversion {
    /// Binary rule, the same for every slot.
    ///
    /// Floats pass through. 8-bit types are divided by 255 and 16-bit types
    /// by 65535, signed ones included, with no offset for negative values.
    /// Wider types are not imported.
    pub fn binary(ty: ScalarType) -> Self {
        match ty {
            ScalarType::Float => Conversion::Raw,
            ScalarType::UChar | ScalarType::Char => Conversion::Scaled(255.0),
            ScalarType::UShort | ScalarType::Short => Conversion::Scaled(65535.0),
            ScalarType::Int | ScalarType::UInt | ScalarType::Double => Conversion::Dropped,
        }
    }

    /// ASCII rule. Positions and normals keep the parsed number whatever the
    /// declared type. Color channels declared `float` pass through and every
    /// other color type is divided by 255.
    pub fn ascii(ty: ScalarType, slot: Slot) -> Self {
        match slot {
            Slot::Color(_) if ty != ScalarType::Float => Conversion::Scaled(255.0),
            _ => Conversion::Raw,
        }
    }

    pub fn apply(self, raw: f32) -> Option<f32> {
        match self {
            Conversion::Raw => Some(raw),
            Conversion::Scaled(max) => Some(raw / max),
            Conversion::Dropped => None,
        }
    }
}

/// One vertex property after resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEntry {
    /// `None` when the type is unknown; only ASCII data can carry those.
    pub data_type: Option<ScalarType>,
    pub slot: Slot,
    pub conversion: Conversion,
}

/// Ordered per-vertex decode plan.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    pub entries: Vec<LayoutEntry>,
}

impl VertexLayout {
    /// Resolve every vertex property of `header`.
    ///
    /// Normal and color slots are demoted to [`Slot::Ignored`] when the header
    /// did not declare that attribute, so presence is decided once here
    /// rather than per value.
    pub fn new(header: &PlyHeader) -> Result<Self, PlyError> {
        if header.vertex_properties.is_empty() {
            return Err(PlyError::InvalidHeader(
                "Vertex element declares no properties".to_string(),
            ));
        }

        let entries = header
            .vertex_properties
            .iter()
            .map(|prop| {
                if prop.data_type.is_none() && header.format.is_binary() {
                    return Err(PlyError::UnsupportedType {
                        name: prop.type_name.clone(),
                        property: prop.name.clone(),
                    });
                }

                let slot = match Slot::for_name(&prop.name) {
                    Slot::Normal(_) if !header.has_normals => Slot::Ignored,
                    Slot::Color(_) if !header.has_colors => Slot::Ignored,
                    slot => slot,
                };

                let conversion = match (slot, prop.data_type) {
                    (Slot::Ignored, _) | (_, None) => Conversion::Dropped,
                    (slot, Some(ty)) if header.format == PlyFormat::Ascii => {
                        Conversion::ascii(ty, slot)
                    }
                    (_, Some(ty)) => Conversion::binary(ty),
                };

                Ok(LayoutEntry {
                    data_type: prop.data_type,
                    slot,
                    conversion,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }
}
