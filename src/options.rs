//! Settings for turning a PLY file into geometry.

use serde::{Deserialize, Serialize};

use crate::synth::DEFAULT_COLOR;

/// Load settings. The defaults fill in missing colors with light gray and
/// missing normals with smooth face-accumulated normals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// RGB assigned to every vertex when the file has no color properties.
    pub default_color: [f32; 3],
    pub synthesize_colors: bool,
    pub synthesize_normals: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR,
            synthesize_colors: true,
            synthesize_normals: true,
        }
    }
}
