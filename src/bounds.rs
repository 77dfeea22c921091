//! Axis-aligned bounds and the fit-to-view transform.

use serde::Serialize;

use crate::PlyError;

/// Side of the cube, centered on the origin, that models are fitted into.
pub const CANONICAL_EXTENT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    /// Bounds of a flat `xyz` position buffer. `None` when there are no
    /// complete positions.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut points = positions.chunks_exact(3);
        let first = points.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;

        for point in points {
            for axis in 0..3 {
                min[axis] = min[axis].min(point[axis]);
                max[axis] = max[axis].max(point[axis]);
            }
        }

        Some(Self { min, max })
    }

    pub fn center(&self) -> [f32; 3] {
        [0, 1, 2].map(|axis| (self.min[axis] + self.max[axis]) / 2.0)
    }

    pub fn ranges(&self) -> [f32; 3] {
        [0, 1, 2].map(|axis| self.max[axis] - self.min[axis])
    }

    pub fn max_range(&self) -> f32 {
        let [x, y, z] = self.ranges();
        x.max(y).max(z)
    }

    /// Centering plus uniform scale that maps the longest side onto
    /// `extent`, preserving aspect ratio.
    pub fn fit_transform(&self, extent: f32) -> Result<FitTransform, PlyError> {
        let max_range = self.max_range();
        if !(max_range > 0.0) {
            return Err(PlyError::DegenerateBoundingBox);
        }

        let scale = extent / max_range;
        if !scale.is_finite() {
            return Err(PlyError::DegenerateBoundingBox);
        }

        Ok(FitTransform {
            center: self.center(),
            scale,
        })
    }

    /// Like [`BoundingBox::fit_transform`], but a degenerate box yields a
    /// pure recentering instead of an error.
    pub fn fit_transform_or_recenter(&self, extent: f32) -> FitTransform {
        self.fit_transform(extent).unwrap_or_else(|_| {
            tracing::debug!("degenerate bounding box, recentering without scaling");
            FitTransform {
                center: self.center(),
                scale: 1.0,
            }
        })
    }
}

/// `p' = (p - center) * scale`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitTransform {
    pub center: [f32; 3],
    pub scale: f32,
}

impl FitTransform {
    pub fn apply_point(&self, point: [f32; 3]) -> [f32; 3] {
        [0, 1, 2].map(|axis| (point[axis] - self.center[axis]) * self.scale)
    }

    /// Transform a flat `xyz` buffer in place.
    pub fn apply(&self, positions: &mut [f32]) {
        for point in positions.chunks_exact_mut(3) {
            let moved = self.apply_point([point[0], point[1], point[2]]);
            point.copy_from_slice(&moved);
        }
    }
}
