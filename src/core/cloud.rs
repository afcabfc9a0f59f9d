//! The decoded point cloud: parallel position and color buffers.

use crate::color::WHITE;
use crate::util::{BBox3f, Vec3, Vec4};

/// Point cloud ready for rendering.
///
/// Index `i` of `positions` and `colors` refers to the same point, in file
/// order. The buffers are only grown through [`PointCloud::push`], which keeps
/// their lengths equal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    positions: Vec<Vec3>,
    colors: Vec<Vec4>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate room for `n` points.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            colors: Vec::with_capacity(n),
        }
    }

    /// Append one point.
    #[inline]
    pub fn push(&mut self, position: Vec3, color: Vec4) {
        self.positions.push(position);
        self.colors.push(color);
    }

    /// Append one point with the default opaque white color.
    #[inline]
    pub fn push_white(&mut self, position: Vec3) {
        self.push(position, WHITE);
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// RGBA colors, each channel in `[0, 1]` for well-formed input.
    #[inline]
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounds of all positions.
    pub fn bounds(&self) -> BBox3f {
        BBox3f::from_points(&self.positions)
    }

    /// Translate every position so the bounding box center sits at the origin.
    ///
    /// Returns the offset that was subtracted. Empty clouds are left alone.
    pub fn center(&mut self) -> Vec3 {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return Vec3::ZERO;
        }
        let offset = bounds.center();
        for p in &mut self.positions {
            *p -= offset;
        }
        offset
    }

    /// Split into the raw `(positions, colors)` buffers.
    pub fn into_buffers(self) -> (Vec<Vec3>, Vec<Vec4>) {
        (self.positions, self.colors)
    }
}
