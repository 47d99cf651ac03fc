//! Waterfall body shapes.
//!
//! The shape selects both the falling-water mesh and the foam spawn
//! distribution used by the emitter (see [`crate::spawn`]).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::constants::MESH_HEIGHT_SCALE;

/// Geometric shape of a waterfall body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum WaterfallShape {
    /// A circular column of falling water (the classic waterfall).
    #[default]
    Cylinder,
    /// Water falling along the four edges of a square outline.
    Box,
    /// A spherical blob of water, e.g. around a fountain orb.
    Sphere,
    /// A flat sheet of falling water.
    Plane,
}

impl WaterfallShape {
    /// Builds the falling-water mesh for this shape.
    ///
    /// `height` may be negative (water flowing upward); the mesh always uses
    /// the absolute height, slightly overscaled so it overlaps the terrain.
    pub fn build_mesh(&self, radius: f32, height: f32) -> Mesh {
        let body_height = height.abs() * MESH_HEIGHT_SCALE;
        match self {
            WaterfallShape::Cylinder => Cylinder::new(radius, body_height).into(),
            WaterfallShape::Box => Cuboid::new(radius * 2.0, body_height, radius * 2.0).into(),
            WaterfallShape::Sphere => Sphere::new(radius).into(),
            WaterfallShape::Plane => Rectangle::new(radius * 2.0, body_height).into(),
        }
    }

    /// Whether this shape gets a foam emitter when foam is requested.
    /// Spherical bodies have no impact line, so they never produce foam.
    pub fn supports_foam(&self) -> bool {
        !matches!(self, WaterfallShape::Sphere)
    }

    /// Whether the mesh must be rendered from both sides regardless of the
    /// flow direction (flat sheets are visible from either face).
    pub fn always_double_sided(&self) -> bool {
        matches!(self, WaterfallShape::Plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_has_no_foam() {
        assert!(!WaterfallShape::Sphere.supports_foam());
        assert!(WaterfallShape::Cylinder.supports_foam());
        assert!(WaterfallShape::Box.supports_foam());
        assert!(WaterfallShape::Plane.supports_foam());
    }

    #[test]
    fn test_plane_is_double_sided() {
        assert!(WaterfallShape::Plane.always_double_sided());
        assert!(!WaterfallShape::Cylinder.always_double_sided());
    }
}
