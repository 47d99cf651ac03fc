//! Foam spawn distributions.
//!
//! Maps a waterfall shape and radius to a random horizontal offset for a
//! newborn foam particle, relative to the emitter origin.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::shape::WaterfallShape;

/// Draws a random spawn offset for a foam particle.
///
/// The offset always has `y = 0`; foam is born on the emitter's horizontal
/// plane and rises from there.
///
/// - [`WaterfallShape::Box`]: a point on the outline of a square of
///   half-width `radius`. One axis is pinned to an edge (`±radius`), the
///   other is uniform along it. The edge is picked with a 50/50 axis choice
///   followed by a 50/50 sign choice, which slightly favors corners over a
///   true uniform-perimeter distribution. That bias is intentional; it is
///   the established look of the effect.
/// - [`WaterfallShape::Plane`]: a point on a line of length `2 * radius`
///   along the x axis.
/// - Anything else: a uniform angle on a circle of radius `radius`.
pub fn spawn_offset(shape: WaterfallShape, radius: f32, rng: &mut impl Rng) -> Vec3 {
    let rand = rng.gen::<f32>();
    match shape {
        WaterfallShape::Box => {
            let along_x = rng.gen_bool(0.5);
            let edge = if rng.gen_bool(0.5) { radius } else { -radius };
            let along = (rand - 0.5) * radius * 2.0;
            if along_x {
                Vec3::new(along, 0.0, edge)
            } else {
                Vec3::new(edge, 0.0, along)
            }
        }
        WaterfallShape::Plane => Vec3::new((rand - 0.5) * radius * 2.0, 0.0, 0.0),
        _ => Vec3::new((TAU * rand).sin() * radius, 0.0, (TAU * rand).cos() * radius),
    }
}
