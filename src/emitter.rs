//! Foam emission scheduling.
//!
//! Each waterfall with foam carries one [`FoamEmitter`]: the state deciding
//! when the next foam particle is born and with what size and lifetime.
//! Births are stochastic but rate-based: the expected emission rate scales
//! with the emitter radius, so wide waterfalls churn more.

use bevy::prelude::*;
use rand::Rng;

use crate::config::constants::{
    EMISSION_RATE_PER_SQUARE, FOAM_LIFETIME_BASE, FOAM_LIFETIME_JITTER, FOAM_SIZE_BASE,
    FOAM_SIZE_HEIGHT_FACTOR, FOAM_SIZE_JITTER, FOAM_SIZE_RADIUS_FACTOR,
};
use crate::shape::WaterfallShape;
use crate::spawn::spawn_offset;

/// Everything needed to materialize one newborn foam particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoamSpawn {
    /// Spawn position relative to the emitter origin.
    pub offset: Vec3,
    /// Visual scale in world units.
    pub size: f32,
    /// Seconds until the particle expires.
    pub lifetime: f32,
}

/// Per-waterfall foam emission state.
///
/// The accumulator and threshold both start at zero, so the first tick with
/// a positive delta produces a birth immediately.
#[derive(Component, Debug, Clone)]
pub struct FoamEmitter {
    /// Emitter radius in world units.
    pub radius: f32,
    /// Waterfall height in world units; negative means upward flow.
    pub height: f32,
    /// Shape driving the spawn distribution.
    pub shape: WaterfallShape,
    /// Seconds of game time accumulated since this emitter was created.
    accumulator: f32,
    /// Accumulator value at which the next birth fires.
    next_threshold: f32,
}

impl FoamEmitter {
    /// Creates an emitter for a waterfall of the given dimensions.
    pub fn new(radius: f32, height: f32, shape: WaterfallShape) -> Self {
        Self {
            radius,
            height,
            shape,
            accumulator: 0.0,
            next_threshold: 0.0,
        }
    }

    /// Advances the emission clock by `delta_secs` and returns the birth to
    /// perform, if the threshold was crossed.
    ///
    /// At most one particle is born per call, no matter how large the delta:
    /// the accumulator is deliberately not re-checked in a loop, which
    /// throttles emission after long stalls instead of releasing a burst.
    ///
    /// After a birth the threshold is re-rolled to
    /// `accumulator + t/2 + (t/2) * rand` where `t` is the mean interval
    /// `square_size / (50 * radius)`, so the gap to the next birth is always
    /// strictly positive and averages one over the target rate.
    pub fn advance(
        &mut self,
        delta_secs: f32,
        square_size: f32,
        rng: &mut impl Rng,
    ) -> Option<FoamSpawn> {
        self.accumulator += delta_secs;
        if self.accumulator <= self.next_threshold {
            return None;
        }

        let particles_per_second = EMISSION_RATE_PER_SQUARE * self.radius / square_size;
        let interval = 1.0 / particles_per_second;
        self.next_threshold = self.accumulator + interval / 2.0 + (interval / 2.0) * rng.gen::<f32>();

        let offset = spawn_offset(self.shape, self.radius, rng);
        // Foam scale follows the waterfall's own dimensions: taller and wider
        // falls throw bigger spray.
        let size = (rng.gen::<f32>() * FOAM_SIZE_JITTER + FOAM_SIZE_BASE)
            * (self.height * FOAM_SIZE_HEIGHT_FACTOR + self.radius * FOAM_SIZE_RADIUS_FACTOR);
        let lifetime = rng.gen::<f32>() * FOAM_LIFETIME_JITTER + FOAM_LIFETIME_BASE;

        Some(FoamSpawn {
            offset,
            size,
            lifetime,
        })
    }

    /// Accumulated emission time, in seconds.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Accumulator value that triggers the next birth.
    pub fn next_threshold(&self) -> f32 {
        self.next_threshold
    }
}
