//! Waterfall effect configuration.
//!
//! Tunable parameters live in two places: compile-time constants for the
//! emission and foam formulas (these define the effect's look and should not
//! change at runtime), and a [`WaterfallSettings`] resource for the values
//! the host game supplies, such as the world scale of one map square.

use bevy::prelude::*;

/// Compile-time waterfall effect constants.
pub mod constants {
    /// Foam particles emitted per second, per map square of emitter radius.
    ///
    /// A waterfall spanning more squares churns out proportionally more foam.
    pub const EMISSION_RATE_PER_SQUARE: f32 = 50.0;

    /// Upward drift speed of a foam particle (world units per second).
    pub const FOAM_RISE_SPEED: f32 = 0.25;

    /// Guaranteed fraction of the foam scale; the rest is random jitter.
    ///
    /// A newborn particle's scale is
    /// `(rand * FOAM_SIZE_JITTER + FOAM_SIZE_BASE)` times the waterfall's
    /// base foam scale, `height * FOAM_SIZE_HEIGHT_FACTOR +
    /// radius * FOAM_SIZE_RADIUS_FACTOR`.
    pub const FOAM_SIZE_BASE: f32 = 0.5;

    /// Random span added on top of [`FOAM_SIZE_BASE`].
    pub const FOAM_SIZE_JITTER: f32 = 0.25;

    /// Contribution of the waterfall height to the base foam scale.
    pub const FOAM_SIZE_HEIGHT_FACTOR: f32 = 0.05;

    /// Contribution of the waterfall radius to the base foam scale.
    pub const FOAM_SIZE_RADIUS_FACTOR: f32 = 0.1;

    /// Minimum foam particle lifetime (seconds).
    pub const FOAM_LIFETIME_BASE: f32 = 0.5;

    /// Random span added on top of [`FOAM_LIFETIME_BASE`] (seconds).
    pub const FOAM_LIFETIME_JITTER: f32 = 0.2;

    /// Vertical overscale applied to the falling-water mesh so it visually
    /// overlaps the terrain at both ends.
    pub const MESH_HEIGHT_SCALE: f32 = 1.1;

    /// Interval between liveness sweeps of the effect registry (seconds).
    pub const SWEEP_INTERVAL_SECS: f32 = 1.0;
}

/// Runtime waterfall configuration resource.
///
/// The host game overrides `square_size` to match its own world scale before
/// any waterfall is created; the default matches a 16-unit map square.
#[derive(Resource, Clone, Debug, Reflect)]
#[reflect(Resource)]
pub struct WaterfallSettings {
    /// World units per map square. Waterfall dimensions are given in squares
    /// and converted to world units with this factor; it also normalizes the
    /// foam emission rate.
    pub square_size: f32,
    /// Upper bound on live foam particles per emitter. Births past the cap
    /// are skipped until older particles expire.
    pub foam_capacity: usize,
}

impl Default for WaterfallSettings {
    fn default() -> Self {
        Self {
            square_size: 16.0,
            foam_capacity: 250,
        }
    }
}
