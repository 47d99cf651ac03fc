//! Animated waterfall effects for tile-based 3D worlds.
//!
//! A waterfall is a shaded falling-water surface plus an optional foam
//! particle emitter, both attached to a host entity and driven by the shared
//! game clock. Add [`WaterfallPlugin`] to the app, point [`ActiveMap`] at
//! the loaded map's root entity, and create effects by sending
//! [`CreateWaterfall`] events.
//!
//! Effects are tracked in a per-map [`EffectRegistry`]; when a host object
//! is destroyed by unrelated game logic, a periodic liveness sweep notices
//! the detached scene node and quietly stops tracking it. There is no
//! explicit destroy call.

pub mod commands;
pub mod config;
pub mod emitter;
pub mod material;
pub mod particle;
pub mod plugin;
pub mod registry;
pub mod shape;
pub mod spawn;
pub mod surface;
pub mod sweep;
pub mod update;

pub use commands::{CreateWaterfall, SetWaterfallOpacity};
pub use config::WaterfallSettings;
pub use material::WaterfallMaterial;
pub use plugin::WaterfallPlugin;
pub use registry::{ActiveMap, EffectRegistry};
pub use shape::WaterfallShape;
pub use surface::{WaterfallParams, WaterfallSurface};
