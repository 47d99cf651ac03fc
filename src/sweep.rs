//! Liveness sweep for orphaned effect entries.
//!
//! Host objects can be destroyed by game logic that knows nothing about
//! waterfalls, so the registry periodically checks every entry against the
//! scene graph and drops those whose entity is no longer attached. This is
//! the only reclamation path; nothing ever unregisters explicitly.

use bevy::prelude::*;

use crate::config::constants::SWEEP_INTERVAL_SECS;
use crate::registry::EffectRegistry;

/// Timer for periodic registry sweeps.
#[derive(Resource)]
pub struct SweepTimer(pub Timer);

impl Default for SweepTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(SWEEP_INTERVAL_SECS, TimerMode::Repeating))
    }
}

/// System that evicts registry entries whose scene node was detached.
///
/// An entry is live while its effect entity still has a parent and that
/// parent itself still exists; despawning a host tears down its children, so
/// both conditions fail once the host is gone. Eviction uses an
/// order-preserving retain, so survivors keep their registration order and
/// no entry is skipped or visited twice.
pub fn sweep_orphaned_effects(
    time: Res<Time>,
    mut timer: ResMut<SweepTimer>,
    mut registry: ResMut<EffectRegistry>,
    parents: Query<&ChildOf>,
    live: Query<Entity>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    let attached = |entity: Entity| match parents.get(entity) {
        Ok(child_of) => live.contains(child_of.parent()),
        Err(_) => false,
    };

    let before = registry.surface_count() + registry.emitter_count();
    registry.retain_surfaces(|entry| attached(entry.surface));
    registry.retain_emitters(|entry| attached(entry.emitter));
    let swept = before - (registry.surface_count() + registry.emitter_count());

    if swept > 0 {
        debug!("Swept {} orphaned waterfall entries", swept);
    }
}
