//! Foam particle lifecycle.
//!
//! Foam particles are short-lived child entities of their emitter. They are
//! spawned from [`FoamBirth`] events, drift upward while shrinking, and are
//! despawned once their lifetime runs out. Nothing else in the crate may
//! assume a particle entity survives from one frame to the next.

use bevy::prelude::*;

use crate::config::constants::FOAM_RISE_SPEED;
use crate::config::WaterfallSettings;
use crate::update::FoamBirth;

/// One foam fragment.
#[derive(Component, Debug, Clone, Copy)]
pub struct FoamParticle {
    /// Seconds this particle has been alive.
    pub age: f32,
    /// Seconds after which the particle is removed.
    pub lifetime: f32,
    /// Base visual scale in world units.
    pub size: f32,
}

impl FoamParticle {
    /// Creates a newborn particle.
    pub fn new(size: f32, lifetime: f32) -> Self {
        Self {
            age: 0.0,
            lifetime,
            size,
        }
    }

    /// Ages the particle by `delta_secs`.
    pub fn advance(&mut self, delta_secs: f32) {
        self.age += delta_secs;
    }

    /// Whether the particle has outlived its lifetime.
    pub fn expired(&self) -> bool {
        self.age > self.lifetime
    }

    /// Current visual scale: the base size eroded toward zero as the
    /// particle approaches expiry, a CPU stand-in for the shader dissolve.
    pub fn scale(&self) -> f32 {
        let remaining = (1.0 - self.age / self.lifetime).clamp(0.0, 1.0);
        self.size * remaining.sqrt()
    }
}

/// Shared render handles for the foam particles of one emitter.
///
/// Every particle born from the emitter clones these handles, so a whole
/// waterfall's foam shares one mesh and one material.
#[derive(Component, Debug, Clone)]
pub struct FoamVisual {
    /// Unit sphere mesh, scaled per particle.
    pub mesh: Handle<Mesh>,
    /// Foam-colored translucent material.
    pub material: Handle<StandardMaterial>,
}

/// System that materializes queued foam births as particle entities.
///
/// Runs right after the frame updater. A birth whose emitter disappeared in
/// the meantime is dropped silently; the sweep will catch up with the
/// registry entry. An emitter already carrying `foam_capacity` live
/// particles skips the birth until older foam expires.
pub fn spawn_foam_particles(
    mut commands: Commands,
    mut births: EventReader<FoamBirth>,
    settings: Res<WaterfallSettings>,
    visuals: Query<&FoamVisual>,
    particles: Query<&ChildOf, With<FoamParticle>>,
) {
    // Spawns are deferred, so same-drain births are counted by hand.
    let mut born: Vec<Entity> = Vec::new();
    for birth in births.read() {
        let Ok(visual) = visuals.get(birth.emitter) else {
            continue;
        };
        let live = particles
            .iter()
            .filter(|child_of| child_of.parent() == birth.emitter)
            .count()
            + born.iter().filter(|emitter| **emitter == birth.emitter).count();
        if live >= settings.foam_capacity {
            continue;
        }
        born.push(birth.emitter);
        commands.spawn((
            FoamParticle::new(birth.size, birth.lifetime),
            Mesh3d(visual.mesh.clone()),
            MeshMaterial3d(visual.material.clone()),
            Transform::from_translation(birth.offset).with_scale(Vec3::splat(birth.size)),
            ChildOf(birth.emitter),
        ));
    }
}

/// System that ages, animates and prunes all live foam particles.
pub fn age_foam_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut particles: Query<(Entity, &mut FoamParticle, &mut Transform)>,
) {
    let delta = time.delta_secs();
    for (entity, mut particle, mut transform) in particles.iter_mut() {
        particle.advance(delta);
        if particle.expired() {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation.y += FOAM_RISE_SPEED * delta;
        transform.scale = Vec3::splat(particle.scale());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn test_capacity_caps_live_particles_per_emitter() {
        let mut world = World::new();
        world.init_resource::<Events<FoamBirth>>();
        world.insert_resource(WaterfallSettings {
            foam_capacity: 2,
            ..Default::default()
        });
        let emitter = world
            .spawn(FoamVisual {
                mesh: Handle::default(),
                material: Handle::default(),
            })
            .id();

        for _ in 0..3 {
            world.send_event(FoamBirth {
                emitter,
                offset: Vec3::ZERO,
                size: 0.3,
                lifetime: 0.6,
            });
        }
        world.run_system_once(spawn_foam_particles).unwrap();

        let live = world
            .query_filtered::<Entity, With<FoamParticle>>()
            .iter(&world)
            .count();
        assert_eq!(live, 2, "Births past the capacity must be skipped");

        // One particle expires; the freed slot takes a new birth again.
        let victim = world
            .query_filtered::<Entity, With<FoamParticle>>()
            .iter(&world)
            .next()
            .unwrap();
        world.entity_mut(victim).despawn();
        world.send_event(FoamBirth {
            emitter,
            offset: Vec3::ZERO,
            size: 0.3,
            lifetime: 0.6,
        });
        world.run_system_once(spawn_foam_particles).unwrap();

        let live = world
            .query_filtered::<Entity, With<FoamParticle>>()
            .iter(&world)
            .count();
        assert_eq!(live, 2, "Expired foam frees capacity for new births");
    }

    #[test]
    fn test_particle_expires_after_lifetime() {
        let mut particle = FoamParticle::new(0.3, 0.6);
        particle.advance(0.5);
        assert!(!particle.expired());
        particle.advance(0.2);
        assert!(particle.expired(), "Age {} > lifetime 0.6", particle.age);
    }

    #[test]
    fn test_scale_shrinks_with_age() {
        let mut particle = FoamParticle::new(0.3, 1.0);
        let fresh = particle.scale();
        particle.advance(0.9);
        let old = particle.scale();
        assert!(fresh > old, "Scale should erode with age: {fresh} vs {old}");
        particle.advance(0.2);
        assert_eq!(particle.scale(), 0.0, "Expired particles scale to zero");
    }
}
