//! Backend for hosts without a physics engine.

use bevy::prelude::*;

use crate::backend::HoverPhysicsBackend;
use crate::probe::{ProbeCast, ProbeQueue, ProbeRequest};
use crate::HoverSet;

/// Backend that reports no surfaces and applies nothing.
///
/// Useful for headless hosts and for wiring up the plugin before a real
/// physics backend is available. Probes always miss, force application and
/// body initialization are no-ops, and every entity resolves as a body so
/// the attachment flow can still be exercised.
pub struct NoOpBackend;

impl HoverPhysicsBackend for NoOpBackend {
    fn plugin() -> impl Plugin {
        NoOpBackendPlugin
    }

    fn world_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<GlobalTransform>(entity)
            .map(|transform| transform.translation())
            .or_else(|| world.get::<Transform>(entity).map(|t| t.translation))
            .unwrap_or(Vec3::ZERO)
    }

    fn resolve_body(_world: &World, candidate: Entity) -> Option<Entity> {
        Some(candidate)
    }

    fn probe_blocking(_world: &mut World, _request: &ProbeRequest) -> ProbeCast {
        ProbeCast::miss()
    }

    fn apply_force(_world: &mut World, _body: Entity, _force: Vec3, _as_acceleration: bool) {}

    fn set_simulation_enabled(_world: &mut World, _body: Entity, _enabled: bool) {}

    fn set_linear_damping(_world: &mut World, _body: Entity, _damping: f32) {}

    fn set_angular_damping(_world: &mut World, _body: Entity, _damping: f32) {}
}

/// Plugin for [`NoOpBackend`].
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, app: &mut App) {
        // Issued probes still have to be drained so the queue stays bounded;
        // dropping them unanswered leaves the handles permanently pending,
        // which the controllers treat as "no surface".
        app.add_systems(
            FixedUpdate,
            discard_issued_probes.in_set(HoverSet::ProbeService),
        );
    }
}

fn discard_issued_probes(mut queue: ResMut<ProbeQueue>) {
    queue.drain();
}
