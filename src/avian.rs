//! Avian 3D physics backend implementation.
//!
//! This module provides the physics backend for Avian (`avian3d`). Enable
//! with the `avian3d` feature (on by default).

use avian3d::prelude::*;
use bevy::color::palettes::css::RED;
use bevy::ecs::system::SystemState;
use bevy::gizmos::config::GizmoConfigStore;
use bevy::prelude::*;

use crate::backend::HoverPhysicsBackend;
use crate::probe::{ProbeCast, ProbeQueue, ProbeRequest};
use crate::HoverSet;

/// Avian 3D backend for the hover controllers.
///
/// Probes are ray casts through Avian's `SpatialQuery`, excluding the
/// hovering body itself so it cannot occlude the ground beneath it. Forces
/// are integrated into `LinearVelocity` over the fixed timestep, scaled by
/// the body's computed mass unless applied as an acceleration.
pub struct Avian3dBackend;

impl HoverPhysicsBackend for Avian3dBackend {
    fn plugin() -> impl Plugin {
        Avian3dBackendPlugin
    }

    fn world_position(world: &World, entity: Entity) -> Vec3 {
        // Prefer Avian's Position, then fall back to the transforms. Hover
        // controller entities are plain scene children, so they usually only
        // carry transforms.
        world
            .get::<Position>(entity)
            .map(|position| position.0)
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|transform| transform.translation())
            })
            .or_else(|| {
                world
                    .get::<Transform>(entity)
                    .map(|transform| transform.translation)
            })
            .unwrap_or(Vec3::ZERO)
    }

    fn resolve_body(world: &World, candidate: Entity) -> Option<Entity> {
        // Anything with a rigid body can receive forces once simulation is
        // enabled on it.
        world
            .get::<RigidBody>(candidate)
            .is_some()
            .then_some(candidate)
    }

    fn probe_blocking(world: &mut World, request: &ProbeRequest) -> ProbeCast {
        let mut state: SystemState<SpatialQuery> = SystemState::new(world);
        let spatial_query = state.get_mut(world);
        cast_probe(&spatial_query, request)
    }

    fn apply_force(world: &mut World, body: Entity, force: Vec3, as_acceleration: bool) {
        let delta = fixed_timestep(world);

        let acceleration = if as_acceleration {
            force
        } else {
            let mass = body_mass(world, body);
            if mass <= 0.0 {
                return;
            }
            force / mass
        };

        if let Some(mut velocity) = world.get_mut::<LinearVelocity>(body) {
            velocity.0 += acceleration * delta;
        }
    }

    fn set_simulation_enabled(world: &mut World, body: Entity, enabled: bool) {
        if let Ok(mut entity) = world.get_entity_mut(body) {
            if enabled {
                entity.insert(RigidBody::Dynamic);
            } else {
                entity.insert(RigidBody::Static);
            }
        }
    }

    fn set_linear_damping(world: &mut World, body: Entity, damping: f32) {
        if let Ok(mut entity) = world.get_entity_mut(body) {
            entity.insert(LinearDamping(damping));
        }
    }

    fn set_angular_damping(world: &mut World, body: Entity, damping: f32) {
        if let Ok(mut entity) = world.get_entity_mut(body) {
            entity.insert(AngularDamping(damping));
        }
    }

    fn draw_debug_line(world: &mut World, start: Vec3, end: Vec3) {
        if !world.contains_resource::<GizmoConfigStore>() {
            return;
        }
        let mut state: SystemState<Gizmos> = SystemState::new(world);
        let mut gizmos = state.get_mut(world);
        gizmos.line(start, end, RED);
        state.apply(world);
    }

    fn draw_debug_point(world: &mut World, point: Vec3, size: f32) {
        if !world.contains_resource::<GizmoConfigStore>() {
            return;
        }
        let mut state: SystemState<Gizmos> = SystemState::new(world);
        let mut gizmos = state.get_mut(world);
        gizmos.sphere(point, size / 2.0, RED);
        state.apply(world);
    }
}

/// Plugin that sets up Avian-specific systems for the hover controllers.
pub struct Avian3dBackendPlugin;

impl Plugin for Avian3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            service_probe_queue.in_set(HoverSet::ProbeService),
        );
    }
}

/// Answer all probes issued this tick.
///
/// Runs after the controllers have stepped, so the results become visible to
/// them on the next tick at the earliest.
fn service_probe_queue(spatial_query: SpatialQuery, mut queue: ResMut<ProbeQueue>) {
    for issued in queue.drain() {
        let cast = cast_probe(&spatial_query, issued.request());
        issued.fulfill(cast);
    }
}

/// Perform a single ray cast for a probe request.
fn cast_probe(spatial_query: &SpatialQuery, request: &ProbeRequest) -> ProbeCast {
    let filter = match request.exclude {
        Some(excluded) => SpatialQueryFilter::default().with_excluded_entities([excluded]),
        None => SpatialQueryFilter::default(),
    };

    spatial_query
        .cast_ray(
            request.origin,
            request.direction,
            request.max_distance,
            true,
            &filter,
        )
        .map(|hit| {
            let point = request.origin + request.direction * hit.distance;
            ProbeCast::hit(hit.distance, hit.normal, point, Some(hit.entity))
        })
        .unwrap_or_else(ProbeCast::miss)
}

/// Mass of a body for force scaling, or 0.0 if it has no usable mass.
fn body_mass(world: &World, body: Entity) -> f32 {
    let Some(computed_mass) = world.get::<ComputedMass>(body) else {
        return 0.0;
    };
    let mass = computed_mass.value();
    if mass <= 0.0 || !mass.is_finite() {
        return 0.0;
    }
    mass
}

/// The fixed timestep forces are integrated over.
fn fixed_timestep(world: &World) -> f32 {
    world
        .get_resource::<Time<Fixed>>()
        .map(|time| time.delta_secs())
        .filter(|&delta| delta > 0.0)
        .unwrap_or(1.0 / 60.0)
}
