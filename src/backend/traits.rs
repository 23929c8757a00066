//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement for the
//! hover controllers to work. The controllers themselves only decide *when*
//! to probe and how much force a hit is worth; everything that touches actual
//! physics state (positions, rigid bodies, spatial queries, debug drawing)
//! goes through a backend.

use bevy::prelude::*;

use crate::probe::{ProbeCast, ProbeRequest};

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the hover
/// controllers. For an example implementation see the `avian` module's
/// `Avian3dBackend` (feature `avian3d`).
///
/// Backends are also responsible for servicing asynchronously issued probes:
/// the plugin returned from [`plugin`](Self::plugin) must register a system in
/// [`HoverSet::ProbeService`](crate::HoverSet) that drains the
/// [`ProbeQueue`](crate::probe::ProbeQueue) every tick and fulfills the
/// queued probes it can answer.
pub trait HoverPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Current world-space position of an entity.
    fn world_position(world: &World, entity: Entity) -> Vec3;

    /// Capability query: can `candidate` receive forces and damping?
    ///
    /// Returns the rigid body to apply forces to, or `None` if the candidate
    /// is not force-receivable. The controllers treat `None` as a legal,
    /// silent unattached state.
    fn resolve_body(world: &World, candidate: Entity) -> Option<Entity>;

    /// Run a probe to completion on the calling thread.
    fn probe_blocking(world: &mut World, request: &ProbeRequest) -> ProbeCast;

    /// Apply a continuous force to a rigid body for this tick.
    ///
    /// With `as_acceleration` set, the applied quantity is interpreted as an
    /// acceleration: the body's mass must not influence the resulting change
    /// in velocity.
    fn apply_force(world: &mut World, body: Entity, force: Vec3, as_acceleration: bool);

    /// Enable or disable physical simulation of a body.
    fn set_simulation_enabled(world: &mut World, body: Entity, enabled: bool);

    /// Set a body's linear damping coefficient.
    fn set_linear_damping(world: &mut World, body: Entity, damping: f32);

    /// Set a body's angular damping coefficient.
    fn set_angular_damping(world: &mut World, body: Entity, damping: f32);

    /// Draw a debug line in world space. Backends without a visualization
    /// facility can keep the default no-op.
    fn draw_debug_line(_world: &mut World, _start: Vec3, _end: Vec3) {}

    /// Draw a debug marker at a world-space point.
    fn draw_debug_point(_world: &mut World, _point: Vec3, _size: f32) {}
}
