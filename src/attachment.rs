//! Attachment resolution and body initialization.
//!
//! A hover controller sits on its own entity, parented (via [`ChildOf`]) to
//! the entity that should levitate. These systems resolve that parent into a
//! force-receivable rigid body and prepare it for hovering. The synchronous
//! controller binds once when it is added; the asynchronous controller also
//! follows reparenting, re-running the same initialization each time.

use bevy::ecs::system::SystemState;
use bevy::log::debug;
use bevy::prelude::*;

use crate::backend::HoverPhysicsBackend;
use crate::controller::{AsyncHoverController, HoverController};

/// Linear damping forced onto a body when a controller attaches to it.
pub const ATTACH_LINEAR_DAMPING: f32 = 2.0;

/// Angular damping forced onto a body when a controller attaches to it.
pub const ATTACH_ANGULAR_DAMPING: f32 = 2.0;

/// Resolve `parent` into a rigid body and prepare it for hovering.
///
/// Runs on every (re)attachment, including repeated attachments to the same
/// parent: simulation is enabled and both damping coefficients are reset to
/// the fixed defaults, overwriting whatever the host had set on the body.
fn resolve_and_initialize<B: HoverPhysicsBackend>(
    world: &mut World,
    parent: Option<Entity>,
) -> Option<Entity> {
    let body = parent.and_then(|candidate| B::resolve_body(world, candidate));
    match body {
        Some(body) => {
            B::set_simulation_enabled(world, body, true);
            B::set_linear_damping(world, body, ATTACH_LINEAR_DAMPING);
            B::set_angular_damping(world, body, ATTACH_ANGULAR_DAMPING);
            debug!("hover controller attached to body {body}");
        }
        None => debug!("hover controller parent is not force-receivable"),
    }
    body
}

/// Bind newly added synchronous controllers to their parent body.
pub(crate) fn bind_added_controllers<B: HoverPhysicsBackend>(
    world: &mut World,
    added: &mut SystemState<Query<(Entity, Option<&ChildOf>), Added<HoverController>>>,
) {
    let controllers: Vec<(Entity, Option<Entity>)> = added
        .get(world)
        .iter()
        .map(|(entity, child_of)| (entity, child_of.map(ChildOf::parent)))
        .collect();

    for (entity, parent) in controllers {
        let body = resolve_and_initialize::<B>(world, parent);
        if let Some(mut controller) = world.get_mut::<HoverController>(entity) {
            controller.body = body;
        }
    }
}

/// Follow attachment changes for asynchronous controllers.
///
/// Fires for newly added controllers, for reparented ones, and for ones whose
/// parent link was removed. Resolution failure clears the attachment; the
/// controller then steps as a silent no-op until a valid reattachment.
///
/// Every attachment change also discards the outstanding probe handle: a
/// result issued under the old attachment is stale and must never turn into
/// force under the new one.
pub(crate) fn track_reattachment<B: HoverPhysicsBackend>(
    world: &mut World,
    state: &mut SystemState<(
        Query<
            (Entity, Option<&ChildOf>),
            (
                With<AsyncHoverController>,
                Or<(Added<AsyncHoverController>, Changed<ChildOf>)>,
            ),
        >,
        RemovedComponents<ChildOf>,
    )>,
) {
    let (changed, mut removals) = state.get_mut(world);

    let mut reattached: Vec<(Entity, Option<Entity>)> = changed
        .iter()
        .map(|(entity, child_of)| (entity, child_of.map(ChildOf::parent)))
        .collect();

    let detached: Vec<Entity> = removals.read().collect();
    for entity in detached {
        let still_parentless = world
            .get_entity(entity)
            .is_ok_and(|e| e.contains::<AsyncHoverController>() && !e.contains::<ChildOf>());
        if still_parentless && !reattached.iter().any(|(e, _)| *e == entity) {
            reattached.push((entity, None));
        }
    }

    for (entity, parent) in reattached {
        let body = resolve_and_initialize::<B>(world, parent);
        if let Some(mut controller) = world.get_mut::<AsyncHoverController>(entity) {
            controller.body = body;
            controller.pending = None;
        }
    }
}
