//! Per-tick stepping for both controller variants.

use bevy::ecs::system::SystemState;
use bevy::prelude::*;

use crate::backend::HoverPhysicsBackend;
use crate::config::HoverConfig;
use crate::controller::{
    hover_force, AsyncHoverController, HoverController, DEBUG_POINT_SIZE, PROBE_DIRECTION,
};
use crate::probe::{ProbeQueue, ProbeRequest};

/// Probe-and-push step for synchronous controllers.
///
/// The probe runs to completion inside this system; its result is consumed in
/// the same tick and never stored. The force is applied mass-dependently, as
/// a raw force. Like the asynchronous step, the probe excludes the attached
/// body so it cannot occlude the surface beneath itself.
pub(crate) fn sync_hover_step<B: HoverPhysicsBackend>(
    world: &mut World,
    controllers: &mut SystemState<Query<(Entity, &HoverConfig, &HoverController)>>,
) {
    let steps: Vec<(Entity, Entity, HoverConfig)> = controllers
        .get(world)
        .iter()
        .filter_map(|(entity, config, controller)| {
            controller.body.map(|body| (entity, body, *config))
        })
        .collect();

    for (entity, body, config) in steps {
        let origin = B::world_position(world, entity);
        let request = ProbeRequest {
            origin,
            direction: PROBE_DIRECTION,
            max_distance: config.max_distance,
            exclude: Some(body),
        };

        let cast = B::probe_blocking(world, &request);
        if !cast.hit {
            continue;
        }

        let force = hover_force(origin, &cast, &config);
        B::apply_force(world, body, force, false);

        B::draw_debug_line(world, origin, cast.point);
        B::draw_debug_point(world, cast.point, DEBUG_POINT_SIZE);
    }
}

/// Collect-then-issue step for asynchronous controllers.
///
/// Phase one takes the handle issued on the previous tick and, if its result
/// has arrived, applies the force as an acceleration. Phase two always issues
/// a fresh probe from the current position; storing its handle forfeits
/// whatever the previous probe might still deliver. Neither phase waits: a
/// result that is not ready yet is simply skipped for this tick, and the
/// issuance below is the retry.
pub(crate) fn async_hover_step<B: HoverPhysicsBackend>(
    world: &mut World,
    controllers: &mut SystemState<Query<(Entity, &HoverConfig, &mut AsyncHoverController)>>,
) {
    let mut steps = Vec::new();
    {
        let mut query = controllers.get_mut(world);
        for (entity, config, mut controller) in query.iter_mut() {
            // Unattached controllers neither apply force nor issue probes.
            let Some(body) = controller.body else {
                continue;
            };
            steps.push((entity, body, *config, controller.pending.take()));
        }
    }

    for (entity, body, config, pending) in steps {
        let origin = B::world_position(world, entity);

        if let Some(mut pending) = pending {
            if let Some(cast) = pending.collect() {
                if cast.hit {
                    let force = hover_force(origin, &cast, &config);
                    B::apply_force(world, body, force, true);

                    let end = origin + PROBE_DIRECTION * config.max_distance;
                    B::draw_debug_line(world, origin, end);
                    B::draw_debug_point(world, cast.point, DEBUG_POINT_SIZE);
                }
            }
        }

        let request = ProbeRequest {
            origin,
            direction: PROBE_DIRECTION,
            max_distance: config.max_distance,
            exclude: Some(body),
        };
        let pending = world.resource_mut::<ProbeQueue>().issue(request);
        if let Some(mut controller) = world.get_mut::<AsyncHoverController>(entity) {
            controller.pending = Some(pending);
        }
    }
}
