//! Hover controller components and the shared force formula.

use bevy::prelude::*;

use crate::config::HoverConfig;
use crate::probe::{PendingProbe, ProbeCast};

/// Direction all hover probes travel in.
pub const PROBE_DIRECTION: Dir3 = Dir3::NEG_Y;

/// Size of the debug marker drawn at a probe's impact point.
pub(crate) const DEBUG_POINT_SIZE: f32 = 16.0;

/// Synchronous hover controller.
///
/// Every tick this variant runs a blocking downward probe from its own world
/// position and, on a hit, immediately applies the resulting force to the
/// attached body as a *raw force*: heavier bodies accelerate less. The parent
/// body is resolved once, when the component is added; reparenting afterwards
/// is not picked up (use [`AsyncHoverController`] for that).
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
#[require(HoverConfig = HoverConfig::raw_force())]
pub struct HoverController {
    pub(crate) body: Option<Entity>,
}

impl HoverController {
    /// The body currently receiving force, if any.
    pub fn attached_body(&self) -> Option<Entity> {
        self.body
    }
}

/// Asynchronous hover controller.
///
/// Instead of probing inline, this variant collects the result of the probe
/// it issued on the *previous* tick, applies the force from that, then issues
/// a fresh probe for the next tick. The probe therefore never blocks the
/// stepping systems, at the cost of a constant one-tick latency in the force.
///
/// Unlike [`HoverController`], the force is applied as an *acceleration*, so
/// scaling the hovering body's mass does not change how it hovers. The parent
/// body is re-resolved and re-initialized whenever the controller is
/// reparented.
#[derive(Component, Reflect, Debug, Default)]
#[reflect(Component)]
#[require(HoverConfig)]
pub struct AsyncHoverController {
    pub(crate) body: Option<Entity>,
    #[reflect(ignore)]
    pub(crate) pending: Option<PendingProbe>,
}

impl AsyncHoverController {
    /// The body currently receiving force, if any.
    pub fn attached_body(&self) -> Option<Entity> {
        self.body
    }

    /// Whether a probe issued on an earlier tick is still outstanding.
    pub fn has_pending_probe(&self) -> bool {
        self.pending.is_some()
    }
}

/// Repulsive force pushing a body at `origin` away from a probed surface.
///
/// The magnitude falls off linearly from `config.max_force` at zero distance
/// to zero at `config.max_distance`, directed along the surface normal.
pub fn hover_force(origin: Vec3, cast: &ProbeCast, config: &HoverConfig) -> Vec3 {
    let distance = (origin - cast.point).length();
    let ratio = (distance / config.max_distance).clamp(0.0, 1.0);
    (1.0 - ratio) * config.max_force * cast.normal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast_at_distance(origin: Vec3, distance: f32) -> ProbeCast {
        ProbeCast::hit(distance, Vec3::Y, origin - Vec3::Y * distance, None)
    }

    #[test]
    fn force_is_max_at_zero_distance() {
        let config = HoverConfig::default();
        let origin = Vec3::new(3.0, 7.0, -2.0);
        let force = hover_force(origin, &cast_at_distance(origin, 0.0), &config);
        assert_eq!(force, Vec3::Y * config.max_force);
    }

    #[test]
    fn force_is_zero_at_and_beyond_max_distance() {
        let config = HoverConfig::default();
        let origin = Vec3::ZERO;
        let at_max = hover_force(origin, &cast_at_distance(origin, config.max_distance), &config);
        assert_eq!(at_max, Vec3::ZERO);

        let beyond = hover_force(
            origin,
            &cast_at_distance(origin, config.max_distance * 1.5),
            &config,
        );
        assert_eq!(beyond, Vec3::ZERO);
    }

    #[test]
    fn force_falloff_is_monotonic() {
        let config = HoverConfig::default();
        let origin = Vec3::ZERO;
        let mut previous = f32::INFINITY;
        for step in 0..=20 {
            let distance = config.max_distance * step as f32 / 20.0;
            let magnitude = hover_force(origin, &cast_at_distance(origin, distance), &config).length();
            assert!(
                magnitude <= previous,
                "force grew between distances: {magnitude} > {previous} at d={distance}"
            );
            previous = magnitude;
        }
    }

    #[test]
    fn force_points_along_surface_normal() {
        let config = HoverConfig {
            max_force: 10_000.0,
            max_distance: 200.0,
        };
        let origin = Vec3::new(0.0, 0.0, 100.0);
        let cast = ProbeCast::hit(100.0, Vec3::Z, Vec3::ZERO, None);
        let force = hover_force(origin, &cast, &config);
        assert!((force - Vec3::new(0.0, 0.0, 5_000.0)).length() < 1e-3);
    }
}
