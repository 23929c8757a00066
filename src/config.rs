//! Configuration for the hover force.

use bevy::prelude::*;

/// Tunables for a hovering entity.
///
/// The force falls off linearly with the distance to the detected surface:
/// it equals [`max_force`](Self::max_force) when the surface is touching the
/// probe origin and reaches zero at [`max_distance`](Self::max_distance).
///
/// The controller only reads this component. Hosts and editors may change the
/// values between ticks; the next step picks them up.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct HoverConfig {
    /// Force magnitude applied at zero distance. Must be positive.
    pub max_force: f32,

    /// Probe length and falloff range in world units. Must be positive.
    pub max_distance: f32,
}

impl HoverConfig {
    /// Default force magnitude at zero distance.
    pub const DEFAULT_MAX_FORCE: f32 = 10_000.0;

    /// Default probe length.
    pub const DEFAULT_MAX_DISTANCE: f32 = 200.0;

    /// Mass of the sphere body the raw-force default was tuned against.
    ///
    /// [`HoverController`](crate::HoverController) applies its force
    /// mass-dependently, so the default only lifts a body of roughly this
    /// mass. The constant is a default-value artifact, not something the
    /// step logic consults.
    pub const REFERENCE_BODY_MASS: f32 = 109.456_337;

    /// Defaults for the synchronous, raw-force controller.
    ///
    /// The force default is pre-scaled by [`Self::REFERENCE_BODY_MASS`] so
    /// that the mass-dependent force application behaves like the
    /// mass-independent one does for the reference body.
    pub fn raw_force() -> Self {
        Self {
            max_force: Self::DEFAULT_MAX_FORCE * Self::REFERENCE_BODY_MASS,
            ..Self::default()
        }
    }
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            max_force: Self::DEFAULT_MAX_FORCE,
            max_distance: Self::DEFAULT_MAX_DISTANCE,
        }
    }
}
