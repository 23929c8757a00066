//! Hovering physics for Bevy.
//!
//! This crate makes an entity levitate by probing straight down every fixed
//! tick and pushing its rigid body away from whatever surface the probe
//! finds. The push falls off linearly with distance: full strength when the
//! surface touches the probe origin, nothing at the probe's maximum range.
//!
//! Two controller variants are provided:
//!
//! - [`HoverController`] probes *synchronously*: the spatial query runs
//!   inside the step and the force from it is applied in the same tick, as a
//!   raw (mass-dependent) force.
//! - [`AsyncHoverController`] keeps the spatial query off the step's critical
//!   path: each tick it first consumes the result of the probe issued on the
//!   previous tick, applies the force from that as a (mass-independent)
//!   acceleration, then issues a new probe whose result the *next* tick will
//!   consume. The hover force trails the body's position by one tick, which
//!   is imperceptible for a hover effect.
//!
//! A controller entity is parented to the body that should hover. All
//! engine-specific work (position lookup, spatial queries, force
//! application, damping) goes through a [`HoverPhysicsBackend`]; the
//! `avian3d` feature (on by default) ships a backend for Avian physics.
//!
//! ```no_run
//! use bevy::prelude::*;
//! use hover_controller::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(MinimalPlugins)
//!         .add_plugins(HoverControllerPlugin::<NoOpBackend>::default())
//!         .run();
//! }
//! ```

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod controller;
pub mod probe;

mod attachment;
mod systems;

#[cfg(feature = "avian3d")]
pub mod avian;

pub use attachment::{ATTACH_ANGULAR_DAMPING, ATTACH_LINEAR_DAMPING};
pub use backend::{HoverPhysicsBackend, NoOpBackend, NoOpBackendPlugin};
pub use config::HoverConfig;
pub use controller::{hover_force, AsyncHoverController, HoverController, PROBE_DIRECTION};
pub use probe::{PendingProbe, ProbeCast, ProbeQueue, ProbeRequest, QueuedProbe};

/// Commonly used types, re-exported.
pub mod prelude {
    #[cfg(feature = "avian3d")]
    pub use crate::avian::Avian3dBackend;
    pub use crate::{
        AsyncHoverController, HoverConfig, HoverController, HoverControllerPlugin,
        HoverPhysicsBackend, HoverSet, NoOpBackend, ProbeCast,
    };
}

/// System sets the hover systems run in, all within [`FixedUpdate`].
///
/// The sets are chained in declaration order. Probe service deliberately runs
/// last: results for probes issued in [`Step`](Self::Step) become visible to
/// the controllers no earlier than the following tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverSet {
    /// Attachment resolution and body (re)initialization.
    Attachment,
    /// Controller stepping: probing, force computation and application.
    Step,
    /// Backend servicing of asynchronously issued probes.
    ProbeService,
}

/// Plugin registering the hover controllers for physics backend `B`.
///
/// Adds the backend's own plugin as well, so this is the only plugin a host
/// needs:
///
/// ```no_run
/// use bevy::prelude::*;
/// use hover_controller::prelude::*;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(HoverControllerPlugin::<NoOpBackend>::default())
///     .run();
/// ```
pub struct HoverControllerPlugin<B: HoverPhysicsBackend>(PhantomData<B>);

impl<B: HoverPhysicsBackend> Default for HoverControllerPlugin<B> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<B: HoverPhysicsBackend> Plugin for HoverControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProbeQueue>();

        app.register_type::<HoverConfig>()
            .register_type::<HoverController>()
            .register_type::<AsyncHoverController>();

        app.configure_sets(
            FixedUpdate,
            (HoverSet::Attachment, HoverSet::Step, HoverSet::ProbeService).chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                attachment::bind_added_controllers::<B>,
                attachment::track_reattachment::<B>,
            )
                .in_set(HoverSet::Attachment),
        );

        app.add_systems(
            FixedUpdate,
            (systems::sync_hover_step::<B>, systems::async_hover_step::<B>)
                .in_set(HoverSet::Step),
        );

        app.add_plugins(B::plugin());
    }
}
