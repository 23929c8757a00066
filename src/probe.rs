//! Surface probe requests, results, and the in-flight handle.
//!
//! A probe is a directed query against world geometry that reports the
//! nearest surface below a hovering entity. The synchronous controller runs
//! its probe inline; the asynchronous controller issues a [`ProbeRequest`]
//! through the [`ProbeQueue`] and holds on to the returned [`PendingProbe`]
//! until the next tick.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;

/// Result of a surface probe.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbeCast {
    /// Whether the probe found a surface.
    pub hit: bool,
    /// Distance travelled from the probe origin to the surface (if hit).
    pub distance: f32,
    /// World position of the impact point.
    pub point: Vec3,
    /// Surface normal at the impact point, unit length.
    pub normal: Vec3,
    /// Entity owning the surface (if the backend knows it).
    pub entity: Option<Entity>,
}

impl ProbeCast {
    /// Create an empty (no surface found) result.
    pub fn miss() -> Self {
        Self::default()
    }

    /// Create a hit result.
    pub fn hit(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            hit: true,
            distance,
            normal,
            point,
            entity,
        }
    }
}

/// Parameters of one downward probe.
#[derive(Debug, Clone, Copy)]
pub struct ProbeRequest {
    /// World position the probe starts from.
    pub origin: Vec3,
    /// Direction the probe travels in.
    pub direction: Dir3,
    /// Maximum distance the probe may travel.
    pub max_distance: f32,
    /// Body to ignore, so a levitating body does not occlude the ground
    /// beneath itself.
    pub exclude: Option<Entity>,
}

/// Shared single-value slot between an issued probe and its handle.
type ProbeSlot = Arc<Mutex<Option<ProbeCast>>>;

/// Opaque handle to an in-flight, not-yet-collected probe.
///
/// At most one handle is live per controller. [`collect`](Self::collect)
/// yields the result at most once; afterwards the handle is spent. Assigning
/// a new handle over an old one forfeits the old probe's result: whatever
/// the backend later writes into the abandoned slot is never read. That
/// implicit drop is the only cancellation mechanism.
#[derive(Debug)]
pub struct PendingProbe {
    slot: ProbeSlot,
}

impl PendingProbe {
    /// Take the result if the probe has completed.
    ///
    /// Returns `None` both while the probe is still in flight and after the
    /// result has already been taken.
    pub fn collect(&mut self) -> Option<ProbeCast> {
        self.slot.lock().ok().and_then(|mut slot| slot.take())
    }

    /// Whether a result is waiting to be collected.
    pub fn is_ready(&self) -> bool {
        self.slot.lock().is_ok_and(|slot| slot.is_some())
    }
}

/// An issued probe awaiting service by the backend.
#[derive(Debug)]
pub struct QueuedProbe {
    request: ProbeRequest,
    slot: ProbeSlot,
}

impl QueuedProbe {
    /// The probe's parameters.
    pub fn request(&self) -> &ProbeRequest {
        &self.request
    }

    /// Deliver the result into the handle's slot.
    ///
    /// If the handle has been abandoned the result goes nowhere; that is the
    /// accepted fate of probes superseded by a newer issuance.
    pub fn fulfill(self, cast: ProbeCast) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(cast);
        }
    }
}

/// Issued probes waiting for the backend's probe service.
///
/// Backends must drain this every tick (in
/// [`HoverSet::ProbeService`](crate::HoverSet::ProbeService)), even if only to
/// discard the requests; results delivered through [`QueuedProbe::fulfill`]
/// become collectable on the following tick.
#[derive(Resource, Debug, Default)]
pub struct ProbeQueue {
    issued: Vec<QueuedProbe>,
}

impl ProbeQueue {
    /// Queue a probe and return the handle its result will arrive through.
    pub fn issue(&mut self, request: ProbeRequest) -> PendingProbe {
        let slot = ProbeSlot::default();
        self.issued.push(QueuedProbe {
            request,
            slot: Arc::clone(&slot),
        });
        PendingProbe { slot }
    }

    /// Take all probes issued since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<QueuedProbe> {
        std::mem::take(&mut self.issued)
    }

    /// Number of probes waiting for service.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Whether no probes are waiting for service.
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}
