use shared::{
    domain::{TransferId, TransferStatus, Trip, TripId, TripStatus, WarehouseTransfer},
    error::ApiError,
};
use tracing::info;

use crate::transport::FleetBackend;

/// One action control offered to the operator for the current status.
///
/// The offered set IS the transition table: legality is enforced by only
/// rendering legal targets, never by rejecting requests client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionControl<S> {
    pub target: S,
    pub label: &'static str,
}

/// Requests trip status transitions against the backend. One per active trip.
pub struct TripLifecycle<'a> {
    backend: &'a dyn FleetBackend,
}

impl<'a> TripLifecycle<'a> {
    pub fn new(backend: &'a dyn FleetBackend) -> Self {
        Self { backend }
    }

    /// Controls to render for `current`, one per legal transition.
    pub fn offered_controls(current: TripStatus) -> Vec<TransitionControl<TripStatus>> {
        current
            .allowed_next()
            .iter()
            .map(|&target| TransitionControl {
                target,
                label: Self::control_label(current, target),
            })
            .collect()
    }

    fn control_label(current: TripStatus, target: TripStatus) -> &'static str {
        use TripStatus::*;
        match (current, target) {
            (Paused, Collecting) => "Resume collecting",
            (Paused, Delivering) => "Resume delivering",
            (_, Collecting) => "Start collecting",
            (_, Loaded) => "Mark loaded",
            (_, Delivering) => "Start delivering",
            (_, Delivered) => "Confirm delivery",
            (_, Paused) => "Pause",
            (_, Waiting) => "Reset to waiting",
        }
    }

    /// Issues a status-only update and returns the backend's view of the
    /// trip. No local state is touched beforehand; the caller refreshes from
    /// the backend afterwards so authoritative state wins.
    pub async fn request_transition(
        &self,
        trip_id: TripId,
        target: TripStatus,
    ) -> Result<Trip, ApiError> {
        info!(trip_id = trip_id.0, ?target, "trip: requesting transition");
        self.backend.update_trip_status(trip_id, target).await
    }
}

/// Requests warehouse-transfer status transitions. One per active transfer.
pub struct TransferLifecycle<'a> {
    backend: &'a dyn FleetBackend,
}

impl<'a> TransferLifecycle<'a> {
    pub fn new(backend: &'a dyn FleetBackend) -> Self {
        Self { backend }
    }

    pub fn offered_controls(current: TransferStatus) -> Vec<TransitionControl<TransferStatus>> {
        current
            .allowed_next()
            .iter()
            .map(|&target| TransitionControl {
                target,
                label: Self::control_label(target),
            })
            .collect()
    }

    fn control_label(target: TransferStatus) -> &'static str {
        use TransferStatus::*;
        match target {
            InTransit => "Start transfer",
            Completed => "Complete transfer",
            Pending => "Reset to pending",
            Cancelled => "Cancel transfer",
        }
    }

    pub async fn request_transition(
        &self,
        transfer_id: TransferId,
        target: TransferStatus,
    ) -> Result<WarehouseTransfer, ApiError> {
        info!(
            transfer_id = transfer_id.0,
            ?target,
            "transfer: requesting transition"
        );
        self.backend.update_transfer_status(transfer_id, target).await
    }
}
