use std::{sync::Arc, time::Instant};

use anyhow::{anyhow, Result};
use shared::domain::{
    Location, Session, TransferId, TransferStatus, Trip, TripId, TripStatus, Truck, TruckStatus,
    UserId, WarehouseId, WarehouseTransfer,
};
use shared::protocol::UpdateTruckStatusRequest;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod feedback;
pub mod lifecycle;
pub mod suggestions;
pub mod transport;

pub use feedback::{FeedbackBoard, FeedbackKind, FeedbackMessage, FEEDBACK_TTL};
pub use lifecycle::{TransferLifecycle, TransitionControl, TripLifecycle};
pub use suggestions::{
    Decision, SuggestionBoard, SuggestionError, TransferAction, TransferGroup,
};
pub use transport::{FleetBackend, HttpFleetBackend};

/// Events for the presentation layer. The UI re-reads `snapshot()` on
/// `ContextUpdated` rather than carrying payloads here.
#[derive(Debug, Clone)]
pub enum FleetEvent {
    ContextUpdated,
    Feedback { kind: FeedbackKind, text: String },
    FeedbackExpired,
}

/// Warehouse names for the active transfer's route, resolved by a secondary
/// enrichment fetch that degrades to a placeholder on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRouteNames {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, Default)]
struct FleetActivityState {
    truck: Option<Truck>,
    active_trip: Option<Trip>,
    active_transfer: Option<WarehouseTransfer>,
    transfer_route: Option<TransferRouteNames>,
    busy: bool,
    feedback: FeedbackBoard,
}

/// Point-in-time view of the driver's activity for rendering.
#[derive(Debug, Clone)]
pub struct ActivitySnapshot {
    pub truck: Option<Truck>,
    pub active_trip: Option<Trip>,
    pub active_transfer: Option<WarehouseTransfer>,
    pub transfer_route: Option<TransferRouteNames>,
    pub busy: bool,
    pub feedback: Vec<FeedbackMessage>,
}

/// Single source of truth for "what is this driver doing right now".
///
/// Owns the backend cache of truck, active trip and active transfer for one
/// driver session, and turns every user action into a mutate → refresh →
/// feedback cycle. The backend's state always wins: nothing here is updated
/// optimistically, every mutation is followed by a refetch.
pub struct FleetActivityClient {
    backend: Arc<dyn FleetBackend>,
    session: Session,
    inner: Mutex<FleetActivityState>,
    events: broadcast::Sender<FleetEvent>,
}

impl FleetActivityClient {
    pub fn new(backend: Arc<dyn FleetBackend>, session: Session) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            backend,
            session,
            inner: Mutex::new(FleetActivityState::default()),
            events,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FleetEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ActivitySnapshot {
        let now = Instant::now();
        let guard = self.inner.lock().await;
        ActivitySnapshot {
            truck: guard.truck.clone(),
            active_trip: guard.active_trip.clone(),
            active_transfer: guard.active_transfer.clone(),
            transfer_route: guard.transfer_route.clone(),
            busy: guard.busy,
            feedback: guard.feedback.visible(now).into_iter().cloned().collect(),
        }
    }

    /// Advisory only: the UI disables controls while a mutation is in
    /// flight, but nothing serializes competing callers.
    pub async fn is_busy(&self) -> bool {
        self.inner.lock().await.busy
    }

    /// Fetches the driver's truck, then its candidate trips and transfers
    /// concurrently, and selects the active ones. A driver without a truck
    /// yields an empty, error-free context.
    pub async fn load_driver_context(&self) -> Result<()> {
        let driver_id = self.session.user_id;
        let trucks = self.backend.trucks_by_driver(driver_id).await?;

        // Drivers own at most one truck in current usage.
        let Some(truck) = trucks.into_iter().next() else {
            info!(driver_id = driver_id.0, "fleet: driver has no truck, clearing context");
            let mut guard = self.inner.lock().await;
            guard.truck = None;
            guard.active_trip = None;
            guard.active_transfer = None;
            guard.transfer_route = None;
            drop(guard);
            self.emit(FleetEvent::ContextUpdated);
            return Ok(());
        };

        let truck_id = truck.truck_id;
        let (trips, transfers) = tokio::join!(
            self.backend.trips_by_truck(truck_id),
            self.backend.transfers_by_truck(truck_id),
        );

        let active_trip = trips?.into_iter().find(|t| t.status.is_active());
        let active_transfer = transfers?.into_iter().find(|t| t.status.is_active());
        let transfer_route = match &active_transfer {
            Some(transfer) => Some(self.resolve_route_names(transfer).await),
            None => None,
        };

        info!(
            driver_id = driver_id.0,
            truck_id = truck_id.0,
            has_active_trip = active_trip.is_some(),
            has_active_transfer = active_transfer.is_some(),
            "fleet: driver context loaded"
        );

        {
            let mut guard = self.inner.lock().await;
            guard.truck = Some(truck);
            guard.active_trip = active_trip;
            guard.active_transfer = active_transfer;
            guard.transfer_route = transfer_route;
        }
        self.emit(FleetEvent::ContextUpdated);
        Ok(())
    }

    /// Requests a trip transition, then refreshes only the trip portion of
    /// the context.
    pub async fn update_trip_status(&self, trip_id: TripId, target: TripStatus) -> Result<()> {
        self.run_mutation("Trip status updated", async {
            TripLifecycle::new(self.backend.as_ref())
                .request_transition(trip_id, target)
                .await?;
            self.refresh_active_trip().await
        })
        .await
    }

    pub async fn update_transfer_status(
        &self,
        transfer_id: TransferId,
        target: TransferStatus,
    ) -> Result<()> {
        self.run_mutation("Transfer status updated", async {
            TransferLifecycle::new(self.backend.as_ref())
                .request_transition(transfer_id, target)
                .await?;
            self.refresh_active_transfer().await
        })
        .await
    }

    /// Updates the truck's operational status, re-sending the current
    /// location unchanged so the combined PATCH does not clobber it.
    pub async fn update_truck_status(&self, status: TruckStatus) -> Result<()> {
        let truck = self.require_truck().await?;
        self.run_mutation("Truck status updated", async {
            self.backend
                .update_truck_status(
                    truck.truck_id,
                    UpdateTruckStatusRequest {
                        status,
                        current_location: truck.current_location.clone(),
                    },
                )
                .await?;
            self.load_driver_context().await
        })
        .await
    }

    /// Counterpart of `update_truck_status`: new location, status re-sent
    /// unchanged.
    pub async fn update_truck_location(&self, location: Location) -> Result<()> {
        let truck = self.require_truck().await?;
        self.run_mutation("Truck location updated", async {
            self.backend
                .update_truck_status(
                    truck.truck_id,
                    UpdateTruckStatusRequest {
                        status: truck.status,
                        current_location: Some(location),
                    },
                )
                .await?;
            self.load_driver_context().await
        })
        .await
    }

    /// Re-runs the trip-only portion of the context fetch.
    pub async fn refresh_active_trip(&self) -> Result<()> {
        let truck_id = self.require_truck().await?.truck_id;
        let trips = self.backend.trips_by_truck(truck_id).await?;
        {
            let mut guard = self.inner.lock().await;
            guard.active_trip = trips.into_iter().find(|t| t.status.is_active());
        }
        self.emit(FleetEvent::ContextUpdated);
        Ok(())
    }

    /// Re-runs the transfer-only portion of the context fetch, including the
    /// route-name enrichment.
    pub async fn refresh_active_transfer(&self) -> Result<()> {
        let truck_id = self.require_truck().await?.truck_id;
        let transfers = self.backend.transfers_by_truck(truck_id).await?;
        let active_transfer = transfers.into_iter().find(|t| t.status.is_active());
        let transfer_route = match &active_transfer {
            Some(transfer) => Some(self.resolve_route_names(transfer).await),
            None => None,
        };
        {
            let mut guard = self.inner.lock().await;
            guard.active_transfer = active_transfer;
            guard.transfer_route = transfer_route;
        }
        self.emit(FleetEvent::ContextUpdated);
        Ok(())
    }

    /// Drops expired feedback messages. The caller owns the tick cadence;
    /// the client holds no timer of its own.
    pub async fn tick_feedback(&self) {
        let expired = {
            let mut guard = self.inner.lock().await;
            guard.feedback.tick(Instant::now())
        };
        if expired {
            self.emit(FleetEvent::FeedbackExpired);
        }
    }

    /// Wraps one mutation in the busy flag and the feedback cycle: success
    /// sets a transient success message, failure sets the error text
    /// (backend `detail` verbatim, or the generic connect text).
    async fn run_mutation(
        &self,
        success_text: &str,
        operation: impl std::future::Future<Output = Result<()>>,
    ) -> Result<()> {
        self.set_busy(true).await;
        let outcome = operation.await;
        self.set_busy(false).await;

        match outcome {
            Ok(()) => {
                self.push_feedback(FeedbackKind::Success, success_text).await;
                Ok(())
            }
            Err(err) => {
                self.push_feedback(FeedbackKind::Error, err.to_string()).await;
                Err(err)
            }
        }
    }

    async fn resolve_route_names(&self, transfer: &WarehouseTransfer) -> TransferRouteNames {
        let (origin, destination) = tokio::join!(
            self.warehouse_label(transfer.origin_warehouse_id),
            self.warehouse_label(transfer.destination_warehouse_id),
        );
        TransferRouteNames {
            origin,
            destination,
        }
    }

    /// Enrichment only: failure degrades to a placeholder, never fails the
    /// primary flow.
    async fn warehouse_label(&self, warehouse_id: Option<WarehouseId>) -> String {
        let Some(warehouse_id) = warehouse_id else {
            return "Unknown warehouse".to_string();
        };
        match self.backend.warehouse(warehouse_id).await {
            Ok(warehouse) => warehouse.name,
            Err(err) => {
                warn!(
                    warehouse_id = warehouse_id.0,
                    %err,
                    "fleet: warehouse lookup failed, using placeholder"
                );
                format!("Warehouse #{}", warehouse_id.0)
            }
        }
    }

    async fn require_truck(&self) -> Result<Truck> {
        self.inner
            .lock()
            .await
            .truck
            .clone()
            .ok_or_else(|| anyhow!("no truck loaded for driver {}", self.session.user_id.0))
    }

    async fn set_busy(&self, busy: bool) {
        self.inner.lock().await.busy = busy;
    }

    async fn push_feedback(&self, kind: FeedbackKind, text: impl Into<String>) {
        let text = text.into();
        {
            let mut guard = self.inner.lock().await;
            guard.feedback.set(kind, text.clone(), Instant::now());
        }
        self.emit(FleetEvent::Feedback { kind, text });
    }

    fn emit(&self, event: FleetEvent) {
        let _ = self.events.send(event);
    }
}

/// Convenience constructor mirroring how the console wires things up.
pub fn http_client(base_url: impl Into<String>, session: Session) -> Arc<FleetActivityClient> {
    FleetActivityClient::new(Arc::new(HttpFleetBackend::new(base_url)), session)
}

pub fn driver_session(user_id: i64, username: impl Into<String>) -> Session {
    Session {
        user_id: UserId(user_id),
        username: username.into(),
        role: shared::domain::UserRole::TruckDriver,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/lifecycle_tests.rs"]
mod lifecycle_tests;

#[cfg(test)]
#[path = "tests/suggestions_tests.rs"]
mod suggestions_tests;
