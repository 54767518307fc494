use super::*;
use async_trait::async_trait;
use shared::domain::TruckId;
use shared::error::ApiError;
use shared::protocol::{
    CreateTransferRequest, CreateTransferResponse, GenerateSuggestionsRequest,
    SuggestionBatchResponse, Warehouse,
};

/// Captures transition requests; everything else is out of scope here.
#[derive(Default)]
struct RecordingBackend {
    trip_requests: Mutex<Vec<(TripId, TripStatus)>>,
    transfer_requests: Mutex<Vec<(TransferId, TransferStatus)>>,
}

#[async_trait]
impl FleetBackend for RecordingBackend {
    async fn trucks_by_driver(&self, _driver_id: UserId) -> Result<Vec<Truck>, ApiError> {
        Ok(Vec::new())
    }

    async fn trips_by_truck(&self, _truck_id: TruckId) -> Result<Vec<Trip>, ApiError> {
        Ok(Vec::new())
    }

    async fn transfers_by_truck(
        &self,
        _truck_id: TruckId,
    ) -> Result<Vec<WarehouseTransfer>, ApiError> {
        Ok(Vec::new())
    }

    async fn update_trip_status(
        &self,
        trip_id: TripId,
        status: TripStatus,
    ) -> Result<Trip, ApiError> {
        self.trip_requests.lock().await.push((trip_id, status));
        Ok(Trip {
            trip_id,
            truck_id: None,
            order_id: None,
            origin: None,
            destination: None,
            status,
            estimated_time: None,
            actual_time: None,
            start_date: None,
            end_date: None,
        })
    }

    async fn update_transfer_status(
        &self,
        transfer_id: TransferId,
        status: TransferStatus,
    ) -> Result<WarehouseTransfer, ApiError> {
        self.transfer_requests
            .lock()
            .await
            .push((transfer_id, status));
        Ok(WarehouseTransfer {
            transfer_id,
            record_id: None,
            origin_warehouse_id: None,
            destination_warehouse_id: None,
            truck_id: None,
            status,
            reason: None,
            estimated_time: None,
            actual_time: None,
            requested_date: None,
            start_date: None,
            completed_date: None,
            notes: None,
        })
    }

    async fn update_truck_status(
        &self,
        _truck_id: TruckId,
        _request: UpdateTruckStatusRequest,
    ) -> Result<Truck, ApiError> {
        Err(ApiError::Connect("not wired in this test".into()))
    }

    async fn generate_suggestions(
        &self,
        _request: GenerateSuggestionsRequest,
    ) -> Result<SuggestionBatchResponse, ApiError> {
        Err(ApiError::Connect("not wired in this test".into()))
    }

    async fn create_transfer(
        &self,
        _request: CreateTransferRequest,
    ) -> Result<CreateTransferResponse, ApiError> {
        Err(ApiError::Connect("not wired in this test".into()))
    }

    async fn warehouse(&self, _warehouse_id: WarehouseId) -> Result<Warehouse, ApiError> {
        Err(ApiError::Connect("not wired in this test".into()))
    }
}

fn trip_targets(current: TripStatus) -> Vec<TripStatus> {
    TripLifecycle::offered_controls(current)
        .into_iter()
        .map(|c| c.target)
        .collect()
}

#[test]
fn trip_controls_mirror_the_transition_table() {
    use TripStatus::*;
    for current in [Waiting, Collecting, Loaded, Paused, Delivering, Delivered] {
        assert_eq!(trip_targets(current), current.allowed_next().to_vec());
    }
}

#[test]
fn delivered_trip_offers_no_controls() {
    assert!(TripLifecycle::offered_controls(TripStatus::Delivered).is_empty());
}

#[test]
fn paused_trip_offers_both_resume_directions() {
    let controls = TripLifecycle::offered_controls(TripStatus::Paused);
    let labels: Vec<&str> = controls.iter().map(|c| c.label).collect();
    assert_eq!(labels, vec!["Resume collecting", "Resume delivering"]);
}

#[test]
fn trip_control_labels_name_the_action() {
    let controls = TripLifecycle::offered_controls(TripStatus::Collecting);
    let labels: Vec<&str> = controls.iter().map(|c| c.label).collect();
    assert_eq!(labels, vec!["Mark loaded", "Pause"]);
}

#[test]
fn transfer_controls_mirror_the_transition_table() {
    use TransferStatus::*;
    for current in [Pending, InTransit, Completed, Cancelled] {
        let targets: Vec<TransferStatus> = TransferLifecycle::offered_controls(current)
            .into_iter()
            .map(|c| c.target)
            .collect();
        assert_eq!(targets, current.allowed_next().to_vec());
    }
}

#[test]
fn cancelled_is_never_an_offered_target() {
    use TransferStatus::*;
    for current in [Pending, InTransit, Completed, Cancelled] {
        assert!(!TransferLifecycle::offered_controls(current)
            .iter()
            .any(|c| c.target == Cancelled));
    }
}

#[tokio::test]
async fn request_transition_forwards_any_target_without_local_checks() {
    let backend = RecordingBackend::default();

    // Legality lives in the offered controls; the request path passes even
    // an illegal target straight through for the backend to judge.
    TripLifecycle::new(&backend)
        .request_transition(TripId(4), TripStatus::Delivered)
        .await
        .expect("request");

    let requests = backend.trip_requests.lock().await;
    assert_eq!(requests.as_slice(), &[(TripId(4), TripStatus::Delivered)]);
}

#[tokio::test]
async fn transfer_transition_is_forwarded_verbatim() {
    let backend = RecordingBackend::default();

    TransferLifecycle::new(&backend)
        .request_transition(TransferId(9), TransferStatus::InTransit)
        .await
        .expect("request");

    let requests = backend.transfer_requests.lock().await;
    assert_eq!(
        requests.as_slice(),
        &[(TransferId(9), TransferStatus::InTransit)]
    );
}
