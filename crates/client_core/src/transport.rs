use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{TransferId, TransferStatus, Trip, TripId, TripStatus, Truck, TruckId, UserId,
        WarehouseId, WarehouseTransfer},
    error::{ApiError, ErrorBody},
    protocol::{
        CreateTransferRequest, CreateTransferResponse, GenerateSuggestionsRequest,
        SuggestionBatchResponse, UpdateTransferStatusRequest, UpdateTripStatusRequest,
        UpdateTruckStatusRequest, Warehouse,
    },
};

/// Seam to the logistics backend, one method per consumed endpoint.
///
/// The synchronizer, the lifecycle controllers, and the suggestion board all
/// talk to the backend exclusively through this trait, which is what tests
/// mock.
#[async_trait]
pub trait FleetBackend: Send + Sync {
    async fn trucks_by_driver(&self, driver_id: UserId) -> Result<Vec<Truck>, ApiError>;
    async fn trips_by_truck(&self, truck_id: TruckId) -> Result<Vec<Trip>, ApiError>;
    async fn transfers_by_truck(
        &self,
        truck_id: TruckId,
    ) -> Result<Vec<WarehouseTransfer>, ApiError>;
    async fn update_trip_status(
        &self,
        trip_id: TripId,
        status: TripStatus,
    ) -> Result<Trip, ApiError>;
    async fn update_transfer_status(
        &self,
        transfer_id: TransferId,
        status: TransferStatus,
    ) -> Result<WarehouseTransfer, ApiError>;
    async fn update_truck_status(
        &self,
        truck_id: TruckId,
        request: UpdateTruckStatusRequest,
    ) -> Result<Truck, ApiError>;
    async fn generate_suggestions(
        &self,
        request: GenerateSuggestionsRequest,
    ) -> Result<SuggestionBatchResponse, ApiError>;
    async fn create_transfer(
        &self,
        request: CreateTransferRequest,
    ) -> Result<CreateTransferResponse, ApiError>;
    async fn warehouse(&self, warehouse_id: WarehouseId) -> Result<Warehouse, ApiError>;
}

/// reqwest-backed implementation against the REST backend.
pub struct HttpFleetBackend {
    http: Client,
    base_url: String,
}

impl HttpFleetBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            return Err(match response.json::<ErrorBody>().await {
                Ok(body) => ApiError::rejected(code, body.detail),
                Err(_) => ApiError::rejected_without_detail(code),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn send_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Connect(err.to_string())
    }
}

#[async_trait]
impl FleetBackend for HttpFleetBackend {
    async fn trucks_by_driver(&self, driver_id: UserId) -> Result<Vec<Truck>, ApiError> {
        let response = self
            .http
            .get(format!("{}/trucks/driver/{}", self.base_url, driver_id.0))
            .send()
            .await
            .map_err(send_error)?;
        Self::decode(response).await
    }

    async fn trips_by_truck(&self, truck_id: TruckId) -> Result<Vec<Trip>, ApiError> {
        let response = self
            .http
            .get(format!("{}/trips/truck/{}", self.base_url, truck_id.0))
            .send()
            .await
            .map_err(send_error)?;
        Self::decode(response).await
    }

    async fn transfers_by_truck(
        &self,
        truck_id: TruckId,
    ) -> Result<Vec<WarehouseTransfer>, ApiError> {
        let response = self
            .http
            .get(format!(
                "{}/warehouse-transfers/truck/{}",
                self.base_url, truck_id.0
            ))
            .send()
            .await
            .map_err(send_error)?;
        Self::decode(response).await
    }

    async fn update_trip_status(
        &self,
        trip_id: TripId,
        status: TripStatus,
    ) -> Result<Trip, ApiError> {
        let response = self
            .http
            .put(format!("{}/trips/{}", self.base_url, trip_id.0))
            .json(&UpdateTripStatusRequest { status })
            .send()
            .await
            .map_err(send_error)?;
        Self::decode(response).await
    }

    async fn update_transfer_status(
        &self,
        transfer_id: TransferId,
        status: TransferStatus,
    ) -> Result<WarehouseTransfer, ApiError> {
        let response = self
            .http
            .put(format!(
                "{}/warehouse-transfers/{}",
                self.base_url, transfer_id.0
            ))
            .json(&UpdateTransferStatusRequest { status })
            .send()
            .await
            .map_err(send_error)?;
        Self::decode(response).await
    }

    async fn update_truck_status(
        &self,
        truck_id: TruckId,
        request: UpdateTruckStatusRequest,
    ) -> Result<Truck, ApiError> {
        let response = self
            .http
            .patch(format!("{}/trucks/{}/status", self.base_url, truck_id.0))
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;
        Self::decode(response).await
    }

    async fn generate_suggestions(
        &self,
        request: GenerateSuggestionsRequest,
    ) -> Result<SuggestionBatchResponse, ApiError> {
        let response = self
            .http
            .post(format!("{}/transfer-suggestions/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;
        Self::decode(response).await
    }

    async fn create_transfer(
        &self,
        request: CreateTransferRequest,
    ) -> Result<CreateTransferResponse, ApiError> {
        let response = self
            .http
            .post(format!("{}/warehouse-transfers/", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;
        Self::decode(response).await
    }

    async fn warehouse(&self, warehouse_id: WarehouseId) -> Result<Warehouse, ApiError> {
        let response = self
            .http
            .get(format!("{}/warehouses/{}", self.base_url, warehouse_id.0))
            .send()
            .await
            .map_err(send_error)?;
        Self::decode(response).await
    }
}
