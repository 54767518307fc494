use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Location, ProductId, RecordId, SupplierId, TransferId, TransferReason, TransferStatus,
    TripStatus, TruckId, TruckStatus, WarehouseId,
};

/// Status-only trip update; every other trip field is left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTripStatusRequest {
    pub status: TripStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTransferStatusRequest {
    pub status: TransferStatus,
}

/// The backend PATCHes status and location together, so the caller must
/// always re-send the counterpart field unchanged to avoid clobbering it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTruckStatusRequest {
    pub status: TruckStatus,
    pub current_location: Option<Location>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransferRequest {
    pub record_id: RecordId,
    pub origin_warehouse_id: WarehouseId,
    pub destination_warehouse_id: WarehouseId,
    pub reason: TransferReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransferResponse {
    pub transfer_id: TransferId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSuggestionsRequest {
    pub max_trucks_to_use: u32,
}

/// One suggested product-record movement produced by the backend optimizer.
/// Ephemeral: never persisted client-side beyond the current batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    /// Synthetic id, unique within one generated batch.
    pub transfer_id: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_record_id: RecordId,
    pub origin_warehouse_id: WarehouseId,
    pub origin_warehouse_name: String,
    pub destination_warehouse_id: WarehouseId,
    pub destination_warehouse_name: String,
    pub quantity_kg: f64,
    pub supplier_id: SupplierId,
    pub quality_classification: String,
    #[serde(default)]
    pub assigned_truck_id: Option<TruckId>,
    #[serde(default)]
    pub truck_capacity_kg: Option<f64>,
    pub generated_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_id: ProductId,
    pub total_quantity_kg: f64,
    pub number_of_transfers: u32,
    pub trucks_required: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub origin_warehouse_id: WarehouseId,
    pub destination_warehouse_id: WarehouseId,
    #[serde(default)]
    pub assigned_truck_id: Option<TruckId>,
    pub route_total_kg: f64,
    pub number_of_records: u32,
    pub number_of_products: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionBatchResponse {
    pub success: bool,
    pub message: String,
    pub execution_time_seconds: f64,
    #[serde(default)]
    pub transfer_records: Vec<SuggestionRecord>,
    #[serde(default)]
    pub product_summary: Vec<ProductSummary>,
    #[serde(default)]
    pub route_summary: Vec<RouteSummary>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub warehouse_id: WarehouseId,
    pub name: String,
    #[serde(default)]
    pub location: Option<Location>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truck_status_request_always_carries_location_field() {
        let body = UpdateTruckStatusRequest {
            status: TruckStatus::InService,
            current_location: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("current_location").is_some());
        assert!(json["current_location"].is_null());
    }

    #[test]
    fn suggestion_batch_tolerates_missing_record_lists_on_failure() {
        let json = r#"{
            "success": false,
            "message": "No surplus inventory found",
            "execution_time_seconds": 0.4,
            "error": "insufficient data"
        }"#;
        let batch: SuggestionBatchResponse = serde_json::from_str(json).unwrap();
        assert!(!batch.success);
        assert!(batch.transfer_records.is_empty());
        assert_eq!(batch.error.as_deref(), Some("insufficient data"));
    }
}
