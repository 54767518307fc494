use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use shared::{
    domain::{TransferId, TransferReason, TruckId, WarehouseId},
    error::ApiError,
    protocol::{
        CreateTransferRequest, GenerateSuggestionsRequest, ProductSummary, RouteSummary,
        SuggestionRecord,
    },
};
use thiserror::Error;
use tracing::info;

use crate::transport::FleetBackend;

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The optimizer ran but reported failure; carries its error text.
    #[error("{0}")]
    Generation(String),
    #[error("unknown suggestion id: {0}")]
    UnknownSuggestion(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Placed,
    Discarded,
}

/// Local record of an operator decision for one suggestion. Lives only as
/// long as the batch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferAction {
    pub suggestion_id: String,
    pub decision: Decision,
    pub decided_at: DateTime<Utc>,
}

/// Suggestions bound for the same route, keyed by origin, destination and
/// assigned truck. Member order is insertion order; no sorting anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferGroup {
    pub key: String,
    pub origin_warehouse_id: WarehouseId,
    pub origin_warehouse_name: String,
    pub destination_warehouse_id: WarehouseId,
    pub destination_warehouse_name: String,
    pub assigned_truck_id: Option<TruckId>,
    pub records: Vec<SuggestionRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSummary {
    pub total_quantity_kg: f64,
    pub record_count: usize,
    pub distinct_products: usize,
}

impl TransferGroup {
    pub fn summary(&self) -> GroupSummary {
        let distinct_products = self
            .records
            .iter()
            .map(|r| r.product_name.as_str())
            .collect::<HashSet<_>>()
            .len();
        GroupSummary {
            total_quantity_kg: self.records.iter().map(|r| r.quantity_kg).sum(),
            record_count: self.records.len(),
            distinct_products,
        }
    }
}

fn group_key(record: &SuggestionRecord) -> String {
    let truck = record
        .assigned_truck_id
        .map(|t| t.0.to_string())
        .unwrap_or_else(|| "unassigned".to_string());
    format!(
        "{}-{}-{}",
        record.origin_warehouse_id.0, record.destination_warehouse_id.0, truck
    )
}

/// Turns one optimizer batch into route groups and tracks place/discard
/// decisions without ever mutating the suggestions themselves.
#[derive(Debug, Default)]
pub struct SuggestionBoard {
    groups: Vec<TransferGroup>,
    group_index: HashMap<String, usize>,
    actions: HashMap<String, TransferAction>,
    product_summary: Vec<ProductSummary>,
    route_summary: Vec<RouteSummary>,
    last_message: Option<String>,
}

impl SuggestionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes the optimizer and rebuilds the board from scratch. A new
    /// batch has no memory of prior decisions, and a failed call leaves the
    /// board empty rather than keeping stale data.
    pub async fn generate(
        &mut self,
        backend: &dyn FleetBackend,
        max_trucks_to_use: u32,
    ) -> Result<(), SuggestionError> {
        self.reset();

        let batch = backend
            .generate_suggestions(GenerateSuggestionsRequest { max_trucks_to_use })
            .await?;

        if !batch.success {
            let text = batch.error.unwrap_or(batch.message);
            return Err(SuggestionError::Generation(text));
        }

        info!(
            records = batch.transfer_records.len(),
            execution_time_seconds = batch.execution_time_seconds,
            "suggestions: batch generated"
        );

        for record in batch.transfer_records {
            let key = group_key(&record);
            match self.group_index.get(&key) {
                Some(&idx) => self.groups[idx].records.push(record),
                None => {
                    self.group_index.insert(key.clone(), self.groups.len());
                    self.groups.push(TransferGroup {
                        key,
                        origin_warehouse_id: record.origin_warehouse_id,
                        origin_warehouse_name: record.origin_warehouse_name.clone(),
                        destination_warehouse_id: record.destination_warehouse_id,
                        destination_warehouse_name: record.destination_warehouse_name.clone(),
                        assigned_truck_id: record.assigned_truck_id,
                        records: vec![record],
                    });
                }
            }
        }

        self.product_summary = batch.product_summary;
        self.route_summary = batch.route_summary;
        self.last_message = Some(batch.message);
        Ok(())
    }

    /// Materializes one suggestion as a real warehouse transfer. The record
    /// stays in its group either way; success only marks it decided.
    pub async fn place(
        &mut self,
        backend: &dyn FleetBackend,
        suggestion_id: &str,
    ) -> Result<TransferId, SuggestionError> {
        let record = self
            .find_record(suggestion_id)
            .ok_or_else(|| SuggestionError::UnknownSuggestion(suggestion_id.to_string()))?
            .clone();

        let response = backend
            .create_transfer(CreateTransferRequest {
                record_id: record.product_record_id,
                origin_warehouse_id: record.origin_warehouse_id,
                destination_warehouse_id: record.destination_warehouse_id,
                reason: TransferReason::Optimization,
                notes: Some(format!("Placed from suggestion {suggestion_id}")),
            })
            .await?;

        info!(
            suggestion_id,
            transfer_id = response.transfer_id.0,
            "suggestions: suggestion placed"
        );
        self.record_decision(suggestion_id, Decision::Placed);
        Ok(response.transfer_id)
    }

    /// Purely local rejection; no backend call, no undo within the batch.
    pub fn discard(&mut self, suggestion_id: &str) -> Result<(), SuggestionError> {
        if self.find_record(suggestion_id).is_none() {
            return Err(SuggestionError::UnknownSuggestion(suggestion_id.to_string()));
        }
        self.record_decision(suggestion_id, Decision::Discarded);
        Ok(())
    }

    pub fn decision(&self, suggestion_id: &str) -> Option<&TransferAction> {
        self.actions.get(suggestion_id)
    }

    pub fn groups(&self) -> &[TransferGroup] {
        &self.groups
    }

    pub fn product_summary(&self) -> &[ProductSummary] {
        &self.product_summary
    }

    pub fn route_summary(&self) -> &[RouteSummary] {
        &self.route_summary
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn find_record(&self, suggestion_id: &str) -> Option<&SuggestionRecord> {
        self.groups
            .iter()
            .flat_map(|g| g.records.iter())
            .find(|r| r.transfer_id == suggestion_id)
    }

    fn record_decision(&mut self, suggestion_id: &str, decision: Decision) {
        self.actions.insert(
            suggestion_id.to_string(),
            TransferAction {
                suggestion_id: suggestion_id.to_string(),
                decision,
                decided_at: Utc::now(),
            },
        );
    }

    fn reset(&mut self) {
        self.groups.clear();
        self.group_index.clear();
        self.actions.clear();
        self.product_summary.clear();
        self.route_summary.clear();
        self.last_message = None;
    }
}
