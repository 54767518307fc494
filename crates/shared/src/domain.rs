use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(TruckId);
id_newtype!(TripId);
id_newtype!(TransferId);
id_newtype!(OrderId);
id_newtype!(WarehouseId);
id_newtype!(ProductId);
id_newtype!(RecordId);
id_newtype!(SupplierId);

/// Wire values are PascalCase strings ("Waiting", "InTransit", ...), so the
/// derived variant names serialize as-is with no rename attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripStatus {
    Waiting,
    Collecting,
    Loaded,
    Paused,
    Delivering,
    Delivered,
}

impl TripStatus {
    /// Single source of truth for the trip state machine. Both the
    /// action-control rendering and the transition request path consult
    /// this table; there is no second validation layer.
    pub fn allowed_next(self) -> &'static [TripStatus] {
        use TripStatus::*;
        match self {
            Waiting => &[Collecting],
            Collecting => &[Loaded, Paused],
            Loaded => &[Delivering, Paused],
            Delivering => &[Delivered, Paused],
            // Pre-pause phase is not recorded, so both resume targets are
            // offered to the operator.
            Paused => &[Collecting, Delivering],
            Delivered => &[],
        }
    }

    pub fn can_transition_to(self, target: TripStatus) -> bool {
        self.allowed_next().contains(&target)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Non-terminal statuses make a trip the truck's active trip.
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferStatus {
    Pending,
    InTransit,
    Completed,
    /// Exists on the wire but is never offered as a transition target here.
    Cancelled,
}

impl TransferStatus {
    pub fn allowed_next(self) -> &'static [TransferStatus] {
        use TransferStatus::*;
        match self {
            Pending => &[InTransit],
            InTransit => &[Completed],
            Completed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: TransferStatus) -> bool {
        self.allowed_next().contains(&target)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruckStatus {
    Available,
    InService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruckType {
    Normal,
    Refrigerated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferReason {
    Restock,
    Redistribution,
    Emergency,
    Optimization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Administrator,
    Supplier,
    Buyer,
    TruckDriver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
        }
    }
}

/// Logged-in driver identity, fixed for the lifetime of one client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub truck_id: TruckId,
    pub truck_driver_id: Option<UserId>,
    pub current_location: Option<Location>,
    pub status: TruckStatus,
    #[serde(rename = "type")]
    pub kind: TruckType,
    pub load_capacity_kg: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: TripId,
    pub truck_id: Option<TruckId>,
    pub order_id: Option<OrderId>,
    pub origin: Option<Location>,
    pub destination: Option<Location>,
    pub status: TripStatus,
    /// Durations arrive as fractional seconds; this client never interprets
    /// them beyond display.
    #[serde(default)]
    pub estimated_time: Option<f64>,
    #[serde(default)]
    pub actual_time: Option<f64>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseTransfer {
    pub transfer_id: TransferId,
    pub record_id: Option<RecordId>,
    pub origin_warehouse_id: Option<WarehouseId>,
    pub destination_warehouse_id: Option<WarehouseId>,
    pub truck_id: Option<TruckId>,
    pub status: TransferStatus,
    pub reason: Option<TransferReason>,
    #[serde(default)]
    pub estimated_time: Option<f64>,
    #[serde(default)]
    pub actual_time: Option<f64>,
    #[serde(default)]
    pub requested_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}
