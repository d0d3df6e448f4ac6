use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted vehicle row. license_plate is stored normalized (uppercase,
/// digits only) and is unique: all requests for the same plate share one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub manufacturer: String,
    pub model: String,
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Payload returned by the vehicle directory for a plate lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleData {
    pub license_plate: String,
    pub manufacturer: String,
    pub model: String,
    pub year: Option<i32>,
}
