use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::offer::OfferResponse;
use crate::models::user::UserResponse;
use crate::models::vehicle::Vehicle;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Closed,
}

/// One garage's parts request. The parts list keeps submission order and
/// may contain duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartsRequest {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub vehicle_id: Uuid,
    pub parts: Vec<String>,
    pub description: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePartsRequest {
    #[validate(length(min = 1, message = "License plate is required"))]
    pub license_plate: String,
    #[validate(length(min = 1, message = "Manufacturer is required"))]
    pub manufacturer: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100, message = "Invalid year"))]
    pub year: Option<i32>,
    #[validate(length(min = 1, message = "At least one part is required"))]
    pub parts: Vec<String>,
    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct RequestResponse {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub vehicle_id: Uuid,
    pub parts: Vec<String>,
    pub description: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Nested objects for the dashboard views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garage: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers: Option<Vec<OfferResponse>>,
}

impl From<PartsRequest> for RequestResponse {
    fn from(request: PartsRequest) -> Self {
        Self {
            id: request.id,
            garage_id: request.garage_id,
            vehicle_id: request.vehicle_id,
            parts: request.parts,
            description: request.description,
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
            vehicle: None,
            garage: None,
            offers: None,
        }
    }
}
