use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::UserResponse;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "offer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

/// One line of a supplier's bid: a part from the request, tagged available
/// or not. Price is only meaningful when available; unavailable items
/// conventionally carry 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfferLineItem {
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    pub available: bool,
}

/// A supplier's bid against one request. Line items mirror the request's
/// part list: same names, same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    pub request_id: Uuid,
    pub supplier_id: Uuid,
    pub items: Vec<OfferLineItem>,
    pub total_price: Decimal,
    pub notes: Option<String>,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOfferRequest {
    pub request_id: Uuid,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub items: Vec<OfferLineItem>,
    /// Accepted for wire compatibility; the server recomputes the total from
    /// the line items and ignores this value.
    pub total_price: Option<Decimal>,
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOfferStatusRequest {
    pub status: OfferStatus,
}

#[derive(Debug, Serialize, Clone)]
pub struct OfferResponse {
    pub id: Uuid,
    pub request_id: Uuid,
    pub supplier_id: Uuid,
    pub items: Vec<OfferLineItem>,
    pub total_price: Decimal,
    pub notes: Option<String>,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Box<crate::models::request::RequestResponse>>,
}

impl From<Offer> for OfferResponse {
    fn from(offer: Offer) -> Self {
        Self {
            id: offer.id,
            request_id: offer.request_id,
            supplier_id: offer.supplier_id,
            items: offer.items,
            total_price: offer.total_price,
            notes: offer.notes,
            status: offer.status,
            created_at: offer.created_at,
            supplier: None,
            request: None,
        }
    }
}
