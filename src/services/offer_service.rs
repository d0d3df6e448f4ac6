//! Offer submission and resolution: line-item validation against the parent
//! request, server-side total derivation, and the one-offer-per-supplier
//! rule.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::middleware::error_handling::{AppError, Result};
use crate::models::offer::{CreateOfferRequest, OfferLineItem, OfferResponse, OfferStatus};
use crate::models::request::{RequestResponse, RequestStatus};
use crate::models::user::UserResponse;
use crate::repositories::{OfferRepository, RequestRepository, UserRepository, VehicleRepository};
use crate::services::notification_service::NotificationService;

/// Total = sum of price over available line items. Unavailable items
/// contribute nothing regardless of the price they carry.
pub fn compute_total(items: &[OfferLineItem]) -> Decimal {
    items
        .iter()
        .filter(|item| item.available)
        .map(|item| item.price)
        .sum()
}

/// Line items must be a projection of the request's part list: same names,
/// same order, one line per requested part. Available items must carry a
/// non-negative price.
pub fn validate_line_items(request_parts: &[String], items: &[OfferLineItem]) -> Result<()> {
    if items.len() != request_parts.len() {
        return Err(AppError::InvalidInput(
            "Offer must answer every part in the request".to_string(),
        ));
    }

    for (part, item) in request_parts.iter().zip(items) {
        if item.name != *part {
            return Err(AppError::InvalidInput(format!(
                "Line item '{}' does not match requested part '{}'",
                item.name, part
            )));
        }
        if item.available && item.price < Decimal::ZERO {
            return Err(AppError::InvalidInput(format!(
                "Negative price for part '{}'",
                item.name
            )));
        }
    }

    Ok(())
}

pub struct OfferService {
    offer_repo: OfferRepository,
    request_repo: RequestRepository,
    user_repo: UserRepository,
    vehicle_repo: VehicleRepository,
    notifications: NotificationService,
}

impl OfferService {
    pub fn new(
        offer_repo: OfferRepository,
        request_repo: RequestRepository,
        user_repo: UserRepository,
        vehicle_repo: VehicleRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            offer_repo,
            request_repo,
            user_repo,
            vehicle_repo,
            notifications,
        }
    }

    pub async fn create_offer(
        &self,
        supplier_id: Uuid,
        request: CreateOfferRequest,
    ) -> Result<OfferResponse> {
        let parts_request = self
            .request_repo
            .find_by_id(request.request_id)
            .await?
            .ok_or(AppError::NotFound("Request not found".to_string()))?;

        if parts_request.status != RequestStatus::Open {
            return Err(AppError::InvalidInput("Request is closed".to_string()));
        }

        validate_line_items(&parts_request.parts, &request.items)?;

        if self
            .offer_repo
            .exists_for(request.request_id, supplier_id)
            .await?
        {
            return Err(AppError::Conflict);
        }

        // the client may echo a total but the server's sum is authoritative
        let total_price = compute_total(&request.items);

        let offer = self
            .offer_repo
            .create(
                request.request_id,
                supplier_id,
                &request.items,
                total_price,
                request.notes.as_deref(),
            )
            .await?;

        if let Err(err) = self.notifications.notify_offer_created(offer.id).await {
            tracing::warn!("Failed to send offer notification: {:?}", err);
        }

        Ok(offer.into())
    }

    /// A supplier's own offers, each with its parent request (vehicle and
    /// garage contact attached) for the dashboard list.
    pub async fn list_for_supplier(&self, supplier_id: Uuid) -> Result<Vec<OfferResponse>> {
        let offers = self.offer_repo.list_for_supplier(supplier_id).await?;

        let mut enriched = Vec::new();
        for offer in offers {
            let request = self.request_repo.find_by_id(offer.request_id).await?;
            let mut response: OfferResponse = offer.into();

            if let Some(request) = request {
                let mut request_response: RequestResponse = request.clone().into();
                request_response.vehicle = self.vehicle_repo.find_by_id(request.vehicle_id).await?;
                request_response.garage = self
                    .user_repo
                    .find_by_id(request.garage_id)
                    .await?
                    .map(UserResponse::from);
                response.request = Some(Box::new(request_response));
            }

            enriched.push(response);
        }

        Ok(enriched)
    }

    /// Garage resolution of a pending offer. Accepting an offer closes the
    /// parent request; rejecting leaves the request open for other bids.
    pub async fn update_status(
        &self,
        garage_id: Uuid,
        offer_id: Uuid,
        status: OfferStatus,
    ) -> Result<OfferResponse> {
        if status == OfferStatus::Pending {
            return Err(AppError::InvalidInput("Invalid status".to_string()));
        }

        let offer = self
            .offer_repo
            .find_by_id(offer_id)
            .await?
            .ok_or(AppError::NotFound("Offer not found".to_string()))?;

        let request = self
            .request_repo
            .find_by_id(offer.request_id)
            .await?
            .ok_or(AppError::NotFound("Request not found".to_string()))?;

        if request.garage_id != garage_id {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        if offer.status != OfferStatus::Pending {
            return Err(AppError::InvalidInput("Offer is not pending".to_string()));
        }

        let updated = self.offer_repo.set_status(offer_id, status).await?;

        if status == OfferStatus::Accepted {
            self.request_repo
                .set_status(request.id, RequestStatus::Closed)
                .await?;
        }

        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(name: &str, price: Decimal, available: bool) -> OfferLineItem {
        OfferLineItem {
            name: name.to_string(),
            price,
            available,
        }
    }

    #[test]
    fn total_sums_available_items_only() {
        let items = vec![item("A", dec!(100), true), item("B", dec!(0), false)];
        assert_eq!(compute_total(&items), dec!(100));
    }

    #[test]
    fn unavailable_item_price_never_changes_the_total() {
        let cheap = vec![item("A", dec!(100), true), item("B", dec!(0), false)];
        let pricey = vec![item("A", dec!(100), true), item("B", dec!(9999), false)];
        assert_eq!(compute_total(&cheap), compute_total(&pricey));
    }

    #[test]
    fn empty_offer_totals_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn duplicate_parts_each_contribute() {
        let items = vec![
            item("headlight", dec!(50), true),
            item("headlight", dec!(50), true),
        ];
        assert_eq!(compute_total(&items), dec!(100));
    }

    #[test]
    fn line_items_must_cover_every_part() {
        let parts = vec!["A".to_string(), "B".to_string()];
        let items = vec![item("A", dec!(10), true)];
        assert!(validate_line_items(&parts, &items).is_err());
    }

    #[test]
    fn line_items_must_match_request_order() {
        let parts = vec!["A".to_string(), "B".to_string()];
        let items = vec![item("B", dec!(10), true), item("A", dec!(5), true)];
        assert!(validate_line_items(&parts, &items).is_err());
    }

    #[test]
    fn available_items_reject_negative_prices() {
        let parts = vec!["A".to_string()];
        let items = vec![item("A", dec!(-1), true)];
        assert!(validate_line_items(&parts, &items).is_err());
    }

    #[test]
    fn unavailable_items_ignore_their_price() {
        let parts = vec!["A".to_string()];
        let items = vec![item("A", dec!(-1), false)];
        assert!(validate_line_items(&parts, &items).is_ok());
    }

    #[test]
    fn matching_projection_validates() {
        let parts = vec!["front bumper".to_string(), "headlight".to_string()];
        let items = vec![
            item("front bumper", dec!(350), true),
            item("headlight", dec!(0), false),
        ];
        assert!(validate_line_items(&parts, &items).is_ok());
    }
}
