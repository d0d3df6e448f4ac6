//! Outbound alerts for the two lifecycle triggers: request-created and
//! offer-created. Dispatch is best-effort; a failed send is logged by the
//! WhatsApp client and the loop moves on. Callers must never treat a
//! notification failure as an operation failure.

use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::repositories::{OfferRepository, RequestRepository, UserRepository, VehicleRepository};
use crate::services::matching_service::{MatchCriteria, MatchingService};
use crate::services::whatsapp_service::WhatsAppService;

pub struct NotificationService {
    user_repo: UserRepository,
    request_repo: RequestRepository,
    vehicle_repo: VehicleRepository,
    offer_repo: OfferRepository,
    matching: MatchingService,
    whatsapp: WhatsAppService,
}

impl NotificationService {
    pub fn new(
        user_repo: UserRepository,
        request_repo: RequestRepository,
        vehicle_repo: VehicleRepository,
        offer_repo: OfferRepository,
        matching: MatchingService,
        whatsapp: WhatsAppService,
    ) -> Self {
        Self {
            user_repo,
            request_repo,
            vehicle_repo,
            offer_repo,
            matching,
            whatsapp,
        }
    }

    /// Confirm to the owning garage, then alert every supplier whose
    /// preferences match the request vehicle's manufacturer. No delivery
    /// ordering across the fan-out.
    pub async fn notify_request_created(&self, request_id: Uuid) -> Result<()> {
        let Some(request) = self.request_repo.find_by_id(request_id).await? else {
            return Ok(());
        };
        let Some(vehicle) = self.vehicle_repo.find_by_id(request.vehicle_id).await? else {
            return Ok(());
        };

        if let Some(garage) = self.user_repo.find_by_id(request.garage_id).await? {
            if let Some(phone) = &garage.phone {
                let message = format!(
                    "✅ הבקשה שלך נוצרה בהצלחה!\nמספר בקשה: {}\nרכב: {} {}",
                    &request_id.to_string()[..8],
                    vehicle.manufacturer,
                    vehicle.model
                );
                self.whatsapp.send(phone, &message).await;
            }
        }

        let criteria = MatchCriteria::for_manufacturer(&vehicle.manufacturer);
        let supplier_ids = self.matching.find_matching_suppliers(&criteria).await?;

        tracing::info!(
            "Request {} fan-out to {} matching supplier(s)",
            request_id,
            supplier_ids.len()
        );

        for supplier_id in supplier_ids {
            let Some(supplier) = self.user_repo.find_by_id(supplier_id).await? else {
                continue;
            };
            if let Some(phone) = &supplier.phone {
                let message = format!(
                    "🔔 בקשה חדשה!\nרכב: {} {}\nמספר רישוי: {}\nכניסה לדשבורד לפרטים נוספים",
                    vehicle.manufacturer, vehicle.model, vehicle.license_plate
                );
                self.whatsapp.send(phone, &message).await;
            }
        }

        Ok(())
    }

    /// Tell the garage that owns the parent request about a new bid.
    pub async fn notify_offer_created(&self, offer_id: Uuid) -> Result<()> {
        let Some(offer) = self.offer_repo.find_by_id(offer_id).await? else {
            return Ok(());
        };
        let Some(request) = self.request_repo.find_by_id(offer.request_id).await? else {
            return Ok(());
        };
        let Some(supplier) = self.user_repo.find_by_id(offer.supplier_id).await? else {
            return Ok(());
        };

        if let Some(garage) = self.user_repo.find_by_id(request.garage_id).await? {
            if let Some(phone) = &garage.phone {
                let message = format!(
                    "💰 הצעה חדשה התקבלה!\nספק: {}\nמחיר כולל: ₪{}\nכניסה לדשבורד לפרטים",
                    supplier.name, offer.total_price
                );
                self.whatsapp.send(phone, &message).await;
            }
        }

        Ok(())
    }
}
