//! Parts-request lifecycle: creation (with vehicle get-or-create), garage
//! ownership views, and supplier visibility through the matcher.

use async_trait::async_trait;
use uuid::Uuid;

use crate::middleware::error_handling::{AppError, Result};
use crate::models::offer::OfferResponse;
use crate::models::request::{CreatePartsRequest, PartsRequest, RequestResponse, RequestStatus};
use crate::models::user::UserResponse;
use crate::models::vehicle::VehicleData;
use crate::repositories::{
    OfferRepository, RequestRepository, UserRepository, VehicleRepository,
};
use crate::services::chatbot_service::{RequestDraft, RequestIntake};
use crate::services::matching_service::{MatchCriteria, MatchingService};
use crate::services::notification_service::NotificationService;
use crate::utils::validation::{is_valid_plate, normalize_plate};

pub struct RequestService {
    request_repo: RequestRepository,
    vehicle_repo: VehicleRepository,
    offer_repo: OfferRepository,
    user_repo: UserRepository,
    matching: MatchingService,
    notifications: NotificationService,
}

impl RequestService {
    pub fn new(
        request_repo: RequestRepository,
        vehicle_repo: VehicleRepository,
        offer_repo: OfferRepository,
        user_repo: UserRepository,
        matching: MatchingService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            request_repo,
            vehicle_repo,
            offer_repo,
            user_repo,
            matching,
            notifications,
        }
    }

    pub async fn create_request(
        &self,
        garage_id: Uuid,
        request: CreatePartsRequest,
    ) -> Result<RequestResponse> {
        let license_plate = normalize_plate(&request.license_plate);
        if !is_valid_plate(&license_plate) {
            return Err(AppError::InvalidInput(
                "Invalid license plate format".to_string(),
            ));
        }

        let parts: Vec<String> = request
            .parts
            .iter()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one part is required".to_string(),
            ));
        }

        let vehicle = VehicleData {
            license_plate,
            manufacturer: request.manufacturer,
            model: request.model,
            year: request.year,
        };

        let created = self
            .create_with_vehicle(garage_id, vehicle, parts, request.description)
            .await?;
        Ok(created.into())
    }

    /// Shared creation path for the API and the intake conversation. The
    /// request-created notification is fire-and-forget: a dispatch failure
    /// is logged and the created request is still returned.
    async fn create_with_vehicle(
        &self,
        garage_id: Uuid,
        vehicle: VehicleData,
        parts: Vec<String>,
        description: Option<String>,
    ) -> Result<PartsRequest> {
        let vehicle = self.vehicle_repo.get_or_create(&vehicle).await?;
        let request = self
            .request_repo
            .create(garage_id, vehicle.id, &parts, description.as_deref())
            .await?;

        tracing::info!("Request {} created by garage {}", request.id, garage_id);

        if let Err(err) = self.notifications.notify_request_created(request.id).await {
            tracing::warn!("Failed to send request notifications: {:?}", err);
        }

        Ok(request)
    }

    pub async fn list_for_garage(&self, garage_id: Uuid) -> Result<Vec<RequestResponse>> {
        let requests = self.request_repo.list_for_garage(garage_id).await?;

        let mut enriched = Vec::new();
        for request in requests {
            enriched.push(self.enrich_for_garage(request).await?);
        }
        Ok(enriched)
    }

    pub async fn get_for_garage(&self, garage_id: Uuid, id: Uuid) -> Result<RequestResponse> {
        let request = self
            .request_repo
            .find_by_id(id)
            .await?
            .filter(|request| request.garage_id == garage_id)
            .ok_or(AppError::NotFound("Request not found".to_string()))?;

        self.enrich_for_garage(request).await
    }

    pub async fn close_request(&self, garage_id: Uuid, id: Uuid) -> Result<RequestResponse> {
        let request = self
            .request_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Request not found".to_string()))?;

        if request.garage_id != garage_id {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        if request.status != RequestStatus::Open {
            return Err(AppError::InvalidInput("Request is not open".to_string()));
        }

        let closed = self.request_repo.set_status(id, RequestStatus::Closed).await?;
        Ok(closed.into())
    }

    /// Open requests visible to a supplier: every open request whose vehicle
    /// manufacturer passes the supplier's preference filter. Full matcher
    /// scan per request, as the population is small.
    pub async fn list_open_for_supplier(&self, supplier_id: Uuid) -> Result<Vec<RequestResponse>> {
        let requests = self.request_repo.list_open().await?;

        let mut visible = Vec::new();
        for request in requests {
            let Some(vehicle) = self.vehicle_repo.find_by_id(request.vehicle_id).await? else {
                continue;
            };

            let criteria = MatchCriteria::for_manufacturer(&vehicle.manufacturer);
            let matching_ids = self.matching.find_matching_suppliers(&criteria).await?;
            if !matching_ids.contains(&supplier_id) {
                continue;
            }

            visible.push(self.enrich_for_supplier(request, supplier_id).await?);
        }

        Ok(visible)
    }

    pub async fn get_for_supplier(&self, supplier_id: Uuid, id: Uuid) -> Result<RequestResponse> {
        let request = self
            .request_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Request not found".to_string()))?;

        self.enrich_for_supplier(request, supplier_id).await
    }

    /// Garage view: vehicle plus every offer, each with its supplier.
    async fn enrich_for_garage(&self, request: PartsRequest) -> Result<RequestResponse> {
        let vehicle = self.vehicle_repo.find_by_id(request.vehicle_id).await?;
        let offers = self.offer_repo.list_for_request(request.id).await?;

        let mut offer_responses = Vec::new();
        for offer in offers {
            let supplier = self
                .user_repo
                .find_by_id(offer.supplier_id)
                .await?
                .map(UserResponse::from);
            let mut response: OfferResponse = offer.into();
            response.supplier = supplier;
            offer_responses.push(response);
        }

        let mut response: RequestResponse = request.into();
        response.vehicle = vehicle;
        response.offers = Some(offer_responses);
        Ok(response)
    }

    /// Supplier view: vehicle, garage contact, and only the supplier's own
    /// offers against this request.
    async fn enrich_for_supplier(
        &self,
        request: PartsRequest,
        supplier_id: Uuid,
    ) -> Result<RequestResponse> {
        let vehicle = self.vehicle_repo.find_by_id(request.vehicle_id).await?;
        let garage = self
            .user_repo
            .find_by_id(request.garage_id)
            .await?
            .map(UserResponse::from);
        let own_offers = self
            .offer_repo
            .list_for_request_by_supplier(request.id, supplier_id)
            .await?
            .into_iter()
            .map(OfferResponse::from)
            .collect();

        let mut response: RequestResponse = request.into();
        response.vehicle = vehicle;
        response.garage = garage;
        response.offers = Some(own_offers);
        Ok(response)
    }
}

#[async_trait]
impl RequestIntake for RequestService {
    async fn submit(&self, garage_id: Uuid, draft: RequestDraft) -> Result<PartsRequest> {
        self.create_with_vehicle(garage_id, draft.vehicle, draft.parts, None)
            .await
    }
}
