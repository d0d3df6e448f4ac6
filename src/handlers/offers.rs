use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::{
    config::AppConfig,
    middleware::{
        error_handling::{AppError, Result},
        Claims,
    },
    models::offer::{CreateOfferRequest, OfferResponse, UpdateOfferStatusRequest},
    models::user::UserRole,
    repositories::{
        OfferRepository, PreferenceRepository, RequestRepository, UserRepository,
        VehicleRepository,
    },
    services::{MatchingService, NotificationService, OfferService, WhatsAppService},
};

fn offer_service(config: &AppConfig) -> OfferService {
    OfferService::new(
        OfferRepository::new(config.database_pool.clone()),
        RequestRepository::new(config.database_pool.clone()),
        UserRepository::new(config.database_pool.clone()),
        VehicleRepository::new(config.database_pool.clone()),
        NotificationService::new(
            UserRepository::new(config.database_pool.clone()),
            RequestRepository::new(config.database_pool.clone()),
            VehicleRepository::new(config.database_pool.clone()),
            OfferRepository::new(config.database_pool.clone()),
            MatchingService::new(PreferenceRepository::new(config.database_pool.clone())),
            WhatsAppService::new(config.rappel_client_id.clone(), config.rappel_api_key.clone()),
        ),
    )
}

pub async fn get_offers(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<OfferResponse>>> {
    claims.require_role(UserRole::Supplier)?;

    let offers = offer_service(&config).list_for_supplier(claims.user_id).await?;
    Ok(Json(offers))
}

pub async fn create_offer(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<OfferResponse>)> {
    claims.require_role(UserRole::Supplier)?;
    request.validate().map_err(AppError::Validation)?;

    let offer = offer_service(&config)
        .create_offer(claims.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(offer)))
}

/// Garage resolution of a pending offer: accept (closes the request) or
/// reject.
pub async fn update_offer_status(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Path(offer_id): Path<uuid::Uuid>,
    Json(request): Json<UpdateOfferStatusRequest>,
) -> Result<Json<OfferResponse>> {
    claims.require_role(UserRole::Garage)?;

    let offer = offer_service(&config)
        .update_status(claims.user_id, offer_id, request.status)
        .await?;
    Ok(Json(offer))
}
