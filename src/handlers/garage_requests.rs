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
    models::request::{CreatePartsRequest, RequestResponse},
    models::user::UserRole,
    repositories::{
        OfferRepository, PreferenceRepository, RequestRepository, UserRepository,
        VehicleRepository,
    },
    services::{MatchingService, NotificationService, RequestService, WhatsAppService},
};

fn request_service(config: &AppConfig) -> RequestService {
    RequestService::new(
        RequestRepository::new(config.database_pool.clone()),
        VehicleRepository::new(config.database_pool.clone()),
        OfferRepository::new(config.database_pool.clone()),
        UserRepository::new(config.database_pool.clone()),
        MatchingService::new(PreferenceRepository::new(config.database_pool.clone())),
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

pub async fn get_requests(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<RequestResponse>>> {
    claims.require_role(UserRole::Garage)?;

    let requests = request_service(&config).list_for_garage(claims.user_id).await?;
    Ok(Json(requests))
}

pub async fn create_request(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreatePartsRequest>,
) -> Result<(StatusCode, Json<RequestResponse>)> {
    claims.require_role(UserRole::Garage)?;
    request.validate().map_err(AppError::Validation)?;

    let created = request_service(&config)
        .create_request(claims.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_request(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Path(request_id): Path<uuid::Uuid>,
) -> Result<Json<RequestResponse>> {
    claims.require_role(UserRole::Garage)?;

    let request = request_service(&config)
        .get_for_garage(claims.user_id, request_id)
        .await?;
    Ok(Json(request))
}

pub async fn close_request(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Path(request_id): Path<uuid::Uuid>,
) -> Result<Json<RequestResponse>> {
    claims.require_role(UserRole::Garage)?;

    let closed = request_service(&config)
        .close_request(claims.user_id, request_id)
        .await?;
    Ok(Json(closed))
}
