use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{
    config::AppConfig,
    middleware::{error_handling::Result, Claims},
    models::request::RequestResponse,
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

/// Open requests whose vehicle manufacturer passes this supplier's
/// preference filter.
pub async fn get_requests(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<RequestResponse>>> {
    claims.require_role(UserRole::Supplier)?;

    let requests = request_service(&config)
        .list_open_for_supplier(claims.user_id)
        .await?;
    Ok(Json(requests))
}

pub async fn get_request(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Path(request_id): Path<uuid::Uuid>,
) -> Result<Json<RequestResponse>> {
    claims.require_role(UserRole::Supplier)?;

    let request = request_service(&config)
        .get_for_supplier(claims.user_id, request_id)
        .await?;
    Ok(Json(request))
}
