use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    config::AppConfig,
    middleware::error_handling::{AppError, Result},
    models::user::{AuthResponse, CreateUserRequest, LoginRequest},
    repositories::{PreferenceRepository, UserRepository},
    services::AuthService,
};

fn auth_service(config: &AppConfig) -> AuthService {
    AuthService::new(
        UserRepository::new(config.database_pool.clone()),
        PreferenceRepository::new(config.database_pool.clone()),
        &config.jwt_secret,
    )
}

pub async fn register(
    State(config): State<AppConfig>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    request.validate().map_err(AppError::Validation)?;

    let (user, token) = auth_service(&config).register(request).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(config): State<AppConfig>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    request.validate().map_err(AppError::Validation)?;

    let (user, token) = auth_service(&config).login(request).await?;

    Ok(Json(AuthResponse { token, user }))
}
