use axum::{extract::State, Extension, Json};

use crate::{
    config::AppConfig,
    middleware::{error_handling::Result, Claims},
    models::preference::{PreferencesResponse, UpdatePreferencesRequest},
    models::user::UserRole,
    repositories::PreferenceRepository,
};

pub async fn get_preferences(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<PreferencesResponse>> {
    claims.require_role(UserRole::Supplier)?;

    let preference = PreferenceRepository::new(config.database_pool.clone())
        .find_by_supplier(claims.user_id)
        .await?;

    Ok(Json(preference.into()))
}

pub async fn update_preferences(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Json<PreferencesResponse>> {
    claims.require_role(UserRole::Supplier)?;

    let updated = PreferenceRepository::new(config.database_pool.clone())
        .upsert(claims.user_id, &request)
        .await?;

    Ok(Json(Some(updated).into()))
}
