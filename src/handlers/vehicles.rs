use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    config::AppConfig,
    middleware::error_handling::{AppError, Result},
    models::vehicle::VehicleData,
    services::{GovVehicleDirectory, VehicleDirectory},
    utils::validation::{is_valid_plate, normalize_plate},
};

pub async fn lookup_vehicle(
    State(config): State<AppConfig>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<VehicleData>> {
    let plate = params
        .get("plate")
        .ok_or(AppError::BadRequest("License plate is required".to_string()))?;

    let normalized = normalize_plate(plate);
    if !is_valid_plate(&normalized) {
        return Err(AppError::BadRequest(
            "Invalid license plate format".to_string(),
        ));
    }

    let directory = GovVehicleDirectory::new(config.vehicle_directory_url.clone());
    let vehicle = directory
        .lookup(&normalized)
        .await
        .ok_or(AppError::NotFound("Vehicle not found".to_string()))?;

    Ok(Json(vehicle))
}
