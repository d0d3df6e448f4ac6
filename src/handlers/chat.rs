use axum::{extract::State, Extension, Json};

use crate::{
    config::AppConfig,
    middleware::{error_handling::Result, Claims},
    models::chat::{ChatRequest, ChatResponse},
    models::user::UserRole,
    repositories::{
        OfferRepository, PreferenceRepository, RequestRepository, UserRepository,
        VehicleRepository,
    },
    services::{
        ChatbotService, GovVehicleDirectory, MatchingService, NotificationService,
        RequestService, WhatsAppService,
    },
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

/// One conversation turn. The caller round-trips the returned state with the
/// next message; omitting the state starts a fresh conversation.
pub async fn chat(
    State(config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    claims.require_role(UserRole::Garage)?;

    let chatbot = ChatbotService::new(
        GovVehicleDirectory::new(config.vehicle_directory_url.clone()),
        request_service(&config),
    );

    let state = request.state.unwrap_or_default();
    let message = request.message.unwrap_or_default();

    let turn = chatbot.advance(claims.user_id, state, &message).await;

    Ok(Json(ChatResponse {
        message: turn.message,
        state: turn.state,
    }))
}
