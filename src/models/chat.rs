use serde::{Deserialize, Serialize};

use crate::models::vehicle::VehicleData;

/// Conversation steps of the parts-request intake flow, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatStep {
    Welcome,
    LicensePlate,
    ConfirmVehicle,
    Parts,
    ConfirmRequest,
}

/// Per-conversation draft. The server never stores this: it is returned on
/// every turn and the caller sends it back with the next message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatState {
    pub step: ChatStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<String>>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            step: ChatStep::Welcome,
            license_plate: None,
            vehicle: None,
            parts: None,
        }
    }
}

/// Result of one conversation turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub message: String,
    pub state: ChatState,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub state: Option<ChatState>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub state: ChatState,
}
