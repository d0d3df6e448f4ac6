//! Full intake-conversation walkthroughs against stub collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use parts_market::middleware::error_handling::Result;
use parts_market::models::chat::{ChatState, ChatStep};
use parts_market::models::request::{PartsRequest, RequestStatus};
use parts_market::models::vehicle::VehicleData;
use parts_market::services::{
    ChatbotService, RequestDraft, RequestIntake, VehicleDirectory,
};

struct TableDirectory {
    vehicles: HashMap<String, VehicleData>,
}

impl TableDirectory {
    fn new() -> Self {
        let mut vehicles = HashMap::new();
        vehicles.insert(
            "12345678".to_string(),
            VehicleData {
                license_plate: "12345678".to_string(),
                manufacturer: "Mazda".to_string(),
                model: "3".to_string(),
                year: Some(2018),
            },
        );
        Self { vehicles }
    }
}

#[async_trait]
impl VehicleDirectory for TableDirectory {
    async fn lookup(&self, plate: &str) -> Option<VehicleData> {
        self.vehicles.get(plate).cloned()
    }
}

#[derive(Clone, Default)]
struct RecordingIntake {
    submitted: Arc<Mutex<Vec<(Uuid, RequestDraft)>>>,
}

#[async_trait]
impl RequestIntake for RecordingIntake {
    async fn submit(&self, garage_id: Uuid, draft: RequestDraft) -> Result<PartsRequest> {
        let parts = draft.parts.clone();
        self.submitted.lock().unwrap().push((garage_id, draft));
        Ok(PartsRequest {
            id: Uuid::new_v4(),
            garage_id,
            vehicle_id: Uuid::new_v4(),
            parts,
            description: None,
            status: RequestStatus::Open,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

#[tokio::test]
async fn full_conversation_submits_the_collected_draft() {
    let intake = RecordingIntake::default();
    let chatbot = ChatbotService::new(TableDirectory::new(), intake.clone());
    let garage_id = Uuid::new_v4();

    // fresh conversation: any first input is ignored and we get the plate prompt
    let turn = chatbot.advance(garage_id, ChatState::default(), "").await;
    assert_eq!(turn.state.step, ChatStep::LicensePlate);

    // dashed plate input normalizes to the stored key
    let turn = chatbot.advance(garage_id, turn.state, "1234-5678").await;
    assert_eq!(turn.state.step, ChatStep::ConfirmVehicle);
    assert!(turn.message.contains("Mazda"));
    assert_eq!(turn.state.license_plate.as_deref(), Some("12345678"));

    let turn = chatbot.advance(garage_id, turn.state, "כן").await;
    assert_eq!(turn.state.step, ChatStep::Parts);

    let turn = chatbot
        .advance(garage_id, turn.state, "front bumper, headlight, headlight")
        .await;
    assert_eq!(turn.state.step, ChatStep::ConfirmRequest);
    assert_eq!(
        turn.state.parts.as_deref(),
        Some(&["front bumper".to_string(), "headlight".to_string(), "headlight".to_string()][..])
    );

    let turn = chatbot.advance(garage_id, turn.state, "כן").await;
    assert_eq!(turn.state, ChatState::default());
    assert!(turn.message.contains("בהצלחה"));

    let submitted = intake.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    let (submitted_garage, draft) = &submitted[0];
    assert_eq!(*submitted_garage, garage_id);
    assert_eq!(draft.vehicle.license_plate, "12345678");
    assert_eq!(draft.vehicle.manufacturer, "Mazda");
    assert_eq!(
        draft.parts,
        vec!["front bumper", "headlight", "headlight"]
    );
}

#[tokio::test]
async fn declining_the_summary_discards_the_draft() {
    let intake = RecordingIntake::default();
    let chatbot = ChatbotService::new(TableDirectory::new(), intake.clone());
    let garage_id = Uuid::new_v4();

    let turn = chatbot.advance(garage_id, ChatState::default(), "").await;
    let turn = chatbot.advance(garage_id, turn.state, "12345678").await;
    let turn = chatbot.advance(garage_id, turn.state, "yes").await;
    let turn = chatbot.advance(garage_id, turn.state, "headlight").await;
    assert_eq!(turn.state.step, ChatStep::ConfirmRequest);

    let turn = chatbot.advance(garage_id, turn.state, "לא").await;
    assert_eq!(turn.state, ChatState::default());
    assert!(intake.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejecting_the_vehicle_loops_back_to_plate_entry() {
    let intake = RecordingIntake::default();
    let chatbot = ChatbotService::new(TableDirectory::new(), intake.clone());
    let garage_id = Uuid::new_v4();

    let turn = chatbot.advance(garage_id, ChatState::default(), "").await;
    let turn = chatbot.advance(garage_id, turn.state, "12345678").await;
    assert_eq!(turn.state.step, ChatStep::ConfirmVehicle);

    let turn = chatbot.advance(garage_id, turn.state, "לא").await;
    assert_eq!(turn.state.step, ChatStep::LicensePlate);
    assert!(turn.state.license_plate.is_none());
    assert!(turn.state.vehicle.is_none());

    // the machine accepts a different plate after the rejection
    let turn = chatbot.advance(garage_id, turn.state, "12345678").await;
    assert_eq!(turn.state.step, ChatStep::ConfirmVehicle);
}

#[tokio::test]
async fn empty_parts_input_reprompts_in_place() {
    let intake = RecordingIntake::default();
    let chatbot = ChatbotService::new(TableDirectory::new(), intake.clone());
    let garage_id = Uuid::new_v4();

    let turn = chatbot.advance(garage_id, ChatState::default(), "").await;
    let turn = chatbot.advance(garage_id, turn.state, "12345678").await;
    let turn = chatbot.advance(garage_id, turn.state, "כן").await;
    assert_eq!(turn.state.step, ChatStep::Parts);

    let turn = chatbot.advance(garage_id, turn.state, " , ,").await;
    assert_eq!(turn.state.step, ChatStep::Parts);
    assert!(turn.state.parts.is_none());
}
