//! Intake conversation: a strictly turn-based state machine that walks a
//! garage from license plate to a submitted parts request.
//!
//! State is round-tripped through the caller on every turn; nothing is kept
//! server-side between turns. Every transition is a pure function of
//! (state, input, lookup outcome) except the final affirmative confirmation,
//! which submits the draft.

use async_trait::async_trait;
use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::chat::{ChatState, ChatStep, ChatTurn};
use crate::models::request::PartsRequest;
use crate::models::vehicle::VehicleData;
use crate::services::vehicle_directory::VehicleDirectory;
use crate::utils::validation::{is_valid_plate, normalize_plate};

/// Where a confirmed draft goes. Implemented by `RequestService`; tests
/// substitute a stub.
#[async_trait]
pub trait RequestIntake: Send + Sync {
    async fn submit(&self, garage_id: Uuid, draft: RequestDraft) -> Result<PartsRequest>;
}

/// A fully collected conversation draft, ready for submission.
#[derive(Debug, Clone)]
pub struct RequestDraft {
    pub vehicle: VehicleData,
    pub parts: Vec<String>,
}

/// Literal tokens treated as a "yes". Anything else is a no.
const AFFIRMATIVE_TOKENS: [&str; 2] = ["כן", "yes"];

pub fn is_affirmative(input: &str) -> bool {
    let lowered = input.to_lowercase();
    AFFIRMATIVE_TOKENS.iter().any(|token| lowered.contains(token))
}

/// Comma-separated parts list: trim entries, drop empties, keep order and
/// duplicates.
pub fn parse_parts(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

pub struct ChatbotService<D, I> {
    directory: D,
    intake: I,
}

impl<D: VehicleDirectory, I: RequestIntake> ChatbotService<D, I> {
    pub fn new(directory: D, intake: I) -> Self {
        Self { directory, intake }
    }

    /// Advance the conversation one turn. Never fails: a failed submission
    /// becomes a failure message and a reset, so the caller-visible state is
    /// always well-defined.
    pub async fn advance(&self, garage_id: Uuid, state: ChatState, input: &str) -> ChatTurn {
        let mut state = state;

        match state.step {
            ChatStep::Welcome => {
                state.step = ChatStep::LicensePlate;
                ChatTurn {
                    message: "👋 שלום! אני כאן לעזור לך לפתוח בקשה לחלקי חילוף.\n\nאנא הזן מספר רישוי:".to_string(),
                    state,
                }
            }

            ChatStep::LicensePlate => {
                let plate = normalize_plate(input);
                if !is_valid_plate(&plate) {
                    return ChatTurn {
                        message: "❌ מספר רישוי לא תקין. אנא הזן מספר רישוי בן 7-8 ספרות:".to_string(),
                        state,
                    };
                }

                match self.directory.lookup(&plate).await {
                    Some(vehicle) => {
                        let message = vehicle_found_message(&vehicle);
                        state.license_plate = Some(plate);
                        state.vehicle = Some(vehicle);
                        state.step = ChatStep::ConfirmVehicle;
                        ChatTurn { message, state }
                    }
                    None => ChatTurn {
                        message: "❌ לא מצאתי רכב עם מספר רישוי זה. אנא בדוק את המספר ונסה שוב:".to_string(),
                        state,
                    },
                }
            }

            ChatStep::ConfirmVehicle => {
                if is_affirmative(input) {
                    state.step = ChatStep::Parts;
                    ChatTurn {
                        message: "✅ מעולה!\n\nאנא הזן את רשימת החלקים הנדרשים (מופרדים בפסיק):".to_string(),
                        state,
                    }
                } else {
                    state.license_plate = None;
                    state.vehicle = None;
                    state.step = ChatStep::LicensePlate;
                    ChatTurn {
                        message: "אנא הזן מספר רישוי חדש:".to_string(),
                        state,
                    }
                }
            }

            ChatStep::Parts => {
                let parts = parse_parts(input);
                if parts.is_empty() {
                    return ChatTurn {
                        message: "❌ אנא הזן לפחות חלק אחד:".to_string(),
                        state,
                    };
                }

                let message = request_summary_message(state.vehicle.as_ref(), &parts);
                state.parts = Some(parts);
                state.step = ChatStep::ConfirmRequest;
                ChatTurn { message, state }
            }

            ChatStep::ConfirmRequest => {
                if !is_affirmative(input) {
                    return ChatTurn {
                        message: "הבקשה בוטלה. תוכל להתחיל מחדש.".to_string(),
                        state: ChatState::default(),
                    };
                }

                let draft = match (state.vehicle.take(), state.parts.take()) {
                    (Some(vehicle), Some(parts)) => RequestDraft { vehicle, parts },
                    _ => {
                        // a state this malformed cannot have come from this
                        // machine; start over
                        return ChatTurn {
                            message: "❌ אירעה שגיאה ביצירת הבקשה. אנא נסה שוב מאוחר יותר.".to_string(),
                            state: ChatState::default(),
                        };
                    }
                };

                match self.intake.submit(garage_id, draft).await {
                    Ok(request) => ChatTurn {
                        message: format!(
                            "✅ הבקשה נשלחה בהצלחה! מספר בקשה: {}\nתקבל עדכונים על הצעות דרך WhatsApp.",
                            short_id(request.id)
                        ),
                        state: ChatState::default(),
                    },
                    Err(err) => {
                        tracing::error!("Chat request submission failed: {:?}", err);
                        ChatTurn {
                            message: "❌ אירעה שגיאה ביצירת הבקשה. אנא נסה שוב מאוחר יותר.".to_string(),
                            state: ChatState::default(),
                        }
                    }
                }
            }
        }
    }
}

fn vehicle_found_message(vehicle: &VehicleData) -> String {
    let mut message = format!(
        "🔍 מצאתי רכב:\nיצרן: {}\nדגם: {}",
        vehicle.manufacturer, vehicle.model
    );
    if let Some(year) = vehicle.year {
        message.push_str(&format!("\nשנה: {}", year));
    }
    message.push_str("\n\nהאם זה נכון? (כן/לא)");
    message
}

fn request_summary_message(vehicle: Option<&VehicleData>, parts: &[String]) -> String {
    let vehicle_line = vehicle
        .map(|v| format!("{} {}", v.manufacturer, v.model))
        .unwrap_or_default();
    format!(
        "📋 סיכום הבקשה:\nרכב: {}\nחלקים: {}\n\nלאשר ולשלוח? (כן/לא)",
        vehicle_line,
        parts.join(", ")
    )
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::error_handling::AppError;
    use crate::models::request::RequestStatus;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StubDirectory {
        vehicles: HashMap<String, VehicleData>,
    }

    impl StubDirectory {
        fn with_mazda() -> Self {
            let mut vehicles = HashMap::new();
            vehicles.insert(
                "1234567".to_string(),
                VehicleData {
                    license_plate: "1234567".to_string(),
                    manufacturer: "Mazda".to_string(),
                    model: "3".to_string(),
                    year: Some(2018),
                },
            );
            Self { vehicles }
        }
    }

    #[async_trait]
    impl VehicleDirectory for StubDirectory {
        async fn lookup(&self, plate: &str) -> Option<VehicleData> {
            self.vehicles.get(plate).cloned()
        }
    }

    #[derive(Default)]
    struct StubIntake {
        submitted: Mutex<Vec<RequestDraft>>,
        fail: bool,
    }

    #[async_trait]
    impl RequestIntake for StubIntake {
        async fn submit(&self, garage_id: Uuid, draft: RequestDraft) -> Result<PartsRequest> {
            if self.fail {
                return Err(AppError::Conflict);
            }
            let parts = draft.parts.clone();
            self.submitted.lock().unwrap().push(draft);
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

    fn service(fail: bool) -> ChatbotService<StubDirectory, StubIntake> {
        ChatbotService::new(
            StubDirectory::with_mazda(),
            StubIntake {
                fail,
                ..Default::default()
            },
        )
    }

    fn plate_state() -> ChatState {
        ChatState {
            step: ChatStep::LicensePlate,
            ..ChatState::default()
        }
    }

    #[test]
    fn affirmative_tokens_are_substring_matched() {
        assert!(is_affirmative("כן"));
        assert!(is_affirmative("כן, בבקשה"));
        assert!(is_affirmative("YES"));
        assert!(!is_affirmative("לא"));
        assert!(!is_affirmative("maybe"));
    }

    #[test]
    fn parts_parsing_keeps_order_and_duplicates() {
        assert_eq!(
            parse_parts("front bumper, headlight, headlight"),
            vec!["front bumper", "headlight", "headlight"]
        );
        assert_eq!(parse_parts(" , ,"), Vec::<String>::new());
    }

    #[tokio::test]
    async fn valid_plate_moves_to_vehicle_confirmation() {
        let turn = service(false)
            .advance(Uuid::new_v4(), plate_state(), "1234567")
            .await;

        assert_eq!(turn.state.step, ChatStep::ConfirmVehicle);
        assert!(turn.message.contains("Mazda"));
        assert!(turn.message.contains("3"));
        assert!(turn.message.contains("2018"));
    }

    #[tokio::test]
    async fn short_plate_stays_with_format_prompt() {
        let turn = service(false)
            .advance(Uuid::new_v4(), plate_state(), "123456")
            .await;

        assert_eq!(turn.state.step, ChatStep::LicensePlate);
        assert!(turn.message.contains("7-8"));
    }

    #[tokio::test]
    async fn unknown_plate_stays_with_retry_prompt() {
        let turn = service(false)
            .advance(Uuid::new_v4(), plate_state(), "7654321")
            .await;

        assert_eq!(turn.state.step, ChatStep::LicensePlate);
        assert!(turn.state.vehicle.is_none());
    }

    #[tokio::test]
    async fn same_plate_twice_yields_the_same_summary() {
        let svc = service(false);
        let first = svc.advance(Uuid::new_v4(), plate_state(), "1234567").await;
        let second = svc.advance(Uuid::new_v4(), plate_state(), "1234567").await;
        assert_eq!(first.message, second.message);
    }

    #[tokio::test]
    async fn dashed_plate_resolves_like_plain_plate() {
        let svc = service(false);
        let dashed = svc.advance(Uuid::new_v4(), plate_state(), "123-4567").await;
        let plain = svc.advance(Uuid::new_v4(), plate_state(), "1234567").await;
        assert_eq!(dashed.state.license_plate, plain.state.license_plate);
        assert_eq!(dashed.message, plain.message);
    }

    #[tokio::test]
    async fn negative_vehicle_confirmation_clears_the_draft() {
        let state = ChatState {
            step: ChatStep::ConfirmVehicle,
            license_plate: Some("1234567".to_string()),
            vehicle: Some(VehicleData {
                license_plate: "1234567".to_string(),
                manufacturer: "Mazda".to_string(),
                model: "3".to_string(),
                year: Some(2018),
            }),
            parts: None,
        };

        let turn = service(false).advance(Uuid::new_v4(), state, "לא").await;
        assert_eq!(turn.state.step, ChatStep::LicensePlate);
        assert!(turn.state.license_plate.is_none());
        assert!(turn.state.vehicle.is_none());
    }

    #[tokio::test]
    async fn negative_final_confirmation_discards_without_submitting() {
        let svc = service(false);
        let state = ChatState {
            step: ChatStep::ConfirmRequest,
            license_plate: Some("1234567".to_string()),
            vehicle: Some(VehicleData {
                license_plate: "1234567".to_string(),
                manufacturer: "Mazda".to_string(),
                model: "3".to_string(),
                year: Some(2018),
            }),
            parts: Some(vec!["headlight".to_string()]),
        };

        let turn = svc.advance(Uuid::new_v4(), state, "לא").await;
        assert_eq!(turn.state, ChatState::default());
        assert!(svc.intake.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_submission_reports_and_resets() {
        let state = ChatState {
            step: ChatStep::ConfirmRequest,
            license_plate: Some("1234567".to_string()),
            vehicle: Some(VehicleData {
                license_plate: "1234567".to_string(),
                manufacturer: "Mazda".to_string(),
                model: "3".to_string(),
                year: Some(2018),
            }),
            parts: Some(vec!["headlight".to_string()]),
        };

        let turn = service(true).advance(Uuid::new_v4(), state, "כן").await;
        assert_eq!(turn.state, ChatState::default());
        assert!(turn.message.contains("שגיאה"));
    }
}
