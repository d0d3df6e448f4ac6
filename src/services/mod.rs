pub mod auth_service;
pub mod chatbot_service;
pub mod matching_service;
pub mod notification_service;
pub mod offer_service;
pub mod request_service;
pub mod vehicle_directory;
pub mod whatsapp_service;

pub use auth_service::*;
pub use chatbot_service::*;
pub use matching_service::*;
pub use notification_service::*;
pub use offer_service::*;
pub use request_service::*;
pub use vehicle_directory::*;
pub use whatsapp_service::*;
