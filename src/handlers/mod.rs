pub mod auth;
pub mod chat;
pub mod garage_requests;
pub mod offers;
pub mod preferences;
pub mod supplier_requests;
pub mod vehicles;
