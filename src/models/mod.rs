pub mod chat;
pub mod offer;
pub mod preference;
pub mod request;
pub mod user;
pub mod vehicle;

pub use chat::*;
pub use offer::*;
pub use preference::*;
pub use request::*;
pub use user::*;
pub use vehicle::*;
