pub mod auth;
pub mod request_id;

pub use auth::{AdminUser, AuthUser, JwtAuth};
pub use request_id::RequestId;
