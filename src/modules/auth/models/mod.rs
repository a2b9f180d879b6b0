pub mod session;

pub use session::{
    Claims, LoginRequest, NewRefreshToken, RefreshRequest, RefreshTokenRecord, SessionContext,
    SessionResponse,
};
