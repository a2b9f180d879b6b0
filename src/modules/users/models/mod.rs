pub mod detail;
pub mod user;

pub use detail::{CreditRequestWithRepayments, UserDetailResponse};
pub use user::{
    ChangePasswordRequest, UpdateProfileRequest, UpdateStatusRequest, User, UserProfile,
    UserRole, UserStatus, UserSummary,
};
