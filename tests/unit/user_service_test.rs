#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use rust_decimal_macros::dec;

use helpers::mock_repos::{
    MockCreditRepository, MockNotificationRepository, MockTokenRepository, MockUserRepository,
};
use helpers::test_data;
use sacco_admin::core::AppError;
use sacco_admin::modules::auth::services::token_service;
use sacco_admin::modules::users::models::{
    ChangePasswordRequest, UpdateProfileRequest, UserStatus,
};
use sacco_admin::modules::users::services::UserService;

struct Fixture {
    users: Arc<MockUserRepository>,
    credit: Arc<MockCreditRepository>,
    outbox: Arc<MockNotificationRepository>,
    service: UserService,
}

fn fixture() -> Fixture {
    let users = Arc::new(MockUserRepository::default());
    let credit = Arc::new(MockCreditRepository::default());
    let tokens = Arc::new(MockTokenRepository::default());
    let outbox = Arc::new(MockNotificationRepository::default());
    let service = UserService::new(
        users.clone(),
        credit.clone(),
        tokens.clone(),
        outbox.clone(),
    );
    Fixture {
        users,
        credit,
        outbox,
        service,
    }
}

#[tokio::test]
async fn test_update_profile_rejects_taken_phone_number() {
    let f = fixture();
    f.users.insert_user(test_data::member("member-1", "password1"));
    let mut other = test_data::member("member-2", "password2");
    other.phone_number = "+254700111222".to_string();
    f.users.insert_user(other);

    let err = f
        .service
        .update_profile(
            "member-1",
            UpdateProfileRequest {
                first_name: None,
                last_name: None,
                phone_number: Some("+254700111222".to_string()),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_update_profile_keeps_own_phone_number() {
    let f = fixture();
    let user = test_data::member("member-1", "password1");
    let phone = user.phone_number.clone();
    f.users.insert_user(user);

    let profile = f
        .service
        .update_profile(
            "member-1",
            UpdateProfileRequest {
                first_name: Some("Amina".to_string()),
                last_name: None,
                phone_number: Some(phone.clone()),
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.first_name, "Amina");
    assert_eq!(profile.phone_number, phone);
}

#[tokio::test]
async fn test_change_password_requires_correct_current_password() {
    let f = fixture();
    f.users.insert_user(test_data::member("member-1", "password1"));

    let err = f
        .service
        .change_password(
            "member-1",
            ChangePasswordRequest {
                current_password: "not-it".to_string(),
                new_password: "fresh-password".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_change_password_enforces_minimum_length() {
    let f = fixture();
    f.users.insert_user(test_data::member("member-1", "password1"));

    let err = f
        .service
        .change_password(
            "member-1",
            ChangePasswordRequest {
                current_password: "password1".to_string(),
                new_password: "short".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_change_password_rotates_hash_and_notifies() {
    let f = fixture();
    f.users.insert_user(test_data::member("member-1", "password1"));

    f.service
        .change_password(
            "member-1",
            ChangePasswordRequest {
                current_password: "password1".to_string(),
                new_password: "fresh-password".to_string(),
            },
        )
        .await
        .unwrap();

    let stored = f.users.user("member-1").unwrap();
    assert!(token_service::verify_password("fresh-password", &stored.password_hash).unwrap());
    assert!(!token_service::verify_password("password1", &stored.password_hash).unwrap());
    assert_eq!(f.outbox.titles(), vec!["Password changed"]);
}

#[tokio::test]
async fn test_change_password_survives_outbox_failure() {
    let f = fixture();
    f.users.insert_user(test_data::member("member-1", "password1"));
    f.outbox.fail_enqueue.store(true, Ordering::SeqCst);

    f.service
        .change_password(
            "member-1",
            ChangePasswordRequest {
                current_password: "password1".to_string(),
                new_password: "fresh-password".to_string(),
            },
        )
        .await
        .unwrap();

    let stored = f.users.user("member-1").unwrap();
    assert!(token_service::verify_password("fresh-password", &stored.password_hash).unwrap());
}

#[tokio::test]
async fn test_soft_delete_flips_status_only() {
    let f = fixture();
    f.users.insert_user(test_data::member("member-1", "password1"));

    f.service.soft_delete("member-1").await.unwrap();

    let stored = f.users.user("member-1").unwrap();
    assert_eq!(stored.status, UserStatus::Deleted);
}

#[tokio::test]
async fn test_update_status_validates_the_value() {
    let f = fixture();
    f.users.insert_user(test_data::member("member-1", "password1"));

    let err = f
        .service
        .update_status("member-1", "banned")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let profile = f
        .service
        .update_status("member-1", "suspended")
        .await
        .unwrap();
    assert_eq!(profile.status, UserStatus::Suspended);
}

#[tokio::test]
async fn test_operations_on_missing_user() {
    let f = fixture();

    assert!(matches!(
        f.service.get_profile("ghost").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        f.service.soft_delete("ghost").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        f.service.user_details("ghost").await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_user_details_composes_credit_history() {
    let f = fixture();
    f.users.insert_user(test_data::member("member-1", "password1"));
    f.credit
        .insert_request(test_data::approved_request("member-1", dec!(1000), dec!(10)));
    f.credit
        .insert_request(test_data::pending_request("member-1", dec!(200), dec!(10)));
    f.credit
        .insert_request(test_data::pending_request("member-2", dec!(300), dec!(10)));

    let details = f.service.user_details("member-1").await.unwrap();

    assert_eq!(details.profile.id, "member-1");
    assert_eq!(details.credit_requests.len(), 2);
    assert_eq!(details.credit_summary.pending, 1);
    assert_eq!(details.credit_summary.approved, 1);
    assert_eq!(details.active_sessions, 0);
    assert!(details.last_login.is_none());
    assert!(details.savings_account.is_none());
}
