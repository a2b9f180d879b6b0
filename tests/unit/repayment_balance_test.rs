#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use helpers::mock_repos::{MockCreditRepository, MockNotificationRepository};
use helpers::test_data;
use sacco_admin::core::AppError;
use sacco_admin::modules::credit::services::CreditService;

fn service_for(repo: Arc<MockCreditRepository>) -> CreditService {
    CreditService::new(repo, Arc::new(MockNotificationRepository::default()))
}

#[tokio::test]
async fn test_repayments_down_to_exact_zero() {
    // 1000 at 10% owes 1100 in total
    let request = test_data::approved_request("member-1", dec!(1000), dec!(10));
    let id = request.id.clone();
    let repo = Arc::new(MockCreditRepository::with_request(request));
    let service = service_for(repo.clone());

    service.repay(&id, "member-1", dec!(600)).await.unwrap();
    service.repay(&id, "member-1", dec!(500)).await.unwrap();

    // The balance is settled; even one more unit is refused
    let err = service.repay(&id, "member-1", dec!(1)).await.unwrap_err();
    match err {
        AppError::InvalidAmount(msg) => assert!(msg.contains("Remaining: 0.00"), "{msg}"),
        other => panic!("expected InvalidAmount, got {other:?}"),
    }
    assert_eq!(repo.repayment_count(), 2);
}

#[tokio::test]
async fn test_overpayment_reports_remaining_balance() {
    let request = test_data::approved_request("member-1", dec!(1000), dec!(10));
    let id = request.id.clone();
    let repo = Arc::new(MockCreditRepository::with_request(request));
    let service = service_for(repo);

    service.repay(&id, "member-1", dec!(600)).await.unwrap();

    let err = service.repay(&id, "member-1", dec!(501)).await.unwrap_err();
    match err {
        AppError::InvalidAmount(msg) => assert!(msg.contains("Remaining: 500.00"), "{msg}"),
        other => panic!("expected InvalidAmount, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_positive_amount_fails_regardless_of_state() {
    let pending = test_data::pending_request("member-1", dec!(1000), dec!(10));
    let pending_id = pending.id.clone();
    let repo = Arc::new(MockCreditRepository::with_request(pending));
    let service = service_for(repo);

    // Checked before the request is even fetched
    for id in [pending_id.as_str(), "does-not-exist"] {
        for amount in [Decimal::ZERO, dec!(-5)] {
            let err = service.repay(id, "member-1", amount).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidAmount(_)));
        }
    }
}

#[tokio::test]
async fn test_foreign_request_reads_as_absent() {
    let request = test_data::approved_request("member-1", dec!(1000), dec!(10));
    let id = request.id.clone();
    let repo = Arc::new(MockCreditRepository::with_request(request));
    let service = service_for(repo);

    let err = service.repay(&id, "member-2", dec!(100)).await.unwrap_err();

    // Same error as a missing request; ownership is not disclosed
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_only_approved_requests_accept_repayments() {
    let request = test_data::pending_request("member-1", dec!(1000), dec!(10));
    let id = request.id.clone();
    let repo = Arc::new(MockCreditRepository::with_request(request));
    let service = service_for(repo);

    let err = service.repay(&id, "member-1", dec!(100)).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidState(_)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Accepted repayments never sum past the total owed, whatever the
    /// sequence of attempts looks like.
    #[test]
    fn prop_accepted_repayments_never_exceed_total_owed(
        amounts in prop::collection::vec(1u32..1500, 1..10)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let request = test_data::approved_request("member-1", dec!(1000), dec!(10));
            let id = request.id.clone();
            let repo = Arc::new(MockCreditRepository::with_request(request));
            let service = service_for(repo);

            let mut accepted = Decimal::ZERO;
            for amount in amounts {
                let amount = Decimal::from(amount);
                if service.repay(&id, "member-1", amount).await.is_ok() {
                    accepted += amount;
                }
            }

            prop_assert!(accepted <= dec!(1100));
            Ok(())
        })?;
    }
}
