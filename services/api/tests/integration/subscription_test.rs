use std::sync::Arc;

use lms_api::domain::signature::subscription_signature;
use lms_api::error::ApiError;
use lms_api::usecase::contact::{ContactInput, ContactUseCase};
use lms_api::usecase::payment::{
    CancelSubscriptionUseCase, ListPaymentsUseCase, SubscribeUseCase, VerifyPaymentInput,
    VerifyPaymentUseCase,
};
use lms_api::usecase::stats::UserStatsUseCase;
use lms_domain::payment::PaymentStatus;
use lms_domain::subscription::{STATUS_CANCELLED, STATUS_CREATED, SubscriptionRef};
use lms_domain::user::Role;

use crate::helpers::{
    FakeMailer, FakePaymentProvider, MockPaymentRepo, MockUserRepo, TEST_PAYMENT_SECRET,
    test_user,
};

// ── Subscribe ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_subscription_and_mirror_it() {
    let user = test_user(Role::User);
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();
    let provider = Arc::new(FakePaymentProvider::default());

    let id = SubscribeUseCase {
        repo,
        provider: provider.clone(),
    }
    .execute(&user)
    .await
    .unwrap();

    assert_eq!(id, "sub_test_1");
    assert_eq!(
        users.lock().unwrap()[0].subscription,
        SubscriptionRef::new("sub_test_1", STATUS_CREATED)
    );
}

#[tokio::test]
async fn should_forbid_admin_subscribe_and_cancel_regardless_of_state() {
    let provider = Arc::new(FakePaymentProvider::default());
    let mut subscribed_admin = test_user(Role::Admin);
    subscribed_admin.subscription = SubscriptionRef::new("sub_1", "active");

    for admin in [test_user(Role::Admin), subscribed_admin] {
        let repo = MockUserRepo::new(vec![admin.clone()]);
        let subscribe = SubscribeUseCase {
            repo: repo.clone(),
            provider: provider.clone(),
        }
        .execute(&admin)
        .await;
        let cancel = CancelSubscriptionUseCase {
            repo,
            provider: provider.clone(),
        }
        .execute(&admin)
        .await;

        assert!(matches!(subscribe, Err(ApiError::Forbidden(_))));
        assert!(matches!(cancel, Err(ApiError::Forbidden(_))));
    }
    assert!(provider.created.lock().unwrap().is_empty());
    assert!(provider.cancelled.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_surface_provider_failure_on_subscribe() {
    let user = test_user(Role::User);
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();

    let result = SubscribeUseCase {
        repo,
        provider: Arc::new(FakePaymentProvider::failing()),
    }
    .execute(&user)
    .await;

    assert!(matches!(result, Err(ApiError::Provider(_))));
    assert!(users.lock().unwrap()[0].subscription.id.is_none());
}

// ── Verify ───────────────────────────────────────────────────────────────────

fn verify_usecase(
    users: MockUserRepo,
    payments: MockPaymentRepo,
) -> VerifyPaymentUseCase<MockUserRepo, MockPaymentRepo> {
    VerifyPaymentUseCase {
        users,
        payments,
        secret: TEST_PAYMENT_SECRET.to_owned(),
        amount: 499,
    }
}

#[tokio::test]
async fn should_activate_subscription_on_valid_signature() {
    let mut user = test_user(Role::User);
    user.subscription = SubscriptionRef::new("sub_abc", STATUS_CREATED);
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();
    let payments = MockPaymentRepo::default();
    let records = payments.records_handle();

    verify_usecase(repo, payments)
        .execute(
            &user,
            VerifyPaymentInput {
                razorpay_payment_id: "pay_123".to_owned(),
                razorpay_subscription_id: "sub_abc".to_owned(),
                razorpay_signature: subscription_signature(TEST_PAYMENT_SECRET, "pay_123", "sub_abc"),
            },
        )
        .await
        .unwrap();

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, PaymentStatus::Successful);
    assert_eq!(records[0].amount, 499);
    assert!(users.lock().unwrap()[0].subscription.is_active());
}

#[tokio::test]
async fn should_record_failed_payment_on_signature_mismatch() {
    let mut user = test_user(Role::User);
    user.subscription = SubscriptionRef::new("sub_abc", STATUS_CREATED);
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();
    let payments = MockPaymentRepo::default();
    let records = payments.records_handle();

    let result = verify_usecase(repo, payments)
        .execute(
            &user,
            VerifyPaymentInput {
                razorpay_payment_id: "pay_123".to_owned(),
                razorpay_subscription_id: "sub_abc".to_owned(),
                razorpay_signature: subscription_signature("wrong-secret", "pay_123", "sub_abc"),
            },
        )
        .await;

    assert!(matches!(result, Err(ApiError::SignatureMismatch)));
    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, PaymentStatus::Failed);
    assert_eq!(
        users.lock().unwrap()[0].subscription,
        SubscriptionRef::new("sub_abc", STATUS_CREATED)
    );
}

#[tokio::test]
async fn should_not_record_payment_for_incomplete_input() {
    let user = test_user(Role::User);
    let payments = MockPaymentRepo::default();
    let records = payments.records_handle();

    let result = verify_usecase(MockUserRepo::new(vec![user.clone()]), payments)
        .execute(
            &user,
            VerifyPaymentInput {
                razorpay_payment_id: "pay_123".to_owned(),
                razorpay_subscription_id: String::new(),
                razorpay_signature: "abc".to_owned(),
            },
        )
        .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert!(records.lock().unwrap().is_empty());
}

// ── Cancel ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_cancel_subscription_and_mirror_status() {
    let mut user = test_user(Role::User);
    user.subscription = SubscriptionRef::new("sub_abc", "active");
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();
    let provider = Arc::new(FakePaymentProvider::default());

    CancelSubscriptionUseCase {
        repo,
        provider: provider.clone(),
    }
    .execute(&user)
    .await
    .unwrap();

    assert_eq!(provider.cancelled.lock().unwrap().clone(), vec!["sub_abc"]);
    assert_eq!(
        users.lock().unwrap()[0].subscription,
        SubscriptionRef::new("sub_abc", STATUS_CANCELLED)
    );
}

#[tokio::test]
async fn should_reject_cancel_without_subscription() {
    let user = test_user(Role::User);
    let result = CancelSubscriptionUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
        provider: Arc::new(FakePaymentProvider::default()),
    }
    .execute(&user)
    .await;

    assert!(matches!(result, Err(ApiError::NoActiveSubscription)));
}

// ── ListPayments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_clamp_payment_listing_count() {
    let provider = Arc::new(FakePaymentProvider::default());
    let usecase = ListPaymentsUseCase {
        provider: provider.clone(),
    };

    usecase.execute(None).await.unwrap();
    usecase.execute(Some(0)).await.unwrap();
    usecase.execute(Some(5000)).await.unwrap();

    assert_eq!(provider.listed.lock().unwrap().clone(), vec![10, 1, 100]);
}

// ── Stats ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_count_all_and_active_subscribers() {
    let mut active = test_user(Role::User);
    active.subscription = SubscriptionRef::new("sub_1", "active");
    let mut cancelled = test_user(Role::User);
    cancelled.subscription = SubscriptionRef::new("sub_2", STATUS_CANCELLED);
    let usecase = UserStatsUseCase {
        repo: MockUserRepo::new(vec![active, cancelled, test_user(Role::Admin)]),
    };

    let stats = usecase.execute().await.unwrap();
    assert_eq!(stats.all_user_count, 3);
    assert_eq!(stats.subscribed_users_count, 1);
}

// ── Contact ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forward_contact_message() {
    let mailer = Arc::new(FakeMailer::default());
    ContactUseCase {
        mailer: mailer.clone(),
        recipient: "support@lms.test".to_owned(),
    }
    .execute(ContactInput {
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        message: "Hello there".to_owned(),
    })
    .await
    .unwrap();

    let sent = mailer.last().unwrap();
    assert_eq!(sent.to, "support@lms.test");
    assert_eq!(sent.reply_to.as_deref(), Some("ada@example.com"));
    assert!(sent.body.contains("Hello there"));
}

#[tokio::test]
async fn should_report_contact_mail_failure() {
    let result = ContactUseCase {
        mailer: Arc::new(FakeMailer::failing()),
        recipient: "support@lms.test".to_owned(),
    }
    .execute(ContactInput {
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        message: "Hello there".to_owned(),
    })
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, ApiError::Mail(_)));
    assert_eq!(err.to_string(), "error sending message");
}
