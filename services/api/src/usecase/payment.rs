use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use lms_domain::payment::PaymentStatus;
use lms_domain::subscription::{STATUS_ACTIVE, SubscriptionRef};

use crate::domain::ports::PaymentProvider;
use crate::domain::repository::{PaymentRepository, UserRepository};
use crate::domain::signature::verify_subscription_signature;
use crate::domain::types::{PaymentRecord, User};
use crate::error::ApiError;

/// Default and upper bound for `GET /payments?count=`.
pub const DEFAULT_PAYMENTS_COUNT: u32 = 10;
pub const MAX_PAYMENTS_COUNT: u32 = 100;

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<R: UserRepository> {
    pub repo: R,
    pub provider: Arc<dyn PaymentProvider>,
}

impl<R: UserRepository> SubscribeUseCase<R> {
    /// Create a provider subscription and mirror it on the user. Returns its id.
    pub async fn execute(&self, user: &User) -> Result<String, ApiError> {
        if user.is_admin() {
            return Err(ApiError::Forbidden("admin cannot purchase a subscription"));
        }
        let subscription = self
            .provider
            .create_subscription()
            .await
            .map_err(ApiError::Provider)?;
        self.repo
            .set_subscription(
                user.id,
                &SubscriptionRef::new(subscription.id.clone(), subscription.status),
            )
            .await?;
        tracing::info!(user_id = %user.id, subscription_id = %subscription.id, "subscription created");
        Ok(subscription.id)
    }
}

// ── Verify ───────────────────────────────────────────────────────────────────

pub struct VerifyPaymentInput {
    pub razorpay_payment_id: String,
    pub razorpay_subscription_id: String,
    pub razorpay_signature: String,
}

pub struct VerifyPaymentUseCase<U: UserRepository, P: PaymentRepository> {
    pub users: U,
    pub payments: P,
    /// Shared secret the provider signs checkout callbacks with.
    pub secret: String,
    pub amount: i32,
}

impl<U: UserRepository, P: PaymentRepository> VerifyPaymentUseCase<U, P> {
    /// Check the checkout signature. Exactly one payment record is written per
    /// call that reaches the check, whether or not the signature matches.
    pub async fn execute(&self, user: &User, input: VerifyPaymentInput) -> Result<(), ApiError> {
        if input.razorpay_payment_id.is_empty()
            || input.razorpay_subscription_id.is_empty()
            || input.razorpay_signature.is_empty()
        {
            return Err(ApiError::validation("all fields are required"));
        }
        let matched = verify_subscription_signature(
            &self.secret,
            &input.razorpay_payment_id,
            &input.razorpay_subscription_id,
            &input.razorpay_signature,
        );
        let record = PaymentRecord {
            id: Uuid::now_v7(),
            user_id: user.id,
            razorpay_payment_id: input.razorpay_payment_id,
            razorpay_subscription_id: input.razorpay_subscription_id,
            razorpay_signature: input.razorpay_signature,
            amount: self.amount,
            status: if matched {
                PaymentStatus::Successful
            } else {
                PaymentStatus::Failed
            },
            created_at: Utc::now(),
        };
        self.payments.create(&record).await?;

        if !matched {
            tracing::warn!(user_id = %user.id, payment_id = %record.razorpay_payment_id, "payment signature mismatch");
            return Err(ApiError::SignatureMismatch);
        }
        self.users
            .set_subscription(
                user.id,
                &SubscriptionRef::new(record.razorpay_subscription_id, STATUS_ACTIVE),
            )
            .await
    }
}

// ── Cancel ───────────────────────────────────────────────────────────────────

pub struct CancelSubscriptionUseCase<R: UserRepository> {
    pub repo: R,
    pub provider: Arc<dyn PaymentProvider>,
}

impl<R: UserRepository> CancelSubscriptionUseCase<R> {
    pub async fn execute(&self, user: &User) -> Result<(), ApiError> {
        if user.is_admin() {
            return Err(ApiError::Forbidden("admin cannot cancel subscription"));
        }
        let subscription_id = user
            .subscription
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::NoActiveSubscription)?;
        let cancelled = self
            .provider
            .cancel_subscription(subscription_id)
            .await
            .map_err(ApiError::Provider)?;
        self.repo
            .set_subscription(
                user.id,
                &SubscriptionRef::new(subscription_id, cancelled.status),
            )
            .await?;
        tracing::info!(user_id = %user.id, %subscription_id, "subscription cancelled");
        Ok(())
    }
}

// ── ListPayments ─────────────────────────────────────────────────────────────

pub struct ListPaymentsUseCase {
    pub provider: Arc<dyn PaymentProvider>,
}

impl ListPaymentsUseCase {
    pub async fn execute(&self, count: Option<u32>) -> Result<serde_json::Value, ApiError> {
        let count = count
            .unwrap_or(DEFAULT_PAYMENTS_COUNT)
            .clamp(1, MAX_PAYMENTS_COUNT);
        self.provider
            .list_subscriptions(count)
            .await
            .map_err(ApiError::Provider)
    }
}
