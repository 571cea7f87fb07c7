use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::access::{AdminUser, CurrentUser};
use crate::error::ApiError;
use crate::handlers::MessageResponse;
use crate::handlers::form::ApiJson;
use crate::state::AppState;
use crate::usecase::payment::{
    CancelSubscriptionUseCase, ListPaymentsUseCase, SubscribeUseCase, VerifyPaymentInput,
    VerifyPaymentUseCase,
};

// ── GET /payments/razorpay-key ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct KeyResponse {
    pub success: bool,
    pub message: &'static str,
    pub key: String,
}

pub async fn get_razorpay_key(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Json<KeyResponse> {
    Json(KeyResponse {
        success: true,
        message: "Razorpay API key",
        key: state.payments.key_id().to_owned(),
    })
}

// ── POST /payments/subscribe ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: &'static str,
    pub subscription_id: String,
}

pub async fn subscribe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let usecase = SubscribeUseCase {
        repo: state.user_repo(),
        provider: state.payments.clone(),
    };
    let subscription_id = usecase.execute(&user).await?;
    Ok(Json(SubscribeResponse {
        success: true,
        message: "Subscribed successfully",
        subscription_id,
    }))
}

// ── POST /payments/verify ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_subscription_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
}

pub async fn verify_subscription(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = VerifyPaymentUseCase {
        users: state.user_repo(),
        payments: state.payment_repo(),
        secret: state.payment_secret.clone(),
        amount: state.subscription_amount,
    };
    usecase
        .execute(
            &user,
            VerifyPaymentInput {
                razorpay_payment_id: body.razorpay_payment_id,
                razorpay_subscription_id: body.razorpay_subscription_id,
                razorpay_signature: body.razorpay_signature,
            },
        )
        .await?;
    Ok(Json(MessageResponse::ok("Payment verified successfully")))
}

// ── POST /payments/unsubscribe ───────────────────────────────────────────────

pub async fn cancel_subscription(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = CancelSubscriptionUseCase {
        repo: state.user_repo(),
        provider: state.payments.clone(),
    };
    usecase.execute(&user).await?;
    Ok(Json(MessageResponse::ok("Subscription cancelled successfully")))
}

// ── GET /payments ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListPaymentsQuery {
    pub count: Option<String>,
}

#[derive(Serialize)]
pub struct PaymentsResponse {
    pub success: bool,
    pub message: &'static str,
    pub subscriptions: serde_json::Value,
}

pub async fn list_payments(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<PaymentsResponse>, ApiError> {
    // Unparseable counts fall back to the default page size.
    let count = query.count.and_then(|c| c.trim().parse::<u32>().ok());
    let usecase = ListPaymentsUseCase {
        provider: state.payments.clone(),
    };
    let subscriptions = usecase.execute(count).await?;
    Ok(Json(PaymentsResponse {
        success: true,
        message: "All payments",
        subscriptions,
    }))
}
