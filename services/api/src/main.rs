use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use lms_api::config::ApiConfig;
use lms_api::infra::cloudinary::CloudinaryAssetStore;
use lms_api::infra::mail::SmtpMailer;
use lms_api::infra::razorpay::RazorpayProvider;
use lms_api::router::build_router;
use lms_api::state::AppState;

#[tokio::main]
async fn main() {
    lms_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let assets = CloudinaryAssetStore::new(
        config.cloudinary_cloud_name,
        config.cloudinary_api_key,
        config.cloudinary_api_secret,
    );
    let payments = RazorpayProvider::new(
        config.razorpay_key_id,
        config.razorpay_secret.clone(),
        config.razorpay_plan_id,
    );
    let mailer = SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        config.smtp_username,
        config.smtp_password,
        config.smtp_from_email,
    )
    .expect("failed to build SMTP transport");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        jwt_expiry_secs: config.jwt_expiry_secs,
        cookie_domain: config.cookie_domain,
        frontend_url: config.frontend_url,
        cors_origins: config.cors_origins,
        contact_us_email: config.contact_us_email,
        payment_secret: config.razorpay_secret,
        subscription_amount: config.subscription_amount,
        lectures_require_subscription: config.lectures_require_subscription,
        assets: Arc::new(assets),
        payments: Arc::new(payments),
        mailer: Arc::new(mailer),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
