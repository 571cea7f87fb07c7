use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use lms_core::error::not_found;
use lms_core::health::{healthz, ping, readyz};
use lms_core::middleware::{cors_layer, request_id_layer};

use crate::handlers::{
    course::{
        add_lecture, create_course, get_lectures, list_courses, remove_course, remove_lecture,
        update_course,
    },
    misc::{contact_us, user_stats},
    payment::{cancel_subscription, get_razorpay_key, list_payments, subscribe, verify_subscription},
    user::{
        change_password, forget_password, get_profile, login, logout, register, reset_password,
        update_user,
    },
};
use crate::state::AppState;

/// Upper bound on request bodies; lecture videos arrive as multipart uploads.
const BODY_LIMIT: usize = 50 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // User
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/logout", get(logout))
        .route("/user/me", get(get_profile))
        .route("/user/forget-password", post(forget_password))
        .route("/user/reset-password/{reset_token}", post(reset_password))
        .route("/user/change-password", post(change_password))
        .route("/user/update/{id}", put(update_user))
        // Courses
        .route("/courses", get(list_courses))
        .route("/courses", post(create_course))
        .route("/courses/{id}", put(update_course))
        .route("/courses/{id}", delete(remove_course))
        .route("/courses/{id}/lectures", get(get_lectures))
        .route("/courses/{id}/lectures", post(add_lecture))
        .route("/courses/{id}/lectures/{lecture_id}", delete(remove_lecture))
        // Payments
        .route("/payments", get(list_payments))
        .route("/payments/razorpay-key", get(get_razorpay_key))
        .route("/payments/subscribe", post(subscribe))
        .route("/payments/verify", post(verify_subscription))
        .route("/payments/unsubscribe", post(cancel_subscription))
        // Misc
        .route("/contact", post(contact_us))
        .route("/admin/stats/users", get(user_stats));

    let cors = cors_layer(&state.cors_origins);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/ping", get(ping))
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
