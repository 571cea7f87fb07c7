use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::access::AdminUser;
use crate::error::ApiError;
use crate::handlers::MessageResponse;
use crate::handlers::form::ApiJson;
use crate::state::AppState;
use crate::usecase::contact::{ContactInput, ContactUseCase};
use crate::usecase::stats::UserStatsUseCase;

// ── POST /contact ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

pub async fn contact_us(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = ContactUseCase {
        mailer: state.mailer.clone(),
        recipient: state.contact_us_email.clone(),
    };
    usecase
        .execute(ContactInput {
            name: body.name,
            email: body.email,
            message: body.message,
        })
        .await?;
    Ok(Json(MessageResponse::ok("Your message has been sent successfully")))
}

// ── GET /admin/stats/users ───────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub success: bool,
    pub message: &'static str,
    pub all_user_count: u64,
    pub subscribed_users_count: u64,
}

pub async fn user_stats(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let usecase = UserStatsUseCase {
        repo: state.user_repo(),
    };
    let stats = usecase.execute().await?;
    Ok(Json(StatsResponse {
        success: true,
        message: "User stats",
        all_user_count: stats.all_user_count,
        subscribed_users_count: stats.subscribed_users_count,
    }))
}
