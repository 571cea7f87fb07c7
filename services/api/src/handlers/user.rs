use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lms_auth_types::cookie::{clear_token_cookie, set_token_cookie};
use lms_domain::asset::Asset;
use lms_domain::subscription::SubscriptionRef;
use lms_domain::user::Role;

use crate::access::{CurrentUser, ProfileOwner};
use crate::domain::types::User;
use crate::error::ApiError;
use crate::handlers::form::{ApiJson, MultipartForm};
use crate::handlers::MessageResponse;
use crate::state::AppState;
use crate::usecase::user::{
    ChangePasswordInput, ChangePasswordUseCase, ForgetPasswordUseCase, LoginInput, LoginUseCase,
    RegisterInput, RegisterUseCase, ResetPasswordUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};

/// Public view of a user. The password hash and reset token never leave the service.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub avatar: Asset,
    pub subscription: SubscriptionRef,
    #[serde(serialize_with = "lms_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lms_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
            subscription: user.subscription,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct UserEnvelope {
    pub success: bool,
    pub message: &'static str,
    pub user: UserResponse,
}

impl UserEnvelope {
    fn new(message: &'static str, user: User) -> Self {
        Self {
            success: true,
            message,
            user: user.into(),
        }
    }
}

// ── POST /user/register ──────────────────────────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    mut form: MultipartForm,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RegisterUseCase {
        repo: state.user_repo(),
        assets: state.assets.clone(),
        jwt_secret: state.jwt_secret.clone(),
        token_ttl_secs: state.jwt_expiry_secs,
    };
    let out = usecase
        .execute(RegisterInput {
            full_name: form.text("fullName"),
            email: form.text("email"),
            password: form.text("password"),
            avatar: form.file("avatar"),
        })
        .await?;

    let jar = set_token_cookie(
        jar,
        out.token,
        state.cookie_domain.clone(),
        state.jwt_expiry_secs,
    );
    Ok((
        StatusCode::CREATED,
        jar,
        Json(UserEnvelope::new("User registered successfully", out.user)),
    ))
}

// ── POST /user/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
        token_ttl_secs: state.jwt_expiry_secs,
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let jar = set_token_cookie(
        jar,
        out.token,
        state.cookie_domain.clone(),
        state.jwt_expiry_secs,
    );
    Ok((
        jar,
        Json(UserEnvelope::new("User logged in successfully", out.user)),
    ))
}

// ── GET /user/logout ─────────────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_token_cookie(jar, state.cookie_domain.clone());
    (jar, Json(MessageResponse::ok("User logged out successfully")))
}

// ── GET /user/me ─────────────────────────────────────────────────────────────

pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<UserEnvelope> {
    Json(UserEnvelope::new("User details", user))
}

// ── POST /user/forget-password ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgetPasswordRequest {
    #[serde(default)]
    pub email: String,
}

pub async fn forget_password(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ForgetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = ForgetPasswordUseCase {
        repo: state.user_repo(),
        mailer: state.mailer.clone(),
        frontend_url: state.frontend_url.clone(),
    };
    usecase.execute(&body.email).await?;
    Ok(Json(MessageResponse::ok(
        "If the email is registered, a reset link has been sent to it",
    )))
}

// ── POST /user/reset-password/{reset_token} ──────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(reset_token): Path<String>,
    ApiJson(body): ApiJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = ResetPasswordUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(&reset_token, &body.password).await?;
    Ok(Json(MessageResponse::ok("Password changed successfully")))
}

// ── POST /user/change-password ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

pub async fn change_password(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = ChangePasswordUseCase {
        repo: state.user_repo(),
    };
    usecase
        .execute(
            &user,
            ChangePasswordInput {
                old_password: body.old_password,
                new_password: body.new_password,
            },
        )
        .await?;
    Ok(Json(MessageResponse::ok("Password changed successfully")))
}

// ── PUT /user/update/{id} ────────────────────────────────────────────────────

pub async fn update_user(
    ProfileOwner(user): ProfileOwner,
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> Result<Json<UserEnvelope>, ApiError> {
    let usecase = UpdateProfileUseCase {
        repo: state.user_repo(),
        assets: state.assets.clone(),
    };
    let updated = usecase
        .execute(
            &user,
            user.id,
            UpdateProfileInput {
                full_name: form.optional_text("fullName"),
                avatar: form.file("avatar"),
            },
        )
        .await?;
    Ok(Json(UserEnvelope::new("Profile updated successfully", updated)))
}
