//! Access control: caller resolution and role/subscription gates.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use lms_auth_types::bearer::extract_token;
use lms_domain::user::Role;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::state::AppState;
use crate::usecase::auth::AuthenticateUseCase;

/// The authenticated caller, re-resolved from the store on every request.
///
/// Rejects with 401 when the token is missing, invalid, expired, or names a
/// user that no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    // Extract the token synchronously and return a 'static future; see
    // axum-core's `fn -> impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = extract_token(&parts.headers);
        let usecase = AuthenticateUseCase {
            repo: state.user_repo(),
            jwt_secret: state.jwt_secret.clone(),
        };
        async move { usecase.execute(token.as_deref()).await.map(CurrentUser) }
    }
}

/// An authenticated caller with the `ADMIN` role.
///
/// Runs before any body extractor, so non-admins get 403 regardless of what
/// they sent.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        authorize_role(&user, &[Role::Admin])?;
        Ok(AdminUser(user))
    }
}

/// The authenticated caller, accepted only when the `{id}` path segment is
/// their own id.
#[derive(Debug, Clone)]
pub struct ProfileOwner(pub User);

impl FromRequestParts<AppState> for ProfileOwner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        let target_id = parse_id(&raw, "user")?;
        authorize_owner(&user, target_id)?;
        Ok(ProfileOwner(user))
    }
}

/// Allow only the user the resource belongs to.
pub fn authorize_owner(user: &User, owner_id: Uuid) -> Result<(), ApiError> {
    if user.id == owner_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden("you can only update your own profile"))
    }
}

/// Allow only callers whose role is in `allowed`.
pub fn authorize_role(user: &User, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "you do not have permission to access this route",
        ))
    }
}

/// Allow admins unconditionally, everyone else only with an active subscription.
pub fn authorize_subscriber(user: &User) -> Result<(), ApiError> {
    if user.role == Role::Admin || user.subscription.is_active() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "an active subscription is required to access this content",
        ))
    }
}
