use lms_auth_types::token::{TokenSubject, issue_token, validate_token};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;

/// Resolve the caller behind a bearer token.
///
/// Every failure (no token, bad signature, expired, unknown user) yields the
/// same [`ApiError::Unauthenticated`]; the cause is only logged at debug.
pub struct AuthenticateUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> AuthenticateUseCase<R> {
    pub async fn execute(&self, token: Option<&str>) -> Result<User, ApiError> {
        let Some(token) = token else {
            tracing::debug!("no token on request");
            return Err(ApiError::Unauthenticated);
        };
        let info = validate_token(token, &self.jwt_secret).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            ApiError::Unauthenticated
        })?;
        match self.repo.find_by_id(info.user_id).await? {
            Some(user) => Ok(user),
            None => {
                tracing::debug!(user_id = %info.user_id, "token subject no longer exists");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}

/// Sign a session token for `user`. Returns the token and its `exp`.
pub fn issue_user_token(
    user: &User,
    secret: &str,
    ttl_secs: u64,
) -> Result<(String, u64), ApiError> {
    issue_token(
        TokenSubject {
            user_id: user.id,
            email: &user.email,
            role: user.role,
            subscription_status: user.subscription.status.as_deref(),
        },
        secret,
        ttl_secs,
    )
    .map_err(|e| ApiError::Internal(e.into()))
}
