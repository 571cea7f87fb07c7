use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use lms_core::error::error_response;

/// API service error variants.
///
/// Infrastructure causes travel as `anyhow::Error`; they are logged at the
/// boundary and only surface in the body of debug builds.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("email or password does not match")]
    InvalidCredentials,
    #[error("token is invalid or expired, please try again")]
    InvalidOrExpiredToken,
    #[error("payment verification failed")]
    SignatureMismatch,
    #[error("no active subscription found")]
    NoActiveSubscription,
    #[error("file upload failed, please try again")]
    AssetUpload(#[source] anyhow::Error),
    #[error("unauthenticated, please login to continue")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("payment provider request failed")]
    Provider(#[source] anyhow::Error),
    #[error("error sending message")]
    Mail(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::NoActiveSubscription => "NO_ACTIVE_SUBSCRIPTION",
            Self::AssetUpload(_) => "ASSET_UPLOAD",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Provider(_) => "PROVIDER",
            Self::Mail(_) => "MAIL",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidCredentials
            | Self::InvalidOrExpiredToken
            | Self::SignatureMismatch
            | Self::NoActiveSubscription
            | Self::AssetUpload(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::Mail(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            Self::AssetUpload(e) | Self::Provider(e) | Self::Mail(e) | Self::Internal(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.cause().map(|e| format!("{e:#}"));
        if status.is_server_error() {
            if let Some(ref detail) = detail {
                tracing::error!(error = %detail, kind = self.kind(), "request failed");
            }
        }
        error_response(status, self.kind(), &self.to_string(), detail)
    }
}
