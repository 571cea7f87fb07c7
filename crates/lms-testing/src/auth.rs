//! Token helpers for integration tests.
//!
//! Mints real signed tokens so requests go through the same validation path
//! as production traffic.

use http::header::{AUTHORIZATION, COOKIE};
use http::{HeaderMap, HeaderValue};
use uuid::Uuid;

use lms_auth_types::cookie::TOKEN_COOKIE;
use lms_auth_types::token::{TokenSubject, issue_token};
use lms_domain::user::Role;

/// Configurable identity for test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl MockAuth {
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
        }
    }

    /// Sign a one-hour token with `secret`.
    pub fn token(&self, secret: &str) -> String {
        let (token, _) = issue_token(
            TokenSubject {
                user_id: self.user_id,
                email: &self.email,
                role: self.role,
                subscription_status: None,
            },
            secret,
            3600,
        )
        .unwrap();
        token
    }

    /// `Authorization: Bearer …` header map.
    pub fn bearer_headers(&self, secret: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token(secret))).unwrap(),
        );
        map
    }

    /// `Cookie: token=…` header map.
    pub fn cookie_headers(&self, secret: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{TOKEN_COOKIE}={}", self.token(secret))).unwrap(),
        );
        map
    }
}
