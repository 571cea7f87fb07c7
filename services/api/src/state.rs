use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::ports::{AssetStore, Mailer, PaymentProvider};
use crate::infra::db::{DbCourseRepository, DbPaymentRepository, DbUserRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
    pub cookie_domain: Option<String>,
    pub frontend_url: String,
    pub cors_origins: Vec<String>,
    pub contact_us_email: String,
    /// Shared secret for checkout signatures.
    pub payment_secret: String,
    pub subscription_amount: i32,
    pub lectures_require_subscription: bool,
    pub assets: Arc<dyn AssetStore>,
    pub payments: Arc<dyn PaymentProvider>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn course_repo(&self) -> DbCourseRepository {
        DbCourseRepository {
            db: self.db.clone(),
        }
    }

    pub fn payment_repo(&self) -> DbPaymentRepository {
        DbPaymentRepository {
            db: self.db.clone(),
        }
    }
}
