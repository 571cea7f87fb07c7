use chrono::{DateTime, Utc};
use uuid::Uuid;

use lms_domain::asset::Asset;
use lms_domain::payment::PaymentStatus;
use lms_domain::subscription::SubscriptionRef;
use lms_domain::user::Role;

/// Registered principal with its credentials and subscription mirror.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    /// argon2id PHC string. Never serialized.
    pub password_hash: String,
    pub role: Role,
    pub avatar: Asset,
    /// SHA-256 hex of the raw reset token.
    pub forget_password_token: Option<String>,
    pub forget_password_expiry: Option<DateTime<Utc>>,
    pub subscription: SubscriptionRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Catalog entry. Lectures are loaded separately.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub thumbnail: Asset,
    /// Always equal to the number of lecture rows owned by the course.
    pub number_of_lectures: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Lecture {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub video: Asset,
    pub created_at: DateTime<Utc>,
}

/// Partial course update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: Option<String>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.created_by.is_none()
    }
}

/// Append-only audit entry for one verification attempt.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub razorpay_payment_id: String,
    pub razorpay_subscription_id: String,
    pub razorpay_signature: String,
    pub amount: i32,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

pub const FULL_NAME_MIN: usize = 5;
pub const FULL_NAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;
pub const COURSE_TITLE_MIN: usize = 8;
pub const COURSE_TITLE_MAX: usize = 59;
pub const COURSE_DESCRIPTION_MIN: usize = 8;
pub const COURSE_DESCRIPTION_MAX: usize = 200;

/// Trim and lower-case an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace and a non-empty part on every side of the last dot.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn validate_full_name(full_name: &str) -> bool {
    within(full_name.trim(), FULL_NAME_MIN, FULL_NAME_MAX)
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN
}

pub fn validate_course_title(title: &str) -> bool {
    within(title.trim(), COURSE_TITLE_MIN, COURSE_TITLE_MAX)
}

pub fn validate_course_description(description: &str) -> bool {
    within(description.trim(), COURSE_DESCRIPTION_MIN, COURSE_DESCRIPTION_MAX)
}

fn within(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    (min..=max).contains(&len)
}
