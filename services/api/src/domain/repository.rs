#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use lms_domain::asset::Asset;
use lms_domain::subscription::SubscriptionRef;

use crate::domain::types::{Course, CoursePatch, Lecture, PaymentRecord, User};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Find the user holding `token_hash` whose reset expiry is after `now`.
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, ApiError>;

    /// Insert a new user. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Replace the password hash and clear any pending reset token.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError>;

    /// Store (or clear, with `None`) the reset token hash and its expiry.
    async fn set_reset_token(
        &self,
        id: Uuid,
        token: Option<(&str, DateTime<Utc>)>,
    ) -> Result<(), ApiError>;

    async fn update_profile(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        avatar: Option<&Asset>,
    ) -> Result<(), ApiError>;

    async fn set_subscription(
        &self,
        id: Uuid,
        subscription: &SubscriptionRef,
    ) -> Result<(), ApiError>;

    async fn count_all(&self) -> Result<u64, ApiError>;
    async fn count_by_subscription_status(&self, status: &str) -> Result<u64, ApiError>;
}

/// Repository for courses and the lectures they own.
pub trait CourseRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Course>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, ApiError>;
    async fn create(&self, course: &Course) -> Result<(), ApiError>;

    /// Apply a partial update. Returns the updated course, or `None` if absent.
    async fn update(&self, id: Uuid, patch: &CoursePatch) -> Result<Option<Course>, ApiError>;

    /// Delete a course and its lectures. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Lectures of a course in insertion order.
    async fn list_lectures(&self, course_id: Uuid) -> Result<Vec<Lecture>, ApiError>;

    async fn find_lecture(
        &self,
        course_id: Uuid,
        lecture_id: Uuid,
    ) -> Result<Option<Lecture>, ApiError>;

    /// Insert a lecture and increment the course's lecture count atomically.
    async fn add_lecture(&self, lecture: &Lecture) -> Result<(), ApiError>;

    /// Delete a lecture and decrement the course's lecture count atomically.
    /// Returns `true` if a row was deleted.
    async fn remove_lecture(&self, course_id: Uuid, lecture_id: Uuid) -> Result<bool, ApiError>;
}

/// Append-only payment audit trail.
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, record: &PaymentRecord) -> Result<(), ApiError>;
}
