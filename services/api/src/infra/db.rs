use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use lms_api_schema::{courses, lectures, payments, users};
use lms_domain::asset::Asset;
use lms_domain::subscription::SubscriptionRef;
use lms_domain::user::Role;

use crate::domain::repository::{CourseRepository, PaymentRepository, UserRepository};
use crate::domain::types::{Course, CoursePatch, Lecture, PaymentRecord, User};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl DbUserRepository {
    async fn update_fields(
        &self,
        id: Uuid,
        mut am: users::ActiveModel,
        what: &'static str,
    ) -> Result<(), ApiError> {
        am.updated_at = Set(Utc::now());
        users::Entity::update_many()
            .set(am)
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context(what)?;
        Ok(())
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::ForgetPasswordToken.eq(token_hash))
            .filter(users::Column::ForgetPasswordExpiry.gt(now))
            .one(&self.db)
            .await
            .context("find user by reset token")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let am = users::ActiveModel {
            id: Set(user.id),
            full_name: Set(user.full_name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_i16()),
            avatar_public_id: Set(user.avatar.public_id.clone()),
            avatar_secure_url: Set(user.avatar.secure_url.clone()),
            forget_password_token: Set(user.forget_password_token.clone()),
            forget_password_expiry: Set(user.forget_password_expiry),
            subscription_id: Set(user.subscription.id.clone()),
            subscription_status: Set(user.subscription.status.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };
        users::Entity::insert(am)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    ApiError::Conflict("email already exists".into())
                }
                _ => ApiError::Internal(anyhow::Error::new(e).context("create user")),
            })?;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError> {
        let am = users::ActiveModel {
            password_hash: Set(password_hash.to_owned()),
            forget_password_token: Set(None),
            forget_password_expiry: Set(None),
            ..Default::default()
        };
        self.update_fields(id, am, "update password").await
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: Option<(&str, DateTime<Utc>)>,
    ) -> Result<(), ApiError> {
        let (hash, expiry) = match token {
            Some((hash, expiry)) => (Some(hash.to_owned()), Some(expiry)),
            None => (None, None),
        };
        let am = users::ActiveModel {
            forget_password_token: Set(hash),
            forget_password_expiry: Set(expiry),
            ..Default::default()
        };
        self.update_fields(id, am, "set reset token").await
    }

    async fn update_profile(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        avatar: Option<&Asset>,
    ) -> Result<(), ApiError> {
        let mut am = users::ActiveModel::default();
        if let Some(full_name) = full_name {
            am.full_name = Set(full_name.to_owned());
        }
        if let Some(avatar) = avatar {
            am.avatar_public_id = Set(avatar.public_id.clone());
            am.avatar_secure_url = Set(avatar.secure_url.clone());
        }
        self.update_fields(id, am, "update profile").await
    }

    async fn set_subscription(
        &self,
        id: Uuid,
        subscription: &SubscriptionRef,
    ) -> Result<(), ApiError> {
        let am = users::ActiveModel {
            subscription_id: Set(subscription.id.clone()),
            subscription_status: Set(subscription.status.clone()),
            ..Default::default()
        };
        self.update_fields(id, am, "set subscription").await
    }

    async fn count_all(&self) -> Result<u64, ApiError> {
        let count = users::Entity::find()
            .count(&self.db)
            .await
            .context("count users")?;
        Ok(count)
    }

    async fn count_by_subscription_status(&self, status: &str) -> Result<u64, ApiError> {
        let count = users::Entity::find()
            .filter(users::Column::SubscriptionStatus.eq(status))
            .count(&self.db)
            .await
            .context("count users by subscription status")?;
        Ok(count)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        full_name: model.full_name,
        email: model.email,
        password_hash: model.password_hash,
        role: Role::from_i16(model.role).unwrap_or_default(),
        avatar: Asset::new(model.avatar_public_id, model.avatar_secure_url),
        forget_password_token: model.forget_password_token,
        forget_password_expiry: model.forget_password_expiry,
        subscription: SubscriptionRef {
            id: model.subscription_id,
            status: model.subscription_status,
        },
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Course repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCourseRepository {
    pub db: DatabaseConnection,
}

impl CourseRepository for DbCourseRepository {
    async fn list(&self) -> Result<Vec<Course>, ApiError> {
        let models = courses::Entity::find()
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .context("list courses")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, ApiError> {
        let model = courses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find course by id")?;
        Ok(model.map(course_from_model))
    }

    async fn create(&self, course: &Course) -> Result<(), ApiError> {
        courses::Entity::insert(courses::ActiveModel {
            id: Set(course.id),
            title: Set(course.title.clone()),
            description: Set(course.description.clone()),
            category: Set(course.category.clone()),
            created_by: Set(course.created_by.clone()),
            thumbnail_public_id: Set(course.thumbnail.public_id.clone()),
            thumbnail_secure_url: Set(course.thumbnail.secure_url.clone()),
            number_of_lectures: Set(course.number_of_lectures),
            created_at: Set(course.created_at),
            updated_at: Set(course.updated_at),
        })
        .exec_without_returning(&self.db)
        .await
        .context("create course")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &CoursePatch) -> Result<Option<Course>, ApiError> {
        let mut am = courses::ActiveModel {
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(ref title) = patch.title {
            am.title = Set(title.clone());
        }
        if let Some(ref description) = patch.description {
            am.description = Set(description.clone());
        }
        if let Some(ref category) = patch.category {
            am.category = Set(category.clone());
        }
        if let Some(ref created_by) = patch.created_by {
            am.created_by = Set(created_by.clone());
        }
        let res = courses::Entity::update_many()
            .set(am)
            .filter(courses::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update course")?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let deleted = self
            .db
            .transaction::<_, u64, DbErr>(|txn| {
                Box::pin(async move {
                    lectures::Entity::delete_many()
                        .filter(lectures::Column::CourseId.eq(id))
                        .exec(txn)
                        .await?;
                    let res = courses::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(res.rows_affected)
                })
            })
            .await
            .context("delete course")?;
        Ok(deleted > 0)
    }

    async fn list_lectures(&self, course_id: Uuid) -> Result<Vec<Lecture>, ApiError> {
        let models = lectures::Entity::find()
            .filter(lectures::Column::CourseId.eq(course_id))
            .order_by_asc(lectures::Column::Id)
            .all(&self.db)
            .await
            .context("list lectures")?;
        Ok(models.into_iter().map(lecture_from_model).collect())
    }

    async fn find_lecture(
        &self,
        course_id: Uuid,
        lecture_id: Uuid,
    ) -> Result<Option<Lecture>, ApiError> {
        let model = lectures::Entity::find_by_id(lecture_id)
            .filter(lectures::Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .context("find lecture")?;
        Ok(model.map(lecture_from_model))
    }

    async fn add_lecture(&self, lecture: &Lecture) -> Result<(), ApiError> {
        let course_id = lecture.course_id;
        let am = lectures::ActiveModel {
            id: Set(lecture.id),
            course_id: Set(course_id),
            title: Set(lecture.title.clone()),
            description: Set(lecture.description.clone()),
            video_public_id: Set(lecture.video.public_id.clone()),
            video_secure_url: Set(lecture.video.secure_url.clone()),
            created_at: Set(lecture.created_at),
        };
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    lectures::Entity::insert(am)
                        .exec_without_returning(txn)
                        .await?;
                    shift_lecture_count(txn, course_id, 1).await
                })
            })
            .await
            .context("add lecture")?;
        Ok(())
    }

    async fn remove_lecture(&self, course_id: Uuid, lecture_id: Uuid) -> Result<bool, ApiError> {
        let removed = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let res = lectures::Entity::delete_many()
                        .filter(lectures::Column::Id.eq(lecture_id))
                        .filter(lectures::Column::CourseId.eq(course_id))
                        .exec(txn)
                        .await?;
                    if res.rows_affected == 0 {
                        return Ok(false);
                    }
                    shift_lecture_count(txn, course_id, -1).await?;
                    Ok(true)
                })
            })
            .await
            .context("remove lecture")?;
        Ok(removed)
    }
}

/// `number_of_lectures = number_of_lectures + delta`, evaluated by the database.
async fn shift_lecture_count(
    txn: &sea_orm::DatabaseTransaction,
    course_id: Uuid,
    delta: i32,
) -> Result<(), DbErr> {
    courses::Entity::update_many()
        .col_expr(
            courses::Column::NumberOfLectures,
            Expr::col(courses::Column::NumberOfLectures).add(delta),
        )
        .col_expr(courses::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(courses::Column::Id.eq(course_id))
        .exec(txn)
        .await?;
    Ok(())
}

fn course_from_model(model: courses::Model) -> Course {
    Course {
        id: model.id,
        title: model.title,
        description: model.description,
        category: model.category,
        created_by: model.created_by,
        thumbnail: Asset::new(model.thumbnail_public_id, model.thumbnail_secure_url),
        number_of_lectures: model.number_of_lectures,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn lecture_from_model(model: lectures::Model) -> Lecture {
    Lecture {
        id: model.id,
        course_id: model.course_id,
        title: model.title,
        description: model.description,
        video: Asset::new(model.video_public_id, model.video_secure_url),
        created_at: model.created_at,
    }
}

// ── Payment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPaymentRepository {
    pub db: DatabaseConnection,
}

impl PaymentRepository for DbPaymentRepository {
    async fn create(&self, record: &PaymentRecord) -> Result<(), ApiError> {
        payments::Entity::insert(payments::ActiveModel {
            id: Set(record.id),
            user_id: Set(record.user_id),
            razorpay_payment_id: Set(record.razorpay_payment_id.clone()),
            razorpay_subscription_id: Set(record.razorpay_subscription_id.clone()),
            razorpay_signature: Set(record.razorpay_signature.clone()),
            amount: Set(record.amount),
            status: Set(record.status.as_str().to_owned()),
            created_at: Set(record.created_at),
        })
        .exec_without_returning(&self.db)
        .await
        .context("create payment record")?;
        Ok(())
    }
}
