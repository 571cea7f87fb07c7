use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lms_domain::asset::Asset;

use crate::access::{AdminUser, CurrentUser, authorize_subscriber};
use crate::domain::types::{Course, CoursePatch, Lecture};
use crate::error::ApiError;
use crate::handlers::form::{ApiJson, MultipartForm};
use crate::handlers::{MessageResponse, parse_id};
use crate::state::AppState;
use crate::usecase::course::{
    AddLectureInput, AddLectureUseCase, CourseDetail, CreateCourseInput, CreateCourseUseCase,
    GetLecturesUseCase, ListCoursesUseCase, RemoveCourseUseCase, RemoveLectureUseCase,
    UpdateCourseUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    /// Stored video asset.
    pub lecture: Asset,
    #[serde(serialize_with = "lms_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Lecture> for LectureResponse {
    fn from(lecture: Lecture) -> Self {
        Self {
            id: lecture.id,
            course_id: lecture.course_id,
            title: lecture.title,
            description: lecture.description,
            lecture: lecture.video,
            created_at: lecture.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub thumbnail: Asset,
    pub number_of_lectures: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lectures: Option<Vec<LectureResponse>>,
    #[serde(serialize_with = "lms_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lms_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            category: course.category,
            created_by: course.created_by,
            thumbnail: course.thumbnail,
            number_of_lectures: course.number_of_lectures,
            lectures: None,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

impl From<CourseDetail> for CourseResponse {
    fn from(detail: CourseDetail) -> Self {
        Self {
            lectures: Some(detail.lectures.into_iter().map(Into::into).collect()),
            ..detail.course.into()
        }
    }
}

#[derive(Serialize)]
pub struct CoursesResponse {
    pub success: bool,
    pub message: &'static str,
    pub courses: Vec<CourseResponse>,
}

#[derive(Serialize)]
pub struct CourseEnvelope {
    pub success: bool,
    pub message: &'static str,
    pub course: CourseResponse,
}

impl CourseEnvelope {
    fn new(message: &'static str, course: impl Into<CourseResponse>) -> Self {
        Self {
            success: true,
            message,
            course: course.into(),
        }
    }
}

#[derive(Serialize)]
pub struct LecturesResponse {
    pub success: bool,
    pub message: &'static str,
    pub lectures: Vec<LectureResponse>,
}

// ── GET /courses ─────────────────────────────────────────────────────────────

pub async fn list_courses(State(state): State<AppState>) -> Result<Json<CoursesResponse>, ApiError> {
    let usecase = ListCoursesUseCase {
        repo: state.course_repo(),
    };
    let courses = usecase.execute().await?;
    Ok(Json(CoursesResponse {
        success: true,
        message: "All courses",
        courses: courses.into_iter().map(Into::into).collect(),
    }))
}

// ── POST /courses ────────────────────────────────────────────────────────────

pub async fn create_course(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> Result<(StatusCode, Json<CourseEnvelope>), ApiError> {
    let usecase = CreateCourseUseCase {
        repo: state.course_repo(),
        assets: state.assets.clone(),
    };
    let course = usecase
        .execute(CreateCourseInput {
            title: form.text("title"),
            description: form.text("description"),
            category: form.text("category"),
            created_by: form.text("createdBy"),
            thumbnail: form.file("thumbnail"),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CourseEnvelope::new("Course created successfully", course)),
    ))
}

// ── GET /courses/{id}/lectures ───────────────────────────────────────────────

pub async fn get_lectures(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LecturesResponse>, ApiError> {
    if state.lectures_require_subscription {
        authorize_subscriber(&user)?;
    }
    let course_id = parse_id(&id, "course")?;
    let usecase = GetLecturesUseCase {
        repo: state.course_repo(),
    };
    let lectures = usecase.execute(course_id).await?;
    Ok(Json(LecturesResponse {
        success: true,
        message: "Course lectures fetched successfully",
        lectures: lectures.into_iter().map(Into::into).collect(),
    }))
}

// ── POST /courses/{id}/lectures ──────────────────────────────────────────────

pub async fn add_lecture(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: MultipartForm,
) -> Result<Json<CourseEnvelope>, ApiError> {
    let course_id = parse_id(&id, "course")?;
    let usecase = AddLectureUseCase {
        repo: state.course_repo(),
        assets: state.assets.clone(),
    };
    let detail = usecase
        .execute(
            course_id,
            AddLectureInput {
                title: form.text("title"),
                description: form.text("description"),
                video: form.file("lecture"),
            },
        )
        .await?;
    Ok(Json(CourseEnvelope::new("Lecture added successfully", detail)))
}

// ── DELETE /courses/{id}/lectures/{lecture_id} ───────────────────────────────

pub async fn remove_lecture(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path((id, lecture_id)): Path<(String, String)>,
) -> Result<Json<CourseEnvelope>, ApiError> {
    let course_id = parse_id(&id, "course")?;
    let lecture_id = parse_id(&lecture_id, "lecture")?;
    let usecase = RemoveLectureUseCase {
        repo: state.course_repo(),
        assets: state.assets.clone(),
    };
    let detail = usecase.execute(course_id, lecture_id).await?;
    Ok(Json(CourseEnvelope::new("Lecture deleted successfully", detail)))
}

// ── PUT /courses/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: Option<String>,
}

pub async fn update_course(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateCourseRequest>,
) -> Result<Json<CourseEnvelope>, ApiError> {
    let course_id = parse_id(&id, "course")?;
    let usecase = UpdateCourseUseCase {
        repo: state.course_repo(),
    };
    let course = usecase
        .execute(
            course_id,
            CoursePatch {
                title: body.title,
                description: body.description,
                category: body.category,
                created_by: body.created_by,
            },
        )
        .await?;
    Ok(Json(CourseEnvelope::new("Course updated successfully", course)))
}

// ── DELETE /courses/{id} ─────────────────────────────────────────────────────

pub async fn remove_course(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let course_id = parse_id(&id, "course")?;
    let usecase = RemoveCourseUseCase {
        repo: state.course_repo(),
        assets: state.assets.clone(),
    };
    usecase.execute(course_id).await?;
    Ok(Json(MessageResponse::ok("Course deleted successfully")))
}
