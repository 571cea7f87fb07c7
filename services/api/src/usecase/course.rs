use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{AssetKind, AssetStore, LECTURE_TARGET, THUMBNAIL_TARGET, UploadFile};
use crate::domain::repository::CourseRepository;
use crate::domain::types::{
    COURSE_DESCRIPTION_MAX, COURSE_DESCRIPTION_MIN, COURSE_TITLE_MAX, COURSE_TITLE_MIN, Course,
    CoursePatch, Lecture, validate_course_description, validate_course_title,
};
use crate::error::ApiError;
use crate::usecase::release_asset;

/// A course with its lectures in insertion order.
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course: Course,
    pub lectures: Vec<Lecture>,
}

fn check_title(title: &str) -> Result<(), ApiError> {
    if validate_course_title(title) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "title must be between {COURSE_TITLE_MIN} and {COURSE_TITLE_MAX} characters"
        )))
    }
}

fn check_description(description: &str) -> Result<(), ApiError> {
    if validate_course_description(description) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "description must be between {COURSE_DESCRIPTION_MIN} and {COURSE_DESCRIPTION_MAX} characters"
        )))
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned())
}

async fn load_detail<R: CourseRepository>(repo: &R, course_id: Uuid) -> Result<CourseDetail, ApiError> {
    let course = repo
        .find_by_id(course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;
    let lectures = repo.list_lectures(course_id).await?;
    Ok(CourseDetail { course, lectures })
}

// ── ListCourses ──────────────────────────────────────────────────────────────

pub struct ListCoursesUseCase<R: CourseRepository> {
    pub repo: R,
}

impl<R: CourseRepository> ListCoursesUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Course>, ApiError> {
        self.repo.list().await
    }
}

// ── GetLectures ──────────────────────────────────────────────────────────────

pub struct GetLecturesUseCase<R: CourseRepository> {
    pub repo: R,
}

impl<R: CourseRepository> GetLecturesUseCase<R> {
    pub async fn execute(&self, course_id: Uuid) -> Result<Vec<Lecture>, ApiError> {
        if self.repo.find_by_id(course_id).await?.is_none() {
            return Err(ApiError::NotFound("course"));
        }
        self.repo.list_lectures(course_id).await
    }
}

// ── CreateCourse ─────────────────────────────────────────────────────────────

pub struct CreateCourseInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub thumbnail: Option<UploadFile>,
}

pub struct CreateCourseUseCase<R: CourseRepository> {
    pub repo: R,
    pub assets: Arc<dyn AssetStore>,
}

impl<R: CourseRepository> CreateCourseUseCase<R> {
    pub async fn execute(&self, input: CreateCourseInput) -> Result<Course, ApiError> {
        let title = input.title.trim().to_owned();
        let description = input.description.trim().to_owned();
        let category = input.category.trim().to_owned();
        let created_by = input.created_by.trim().to_owned();
        if title.is_empty() || description.is_empty() || category.is_empty() || created_by.is_empty()
        {
            return Err(ApiError::validation("all fields are required"));
        }
        check_title(&title)?;
        check_description(&description)?;
        let thumbnail_file = input
            .thumbnail
            .ok_or_else(|| ApiError::validation("thumbnail file is required"))?;

        let thumbnail = self
            .assets
            .upload(THUMBNAIL_TARGET, thumbnail_file)
            .await
            .map_err(ApiError::AssetUpload)?;

        let now = Utc::now();
        let course = Course {
            id: Uuid::now_v7(),
            title,
            description,
            category,
            created_by,
            thumbnail,
            number_of_lectures: 0,
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = self.repo.create(&course).await {
            release_asset(self.assets.as_ref(), AssetKind::Image, &course.thumbnail.public_id).await;
            return Err(e);
        }
        tracing::info!(course_id = %course.id, "course created");
        Ok(course)
    }
}

// ── UpdateCourse ─────────────────────────────────────────────────────────────

pub struct UpdateCourseUseCase<R: CourseRepository> {
    pub repo: R,
}

impl<R: CourseRepository> UpdateCourseUseCase<R> {
    pub async fn execute(&self, course_id: Uuid, patch: CoursePatch) -> Result<Course, ApiError> {
        let patch = CoursePatch {
            title: trimmed(patch.title),
            description: trimmed(patch.description),
            category: trimmed(patch.category),
            created_by: trimmed(patch.created_by),
        };
        if patch.is_empty() {
            return Err(ApiError::validation("nothing to update"));
        }
        if let Some(ref title) = patch.title {
            check_title(title)?;
        }
        if let Some(ref description) = patch.description {
            check_description(description)?;
        }
        if patch.category.as_deref() == Some("") {
            return Err(ApiError::validation("category is required"));
        }
        if patch.created_by.as_deref() == Some("") {
            return Err(ApiError::validation("course instructor is required"));
        }
        self.repo
            .update(course_id, &patch)
            .await?
            .ok_or(ApiError::NotFound("course"))
    }
}

// ── RemoveCourse ─────────────────────────────────────────────────────────────

pub struct RemoveCourseUseCase<R: CourseRepository> {
    pub repo: R,
    pub assets: Arc<dyn AssetStore>,
}

impl<R: CourseRepository> RemoveCourseUseCase<R> {
    /// Delete the course, then release its thumbnail and every lecture video.
    pub async fn execute(&self, course_id: Uuid) -> Result<(), ApiError> {
        let CourseDetail { course, lectures } = load_detail(&self.repo, course_id).await?;
        if !self.repo.delete(course_id).await? {
            return Err(ApiError::NotFound("course"));
        }
        release_asset(self.assets.as_ref(), AssetKind::Image, &course.thumbnail.public_id).await;
        for lecture in &lectures {
            release_asset(self.assets.as_ref(), AssetKind::Video, &lecture.video.public_id).await;
        }
        tracing::info!(%course_id, lectures = lectures.len(), "course removed");
        Ok(())
    }
}

// ── AddLecture ───────────────────────────────────────────────────────────────

pub struct AddLectureInput {
    pub title: String,
    pub description: String,
    pub video: Option<UploadFile>,
}

pub struct AddLectureUseCase<R: CourseRepository> {
    pub repo: R,
    pub assets: Arc<dyn AssetStore>,
}

impl<R: CourseRepository> AddLectureUseCase<R> {
    pub async fn execute(
        &self,
        course_id: Uuid,
        input: AddLectureInput,
    ) -> Result<CourseDetail, ApiError> {
        let title = input.title.trim().to_owned();
        let description = input.description.trim().to_owned();
        let video_file = match input.video {
            Some(file) if !title.is_empty() && !description.is_empty() => file,
            _ => {
                return Err(ApiError::validation(
                    "title, description and lecture video are required",
                ));
            }
        };
        if self.repo.find_by_id(course_id).await?.is_none() {
            return Err(ApiError::NotFound("course"));
        }

        let video = self
            .assets
            .upload(LECTURE_TARGET, video_file)
            .await
            .map_err(ApiError::AssetUpload)?;

        let lecture = Lecture {
            id: Uuid::now_v7(),
            course_id,
            title,
            description,
            video,
            created_at: Utc::now(),
        };
        if let Err(e) = self.repo.add_lecture(&lecture).await {
            release_asset(self.assets.as_ref(), AssetKind::Video, &lecture.video.public_id).await;
            return Err(e);
        }
        load_detail(&self.repo, course_id).await
    }
}

// ── RemoveLecture ────────────────────────────────────────────────────────────

pub struct RemoveLectureUseCase<R: CourseRepository> {
    pub repo: R,
    pub assets: Arc<dyn AssetStore>,
}

impl<R: CourseRepository> RemoveLectureUseCase<R> {
    pub async fn execute(&self, course_id: Uuid, lecture_id: Uuid) -> Result<CourseDetail, ApiError> {
        if self.repo.find_by_id(course_id).await?.is_none() {
            return Err(ApiError::NotFound("course"));
        }
        let lecture = self
            .repo
            .find_lecture(course_id, lecture_id)
            .await?
            .ok_or(ApiError::NotFound("lecture"))?;

        release_asset(self.assets.as_ref(), AssetKind::Video, &lecture.video.public_id).await;
        if !self.repo.remove_lecture(course_id, lecture_id).await? {
            return Err(ApiError::NotFound("lecture"));
        }
        load_detail(&self.repo, course_id).await
    }
}
