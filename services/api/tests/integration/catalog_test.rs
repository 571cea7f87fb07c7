use std::sync::Arc;

use uuid::Uuid;

use lms_api::domain::ports::AssetKind;
use lms_api::domain::types::CoursePatch;
use lms_api::error::ApiError;
use lms_api::usecase::course::{
    AddLectureInput, AddLectureUseCase, CreateCourseInput, CreateCourseUseCase,
    GetLecturesUseCase, ListCoursesUseCase, RemoveCourseUseCase, RemoveLectureUseCase,
    UpdateCourseUseCase,
};

use crate::helpers::{FakeAssetStore, MockCourseRepo, test_course, test_lecture, upload};

fn create_input() -> CreateCourseInput {
    CreateCourseInput {
        title: "Intro to Systems".to_owned(),
        description: "Processes, memory and files".to_owned(),
        category: "Computer Science".to_owned(),
        created_by: "Jane Instructor".to_owned(),
        thumbnail: Some(upload("thumb.png")),
    }
}

fn lecture_input(n: usize) -> AddLectureInput {
    AddLectureInput {
        title: format!("Lecture {n}"),
        description: format!("Lecture {n} description"),
        video: Some(upload(&format!("lecture-{n}.mp4"))),
    }
}

// ── ListCourses ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_courses_idempotently() {
    let usecase = ListCoursesUseCase {
        repo: MockCourseRepo::new(vec![test_course(), test_course()], vec![]),
    };

    let first = usecase.execute().await.unwrap();
    let second = usecase.execute().await.unwrap();

    assert_eq!(first.len(), 2);
    let ids = |v: &[lms_api::domain::types::Course]| v.iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
}

// ── CreateCourse ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_course_with_zero_lectures() {
    let repo = MockCourseRepo::empty();
    let courses = repo.courses.clone();
    let usecase = CreateCourseUseCase {
        repo,
        assets: Arc::new(FakeAssetStore::default()),
    };

    let course = usecase.execute(create_input()).await.unwrap();

    assert_eq!(course.title, "Intro to Systems");
    assert_eq!(course.created_by, "Jane Instructor");
    assert_eq!(course.number_of_lectures, 0);
    assert_eq!(course.thumbnail.public_id, "course-thumbnails/1-thumb.png");
    assert_eq!(courses.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_require_every_course_field() {
    let usecase = CreateCourseUseCase {
        repo: MockCourseRepo::empty(),
        assets: Arc::new(FakeAssetStore::default()),
    };

    let mut input = create_input();
    input.category = "  ".to_owned();
    let result = usecase.execute(input).await;
    assert!(matches!(result, Err(ApiError::Validation(ref m)) if m == "all fields are required"));

    let mut input = create_input();
    input.thumbnail = None;
    let result = usecase.execute(input).await;
    assert!(matches!(result, Err(ApiError::Validation(ref m)) if m == "thumbnail file is required"));
}

#[tokio::test]
async fn should_enforce_title_and_description_lengths() {
    let usecase = CreateCourseUseCase {
        repo: MockCourseRepo::empty(),
        assets: Arc::new(FakeAssetStore::default()),
    };

    let mut input = create_input();
    input.title = "Short".to_owned();
    assert!(matches!(usecase.execute(input).await, Err(ApiError::Validation(_))));

    let mut input = create_input();
    input.description = "x".repeat(201);
    assert!(matches!(usecase.execute(input).await, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_release_thumbnail_when_course_insert_fails() {
    let assets = Arc::new(FakeAssetStore::default());
    let usecase = CreateCourseUseCase {
        repo: MockCourseRepo::failing(),
        assets: assets.clone(),
    };

    let result = usecase.execute(create_input()).await;

    assert!(matches!(result, Err(ApiError::Internal(_))));
    assert_eq!(assets.released_ids(), vec!["course-thumbnails/1-thumb.png"]);
}

// ── UpdateCourse ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_apply_partial_course_update() {
    let course = test_course();
    let usecase = UpdateCourseUseCase {
        repo: MockCourseRepo::new(vec![course.clone()], vec![]),
    };

    let updated = usecase
        .execute(
            course.id,
            CoursePatch {
                category: Some(" Systems ".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.category, "Systems");
    assert_eq!(updated.title, course.title);
}

#[tokio::test]
async fn should_reject_empty_course_update() {
    let course = test_course();
    let usecase = UpdateCourseUseCase {
        repo: MockCourseRepo::new(vec![course.clone()], vec![]),
    };

    let result = usecase.execute(course.id, CoursePatch::default()).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_return_not_found_when_updating_missing_course() {
    let usecase = UpdateCourseUseCase {
        repo: MockCourseRepo::empty(),
    };

    let result = usecase
        .execute(
            Uuid::now_v7(),
            CoursePatch {
                title: Some("Valid course title".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::NotFound("course"))));
}

// ── Lectures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_lecture_count_in_step_with_lectures() {
    let course = test_course();
    let repo = MockCourseRepo::new(vec![course.clone()], vec![]);
    let assets = Arc::new(FakeAssetStore::default());
    let add = AddLectureUseCase {
        repo: repo.clone(),
        assets: assets.clone(),
    };

    add.execute(course.id, lecture_input(1)).await.unwrap();
    let detail = add.execute(course.id, lecture_input(2)).await.unwrap();
    assert_eq!(detail.lectures.len(), 2);
    assert_eq!(detail.course.number_of_lectures, 2);
    assert_eq!(detail.lectures[0].title, "Lecture 1");

    let remove = RemoveLectureUseCase {
        repo: repo.clone(),
        assets: assets.clone(),
    };
    let removed_id = detail.lectures[0].id;
    let removed_video = detail.lectures[0].video.public_id.clone();
    let detail = remove.execute(course.id, removed_id).await.unwrap();

    assert_eq!(detail.lectures.len(), 1);
    assert_eq!(detail.course.number_of_lectures, 1);
    assert_eq!(
        assets.released.lock().unwrap().clone(),
        vec![(AssetKind::Video, removed_video)]
    );
}

#[tokio::test]
async fn should_require_lecture_fields() {
    let course = test_course();
    let usecase = AddLectureUseCase {
        repo: MockCourseRepo::new(vec![course.clone()], vec![]),
        assets: Arc::new(FakeAssetStore::default()),
    };

    let mut input = lecture_input(1);
    input.video = None;
    let result = usecase.execute(course.id, input).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_not_upload_lecture_for_missing_course() {
    let assets = Arc::new(FakeAssetStore::default());
    let usecase = AddLectureUseCase {
        repo: MockCourseRepo::empty(),
        assets: assets.clone(),
    };

    let result = usecase.execute(Uuid::now_v7(), lecture_input(1)).await;

    assert!(matches!(result, Err(ApiError::NotFound("course"))));
    assert!(assets.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_release_video_when_lecture_insert_fails() {
    let course = test_course();
    let repo = MockCourseRepo {
        fail_writes: true,
        ..MockCourseRepo::new(vec![course.clone()], vec![])
    };
    let assets = Arc::new(FakeAssetStore::default());
    let usecase = AddLectureUseCase {
        repo,
        assets: assets.clone(),
    };

    let result = usecase.execute(course.id, lecture_input(1)).await;

    assert!(result.is_err());
    assert_eq!(assets.released_ids(), vec!["lms-lectures/1-lecture-1.mp4"]);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_lecture() {
    let course = test_course();
    let usecase = RemoveLectureUseCase {
        repo: MockCourseRepo::new(vec![course.clone()], vec![]),
        assets: Arc::new(FakeAssetStore::default()),
    };

    let result = usecase.execute(course.id, Uuid::now_v7()).await;
    assert!(matches!(result, Err(ApiError::NotFound("lecture"))));
}

#[tokio::test]
async fn should_list_lectures_of_existing_course_only() {
    let course = test_course();
    let lectures = vec![test_lecture(course.id, 1), test_lecture(course.id, 2)];
    let usecase = GetLecturesUseCase {
        repo: MockCourseRepo::new(vec![course.clone()], lectures),
    };

    assert_eq!(usecase.execute(course.id).await.unwrap().len(), 2);
    assert!(matches!(
        usecase.execute(Uuid::now_v7()).await,
        Err(ApiError::NotFound("course"))
    ));
}

// ── RemoveCourse ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_release_thumbnail_and_videos_on_course_delete() {
    let mut course = test_course();
    course.number_of_lectures = 2;
    let lectures = vec![test_lecture(course.id, 1), test_lecture(course.id, 2)];
    let repo = MockCourseRepo::new(vec![course.clone()], lectures);
    let courses = repo.courses.clone();
    let remaining_lectures = repo.lectures.clone();
    let assets = Arc::new(FakeAssetStore::default());

    RemoveCourseUseCase {
        repo,
        assets: assets.clone(),
    }
    .execute(course.id)
    .await
    .unwrap();

    assert!(courses.lock().unwrap().is_empty());
    assert!(remaining_lectures.lock().unwrap().is_empty());
    assert_eq!(
        assets.released.lock().unwrap().clone(),
        vec![
            (AssetKind::Image, "course-thumbnails/thumb-1".to_owned()),
            (AssetKind::Video, "lms-lectures/video-1".to_owned()),
            (AssetKind::Video, "lms-lectures/video-2".to_owned()),
        ]
    );
}

#[tokio::test]
async fn should_return_not_found_when_removing_missing_course() {
    let assets = Arc::new(FakeAssetStore::default());
    let result = RemoveCourseUseCase {
        repo: MockCourseRepo::empty(),
        assets: assets.clone(),
    }
    .execute(Uuid::now_v7())
    .await;

    assert!(matches!(result, Err(ApiError::NotFound("course"))));
    assert!(assets.released.lock().unwrap().is_empty());
}
