use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use mockall::predicate;
use manege_core::{
    errors::ManegeError,
    models::lesson::{
        CreateLessonRequest, LessonDuration, LessonRequest, LessonResponse, RequestStatus,
        StudentSummary, UpdateLessonRequest,
    },
    models::profile::Role,
};
use uuid::Uuid;

use crate::test_utils::{
    sample_lesson, sample_lesson_request, sample_lesson_with_student, sample_student, TestContext,
};
use manege_api::handlers::lesson::validate_preferred_date;
use manege_api::middleware::error_handling::AppError;
use manege_db::models::DbLessonWithStudent;

fn to_lesson_response(row: DbLessonWithStudent) -> Result<LessonResponse, ManegeError> {
    Ok(LessonResponse {
        id: row.id,
        date: row.date,
        time: row.time,
        duration: u16::try_from(row.duration)
            .map_err(|_| ManegeError::Validation("Invalid lesson duration".to_string()))?
            .try_into()?,
        focus: row.focus,
        notes: row.notes,
        student: StudentSummary {
            id: row.student_id,
            name: row.student_name,
            level: row.student_level.parse()?,
        },
    })
}

// Mirrors the list_lessons range handling against the mock store.
async fn test_list_lessons_wrapper(
    ctx: &mut TestContext,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<LessonResponse>, AppError> {
    let range = match (start, end) {
        (Some(start), Some(end)) => Some((start, end)),
        (None, None) => None,
        _ => {
            return Err(AppError(ManegeError::Validation(
                "Both start and end must be supplied for a range query".to_string(),
            )))
        }
    };

    let rows = ctx.lesson_repo.list_lessons(range).await?;
    let lessons = rows
        .into_iter()
        .map(to_lesson_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lessons)
}

// Mirrors create_lesson: student existence check, insert, refetch joined.
async fn test_create_lesson_wrapper(
    ctx: &mut TestContext,
    payload: CreateLessonRequest,
) -> Result<LessonResponse, AppError> {
    ctx.student_repo
        .get_student_by_id(payload.student_id)
        .await?
        .ok_or_else(|| {
            ManegeError::NotFound(format!("Student with ID {} not found", payload.student_id))
        })?;

    let lesson = ctx.lesson_repo.create_lesson(payload).await?;

    let row = ctx
        .lesson_repo
        .get_lesson_with_student(lesson.id)
        .await?
        .ok_or_else(|| ManegeError::NotFound(format!("Lesson with ID {} not found", lesson.id)))?;

    Ok(to_lesson_response(row)?)
}

// Mirrors update_lesson: existence check, patch, refetch joined row.
async fn test_update_lesson_wrapper(
    ctx: &mut TestContext,
    id: Uuid,
    patch: UpdateLessonRequest,
) -> Result<LessonResponse, AppError> {
    ctx.lesson_repo
        .get_lesson_by_id(id)
        .await?
        .ok_or_else(|| ManegeError::NotFound(format!("Lesson with ID {} not found", id)))?;

    ctx.lesson_repo.update_lesson(id, patch).await?;

    let row = ctx
        .lesson_repo
        .get_lesson_with_student(id)
        .await?
        .ok_or_else(|| ManegeError::NotFound(format!("Lesson with ID {} not found", id)))?;

    Ok(to_lesson_response(row)?)
}

// Mirrors delete_lesson: existence check, then delete.
async fn test_delete_lesson_wrapper(ctx: &mut TestContext, id: Uuid) -> Result<(), AppError> {
    ctx.lesson_repo
        .get_lesson_by_id(id)
        .await?
        .ok_or_else(|| ManegeError::NotFound(format!("Lesson with ID {} not found", id)))?;

    ctx.lesson_repo.delete_lesson(id).await?;
    Ok(())
}

// Mirrors create_lesson_request: validate the date first, then store.
async fn test_create_lesson_request_wrapper(
    ctx: &mut TestContext,
    student_id: Uuid,
    preferred_date: NaiveDate,
    preferred_time: NaiveTime,
) -> Result<LessonRequest, AppError> {
    validate_preferred_date(preferred_date, Utc::now().date_naive())?;

    let row = ctx
        .lesson_repo
        .create_lesson_request(student_id, preferred_date, preferred_time, None)
        .await?;

    Ok(LessonRequest {
        id: row.id,
        student_id: row.student_id,
        preferred_date: row.preferred_date,
        preferred_time: row.preferred_time,
        notes: row.notes,
        status: row.status.parse().map_err(AppError)?,
        created_at: row.created_at,
    })
}

// Mirrors update_lesson_request: instructors only.
async fn test_set_request_status_wrapper(
    ctx: &mut TestContext,
    role: Role,
    id: Uuid,
    status: &'static str,
) -> Result<RequestStatus, AppError> {
    if role != Role::Admin {
        return Err(AppError(ManegeError::Authorization(
            "Only an instructor can change a request status".to_string(),
        )));
    }

    let row = ctx.lesson_repo.set_lesson_request_status(id, status).await?;
    Ok(row.status.parse().map_err(AppError)?)
}

#[tokio::test]
async fn test_past_date_request_never_reaches_store() {
    let mut ctx = TestContext::new();
    let student_id = Uuid::new_v4();
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    ctx.lesson_repo
        .expect_create_lesson_request()
        .times(0)
        .returning(|_, _, _, _| panic!("Should not be called"));

    let result = test_create_lesson_request_wrapper(&mut ctx, student_id, yesterday, nine).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        ManegeError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_today_request_rejected() {
    let mut ctx = TestContext::new();
    let student_id = Uuid::new_v4();
    let today = Utc::now().date_naive();
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    ctx.lesson_repo
        .expect_create_lesson_request()
        .times(0)
        .returning(|_, _, _, _| panic!("Should not be called"));

    let result = test_create_lesson_request_wrapper(&mut ctx, student_id, today, nine).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_future_request_created_as_pending() {
    let mut ctx = TestContext::new();
    let student_id = Uuid::new_v4();
    let next_week = Utc::now().date_naive() + Duration::days(7);
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    ctx.lesson_repo
        .expect_create_lesson_request()
        .with(
            predicate::eq(student_id),
            predicate::eq(next_week),
            predicate::eq(nine),
            predicate::eq(None::<&'static str>),
        )
        .times(1)
        .returning(|student_id, date, time, _| Ok(sample_lesson_request(student_id, date, time)));

    let result = test_create_lesson_request_wrapper(&mut ctx, student_id, next_week, nine).await;

    let request = result.unwrap();
    assert_eq!(request.student_id, student_id);
    assert_eq!(request.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_range_query_requires_both_bounds() {
    let mut ctx = TestContext::new();
    let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

    ctx.lesson_repo
        .expect_list_lessons()
        .times(0)
        .returning(|_| panic!("Should not be called"));

    let result = test_list_lessons_wrapper(&mut ctx, Some(start), None).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        ManegeError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_list_lessons_carries_student_summary() {
    let mut ctx = TestContext::new();
    let student_id = Uuid::new_v4();
    let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    ctx.lesson_repo
        .expect_list_lessons()
        .with(predicate::eq(Some((monday, monday))))
        .returning(move |_| Ok(vec![sample_lesson_with_student(student_id, monday, nine)]));

    let lessons = test_list_lessons_wrapper(&mut ctx, Some(monday), Some(monday))
        .await
        .unwrap();

    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].student.id, student_id);
    assert_eq!(lessons[0].student.name, "Emma de Vries");
    assert_eq!(lessons[0].duration.minutes(), 60);
}

#[tokio::test]
async fn test_double_booked_slot_is_accepted() {
    let mut ctx = TestContext::new();
    let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let first = sample_lesson_with_student(Uuid::new_v4(), monday, nine);
    let second = sample_lesson_with_student(Uuid::new_v4(), monday, nine);

    // Two different students, same date and time: the store keeps both.
    ctx.lesson_repo
        .expect_list_lessons()
        .returning(move |_| Ok(vec![first.clone(), second.clone()]));

    let lessons = test_list_lessons_wrapper(&mut ctx, Some(monday), Some(monday))
        .await
        .unwrap();

    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0].date, lessons[1].date);
    assert_eq!(lessons[0].time, lessons[1].time);
    assert_ne!(lessons[0].student.id, lessons[1].student.id);
}

#[tokio::test]
async fn test_create_list_delete_scenario_over_single_day() {
    let mut ctx = TestContext::new();
    let student_id = Uuid::new_v4();
    let lesson_id = Uuid::new_v4();
    let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    let mut joined = sample_lesson_with_student(student_id, monday, nine);
    joined.id = lesson_id;
    let listed = joined.clone();

    ctx.student_repo
        .expect_get_student_by_id()
        .with(predicate::eq(student_id))
        .returning(move |id| Ok(Some(sample_student(id))));

    ctx.lesson_repo.expect_create_lesson().times(1).returning(
        move |payload: CreateLessonRequest| {
            let mut lesson = sample_lesson(payload.student_id, payload.date, payload.time);
            lesson.id = lesson_id;
            Ok(lesson)
        },
    );

    ctx.lesson_repo
        .expect_get_lesson_with_student()
        .with(predicate::eq(lesson_id))
        .returning(move |_| Ok(Some(joined.clone())));

    // The single-day list sees the lesson...
    ctx.lesson_repo
        .expect_list_lessons()
        .with(predicate::eq(Some((monday, monday))))
        .times(1)
        .returning(move |_| Ok(vec![listed.clone()]));

    // ...and after the delete, the same range is empty.
    ctx.lesson_repo
        .expect_get_lesson_by_id()
        .with(predicate::eq(lesson_id))
        .returning(move |id| {
            let mut lesson = sample_lesson(student_id, monday, nine);
            lesson.id = id;
            Ok(Some(lesson))
        });

    ctx.lesson_repo
        .expect_delete_lesson()
        .with(predicate::eq(lesson_id))
        .times(1)
        .returning(|_| Ok(()));

    ctx.lesson_repo
        .expect_list_lessons()
        .with(predicate::eq(Some((monday, monday))))
        .times(1)
        .returning(|_| Ok(vec![]));

    let payload = CreateLessonRequest {
        student_id,
        date: monday,
        time: nine,
        duration: LessonDuration::Hour,
        focus: "Dressage training".to_string(),
        notes: None,
    };

    let created = test_create_lesson_wrapper(&mut ctx, payload).await.unwrap();
    assert_eq!(created.id, lesson_id);
    assert_eq!(created.student.name, "Emma de Vries");

    let before = test_list_lessons_wrapper(&mut ctx, Some(monday), Some(monday))
        .await
        .unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].id, lesson_id);

    test_delete_lesson_wrapper(&mut ctx, lesson_id).await.unwrap();

    let after = test_list_lessons_wrapper(&mut ctx, Some(monday), Some(monday))
        .await
        .unwrap();
    assert!(after.is_empty());
}

#[tokio::test]
async fn test_update_returns_the_patched_row() {
    let mut ctx = TestContext::new();
    let student_id = Uuid::new_v4();
    let lesson_id = Uuid::new_v4();
    let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    ctx.lesson_repo
        .expect_get_lesson_by_id()
        .with(predicate::eq(lesson_id))
        .returning(move |id| {
            let mut lesson = sample_lesson(student_id, monday, nine);
            lesson.id = id;
            Ok(Some(lesson))
        });

    ctx.lesson_repo
        .expect_update_lesson()
        .times(1)
        .returning(move |id, patch: UpdateLessonRequest| {
            let mut lesson = sample_lesson(student_id, monday, nine);
            lesson.id = id;
            if let Some(duration) = patch.duration {
                lesson.duration = duration.minutes() as i32;
            }
            Ok(lesson)
        });

    ctx.lesson_repo
        .expect_get_lesson_with_student()
        .with(predicate::eq(lesson_id))
        .returning(move |id| {
            let mut row = sample_lesson_with_student(student_id, monday, nine);
            row.id = id;
            row.duration = 90;
            Ok(Some(row))
        });

    let patch = UpdateLessonRequest {
        duration: Some(LessonDuration::NinetyMinutes),
        ..Default::default()
    };

    let response = test_update_lesson_wrapper(&mut ctx, lesson_id, patch)
        .await
        .unwrap();

    assert_eq!(response.id, lesson_id);
    assert_eq!(response.duration, LessonDuration::NinetyMinutes);
    // Untouched fields come back from the store, not from the patch.
    assert_eq!(response.date, monday);
    assert_eq!(response.time, nine);
}

#[tokio::test]
async fn test_admin_can_approve_request() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let next_week = Utc::now().date_naive() + Duration::days(7);
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    ctx.lesson_repo
        .expect_set_lesson_request_status()
        .with(predicate::eq(id), predicate::eq("approved"))
        .times(1)
        .returning(move |_, status| {
            let mut row = sample_lesson_request(Uuid::new_v4(), next_week, nine);
            row.status = status.to_string();
            Ok(row)
        });

    let status = test_set_request_status_wrapper(&mut ctx, Role::Admin, id, "approved")
        .await
        .unwrap();

    assert_eq!(status, RequestStatus::Approved);
}

#[tokio::test]
async fn test_student_cannot_change_request_status() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.lesson_repo
        .expect_set_lesson_request_status()
        .times(0)
        .returning(|_, _| panic!("Should not be called"));

    let result = test_set_request_status_wrapper(&mut ctx, Role::Student, id, "approved").await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        ManegeError::Authorization(_) => {}
        e => panic!("Expected Authorization error, got: {:?}", e),
    }
}
