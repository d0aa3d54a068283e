use crate::models::{DbLesson, DbLessonRequest, DbLessonWithStudent};
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Result};
use manege_core::models::lesson::{CreateLessonRequest, UpdateLessonRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const LESSON_WITH_STUDENT_COLUMNS: &str = r#"
    l.id, l.student_id, l.date, l.time, l.duration, l.focus, l.notes, l.created_at,
    s.name AS student_name, s.level AS student_level
"#;

/// Lists lessons joined with the minimal student projection, optionally
/// filtered to an inclusive `[start, end]` date range.
///
/// Rows come back ordered ascending by (date, time); the calendar
/// projections rely on that ordering.
pub async fn list_lessons(
    pool: &Pool<Postgres>,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<DbLessonWithStudent>> {
    tracing::debug!("Listing lessons, range={:?}", range);

    let lessons = match range {
        Some((start, end)) => {
            sqlx::query_as::<_, DbLessonWithStudent>(&format!(
                r#"
                SELECT {LESSON_WITH_STUDENT_COLUMNS}
                FROM lessons l
                JOIN students s ON s.id = l.student_id
                WHERE l.date >= $1 AND l.date <= $2
                ORDER BY l.date ASC, l.time ASC
                "#
            ))
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, DbLessonWithStudent>(&format!(
                r#"
                SELECT {LESSON_WITH_STUDENT_COLUMNS}
                FROM lessons l
                JOIN students s ON s.id = l.student_id
                ORDER BY l.date ASC, l.time ASC
                "#
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(lessons)
}

/// Upcoming lessons for a single student, dashboard feed.
pub async fn upcoming_lessons_for_student(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    from: NaiveDate,
) -> Result<Vec<DbLessonWithStudent>> {
    let lessons = sqlx::query_as::<_, DbLessonWithStudent>(&format!(
        r#"
        SELECT {LESSON_WITH_STUDENT_COLUMNS}
        FROM lessons l
        JOIN students s ON s.id = l.student_id
        WHERE l.student_id = $1 AND l.date >= $2
        ORDER BY l.date ASC, l.time ASC
        "#
    ))
    .bind(student_id)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(lessons)
}

pub async fn get_lesson_with_student(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbLessonWithStudent>> {
    let lesson = sqlx::query_as::<_, DbLessonWithStudent>(&format!(
        r#"
        SELECT {LESSON_WITH_STUDENT_COLUMNS}
        FROM lessons l
        JOIN students s ON s.id = l.student_id
        WHERE l.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(lesson)
}

pub async fn get_lesson_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbLesson>> {
    let lesson = sqlx::query_as::<_, DbLesson>(
        r#"
        SELECT id, student_id, date, time, duration, focus, notes, created_at
        FROM lessons
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(lesson)
}

/// Single insert. Overlapping slots are accepted by design; there is no
/// double-booking guard.
pub async fn create_lesson(
    pool: &Pool<Postgres>,
    payload: &CreateLessonRequest,
) -> Result<DbLesson> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating lesson: id={}, student_id={}, date={}, time={}",
        id,
        payload.student_id,
        payload.date,
        payload.time
    );

    let lesson = sqlx::query_as::<_, DbLesson>(
        r#"
        INSERT INTO lessons (id, student_id, date, time, duration, focus, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, student_id, date, time, duration, focus, notes, created_at
        "#,
    )
    .bind(id)
    .bind(payload.student_id)
    .bind(payload.date)
    .bind(payload.time)
    .bind(payload.duration.minutes() as i32)
    .bind(&payload.focus)
    .bind(&payload.notes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(lesson)
}

/// Resolves a sparse patch against the current row; absent fields keep
/// their current value.
pub fn apply_lesson_patch(current: &DbLesson, patch: &UpdateLessonRequest) -> DbLesson {
    let mut merged = current.clone();

    if let Some(date) = patch.date {
        merged.date = date;
    }
    if let Some(time) = patch.time {
        merged.time = time;
    }
    if let Some(duration) = patch.duration {
        merged.duration = duration.minutes() as i32;
    }
    if let Some(focus) = &patch.focus {
        merged.focus = focus.clone();
    }
    if let Some(notes) = &patch.notes {
        merged.notes = Some(notes.clone());
    }

    merged
}

/// Sparse patch: only the supplied fields are written.
pub async fn update_lesson(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &UpdateLessonRequest,
) -> Result<DbLesson> {
    let current = get_lesson_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Lesson not found"))?;

    let merged = apply_lesson_patch(&current, patch);

    let lesson = sqlx::query_as::<_, DbLesson>(
        r#"
        UPDATE lessons
        SET date = $2, time = $3, duration = $4, focus = $5, notes = $6
        WHERE id = $1
        RETURNING id, student_id, date, time, duration, focus, notes, created_at
        "#,
    )
    .bind(id)
    .bind(merged.date)
    .bind(merged.time)
    .bind(merged.duration)
    .bind(&merged.focus)
    .bind(&merged.notes)
    .fetch_one(pool)
    .await?;

    Ok(lesson)
}

pub async fn delete_lesson(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    tracing::debug!("Deleting lesson: {}", id);

    sqlx::query(
        r#"
        DELETE FROM lessons
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts a lesson request with status fixed to `pending`. The date
/// validation happens in the handler before this is ever reached.
pub async fn create_lesson_request(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    preferred_date: NaiveDate,
    preferred_time: NaiveTime,
    notes: Option<&str>,
) -> Result<DbLessonRequest> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let request = sqlx::query_as::<_, DbLessonRequest>(
        r#"
        INSERT INTO lesson_requests (id, student_id, preferred_date, preferred_time, notes, status, created_at)
        VALUES ($1, $2, $3, $4, $5, 'pending', $6)
        RETURNING id, student_id, preferred_date, preferred_time, notes, status, created_at
        "#,
    )
    .bind(id)
    .bind(student_id)
    .bind(preferred_date)
    .bind(preferred_time)
    .bind(notes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(request)
}

pub async fn list_lesson_requests(
    pool: &Pool<Postgres>,
    student_id: Option<Uuid>,
    status: Option<&str>,
) -> Result<Vec<DbLessonRequest>> {
    let requests = sqlx::query_as::<_, DbLessonRequest>(
        r#"
        SELECT id, student_id, preferred_date, preferred_time, notes, status, created_at
        FROM lesson_requests
        WHERE ($1::uuid IS NULL OR student_id = $1)
          AND ($2::varchar IS NULL OR status = $2)
        ORDER BY preferred_date ASC, preferred_time ASC
        "#,
    )
    .bind(student_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

pub async fn set_lesson_request_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: &str,
) -> Result<DbLessonRequest> {
    let request = sqlx::query_as::<_, DbLessonRequest>(
        r#"
        UPDATE lesson_requests
        SET status = $2
        WHERE id = $1
        RETURNING id, student_id, preferred_date, preferred_time, notes, status, created_at
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(request)
}
